use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod pages;
pub mod teams;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: JSON API, pages, static assets and docs.
pub fn build_router(state: AppState, static_dir: &str, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/teams", get(teams::list_teams).post(teams::create_team))
        .route("/api/teams/:id", get(teams::get_team).delete(teams::delete_team))
        .route("/api/services", get(teams::list_services))
        .route("/api/services/default", get(teams::list_default_services));

    let pages = Router::new()
        .route("/", get(pages::index))
        .route("/login", get(pages::login_form).post(pages::login_submit))
        .route("/teams", get(pages::team_list).post(pages::create_team))
        .route("/teams/:id", get(pages::team_detail));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .merge(pages)
        .with_state(state)
        .nest_service("/static", ServeDir::new(static_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
