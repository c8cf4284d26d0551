use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use server::{routes, AppState};
use service::backend::FixtureBackend;
use service::Backends;

fn app() -> Router {
    let backends = Backends::single(Arc::new(FixtureBackend::new(Duration::ZERO)));
    routes::build_router(AppState::new(backends), "static", tower_http::cors::CorsLayer::very_permissive())
}

struct Page {
    status: StatusCode,
    location: Option<String>,
    html: String,
}

async fn send(app: &Router, req: Request<Body>) -> Page {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let location = res.headers().get(header::LOCATION).map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    Page { status, location, html: String::from_utf8_lossy(&bytes).into_owned() }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_redirects_to_teams() {
    let page = send(&app(), get("/")).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/teams"));
}

#[tokio::test]
async fn team_list_renders_teams_and_form() {
    let page = send(&app(), get("/teams")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.html.contains(r#"<a href="/teams/2134">HR</a>"#));
    assert!(page.html.contains("UI/UX"));
    assert!(page.html.contains(r#"name="services" value="2""#));
    assert!(page.html.contains("Always deployed"));
}

#[tokio::test]
async fn team_detail_and_missing_team() {
    let app = app();
    let page = send(&app, get("/teams/23455634")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.html.contains("192.168.1.2"));

    let missing = send(&app, get("/teams/nope")).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(missing.html.contains("404"));
}

#[tokio::test]
async fn create_team_form_redirects_to_new_team() {
    let app = app();
    let page = send(
        &app,
        post_form("/teams", "name=Platform&description=&services=1&services=3&address=10.40.0.0&mask=24"),
    )
    .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    let location = page.location.unwrap();
    assert!(location.starts_with("/teams/"));

    let detail = send(&app, get(&location)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.html.contains("10.40.0.5"));
    assert!(detail.html.contains("10.40.0.6"));
}

#[tokio::test]
async fn invalid_team_form_is_rerendered() {
    let page = send(&app(), post_form("/teams", "name=HR&services=2&address=10.0.0.0&mask=33")).await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.html.contains("Invalid team data."));
    assert!(page.html.contains(r#"name="name" value="HR""#));
    assert!(page.html.contains(r#"value="2" checked"#));
    assert!(page.html.contains(r#"value="33""#));
}

#[tokio::test]
async fn login_form_and_submissions() {
    let app = app();
    let form = send(&app, get("/login")).await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.html.contains(r#"name="rememberMe""#));

    let bad = send(&app, post_form("/login", "username=al&password=secret")).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert!(bad.html.contains("Invalid credentials."));
    assert!(!bad.html.contains("secret"));

    let missing_password = send(&app, post_form("/login", "username=alice")).await;
    assert_eq!(missing_password.status, StatusCode::BAD_REQUEST);

    let ok = send(&app, post_form("/login", "username=alice&password=secret&rememberMe=on")).await;
    assert_eq!(ok.status, StatusCode::SEE_OTHER);
    assert_eq!(ok.location.as_deref(), Some("/teams"));
}

struct Denying;

#[async_trait::async_trait]
impl service::auth::Authenticator for Denying {
    async fn verify(&self, _: &models::Credentials) -> Result<service::auth::Session, service::auth::AuthError> {
        Err(service::auth::AuthError::Unauthorized)
    }
}

#[tokio::test]
async fn rejected_credentials_read_like_bad_input() {
    let backends = Backends::single(Arc::new(FixtureBackend::new(Duration::ZERO)));
    let state = AppState::new(backends).with_authenticator(Arc::new(Denying));
    let app = routes::build_router(state, "static", tower_http::cors::CorsLayer::very_permissive());

    let page = send(&app, post_form("/login", "username=alice&password=secret")).await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.html.contains("Invalid credentials."));
    assert!(page.html.contains(r#"value="alice""#));
}
