//! Server running in proxy mode against a stand-in for the external backend.

use std::net::SocketAddr;

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use configs::{AppConfig, BackendMode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn serve(app: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(format!("http://{}:{}", addr.ip(), addr.port()))
}

fn fake_backend() -> Router {
    Router::new()
        .route("/teams/", get(|| async { Json(json!([{"id": 7, "name": "Legacy", "cidr": "10.7.0.0/24"}])) }))
        .route(
            "/team/:id",
            get(|Path(id): Path<String>| async move {
                if id == "7" {
                    Ok(Json(json!({"id": "7", "name": "Legacy", "cidr": "10.7.0.0/24", "services": []})))
                } else {
                    Err((StatusCode::NOT_FOUND, Json(json!({"detail": "Team not found"}))))
                }
            })
            .delete(|Path(id): Path<String>| async move {
                if id == "7" { StatusCode::OK } else { StatusCode::NOT_FOUND }
            }),
        )
        .route(
            "/team",
            post(|Json(body): Json<Value>| async move {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": [{"loc": ["body", "cidr"], "msg": format!("{} overlaps", body["cidr"].as_str().unwrap_or(""))}]})))
            }),
        )
        .route("/services/", get(|| async { Json(json!({"dns": [{"id": 3, "name": "DNS"}]})) }))
        .route("/services/default", get(|| async { Json(json!([])) }))
}

async fn start_proxy_server() -> anyhow::Result<String> {
    let upstream = serve(fake_backend()).await?;
    let mut cfg = AppConfig::default();
    cfg.backend.mode = BackendMode::Proxy;
    cfg.backend.api_base_url = upstream;
    let app = server::startup::build_app(&cfg)?;
    serve(app).await
}

#[tokio::test]
async fn e2e_proxy_reads() -> anyhow::Result<()> {
    let base = start_proxy_server().await?;
    let client = reqwest::Client::new();

    let teams: Value = client.get(format!("{base}/api/teams")).send().await?.json().await?;
    assert_eq!(teams, json!([{"id": "7", "name": "Legacy", "cidr": "10.7.0.0/24", "services": []}]));

    let res = client.get(format!("{base}/api/teams/8")).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    let services: Value = client.get(format!("{base}/api/services")).send().await?.json().await?;
    assert_eq!(services, json!([{"id": 3, "name": "DNS"}]));

    let page = client.get(format!("{base}/teams/7")).send().await?;
    assert_eq!(page.status(), reqwest::StatusCode::OK);
    assert!(page.text().await?.contains("Legacy"));
    Ok(())
}

#[tokio::test]
async fn e2e_proxy_delete_and_create_errors() -> anyhow::Result<()> {
    let base = start_proxy_server().await?;
    let client = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build()?;

    let res = client.delete(format!("{base}/api/teams/7")).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);
    let res = client.delete(format!("{base}/api/teams/unknown")).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);

    let res = client
        .post(format!("{base}/teams"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Platform&services=3&address=10.7.0.0&mask=24")
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let html = res.text().await?;
    assert!(html.contains("Invalid team data."));
    assert!(html.contains("body.cidr: 10.7.0.0/24 overlaps"));
    Ok(())
}

#[tokio::test]
async fn e2e_unreachable_backend_is_bad_gateway() -> anyhow::Result<()> {
    let mut cfg = AppConfig::default();
    cfg.backend.mode = BackendMode::Proxy;
    cfg.backend.api_base_url = "http://127.0.0.1:1".into();
    let base = serve(server::startup::build_app(&cfg)?).await?;

    let res = reqwest::get(format!("{base}/api/teams")).await?;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Upstream Error");

    let page = reqwest::get(format!("{base}/teams")).await?;
    assert_eq!(page.status(), reqwest::StatusCode::BAD_GATEWAY);
    Ok(())
}
