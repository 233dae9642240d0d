use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use console_server::config::Config;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn app() -> Router { console_server::build_app(&Config::default()).unwrap() }

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(app(), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn translate_returns_resolution_input() {
    let req = post_json("/api/query/translate", json!({ "query": "last_name:Jones first_name:Allie 202-555-1234" }));
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json,
        json!({
            "attributes": { "first_name": { "values": ["Allie"] }, "last_name": { "values": ["Jones"] } },
            "terms": ["202-555-1234"]
        })
    );
}

#[tokio::test]
async fn translate_reports_syntax_errors() {
    let (status, body) = send(app(), post_json("/api/query/translate", json!({ "query": "age>21" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Query syntax error");
    assert_eq!(json["message"], "attribute value query syntax must be name:value separated by a colon");
}

#[tokio::test]
async fn scores_and_validates_models() {
    let model = json!({
        "attributes": { "name": { "type": "string", "score": 0.5 }, "phone": { "type": "string", "score": 1.0 } },
        "resolvers": { "name_phone": { "attributes": ["name", "phone"] }, "ghost": { "attributes": ["missing"] } }
    });

    let (status, body) = send(app(), post_json("/api/models/score", json!({ "model": model.clone() }))).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["resolvers"]["name_phone"], json!({ "score": 1.0, "strength": "guaranteed_match", "band": "Guaranteed match" }));
    assert_eq!(json["resolvers"]["ghost"], json!({ "score": null, "strength": null, "band": null }));

    let (status, body) = send(app(), post_json("/api/models/validate", json!({ "model": model }))).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["valid"], false);
    let errors: Vec<&Value> = json["findings"].as_array().unwrap().iter().filter(|f| f["level"] == "error").collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["name"], "ghost");
}

#[tokio::test]
async fn serves_static_frontend() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("js")).unwrap();
    fs::write(dir.path().join("index.html"), "<html>console</html>").unwrap();
    fs::write(dir.path().join("js/app.js"), "console.log(1)").unwrap();
    let mut config = Config::default();
    config.server.app_dir = dir.path().to_path_buf();
    let app = console_server::build_app(&config).unwrap();

    let (status, body) = send(app.clone(), Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"<html>console</html>");

    let (status, body) = send(app.clone(), Request::get("/js/app.js").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"console.log(1)");

    let (status, _) = send(app, Request::get("/nope.css").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn rejects_invalid_config() {
    let mut config = Config::default();
    config.search_engine.timeout_ms = 0;
    assert!(console_server::build_app(&config).is_err());
}
