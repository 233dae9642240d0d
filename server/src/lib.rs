pub mod config;
pub mod error;
pub mod proxy;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{Method, Uri};
use axum::response::Response;
use axum::{routing::{any, get, post}, Json, Router};
use config::Config;
use entity_core::score::{score_resolvers, ResolverScore};
use entity_core::validation::{has_errors, validate, Finding};
use entity_core::{translate_text, EntityModel, ResolutionInput, ResolutionRequest};
use error::ApiError;
use proxy::Upstream;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const PROXY_PREFIX: &str = "/es";

#[derive(Deserialize)]
pub struct TranslateRequest {
    pub query: String,
}

#[derive(Deserialize)]
pub struct ModelRequest {
    pub model: EntityModel,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub resolvers: BTreeMap<String, ResolverScore>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub findings: Vec<Finding>,
}

#[derive(Deserialize)]
pub struct ResolveRequest {
    pub query: String,
    /// Restrict the resolution to these indices; all indices when absent.
    #[serde(default)]
    pub indices: Option<Vec<String>>,
}

#[derive(Clone)]
pub struct AppState {
    pub upstream: Upstream,
}

pub fn build_app(config: &Config) -> Result<Router> {
    config.validate()?;
    let app_state = AppState { upstream: Upstream::new(config)? };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(PROXY_PREFIX, any(proxy_handler))
        .route(&format!("{PROXY_PREFIX}/*path"), any(proxy_handler))
        .route("/api/query/translate", post(translate_handler))
        .route("/api/models/score", post(score_handler))
        .route("/api/models/validate", post(validate_handler))
        .route("/api/resolution/:entity_type", post(resolution_handler))
        .fallback_service(ServeDir::new(&config.server.app_dir))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    Ok(app)
}

/// Relay anything under the proxy prefix to the search engine unchanged.
pub async fn proxy_handler(State(state): State<AppState>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().strip_prefix(PROXY_PREFIX).unwrap_or_default();
    state.upstream.forward(method, path, uri.query(), body).await
}

pub async fn translate_handler(Json(req): Json<TranslateRequest>) -> Result<Json<ResolutionInput>, ApiError> {
    let input = translate_text(&req.query).map_err(|err| {
        tracing::debug!(query = %req.query, error = %err, "rejected search bar query");
        err
    })?;
    Ok(Json(input))
}

pub async fn score_handler(Json(req): Json<ModelRequest>) -> Json<ScoreResponse> {
    Json(ScoreResponse { resolvers: score_resolvers(&req.model) })
}

pub async fn validate_handler(Json(req): Json<ModelRequest>) -> Json<ValidateResponse> {
    let findings = validate(&req.model);
    Json(ValidateResponse { valid: !has_errors(&findings), findings })
}

pub async fn resolution_handler(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
    Json(req): Json<ResolveRequest>,
) -> Result<Response, ApiError> {
    let input = translate_text(&req.query)?;
    if input.is_empty() {
        return Err(ApiError::BadRequest("A resolution request needs at least one attribute value or term.".into()));
    }
    let request = ResolutionRequest::new(entity_type, input, req.indices);
    let body = serde_json::to_vec(&request.data).map_err(|e| ApiError::Internal(e.to_string()))?;
    let query = request
        .query_params()
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    tracing::info!(entity_type = %request.entity_type, "submitting resolution request");
    Ok(state.upstream.forward(Method::POST, &request.path(), Some(&query), Bytes::from(body)).await)
}
