use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use entity_core::{ErrorBody, QuerySyntaxError};

/// Errors returned by the console's own endpoints, rendered as `{error, message}`.
#[derive(Debug)]
pub enum ApiError {
    QuerySyntax(QuerySyntaxError),
    BadRequest(String),
    Internal(String),
}

impl From<QuerySyntaxError> for ApiError {
    fn from(err: QuerySyntaxError) -> Self { ApiError::QuerySyntax(err) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::QuerySyntax(err) => (StatusCode::BAD_REQUEST, err.body()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorBody { error: "Bad request".into(), message }),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody { error: "Server error".into(), message }),
        };
        (status, Json(body)).into_response()
    }
}
