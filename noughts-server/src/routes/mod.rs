//! HTTP route handlers

pub mod games;
pub mod scores;
pub mod status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Handler failure, rendered as `{ "error": ... }`
#[derive(Debug)]
pub enum ApiError {
    UnknownGame(String),
    /// Body missing, not JSON, or the wrong shape
    BadRequest(String),
    TooManyGames(usize),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnknownGame(id) => (StatusCode::NOT_FOUND, format!("Unknown game: {}", id)),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::TooManyGames(limit) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Session limit of {} reached; delete a game first", limit),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
