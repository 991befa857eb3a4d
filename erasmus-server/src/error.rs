use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors surfaced to HTTP callers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing state parameter")]
    MissingState,

    #[error("Missing ID parameter")]
    MissingId,

    #[error("Short URL not found")]
    NotFound,

    #[error("Failed to create short URL")]
    CreateFailed(String),

    #[error("Failed to retrieve short URL")]
    ResolveFailed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingState | ApiError::MissingId => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::CreateFailed(_) | ApiError::ResolveFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::CreateFailed(cause) => tracing::error!("Error creating short URL: {}", cause),
            ApiError::ResolveFailed(cause) => {
                tracing::error!("Error retrieving short URL: {}", cause)
            }
            _ => {}
        }

        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));

        (self.status(), body).into_response()
    }
}
