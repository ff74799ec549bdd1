//! Facade error mapping: `ChatError` to HTTP status + structured body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{infrastructure::dto::http::ErrorBody, usecase::ChatError};

/// Error wrapper giving every handler a uniform error response.
pub struct ApiError(pub ChatError);

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ChatError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            ChatError::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            ChatError::NotMember => (StatusCode::FORBIDDEN, self.0.to_string()),
            ChatError::RoomNotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            ChatError::RoomFull | ChatError::AlreadyMember => {
                (StatusCode::CONFLICT, self.0.to_string())
            }
            ChatError::Repository(e) => {
                // Storage details stay in the log, not in the response.
                tracing::error!("storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        let body = ErrorBody {
            error: message,
            code: self.0.code().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}
