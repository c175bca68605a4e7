use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::error::FintrackError;

/// Error returned by every handler, rendered as `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<FintrackError> for ApiError {
    fn from(err: FintrackError) -> Self {
        let status = match &err {
            FintrackError::Validation(_) | FintrackError::UnknownCategory(_) => StatusCode::BAD_REQUEST,
            FintrackError::NotFound { .. } | FintrackError::UnknownUser(_) => StatusCode::NOT_FOUND,
            FintrackError::DuplicateBudget(_) | FintrackError::UsernameTaken(_) => StatusCode::CONFLICT,
            FintrackError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            FintrackError::Db(_)
            | FintrackError::Io(_)
            | FintrackError::Json(_)
            | FintrackError::Settings(_)
            | FintrackError::Other(_) => {
                error!(error = %err, "request failed");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal server error".to_string(),
                };
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { message: &self.message })).into_response()
    }
}
