use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::academy::AcademyError;
use thiserror::Error;
use tracing::error;

/// Every failure leaves the API as `{"success": false, "message": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { success: false, message: &self.message };
        (self.status, Json(body)).into_response()
    }
}

impl From<AcademyError> for JsonApiError {
    fn from(e: AcademyError) -> Self {
        match e {
            AcademyError::InvalidCredentials(_) => Self::new(StatusCode::UNAUTHORIZED, e.to_string()),
            AcademyError::DuplicateKey(_) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            AcademyError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            AcademyError::Persistence(_) | AcademyError::MalformedPersistedState(_) => {
                error!(code = e.code(), error = %e, "request failed on storage");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to persist data")
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, rejection.body_text())
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("store bootstrap failed: {0}")]
    Store(#[from] AcademyError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::academy::domain::Role;

    #[test]
    fn academy_errors_map_to_statuses() {
        let cases = [
            (AcademyError::InvalidCredentials(Role::Admin), StatusCode::UNAUTHORIZED),
            (AcademyError::DuplicateKey(Role::Candidate), StatusCode::BAD_REQUEST),
            (AcademyError::user_not_found(), StatusCode::NOT_FOUND),
            (
                AcademyError::Persistence(service::errors::ServiceError::Storage("disk full".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let e = JsonApiError::from(AcademyError::Persistence(service::errors::ServiceError::Storage(
            "/var/data/db.json: permission denied".into(),
        )));
        assert_eq!(e.message, "Failed to persist data");
    }
}
