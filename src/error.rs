use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::model::department::UnknownDepartment;
use crate::model::leave_application::LeaveStatus;
use crate::store::StoreError;

/// Errors surfaced to API callers.
///
/// Notification failures never show up here; `setStatus` logs and swallows
/// them.
#[derive(Debug, thiserror::Error)]
pub enum LeaveError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("No data")]
    EmptyImport,
    #[error(transparent)]
    UnknownDepartment(#[from] UnknownDepartment),
    #[error("illegal status transition from {from} to {to}")]
    InvalidTransition { from: LeaveStatus, to: LeaveStatus },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("credential hashing failed: {0}")]
    Credential(String),
}

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::NotFound(_) => StatusCode::NOT_FOUND,
            LeaveError::Conflict(_) => StatusCode::CONFLICT,
            LeaveError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            LeaveError::MissingField(_)
            | LeaveError::EmptyImport
            | LeaveError::UnknownDepartment(_)
            | LeaveError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            LeaveError::Store(_) | LeaveError::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            LeaveError::NotFound("leave application").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LeaveError::Conflict("Student already exists".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            LeaveError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            LeaveError::InvalidTransition {
                from: LeaveStatus::Rejected,
                to: LeaveStatus::Pending,
            }
            .to_string(),
            "illegal status transition from Rejected to Pending"
        );
    }

    #[test]
    fn store_failures_are_internal() {
        let err = LeaveError::from(StoreError::Unavailable("down".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
