//! API error taxonomy. Every handler returns `Result<_, ApiError>`; the
//! `IntoResponse` impl emits the `{error, details}` JSON body clients expect.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::db::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field is missing from the request.
    #[error("{0}")]
    Validation(String),

    /// No authenticated actor, or the presented token is invalid.
    #[error("{0}")]
    Auth(String),

    #[error("Not found")]
    NotFound,

    /// The store rejected the operation (uniqueness violation, malformed
    /// foreign key, connection loss). `details` carries the database's
    /// human-readable message verbatim.
    #[error("{error}")]
    Persistence { error: String, details: String },

    #[error("Database not available")]
    Unavailable,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match self {
            ApiError::Persistence { error, details } => ErrorBody {
                error,
                details: Some(details),
            },
            other => ErrorBody {
                error: other.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Unavailable => ApiError::Unavailable,
            StoreError::Database(e) => ApiError::Persistence {
                error: "Database error".to_string(),
                details: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("Title is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Auth("Authorization required".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::Persistence {
                error: "Database error".into(),
                details: "duplicate key value violates unique constraint".into(),
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_persistence_body_carries_details() {
        let err = ApiError::Persistence {
            error: "Database error".into(),
            details: "boom".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_error_conversion() {
        assert!(matches!(
            ApiError::from(StoreError::NotFound),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(StoreError::Unavailable),
            ApiError::Unavailable
        ));
    }
}
