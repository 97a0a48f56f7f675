//! Error types for the reflector server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reflector_logs::{ErrorBody, ErrorKind, QueryError};
use thiserror::Error;

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the reflector server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(std::net::SocketAddr, std::io::Error),

    /// A query failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Query(err) if err.is_permission_denied() => StatusCode::FORBIDDEN,
            Self::Query(err) => match err.kind() {
                ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
                ErrorKind::IoFailure => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BindFailed(_, _) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Query(err) => ErrorBody::from(err),
            Self::BindFailed(_, _) | Self::Config(_) | Self::Internal(_) => ErrorBody {
                error: ErrorKind::IoFailure,
                message: self.to_string(),
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let json = serde_json::to_string(&self.body()).unwrap_or_else(|_| {
            r#"{"error":"io_failure","message":"failed to serialize error"}"#.to_string()
        });

        (status, [("content-type", "application/json")], json).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::io;
    use test_case::test_case;

    #[test_case(QueryError::invalid("lines must be at least 1"), StatusCode::BAD_REQUEST ; "invalid argument")]
    #[test_case(QueryError::NotFound("2026-02-15".into()), StatusCode::NOT_FOUND ; "not found")]
    #[test_case(
        QueryError::FileTooLarge { path: "big.txt".into(), size: 11, limit: 10 },
        StatusCode::PAYLOAD_TOO_LARGE
        ; "file too large"
    )]
    #[test_case(
        QueryError::from_io("Events.txt", io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        StatusCode::FORBIDDEN
        ; "permission denied"
    )]
    #[test_case(
        QueryError::from_io("Events.txt", io::Error::other("disk on fire")),
        StatusCode::INTERNAL_SERVER_ERROR
        ; "other io failure"
    )]
    fn query_error_status(err: QueryError, expected: StatusCode) {
        assert_eq!(ServerError::from(err).status(), expected);
    }

    #[tokio::test]
    async fn test_not_found_error_response() {
        let err = ServerError::from(QueryError::NotFound("no log file for 2026-02-15".into()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "not_found");
        assert!(json["message"].as_str().unwrap().contains("2026-02-15"));
    }

    #[tokio::test]
    async fn test_internal_error_response() {
        let err = ServerError::Internal("worker panicked".to_string());
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "io_failure");
    }

    #[test]
    fn test_error_display() {
        let err = ServerError::from(QueryError::invalid("bad date"));
        assert_eq!(err.to_string(), "invalid argument: bad date");

        let err = ServerError::Config("max_lines must be positive".to_string());
        assert_eq!(err.to_string(), "configuration error: max_lines must be positive");
    }
}
