//! API error handling
//!
//! Maps the layer errors onto HTTP statuses and renders the client
//! body as `{message, status}` JSON. Internal causes are logged and
//! never echoed to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use scribe_auth::AuthError;
use scribe_db::repository::RepositoryError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    /// Collapse validator output into one client-readable message.
    pub fn validation(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect::<Vec<_>>()
                    .join(", ");
                if detail.is_empty() {
                    format!("{field} is invalid")
                } else {
                    format!("{field}: {detail}")
                }
            })
            .collect();
        parts.sort();
        ApiError::BadRequest(parts.join("; "))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => msg,
            // never leak the internal cause
            ApiError::Internal(_) => "something went wrong",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Internal(cause) = &self {
            tracing::error!(%cause, "internal error");
        }
        let body = ErrorBody {
            message: self.message().to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AlreadyRegistered => ApiError::BadRequest(err.to_string()),
            AuthError::NotRegistered => ApiError::NotFound(err.to_string()),
            AuthError::Password(cause) => ApiError::Internal(cause),
            AuthError::Store(store) => store.into(),
            // token, claims, session and credential failures all deny
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => ApiError::NotFound(what),
            RepositoryError::Conflict(what) => ApiError::BadRequest(what),
            RepositoryError::Decode(cause) => ApiError::Internal(cause),
            RepositoryError::Database(cause) => ApiError::Internal(cause.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_auth::TokenError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(AuthError::AlreadyRegistered).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AuthError::NotRegistered).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AuthError::WrongPassword).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::Token(TokenError::Expired)).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::Replay).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(RepositoryError::Conflict("duplicate".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_message_is_opaque() {
        let err = ApiError::internal("connection refused to db:5432");
        assert_eq!(err.message(), "something went wrong");
    }
}
