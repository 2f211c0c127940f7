use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ServiceError;
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const INTEGRITY: &str = "integrity_error";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const STORE_UNAVAILABLE: &str = "store_unavailable";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Structured diagnostic attached to error responses so the logging
/// middleware can emit the detail without leaking it to the client.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub detail: String,
}

impl ErrorReport {
    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "actor identity required",
            None,
        )
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound(entity) => Self::new(
                StatusCode::NOT_FOUND,
                codes::NOT_FOUND,
                "resource not found",
                Some(format!("{entity} does not exist")),
            ),
            ServiceError::Forbidden(message) => Self::new(
                StatusCode::FORBIDDEN,
                codes::FORBIDDEN,
                "operation not permitted",
                Some(message.to_string()),
            ),
            ServiceError::Domain(DomainError::Validation { message }) => Self::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_INPUT,
                "request could not be processed",
                Some(message),
            ),
            ServiceError::Repo(repo) => Self::from(repo),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(error: RepoError) -> Self {
        match error {
            RepoError::NotFound => Self::not_found("resource not found"),
            RepoError::Duplicate { constraint } => Self::new(
                StatusCode::CONFLICT,
                codes::DUPLICATE,
                "duplicate resource",
                Some(format!("unique constraint `{constraint}`")),
            ),
            RepoError::InvalidInput { message } => Self::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_INPUT,
                "request could not be processed",
                Some(message),
            ),
            RepoError::Integrity { message } => Self::new(
                StatusCode::CONFLICT,
                codes::INTEGRITY,
                "request conflicts with stored data",
                Some(message),
            ),
            RepoError::Timeout => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::DB_TIMEOUT,
                "service temporarily unavailable",
                None,
            ),
            // Never silently converted into an empty result; the caller
            // sees the outage.
            RepoError::Persistence(message) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::STORE_UNAVAILABLE,
                "service temporarily unavailable",
                Some(message),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self
            .hint
            .clone()
            .unwrap_or_else(|| self.message.to_string());
        // 5xx hints carry store internals; log them, never send them.
        let hint = if self.status.is_server_error() {
            None
        } else {
            self.hint
        };

        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport {
            source: "infra::http::api",
            status: self.status,
            detail: format!("{}: {detail}", self.code),
        }
        .attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_maps_to_conflict() {
        let api: ApiError = RepoError::Duplicate {
            constraint: "post_likes_pkey".to_string(),
        }
        .into();
        assert_eq!(api.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn persistence_maps_to_service_unavailable() {
        let api: ApiError = RepoError::from_persistence("connection reset").into();
        assert_eq!(api.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn missing_entity_maps_to_not_found() {
        let api: ApiError = ServiceError::NotFound("post").into();
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
    }
}
