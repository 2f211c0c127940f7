use thiserror::Error;

use crate::application::repos::RepoError;
use crate::domain::error::DomainError;
use crate::infra::error::InfraError;

/// Error surface of the application services. The HTTP layer owns the
/// mapping onto status codes; nothing here knows about axum.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound(entity)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::Forbidden(message)
    }
}

/// Top-level error for process bootstrap and shutdown paths.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
