//! Error handling - converts failures into generic plain-text responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use std::fmt;

use postcard_core::DomainError;
use postcard_core::ports::{RateLimitError, StoreError};

/// Application-level error type. Details are logged, never sent to the client.
#[derive(Debug)]
pub enum AppError {
    Unauthorized { realm: String },
    TooManyRequests,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthorized { realm } => write!(f, "Unauthorized for realm {}", realm),
            AppError::TooManyRequests => write!(f, "Too many requests"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.content_type("text/plain; charset=utf-8");

        match self {
            AppError::Unauthorized { realm } => builder
                .insert_header((
                    header::WWW_AUTHENTICATE,
                    format!("Basic realm=\"{}\"", realm),
                ))
                .body("Unauthorized"),
            AppError::TooManyRequests => builder.body("Too Many Requests"),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                builder.body("Internal Server Error")
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(format!("Store error: {}", err))
    }
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        AppError::Internal(format!("Rate limiter error: {}", err))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
