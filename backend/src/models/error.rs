//! Error response types.
//!
//! Every failure leaving this service is the same JSON envelope:
//! `{"success": false, "message": ..., "code": ...}` plus an ordered
//! `errors` list for validation failures. [`Error`] implements
//! [`ResponseError`] so handlers, extractors, and middleware can all fail
//! with the domain-appropriate code and let Actix render the envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request payload failed validation.
    ValidationError,
    /// A protected route was called without a valid credential.
    AuthRequired,
    /// The caller exhausted its rate-limit window.
    RateLimitExceeded,
    /// The requested route does not exist.
    NotFound,
    /// An unexpected error occurred on the server.
    InternalError,
}

impl ErrorCode {
    fn as_status_code(self) -> StatusCode {
        match self {
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// One field-level validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Name of the offending payload field.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// API error response payload.
///
/// # Examples
/// ```
/// use backend::models::{Error, ErrorCode};
///
/// let err = Error::not_found("Endpoint not found");
/// assert_eq!(err.code, ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Error {
    /// Always `false`; keeps failure bodies shaped like success bodies.
    pub success: bool,
    /// Human-readable error message.
    #[schema(example = "Validation failed")]
    pub message: String,
    /// Field-level violations, present for validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Stable machine-readable error code.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: ErrorCode,
    /// Internal failure detail, emitted in debug builds only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl Error {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            code,
            stack: None,
        }
    }

    /// Validation failure carrying the ordered field violations.
    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        let mut error = Self::new(ErrorCode::ValidationError, message);
        error.errors = Some(errors);
        error
    }

    /// Convenience constructor for [`ErrorCode::AuthRequired`].
    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthRequired, message)
    }

    /// Convenience constructor for [`ErrorCode::RateLimitExceeded`].
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RateLimitExceeded, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Internal error keeping the failure detail for debug builds.
    ///
    /// The client-facing message is always the redacted constant; `detail`
    /// only reaches the response body when compiled with debug assertions.
    pub fn internal_with_detail(detail: impl Into<String>) -> Self {
        let mut error = Self::internal("Internal server error");
        if cfg!(debug_assertions) {
            error.stack = Some(detail.into());
        }
        error
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        tracing::error!(error = %err, "actix error promoted to API error");
        Self::internal("Internal server error")
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.code.as_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut payload = self.clone();
        if matches!(self.code, ErrorCode::InternalError) {
            payload.message = "Internal server error".to_owned();
            payload.errors = None;
            if !cfg!(debug_assertions) {
                payload.stack = None;
            }
        }
        HttpResponse::build(self.status_code()).json(payload)
    }
}
