//! Wire-level response types shared by every endpoint.
//!
//! Success bodies are endpoint-specific DTOs carrying the
//! `{"success": true, ...}` envelope fields directly; failures all use the
//! [`Error`] payload defined here.

pub mod error;

pub use error::{Error, ErrorCode, FieldError};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
