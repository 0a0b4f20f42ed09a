//! HTTP inbound adapter exposing REST endpoints.

use actix_web::{HttpResponse, web};
use tracing::debug;

use crate::models::{Error, ErrorCode};

pub mod auth;
pub mod feedback;
pub mod health;
pub mod state;
pub mod validation;

pub use crate::models::ApiResult;

/// Maximum accepted JSON body size.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// JSON extractor configuration shared by the server and the test apps.
///
/// Applies the body limit and renders payload failures with the validation
/// envelope instead of Actix's default error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            debug!(error = %err, "rejecting unreadable JSON payload");
            Error::new(ErrorCode::ValidationError, "Invalid JSON payload").into()
        })
}

/// Catch-all handler for unmatched routes.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("Endpoint not found"))
}
