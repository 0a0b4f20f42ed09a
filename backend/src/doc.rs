//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: the feedback endpoints, the health probe, the response
//! schemas, and the bearer-token security scheme. The generated document
//! backs Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::feedback::{
    FeedbackItem, FeedbackStatsResponse, SubmitFeedbackRequest, SubmitFeedbackResponse,
    SubmittedFeedback, UserFeedbackData, UserFeedbackResponse,
};
use crate::domain::FeedbackStats;
use crate::inbound::http::health::HealthResponse;
use crate::models::{Error, ErrorCode, FieldError};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Opaque bearer token resolved to a user identity."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Feedback API",
        description = "Collects user feedback and exposes per-user listings and aggregate statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::health,
        crate::inbound::http::feedback::submit_feedback,
        crate::inbound::http::feedback::user_feedback,
        crate::inbound::http::feedback::feedback_stats,
    ),
    components(schemas(
        HealthResponse,
        SubmitFeedbackRequest,
        SubmitFeedbackResponse,
        SubmittedFeedback,
        UserFeedbackResponse,
        UserFeedbackData,
        FeedbackItem,
        FeedbackStatsResponse,
        FeedbackStats,
        Error,
        ErrorCode,
        FieldError,
    )),
    tags(
        (name = "feedback", description = "Submitting and reading feedback"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
