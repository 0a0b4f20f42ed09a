//! Feedback API handlers.
//!
//! ```text
//! POST /api/feedback          {"rating":5,"main_content":"...","comment":"..."}
//! GET  /api/feedback/user     (requires a bearer token)
//! GET  /api/feedback/stats    (requires a bearer token)
//! ```

use actix_web::http::header::USER_AGENT;
use actix_web::{HttpRequest, HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    FeedbackRecord, FeedbackServiceError, FeedbackStats, Rating, SubmissionContext,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{MaybeUser, RequiredUser};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::validate_feedback;
use crate::middleware::correlate::{REQUEST_ID_HEADER, RequestId};
use crate::models::Error;

/// Header carrying the client's browsing-session identifier.
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Documented shape of the submission payload.
///
/// The handler deserializes the raw JSON itself (see
/// [`validate_feedback`]); this type exists for the OpenAPI document and
/// for typed callers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitFeedbackRequest {
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Response body for `POST /api/feedback`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    pub message: String,
    pub data: SubmittedFeedback,
}

/// Receipt for a stored submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmittedFeedback {
    #[schema(format = "uuid")]
    pub feedback_id: Uuid,
    #[schema(value_type = i64, minimum = 1, maximum = 5)]
    pub rating: Rating,
    #[schema(format = "date-time")]
    pub submitted_at: DateTime<Utc>,
}

/// Response body for `GET /api/feedback/user`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserFeedbackResponse {
    pub success: bool,
    pub data: UserFeedbackData,
}

/// A caller's own records plus their count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserFeedbackData {
    pub feedbacks: Vec<FeedbackItem>,
    pub total: usize,
}

/// One record as returned to its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackItem {
    #[schema(format = "uuid")]
    pub id: Uuid,
    #[schema(value_type = i64, minimum = 1, maximum = 5)]
    pub rating: Rating,
    pub main_content: Option<String>,
    pub comment: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackRecord> for FeedbackItem {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: record.id,
            rating: record.rating,
            main_content: record.main_content,
            comment: record.comment,
            created_at: record.created_at,
        }
    }
}

/// Response body for `GET /api/feedback/stats`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackStatsResponse {
    pub success: bool,
    pub data: FeedbackStats,
}

fn map_service_error(err: FeedbackServiceError) -> Error {
    error!(error = %err, "feedback storage failure");
    Error::internal_with_detail(err.to_string())
}

fn header_or_generate(req: &HttpRequest, name: &str) -> String {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned)
}

/// Capture the transport-derived context for a submission.
///
/// The request identifier prefers the one resolved by the correlation
/// middleware so the persisted record matches the response header.
fn submission_context(req: &HttpRequest) -> SubmissionContext {
    let request_id = RequestId::current().map_or_else(
        || header_or_generate(req, REQUEST_ID_HEADER),
        |id| id.to_string(),
    );
    SubmissionContext {
        session_id: header_or_generate(req, SESSION_ID_HEADER),
        request_id,
        ip_address: req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_owned(),
        user_agent: req
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned(),
    }
}

/// Store a feedback submission.
///
/// Authentication is optional: anonymous submissions are accepted. The
/// payload is taken as raw JSON so the validation stage can report every
/// field violation at once.
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 201, description = "Feedback stored", body = SubmitFeedbackResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 429, description = "Rate limit exceeded", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "submitFeedback",
    security((), ("BearerToken" = []))
)]
pub async fn submit_feedback(
    req: HttpRequest,
    state: web::Data<HttpState>,
    identity: MaybeUser,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let submission = validate_feedback(&payload)
        .map_err(|errors| Error::validation("Validation failed", errors))?;
    let context = submission_context(&req);

    let created = state
        .feedback
        .create(submission, &identity.0, context)
        .await
        .map_err(map_service_error)?;

    Ok(HttpResponse::Created().json(SubmitFeedbackResponse {
        success: true,
        message: "Feedback submitted successfully".to_owned(),
        data: SubmittedFeedback {
            feedback_id: created.feedback_id,
            rating: created.rating,
            submitted_at: created.submitted_at,
        },
    }))
}

/// List the authenticated caller's own feedback, newest first.
#[utoipa::path(
    get,
    path = "/api/feedback/user",
    responses(
        (status = 200, description = "The caller's records", body = UserFeedbackResponse),
        (status = 401, description = "Authentication required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "userFeedback",
    security(("BearerToken" = []))
)]
#[get("/user")]
pub async fn user_feedback(
    state: web::Data<HttpState>,
    user: RequiredUser,
) -> ApiResult<web::Json<UserFeedbackResponse>> {
    let records = state
        .feedback
        .list_for_user(&user.0)
        .await
        .map_err(map_service_error)?;

    let feedbacks: Vec<FeedbackItem> = records.into_iter().map(Into::into).collect();
    Ok(web::Json(UserFeedbackResponse {
        success: true,
        data: UserFeedbackData {
            total: feedbacks.len(),
            feedbacks,
        },
    }))
}

/// Aggregate statistics over all feedback.
#[utoipa::path(
    get,
    path = "/api/feedback/stats",
    responses(
        (status = 200, description = "Aggregate statistics", body = FeedbackStatsResponse),
        (status = 401, description = "Authentication required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "feedbackStats",
    security(("BearerToken" = []))
)]
#[get("/stats")]
pub async fn feedback_stats(
    state: web::Data<HttpState>,
    _user: RequiredUser,
) -> ApiResult<web::Json<FeedbackStatsResponse>> {
    let stats = state.feedback.stats().await.map_err(map_service_error)?;
    Ok(web::Json(FeedbackStatsResponse {
        success: true,
        data: stats,
    }))
}

#[cfg(test)]
#[path = "feedback_tests.rs"]
mod tests;
