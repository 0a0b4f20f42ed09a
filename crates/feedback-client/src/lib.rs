//! Typed client for the feedback API.
//!
//! A [`FeedbackClient`] owns one browsing-session identifier, generated at
//! construction and sent as `X-Session-ID` on every call; each request
//! additionally carries a fresh `X-Request-ID`. A bearer token is attached
//! only when one was configured. Non-2xx responses surface the server's
//! message as [`ClientError::Api`]; transport problems surface as
//! [`ClientError::Transport`]. The [`FeedbackClient::health`] probe never
//! fails — it reports unreachability as a failure-shaped result instead.

use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Header carrying the browsing-session identifier.
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Header carrying the per-request correlation identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Errors raised by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a failure envelope.
    #[error("{message}")]
    Api {
        /// HTTP status of the response.
        status: u16,
        /// Machine-readable error code, when the server supplied one.
        code: Option<String>,
        /// The server's human-readable message.
        message: String,
    },

    /// The request never completed.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

/// Payload for submitting feedback.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitFeedback {
    pub rating: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl SubmitFeedback {
    /// A submission with just a rating.
    pub fn new(rating: i64) -> Self {
        Self {
            rating,
            main_content: None,
            comment: None,
        }
    }

    /// Attach the free-text body.
    #[must_use]
    pub fn with_main_content(mut self, main_content: impl Into<String>) -> Self {
        self.main_content = Some(main_content.into());
        self
    }

    /// Attach the short comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Receipt returned for a stored submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedFeedback {
    pub feedback_id: Uuid,
    pub rating: i64,
    pub submitted_at: DateTime<Utc>,
}

/// One record from the caller's own listing.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub rating: i64,
    pub main_content: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The caller's records plus their count.
#[derive(Debug, Clone, Deserialize)]
pub struct UserFeedbackPage {
    pub feedbacks: Vec<FeedbackEntry>,
    pub total: usize,
}

/// Aggregate statistics over all feedback.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackStats {
    pub total_feedbacks: i64,
    pub average_rating: Option<f64>,
    pub five_star_count: i64,
    pub positive_count: i64,
    pub negative_count: i64,
}

/// Liveness report; `success` is `false` when the API is unreachable.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
    code: Option<String>,
}

fn generate_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let envelope: ErrorEnvelope = serde_json::from_slice(body).unwrap_or(ErrorEnvelope {
        message: None,
        code: None,
    });
    ClientError::Api {
        status: status.as_u16(),
        code: envelope.code,
        message: envelope
            .message
            .unwrap_or_else(|| format!("request failed with status {status}")),
    }
}

fn parse_data<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ClientError> {
    if !status.is_success() {
        return Err(api_error(status, body));
    }
    serde_json::from_slice::<DataEnvelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|err| ClientError::Decode {
            message: err.to_string(),
        })
}

/// Client for the feedback API.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
    token: Option<String>,
}

impl FeedbackClient {
    /// Create a client for the given base URL, e.g. `http://localhost:3001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            http: reqwest::Client::new(),
            base_url,
            session_id: generate_id(),
            token: None,
        }
    }

    /// Attach a bearer token for authenticated calls.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The session identifier sent with every request.
    pub fn session_id(&self) -> &str {
        self.session_id.as_str()
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{path}", self.base_url))
            .header(SESSION_ID_HEADER, self.session_id.as_str())
            .header(REQUEST_ID_HEADER, generate_id());
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn call<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        parse_data(status, &body)
    }

    /// Submit feedback. Works with or without a configured token.
    pub async fn submit_feedback(
        &self,
        feedback: &SubmitFeedback,
    ) -> Result<SubmittedFeedback, ClientError> {
        self.call(self.request(Method::POST, "/api/feedback").json(feedback))
            .await
    }

    /// List the authenticated caller's own feedback.
    pub async fn user_feedback(&self) -> Result<UserFeedbackPage, ClientError> {
        self.call(self.request(Method::GET, "/api/feedback/user"))
            .await
    }

    /// Fetch aggregate statistics.
    pub async fn feedback_stats(&self) -> Result<FeedbackStats, ClientError> {
        self.call(self.request(Method::GET, "/api/feedback/stats"))
            .await
    }

    /// Probe API liveness. Never fails: unreachability and malformed
    /// responses yield a failure-shaped [`HealthStatus`] instead.
    pub async fn health(&self) -> HealthStatus {
        self.try_health().await.unwrap_or(HealthStatus {
            success: false,
            message: "API is not available".to_owned(),
            timestamp: None,
            version: None,
        })
    }

    async fn try_health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.request(Method::GET, "/health").send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        serde_json::from_slice(&body).map_err(|err| ClientError::Decode {
            message: err.to_string(),
        })
    }
}
