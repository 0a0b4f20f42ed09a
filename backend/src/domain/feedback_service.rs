//! Feedback business logic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use super::ports::{FeedbackRepository, FeedbackRepositoryError};
use super::{
    FeedbackRecord, FeedbackStats, FeedbackSubmission, Identity, NewFeedbackRecord, Rating,
    SubmissionContext, UserId,
};

/// Maximum number of records returned by [`FeedbackService::list_for_user`].
pub const USER_FEEDBACK_LIMIT: i64 = 50;

/// Errors raised by the feedback service.
///
/// Once validation has passed there is no business-grounds rejection; the
/// only way an operation fails is the store failing underneath it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackServiceError {
    #[error(transparent)]
    Storage(#[from] FeedbackRepositoryError),
}

/// Result of a successful create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedFeedback {
    pub feedback_id: Uuid,
    pub rating: Rating,
    pub submitted_at: DateTime<Utc>,
}

/// Create, list, and aggregate feedback records.
#[derive(Clone)]
pub struct FeedbackService {
    repository: Arc<dyn FeedbackRepository>,
    clock: Arc<dyn Clock>,
}

impl FeedbackService {
    /// Construct the service over a repository and a clock.
    pub fn new(repository: Arc<dyn FeedbackRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Persist a validated submission and return its receipt.
    pub async fn create(
        &self,
        submission: FeedbackSubmission,
        identity: &Identity,
        context: SubmissionContext,
    ) -> Result<CreatedFeedback, FeedbackServiceError> {
        let record = NewFeedbackRecord {
            id: Uuid::new_v4(),
            user_key: identity.storage_key().to_owned(),
            session_id: context.session_id,
            request_id: context.request_id,
            rating: submission.rating,
            main_content: submission.main_content,
            comment: submission.comment,
            ip_address: context.ip_address,
            user_agent: context.user_agent,
        };

        self.repository.insert(&record).await?;
        info!(feedback_id = %record.id, user = %record.user_key, "feedback recorded");

        Ok(CreatedFeedback {
            feedback_id: record.id,
            rating: record.rating,
            submitted_at: self.clock.utc(),
        })
    }

    /// The caller's own records, newest first, capped at
    /// [`USER_FEEDBACK_LIMIT`].
    pub async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<FeedbackRecord>, FeedbackServiceError> {
        self.repository
            .list_for_user(user, USER_FEEDBACK_LIMIT)
            .await
            .map_err(Into::into)
    }

    /// Aggregate statistics over all records.
    pub async fn stats(&self) -> Result<FeedbackStats, FeedbackServiceError> {
        let counts = self.repository.rating_counts().await?;
        Ok(FeedbackStats::from_rating_counts(&counts))
    }
}
