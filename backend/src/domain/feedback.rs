//! Feedback entities.
//!
//! A feedback record is append-only: created exactly once, read back via the
//! caller's own listing or the aggregate statistics, never updated or
//! deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of the `main_content` field, in characters.
pub const MAX_MAIN_CONTENT_CHARS: usize = 5000;

/// Maximum length of the `comment` field, in characters.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// Validation error returned by [`Rating::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be between 1 and 5")]
pub struct RatingError;

/// A star rating, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Validate and construct a [`Rating`].
    pub fn new(value: i64) -> Result<Self, RatingError> {
        u8::try_from(value)
            .ok()
            .filter(|candidate| (1..=5).contains(candidate))
            .map(Self)
            .ok_or(RatingError)
    }

    /// The rating value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// The rating as stored in the `SMALLINT` column.
    pub fn as_i16(self) -> i16 {
        i16::from(self.0)
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        Self::from(value.0)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated feedback payload, produced by the validation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSubmission {
    pub rating: Rating,
    pub main_content: Option<String>,
    pub comment: Option<String>,
}

/// Transport-derived context captured alongside a submission.
///
/// Session and request identifiers are already resolved by the HTTP edge:
/// client-supplied when the correlation headers were present, freshly
/// generated otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    pub session_id: String,
    pub request_id: String,
    pub ip_address: String,
    pub user_agent: String,
}

/// A fully-populated record ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedbackRecord {
    pub id: Uuid,
    pub user_key: String,
    pub session_id: String,
    pub request_id: String,
    pub rating: Rating,
    pub main_content: Option<String>,
    pub comment: Option<String>,
    pub ip_address: String,
    pub user_agent: String,
}

/// The caller-visible projection of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub rating: Rating,
    pub main_content: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
