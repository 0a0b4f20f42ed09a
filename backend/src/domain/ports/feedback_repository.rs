//! Port for feedback persistence.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{FeedbackRecord, NewFeedbackRecord, Rating, UserId};

/// Errors raised by feedback repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackRepositoryError {
    /// A connection could not be checked out of the pool.
    #[error("feedback store connection failed: {message}")]
    Connection { message: String },

    /// A query or mutation failed during execution.
    #[error("feedback store query failed: {message}")]
    Query { message: String },
}

impl FeedbackRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for writing feedback records and reading them back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persist a new record. Records are append-only; this never upserts.
    async fn insert(&self, record: &NewFeedbackRecord) -> Result<(), FeedbackRepositoryError>;

    /// Records owned by `user`, newest first, at most `limit`.
    async fn list_for_user(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<FeedbackRecord>, FeedbackRepositoryError>;

    /// Per-rating record counts over the whole store.
    async fn rating_counts(&self) -> Result<Vec<(Rating, i64)>, FeedbackRepositoryError>;
}

struct StoredFeedback {
    record: NewFeedbackRecord,
    created_at: DateTime<Utc>,
    seq: u64,
}

/// In-memory implementation for tests and I/O-free harnesses.
#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    rows: Mutex<Vec<StoredFeedback>>,
}

impl InMemoryFeedbackRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, Vec<StoredFeedback>> {
        self.rows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, record: &NewFeedbackRecord) -> Result<(), FeedbackRepositoryError> {
        let mut rows = self.lock_rows();
        let seq = rows.len() as u64;
        rows.push(StoredFeedback {
            record: record.clone(),
            created_at: Utc::now(),
            seq,
        });
        Ok(())
    }

    async fn list_for_user(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<FeedbackRecord>, FeedbackRepositoryError> {
        let rows = self.lock_rows();
        let mut owned: Vec<&StoredFeedback> = rows
            .iter()
            .filter(|row| row.record.user_key == user.as_str())
            .collect();
        owned.sort_by(|a, b| (b.created_at, b.seq).cmp(&(a.created_at, a.seq)));
        Ok(owned
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|row| FeedbackRecord {
                id: row.record.id,
                rating: row.record.rating,
                main_content: row.record.main_content.clone(),
                comment: row.record.comment.clone(),
                created_at: row.created_at,
            })
            .collect())
    }

    async fn rating_counts(&self) -> Result<Vec<(Rating, i64)>, FeedbackRepositoryError> {
        let rows = self.lock_rows();
        let mut counts: BTreeMap<Rating, i64> = BTreeMap::new();
        for row in rows.iter() {
            *counts.entry(row.record.rating).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
