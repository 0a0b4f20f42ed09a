//! PostgreSQL-backed `FeedbackRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FeedbackRepository, FeedbackRepositoryError};
use crate::domain::{FeedbackRecord, NewFeedbackRecord, Rating, UserId};

use super::models::{FeedbackRow, NewFeedbackRow};
use super::pool::{DbPool, PoolError};
use super::schema::feedbacks;

/// Diesel-backed implementation of the feedback repository port.
#[derive(Clone)]
pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FeedbackRepositoryError {
    FeedbackRepositoryError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> FeedbackRepositoryError {
    FeedbackRepositoryError::query(error.to_string())
}

/// Re-validate a stored rating on the way out of the database.
///
/// The column carries a CHECK constraint, so a failure here means the
/// store was modified out of band.
fn decode_rating(raw: i16) -> Result<Rating, FeedbackRepositoryError> {
    Rating::new(i64::from(raw))
        .map_err(|err| FeedbackRepositoryError::query(format!("stored rating {raw} invalid: {err}")))
}

fn row_to_record(row: FeedbackRow) -> Result<FeedbackRecord, FeedbackRepositoryError> {
    let FeedbackRow {
        id,
        rating,
        main_content,
        comment,
        created_at,
    } = row;

    Ok(FeedbackRecord {
        id,
        rating: decode_rating(rating)?,
        main_content,
        comment,
        created_at,
    })
}

#[async_trait]
impl FeedbackRepository for DieselFeedbackRepository {
    async fn insert(&self, record: &NewFeedbackRecord) -> Result<(), FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewFeedbackRow {
            id: record.id,
            user_id: record.user_key.as_str(),
            session_id: record.session_id.as_str(),
            request_id: record.request_id.as_str(),
            rating: record.rating.as_i16(),
            main_content: record.main_content.as_deref(),
            comment: record.comment.as_deref(),
            ip_address: record.ip_address.as_str(),
            user_agent: record.user_agent.as_str(),
        };

        diesel::insert_into(feedbacks::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<FeedbackRecord>, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FeedbackRow> = feedbacks::table
            .filter(feedbacks::user_id.eq(user.as_str()))
            .order((feedbacks::created_at.desc(), feedbacks::id.desc()))
            .limit(limit)
            .select(FeedbackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn rating_counts(&self) -> Result<Vec<(Rating, i64)>, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i16, i64)> = feedbacks::table
            .group_by(feedbacks::rating)
            .select((feedbacks::rating, count_star()))
            .order(feedbacks::rating.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(raw, count)| decode_rating(raw).map(|rating| (rating, count)))
            .collect()
    }
}
