//! Aggregate feedback statistics.
//!
//! The persistence layer supplies a per-rating histogram; the arithmetic
//! lives here so the invariants are testable without a database.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Rating;

/// Aggregate counters over all persisted feedback.
///
/// ## Invariants
/// - `five_star_count <= positive_count <= total_feedbacks`
/// - `negative_count <= total_feedbacks`
/// - `average_rating` is `None` exactly when `total_feedbacks == 0`, and
///   within `[1.0, 5.0]` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedbackStats {
    /// Count of all records.
    pub total_feedbacks: i64,
    /// Mean rating, absent while no feedback exists.
    pub average_rating: Option<f64>,
    /// Records rated exactly 5.
    pub five_star_count: i64,
    /// Records rated 4 or 5.
    pub positive_count: i64,
    /// Records rated 2 or below.
    pub negative_count: i64,
}

impl FeedbackStats {
    /// Statistics over an empty store.
    pub fn empty() -> Self {
        Self {
            total_feedbacks: 0,
            average_rating: None,
            five_star_count: 0,
            positive_count: 0,
            negative_count: 0,
        }
    }

    /// Derive the aggregate counters from a rating histogram.
    pub fn from_rating_counts(counts: &[(Rating, i64)]) -> Self {
        let mut total = 0_i64;
        let mut weighted_sum = 0_i64;
        let mut five_star = 0_i64;
        let mut positive = 0_i64;
        let mut negative = 0_i64;

        for (rating, count) in counts {
            let value = i64::from(rating.value());
            total += count;
            weighted_sum += value * count;
            if value == 5 {
                five_star += count;
            }
            if value >= 4 {
                positive += count;
            }
            if value <= 2 {
                negative += count;
            }
        }

        #[expect(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
        let average_rating = (total > 0).then(|| weighted_sum as f64 / total as f64);

        Self {
            total_feedbacks: total,
            average_rating,
            five_star_count: five_star,
            positive_count: positive,
            negative_count: negative,
        }
    }
}
