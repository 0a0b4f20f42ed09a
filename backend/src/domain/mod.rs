//! Domain types, services, and ports.
//!
//! Everything in here is transport agnostic: no Actix types, no Diesel
//! types. Inbound adapters translate HTTP requests into these types and
//! outbound adapters persist them.

pub mod feedback;
pub mod feedback_service;
pub mod identity;
pub mod ports;
pub mod stats;

pub use feedback::{
    FeedbackRecord, FeedbackSubmission, MAX_COMMENT_CHARS, MAX_MAIN_CONTENT_CHARS,
    NewFeedbackRecord, Rating, RatingError, SubmissionContext,
};
pub use feedback_service::{
    CreatedFeedback, FeedbackService, FeedbackServiceError, USER_FEEDBACK_LIMIT,
};
pub use identity::{ANONYMOUS_USER_KEY, Identity, UserId, UserIdValidationError};
pub use stats::FeedbackStats;
