//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and
//! must never be exposed to the domain. They exist solely to satisfy
//! Diesel's type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::feedbacks;

/// Row struct for the caller-visible projection of a feedback record.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedbacks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedbackRow {
    pub id: Uuid,
    pub rating: i16,
    pub main_content: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new feedback records.
///
/// `created_at` is omitted deliberately; the store default stamps it.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feedbacks)]
pub(crate) struct NewFeedbackRow<'a> {
    pub id: Uuid,
    pub user_id: &'a str,
    pub session_id: &'a str,
    pub request_id: &'a str,
    pub rating: i16,
    pub main_content: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub ip_address: &'a str,
    pub user_agent: &'a str,
}
