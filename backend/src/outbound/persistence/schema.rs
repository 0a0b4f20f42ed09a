//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel
//! uses them for compile-time query validation and type-safe SQL
//! generation. Regenerate with `diesel print-schema` when migrations
//! change.

diesel::table! {
    /// Feedback submissions table, append-only.
    ///
    /// Rows are inserted once and never updated or deleted. The `id`
    /// column is the primary key (UUID v4, generated by the service).
    feedbacks (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Resolved caller identity, or the `anonymous` sentinel.
        user_id -> Varchar,
        /// Browsing-session correlation token.
        session_id -> Varchar,
        /// Per-request correlation token.
        request_id -> Varchar,
        /// Star rating, constrained to 1..=5.
        rating -> SmallInt,
        /// Optional free-text body (<= 5000 characters).
        main_content -> Nullable<Text>,
        /// Optional short comment (<= 1000 characters).
        comment -> Nullable<Text>,
        /// Peer address captured at submission time.
        ip_address -> Varchar,
        /// `User-Agent` header captured at submission time.
        user_agent -> Varchar,
        /// Insertion timestamp, set by the store.
        created_at -> Timestamptz,
    }
}
