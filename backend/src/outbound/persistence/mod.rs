//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Concrete implementation of the `FeedbackRepository` port, backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapter**: the repository only translates between Diesel rows
//!   and domain types; no business logic lives here.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   definition (`schema.rs`) never leak to the domain layer.
//! - **Strongly typed errors**: pool and query failures map to
//!   `FeedbackRepositoryError` variants; nothing is swallowed or retried.

mod diesel_feedback_repository;
mod models;
mod pool;
mod schema;

pub use diesel_feedback_repository::DieselFeedbackRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
