//! Feedback service library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod models;
pub mod outbound;

#[cfg(test)]
pub mod test_support;

/// Request-correlation middleware applied to every route.
pub use middleware::correlate::Correlate;
