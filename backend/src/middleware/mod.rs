//! Actix middleware for cross-cutting request policies.

pub mod correlate;
pub mod rate_limit;

pub use correlate::{Correlate, RequestId};
pub use rate_limit::{PeerIpKey, RateLimit, RateLimitConfig, RateLimitKey};
