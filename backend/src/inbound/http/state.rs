//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain service and ports, and remain testable without
//! I/O.

use std::sync::Arc;

use crate::domain::FeedbackService;
use crate::domain::ports::TokenVerifier;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub feedback: FeedbackService,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl HttpState {
    /// Construct state from the service and verifier.
    pub fn new(feedback: FeedbackService, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { feedback, verifier }
    }
}
