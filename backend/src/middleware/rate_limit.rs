//! Per-caller rate limiting for the submission endpoint.
//!
//! Fixed-window accounting: the first accepted request from a key opens a
//! window; requests beyond the limit are rejected with the 429 envelope
//! until the window expires, without extending or resetting it. The
//! increment-and-check runs under the map lock, so concurrent arrivals for
//! one key serialize.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::Error;
use actix_web::ResponseError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use chrono::{DateTime, TimeDelta, Utc};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use mockable::Clock;
use tracing::warn;

use crate::models;

const LIMIT_MESSAGE: &str = "Too many feedback submissions, please try again later";

/// Policy choosing the accounting key for a request.
///
/// The default keys on the peer network address; deployments behind a
/// shared NAT or proxy can substitute an identity-derived key instead.
pub trait RateLimitKey: Send + Sync {
    /// The accounting key for `req`.
    fn key(&self, req: &ServiceRequest) -> String;
}

/// Default key policy: the proxy-aware peer address.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeerIpKey;

impl RateLimitKey for PeerIpKey {
    fn key(&self, req: &ServiceRequest) -> String {
        req.connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_owned()
    }
}

/// Rate limiter policy knobs.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Accepted requests per key per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(15 * 60),
        }
    }
}

struct Window {
    started_at: DateTime<Utc>,
    count: u32,
}

struct Limiter {
    max_requests: u32,
    window: TimeDelta,
    clock: Arc<dyn Clock>,
    keys: Arc<dyn RateLimitKey>,
    windows: Mutex<HashMap<String, Window>>,
}

impl Limiter {
    fn try_acquire(&self, key: &str) -> bool {
        let now = self.clock.utc();
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let window = windows.entry(key.to_owned()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if now - window.started_at >= self.window {
            window.started_at = now;
            window.count = 0;
        }
        if window.count < self.max_requests {
            window.count += 1;
            true
        } else {
            false
        }
    }
}

/// Fixed-window rate limiting middleware.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<Limiter>,
}

impl RateLimit {
    /// Build a limiter with the default peer-address key policy.
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_key_policy(config, clock, Arc::new(PeerIpKey))
    }

    /// Build a limiter with a custom key policy.
    pub fn with_key_policy(
        config: RateLimitConfig,
        clock: Arc<dyn Clock>,
        keys: Arc<dyn RateLimitKey>,
    ) -> Self {
        // Windows beyond chrono's representable range clamp to the maximum.
        let window = TimeDelta::from_std(config.window).unwrap_or(TimeDelta::MAX);
        Self {
            limiter: Arc::new(Limiter {
                max_requests: config.max_requests,
                window,
                clock,
                keys,
                windows: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<Limiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = self.limiter.keys.key(&req);
        if self.limiter.try_acquire(&key) {
            let fut = self.service.call(req);
            Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
        } else {
            warn!(key = %key, "rate limit exceeded");
            let response = models::Error::rate_limited(LIMIT_MESSAGE).error_response();
            let res = req.into_response(response).map_into_right_body();
            Box::pin(ready(Ok(res)))
        }
    }
}
