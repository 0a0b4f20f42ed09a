//! Correlation middleware attaching a request identifier to every request.
//!
//! Clients may supply their own identifier in `X-Request-ID`; otherwise a
//! UUID is generated. The resolved identifier lives in task-local storage
//! for the duration of the request and is echoed back on the response, so
//! client, log line, and persisted record all agree.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`RequestId::scope`] when moving work onto another task to keep the
//! active identifier in scope.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::future::Future;
use tokio::task_local;
use tracing::{error, info};
use uuid::Uuid;

/// Header carrying the per-request correlation identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

task_local! {
    static REQUEST_ID: RequestId;
}

/// Per-request correlation identifier exposed via task-local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a client-supplied identifier when it is reasonably shaped.
    fn from_header_value(value: &HeaderValue) -> Option<Self> {
        let raw = value.to_str().ok()?.trim();
        if raw.is_empty() || raw.len() > MAX_REQUEST_ID_LEN {
            return None;
        }
        Some(Self(raw.to_owned()))
    }

    fn resolve(req: &ServiceRequest) -> Self {
        req.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(Self::from_header_value)
            .unwrap_or_else(Self::generate)
    }

    /// Returns the current request identifier if one is in scope.
    pub fn current() -> Option<Self> {
        REQUEST_ID.try_with(Clone::clone).ok()
    }

    /// Execute the provided future with the supplied identifier in scope.
    pub async fn scope<Fut>(request_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_ID.scope(request_id, fut).await
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Middleware resolving the request identifier and logging each request.
///
/// Handlers can read the identifier via [`RequestId::current`].
#[derive(Clone)]
pub struct Correlate;

impl<S, B> Transform<S, ServiceRequest> for Correlate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorrelateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorrelateMiddleware { service }))
    }
}

/// Service wrapper produced by [`Correlate`].
pub struct CorrelateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorrelateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::resolve(&req);
        info!(
            method = %req.method(),
            path = %req.path(),
            peer = req.connection_info().realip_remote_addr().unwrap_or("unknown"),
            request_id = %request_id,
            "handling request"
        );

        let header_value = request_id.to_string();
        let fut = self.service.call(req);
        Box::pin(RequestId::scope(request_id, async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&header_value) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }
                Err(err) => {
                    error!(error = %err, "failed to encode request identifier header");
                }
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(RequestId::current().is_none());
    }

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = RequestId::generate();
        let observed =
            RequestId::scope(expected.clone(), async move { RequestId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[actix_web::test]
    async fn generates_an_identifier_when_absent() {
        let app = test::init_service(
            App::new()
                .wrap(Correlate)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let header = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("request id header")
            .to_str()
            .expect("ascii header");
        Uuid::parse_str(header).expect("generated identifier is a UUID");
    }

    #[actix_web::test]
    async fn echoes_a_client_supplied_identifier() {
        let app = test::init_service(
            App::new()
                .wrap(Correlate)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "client-req-1"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(
            res.headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("client-req-1")
        );
    }

    #[actix_web::test]
    async fn handlers_observe_the_resolved_identifier() {
        let app = test::init_service(App::new().wrap(Correlate).route(
            "/",
            web::get().to(|| async move {
                let id = RequestId::current().expect("request id in scope");
                HttpResponse::Ok().body(id.to_string())
            }),
        ))
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "client-req-2"))
            .to_request();
        let res = test::call_service(&app, req).await;
        let body = test::read_body(res).await;
        assert_eq!(body, "client-req-2");
    }

    #[actix_web::test]
    async fn oversized_identifiers_are_replaced() {
        let app = test::init_service(
            App::new()
                .wrap(Correlate)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let oversized = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, oversized.clone()))
            .to_request();
        let res = test::call_service(&app, req).await;

        let header = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("request id header")
            .to_str()
            .expect("ascii header");
        assert_ne!(header, oversized);
        Uuid::parse_str(header).expect("replacement is a UUID");
    }
}
