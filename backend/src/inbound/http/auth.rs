//! Authentication extractors.
//!
//! Required and optional authentication are two extractor types composed
//! per route, not one extractor with a flag: a handler taking
//! [`RequiredUser`] can only run with a resolved identity, and a handler
//! taking [`MaybeUser`] states explicitly that anonymous callers are fine.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Identity, UserId};
use crate::inbound::http::state::HttpState;
use crate::models::Error;

const BEARER_PREFIX: &str = "Bearer ";

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix(BEARER_PREFIX)
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal_with_detail("HttpState missing from app data"))
}

fn auth_required() -> Error {
    Error::auth_required("User authentication required")
}

/// Extractor for routes that require a resolved identity.
///
/// A missing, malformed, or unknown bearer token terminates the request
/// with `401 AUTH_REQUIRED` before the handler runs.
pub struct RequiredUser(pub UserId);

impl FromRequest for RequiredUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = http_state(&req)?;
            let Some(token) = bearer_token(&req) else {
                return Err(auth_required());
            };
            match state.verifier.verify(&token).await {
                Ok(Some(user)) => Ok(Self(user)),
                Ok(None) => Err(auth_required()),
                Err(error) => {
                    warn!(error = %error, "token verification failed on protected route");
                    Err(auth_required())
                }
            }
        })
    }
}

/// Extractor for routes where authentication is optional.
///
/// A missing or unresolvable token yields [`Identity::Anonymous`]; the
/// request always proceeds.
pub struct MaybeUser(pub Identity);

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = http_state(&req)?;
            let Some(token) = bearer_token(&req) else {
                return Ok(Self(Identity::Anonymous));
            };
            match state.verifier.verify(&token).await {
                Ok(Some(user)) => Ok(Self(Identity::Known(user))),
                Ok(None) => Ok(Self(Identity::Anonymous)),
                Err(error) => {
                    warn!(error = %error, "token verification failed; treating caller as anonymous");
                    Ok(Self(Identity::Anonymous))
                }
            }
        })
    }
}
