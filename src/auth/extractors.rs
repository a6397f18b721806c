use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use super::token::{Identity, TokenValidator};
use crate::error::{AppError, AuthError};

/// The identity behind a valid `Authorization: Bearer <token>` header.
///
/// Only the token is checked here. Handlers that need the full user pass
/// their store handle to `auth::current_user`.
#[derive(Debug, Clone)]
pub struct BearerIdentity(pub Identity);

impl FromRequest for BearerIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_identity(req))
    }
}

fn extract_identity(req: &HttpRequest) -> Result<BearerIdentity, AppError> {
    let validator = req
        .app_data::<web::Data<TokenValidator>>()
        .ok_or_else(|| AppError::InternalServerError("TokenValidator is not registered".into()))?;

    let token = bearer_token(req).ok_or_else(|| {
        log::debug!("no bearer token on {}", req.path());
        AuthError::TokenInvalid
    })?;

    Ok(BearerIdentity(validator.validate(token)?))
}

/// Pulls the token out of `Authorization: Bearer <token>`. The scheme is matched
/// case-insensitively.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
