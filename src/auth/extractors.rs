use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;

/// The account id of the caller, as verified by `AuthMiddleware`.
///
/// Handlers take their scoping identity from this extractor only; ids found in
/// bodies or paths are never treated as the caller. Extraction fails with
/// `AppError::Unauthorized` on any route the middleware did not guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccountId(pub i64);

impl FromRequest for AuthenticatedAccountId {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedAccountId(claims.account_id()))),
            None => {
                log::error!("no verified claims on guarded route {}", req.path());
                let err = AppError::Unauthorized("Missing or invalid token".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
