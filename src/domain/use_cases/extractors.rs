use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{domain::access::Actor, entities::token::Claims, errors::AuthError};

/// Claims the auth middleware attached to the request.
fn attached_claims(req: &HttpRequest) -> Result<Claims, AuthError> {
    req.extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(AuthError::MissingCredentials)
}

/// Any signed-in account. Rejects with 401 when the middleware let the
/// request through without claims.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl AuthClaims {
    pub fn actor(&self) -> Result<Actor, AuthError> {
        self.0.actor()
    }
}

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(attached_claims(req).map(AuthClaims).map_err(Into::into))
    }
}

/// Admin accounts only: 401 without claims, 403 for clients.
#[derive(Debug)]
pub struct AdminClaims(pub Claims);

impl AdminClaims {
    pub fn actor(&self) -> Result<Actor, AuthError> {
        self.0.actor()
    }
}

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = attached_claims(req).and_then(|claims| {
            if claims.is_admin() {
                Ok(AdminClaims(claims))
            } else {
                Err(AuthError::Forbidden("Admin access required".into()))
            }
        });
        ready(result.map_err(Into::into))
    }
}
