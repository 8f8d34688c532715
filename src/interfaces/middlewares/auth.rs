use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    constants::ADMIN_PREFIX,
    entities::token::Claims,
    errors::AuthError,
    repositories::token::TokenIssuer,
    AppState,
};

pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let path = req.path().trim_end_matches('/').to_string();
            let method = req.method().as_str().to_string();

            if is_public_route(&path, &method) {
                return service.call(req).await;
            }

            let claims = match get_valid_claims(&req) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::warn!(%path, error = %e, "Rejected unauthenticated request");
                    return Ok(error_response(req, e));
                }
            };

            if let Err(e) = enforce_admin_access(&path, &claims) {
                return Ok(error_response(req, e));
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

fn is_public_route(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return true;
    }

    matches!(
        (path, method),
        ("", "GET") |
        ("/api/v1/health", "GET") |
        ("/api/v1/portfolio", "GET") |
        ("/api/v1/auth/login", "POST") |
        ("/api/v1/auth/register", "POST") |
        ("/api/v1/auth/refresh-token", "POST") |
        ("/api/v1/payments/webhook", "POST")
    )
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn get_valid_claims(req: &ServiceRequest) -> Result<Claims, AuthError> {
    let state = req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing in middleware");
            AuthError::MissingJwtService
        })?;

    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;
    state.auth_handler.tokens.verify_access_token(&token)
}

fn enforce_admin_access(path: &str, claims: &Claims) -> Result<(), AuthError> {
    let is_admin_path = path == ADMIN_PREFIX || path.starts_with(&format!("{}/", ADMIN_PREFIX));
    if is_admin_path && !claims.is_admin() {
        tracing::warn!(%path, user_id = %claims.sub, "Admin access required");
        return Err(AuthError::Forbidden("Admin access required".into()));
    }
    Ok(())
}

fn error_response(req: ServiceRequest, err: AuthError) -> ServiceResponse<BoxBody> {
    req.into_response(err.error_response())
}
