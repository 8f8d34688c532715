use actix_web::{post, web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{
        token::RefreshTokenRequest,
        user::{LoginUser, NewUser},
    },
    errors::{AppError, AuthError},
    AppState,
};

#[post("/register")]
#[instrument(skip_all)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
    let created = state.auth_handler.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[post("/login")]
#[instrument(skip_all)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginUser>,
) -> Result<HttpResponse, AuthError> {
    let tokens = state.auth_handler.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

#[post("/refresh-token")]
#[instrument(skip_all)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    body: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AuthError> {
    let tokens = state.auth_handler.refresh_token(&body.refresh_token).await?;
    Ok(HttpResponse::Ok().json(tokens))
}
