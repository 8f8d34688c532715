use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    errors::AppError,
    use_cases::extractors::{AdminClaims, AuthClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(state, claims))]
pub async fn me(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let user = state.user_handler.me(&actor.id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[instrument(skip(_claims, state))]
pub async fn list_users(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let users = state.user_handler.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[instrument(skip(_claims, state))]
pub async fn get_user(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user_id = valid_uuid(&user_id)?;
    let user = state.user_handler.get_user_with_albums(&user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}
