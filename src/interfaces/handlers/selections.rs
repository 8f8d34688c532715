use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::selection::SaveSelectionRequest,
    errors::AppError,
    use_cases::extractors::{AdminClaims, AuthClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(state, claims, data))]
pub async fn save_selection(
    state: web::Data<AppState>,
    claims: AuthClaims,
    album_id: web::Path<String>,
    data: web::Json<SaveSelectionRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let album_id = valid_uuid(&album_id)?;

    let selection = state
        .selection_handler
        .save_selection(&actor, &album_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(selection))
}

#[instrument(skip(state, claims))]
pub async fn get_selection(
    state: web::Data<AppState>,
    claims: AuthClaims,
    album_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let album_id = valid_uuid(&album_id)?;

    let selection = state.selection_handler.get_selection(&actor, &album_id).await?;
    Ok(HttpResponse::Ok().json(selection))
}

#[instrument(skip(_claims, state))]
pub async fn list_album_selections(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let album_id = valid_uuid(&album_id)?;
    let selections = state.selection_handler.list_for_album(&album_id).await?;
    Ok(HttpResponse::Ok().json(selections))
}
