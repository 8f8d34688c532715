use actix_web::{http::header, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::album::{AccessChangeRequest, NewAlbumRequest, UpdateAlbumRequest},
    errors::AppError,
    use_cases::extractors::{AdminClaims, AuthClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

// ───── Client ────────────────────────────────────────────────────────

#[instrument(skip(state, claims))]
pub async fn list_albums(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let albums = state.album_handler.list_for_actor(&actor).await?;
    Ok(HttpResponse::Ok().json(albums))
}

#[instrument(skip(state, claims))]
pub async fn get_album(
    state: web::Data<AppState>,
    claims: AuthClaims,
    album_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let album_id = valid_uuid(&album_id)?;

    let album = state.album_handler.get_album_view(Some(&actor), &album_id).await?;
    Ok(HttpResponse::Ok().json(album))
}

/// Redirects to the full-resolution asset of one image.
#[instrument(skip(state, claims))]
pub async fn download_image(
    state: web::Data<AppState>,
    claims: AuthClaims,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let (album_id, image_id) = path.into_inner();
    let album_id = valid_uuid(&album_id)?;
    let image_id = valid_uuid(&image_id)?;

    let url = state
        .album_handler
        .original_image_url(Some(&actor), &album_id, &image_id)
        .await?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url))
        .finish())
}

#[instrument(skip(state))]
pub async fn portfolio(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let albums = state.album_handler.portfolio().await?;
    Ok(HttpResponse::Ok().json(albums))
}

// ───── Admin ─────────────────────────────────────────────────────────

#[instrument(skip(claims, state, data))]
pub async fn create_album(
    claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewAlbumRequest>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let album = state.album_handler.create_album(&actor, data.into_inner()).await?;
    Ok(HttpResponse::Created().json(album))
}

#[instrument(skip(_claims, state))]
pub async fn list_all_albums(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let albums = state.album_handler.list_all_albums().await?;
    Ok(HttpResponse::Ok().json(albums))
}

#[instrument(skip(_claims, state))]
pub async fn get_album_detail(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let album_id = valid_uuid(&album_id)?;
    let album = state.album_handler.get_album_detail(&album_id).await?;
    Ok(HttpResponse::Ok().json(album))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_album(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
    data: web::Json<UpdateAlbumRequest>,
) -> Result<impl Responder, AppError> {
    let album_id = valid_uuid(&album_id)?;
    let album = state.album_handler.update_album(&album_id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(album))
}

#[instrument(skip(_claims, state))]
pub async fn delete_album(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let album_id = valid_uuid(&album_id)?;
    let deleted = state.album_handler.delete_album(&album_id).await?;
    Ok(HttpResponse::Ok().json(deleted))
}

#[instrument(skip(_claims, state, data))]
pub async fn grant_access(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
    data: web::Json<AccessChangeRequest>,
) -> Result<impl Responder, AppError> {
    let album_id = valid_uuid(&album_id)?;
    let album = state.album_handler.grant_access(&album_id, &data.user_id).await?;
    Ok(HttpResponse::Ok().json(album))
}

#[instrument(skip(_claims, state))]
pub async fn revoke_access(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, AppError> {
    let (album_id, user_id) = path.into_inner();
    let album_id = valid_uuid(&album_id)?;
    let user_id = valid_uuid(&user_id)?;

    let album = state.album_handler.revoke_access(&album_id, &user_id).await?;
    Ok(HttpResponse::Ok().json(album))
}
