use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::image::{ImageIdsRequest, ImageUploadForm, ImageVisibilityRequest},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    utils::{image_file::read_image_file, valid_uuid::valid_uuid},
    AppState,
};

#[instrument(skip(_claims, state, form))]
pub async fn upload_images(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
    form: MultipartForm<ImageUploadForm>,
) -> Result<impl Responder, AppError> {
    let album_id = valid_uuid(&album_id)?;
    let form = form.into_inner();

    let mut files = Vec::with_capacity(form.images.len());
    for upload in &form.images {
        let file = read_image_file(
            upload.file_name.as_deref(),
            upload.file.path(),
            state.max_upload_bytes,
        )
        .await?;
        files.push(file);
    }

    let uploaded = state.album_handler.upload_images(&album_id, files).await?;
    Ok(HttpResponse::Created().json(uploaded))
}

#[instrument(skip(_claims, state, data))]
pub async fn delete_images(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
    data: web::Json<ImageIdsRequest>,
) -> Result<impl Responder, AppError> {
    let album_id = valid_uuid(&album_id)?;
    let result = state.album_handler.delete_images(&album_id, &data.image_ids).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[instrument(skip(_claims, state, data))]
pub async fn set_image_visibility(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
    data: web::Json<ImageVisibilityRequest>,
) -> Result<impl Responder, AppError> {
    let album_id = valid_uuid(&album_id)?;
    let images = state
        .album_handler
        .set_image_visibility(&album_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(images))
}
