use actix_web::{http::header, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    errors::AppError,
    use_cases::extractors::AuthClaims,
    utils::valid_uuid::valid_uuid,
    AppState,
};

/// Streams the album as a zip while it is being built.
#[instrument(skip(state, claims))]
pub async fn download_archive(
    state: web::Data<AppState>,
    claims: AuthClaims,
    album_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let actor = claims.actor()?;
    let album_id = valid_uuid(&album_id)?;

    let plan = state.archive_handler.plan_archive(Some(&actor), &album_id).await?;
    let body = state.zip_streamer.stream(plan.entries);

    Ok(HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", plan.file_name),
        ))
        .streaming(body))
}
