use actix_multipart::form::MultipartFormConfig;
use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    web,
};

use crate::errors::AppError;

const MAX_JSON_BYTES: usize = 256 * 1024;
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Extractor limits. Rejections render as `AppError::InvalidInput`.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_JSON_BYTES)
            .error_handler(|err, _req| json_rejection(err).into()),
    );

    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err: QueryPayloadError, _req| {
                AppError::InvalidInput(format!("Bad query string: {}", err)).into()
            }),
    );

    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(MAX_UPLOAD_BYTES)
            .error_handler(|err, _req| {
                tracing::warn!(error = %err, "Rejected multipart upload");
                AppError::InvalidInput(format!("Bad upload: {}", err)).into()
            }),
    );
}

fn json_rejection(err: JsonPayloadError) -> AppError {
    match err {
        JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            AppError::InvalidInput(format!("Body exceeds {} bytes", limit))
        }
        JsonPayloadError::ContentType => {
            AppError::InvalidInput("Expected Content-Type: application/json".to_string())
        }
        other => AppError::InvalidInput(format!("Bad JSON body: {}", other)),
    }
}
