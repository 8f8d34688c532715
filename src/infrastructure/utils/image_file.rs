use std::{io, path::Path};
use tokio::fs;

use derive_more::Display;
use infer::Infer;

use crate::entities::image::UploadedFile;
use crate::errors::AppError;

pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Reads an uploaded temp file and checks it really is a supported image.
///
/// - `original_filename`: The filename from TempFile::file_name
/// - `file_path`: The path from TempFile::file.path()
/// - `max_size`: Max size in bytes
pub async fn read_image_file(
    original_filename: Option<&str>,
    file_path: &Path,
    max_size: usize,
) -> Result<UploadedFile, ImageFileError> {
    let metadata = fs::metadata(file_path).await.map_err(ImageFileError::IoError)?;
    if metadata.len() == 0 {
        return Err(ImageFileError::EmptyFile);
    }
    if metadata.len() > max_size as u64 {
        return Err(ImageFileError::FileTooLarge(max_size));
    }

    let bytes = fs::read(file_path).await.map_err(ImageFileError::IoError)?;
    check_image_bytes(&bytes)?;

    let file_name = original_filename
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "upload".to_string());

    Ok(UploadedFile { file_name, bytes })
}

/// Sniffs the magic bytes; the declared content type is never trusted.
pub fn check_image_bytes(bytes: &[u8]) -> Result<&'static str, ImageFileError> {
    let infer = Infer::new();
    match infer.get(bytes) {
        Some(kind) if ALLOWED_MIME_TYPES.contains(&kind.mime_type()) => Ok(kind.mime_type()),
        Some(kind) => Err(ImageFileError::InvalidType(kind.mime_type().to_string())),
        None => Err(ImageFileError::InvalidType("unknown".to_string())),
    }
}

#[derive(Debug, Display)]
pub enum ImageFileError {
    #[display("Unsupported file type: {_0}. Only JPEG, PNG and WebP are accepted.")]
    InvalidType(String),

    #[display("File is empty.")]
    EmptyFile,

    #[display("File exceeds the maximum size of {_0} bytes.")]
    FileTooLarge(usize),

    #[display("Failed to read file: {_0}")]
    IoError(io::Error),
}

impl From<ImageFileError> for AppError {
    fn from(err: ImageFileError) -> Self {
        match err {
            ImageFileError::IoError(e) => AppError::InternalError(format!("Failed to read upload: {}", e)),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}
