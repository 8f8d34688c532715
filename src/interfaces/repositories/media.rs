use async_trait::async_trait;

use crate::{
    entities::image::{StoredMedia, UploadedFile},
    errors::AppError,
};

/// Remote image storage with a derived watermarked rendition.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, folder: &str, file: &UploadedFile) -> Result<StoredMedia, AppError>;
    async fn destroy(&self, public_id: &str) -> Result<(), AppError>;
}
