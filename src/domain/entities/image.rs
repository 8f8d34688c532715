use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::access::Delivery;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Image {
    pub id: Uuid,
    pub album_id: Uuid,
    pub url: String,
    pub watermarked_url: String,
    pub public_id: String,
    pub position: i32,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
}

impl Image {
    pub fn url_for(&self, delivery: Delivery) -> &str {
        match delivery {
            Delivery::Original => &self.url,
            Delivery::Watermarked => &self.watermarked_url,
        }
    }
}

/// A freshly stored asset waiting to be attached to an album.
#[derive(Debug, Clone)]
pub struct ImageInsert {
    pub url: String,
    pub watermarked_url: String,
    pub public_id: String,
}

/// Multipart body of an upload: one or more `images` parts.
#[derive(Debug, MultipartForm)]
pub struct ImageUploadForm {
    #[multipart(rename = "images", limit = "25MB")]
    pub images: Vec<TempFile>,
}

/// Raw upload handed over by the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMedia {
    pub url: String,
    pub watermarked_url: String,
    pub public_id: String,
}

impl From<StoredMedia> for ImageInsert {
    fn from(media: StoredMedia) -> Self {
        ImageInsert {
            url: media.url,
            watermarked_url: media.watermarked_url,
            public_id: media.public_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageView {
    pub id: Uuid,
    pub url: String,
    pub visible: bool,
}

impl ImageView {
    pub fn from_image(image: &Image, delivery: Delivery) -> Self {
        ImageView {
            id: image.id,
            url: image.url_for(delivery).to_string(),
            visible: image.visible,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ImageIdsRequest {
    pub image_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ImageVisibilityRequest {
    pub image_ids: Vec<Uuid>,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct ImagesDeletedResponse {
    pub deleted: Vec<Uuid>,
    pub not_found: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ImagesUploadedResponse {
    pub album_id: Uuid,
    pub images: Vec<Image>,
}
