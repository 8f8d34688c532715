use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::image::{Image, ImageView};

const MAX_TITLE_LENGTH: u64 = 150;
const MAX_DESCRIPTION_LENGTH: u64 = 2000;
const MAX_EVENT_TYPE_LENGTH: u64 = 50;

// ───── Database Models ───────────────────────────────────────────────

/// An album row together with its access set.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_type: Option<String>,
    /// Minor currency units. Zero means no price has been set.
    pub price_minor: i64,
    pub owner_id: Uuid,
    pub access_users: Vec<Uuid>,
    pub is_visible: bool,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Album {
    pub fn is_owner(&self, user_id: &Uuid) -> bool {
        self.owner_id == *user_id
    }

    pub fn is_member(&self, user_id: &Uuid) -> bool {
        self.access_users.contains(user_id)
    }
}

#[derive(Debug, Clone)]
pub struct AlbumInsert {
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_type: Option<String>,
    pub price_minor: i64,
    pub owner_id: Uuid,
    pub access_users: Vec<Uuid>,
    pub is_visible: bool,
    pub paid: bool,
}

/// Lightweight row used by every listing endpoint.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AlbumSummary {
    pub id: Uuid,
    pub title: String,
    pub event_date: Option<NaiveDate>,
    pub event_type: Option<String>,
    pub price_minor: i64,
    pub is_visible: bool,
    pub paid: bool,
    pub image_count: i64,
    pub created_at: DateTime<Utc>,
}

// ───── Requests ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewAlbumRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required"))]
    pub title: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub event_date: Option<NaiveDate>,

    #[validate(length(max = MAX_EVENT_TYPE_LENGTH))]
    pub event_type: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_minor: i64,

    #[serde(default)]
    pub is_visible: bool,

    #[serde(default)]
    pub paid: bool,

    #[serde(default)]
    pub access_users: Vec<Uuid>,
}

impl NewAlbumRequest {
    pub fn into_insert(self, owner_id: Uuid) -> AlbumInsert {
        let mut access_users = self.access_users;
        access_users.sort();
        access_users.dedup();

        AlbumInsert {
            title: self.title.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            event_date: self.event_date,
            event_type: self.event_type.filter(|t| !t.trim().is_empty()),
            price_minor: self.price_minor,
            owner_id,
            access_users,
            is_visible: self.is_visible,
            paid: self.paid,
        }
    }
}

/// Partial update. `None` keeps the stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAlbumRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title: Option<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub event_date: Option<NaiveDate>,

    #[validate(length(max = MAX_EVENT_TYPE_LENGTH))]
    pub event_type: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_minor: Option<i64>,

    pub is_visible: Option<bool>,

    pub paid: Option<bool>,
}

impl UpdateAlbumRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.event_date.is_none()
            && self.event_type.is_none()
            && self.price_minor.is_none()
            && self.is_visible.is_none()
            && self.paid.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct AccessChangeRequest {
    pub user_id: Uuid,
}

// ───── Responses ─────────────────────────────────────────────────────

/// What a client sees: every image URL already resolved by the access guard.
#[derive(Debug, Serialize)]
pub struct AlbumView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_type: Option<String>,
    pub price_minor: i64,
    pub is_visible: bool,
    pub paid: bool,
    pub full_access: bool,
    pub total_images: usize,
    pub images: Vec<ImageView>,
}

/// Admin view with both URLs and the access set.
#[derive(Debug, Serialize)]
pub struct AlbumDetail {
    #[serde(flatten)]
    pub album: Album,
    pub images: Vec<Image>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PortfolioAlbum {
    pub id: Uuid,
    pub title: String,
    pub event_date: Option<NaiveDate>,
    pub event_type: Option<String>,
    pub cover_url: Option<String>,
    pub image_count: i64,
}

#[derive(Debug, Serialize)]
pub struct AlbumDeletedResponse {
    pub id: Uuid,
    pub images_removed: usize,
}
