use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Selection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub album_id: Uuid,
    pub image_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin listing row: the selection joined with who made it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SelectionWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub image_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SaveSelectionRequest {
    pub image_ids: Vec<Uuid>,
}
