use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::selection::{Selection, SelectionWithUser},
    errors::AppError,
    repositories::sqlx_repo::SqlxSelectionRepo,
};

#[async_trait]
pub trait SelectionRepository: Send + Sync {
    /// One selection per (user, album); saving again replaces the image list.
    async fn upsert_selection(&self, user_id: &Uuid, album_id: &Uuid, image_ids: &[Uuid]) -> Result<Selection, AppError>;
    async fn get_selection(&self, user_id: &Uuid, album_id: &Uuid) -> Result<Option<Selection>, AppError>;
    async fn list_for_album(&self, album_id: &Uuid) -> Result<Vec<SelectionWithUser>, AppError>;
}

impl SqlxSelectionRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSelectionRepo { pool }
    }
}

#[async_trait]
impl SelectionRepository for SqlxSelectionRepo {
    async fn upsert_selection(&self, user_id: &Uuid, album_id: &Uuid, image_ids: &[Uuid]) -> Result<Selection, AppError> {
        sqlx::query_as::<_, Selection>(
            r#"
            INSERT INTO selections (user_id, album_id, image_ids)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, album_id)
            DO UPDATE SET image_ids = EXCLUDED.image_ids, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(album_id)
        .bind(image_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_selection(&self, user_id: &Uuid, album_id: &Uuid) -> Result<Option<Selection>, AppError> {
        sqlx::query_as::<_, Selection>(
            "SELECT * FROM selections WHERE user_id = $1 AND album_id = $2",
        )
        .bind(user_id)
        .bind(album_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_for_album(&self, album_id: &Uuid) -> Result<Vec<SelectionWithUser>, AppError> {
        sqlx::query_as::<_, SelectionWithUser>(
            r#"
            SELECT
                s.id, s.user_id, u.name AS user_name, u.email AS user_email,
                s.image_ids, s.created_at, s.updated_at
            FROM selections s
            JOIN users u ON u.id = s.user_id
            WHERE s.album_id = $1
            ORDER BY s.updated_at DESC
            "#,
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
