use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::image::{Image, ImageInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxImageRepo,
};

#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Appends images after the album's current last position. New images start hidden.
    async fn add_images(&self, album_id: &Uuid, images: &[ImageInsert]) -> Result<Vec<Image>, AppError>;
    async fn list_images(&self, album_id: &Uuid) -> Result<Vec<Image>, AppError>;
    async fn get_image(&self, album_id: &Uuid, image_id: &Uuid) -> Result<Option<Image>, AppError>;
    /// Deletes only ids that belong to `album_id` and returns the removed rows.
    async fn delete_images(&self, album_id: &Uuid, image_ids: &[Uuid]) -> Result<Vec<Image>, AppError>;
    async fn set_visibility(&self, album_id: &Uuid, image_ids: &[Uuid], visible: bool) -> Result<Vec<Image>, AppError>;
}

impl SqlxImageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxImageRepo { pool }
    }
}

#[async_trait]
impl ImageRepository for SqlxImageRepo {
    async fn add_images(&self, album_id: &Uuid, images: &[ImageInsert]) -> Result<Vec<Image>, AppError> {
        let mut tx = self.pool.begin().await?;

        // row lock serialises concurrent uploads into the same album
        let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM albums WHERE id = $1 FOR UPDATE")
            .bind(album_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::NotFound("Album not found".to_string()));
        }

        let next_position: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM images WHERE album_id = $1",
        )
        .bind(album_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut created = Vec::with_capacity(images.len());
        for (offset, image) in images.iter().enumerate() {
            let row = sqlx::query_as::<_, Image>(
                r#"
                INSERT INTO images (album_id, url, watermarked_url, public_id, position, visible)
                VALUES ($1, $2, $3, $4, $5, FALSE)
                RETURNING *
                "#,
            )
            .bind(album_id)
            .bind(&image.url)
            .bind(&image.watermarked_url)
            .bind(&image.public_id)
            .bind(next_position + offset as i32)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        sqlx::query("UPDATE albums SET updated_at = NOW() WHERE id = $1")
            .bind(album_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn list_images(&self, album_id: &Uuid) -> Result<Vec<Image>, AppError> {
        sqlx::query_as::<_, Image>(
            "SELECT * FROM images WHERE album_id = $1 ORDER BY position, created_at",
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_image(&self, album_id: &Uuid, image_id: &Uuid) -> Result<Option<Image>, AppError> {
        sqlx::query_as::<_, Image>("SELECT * FROM images WHERE album_id = $1 AND id = $2")
            .bind(album_id)
            .bind(image_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete_images(&self, album_id: &Uuid, image_ids: &[Uuid]) -> Result<Vec<Image>, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query_as::<_, Image>(
            r#"
            DELETE FROM images
            WHERE album_id = $1 AND id = ANY($2)
            RETURNING *
            "#,
        )
        .bind(album_id)
        .bind(image_ids)
        .fetch_all(&mut *tx)
        .await?;

        if !removed.is_empty() {
            let removed_ids: Vec<Uuid> = removed.iter().map(|i| i.id).collect();
            // selections must not keep pointing at deleted images
            sqlx::query(
                r#"
                UPDATE selections
                SET image_ids = ARRAY(
                        SELECT x FROM UNNEST(image_ids) AS x
                        WHERE x <> ALL($2::uuid[])
                    ),
                    updated_at = NOW()
                WHERE album_id = $1 AND image_ids && $2::uuid[]
                "#,
            )
            .bind(album_id)
            .bind(&removed_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed)
    }

    async fn set_visibility(&self, album_id: &Uuid, image_ids: &[Uuid], visible: bool) -> Result<Vec<Image>, AppError> {
        sqlx::query_as::<_, Image>(
            r#"
            UPDATE images SET visible = $3
            WHERE album_id = $1 AND id = ANY($2)
            RETURNING *
            "#,
        )
        .bind(album_id)
        .bind(image_ids)
        .bind(visible)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
