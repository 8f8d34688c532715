use async_trait::async_trait;
use std::borrow::Cow;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    entities::{
        album::{Album, AlbumInsert, AlbumSummary, PortfolioAlbum, UpdateAlbumRequest},
        image::Image,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxAlbumRepo,
};

const ALBUM_COLUMNS: &str = r#"
    SELECT
        a.id, a.title, a.description, a.event_date, a.event_type, a.price_minor, a.owner_id,
        ARRAY(
            SELECT aa.user_id FROM album_access aa
            WHERE aa.album_id = a.id
            ORDER BY aa.granted_at
        ) AS access_users,
        a.is_visible, a.paid, a.created_at, a.updated_at
    FROM albums a
"#;

const SUMMARY_COLUMNS: &str = r#"
    SELECT
        a.id, a.title, a.event_date, a.event_type, a.price_minor, a.is_visible, a.paid,
        (SELECT COUNT(*) FROM images i WHERE i.album_id = a.id) AS image_count,
        a.created_at
    FROM albums a
"#;

#[async_trait]
pub trait AlbumRepository: Send + Sync {
    async fn create_album(&self, album: &AlbumInsert) -> Result<Album, AppError>;
    async fn get_album(&self, id: &Uuid) -> Result<Option<Album>, AppError>;
    async fn list_all_albums(&self) -> Result<Vec<AlbumSummary>, AppError>;
    /// Albums the user owns or has been granted.
    async fn list_albums_for_user(&self, user_id: &Uuid) -> Result<Vec<AlbumSummary>, AppError>;
    async fn list_portfolio(&self) -> Result<Vec<PortfolioAlbum>, AppError>;
    async fn update_album(&self, id: &Uuid, changes: &UpdateAlbumRequest) -> Result<Option<Album>, AppError>;
    async fn grant_access(&self, album_id: &Uuid, user_id: &Uuid) -> Result<(), AppError>;
    /// Returns false when the user was not in the access set.
    async fn revoke_access(&self, album_id: &Uuid, user_id: &Uuid) -> Result<bool, AppError>;
    /// Removes the album with its images, access rows and selections.
    /// Returns the removed images, or `None` when the album does not exist.
    async fn delete_album(&self, id: &Uuid) -> Result<Option<Vec<Image>>, AppError>;
}

impl SqlxAlbumRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxAlbumRepo { pool }
    }
}

fn unknown_user(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23503")) => {
            AppError::InvalidInput("Access list references an unknown user".to_string())
        }
        _ => AppError::from(e),
    }
}

async fn insert_access(
    tx: &mut Transaction<'_, Postgres>,
    album_id: &Uuid,
    user_ids: &[Uuid],
) -> Result<(), AppError> {
    if user_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO album_access (album_id, user_id)
        SELECT $1, UNNEST($2::uuid[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(album_id)
    .bind(user_ids)
    .execute(&mut **tx)
    .await
    .map_err(unknown_user)?;

    Ok(())
}

#[async_trait]
impl AlbumRepository for SqlxAlbumRepo {
    async fn create_album(&self, album: &AlbumInsert) -> Result<Album, AppError> {
        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO albums (
                title, description, event_date, event_type, price_minor,
                owner_id, is_visible, paid
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&album.title)
        .bind(&album.description)
        .bind(album.event_date)
        .bind(&album.event_type)
        .bind(album.price_minor)
        .bind(album.owner_id)
        .bind(album.is_visible)
        .bind(album.paid)
        .fetch_one(&mut *tx)
        .await?;

        insert_access(&mut tx, &id, &album.access_users).await?;

        let created = sqlx::query_as::<_, Album>(&format!("{ALBUM_COLUMNS} WHERE a.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn get_album(&self, id: &Uuid) -> Result<Option<Album>, AppError> {
        sqlx::query_as::<_, Album>(&format!("{ALBUM_COLUMNS} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_all_albums(&self) -> Result<Vec<AlbumSummary>, AppError> {
        sqlx::query_as::<_, AlbumSummary>(&format!("{SUMMARY_COLUMNS} ORDER BY a.created_at DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_albums_for_user(&self, user_id: &Uuid) -> Result<Vec<AlbumSummary>, AppError> {
        sqlx::query_as::<_, AlbumSummary>(&format!(
            r#"{SUMMARY_COLUMNS}
            WHERE a.owner_id = $1
               OR EXISTS (
                   SELECT 1 FROM album_access aa
                   WHERE aa.album_id = a.id AND aa.user_id = $1
               )
            ORDER BY a.created_at DESC"#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_portfolio(&self) -> Result<Vec<PortfolioAlbum>, AppError> {
        sqlx::query_as::<_, PortfolioAlbum>(
            r#"
            SELECT
                a.id, a.title, a.event_date, a.event_type,
                (
                    SELECT i.watermarked_url FROM images i
                    WHERE i.album_id = a.id AND i.visible
                    ORDER BY i.position
                    LIMIT 1
                ) AS cover_url,
                (SELECT COUNT(*) FROM images i WHERE i.album_id = a.id AND i.visible) AS image_count
            FROM albums a
            WHERE a.is_visible
            ORDER BY a.event_date DESC NULLS LAST, a.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn update_album(&self, id: &Uuid, changes: &UpdateAlbumRequest) -> Result<Option<Album>, AppError> {
        // COALESCE keeps the stored value for every field left out of the request
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE albums SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                event_type = COALESCE($5, event_type),
                price_minor = COALESCE($6, price_minor),
                is_visible = COALESCE($7, is_visible),
                paid = COALESCE($8, paid),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref().map(str::trim))
        .bind(&changes.description)
        .bind(changes.event_date)
        .bind(&changes.event_type)
        .bind(changes.price_minor)
        .bind(changes.is_visible)
        .bind(changes.paid)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.get_album(&id).await,
            None => Ok(None),
        }
    }

    async fn grant_access(&self, album_id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO album_access (album_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(album_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(unknown_user)?;

        Ok(())
    }

    async fn revoke_access(&self, album_id: &Uuid, user_id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM album_access WHERE album_id = $1 AND user_id = $2")
            .bind(album_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_album(&self, id: &Uuid) -> Result<Option<Vec<Image>>, AppError> {
        let mut tx = self.pool.begin().await?;

        let images = sqlx::query_as::<_, Image>(
            "SELECT * FROM images WHERE album_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        // images, access rows and selections cascade; payments keep their row with album_id nulled
        let deleted = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(images))
    }
}
