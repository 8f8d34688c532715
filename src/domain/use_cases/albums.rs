use std::collections::HashSet;

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::access::{authorize, Actor, AlbumResource},
    entities::{
        album::{
            Album, AlbumDeletedResponse, AlbumDetail, AlbumSummary, AlbumView, NewAlbumRequest,
            PortfolioAlbum, UpdateAlbumRequest,
        },
        image::{
            Image, ImageInsert, ImageView, ImageVisibilityRequest, ImagesDeletedResponse,
            ImagesUploadedResponse, UploadedFile,
        },
    },
    errors::AppError,
    repositories::{album::AlbumRepository, image::ImageRepository, media::MediaStore},
};

pub struct AlbumHandler<A, I, M>
where
    A: AlbumRepository,
    I: ImageRepository,
    M: MediaStore,
{
    pub album_repo: A,
    pub image_repo: I,
    pub media: M,
    pub media_folder: String,
}

impl<A, I, M> AlbumHandler<A, I, M>
where
    A: AlbumRepository,
    I: ImageRepository,
    M: MediaStore,
{
    pub fn new(album_repo: A, image_repo: I, media: M, media_folder: String) -> Self {
        AlbumHandler {
            album_repo,
            image_repo,
            media,
            media_folder,
        }
    }

    async fn load_album(&self, album_id: &Uuid) -> Result<Album, AppError> {
        self.album_repo
            .get_album(album_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))
    }

    pub async fn create_album(&self, owner: &Actor, request: NewAlbumRequest) -> Result<Album, AppError> {
        request.validate()?;

        let album = self.album_repo.create_album(&request.into_insert(owner.id)).await?;

        tracing::info!(album_id = %album.id, owner_id = %owner.id, "Album created");
        Ok(album)
    }

    /// Admins see every album; everyone else sees albums they own or were granted.
    pub async fn list_for_actor(&self, actor: &Actor) -> Result<Vec<AlbumSummary>, AppError> {
        if actor.is_admin() {
            self.album_repo.list_all_albums().await
        } else {
            self.album_repo.list_albums_for_user(&actor.id).await
        }
    }

    pub async fn list_all_albums(&self) -> Result<Vec<AlbumSummary>, AppError> {
        self.album_repo.list_all_albums().await
    }

    /// Client-facing album with every URL resolved through the access guard.
    pub async fn get_album_view(&self, actor: Option<&Actor>, album_id: &Uuid) -> Result<AlbumView, AppError> {
        let album = self.load_album(album_id).await?;
        let grant = authorize(actor, &album, AlbumResource::Listing)?;

        let images: Vec<ImageView> = self
            .image_repo
            .list_images(album_id)
            .await?
            .iter()
            .filter(|image| grant.can_see(image))
            .map(|image| ImageView::from_image(image, grant.delivery))
            .collect();

        Ok(AlbumView {
            id: album.id,
            title: album.title,
            description: album.description,
            event_date: album.event_date,
            event_type: album.event_type,
            price_minor: album.price_minor,
            is_visible: album.is_visible,
            paid: album.paid,
            full_access: grant.full_access(),
            total_images: images.len(),
            images,
        })
    }

    pub async fn get_album_detail(&self, album_id: &Uuid) -> Result<AlbumDetail, AppError> {
        let album = self.load_album(album_id).await?;
        let images = self.image_repo.list_images(album_id).await?;
        Ok(AlbumDetail { album, images })
    }

    /// Admin edit, including the manual paid/visible toggles.
    pub async fn update_album(&self, album_id: &Uuid, changes: UpdateAlbumRequest) -> Result<Album, AppError> {
        changes.validate()?;
        if changes.is_empty() {
            return Err(AppError::InvalidInput("No fields to update".to_string()));
        }

        let album = self
            .album_repo
            .update_album(album_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        if let Some(paid) = changes.paid {
            tracing::info!(album_id = %album.id, paid, "Album paid flag set by admin");
        }
        Ok(album)
    }

    pub async fn grant_access(&self, album_id: &Uuid, user_id: &Uuid) -> Result<Album, AppError> {
        self.load_album(album_id).await?;
        self.album_repo.grant_access(album_id, user_id).await?;

        tracing::info!(%album_id, %user_id, "Album access granted");
        self.load_album(album_id).await
    }

    pub async fn revoke_access(&self, album_id: &Uuid, user_id: &Uuid) -> Result<Album, AppError> {
        self.load_album(album_id).await?;
        if !self.album_repo.revoke_access(album_id, user_id).await? {
            return Err(AppError::NotFound("User does not have access to this album".to_string()));
        }

        tracing::info!(%album_id, %user_id, "Album access revoked");
        self.load_album(album_id).await
    }

    /// Deletes the album rows first, then its stored media. Payment history is kept.
    pub async fn delete_album(&self, album_id: &Uuid) -> Result<AlbumDeletedResponse, AppError> {
        let images = self
            .album_repo
            .delete_album(album_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        self.destroy_media(&images).await;

        tracing::info!(%album_id, images = images.len(), "Album deleted");
        Ok(AlbumDeletedResponse {
            id: *album_id,
            images_removed: images.len(),
        })
    }

    /// Stores every file, then attaches them to the album hidden. If any step
    /// fails, the assets stored so far are removed again.
    pub async fn upload_images(&self, album_id: &Uuid, files: Vec<UploadedFile>) -> Result<ImagesUploadedResponse, AppError> {
        if files.is_empty() {
            return Err(AppError::InvalidInput("No images provided".to_string()));
        }
        self.load_album(album_id).await?;

        let folder = format!("{}/{}", self.media_folder, album_id);
        let mut stored: Vec<ImageInsert> = Vec::with_capacity(files.len());

        for file in &files {
            match self.media.upload(&folder, file).await {
                Ok(media) => stored.push(media.into()),
                Err(e) => {
                    tracing::error!(file = %file.file_name, error = %e, "Image upload failed");
                    self.rollback_uploads(&stored).await;
                    return Err(e);
                }
            }
        }

        let images = match self.image_repo.add_images(album_id, &stored).await {
            Ok(images) => images,
            Err(e) => {
                self.rollback_uploads(&stored).await;
                return Err(e);
            }
        };

        tracing::info!(%album_id, count = images.len(), "Images uploaded");
        Ok(ImagesUploadedResponse {
            album_id: *album_id,
            images,
        })
    }

    /// Removes only images that belong to this album; other ids are reported back.
    pub async fn delete_images(&self, album_id: &Uuid, image_ids: &[Uuid]) -> Result<ImagesDeletedResponse, AppError> {
        if image_ids.is_empty() {
            return Err(AppError::InvalidInput("No image ids provided".to_string()));
        }
        self.load_album(album_id).await?;

        let requested = dedup(image_ids);
        let removed = self.image_repo.delete_images(album_id, &requested).await?;

        let removed_ids: HashSet<Uuid> = removed.iter().map(|i| i.id).collect();
        let not_found = requested
            .iter()
            .filter(|id| !removed_ids.contains(id))
            .copied()
            .collect();

        self.destroy_media(&removed).await;

        tracing::info!(%album_id, deleted = removed.len(), "Images deleted");
        Ok(ImagesDeletedResponse {
            deleted: removed.iter().map(|i| i.id).collect(),
            not_found,
        })
    }

    pub async fn set_image_visibility(&self, album_id: &Uuid, request: ImageVisibilityRequest) -> Result<Vec<Image>, AppError> {
        if request.image_ids.is_empty() {
            return Err(AppError::InvalidInput("No image ids provided".to_string()));
        }
        self.load_album(album_id).await?;

        self.image_repo
            .set_visibility(album_id, &dedup(&request.image_ids), request.visible)
            .await
    }

    /// Full-resolution URL of one image, for redirecting the client.
    pub async fn original_image_url(&self, actor: Option<&Actor>, album_id: &Uuid, image_id: &Uuid) -> Result<String, AppError> {
        let album = self.load_album(album_id).await?;
        let grant = authorize(actor, &album, AlbumResource::FullResolution)?;

        let image = self
            .image_repo
            .get_image(album_id, image_id)
            .await?
            .filter(|image| grant.can_see(image))
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        Ok(image.url_for(grant.delivery).to_string())
    }

    pub async fn portfolio(&self) -> Result<Vec<PortfolioAlbum>, AppError> {
        self.album_repo.list_portfolio().await
    }

    async fn rollback_uploads(&self, stored: &[ImageInsert]) {
        for media in stored {
            if let Err(e) = self.media.destroy(&media.public_id).await {
                tracing::warn!(public_id = %media.public_id, error = %e, "Failed to remove orphaned upload");
            }
        }
    }

    async fn destroy_media(&self, images: &[Image]) {
        for image in images {
            if let Err(e) = self.media.destroy(&image.public_id).await {
                tracing::warn!(public_id = %image.public_id, error = %e, "Failed to remove stored image");
            }
        }
    }
}

fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().filter(|id| seen.insert(**id)).copied().collect()
}
