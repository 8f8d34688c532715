use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    domain::access::{authorize, Actor, AlbumResource},
    entities::{
        album::Album,
        selection::{SaveSelectionRequest, Selection, SelectionWithUser},
    },
    errors::AppError,
    repositories::{album::AlbumRepository, image::ImageRepository, selection::SelectionRepository},
};

pub struct SelectionHandler<S, A, I>
where
    S: SelectionRepository,
    A: AlbumRepository,
    I: ImageRepository,
{
    pub selection_repo: S,
    pub album_repo: A,
    pub image_repo: I,
}

impl<S, A, I> SelectionHandler<S, A, I>
where
    S: SelectionRepository,
    A: AlbumRepository,
    I: ImageRepository,
{
    pub fn new(selection_repo: S, album_repo: A, image_repo: I) -> Self {
        SelectionHandler {
            selection_repo,
            album_repo,
            image_repo,
        }
    }

    async fn load_album(&self, album_id: &Uuid) -> Result<Album, AppError> {
        self.album_repo
            .get_album(album_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))
    }

    /// Replaces the actor's selection for the album. Every id must be an image
    /// of this album the actor can see.
    pub async fn save_selection(&self, actor: &Actor, album_id: &Uuid, request: SaveSelectionRequest) -> Result<Selection, AppError> {
        let album = self.load_album(album_id).await?;
        let grant = authorize(Some(actor), &album, AlbumResource::Listing)?;

        let selectable: HashSet<Uuid> = self
            .image_repo
            .list_images(album_id)
            .await?
            .iter()
            .filter(|image| grant.can_see(image))
            .map(|image| image.id)
            .collect();

        let mut seen = HashSet::new();
        let mut image_ids = Vec::with_capacity(request.image_ids.len());
        for id in request.image_ids {
            if !selectable.contains(&id) {
                return Err(AppError::InvalidInput(format!("Image {} is not part of this album", id)));
            }
            if seen.insert(id) {
                image_ids.push(id);
            }
        }

        let selection = self
            .selection_repo
            .upsert_selection(&actor.id, album_id, &image_ids)
            .await?;

        tracing::info!(%album_id, user_id = %actor.id, count = image_ids.len(), "Selection saved");
        Ok(selection)
    }

    pub async fn get_selection(&self, actor: &Actor, album_id: &Uuid) -> Result<Selection, AppError> {
        let album = self.load_album(album_id).await?;
        authorize(Some(actor), &album, AlbumResource::Listing)?;

        self.selection_repo
            .get_selection(&actor.id, album_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No selection saved for this album".to_string()))
    }

    pub async fn list_for_album(&self, album_id: &Uuid) -> Result<Vec<SelectionWithUser>, AppError> {
        self.load_album(album_id).await?;
        self.selection_repo.list_for_album(album_id).await
    }
}
