use uuid::Uuid;

use crate::{
    domain::access::{authorize, Actor, AlbumResource},
    entities::{
        archive::{ArchiveEntry, ArchivePlan},
        image::Image,
    },
    errors::AppError,
    repositories::{album::AlbumRepository, image::ImageRepository},
};

const DEFAULT_EXTENSION: &str = "jpg";

pub struct ArchiveHandler<A, I>
where
    A: AlbumRepository,
    I: ImageRepository,
{
    pub album_repo: A,
    pub image_repo: I,
}

/// `album.zip` for an album titled "Album", never empty.
pub fn archive_file_name(title: &str) -> String {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        "album.zip".to_string()
    } else {
        format!("{}.zip", slug)
    }
}

/// Zero-padded position keeps entries in album order when unpacked.
pub fn entry_name(index: usize, image: &Image, url: &str) -> String {
    format!("{:03}_{}.{}", index + 1, image.id, extension_of(url))
}

fn extension_of(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);

    match file.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()) => ext,
        _ => DEFAULT_EXTENSION,
    }
}

impl<A, I> ArchiveHandler<A, I>
where
    A: AlbumRepository,
    I: ImageRepository,
{
    pub fn new(album_repo: A, image_repo: I) -> Self {
        ArchiveHandler { album_repo, image_repo }
    }

    /// Authorizes the download and lists what goes into the zip. Unpaid
    /// albums are archived from their watermarked previews.
    pub async fn plan_archive(&self, actor: Option<&Actor>, album_id: &Uuid) -> Result<ArchivePlan, AppError> {
        let album = self
            .album_repo
            .get_album(album_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

        let grant = authorize(actor, &album, AlbumResource::Archive)?;

        let entries: Vec<ArchiveEntry> = self
            .image_repo
            .list_images(album_id)
            .await?
            .iter()
            .filter(|image| grant.can_see(image))
            .filter_map(|image| {
                let url = image.url_for(grant.delivery);
                if url.trim().is_empty() {
                    return None;
                }
                Some((image, url))
            })
            .enumerate()
            .map(|(index, (image, url))| ArchiveEntry {
                name: entry_name(index, image, url),
                url: url.to_string(),
            })
            .collect();

        if entries.is_empty() {
            return Err(AppError::NotFound("Album has no images to download".to_string()));
        }

        tracing::info!(
            %album_id,
            entries = entries.len(),
            delivery = ?grant.delivery,
            "Archive planned"
        );

        Ok(ArchivePlan {
            file_name: archive_file_name(&album.title),
            entries,
        })
    }
}
