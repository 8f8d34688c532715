use uuid::Uuid;

use crate::entities::album::Album;
use crate::entities::image::Image;
use crate::entities::user::Role;
use crate::errors::AppError;

/// The authenticated party behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// What the caller wants to do with an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumResource {
    Listing,
    Archive,
    FullResolution,
}

/// Which rendition of an image the caller is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Original,
    Watermarked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub delivery: Delivery,
    /// Owner or admin. Privileged callers also see hidden images.
    pub privileged: bool,
}

impl Grant {
    pub fn can_see(&self, image: &Image) -> bool {
        self.privileged || image.visible
    }

    pub fn full_access(&self) -> bool {
        self.delivery == Delivery::Original
    }
}

/// Single capability check used by every album-facing operation.
pub fn authorize(
    actor: Option<&Actor>,
    album: &Album,
    resource: AlbumResource,
) -> Result<Grant, AppError> {
    let actor = actor.ok_or(AppError::UnauthorizedAccess)?;

    let privileged = actor.is_admin() || album.is_owner(&actor.id);
    let member = album.is_member(&actor.id);

    let allowed = match resource {
        AlbumResource::Listing => album.is_visible || privileged || member,
        AlbumResource::Archive => privileged || member,
        AlbumResource::FullResolution => privileged || (album.paid && member),
    };

    if !allowed {
        tracing::warn!(
            actor_id = %actor.id,
            album_id = %album.id,
            ?resource,
            "Album access denied"
        );
        return Err(AppError::ForbiddenAccess);
    }

    let delivery = match resource {
        AlbumResource::FullResolution => Delivery::Original,
        _ if album.paid && (privileged || member) => Delivery::Original,
        _ => Delivery::Watermarked,
    };

    Ok(Grant { delivery, privileged })
}
