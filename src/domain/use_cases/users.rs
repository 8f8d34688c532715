use uuid::Uuid;

use crate::{
    entities::user::{PublicUser, UserWithAlbums},
    errors::AppError,
    repositories::{album::AlbumRepository, user::UserRepository},
};

pub struct UserHandler<U, A>
where
    U: UserRepository,
    A: AlbumRepository,
{
    pub user_repo: U,
    pub album_repo: A,
}

impl<U, A> UserHandler<U, A>
where
    U: UserRepository,
    A: AlbumRepository,
{
    pub fn new(user_repo: U, album_repo: A) -> Self {
        UserHandler { user_repo, album_repo }
    }

    pub async fn me(&self, user_id: &Uuid) -> Result<PublicUser, AppError> {
        self.user_repo
            .get_user_by_id(user_id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AppError> {
        let users = self.user_repo.list_users().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// An account plus every album it owns or has been granted.
    pub async fn get_user_with_albums(&self, user_id: &Uuid) -> Result<UserWithAlbums, AppError> {
        let user = self.me(user_id).await?;
        let albums = self.album_repo.list_albums_for_user(user_id).await?;
        Ok(UserWithAlbums { user, albums })
    }
}
