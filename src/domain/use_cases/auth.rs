use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::password::{hash_password, verify_password},
    entities::{
        token::AuthResponse,
        user::{LoginUser, NewUser, NewUserResponse, Role, User, UserInsert},
    },
    errors::{AppError, AuthError},
    repositories::{token::TokenIssuer, user::UserRepository},
};

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenIssuer,
{
    pub user_repo: R,
    pub tokens: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenIssuer,
{
    pub fn new(user_repo: R, tokens: T) -> Self {
        AuthHandler { user_repo, tokens }
    }

    /// Self-service signup. New accounts are always clients.
    pub async fn register(&self, request: NewUser) -> Result<NewUserResponse, AppError> {
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let id = self
            .user_repo
            .create_user(&request.prepare_for_insert(password_hash))
            .await?;

        tracing::info!(user_id = %id, "Account registered");
        Ok(NewUserResponse {
            id,
            message: "Account created".to_string(),
        })
    }

    /// Makes sure the configured bootstrap account exists and is an admin.
    /// An existing account is promoted and keeps its password.
    pub async fn ensure_admin(&self, request: NewUser) -> Result<Uuid, AppError> {
        if let Some(existing) = self.user_repo.get_user_by_email(&request.email).await? {
            if !existing.role.is_admin() {
                self.user_repo.set_role(&existing.id, Role::Admin).await?;
                tracing::info!(user_id = %existing.id, "Promoted bootstrap account to admin");
            }
            return Ok(existing.id);
        }

        request.validate()?;
        let password_hash = hash_password(&request.password)?;
        let id = self
            .user_repo
            .create_user(&UserInsert {
                role: Role::Admin,
                ..request.prepare_for_insert(password_hash)
            })
            .await?;

        tracing::info!(user_id = %id, "Bootstrap admin created");
        Ok(id)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let user = self
            .user_repo
            .get_user_by_email(&request.email)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "User lookup failed during login");
                AuthError::WrongCredentials
            })?
            .ok_or(AuthError::WrongCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::WrongCredentials);
        }

        tracing::info!(user_id = %user.id, role = ?user.role, "Logged in");
        self.token_pair(&user)
    }

    /// Swaps a refresh token for a new pair. The account is re-read, so a
    /// role change applies from the next refresh on.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.tokens.verify_refresh_token(refresh_token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        let user = self
            .user_repo
            .get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::InvalidToken)?
            .ok_or(AuthError::InvalidToken)?;

        self.token_pair(&user)
    }

    fn token_pair(&self, user: &User) -> Result<AuthResponse, AuthError> {
        Ok(AuthResponse::new(
            self.tokens.issue_access_token(user)?,
            self.tokens.issue_refresh_token(&user.id)?,
        ))
    }
}
