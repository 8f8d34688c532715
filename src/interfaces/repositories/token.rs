use uuid::Uuid;

use crate::{
    entities::{token::{Claims, RefreshClaims}, user::User},
    errors::AuthError,
};

/// Issues and checks the bearer tokens the API hands out. Access and refresh
/// tokens are not interchangeable: each verifier rejects the other kind.
pub trait TokenIssuer: Send + Sync {
    /// Short-lived token carrying the account id, email and role.
    fn issue_access_token(&self, user: &User) -> Result<String, AuthError>;

    fn issue_refresh_token(&self, user_id: &Uuid) -> Result<String, AuthError>;

    fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError>;

    fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError>;
}
