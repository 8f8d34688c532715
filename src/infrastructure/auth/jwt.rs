use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    entities::{
        token::{Claims, RefreshClaims, TokenType},
        user::User,
    },
    errors::AuthError,
    repositories::token::TokenIssuer,
    settings::{AppConfig, JwtKeys},
};

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

/// HS512 tokens. Access and refresh tokens are signed with separate secrets.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_ttl: Duration::minutes(config.jwt_expiration_minutes),
            refresh_ttl: Duration::days(config.refresh_token_exp_days),
        }
    }

    fn sign<C: Serialize>(claims: &C, key: &jsonwebtoken::EncodingKey) -> Result<String, AuthError> {
        encode(&Header::new(JWT_ALGORITHM), claims, key).map_err(|e| {
            tracing::error!(error = %e, "Token signing failed");
            AuthError::TokenCreation
        })
    }

    fn open<C: DeserializeOwned>(token: &str, key: &DecodingKey) -> Result<C, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;
        Ok(decode::<C>(token, key, &validation)?.claims)
    }

    /// (issued-at, expiry) as unix seconds.
    fn window(ttl: Duration) -> (usize, usize) {
        let now = Utc::now();
        (now.timestamp() as usize, (now + ttl).timestamp() as usize)
    }
}

impl TokenIssuer for JwtService {
    fn issue_access_token(&self, user: &User) -> Result<String, AuthError> {
        let (iat, exp) = Self::window(self.access_ttl);
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            token_type: TokenType::Access,
            exp,
            iat,
        };
        Self::sign(&claims, &self.keys.encoding)
    }

    fn issue_refresh_token(&self, user_id: &Uuid) -> Result<String, AuthError> {
        let (iat, exp) = Self::window(self.refresh_ttl);
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            token_type: TokenType::Refresh,
            iat,
            exp,
        };
        Self::sign(&claims, &self.keys.refresh_encoding)
    }

    fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims: Claims = Self::open(token, &self.keys.decoding)?;
        match claims.token_type {
            TokenType::Access => Ok(claims),
            TokenType::Refresh => Err(AuthError::InvalidToken),
        }
    }

    fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let claims: RefreshClaims = Self::open(token, &self.keys.refresh_decoding)?;
        match claims.token_type {
            TokenType::Refresh => Ok(claims),
            TokenType::Access => Err(AuthError::InvalidToken),
        }
    }
}
