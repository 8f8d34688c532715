use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

use crate::entities::user::NewUser;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_minutes: i64,

    #[serde(default)]
    pub refresh_token_secret: String,

    #[serde(default = "default_refresh_expiration")]
    pub refresh_token_exp_days: i64,

    // Payment gateway
    #[serde(default)]
    pub paystack_secret_key: String,

    #[serde(default = "default_paystack_base_url")]
    pub paystack_base_url: String,

    #[serde(default = "default_payment_callback_url")]
    pub payment_callback_url: String,

    #[serde(default = "default_payment_currency")]
    pub payment_currency: String,

    /// Charged when an album has no price of its own (price 0).
    #[serde(default = "default_album_price_minor")]
    pub default_album_price_minor: i64,

    // Media store
    #[serde(default)]
    pub cloudinary_cloud_name: String,

    #[serde(default)]
    pub cloudinary_api_key: String,

    #[serde(default)]
    pub cloudinary_api_secret: String,

    #[serde(default = "default_cloudinary_base_url")]
    pub cloudinary_base_url: String,

    #[serde(default = "default_media_folder")]
    pub media_folder: String,

    #[serde(default = "default_watermark_text")]
    pub watermark_text: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_archive_fetch_timeout")]
    pub archive_fetch_timeout_secs: u64,

    // Bootstrap admin, created or promoted at startup when an email is set
    #[serde(default)]
    pub admin_email: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,

    #[serde(default = "default_admin_name")]
    pub admin_name: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Album-Delivery-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_jwt_expiration() -> i64 {
    15
}
fn default_refresh_expiration() -> i64 {
    7
}
fn default_paystack_base_url() -> String {
    "https://api.paystack.co".to_string()
}
fn default_payment_callback_url() -> String {
    "http://localhost:3000/dashboard/payment/success".to_string()
}
fn default_payment_currency() -> String {
    "NGN".to_string()
}
fn default_album_price_minor() -> i64 {
    // ₦10,000 in kobo
    1_000_000
}
fn default_cloudinary_base_url() -> String {
    "https://api.cloudinary.com".to_string()
}
fn default_media_folder() -> String {
    "albums".to_string()
}
fn default_watermark_text() -> String {
    "PREVIEW".to_string()
}
fn default_max_upload_bytes() -> usize {
    15 * 1024 * 1024
}
fn default_archive_fetch_timeout() -> u64 {
    30
}
fn default_admin_name() -> String {
    "Administrator".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // sqlx tooling conventionally reads DATABASE_URL
        config.database_url = fill_or_env(config.database_url, "DATABASE_URL")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.jwt_secret.len() < 32 {
            errors.push("JWT_SECRET must be at least 32 characters");
        }
        if self.refresh_token_secret.len() < 32 {
            errors.push("REFRESH_TOKEN_SECRET must be at least 32 characters");
        }
        if self.paystack_secret_key.trim().is_empty() {
            errors.push("PAYSTACK_SECRET_KEY cannot be empty");
        }
        if self.default_album_price_minor <= 0 {
            errors.push("DEFAULT_ALBUM_PRICE_MINOR must be greater than zero");
        }
        if self.cloudinary_cloud_name.trim().is_empty()
            || self.cloudinary_api_key.trim().is_empty()
            || self.cloudinary_api_secret.trim().is_empty()
        {
            errors.push("Cloudinary cloud name, API key and API secret must be set");
        }
        if self.admin_email.is_some() && self.admin_password.as_deref().is_none_or(str::is_empty) {
            errors.push("ADMIN_PASSWORD must be set together with ADMIN_EMAIL");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    /// The bootstrap admin as a signup request, when configured.
    pub fn admin_account(&self) -> Option<NewUser> {
        let email = self.admin_email.as_deref()?.trim();
        let password = self.admin_password.as_deref()?;
        if email.is_empty() {
            return None;
        }
        Some(NewUser {
            name: self.admin_name.clone(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < 32 {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &self.jwt_secret.redact())
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("refresh_token_secret", &self.refresh_token_secret.redact())
            .field("refresh_token_exp_days", &self.refresh_token_exp_days)
            .field("paystack_secret_key", &self.paystack_secret_key.redact())
            .field("paystack_base_url", &self.paystack_base_url)
            .field("payment_callback_url", &self.payment_callback_url)
            .field("payment_currency", &self.payment_currency)
            .field("default_album_price_minor", &self.default_album_price_minor)
            .field("cloudinary_cloud_name", &self.cloudinary_cloud_name)
            .field("cloudinary_api_key", &self.cloudinary_api_key.redact())
            .field("cloudinary_api_secret", &self.cloudinary_api_secret.redact())
            .field("cloudinary_base_url", &self.cloudinary_base_url)
            .field("media_folder", &self.media_folder)
            .field("watermark_text", &self.watermark_text)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("archive_fetch_timeout_secs", &self.archive_fetch_timeout_secs)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_deref().map(|p| p.redact()))
            .field("admin_name", &self.admin_name)
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub refresh_encoding: EncodingKey,
    pub refresh_decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let jwt_secret = Zeroizing::new(config.jwt_secret.clone());
        let refresh_secret = Zeroizing::new(config.refresh_token_secret.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .field("refresh_encoding", &"[REDACTED]")
            .field("refresh_decoding", &"[REDACTED]")
            .finish()
    }
}
