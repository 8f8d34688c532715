use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub const API_PREFIX: &str = "/api/v1";
pub const ADMIN_PREFIX: &str = "/api/v1/admin";

/// Forced in `main` so uptime counts from process start.
pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);
