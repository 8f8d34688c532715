pub mod album;
pub mod gateway;
pub mod image;
pub mod media;
pub mod payment;
pub mod selection;
pub mod sqlx_repo;
pub mod token;
pub mod user;
