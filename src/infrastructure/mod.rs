pub mod archive;
pub mod auth;
pub mod db;
pub mod gateway;
pub mod media;
pub mod utils;
