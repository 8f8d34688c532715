pub mod album;
pub mod archive;
pub mod image;
pub mod payment;
pub mod selection;
pub mod token;
pub mod user;
