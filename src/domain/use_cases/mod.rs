pub mod albums;
pub mod archive;
pub mod auth;
pub mod extractors;
pub mod payments;
pub mod selections;
pub mod users;
