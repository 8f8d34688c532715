pub mod albums;
pub mod archive;
pub mod auth;
pub mod home;
pub mod images;
pub mod payments;
pub mod selections;
pub mod system;
pub mod users;
