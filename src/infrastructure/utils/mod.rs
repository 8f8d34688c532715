pub mod image_file;
pub mod valid_uuid;
