use uuid::Uuid;

use crate::errors::AppError;

/// Parses an id taken from the path. Surrounding whitespace is ignored.
pub fn valid_uuid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::try_parse(raw.trim())
        .map_err(|_| AppError::InvalidInput(format!("'{}' is not a valid id", raw.trim())))
}
