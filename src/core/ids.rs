use uuid::Uuid;

use crate::core::{AppError, Result};

/// Parse a CHAR(36) id column back into a `Uuid`
pub fn parse_id(value: &str, column: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::Internal(format!("Invalid {} '{}': {}", column, value, e)))
}
