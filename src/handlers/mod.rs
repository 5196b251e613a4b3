//! HTTP handlers for universities, students and documentation.

pub mod docs;
pub mod student;
pub mod university;

use crate::error::AppError;

/// Integer primary key from a path segment.
pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}
