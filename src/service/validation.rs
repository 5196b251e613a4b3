//! Request validation, run by the extractors after deserialization and before any handler.

use crate::error::AppError;
use crate::model::{NewStudent, StudentPatch, StudentQuery, UniversityQuery};

pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

/// Presence and types are enforced by deserialization. `universite_id` is checked by the
/// foreign key on insert.
impl Validate for NewStudent {
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

impl Validate for StudentPatch {
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

impl Validate for UniversityQuery {
    fn validate(&self) -> Result<(), AppError> {
        if self.skip() < 0 {
            return Err(AppError::Validation("skip must be greater than or equal to 0".into()));
        }
        if self.limit() < 1 {
            return Err(AppError::Validation("limit must be greater than or equal to 1".into()));
        }
        Ok(())
    }
}

/// Unknown `moyenne_operation` codes are tolerated and dropped when filters are built.
impl Validate for StudentQuery {
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NewStudent {
        NewStudent {
            prenom: "John".into(),
            nom: "Doe".into(),
            pays: "France".into(),
            sexe: "Male".into(),
            moyenne: Some(15.5),
            universite_id: 1,
        }
    }

    #[test]
    fn accepts_complete_payload() {
        assert!(payload().validate().is_ok());
        assert!(NewStudent { moyenne: None, ..payload() }.validate().is_ok());
    }

    #[test]
    fn empty_text_and_any_reference_pass_to_storage() {
        assert!(NewStudent { prenom: String::new(), ..payload() }.validate().is_ok());
        assert!(NewStudent { universite_id: 0, ..payload() }.validate().is_ok());
        assert!(StudentPatch { sexe: Some(String::new()), universite_id: Some(-3), ..Default::default() }
            .validate()
            .is_ok());
    }

    #[test]
    fn university_paging_bounds() {
        let q = |skip, limit| UniversityQuery { skip, limit, ..Default::default() };
        assert!(q(None, None).validate().is_ok());
        assert!(q(Some(0), Some(1)).validate().is_ok());
        assert!(q(Some(-1), None).validate().is_err());
        assert!(q(None, Some(0)).validate().is_err());
    }
}
