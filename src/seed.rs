//! Startup seed for the read-only `universite` table.

use crate::error::{AppError, ConfigError};
use crate::model::NewUniversity;
use crate::service::CrudService;
use sqlx::PgPool;
use std::path::Path;

/// Parse a JSON array of `{universite, rang, pays, iso}` objects.
pub fn parse_seed(path: &str, raw: &str) -> Result<Vec<NewUniversity>, ConfigError> {
    serde_json::from_str(raw).map_err(|e| ConfigError::Seed {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

pub async fn load_seed_file(path: &Path) -> Result<Vec<NewUniversity>, ConfigError> {
    let display = path.display().to_string();
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| ConfigError::Seed {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    parse_seed(&display, &raw)
}

/// Load and insert the seed file; no-op when universities already exist.
pub async fn seed_from_file(pool: &PgPool, path: &Path) -> Result<u64, AppError> {
    let items = load_seed_file(path).await?;
    let inserted = CrudService::seed_universities(pool, &items).await?;
    tracing::info!(path = %path.display(), inserted, "university seed applied");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_university_list() {
        let items = parse_seed(
            "seed.json",
            r#"[{"universite":"Université Paris-Dauphine","rang":1,"pays":"France","iso":"FR"}]"#,
        )
        .unwrap();
        assert_eq!(
            items,
            vec![NewUniversity {
                universite: "Université Paris-Dauphine".into(),
                rang: 1,
                pays: "France".into(),
                iso: "FR".into(),
            }]
        );
    }

    #[test]
    fn reports_path_on_bad_json() {
        let err = parse_seed("seed.json", r#"[{"universite":"X"}]"#).unwrap_err();
        assert!(err.to_string().starts_with("seed file seed.json:"));
    }

    #[tokio::test]
    async fn missing_file_is_a_config_error() {
        let err = load_seed_file(Path::new("/nonexistent/universities.json")).await.unwrap_err();
        assert!(matches!(err, ConfigError::Seed { .. }));
    }
}
