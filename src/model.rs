//! Request/response contracts and storage records for universities and students.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_SKIP: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 50;

/// University row with the ids of its students, aggregated in the same query.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct UniversityRow {
    pub id: i64,
    pub universite: String,
    pub rang: i32,
    pub pays: String,
    pub iso: String,
    pub etudiant_ids: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct University {
    pub id: i64,
    #[schema(example = "Université Paris-Dauphine")]
    pub universite: String,
    /// Shanghai ranking position.
    #[schema(example = 1)]
    pub rang: i32,
    #[schema(example = "France")]
    pub pays: String,
    #[schema(example = "FR")]
    pub iso: String,
    /// Computed per request, one URL per student.
    pub etudiants_urls: Vec<String>,
}

impl University {
    pub fn from_row(row: UniversityRow, student_url: impl Fn(i64) -> String) -> Self {
        University {
            id: row.id,
            universite: row.universite,
            rang: row.rang,
            pays: row.pays,
            iso: row.iso,
            etudiants_urls: row.etudiant_ids.into_iter().map(student_url).collect(),
        }
    }
}

/// Seed entry for the `universite` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewUniversity {
    pub universite: String,
    pub rang: i32,
    pub pays: String,
    pub iso: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Student {
    pub id: i64,
    pub prenom: String,
    pub nom: String,
    pub pays: String,
    pub sexe: String,
    pub moyenne: Option<f64>,
    pub universite_id: i64,
}

impl Student {
    /// Overwrite every field the patch carries; absent fields keep their value.
    pub fn apply(&mut self, patch: StudentPatch) {
        let StudentPatch {
            prenom,
            nom,
            pays,
            sexe,
            moyenne,
            universite_id,
        } = patch;
        if let Some(v) = prenom {
            self.prenom = v;
        }
        if let Some(v) = nom {
            self.nom = v;
        }
        if let Some(v) = pays {
            self.pays = v;
        }
        if let Some(v) = sexe {
            self.sexe = v;
        }
        if let Some(v) = moyenne {
            self.moyenne = Some(v);
        }
        if let Some(v) = universite_id {
            self.universite_id = v;
        }
    }
}

/// Body of `POST /etudiant/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewStudent {
    #[schema(example = "John")]
    pub prenom: String,
    #[schema(example = "Doe")]
    pub nom: String,
    #[schema(example = "France")]
    pub pays: String,
    #[schema(example = "Male")]
    pub sexe: String,
    #[serde(default)]
    #[schema(example = 15.5)]
    pub moyenne: Option<f64>,
    #[schema(example = 1)]
    pub universite_id: i64,
}

/// Body of `PUT /etudiant/{id}`. Null and absent fields are both left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct StudentPatch {
    pub prenom: Option<String>,
    pub nom: Option<String>,
    pub pays: Option<String>,
    pub sexe: Option<String>,
    pub moyenne: Option<f64>,
    pub universite_id: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UniversityQuery {
    /// Country of the university.
    pub pays: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub iso: Option<String>,
    /// Number of records to skip (default 0).
    pub skip: Option<i64>,
    /// Maximum number of records to return (default 50).
    pub limit: Option<i64>,
}

impl UniversityQuery {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(DEFAULT_SKIP)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentQuery {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    /// ISO code of the student's university.
    pub iso: Option<String>,
    pub sexe: Option<String>,
    /// Average score compared with `moyenne_operation`.
    pub moyenne: Option<f64>,
    /// One of lt, le, eq, ge, gt. Ignored when `moyenne` is missing.
    pub moyenne_operation: Option<String>,
}

/// Treats `Some("")` like an absent filter.
pub fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}
