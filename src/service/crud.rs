//! CRUD execution against one request-scoped PostgreSQL connection.

use crate::error::AppError;
use crate::model::{non_empty, NewStudent, NewUniversity, Student, StudentPatch, StudentQuery, UniversityQuery, UniversityRow};
use crate::sql::{self, bind_all, CompareOp, Filter, QueryBuf};
use sqlx::{PgConnection, PgPool};

pub struct CrudService;

impl CrudService {
    /// Universities matching the query's filters, one page ordered by id.
    pub async fn list_universities(
        conn: &mut PgConnection,
        query: &UniversityQuery,
    ) -> Result<Vec<UniversityRow>, AppError> {
        let filters = university_filters(query);
        let q = sql::select_universities(&filters, Some(query.limit()), Some(query.skip()));
        Self::fetch_all(conn, &q).await
    }

    pub async fn read_university(conn: &mut PgConnection, id: i64) -> Result<Option<UniversityRow>, AppError> {
        let q = sql::select_university_by_id(id);
        Self::fetch_optional(conn, &q).await
    }

    /// Every student matching the query's filters; no paging.
    pub async fn list_students(conn: &mut PgConnection, query: &StudentQuery) -> Result<Vec<Student>, AppError> {
        let filters = student_filters(query);
        let q = sql::select_students(&filters);
        Self::fetch_all(conn, &q).await
    }

    pub async fn read_student(conn: &mut PgConnection, id: i64) -> Result<Option<Student>, AppError> {
        let q = sql::select_student_by_id(id);
        Self::fetch_optional(conn, &q).await
    }

    /// Insert one student. A dangling `universite_id` fails on the foreign key as a database error,
    /// and so does an INSERT that returns no row.
    pub async fn create_student(conn: &mut PgConnection, body: &NewStudent) -> Result<Student, AppError> {
        let q = sql::insert_student(body);
        Self::fetch_optional(conn, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Lookup, merge the patch, write the full row back. None when the student does not exist.
    pub async fn update_student(
        conn: &mut PgConnection,
        id: i64,
        patch: StudentPatch,
    ) -> Result<Option<Student>, AppError> {
        let Some(mut student) = Self::read_student(&mut *conn, id).await? else {
            return Ok(None);
        };
        student.apply(patch);
        let q = sql::update_student(&student);
        Self::fetch_optional(conn, &q).await
    }

    /// Returns false when no student had that id.
    pub async fn delete_student(conn: &mut PgConnection, id: i64) -> Result<bool, AppError> {
        let q = sql::delete_student(id);
        let deleted: Option<(i64,)> = Self::fetch_optional(conn, &q).await?;
        Ok(deleted.is_some())
    }

    /// Insert universities in one transaction when the table is empty. Returns the number inserted.
    pub async fn seed_universities(pool: &PgPool, items: &[NewUniversity]) -> Result<u64, AppError> {
        let mut tx = pool.begin().await?;
        let (existing,): (i64,) = Self::fetch_optional(&mut *tx, &sql::count_universities())
            .await?
            .unwrap_or((0,));
        if existing > 0 {
            tracing::info!(existing, "universite table already populated, skipping seed");
            return Ok(0);
        }
        let mut inserted = 0;
        for item in items {
            let q = sql::insert_university(item);
            let _: Option<(i64,)> = Self::fetch_optional(&mut *tx, &q).await?;
            inserted += 1;
        }
        tx.commit().await?;
        Ok(inserted)
    }

    async fn fetch_all<O>(conn: &mut PgConnection, q: &QueryBuf) -> Result<Vec<O>, AppError>
    where
        O: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query_as::<_, O>(&q.sql), &q.params)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn fetch_optional<O>(conn: &mut PgConnection, q: &QueryBuf) -> Result<Option<O>, AppError>
    where
        O: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query_as::<_, O>(&q.sql), &q.params)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }
}

/// Equality filters on country and ISO code; blank values are ignored.
pub fn university_filters(query: &UniversityQuery) -> Vec<Filter> {
    let mut filters = Vec::new();
    if let Some(pays) = non_empty(&query.pays) {
        filters.push(Filter::university_eq("pays", pays));
    }
    if let Some(iso) = non_empty(&query.iso) {
        filters.push(Filter::university_eq("iso", iso));
    }
    filters
}

/// Equality filters on names, sex and university ISO code, plus the average comparison
/// when both `moyenne` and a known `moyenne_operation` are supplied.
pub fn student_filters(query: &StudentQuery) -> Vec<Filter> {
    let mut filters = Vec::new();
    if let Some(nom) = non_empty(&query.nom) {
        filters.push(Filter::student_eq("nom", nom));
    }
    if let Some(prenom) = non_empty(&query.prenom) {
        filters.push(Filter::student_eq("prenom", prenom));
    }
    if let Some(sexe) = non_empty(&query.sexe) {
        filters.push(Filter::student_eq("sexe", sexe));
    }
    if let (Some(moyenne), Some(code)) = (query.moyenne, non_empty(&query.moyenne_operation)) {
        match CompareOp::from_code(code) {
            Some(op) => filters.push(Filter::student_compare("moyenne", op, moyenne)),
            None => tracing::debug!(moyenne_operation = code, "unknown operation, average filter skipped"),
        }
    }
    if let Some(iso) = non_empty(&query.iso) {
        filters.push(Filter::university_eq("iso", iso));
    }
    filters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::SqlParam;

    fn columns(filters: &[Filter]) -> Vec<(&str, &str, CompareOp)> {
        filters.iter().map(|f| (f.alias, f.column, f.op)).collect()
    }

    #[test]
    fn university_filters_skip_blank_values() {
        let q = UniversityQuery {
            pays: Some(String::new()),
            iso: Some("FR".into()),
            ..Default::default()
        };
        let filters = university_filters(&q);
        assert_eq!(columns(&filters), vec![("u", "iso", CompareOp::Eq)]);
        assert_eq!(filters[0].value, SqlParam::Text("FR".into()));
    }

    #[test]
    fn student_filters_cover_every_field() {
        let q = StudentQuery {
            nom: Some("Doe".into()),
            prenom: Some("John".into()),
            iso: Some("FR".into()),
            sexe: Some("Male".into()),
            moyenne: Some(12.0),
            moyenne_operation: Some("lt".into()),
        };
        assert_eq!(
            columns(&student_filters(&q)),
            vec![
                ("e", "nom", CompareOp::Eq),
                ("e", "prenom", CompareOp::Eq),
                ("e", "sexe", CompareOp::Eq),
                ("e", "moyenne", CompareOp::Lt),
                ("u", "iso", CompareOp::Eq),
            ]
        );
    }

    #[test]
    fn average_needs_both_value_and_operation() {
        let only_value = StudentQuery {
            moyenne: Some(12.0),
            ..Default::default()
        };
        assert!(student_filters(&only_value).is_empty());

        let only_op = StudentQuery {
            moyenne_operation: Some("ge".into()),
            ..Default::default()
        };
        assert!(student_filters(&only_op).is_empty());
    }

    #[test]
    fn unknown_operation_is_ignored() {
        let q = StudentQuery {
            moyenne: Some(12.0),
            moyenne_operation: Some("between".into()),
            ..Default::default()
        };
        assert!(student_filters(&q).is_empty());
    }

    #[test]
    fn zero_average_still_filters() {
        let q = StudentQuery {
            moyenne: Some(0.0),
            moyenne_operation: Some("eq".into()),
            ..Default::default()
        };
        let filters = student_filters(&q);
        assert_eq!(columns(&filters), vec![("e", "moyenne", CompareOp::Eq)]);
        assert_eq!(filters[0].value, SqlParam::Float(0.0));
    }
}
