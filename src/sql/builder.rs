//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the `universite` and `etudiant` tables.

use crate::model::{NewStudent, NewUniversity, Student};
use crate::sql::params::SqlParam;

pub const UNIVERSITY_TABLE: &str = "universite";
pub const STUDENT_TABLE: &str = "etudiant";

const UNIVERSITY_ALIAS: &str = "u";
const STUDENT_ALIAS: &str = "e";

const UNIVERSITY_COLUMNS: &[&str] = &["id", "universite", "rang", "pays", "iso"];
const STUDENT_COLUMNS: &[&str] = &["id", "prenom", "nom", "pays", "sexe", "moyenne", "universite_id"];

/// Quote identifier for PostgreSQL (identifiers are constants of this module).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn qualified_column(alias: &str, column: &str) -> String {
    format!("{}.{}", alias, quoted(column))
}

fn column_list(alias: Option<&str>, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| match alias {
            Some(a) => qualified_column(a, c),
            None => quoted(c),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comparison used in a WHERE predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl CompareOp {
    /// Parse the `moyenne_operation` query code. Unknown codes yield None.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "lt" => Some(CompareOp::Lt),
            "le" => Some(CompareOp::Le),
            "eq" => Some(CompareOp::Eq),
            "ge" => Some(CompareOp::Ge),
            "gt" => Some(CompareOp::Gt),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Eq => "=",
            CompareOp::Ge => ">=",
            CompareOp::Gt => ">",
        }
    }
}

/// One `alias."column" <op> $n` predicate.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub alias: &'static str,
    pub column: &'static str,
    pub op: CompareOp,
    pub value: SqlParam,
}

impl Filter {
    pub fn university_eq(column: &'static str, value: impl Into<SqlParam>) -> Self {
        Filter {
            alias: UNIVERSITY_ALIAS,
            column,
            op: CompareOp::Eq,
            value: value.into(),
        }
    }

    pub fn student_eq(column: &'static str, value: impl Into<SqlParam>) -> Self {
        Self::student_compare(column, CompareOp::Eq, value)
    }

    pub fn student_compare(column: &'static str, op: CompareOp, value: impl Into<SqlParam>) -> Self {
        Filter {
            alias: STUDENT_ALIAS,
            column,
            op,
            value: value.into(),
        }
    }
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlParam) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }

    /// ` WHERE a AND b ...`, or empty when there are no filters. Params bound in filter order.
    fn where_clause(&mut self, filters: &[Filter]) -> String {
        let mut parts = Vec::with_capacity(filters.len());
        for f in filters {
            let n = self.push_param(f.value.clone());
            parts.push(format!("{} {} ${}", qualified_column(f.alias, f.column), f.op.as_sql(), n));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        }
    }

    fn page_clause(&mut self, limit: Option<i64>, offset: Option<i64>) -> String {
        let mut out = String::new();
        if let Some(n) = limit {
            let p = self.push_param(SqlParam::Int(n));
            out.push_str(&format!(" LIMIT ${}", p));
        }
        if let Some(n) = offset {
            let p = self.push_param(SqlParam::Int(n));
            out.push_str(&format!(" OFFSET ${}", p));
        }
        out
    }
}

/// Student ids of the outer university row, ascending, as BIGINT[] (empty array when none).
fn student_ids_subquery() -> String {
    let e = STUDENT_ALIAS;
    format!(
        "(SELECT COALESCE(array_agg({id} ORDER BY {id}), '{{}}'::bigint[]) FROM {table} {e} WHERE {fk} = {uid}) AS {out}",
        id = qualified_column(e, "id"),
        table = quoted(STUDENT_TABLE),
        e = e,
        fk = qualified_column(e, "universite_id"),
        uid = qualified_column(UNIVERSITY_ALIAS, "id"),
        out = quoted("etudiant_ids"),
    )
}

/// SELECT universities with their student ids, filtered, ORDER BY id, optional LIMIT/OFFSET.
pub fn select_universities(filters: &[Filter], limit: Option<i64>, offset: Option<i64>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = q.where_clause(filters);
    let page_clause = q.page_clause(limit, offset);
    q.sql = format!(
        "SELECT {}, {} FROM {} {}{} ORDER BY {}{}",
        column_list(Some(UNIVERSITY_ALIAS), UNIVERSITY_COLUMNS),
        student_ids_subquery(),
        quoted(UNIVERSITY_TABLE),
        UNIVERSITY_ALIAS,
        where_clause,
        qualified_column(UNIVERSITY_ALIAS, "id"),
        page_clause
    );
    q
}

pub fn select_university_by_id(id: i64) -> QueryBuf {
    select_universities(&[Filter::university_eq("id", id)], None, None)
}

/// SELECT students INNER JOIN their university (so university columns can be filtered), ORDER BY id.
pub fn select_students(filters: &[Filter]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = q.where_clause(filters);
    q.sql = format!(
        "SELECT {} FROM {} {} INNER JOIN {} {} ON {} = {}{} ORDER BY {}",
        column_list(Some(STUDENT_ALIAS), STUDENT_COLUMNS),
        quoted(STUDENT_TABLE),
        STUDENT_ALIAS,
        quoted(UNIVERSITY_TABLE),
        UNIVERSITY_ALIAS,
        qualified_column(UNIVERSITY_ALIAS, "id"),
        qualified_column(STUDENT_ALIAS, "universite_id"),
        where_clause,
        qualified_column(STUDENT_ALIAS, "id"),
    );
    q
}

/// Plain lookup without the join, so a student is found even if its university row is gone.
pub fn select_student_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = q.where_clause(&[Filter::student_eq("id", id)]);
    q.sql = format!(
        "SELECT {} FROM {} {}{}",
        column_list(Some(STUDENT_ALIAS), STUDENT_COLUMNS),
        quoted(STUDENT_TABLE),
        STUDENT_ALIAS,
        where_clause
    );
    q
}

fn insert(table: &str, values: Vec<(&str, SqlParam)>, returning: &[&str]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, v) in values {
        let n = q.push_param(v);
        cols.push(quoted(col));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table),
        cols.join(", "),
        placeholders.join(", "),
        column_list(None, returning)
    );
    q
}

/// INSERT one student; the id comes from the BIGSERIAL default.
pub fn insert_student(s: &NewStudent) -> QueryBuf {
    insert(
        STUDENT_TABLE,
        vec![
            ("prenom", s.prenom.as_str().into()),
            ("nom", s.nom.as_str().into()),
            ("pays", s.pays.as_str().into()),
            ("sexe", s.sexe.as_str().into()),
            ("moyenne", s.moyenne.into()),
            ("universite_id", s.universite_id.into()),
        ],
        STUDENT_COLUMNS,
    )
}

/// INSERT one university, returning only its id.
pub fn insert_university(u: &NewUniversity) -> QueryBuf {
    insert(
        UNIVERSITY_TABLE,
        vec![
            ("universite", u.universite.as_str().into()),
            ("rang", u.rang.into()),
            ("pays", u.pays.as_str().into()),
            ("iso", u.iso.as_str().into()),
        ],
        &["id"],
    )
}

/// UPDATE every non-key column from an already merged student.
pub fn update_student(s: &Student) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values: Vec<(&str, SqlParam)> = vec![
        ("prenom", s.prenom.as_str().into()),
        ("nom", s.nom.as_str().into()),
        ("pays", s.pays.as_str().into()),
        ("sexe", s.sexe.as_str().into()),
        ("moyenne", s.moyenne.into()),
        ("universite_id", s.universite_id.into()),
    ];
    let mut sets = Vec::with_capacity(values.len());
    for (col, v) in values {
        let n = q.push_param(v);
        sets.push(format!("{} = ${}", quoted(col), n));
    }
    let id_param = q.push_param(SqlParam::Int(s.id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(STUDENT_TABLE),
        sets.join(", "),
        quoted("id"),
        id_param,
        column_list(None, STUDENT_COLUMNS)
    );
    q
}

/// DELETE by id, returning the id when a row was removed.
pub fn delete_student(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlParam::Int(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        quoted(STUDENT_TABLE),
        quoted("id"),
        n,
        quoted("id")
    );
    q
}

pub fn count_universities() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", quoted(UNIVERSITY_TABLE));
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_op_codes() {
        assert_eq!(CompareOp::from_code("lt").map(CompareOp::as_sql), Some("<"));
        assert_eq!(CompareOp::from_code("le").map(CompareOp::as_sql), Some("<="));
        assert_eq!(CompareOp::from_code("eq").map(CompareOp::as_sql), Some("="));
        assert_eq!(CompareOp::from_code("ge").map(CompareOp::as_sql), Some(">="));
        assert_eq!(CompareOp::from_code("gt").map(CompareOp::as_sql), Some(">"));
        assert_eq!(CompareOp::from_code("GT"), None);
        assert_eq!(CompareOp::from_code("ne"), None);
    }

    #[test]
    fn universities_without_filters_are_paged_by_id() {
        let q = select_universities(&[], Some(50), Some(0));
        assert!(q.sql.starts_with(r#"SELECT u."id", u."universite", u."rang", u."pays", u."iso", (SELECT COALESCE(array_agg(e."id" ORDER BY e."id"), '{}'::bigint[])"#));
        assert!(q.sql.ends_with(r#"FROM "universite" u ORDER BY u."id" LIMIT $1 OFFSET $2"#));
        assert_eq!(q.params, vec![SqlParam::Int(50), SqlParam::Int(0)]);
    }

    #[test]
    fn university_filters_precede_paging_params() {
        let filters = [Filter::university_eq("pays", "France"), Filter::university_eq("iso", "FR")];
        let q = select_universities(&filters, Some(10), Some(20));
        assert!(q.sql.contains(r#" WHERE u."pays" = $1 AND u."iso" = $2 ORDER BY u."id" LIMIT $3 OFFSET $4"#));
        assert_eq!(
            q.params,
            vec![
                SqlParam::Text("France".into()),
                SqlParam::Text("FR".into()),
                SqlParam::Int(10),
                SqlParam::Int(20)
            ]
        );
    }

    #[test]
    fn university_by_id_has_no_paging() {
        let q = select_university_by_id(4);
        assert!(q.sql.ends_with(r#"WHERE u."id" = $1 ORDER BY u."id""#));
        assert_eq!(q.params, vec![SqlParam::Int(4)]);
    }

    #[test]
    fn students_join_university_and_compare_average() {
        let filters = [
            Filter::student_eq("nom", "Doe"),
            Filter::university_eq("iso", "FR"),
            Filter::student_compare("moyenne", CompareOp::Ge, 12.0),
        ];
        let q = select_students(&filters);
        assert_eq!(
            q.sql,
            r#"SELECT e."id", e."prenom", e."nom", e."pays", e."sexe", e."moyenne", e."universite_id" FROM "etudiant" e INNER JOIN "universite" u ON u."id" = e."universite_id" WHERE e."nom" = $1 AND u."iso" = $2 AND e."moyenne" >= $3 ORDER BY e."id""#
        );
        assert_eq!(q.params[2], SqlParam::Float(12.0));
    }

    #[test]
    fn insert_student_binds_null_average() {
        let q = insert_student(&NewStudent {
            prenom: "John".into(),
            nom: "Doe".into(),
            pays: "France".into(),
            sexe: "Male".into(),
            moyenne: None,
            universite_id: 1,
        });
        assert_eq!(
            q.sql,
            r#"INSERT INTO "etudiant" ("prenom", "nom", "pays", "sexe", "moyenne", "universite_id") VALUES ($1, $2, $3, $4, $5, $6) RETURNING "id", "prenom", "nom", "pays", "sexe", "moyenne", "universite_id""#
        );
        assert_eq!(q.params[4], SqlParam::NullFloat);
        assert_eq!(q.params[5], SqlParam::Int(1));
    }

    #[test]
    fn update_student_sets_all_columns_and_binds_id_last() {
        let q = update_student(&Student {
            id: 7,
            prenom: "John".into(),
            nom: "Doe".into(),
            pays: "France".into(),
            sexe: "Male".into(),
            moyenne: Some(16.2),
            universite_id: 1,
        });
        assert!(q.sql.starts_with(r#"UPDATE "etudiant" SET "prenom" = $1, "nom" = $2"#));
        assert!(q.sql.contains(r#"WHERE "id" = $7 RETURNING"#));
        assert_eq!(q.params.last(), Some(&SqlParam::Int(7)));
    }

    #[test]
    fn delete_returns_id() {
        let q = delete_student(3);
        assert_eq!(q.sql, r#"DELETE FROM "etudiant" WHERE "id" = $1 RETURNING "id""#);
        assert_eq!(q.params, vec![SqlParam::Int(3)]);
    }

    #[test]
    fn insert_university_binds_rank_as_integer() {
        let q = insert_university(&NewUniversity {
            universite: "Paris-Dauphine".into(),
            rang: 1,
            pays: "France".into(),
            iso: "FR".into(),
        });
        assert_eq!(q.params[1], SqlParam::Int4(1));
        assert!(q.sql.ends_with(r#"RETURNING "id""#));
    }
}
