//! DDL for the `universite` and `etudiant` tables, their indexes and the foreign key.
//! Tables first, then indexes. Every statement is idempotent (IF NOT EXISTS).

use crate::error::AppError;
use crate::sql::{STUDENT_TABLE, UNIVERSITY_TABLE};
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

struct ColumnDef {
    name: &'static str,
    ddl: &'static str,
}

struct IndexDef {
    table: &'static str,
    column: &'static str,
}

const UNIVERSITY_COLUMNS: &[ColumnDef] = &[
    ColumnDef { name: "id", ddl: "BIGSERIAL PRIMARY KEY" },
    ColumnDef { name: "universite", ddl: "TEXT NOT NULL" },
    ColumnDef { name: "rang", ddl: "INTEGER NOT NULL" },
    ColumnDef { name: "pays", ddl: "TEXT NOT NULL" },
    ColumnDef { name: "iso", ddl: "TEXT NOT NULL" },
];

/// Deleting a university that still has students is refused by the database.
const STUDENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef { name: "id", ddl: "BIGSERIAL PRIMARY KEY" },
    ColumnDef { name: "prenom", ddl: "TEXT NOT NULL" },
    ColumnDef { name: "nom", ddl: "TEXT NOT NULL" },
    ColumnDef { name: "pays", ddl: "TEXT NOT NULL" },
    ColumnDef { name: "sexe", ddl: "TEXT NOT NULL" },
    ColumnDef { name: "moyenne", ddl: "DOUBLE PRECISION" },
    ColumnDef {
        name: "universite_id",
        ddl: "BIGINT NOT NULL REFERENCES \"universite\" (\"id\") ON UPDATE NO ACTION ON DELETE RESTRICT",
    },
];

const INDEXES: &[IndexDef] = &[
    IndexDef { table: UNIVERSITY_TABLE, column: "universite" },
    IndexDef { table: UNIVERSITY_TABLE, column: "pays" },
    IndexDef { table: UNIVERSITY_TABLE, column: "iso" },
    IndexDef { table: STUDENT_TABLE, column: "pays" },
    IndexDef { table: STUDENT_TABLE, column: "moyenne" },
    IndexDef { table: STUDENT_TABLE, column: "universite_id" },
];

fn create_table_sql(table: &str, columns: &[ColumnDef]) -> String {
    let col_defs: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", quote(c.name), c.ddl))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote(table),
        col_defs.join(",\n  ")
    )
}

fn create_index_sql(idx: &IndexDef) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} USING btree ({})",
        quote(&format!("ix_{}_{}", idx.table, idx.column)),
        quote(idx.table),
        quote(idx.column)
    )
}

/// Statements in dependency order: `universite`, `etudiant`, then indexes.
pub fn migration_statements() -> Vec<String> {
    let mut out = vec![
        create_table_sql(UNIVERSITY_TABLE, UNIVERSITY_COLUMNS),
        create_table_sql(STUDENT_TABLE, STUDENT_COLUMNS),
    ];
    out.extend(INDEXES.iter().map(create_index_sql));
    out
}

pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for sql in migration_statements() {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!("schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn university_table_precedes_student_table() {
        let stmts = migration_statements();
        assert!(stmts[0].starts_with("CREATE TABLE IF NOT EXISTS \"universite\""));
        assert!(stmts[1].starts_with("CREATE TABLE IF NOT EXISTS \"etudiant\""));
        assert!(stmts[1].contains("\"universite_id\" BIGINT NOT NULL REFERENCES \"universite\" (\"id\")"));
        assert!(stmts[1].contains("\"moyenne\" DOUBLE PRECISION,"));
    }

    #[test]
    fn filter_columns_are_indexed() {
        let stmts = migration_statements();
        assert_eq!(stmts.len(), 2 + INDEXES.len());
        assert!(stmts.contains(
            &"CREATE INDEX IF NOT EXISTS \"ix_etudiant_moyenne\" ON \"etudiant\" USING btree (\"moyenne\")".to_string()
        ));
        assert!(stmts.contains(
            &"CREATE INDEX IF NOT EXISTS \"ix_universite_iso\" ON \"universite\" USING btree (\"iso\")".to_string()
        ));
    }
}
