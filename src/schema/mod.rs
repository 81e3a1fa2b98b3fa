//! Warehouse schema provisioning.
//!
//! The schema lives in a declarative SQL file (`CREATE TABLE IF NOT EXISTS`
//! per relation). Statements are executed one at a time so a malformed
//! definition fails with the offending statement in hand, and re-running
//! against an already-provisioned store is a no-op.

use std::path::{Path, PathBuf};

use crate::warehouse::Warehouse;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while provisioning the warehouse schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema file not found: {0}")]
    SchemaFileNotFound(PathBuf),

    #[error("failed to read schema file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema statement failed: `{statement}`: {source}")]
    StatementFailed {
        statement: String,
        #[source]
        source: rusqlite::Error,
    },
}

/// Ensure all warehouse relations exist per the schema file.
///
/// Returns the number of statements executed.
pub fn provision(warehouse: &Warehouse, schema_file: &Path) -> SchemaResult<usize> {
    if !schema_file.exists() {
        return Err(SchemaError::SchemaFileNotFound(schema_file.to_path_buf()));
    }

    let script = std::fs::read_to_string(schema_file).map_err(|source| SchemaError::Read {
        path: schema_file.to_path_buf(),
        source,
    })?;

    let mut executed = 0;
    for statement in split_statements(&script) {
        warehouse
            .connection()
            .execute(statement, [])
            .map_err(|source| SchemaError::StatementFailed {
                statement: statement.to_string(),
                source,
            })?;
        executed += 1;
    }

    tracing::info!(statements = executed, "warehouse schema provisioned");
    Ok(executed)
}

/// Split a SQL script into statements, dropping blanks and `--` comments.
fn split_statements(script: &str) -> Vec<&str> {
    script
        .split(';')
        .map(str::trim)
        .filter(|chunk| {
            !chunk.is_empty() && !chunk.lines().all(|line| {
                let line = line.trim();
                line.is_empty() || line.starts_with("--")
            })
        })
        .collect()
}
