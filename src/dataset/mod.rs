//! Prepared dataset ingestion.
//!
//! Reads the prepared CSV for one relation, re-asserts its column contract,
//! and yields typed rows in contract column order so they bind directly into
//! warehouse inserts.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::types::{ToSql, ToSqlOutput};

use crate::contract::{ContractViolation, SemanticType, TableContract};

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while reading a prepared dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("prepared file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset for '{relation}' violates its contract: {}", render_violations(.violations))]
    Contract {
        relation: &'static str,
        violations: Vec<ContractViolation>,
    },
}

fn render_violations(violations: &[ContractViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Integer(i) => i.to_sql(),
            Value::Float(f) => f.to_sql(),
            Value::Text(s) => s.to_sql(),
            Value::Date(d) => d.to_sql(),
        }
    }
}

/// A validated prepared dataset for one relation.
///
/// Rows hold values in contract column order regardless of how the source
/// file ordered its header.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub contract: &'static TableContract,
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn relation(&self) -> &'static str {
        self.contract.relation
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read and validate the prepared CSV for one relation.
///
/// The header must carry exactly the contract's source columns; every cell
/// must parse as its declared semantic type. Violations are collected per
/// column (first offending row each) and reported together.
pub fn read_prepared(path: &Path, contract: &'static TableContract) -> DatasetResult<Dataset> {
    if !path.exists() {
        return Err(DatasetError::FileNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let positions = contract
        .check_header(&header)
        .map_err(|violations| DatasetError::Contract {
            relation: contract.relation,
            violations,
        })?;

    let mut rows = Vec::new();
    let mut violations: Vec<ContractViolation> = Vec::new();

    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let mut row = Vec::with_capacity(contract.columns.len());
        for (spec, &pos) in contract.columns.iter().zip(&positions) {
            let raw = record.get(pos).unwrap_or("").trim();
            match parse_value(raw, spec.ty) {
                Some(value) => row.push(value),
                None => {
                    // One diagnostic per column, from its first bad row.
                    if !violations.iter().any(|v| {
                        matches!(v, ContractViolation::TypeMismatch { column, .. } if *column == spec.column)
                    }) {
                        violations.push(ContractViolation::TypeMismatch {
                            column: spec.column,
                            expected: spec.ty,
                            row: row_idx + 1,
                            value: raw.to_string(),
                        });
                    }
                }
            }
        }
        rows.push(row);
    }

    if !violations.is_empty() {
        return Err(DatasetError::Contract {
            relation: contract.relation,
            violations,
        });
    }

    tracing::debug!(
        relation = contract.relation,
        rows = rows.len(),
        "prepared dataset read"
    );

    Ok(Dataset { contract, rows })
}

fn parse_value(raw: &str, ty: SemanticType) -> Option<Value> {
    match ty {
        SemanticType::Integer => raw.parse::<i64>().ok().map(Value::Integer),
        SemanticType::Float => raw.parse::<f64>().ok().map(Value::Float),
        SemanticType::Text => Some(Value::Text(raw.to_string())),
        SemanticType::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(Value::Date),
    }
}
