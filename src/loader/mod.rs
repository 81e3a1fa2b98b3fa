//! Full-reload warehouse loading.
//!
//! The loader replaces the warehouse contents wholesale: inside a single
//! transaction it deletes every planned relation (facts first), then inserts
//! the validated datasets (dimensions first), and commits once. Any failure
//! rolls the store back to its prior state; a load is never partially
//! visible.

mod plan;

pub use plan::{LoadPlan, PlanError, PlanResult, RelationPlan};

use rusqlite::params_from_iter;

use crate::dataset::Dataset;
use crate::warehouse::Warehouse;

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised during a warehouse load.
///
/// Every variant names the relation it failed on; nothing commits when any
/// is returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("no dataset provided for planned relation '{0}'")]
    MissingDataset(&'static str),

    #[error("dataset '{0}' is not part of the load plan")]
    UnplannedDataset(&'static str),

    #[error("failed to open load transaction: {0}")]
    Begin(#[source] rusqlite::Error),

    #[error("failed to clear relation '{relation}': {source}")]
    Delete {
        relation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to insert into relation '{relation}': {source}")]
    Insert {
        relation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to commit load transaction: {0}")]
    Commit(#[source] rusqlite::Error),
}

/// Row counts per relation after a successful load, in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: Vec<RelationCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationCount {
    pub relation: &'static str,
    pub rows: usize,
}

impl LoadReport {
    pub fn rows_for(&self, relation: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|c| c.relation == relation)
            .map(|c| c.rows)
    }

    pub fn total_rows(&self) -> usize {
        self.rows.iter().map(|c| c.rows).sum()
    }
}

/// Replace the warehouse contents with the given datasets.
///
/// Datasets may arrive in any order; the plan decides the true ordering.
/// Every planned relation must have exactly one dataset.
pub fn load(
    warehouse: &mut Warehouse,
    plan: &LoadPlan,
    datasets: &[Dataset],
) -> LoadResult<LoadReport> {
    let ordered = plan.ordered()?;

    for dataset in datasets {
        if !ordered
            .iter()
            .any(|rel| rel.contract.relation == dataset.relation())
        {
            return Err(LoadError::UnplannedDataset(dataset.relation()));
        }
    }

    let staged: Vec<(&RelationPlan, &Dataset)> = ordered
        .iter()
        .map(|rel| {
            datasets
                .iter()
                .find(|d| d.relation() == rel.contract.relation)
                .map(|d| (*rel, d))
                .ok_or(LoadError::MissingDataset(rel.contract.relation))
        })
        .collect::<LoadResult<_>>()?;

    let tx = warehouse
        .connection_mut()
        .transaction()
        .map_err(LoadError::Begin)?;

    // Clear facts before the dimensions they reference.
    for (rel, _) in staged.iter().rev() {
        let relation = rel.contract.relation;
        tx.execute(&format!("DELETE FROM {}", relation), [])
            .map_err(|source| LoadError::Delete { relation, source })?;
    }

    let mut report = LoadReport { rows: Vec::new() };
    for (rel, dataset) in &staged {
        let relation = rel.contract.relation;
        let columns = rel.contract.column_names();
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            relation,
            columns.join(", "),
            placeholders
        );

        let mut stmt = tx
            .prepare(&sql)
            .map_err(|source| LoadError::Insert { relation, source })?;
        for row in &dataset.rows {
            stmt.execute(params_from_iter(row.iter()))
                .map_err(|source| LoadError::Insert { relation, source })?;
        }

        tracing::info!(relation, rows = dataset.len(), "relation loaded");
        report.rows.push(RelationCount {
            relation,
            rows: dataset.len(),
        });
    }

    tx.commit().map_err(LoadError::Commit)?;
    Ok(report)
}
