//! Sales cube construction.
//!
//! Aggregates the fact table across the star schema's dimensions into the
//! materialized cube consumed by every drill-down query. Facts join their
//! dimensions with inner-join semantics: a fact whose reference does not
//! resolve is filtered out, not reported. The loader's referential
//! integrity guarantees make that case unreachable for warehouses it built.

mod artifact;
mod month;

pub use artifact::{read_artifact, write_artifact};
pub use month::{MonthKey, MonthParseError};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::warehouse::Warehouse;

/// Result type for cube operations.
pub type CubeResult<T> = Result<T, CubeError>;

/// Errors raised while building or materializing the cube.
#[derive(Debug, thiserror::Error)]
pub enum CubeError {
    #[error("fact table 'sales' is empty; run the warehouse load first")]
    EmptyFactTable,

    #[error("cube query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Month(#[from] MonthParseError),

    #[error("cube artifact not found: {0}")]
    ArtifactNotFound(PathBuf),

    #[error("failed to write cube artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read cube artifact {path}: {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to create artifact directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One cell of the materialized cube: a unique dimension tuple with its
/// aggregate metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeRow {
    pub month: MonthKey,
    pub region: String,
    pub product_category: String,
    pub payment_type: String,
    pub total_sales: f64,
    pub transaction_count: i64,
}

const CUBE_QUERY: &str = "
    SELECT
        strftime('%Y-%m', s.sale_date) AS month,
        c.region,
        p.category AS product_category,
        s.payment_type,
        SUM(s.sale_amount) AS total_sales,
        COUNT(*) AS transaction_count
    FROM sales s
    JOIN customers c ON s.customer_id = c.customer_id
    JOIN products p ON s.product_id = p.product_id
    GROUP BY month, c.region, p.category, s.payment_type
    ORDER BY month, c.region, p.category, s.payment_type
";

/// Aggregate the fact table into cube rows.
///
/// Groups joined facts by (month, region, product category, payment type)
/// and computes total sales and transaction count per group. Every distinct
/// tuple in the joined data yields exactly one row.
pub fn build_cube(warehouse: &Warehouse) -> CubeResult<Vec<CubeRow>> {
    let facts: i64 = warehouse
        .connection()
        .query_row("SELECT COUNT(*) FROM sales", [], |row| row.get(0))?;
    if facts == 0 {
        return Err(CubeError::EmptyFactTable);
    }

    let mut stmt = warehouse.connection().prepare(CUBE_QUERY)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let cube = rows
        .into_iter()
        .map(|(month, region, product_category, payment_type, total_sales, transaction_count)| {
            Ok(CubeRow {
                month: month.parse()?,
                region,
                product_category,
                payment_type,
                total_sales,
                transaction_count,
            })
        })
        .collect::<CubeResult<Vec<_>>>()?;

    tracing::info!(facts, groups = cube.len(), "sales cube built");
    Ok(cube)
}
