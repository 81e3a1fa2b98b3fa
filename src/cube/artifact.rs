//! Cube artifact persistence.
//!
//! The cube is materialized as a flat CSV
//! (`month,region,product_category,payment_type,total_sales,transaction_count`)
//! so rollups re-read it without touching the warehouse.

use std::path::Path;

use super::{CubeError, CubeResult, CubeRow};

/// Write the cube rows to the artifact path, creating parent directories.
pub fn write_artifact(path: &Path, rows: &[CubeRow]) -> CubeResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CubeError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|source| CubeError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    })?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|source| CubeError::ArtifactWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }
    writer
        .flush()
        .map_err(|source| CubeError::ArtifactWrite {
            path: path.to_path_buf(),
            source: csv::Error::from(source),
        })?;

    tracing::info!(path = %path.display(), rows = rows.len(), "cube artifact written");
    Ok(())
}

/// Read the cube rows back from the artifact path.
pub fn read_artifact(path: &Path) -> CubeResult<Vec<CubeRow>> {
    if !path.exists() {
        return Err(CubeError::ArtifactNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path).map_err(|source| CubeError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    reader
        .deserialize()
        .map(|row| {
            row.map_err(|source| CubeError::ArtifactRead {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}
