//! Single-file relational store for the warehouse.
//!
//! Thin handle over a SQLite connection holding the three star-schema
//! relations (`customers`, `products`, `sales`). The loader is the only
//! writer; rollups never touch this store once the cube is materialized.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

/// Result type for warehouse operations.
pub type WarehouseResult<T> = Result<T, WarehouseError>;

/// Errors raised while opening or querying the store.
#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to create warehouse directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Handle on the warehouse database file.
pub struct Warehouse {
    conn: Connection,
}

impl Warehouse {
    /// Open or create the warehouse at the given path.
    ///
    /// Foreign-key enforcement is switched on so the star schema's
    /// references hold for every write that goes through this handle.
    pub fn open(path: &Path) -> WarehouseResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| WarehouseError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Open an in-memory warehouse (for testing).
    pub fn open_in_memory() -> WarehouseResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Shared access to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Exclusive access, needed to open a transaction.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Row count of one relation.
    pub fn row_count(&self, relation: &str) -> WarehouseResult<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", relation),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
