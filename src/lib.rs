//! # Cubist
//!
//! A retail warehouse loader and OLAP cube engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Prepared CSVs (one per relation)            │
//! │         (customers, products, sales, pre-cleaned)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [contract + dataset]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Typed Datasets (Rust rows)               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [schema + loader]
//! ┌─────────────────────────────────────────────────────────┐
//! │           Warehouse (SQLite star schema, full            │
//! │            reload inside a single transaction)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [cube builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Sales Cube (month × region × category ×           │
//! │          payment type, materialized as CSV)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [rollups]
//! ┌─────────────────────────────────────────────────────────┐
//! │    Drill-down results (year/month, payment, category     │
//! │            × region, top category per region)            │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod contract;
pub mod cube;
pub mod dataset;
pub mod loader;
pub mod rollup;
pub mod schema;
pub mod warehouse;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{PathSettings, Settings, SettingsError};
    pub use crate::contract::{ColumnSpec, SemanticType, TableContract};
    pub use crate::cube::{build_cube, CubeError, CubeRow, MonthKey};
    pub use crate::dataset::{read_prepared, Dataset, DatasetError, Value};
    pub use crate::loader::{load, LoadError, LoadPlan, LoadReport};
    pub use crate::schema::{provision, SchemaError};
    pub use crate::warehouse::{Warehouse, WarehouseError};
}
