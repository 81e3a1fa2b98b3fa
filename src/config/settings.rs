//! TOML-based configuration for Cubist.
//!
//! Supports a config file (cubist.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [paths]
//! schema_file = "sql/warehouse_tables.sql"
//! prepared_dir = "${DATA_ROOT}/prepared"
//! warehouse_db = "${DATA_ROOT}/dw/retail_sales.db"
//! cube_artifact = "${DATA_ROOT}/cube/sales_cube.csv"
//! ```
//!
//! Every stage receives its locations from here; nothing in the pipeline
//! reads a hard-coded path.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Pipeline file locations.
    #[serde(default)]
    pub paths: PathSettings,
}

/// The four locations the pipeline touches.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    /// Declarative schema file executed by the schema manager.
    pub schema_file: PathBuf,

    /// Directory holding the prepared CSVs, one per relation.
    pub prepared_dir: PathBuf,

    /// The warehouse database file.
    pub warehouse_db: PathBuf,

    /// The materialized cube artifact.
    pub cube_artifact: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::from("sql/warehouse_tables.sql"),
            prepared_dir: PathBuf::from("data/prepared"),
            warehouse_db: PathBuf::from("data/dw/retail_sales.db"),
            cube_artifact: PathBuf::from("data/cube/sales_cube.csv"),
        }
    }
}

impl PathSettings {
    /// The prepared CSV for one relation, e.g.
    /// `data/prepared/customers_data_prepared.csv`.
    pub fn prepared_file(&self, relation: &str) -> PathBuf {
        self.prepared_dir
            .join(format!("{}_data_prepared.csv", relation))
    }
}

impl Settings {
    /// Load settings from a TOML file, expanding `${ENV_VAR}` references.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let expanded = expand_env_vars(&content)?;
        Ok(toml::from_str(&expanded)?)
    }

    /// Load settings if the file exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Expand `${VAR}` and `$VAR` references against the process environment.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            if chars.peek() == Some(&'{') {
                chars.next(); // consume '{'
                let mut var_name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            } else {
                let mut var_name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        var_name.push(chars.next().unwrap());
                    } else {
                        break;
                    }
                }
                if var_name.is_empty() {
                    result.push('$');
                } else {
                    let value = env::var(&var_name)
                        .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                    result.push_str(&value);
                }
            }
        } else {
            result.push(c);
        }
    }

    Ok(result)
}
