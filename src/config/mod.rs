//! Configuration module for Cubist.
//!
//! Handles the pipeline's file locations and settings loading.

mod settings;

pub use settings::{expand_env_vars, PathSettings, Settings, SettingsError};
