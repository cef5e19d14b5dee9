//! Request and plan file loading
//!
//! `.yaml` / `.yml` files are parsed as YAML, everything else as JSON.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use stackshift_core::models::{MigrationPlan, PlanRequest};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

fn load_document<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))?;

    let value = match DocumentFormat::from_path(path) {
        DocumentFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Invalid {} JSON: {}", what, path.display()))?,
        DocumentFormat::Yaml => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid {} YAML: {}", what, path.display()))?,
    };

    tracing::debug!(path = %path.display(), kind = what, "Loaded input file");
    Ok(value)
}

/// Load a planning request (JSON or YAML)
pub fn load_request(path: &Path) -> Result<PlanRequest> {
    load_document(path, "request")
}

/// Load a previously generated plan (JSON or YAML)
pub fn load_plan(path: &Path) -> Result<MigrationPlan> {
    load_document(path, "plan")
}
