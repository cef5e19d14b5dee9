//! Error types for stackshift-core
//!
//! `PlanError` signals programming-invariant violations and configuration
//! failures. Expected bad input (cycles, dangling references, empty phases)
//! never uses it: those land in `ValidationResult` or in `PlanDiagnostics`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Fatal error raised by the planning engine
#[derive(Error, Debug)]
pub enum PlanError {
    // ===================
    // Graph invariants
    // ===================
    #[error("Duplicate task id in plan: {task_id}")]
    DuplicateTaskId { task_id: String },

    #[error("Dependency node references unknown task: {task_id}")]
    UnknownTask { task_id: String },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        message: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Severity of a planning diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Informational, plan unaffected
    Info,
    /// Plan is usable but something needs attention
    Warning,
}

/// One observation recorded while building a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Component that produced the entry (e.g., "phases", "graph")
    pub source: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
}

impl Diagnostic {
    pub fn info(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: DiagnosticSeverity::Info,
        }
    }

    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: DiagnosticSeverity::Warning,
        }
    }
}

/// Report of non-fatal observations made during plan construction
///
/// Returned with the plan instead of being pushed to a process-wide sink,
/// so hosts decide what to surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanDiagnostics {
    pub entries: Vec<Diagnostic>,
}

impl PlanDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_info(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.entries.push(Diagnostic::info(source, message));
    }

    pub fn add_warning(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.entries.push(Diagnostic::warning(source, message));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns only warnings
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}
