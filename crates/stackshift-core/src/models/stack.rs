//! Stack and pattern models
//!
//! Passive records describing what is being migrated: the source and target
//! stacks, legacy patterns found by an external detector, and codebase
//! statistics. Everything here is supplied by the caller and read-only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source technology stack (what the project runs on today)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStack {
    /// Framework name (e.g., "react", "vue")
    pub framework: String,

    /// Framework version string (e.g., "16.14.0", "^17.0")
    #[serde(default)]
    pub version: String,

    /// Primary language (e.g., "javascript", "typescript")
    #[serde(default)]
    pub language: String,

    /// Dependency name → version
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Free-text pattern tags
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Target technology stack (what the project migrates to)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetStack {
    pub framework: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Free-text feature tags
    #[serde(default)]
    pub features: Vec<String>,
}

/// Pattern category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternCategory {
    Dependency,
    Structural,
    Component,
    Documentation,
    BuildTool,
}

/// Three-level scale shared by pattern severity and task risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A detected instance of legacy code needing remediation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPattern {
    /// Unique pattern identifier
    pub id: String,

    pub name: String,

    pub category: PatternCategory,

    pub severity: Severity,

    /// How many times the pattern was found
    #[serde(default)]
    pub occurrences: u32,

    #[serde(default)]
    pub affected_files: Vec<String>,

    #[serde(default)]
    pub description: String,

    /// Whether tooling can remediate this pattern without a human
    #[serde(default)]
    pub automated: bool,
}

/// Aggregate statistics about the codebase being migrated
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodebaseStats {
    pub total_files: u32,
    pub total_lines: u64,
    /// Test coverage percentage (0-100)
    #[serde(default)]
    pub test_coverage: f64,
}

/// Project health figures, only used to gate the build-tool setup task
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    /// Build health sub-score (0-100)
    pub build_health: u32,
    /// Overall health score (0-100)
    pub total: u32,
}
