//! Data models for generated migration plans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::customization::PlanCustomization;
use super::stack::{PatternCategory, Severity, SourceStack, TargetStack};
use crate::error::PlanDiagnostics;

/// Task risk reuses the three-level severity scale (`low < medium < high`)
pub type RiskLevel = Severity;

/// How a task gets done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Fully handled by tooling
    Automated,
    /// Needs a human
    Manual,
    /// Tooling output reviewed by a human
    Review,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Automated => "automated",
            Self::Manual => "manual",
            Self::Review => "review",
        }
    }
}

/// Reference from a task to something it waits on
///
/// `PhaseGate` expresses phase-level gating without naming a concrete task.
/// Phase gates never become graph edges and are always treated as satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum DependencyRef {
    Task(String),
    PhaseGate(String),
}

impl DependencyRef {
    pub fn task(id: impl Into<String>) -> Self {
        Self::Task(id.into())
    }

    pub fn phase_gate(phase_id: impl Into<String>) -> Self {
        Self::PhaseGate(phase_id.into())
    }

    /// Task id, if this reference points at a task
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Self::Task(id) => Some(id),
            Self::PhaseGate(_) => None,
        }
    }
}

/// Link back to the pattern a task was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRef {
    pub id: String,
    pub category: PatternCategory,
}

/// One unit of migration work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationTask {
    /// Unique within a plan
    pub id: String,

    pub name: String,

    pub description: String,

    #[serde(rename = "type")]
    pub task_type: TaskType,

    /// Manual-equivalent duration
    pub estimated_minutes: u32,

    /// Duration with tooling
    pub automated_minutes: u32,

    pub risk_level: RiskLevel,

    #[serde(default)]
    pub affected_files: Vec<String>,

    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,

    #[serde(default)]
    pub breaking_changes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternRef>,
}

impl MigrationTask {
    /// Ids of the tasks this task depends on (phase gates skipped)
    pub fn task_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().filter_map(DependencyRef::task_id)
    }
}

/// Ordered group of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationPhase {
    pub id: String,

    pub name: String,

    pub description: String,

    /// Phases are consumed in ascending order
    pub order: u32,

    pub tasks: Vec<MigrationTask>,

    pub total_estimated_minutes: u32,

    pub total_automated_minutes: u32,

    /// Highest task risk in the phase
    pub risk_level: RiskLevel,

    /// True when no task in the phase depends on anything
    pub can_run_in_parallel: bool,
}

impl MigrationPhase {
    /// Build a phase and derive its aggregates from the tasks
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        order: u32,
        tasks: Vec<MigrationTask>,
    ) -> Self {
        let mut phase = Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            order,
            tasks,
            total_estimated_minutes: 0,
            total_automated_minutes: 0,
            risk_level: RiskLevel::Low,
            can_run_in_parallel: true,
        };
        phase.recompute_totals();
        phase
    }

    /// Refresh aggregates after the task list changed
    pub fn recompute_totals(&mut self) {
        self.total_estimated_minutes = self.tasks.iter().map(|t| t.estimated_minutes).sum();
        self.total_automated_minutes = self.tasks.iter().map(|t| t.automated_minutes).sum();
        self.risk_level = self
            .tasks
            .iter()
            .map(|t| t.risk_level)
            .max()
            .unwrap_or(RiskLevel::Low);
        self.can_run_in_parallel = self.tasks.iter().all(|t| t.dependencies.is_empty());
    }

    /// Share of manual time saved by tooling, rounded (0 for an empty phase)
    pub fn automation_percentage(&self) -> i32 {
        automation_percentage(self.total_estimated_minutes, self.total_automated_minutes)
    }
}

/// `(estimated - automated) / estimated * 100`, rounded, 0 when nothing is estimated
///
/// Negative when tooling takes longer than the manual estimate, which happens
/// for manual work under a conservative buffer.
pub fn automation_percentage(total_estimated: u32, total_automated: u32) -> i32 {
    if total_estimated == 0 {
        return 0;
    }
    let saved = f64::from(total_estimated) - f64::from(total_automated);
    (saved / f64::from(total_estimated) * 100.0).round() as i32
}

/// Scheduling view of one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub task_id: String,

    /// Copy of the task's dependency list
    pub depends_on: Vec<DependencyRef>,

    /// Ids of tasks that depend on this one
    pub blocked_by: Vec<String>,

    /// True iff `depends_on` is empty
    pub can_run_in_parallel: bool,

    pub critical_path: bool,
}

/// Aggregate figures for a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub total_tasks: usize,
    pub automated_tasks: usize,
    pub manual_tasks: usize,
    pub review_tasks: usize,
    pub total_estimated_minutes: u32,
    pub total_automated_minutes: u32,
    /// Negative when automated minutes exceed estimated minutes
    pub automation_percentage: i32,
    /// Complexity score (0-100)
    pub overall_complexity: f64,
    /// Length of the longest duration-weighted dependency chain
    pub critical_path_minutes: u32,
    pub required_skills: Vec<String>,
}

/// Complete migration plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationPlan {
    pub id: String,
    pub source_stack: SourceStack,
    pub target_stack: TargetStack,
    pub phases: Vec<MigrationPhase>,
    pub summary: PlanSummary,
    pub dependency_graph: Vec<DependencyNode>,
    pub customization: PlanCustomization,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "PlanDiagnostics::is_empty")]
    pub diagnostics: PlanDiagnostics,
}

impl MigrationPlan {
    /// All tasks across phases, in phase order
    pub fn tasks(&self) -> impl Iterator<Item = &MigrationTask> {
        self.phases.iter().flat_map(|p| p.tasks.iter())
    }

    /// Owned copy of every task, in phase order
    pub fn all_tasks(&self) -> Vec<MigrationTask> {
        self.tasks().cloned().collect()
    }

    pub fn find_task(&self, task_id: &str) -> Option<&MigrationTask> {
        self.tasks().find(|t| t.id == task_id)
    }
}

/// Outcome of plan validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Sequential vs parallel duration estimates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionTimeline {
    /// Minutes when every task runs one after another (with tooling)
    pub sequential: u32,
    /// Minutes when each batch runs fully in parallel
    pub parallel: u32,
    /// Task ids grouped into dependency-respecting batches
    pub batches: Vec<Vec<String>>,
}
