//! Data models for stackshift

pub mod customization;
pub mod plan;
pub mod request;
pub mod stack;

pub use customization::{Aggressiveness, PlanCustomization};
pub use plan::{
    automation_percentage, DependencyNode, DependencyRef, ExecutionTimeline, MigrationPhase,
    MigrationPlan, MigrationTask, PatternRef, PlanSummary, RiskLevel, TaskType, ValidationResult,
};
pub use request::PlanRequest;
pub use stack::{
    CodebaseStats, DetectedPattern, HealthScore, PatternCategory, Severity, SourceStack,
    TargetStack,
};
