//! stackshift-core - Core library for stackshift
//!
//! Builds migration plans: complexity scoring, phase generation, dependency
//! graphs with cycle repair, and execution timelines.

pub mod complexity;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod models;
pub mod phases;
pub mod planner;
pub mod rules;

pub use complexity::{estimate_complexity, ComplexityEstimate, ComplexityLevel};
pub use config::EngineConfig;
pub use error::{PlanDiagnostics, PlanError};
pub use export::{
    export_plan_to_json, export_plan_to_markdown, plan_to_json, plan_to_markdown,
    write_plan_markdown,
};
pub use graph::DependencyGraph;
pub use phases::{generate_phases, PhaseGenerator};
pub use planner::{
    generate_execution_timeline, optimize_plan, validate_plan, MigrationPlanner, PlanValidation,
};
