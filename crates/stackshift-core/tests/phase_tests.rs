//! Integration tests for phase generation

use stackshift_core::generate_phases;
use stackshift_core::models::{
    DetectedPattern, HealthScore, MigrationPhase, PatternCategory, PlanCustomization, Severity,
    SourceStack, TargetStack,
};
use stackshift_core::phases::{BUILD_TOOL_TASK_ID, MIGRATION_GUIDE_TASK_ID};
use stackshift_core::rules::entry_point_for;

fn source(framework: &str, language: &str, deps: &[&str]) -> SourceStack {
    SourceStack {
        framework: framework.to_string(),
        version: "16.0.0".to_string(),
        language: language.to_string(),
        dependencies: deps
            .iter()
            .map(|d| (d.to_string(), "1.0.0".to_string()))
            .collect(),
        patterns: vec![],
    }
}

fn target() -> TargetStack {
    TargetStack {
        framework: "react".to_string(),
        version: "18.2.0".to_string(),
        language: "typescript".to_string(),
        ..Default::default()
    }
}

fn build_tool_tasks(phases: &[MigrationPhase]) -> Vec<&stackshift_core::models::MigrationTask> {
    phases
        .iter()
        .flat_map(|p| p.tasks.iter())
        .filter(|t| t.id == BUILD_TOOL_TASK_ID)
        .collect()
}

#[test]
fn test_react_without_bundler_gets_one_setup_task() {
    for (language, entry) in [("javascript", "src/main.jsx"), ("typescript", "src/main.tsx")] {
        let phases = generate_phases(
            &source("react", language, &["react-scripts", "webpack"]),
            &target(),
            &[],
            &PlanCustomization::default(),
            None,
        );

        let tasks = build_tool_tasks(&phases);
        assert_eq!(tasks.len(), 1, "{}", language);
        let task = tasks[0];
        assert!(task.affected_files.iter().any(|f| f == entry));
        assert_eq!(task.estimated_minutes, 10);
        assert_eq!(task.risk_level, Severity::Low);
        assert_eq!(task.breaking_changes.len(), 3);
    }
}

#[test]
fn test_modern_bundler_suppresses_setup_task() {
    for tool in ["vite", "esbuild", "turbopack", "@vitejs/plugin-react"] {
        let phases = generate_phases(
            &source("react", "javascript", &[tool]),
            &target(),
            &[],
            &PlanCustomization::default(),
            None,
        );
        assert!(build_tool_tasks(&phases).is_empty(), "{}", tool);
    }
}

#[test]
fn test_non_react_source_gets_no_setup_task() {
    let phases = generate_phases(
        &source("angular", "typescript", &[]),
        &target(),
        &[],
        &PlanCustomization::default(),
        None,
    );
    assert!(build_tool_tasks(&phases).is_empty());
}

#[test]
fn test_healthy_build_skips_setup_task() {
    let healthy = HealthScore {
        build_health: 90,
        total: 85,
    };
    let phases = generate_phases(
        &source("react", "javascript", &[]),
        &target(),
        &[],
        &PlanCustomization::default(),
        Some(&healthy),
    );
    assert!(build_tool_tasks(&phases).is_empty());
}

#[test]
fn test_entry_point_table() {
    assert_eq!(entry_point_for("react", "javascript"), "src/main.jsx");
    assert_eq!(entry_point_for("React", "TypeScript"), "src/main.tsx");
    assert_eq!(entry_point_for("vue", "typescript"), "src/index.ts");
    assert_eq!(entry_point_for("vue", "javascript"), "src/index.js");
}

#[test]
fn test_migration_guide_for_breaking_description() {
    let pattern = DetectedPattern {
        id: "router".to_string(),
        name: "Router v5".to_string(),
        category: PatternCategory::Dependency,
        severity: Severity::Low,
        occurrences: 4,
        affected_files: vec!["src/routes.js".to_string()],
        description: "Major version bump with BREAKING route API".to_string(),
        automated: true,
    };
    let phases = generate_phases(
        &source("react", "javascript", &["vite"]),
        &target(),
        &[pattern],
        &PlanCustomization::default(),
        None,
    );

    let has_guide = phases
        .iter()
        .flat_map(|p| p.tasks.iter())
        .any(|t| t.id == MIGRATION_GUIDE_TASK_ID);
    assert!(has_guide);
}

#[test]
fn test_allow_list_filters_patterns() {
    let patterns: Vec<DetectedPattern> = ["a", "b", "c"]
        .iter()
        .map(|id| DetectedPattern {
            id: id.to_string(),
            name: format!("Pattern {}", id),
            category: PatternCategory::Dependency,
            severity: Severity::Low,
            occurrences: 1,
            affected_files: vec![],
            description: String::new(),
            automated: true,
        })
        .collect();
    let customization = PlanCustomization {
        selected_patterns: vec!["a".to_string(), "c".to_string()],
        disabled_transformations: vec!["c".to_string()],
        ..Default::default()
    };

    let phases = generate_phases(
        &source("vue", "javascript", &[]),
        &target(),
        &patterns,
        &customization,
        None,
    );
    let ids: Vec<&str> = phases[0].tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["task-pattern-a"]);
}
