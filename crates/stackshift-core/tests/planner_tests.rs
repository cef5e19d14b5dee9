//! Integration tests for plan creation, optimization and validation

use std::collections::BTreeMap;

use stackshift_core::models::{
    Aggressiveness, CodebaseStats, DependencyNode, DependencyRef, DetectedPattern,
    MigrationPhase, MigrationPlan, PatternCategory, PlanCustomization, PlanRequest, Severity,
    SourceStack, TargetStack, TaskType,
};
use stackshift_core::phases::{
    BUILD_TOOL_TASK_ID, DEPENDENCY_PHASE_ID, DOCUMENTATION_PHASE_ID, SMOKE_TEST_TASK_ID,
    TEST_SUITE_TASK_ID, TRANSFORMATION_PHASE_ID, VERIFICATION_PHASE_ID,
};
use stackshift_core::{
    generate_execution_timeline, optimize_plan, validate_plan, EngineConfig, MigrationPlanner,
    PlanError,
};

fn pattern(
    id: &str,
    name: &str,
    category: PatternCategory,
    severity: Severity,
    files: &[&str],
    automated: bool,
) -> DetectedPattern {
    DetectedPattern {
        id: id.to_string(),
        name: name.to_string(),
        category,
        severity,
        occurrences: files.len() as u32,
        affected_files: files.iter().map(|f| f.to_string()).collect(),
        description: String::new(),
        automated,
    }
}

fn react_request() -> PlanRequest {
    let mut dependencies = BTreeMap::new();
    dependencies.insert("react".to_string(), "16.14.0".to_string());
    dependencies.insert("react-scripts".to_string(), "4.0.3".to_string());

    PlanRequest {
        source: SourceStack {
            framework: "react".to_string(),
            version: "16.14.0".to_string(),
            language: "javascript".to_string(),
            dependencies,
            patterns: vec![],
        },
        target: TargetStack {
            framework: "react".to_string(),
            version: "18.2.0".to_string(),
            language: "typescript".to_string(),
            ..Default::default()
        },
        patterns: vec![
            pattern(
                "outdated-router",
                "Outdated react-router",
                PatternCategory::Dependency,
                Severity::Medium,
                &["package.json"],
                true,
            ),
            pattern(
                "legacy-lifecycle",
                "Deprecated lifecycle methods",
                PatternCategory::Component,
                Severity::High,
                &["src/App.js", "src/List.js"],
                false,
            ),
            pattern(
                "class-components",
                "Class components",
                PatternCategory::Structural,
                Severity::Medium,
                &["src/App.js", "src/Header.js"],
                true,
            ),
        ],
        codebase_stats: CodebaseStats {
            total_files: 120,
            total_lines: 14_000,
            test_coverage: 42.0,
        },
        customization: None,
        health_score: None,
    }
}

fn create() -> MigrationPlan {
    MigrationPlanner::default()
        .create_plan(&react_request())
        .unwrap()
}

#[test]
fn test_create_plan_phases() {
    let plan = create();

    assert_eq!(plan.id, "plan-react-16-14-0-to-react-18-2-0");
    let ids: Vec<&str> = plan.phases.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            DEPENDENCY_PHASE_ID,
            DOCUMENTATION_PHASE_ID,
            TRANSFORMATION_PHASE_ID,
            VERIFICATION_PHASE_ID
        ]
    );
    let orders: Vec<u32> = plan.phases.iter().map(|p| p.order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4]);

    // Dependency pattern + build-tool setup
    let deps = &plan.phases[0];
    assert_eq!(deps.tasks.len(), 2);
    assert_eq!(deps.tasks[0].id, "task-pattern-outdated-router");
    assert_eq!(deps.tasks[0].estimated_minutes, 15);
    assert_eq!(deps.tasks[0].automated_minutes, 2);
    assert_eq!(deps.tasks[1].id, BUILD_TOOL_TASK_ID);
    assert!(deps.can_run_in_parallel);

    // Structural pattern present: README, CHANGELOG and migration guide
    assert_eq!(plan.phases[1].tasks.len(), 3);

    let transformations = &plan.phases[2];
    assert!(transformations
        .tasks
        .iter()
        .all(|t| t.dependencies == vec![DependencyRef::phase_gate(DEPENDENCY_PHASE_ID)]));
    let legacy = plan.find_task("task-pattern-legacy-lifecycle").unwrap();
    assert_eq!(legacy.task_type, TaskType::Manual);
    assert_eq!(legacy.risk_level, Severity::Medium);
    assert_eq!(legacy.estimated_minutes, 60);
    assert_eq!(legacy.automated_minutes, 60);

    let suite = plan.find_task(TEST_SUITE_TASK_ID).unwrap();
    assert_eq!(suite.dependencies.len(), 4);
    // Six distinct files across verified tasks, medium complexity
    assert_eq!(suite.estimated_minutes, 90);
    assert_eq!(suite.automated_minutes, 27);
}

#[test]
fn test_create_plan_summary() {
    let plan = create();
    let summary = &plan.summary;

    assert_eq!(summary.total_tasks, 9);
    assert_eq!(summary.automated_tasks, 5);
    assert_eq!(summary.manual_tasks, 2);
    assert_eq!(summary.review_tasks, 2);
    assert_eq!(summary.total_estimated_minutes, 345);
    assert_eq!(summary.total_automated_minutes, 150);
    assert_eq!(summary.automation_percentage, 57);
    assert!(summary.overall_complexity > 0.0 && summary.overall_complexity <= 100.0);
    // README is not on the longest chain: 60 + 90 + 30
    assert_eq!(summary.critical_path_minutes, 180);
    assert!(summary.required_skills.iter().any(|s| s == "TypeScript"));
    assert!(summary.required_skills.iter().any(|s| s == "Version control"));

    assert_eq!(plan.dependency_graph.len(), 9);
    let critical: Vec<&str> = plan
        .dependency_graph
        .iter()
        .filter(|n| n.critical_path)
        .map(|n| n.task_id.as_str())
        .collect();
    assert_eq!(critical, vec![SMOKE_TEST_TASK_ID]);
}

#[test]
fn test_create_plan_is_deterministic() {
    let first = create();
    let mut second = create();
    second.created_at = first.created_at;
    assert_eq!(first, second);
}

#[test]
fn test_phase_automation_percentage() {
    let mut task = create().phases[0].tasks[0].clone();
    task.estimated_minutes = 100;
    task.automated_minutes = 20;
    let phase = MigrationPhase::new("phase-x", "X", "", 1, vec![task]);

    assert_eq!(phase.total_estimated_minutes, 100);
    assert_eq!(phase.total_automated_minutes, 20);
    assert_eq!(phase.automation_percentage(), 80);
}

#[test]
fn test_optimize_then_validate_is_valid() {
    let plan = create();
    let optimized = optimize_plan(&plan);

    let transformations = &optimized.phases[2];
    assert_eq!(transformations.tasks[0].id, "task-pattern-class-components");
    assert_eq!(transformations.tasks[1].id, "task-pattern-legacy-lifecycle");
    assert_eq!(
        optimized.dependency_graph.len(),
        plan.dependency_graph.len()
    );

    let validation = validate_plan(&optimized).unwrap();
    assert!(validation.result.valid);
    assert!(validation.result.errors.is_empty());
    assert!(!validation.repaired);
    assert_eq!(validation.plan, optimized);
}

#[test]
fn test_validate_repairs_injected_cycle() {
    let mut plan = create();
    plan.phases[0].tasks[0]
        .dependencies
        .push(DependencyRef::task(BUILD_TOOL_TASK_ID));
    plan.phases[0].tasks[1]
        .dependencies
        .push(DependencyRef::task("task-pattern-outdated-router"));

    let validation = validate_plan(&plan).unwrap();
    assert!(validation.repaired);
    assert!(validation.result.valid, "{:?}", validation.result.errors);

    let repaired = &validation.plan;
    assert!(repaired.phases[0].tasks.iter().all(|t| t.dependencies.is_empty()));
    assert!(repaired.phases[0].can_run_in_parallel);
    let node = repaired
        .dependency_graph
        .iter()
        .find(|n| n.task_id == BUILD_TOOL_TASK_ID)
        .unwrap();
    assert!(node.depends_on.is_empty());

    // Input plan untouched
    assert_eq!(plan.phases[0].tasks[1].dependencies.len(), 1);

    let timeline = generate_execution_timeline(repaired).unwrap();
    let scheduled: usize = timeline.batches.iter().map(Vec::len).sum();
    assert_eq!(scheduled, repaired.summary.total_tasks);
}

#[test]
fn test_validate_reports_dangling_and_empty() {
    let mut plan = create();
    plan.phases[1].tasks[0]
        .dependencies
        .push(DependencyRef::task("task-ghost"));
    plan.phases
        .push(MigrationPhase::new("phase-empty", "Empty", "", 5, vec![]));

    let validation = validate_plan(&plan).unwrap();
    assert!(!validation.result.valid);
    assert_eq!(
        validation.result.errors,
        vec![
            "Task task-docs-readme depends on unknown task task-ghost".to_string(),
            "Phase phase-empty has no tasks".to_string(),
        ]
    );
}

#[test]
fn test_validate_rejects_node_without_task() {
    let mut plan = create();
    plan.dependency_graph.push(DependencyNode {
        task_id: "task-orphan".to_string(),
        depends_on: vec![],
        blocked_by: vec![],
        can_run_in_parallel: true,
        critical_path: false,
    });

    let err = validate_plan(&plan).unwrap_err();
    assert!(matches!(err, PlanError::UnknownTask { task_id } if task_id == "task-orphan"));
}

#[test]
fn test_execution_timeline() {
    let plan = create();
    let timeline = generate_execution_timeline(&plan).unwrap();

    assert_eq!(timeline.sequential, 150);
    // Longest first batch task (60) + test suite (27) + smoke test (30)
    assert_eq!(timeline.parallel, 117);
    assert_eq!(timeline.batches.len(), 3);
    assert_eq!(timeline.batches[0].len(), 7);
    assert_eq!(timeline.batches[1], vec![TEST_SUITE_TASK_ID]);
    assert_eq!(timeline.batches[2], vec![SMOKE_TEST_TASK_ID]);
    assert!(timeline.parallel <= timeline.sequential);
}

#[test]
fn test_customization_flags() {
    let mut request = react_request();
    request.customization = Some(PlanCustomization {
        skip_tests: true,
        skip_documentation: true,
        disabled_transformations: vec!["legacy-lifecycle".to_string()],
        ..Default::default()
    });

    let plan = MigrationPlanner::default().create_plan(&request).unwrap();
    let ids: Vec<&str> = plan.phases.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![DEPENDENCY_PHASE_ID, TRANSFORMATION_PHASE_ID]);
    assert!(plan.find_task("task-pattern-legacy-lifecycle").is_none());
    assert!(plan
        .diagnostics
        .entries
        .iter()
        .any(|d| d.message.contains("legacy-lifecycle")));
}

#[test]
fn test_engine_config_disables_optional_phases() {
    let config = EngineConfig {
        include_transformation_phase: false,
        include_verification_phase: false,
        ..Default::default()
    };
    let plan = MigrationPlanner::new(config)
        .create_plan(&react_request())
        .unwrap();

    assert_eq!(plan.phases.len(), 2);
    assert_eq!(plan.summary.total_tasks, 5);
}

#[test]
fn test_empty_request_has_only_documentation() {
    let request = PlanRequest {
        source: SourceStack {
            framework: "vue".to_string(),
            version: "2.6".to_string(),
            ..Default::default()
        },
        target: TargetStack {
            framework: "vue".to_string(),
            version: "3.4".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let plan = MigrationPlanner::default().create_plan(&request).unwrap();
    assert_eq!(plan.phases.len(), 1);
    assert_eq!(plan.phases[0].id, DOCUMENTATION_PHASE_ID);
    assert!(validate_plan(&plan).unwrap().result.valid);
}

#[test]
fn test_validate_refreshes_summary_after_repair() {
    let mut plan = create();
    // Cycle between the two dependency tasks, plus a regular edge that
    // lengthens the chain: guide (60) -> lifecycle (60) -> suite (90) -> smoke (30)
    plan.phases[0].tasks[0]
        .dependencies
        .push(DependencyRef::task(BUILD_TOOL_TASK_ID));
    plan.phases[0].tasks[1]
        .dependencies
        .push(DependencyRef::task("task-pattern-outdated-router"));
    let lifecycle = plan.phases[2]
        .tasks
        .iter_mut()
        .find(|t| t.id == "task-pattern-legacy-lifecycle")
        .unwrap();
    lifecycle
        .dependencies
        .push(DependencyRef::task("task-docs-migration-guide"));
    assert_eq!(plan.summary.critical_path_minutes, 180);

    let validation = validate_plan(&plan).unwrap();
    assert!(validation.repaired);
    assert!(validation.result.valid, "{:?}", validation.result.errors);

    let summary = &validation.plan.summary;
    assert_eq!(summary.critical_path_minutes, 240);
    assert_eq!(summary.total_tasks, 9);
    assert_eq!(summary.total_estimated_minutes, 345);
    assert_eq!(summary.automation_percentage, 57);
    assert_eq!(summary.overall_complexity, plan.summary.overall_complexity);
    assert_eq!(summary.required_skills, plan.summary.required_skills);
}

#[test]
fn test_pattern_ids_named_like_fixed_tasks() {
    for colliding in ["docs-readme", "build-tool-setup"] {
        let mut request = react_request();
        request.patterns.push(pattern(
            colliding,
            "Pattern named like a fixed task",
            PatternCategory::Dependency,
            Severity::Low,
            &["package.json"],
            true,
        ));

        let plan = MigrationPlanner::default()
            .create_plan(&request)
            .unwrap_or_else(|e| panic!("pattern {}: {}", colliding, e));

        let derived = format!("task-pattern-{}", colliding);
        assert!(plan.find_task(&derived).is_some());
        assert!(plan.find_task(&format!("task-{}", colliding)).is_some());
        assert_eq!(plan.summary.total_tasks, 10);
        assert!(validate_plan(&plan).unwrap().result.valid);
    }
}

#[test]
fn test_automation_percentage_negative_for_conservative_manual_work() {
    let request = PlanRequest {
        source: SourceStack {
            framework: "vue".to_string(),
            version: "2.6".to_string(),
            ..Default::default()
        },
        target: TargetStack {
            framework: "vue".to_string(),
            version: "3.4".to_string(),
            ..Default::default()
        },
        patterns: vec![pattern(
            "vuex",
            "Vuex store",
            PatternCategory::Dependency,
            Severity::Low,
            &["src/store.js"],
            false,
        )],
        customization: Some(PlanCustomization {
            aggressiveness: Aggressiveness::Conservative,
            skip_tests: true,
            skip_documentation: true,
            ..Default::default()
        }),
        ..Default::default()
    };

    let plan = MigrationPlanner::default().create_plan(&request).unwrap();
    assert_eq!(plan.summary.total_estimated_minutes, 5);
    assert_eq!(plan.summary.total_automated_minutes, 6);
    assert_eq!(plan.summary.automation_percentage, -20);
    assert_eq!(plan.phases[0].automation_percentage(), -20);
}
