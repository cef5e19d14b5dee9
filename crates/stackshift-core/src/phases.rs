//! Phase generation
//!
//! Turns detected patterns and customization into ordered phases:
//!
//! 1. Dependency updates: one flat task per dependency pattern, plus a
//!    synthetic build-tool setup task for React-like stacks without a modern
//!    bundler.
//! 2. Documentation: README and CHANGELOG, plus a migration guide when the
//!    migration looks breaking. Skipped with `skip_documentation`.
//! 3. Code transformations: structural, component and build-tool patterns,
//!    gated on the dependency phase.
//! 4. Verification: test suite and smoke test, depending on the tasks of
//!    phases 1 and 3. Skipped with `skip_tests`.
//!
//! Phases without tasks are not emitted.

use crate::complexity::{estimate_task_time, TaskTimeInput};
use crate::config::EngineConfig;
use crate::error::PlanDiagnostics;
use crate::models::{
    Aggressiveness, DependencyRef, DetectedPattern, HealthScore, MigrationPhase, MigrationTask,
    PatternCategory, PatternRef, PlanCustomization, RiskLevel, Severity, SourceStack,
    TargetStack, TaskType,
};
use crate::rules;

pub const DEPENDENCY_PHASE_ID: &str = "phase-dependencies";
pub const DOCUMENTATION_PHASE_ID: &str = "phase-documentation";
pub const TRANSFORMATION_PHASE_ID: &str = "phase-transformations";
pub const VERIFICATION_PHASE_ID: &str = "phase-verification";

pub const BUILD_TOOL_TASK_ID: &str = "task-build-tool-setup";
pub const README_TASK_ID: &str = "task-docs-readme";
pub const CHANGELOG_TASK_ID: &str = "task-docs-changelog";
pub const MIGRATION_GUIDE_TASK_ID: &str = "task-docs-migration-guide";
pub const TEST_SUITE_TASK_ID: &str = "task-verify-test-suite";
pub const SMOKE_TEST_TASK_ID: &str = "task-verify-smoke-test";

/// Prefix for tasks derived from detected patterns, disjoint from the fixed ids above
pub const PATTERN_TASK_PREFIX: &str = "task-pattern-";

/// Build-tool setup is a fixed-size task
const BUILD_TOOL_ESTIMATED_MINUTES: u32 = 10;
const BUILD_TOOL_AUTOMATED_MINUTES: u32 = 2;

const SMOKE_TEST_MINUTES: u32 = 30;

/// Migration guide is written when more than this many patterns survive
/// an aggressive run
const AGGRESSIVE_GUIDE_PATTERN_COUNT: usize = 2;

/// Phases plus what was observed while generating them
#[derive(Debug, Clone, Default)]
pub struct PhaseGeneration {
    pub phases: Vec<MigrationPhase>,
    pub diagnostics: PlanDiagnostics,
}

/// Generates phases according to an engine config
#[derive(Debug, Clone)]
pub struct PhaseGenerator<'a> {
    config: &'a EngineConfig,
}

impl<'a> PhaseGenerator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Generate ordered phases for a migration
    pub fn generate(
        &self,
        source: &SourceStack,
        target: &TargetStack,
        patterns: &[DetectedPattern],
        customization: &PlanCustomization,
        health: Option<&HealthScore>,
    ) -> PhaseGeneration {
        let mut diagnostics = PlanDiagnostics::new();

        let surviving: Vec<&DetectedPattern> = patterns
            .iter()
            .filter(|p| {
                let keep = customization.should_include_pattern(&p.id);
                if !keep {
                    diagnostics.add_info(
                        "phases",
                        format!("Pattern {} excluded by customization", p.id),
                    );
                }
                keep
            })
            .collect();

        let aggressiveness = customization.aggressiveness;
        let mut phases = Vec::new();

        let dependency_tasks =
            self.dependency_tasks(source, &surviving, aggressiveness, health, &mut diagnostics);
        if !dependency_tasks.is_empty() {
            phases.push(MigrationPhase::new(
                DEPENDENCY_PHASE_ID,
                "Dependency updates",
                format!(
                    "Update {} dependencies and tooling ahead of the move to {}",
                    source.framework, target.framework
                ),
                1,
                dependency_tasks,
            ));
        }

        if !customization.skip_documentation {
            let docs = documentation_tasks(source, target, &surviving, aggressiveness);
            phases.push(MigrationPhase::new(
                DOCUMENTATION_PHASE_ID,
                "Documentation",
                "Refresh project documentation for the migrated stack",
                2,
                docs,
            ));
        }

        if self.config.include_transformation_phase {
            let transformations: Vec<MigrationTask> = surviving
                .iter()
                .filter(|p| {
                    matches!(
                        p.category,
                        PatternCategory::Structural
                            | PatternCategory::Component
                            | PatternCategory::BuildTool
                    )
                })
                .map(|p| transformation_task(p, aggressiveness))
                .collect();

            if !transformations.is_empty() {
                phases.push(MigrationPhase::new(
                    TRANSFORMATION_PHASE_ID,
                    "Code transformations",
                    "Rewrite structural, component and build patterns",
                    3,
                    transformations,
                ));
            }
        }

        if self.config.include_verification_phase && !customization.skip_tests {
            let verified: Vec<&MigrationTask> = phases
                .iter()
                .filter(|p| p.id == DEPENDENCY_PHASE_ID || p.id == TRANSFORMATION_PHASE_ID)
                .flat_map(|p| p.tasks.iter())
                .collect();

            if !verified.is_empty() {
                let tasks = verification_tasks(&verified, aggressiveness);
                phases.push(MigrationPhase::new(
                    VERIFICATION_PHASE_ID,
                    "Verification",
                    "Run the test suite and smoke-test the migrated application",
                    4,
                    tasks,
                ));
            }
        }

        phases.sort_by_key(|p| p.order);

        tracing::debug!(
            phases = phases.len(),
            patterns = patterns.len(),
            surviving = surviving.len(),
            "Phases generated"
        );

        PhaseGeneration { phases, diagnostics }
    }

    fn dependency_tasks(
        &self,
        source: &SourceStack,
        surviving: &[&DetectedPattern],
        aggressiveness: Aggressiveness,
        health: Option<&HealthScore>,
        diagnostics: &mut PlanDiagnostics,
    ) -> Vec<MigrationTask> {
        let mut tasks: Vec<MigrationTask> = surviving
            .iter()
            .filter(|p| p.category == PatternCategory::Dependency)
            .map(|p| {
                let risk = if p.severity == Severity::High {
                    RiskLevel::Medium
                } else {
                    RiskLevel::Low
                };
                pattern_task(p, aggressiveness, risk, Vec::new())
            })
            .collect();

        if self.needs_build_tool_setup(source, health) {
            let entry_point = rules::entry_point_for(&source.framework, &source.language);
            diagnostics.add_info(
                "phases",
                format!("No modern build tool found; adding setup task for {}", entry_point),
            );
            tasks.push(build_tool_task(entry_point));
        }

        tasks
    }

    /// React-like source, no modern bundler, and build health below threshold (if known)
    fn needs_build_tool_setup(&self, source: &SourceStack, health: Option<&HealthScore>) -> bool {
        if !rules::is_react_like(&source.framework)
            || rules::has_modern_build_tool(source.dependencies.keys())
        {
            return false;
        }
        health.map_or(true, |h| h.build_health < self.config.build_health_threshold)
    }
}

/// Generate phases with the default engine config
pub fn generate_phases(
    source: &SourceStack,
    target: &TargetStack,
    patterns: &[DetectedPattern],
    customization: &PlanCustomization,
    health: Option<&HealthScore>,
) -> Vec<MigrationPhase> {
    let config = EngineConfig::default();
    PhaseGenerator::new(&config)
        .generate(source, target, patterns, customization, health)
        .phases
}

/// Id of the task generated for a detected pattern
pub fn pattern_task_id(pattern_id: &str) -> String {
    format!("{}{}", PATTERN_TASK_PREFIX, pattern_id)
}

fn pattern_task(
    pattern: &DetectedPattern,
    aggressiveness: Aggressiveness,
    risk_level: RiskLevel,
    dependencies: Vec<DependencyRef>,
) -> MigrationTask {
    let task_type = if pattern.automated {
        TaskType::Automated
    } else {
        TaskType::Manual
    };
    let time = estimate_task_time(
        TaskTimeInput {
            complexity: pattern.severity,
            // A pattern with no recorded files still costs one file's work
            file_count: pattern.affected_files.len().max(1) as u32,
            task_type,
        },
        aggressiveness,
    );
    let description = if pattern.description.is_empty() {
        format!("Resolve {} ({} occurrences)", pattern.name, pattern.occurrences)
    } else {
        pattern.description.clone()
    };

    MigrationTask {
        id: pattern_task_id(&pattern.id),
        name: pattern.name.clone(),
        description,
        task_type,
        estimated_minutes: time.manual_minutes,
        automated_minutes: time.automated_minutes,
        risk_level,
        affected_files: pattern.affected_files.clone(),
        dependencies,
        breaking_changes: rules::breaking_changes_for(pattern),
        pattern: Some(PatternRef {
            id: pattern.id.clone(),
            category: pattern.category,
        }),
    }
}

fn transformation_task(pattern: &DetectedPattern, aggressiveness: Aggressiveness) -> MigrationTask {
    let risk = match (pattern.severity, pattern.category) {
        (Severity::High, PatternCategory::Structural) => RiskLevel::High,
        (Severity::High, _) => RiskLevel::Medium,
        _ => RiskLevel::Low,
    };
    pattern_task(
        pattern,
        aggressiveness,
        risk,
        vec![DependencyRef::phase_gate(DEPENDENCY_PHASE_ID)],
    )
}

fn build_tool_task(entry_point: &str) -> MigrationTask {
    MigrationTask {
        id: BUILD_TOOL_TASK_ID.to_string(),
        name: "Set up modern build tool".to_string(),
        description: format!(
            "Replace the legacy bundler with Vite and move the entry point to {}",
            entry_point
        ),
        task_type: TaskType::Automated,
        estimated_minutes: BUILD_TOOL_ESTIMATED_MINUTES,
        automated_minutes: BUILD_TOOL_AUTOMATED_MINUTES,
        risk_level: RiskLevel::Low,
        affected_files: vec![
            "package.json".to_string(),
            "index.html".to_string(),
            entry_point.to_string(),
        ],
        dependencies: Vec::new(),
        breaking_changes: rules::BUILD_TOOL_BREAKING_CHANGES
            .iter()
            .map(|s| s.to_string())
            .collect(),
        pattern: None,
    }
}

/// Breaking-change predicate deciding whether a migration guide is written
fn needs_migration_guide(surviving: &[&DetectedPattern], aggressiveness: Aggressiveness) -> bool {
    surviving
        .iter()
        .any(|p| p.category == PatternCategory::Structural)
        || surviving.iter().any(|p| rules::is_breaking_pattern(p))
        || (aggressiveness == Aggressiveness::Aggressive
            && surviving.len() > AGGRESSIVE_GUIDE_PATTERN_COUNT)
}

fn documentation_task(
    id: &str,
    name: &str,
    description: String,
    task_type: TaskType,
    estimated_minutes: u32,
    automated_minutes: u32,
    file: &str,
) -> MigrationTask {
    MigrationTask {
        id: id.to_string(),
        name: name.to_string(),
        description,
        task_type,
        estimated_minutes,
        automated_minutes,
        risk_level: RiskLevel::Low,
        affected_files: vec![file.to_string()],
        dependencies: Vec::new(),
        breaking_changes: Vec::new(),
        pattern: None,
    }
}

fn documentation_tasks(
    source: &SourceStack,
    target: &TargetStack,
    surviving: &[&DetectedPattern],
    aggressiveness: Aggressiveness,
) -> Vec<MigrationTask> {
    let mut tasks = vec![
        documentation_task(
            README_TASK_ID,
            "Generate README",
            format!("Rewrite setup and usage instructions for {}", target.framework),
            TaskType::Automated,
            30,
            5,
            "README.md",
        ),
        documentation_task(
            CHANGELOG_TASK_ID,
            "Generate CHANGELOG",
            format!(
                "Record the migration from {} {} to {} {}",
                source.framework, source.version, target.framework, target.version
            ),
            TaskType::Automated,
            20,
            3,
            "CHANGELOG.md",
        ),
    ];

    if needs_migration_guide(surviving, aggressiveness) {
        tasks.push(documentation_task(
            MIGRATION_GUIDE_TASK_ID,
            "Write migration guide",
            "Document breaking changes and upgrade steps for consumers".to_string(),
            TaskType::Review,
            60,
            18,
            "MIGRATION.md",
        ));
    }

    tasks
}

fn verification_tasks(
    verified: &[&MigrationTask],
    aggressiveness: Aggressiveness,
) -> Vec<MigrationTask> {
    let mut files: Vec<&str> = verified
        .iter()
        .flat_map(|t| t.affected_files.iter().map(String::as_str))
        .collect();
    files.sort_unstable();
    files.dedup();

    let time = estimate_task_time(
        TaskTimeInput {
            complexity: Severity::Medium,
            file_count: files.len().max(1) as u32,
            task_type: TaskType::Review,
        },
        aggressiveness,
    );

    let test_suite = MigrationTask {
        id: TEST_SUITE_TASK_ID.to_string(),
        name: "Run test suite".to_string(),
        description: format!("Run and fix tests covering {} migrated files", files.len()),
        task_type: TaskType::Review,
        estimated_minutes: time.manual_minutes,
        automated_minutes: time.automated_minutes,
        risk_level: RiskLevel::Medium,
        affected_files: Vec::new(),
        dependencies: verified
            .iter()
            .map(|t| DependencyRef::task(t.id.clone()))
            .collect(),
        breaking_changes: Vec::new(),
        pattern: None,
    };

    let smoke_test = MigrationTask {
        id: SMOKE_TEST_TASK_ID.to_string(),
        name: "Smoke-test application".to_string(),
        description: "Start the application and click through the main flows".to_string(),
        task_type: TaskType::Manual,
        estimated_minutes: SMOKE_TEST_MINUTES,
        automated_minutes: SMOKE_TEST_MINUTES,
        risk_level: RiskLevel::Low,
        affected_files: Vec::new(),
        dependencies: vec![DependencyRef::task(TEST_SUITE_TASK_ID)],
        breaking_changes: Vec::new(),
        pattern: None,
    };

    vec![test_suite, smoke_test]
}
