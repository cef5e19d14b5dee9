//! Plan orchestration
//!
//! Composes phase generation, dependency graph construction and complexity
//! scoring into a complete `MigrationPlan`, and provides the follow-up
//! operations on a plan: execution-safe reordering, validation with
//! automatic cycle repair, and timeline estimation.
//!
//! Every operation is a pure function of its inputs. Validation never
//! mutates the plan it is given; it returns a repaired copy.

use chrono::Utc;
use std::collections::{HashMap, HashSet};

use crate::complexity::estimate_complexity;
use crate::config::EngineConfig;
use crate::error::PlanError;
use crate::graph::{detect_circular_dependencies, fix_circular_dependencies, DependencyGraph};
use crate::models::{
    automation_percentage, DependencyNode, DetectedPattern, ExecutionTimeline, MigrationPlan,
    MigrationTask, PlanCustomization, PlanRequest, PlanSummary, SourceStack, TargetStack,
    TaskType, ValidationResult,
};
use crate::phases::PhaseGenerator;
use crate::rules;

/// Validation outcome together with the (possibly repaired) plan
#[derive(Debug, Clone)]
pub struct PlanValidation {
    /// Plan with cycle edges removed; identical to the input when nothing was repaired
    pub plan: MigrationPlan,
    pub result: ValidationResult,
    /// True when the repair pass changed at least one task
    pub repaired: bool,
}

/// Builds and post-processes migration plans
#[derive(Debug, Clone, Default)]
pub struct MigrationPlanner {
    config: EngineConfig,
}

impl MigrationPlanner {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a complete plan from a request
    pub fn create_plan(&self, request: &PlanRequest) -> Result<MigrationPlan, PlanError> {
        let customization = PlanCustomization::merged_with_defaults(
            request.customization.as_ref(),
            &self.config.default_customization(),
        );

        let generation = PhaseGenerator::new(&self.config).generate(
            &request.source,
            &request.target,
            &request.patterns,
            &customization,
            request.health_score.as_ref(),
        );
        let phases = generation.phases;
        let mut diagnostics = generation.diagnostics;

        let tasks: Vec<MigrationTask> =
            phases.iter().flat_map(|p| p.tasks.iter().cloned()).collect();
        let graph = DependencyGraph::build(&tasks, self.config.critical_path_ratio)?;

        // Diagnostics only: cycles do not block creation, validation repairs them
        for cycle in graph.detect_circular_dependencies() {
            tracing::warn!(cycle = %cycle.join(" -> "), "Circular dependency in generated plan");
            diagnostics.add_warning(
                "graph",
                format!("Circular dependency: {}", cycle.join(" -> ")),
            );
        }

        let complexity = estimate_complexity(
            &request.source,
            &request.target,
            &request.patterns,
            &request.codebase_stats,
        );

        let included: Vec<&DetectedPattern> = request
            .patterns
            .iter()
            .filter(|p| customization.should_include_pattern(&p.id))
            .collect();

        let summary = PlanSummary {
            critical_path_minutes: graph.max_path_length(),
            required_skills: required_skills(&request.source, &request.target, &included),
            ..summarize_tasks(&tasks, complexity.score)
        };

        let plan = MigrationPlan {
            id: plan_id(&request.source, &request.target),
            source_stack: request.source.clone(),
            target_stack: request.target.clone(),
            phases,
            summary,
            dependency_graph: graph.into_nodes(),
            customization,
            created_at: Utc::now(),
            diagnostics,
        };

        tracing::info!(
            plan = %plan.id,
            tasks = plan.summary.total_tasks,
            complexity = plan.summary.overall_complexity,
            "Migration plan created"
        );

        Ok(plan)
    }

    /// Validate a plan, repairing circular dependencies where possible
    ///
    /// Cycles are broken automatically; only cycles that survive repair are
    /// reported. Dangling task references and empty phases are reported too.
    /// Returns an error only when the plan's dependency nodes do not match its
    /// tasks, which no plan produced by `create_plan` can hit.
    pub fn validate_plan(&self, plan: &MigrationPlan) -> Result<PlanValidation, PlanError> {
        for node in &plan.dependency_graph {
            if plan.find_task(&node.task_id).is_none() {
                return Err(PlanError::UnknownTask {
                    task_id: node.task_id.clone(),
                });
            }
        }

        let mut errors = Vec::new();
        let tasks = plan.all_tasks();
        let cycles = detect_circular_dependencies(&tasks);

        let mut validated = plan.clone();
        let repaired = !cycles.is_empty();

        if repaired {
            tracing::warn!(cycles = cycles.len(), "Repairing circular dependencies");
            let fixed = fix_circular_dependencies(&tasks, &cycles);

            for cycle in detect_circular_dependencies(&fixed) {
                errors.push(format!(
                    "Circular dependency could not be repaired: {}",
                    cycle.join(" -> ")
                ));
            }

            apply_tasks(&mut validated, fixed);
            let repaired_tasks = validated.all_tasks();
            let graph = DependencyGraph::build(&repaired_tasks, self.config.critical_path_ratio)?;

            validated.summary = PlanSummary {
                critical_path_minutes: graph.max_path_length(),
                required_skills: std::mem::take(&mut validated.summary.required_skills),
                ..summarize_tasks(&repaired_tasks, plan.summary.overall_complexity)
            };
            validated.dependency_graph = graph.into_nodes();
        }

        let known: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        for task in &tasks {
            for dep in task.task_dependencies() {
                if !known.contains(dep) {
                    errors.push(format!("Task {} depends on unknown task {}", task.id, dep));
                }
            }
        }

        for phase in &plan.phases {
            if phase.tasks.is_empty() {
                errors.push(format!("Phase {} has no tasks", phase.id));
            }
        }

        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), plan = %plan.id, "Plan validation failed");
        }

        Ok(PlanValidation {
            plan: validated,
            result: ValidationResult::from_errors(errors),
            repaired,
        })
    }
}

/// Reorder tasks within each phase for execution safety
///
/// Stable sort by: automated before everything else, then ascending risk,
/// then ascending affected-file count. Tasks never move between phases.
pub fn optimize_plan(plan: &MigrationPlan) -> MigrationPlan {
    let mut optimized = plan.clone();

    for phase in &mut optimized.phases {
        phase.tasks.sort_by_key(|task| {
            (
                task.task_type != TaskType::Automated,
                task.risk_level,
                task.affected_files.len(),
            )
        });
    }

    // Keep nodes in the same order as the tasks they describe
    let mut nodes: HashMap<String, DependencyNode> = optimized
        .dependency_graph
        .drain(..)
        .map(|node| (node.task_id.clone(), node))
        .collect();
    let order: Vec<String> = optimized.tasks().map(|t| t.id.clone()).collect();
    optimized.dependency_graph = order.iter().filter_map(|id| nodes.remove(id)).collect();
    optimized.dependency_graph.extend(nodes.into_values());

    optimized
}

/// Validate with the default engine config
pub fn validate_plan(plan: &MigrationPlan) -> Result<PlanValidation, PlanError> {
    MigrationPlanner::default().validate_plan(plan)
}

/// Sequential and parallel duration estimates for a plan
///
/// `sequential` runs every task one after another with tooling (sum of
/// `automated_minutes`); `parallel` runs each batch fully in parallel (sum of
/// per-batch maxima of `automated_minutes`).
pub fn generate_execution_timeline(plan: &MigrationPlan) -> Result<ExecutionTimeline, PlanError> {
    let tasks = plan.all_tasks();
    let graph = DependencyGraph::from_tasks(&tasks)?;

    Ok(ExecutionTimeline {
        sequential: tasks.iter().map(|t| t.automated_minutes).sum(),
        parallel: graph.estimate_total_time(true),
        batches: graph.execution_order(),
    })
}

/// Write repaired tasks back into their phases (matched by id)
fn apply_tasks(plan: &mut MigrationPlan, tasks: Vec<MigrationTask>) {
    let mut by_id: HashMap<String, MigrationTask> =
        tasks.into_iter().map(|t| (t.id.clone(), t)).collect();

    for phase in &mut plan.phases {
        for task in &mut phase.tasks {
            if let Some(fixed) = by_id.remove(&task.id) {
                *task = fixed;
            }
        }
        phase.recompute_totals();
    }
}

fn summarize_tasks(tasks: &[MigrationTask], overall_complexity: f64) -> PlanSummary {
    let count = |kind: TaskType| tasks.iter().filter(|t| t.task_type == kind).count();
    let total_estimated_minutes: u32 = tasks.iter().map(|t| t.estimated_minutes).sum();
    let total_automated_minutes: u32 = tasks.iter().map(|t| t.automated_minutes).sum();

    PlanSummary {
        total_tasks: tasks.len(),
        automated_tasks: count(TaskType::Automated),
        manual_tasks: count(TaskType::Manual),
        review_tasks: count(TaskType::Review),
        total_estimated_minutes,
        total_automated_minutes,
        automation_percentage: automation_percentage(
            total_estimated_minutes,
            total_automated_minutes,
        ),
        overall_complexity,
        critical_path_minutes: 0,
        required_skills: Vec::new(),
    }
}

/// Skills needed for a migration
///
/// Framework names, the target language when it differs from the source,
/// keyword-derived skills from pattern names, and the always-required set.
pub fn required_skills(
    source: &SourceStack,
    target: &TargetStack,
    patterns: &[&DetectedPattern],
) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    let mut push = |skill: &str| {
        let skill = skill.trim();
        if !skill.is_empty() && !skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            skills.push(skill.to_string());
        }
    };

    push(source.framework.as_str());
    push(target.framework.as_str());

    if !target.language.is_empty() && !source.language.eq_ignore_ascii_case(&target.language) {
        if rules::is_typescript(&target.language) {
            push("TypeScript");
        } else {
            push(target.language.as_str());
        }
    }

    for pattern in patterns {
        for skill in rules::skills_for_pattern_name(&pattern.name) {
            push(skill);
        }
    }

    for skill in rules::ALWAYS_REQUIRED_SKILLS.iter().copied() {
        push(skill);
    }

    skills
}

/// Deterministic id derived from the two stacks
fn plan_id(source: &SourceStack, target: &TargetStack) -> String {
    format!(
        "plan-{}-to-{}",
        slug(&format!("{} {}", source.framework, source.version)),
        slug(&format!("{} {}", target.framework, target.version))
    )
}

fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatternCategory, Severity};

    #[test]
    fn test_slug() {
        assert_eq!(slug("Next.js 14.1"), "next-js-14-1");
        assert_eq!(slug("  react ^16.8 "), "react-16-8");
        assert_eq!(slug(""), "");
    }

    #[test]
    fn test_plan_id() {
        let source = SourceStack {
            framework: "react".to_string(),
            version: "16.14.0".to_string(),
            ..Default::default()
        };
        let target = TargetStack {
            framework: "Next.js".to_string(),
            version: "14".to_string(),
            ..Default::default()
        };
        assert_eq!(plan_id(&source, &target), "plan-react-16-14-0-to-next-js-14");
    }

    #[test]
    fn test_required_skills() {
        let source = SourceStack {
            framework: "react".to_string(),
            language: "javascript".to_string(),
            ..Default::default()
        };
        let target = TargetStack {
            framework: "react".to_string(),
            language: "typescript".to_string(),
            ..Default::default()
        };
        let pattern = DetectedPattern {
            id: "p".to_string(),
            name: "Redux connect usage".to_string(),
            category: PatternCategory::Component,
            severity: Severity::Low,
            occurrences: 1,
            affected_files: vec![],
            description: String::new(),
            automated: true,
        };

        let skills = required_skills(&source, &target, &[&pattern]);
        assert_eq!(
            skills,
            vec![
                "react",
                "TypeScript",
                "State management",
                "Version control",
                "Code review"
            ]
        );
    }

    #[test]
    fn test_summarize_tasks() {
        let task = |id: &str, kind: TaskType, est: u32, auto: u32| MigrationTask {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            task_type: kind,
            estimated_minutes: est,
            automated_minutes: auto,
            risk_level: Severity::Low,
            affected_files: vec![],
            dependencies: vec![],
            breaking_changes: vec![],
            pattern: None,
        };
        let summary = summarize_tasks(
            &[
                task("a", TaskType::Automated, 60, 6),
                task("b", TaskType::Manual, 30, 30),
                task("c", TaskType::Review, 10, 4),
            ],
            42.0,
        );
        assert_eq!(summary.total_tasks, 3);
        assert_eq!(summary.automated_tasks, 1);
        assert_eq!(summary.manual_tasks, 1);
        assert_eq!(summary.review_tasks, 1);
        assert_eq!(summary.total_estimated_minutes, 100);
        assert_eq!(summary.total_automated_minutes, 40);
        assert_eq!(summary.automation_percentage, 60);
        assert_eq!(summary.overall_complexity, 42.0);
    }
}
