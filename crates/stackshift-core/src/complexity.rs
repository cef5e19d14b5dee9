//! Migration complexity scoring and task time estimation
//!
//! The score is a weighted sum of seven factors on a 0-100 scale. Size,
//! file and dependency counts are bucketed first; pattern complexity,
//! framework distance, custom code ratio and test coverage are already
//! percentages. Custom code and test coverage carry negative weights.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{
    Aggressiveness, CodebaseStats, DetectedPattern, PatternCategory, Severity, SourceStack,
    TargetStack, TaskType,
};
use crate::rules;

/// `(upper bound exclusive, normalized score)`; values past the last bound score 90
const LINES_BUCKETS: &[(u64, f64)] = &[
    (1_000, 10.0),
    (5_000, 30.0),
    (20_000, 50.0),
    (50_000, 70.0),
];
const FILES_BUCKETS: &[(u64, f64)] = &[(10, 10.0), (50, 30.0), (200, 50.0), (500, 70.0)];
const DEPENDENCY_BUCKETS: &[(u64, f64)] = &[(10, 10.0), (25, 30.0), (50, 50.0), (100, 70.0)];
const TOP_BUCKET: f64 = 90.0;

const WEIGHT_CODEBASE_SIZE: f64 = 0.15;
const WEIGHT_FILE_COUNT: f64 = 0.10;
const WEIGHT_DEPENDENCY_COUNT: f64 = 0.15;
const WEIGHT_PATTERN_COMPLEXITY: f64 = 0.25;
const WEIGHT_FRAMEWORK_DISTANCE: f64 = 0.20;
const WEIGHT_CUSTOM_CODE_RATIO: f64 = -0.10;
const WEIGHT_TEST_COVERAGE: f64 = -0.15;

const SAME_FRAMEWORK_MAX_DISTANCE: f64 = 30.0;
const RELATED_FRAMEWORK_DISTANCE: f64 = 50.0;
const UNRELATED_FRAMEWORK_DISTANCE: f64 = 80.0;

/// Penalty added to a pattern's weight when tooling cannot fix it
const MANUAL_PATTERN_PENALTY: f64 = 2.0;

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)(?:\.(\d+))?").expect("version regex is valid")
});

/// Raw complexity inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityFactors {
    /// Total lines of code (bucketed when scored)
    pub codebase_size: u64,
    /// Total files (bucketed when scored)
    pub file_count: u32,
    /// Number of source dependencies (bucketed when scored)
    pub dependency_count: u32,
    /// 0-100
    pub pattern_complexity: f64,
    /// 0-100
    pub framework_distance: f64,
    /// Share of files untouched by dependency/structural patterns (0-100)
    pub custom_code_ratio: f64,
    /// 0-100
    pub test_coverage: f64,
}

/// Discrete complexity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplexityLevel {
    Trivial,
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl ComplexityLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Self::Trivial
        } else if score < 40.0 {
            Self::Simple
        } else if score < 60.0 {
            Self::Moderate
        } else if score < 80.0 {
            Self::Complex
        } else {
            Self::VeryComplex
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
            Self::VeryComplex => "very-complex",
        }
    }
}

/// Scored complexity with recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityEstimate {
    pub factors: ComplexityFactors,
    /// 0-100
    pub score: f64,
    pub level: ComplexityLevel,
    pub recommendations: Vec<String>,
}

/// Estimate how hard a migration will be
pub fn estimate_complexity(
    source: &SourceStack,
    target: &TargetStack,
    patterns: &[DetectedPattern],
    stats: &CodebaseStats,
) -> ComplexityEstimate {
    let factors = ComplexityFactors {
        codebase_size: stats.total_lines,
        file_count: stats.total_files,
        dependency_count: source.dependencies.len() as u32,
        pattern_complexity: pattern_complexity(patterns),
        framework_distance: framework_distance(source, target),
        custom_code_ratio: custom_code_ratio(patterns, stats.total_files),
        test_coverage: stats.test_coverage.clamp(0.0, 100.0),
    };

    let score = score_factors(&factors);
    let level = ComplexityLevel::from_score(score);
    let recommendations = generate_recommendations(&factors, level);

    tracing::debug!(score, level = level.as_str(), "Complexity estimated");

    ComplexityEstimate {
        factors,
        score,
        level,
        recommendations,
    }
}

/// Weighted, clamped score for a set of factors (one decimal place)
pub fn score_factors(factors: &ComplexityFactors) -> f64 {
    let raw = normalize(factors.codebase_size, LINES_BUCKETS) * WEIGHT_CODEBASE_SIZE
        + normalize(u64::from(factors.file_count), FILES_BUCKETS) * WEIGHT_FILE_COUNT
        + normalize(u64::from(factors.dependency_count), DEPENDENCY_BUCKETS)
            * WEIGHT_DEPENDENCY_COUNT
        + factors.pattern_complexity * WEIGHT_PATTERN_COMPLEXITY
        + factors.framework_distance * WEIGHT_FRAMEWORK_DISTANCE
        + factors.custom_code_ratio * WEIGHT_CUSTOM_CODE_RATIO
        + factors.test_coverage * WEIGHT_TEST_COVERAGE;

    (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

fn normalize(value: u64, buckets: &[(u64, f64)]) -> f64 {
    buckets
        .iter()
        .find(|(bound, _)| value < *bound)
        .map(|(_, score)| *score)
        .unwrap_or(TOP_BUCKET)
}

fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Low => 1.0,
        Severity::Medium => 3.0,
        Severity::High => 5.0,
    }
}

/// Average weighted occurrence count, scaled ×10 and clamped to 0-100
pub fn pattern_complexity(patterns: &[DetectedPattern]) -> f64 {
    if patterns.is_empty() {
        return 0.0;
    }

    let total: f64 = patterns
        .iter()
        .map(|p| {
            let penalty = if p.automated { 0.0 } else { MANUAL_PATTERN_PENALTY };
            (severity_weight(p.severity) + penalty) * f64::from(p.occurrences)
        })
        .sum();

    (total / patterns.len() as f64 * 10.0).clamp(0.0, 100.0)
}

/// Distance between two stacks (0-100)
///
/// Same framework: scaled version delta capped at 30. Related frameworks: 50.
/// Anything else: 80.
pub fn framework_distance(source: &SourceStack, target: &TargetStack) -> f64 {
    if source.framework.trim().eq_ignore_ascii_case(target.framework.trim()) {
        let delta = version_delta(&source.version, &target.version);
        return (delta * 10.0).min(SAME_FRAMEWORK_MAX_DISTANCE);
    }

    if rules::are_related_frameworks(&source.framework, &target.framework) {
        RELATED_FRAMEWORK_DISTANCE
    } else {
        UNRELATED_FRAMEWORK_DISTANCE
    }
}

/// `|major diff| × 2 + |minor diff| × 0.5`; unparseable parts count as 0
pub fn version_delta(from: &str, to: &str) -> f64 {
    let (from_major, from_minor) = parse_version(from);
    let (to_major, to_minor) = parse_version(to);
    (to_major - from_major).abs() * 2.0 + (to_minor - from_minor).abs() * 0.5
}

fn parse_version(version: &str) -> (f64, f64) {
    VERSION_RE
        .captures(version)
        .map(|caps| {
            let major = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0);
            let minor = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0);
            (major, minor)
        })
        .unwrap_or((0.0, 0.0))
}

/// Share of files not touched by dependency or structural patterns (0-100)
pub fn custom_code_ratio(patterns: &[DetectedPattern], total_files: u32) -> f64 {
    if total_files == 0 {
        return 0.0;
    }

    let mut touched: Vec<&str> = patterns
        .iter()
        .filter(|p| {
            matches!(
                p.category,
                PatternCategory::Dependency | PatternCategory::Structural
            )
        })
        .flat_map(|p| p.affected_files.iter().map(String::as_str))
        .collect();
    touched.sort_unstable();
    touched.dedup();

    let untouched = f64::from(total_files) - touched.len() as f64;
    (untouched / f64::from(total_files) * 100.0).clamp(0.0, 100.0)
}

fn generate_recommendations(factors: &ComplexityFactors, level: ComplexityLevel) -> Vec<String> {
    let mut recommendations = Vec::new();

    if level >= ComplexityLevel::Complex {
        recommendations.push(
            "Split the migration into incremental phases and ship each one separately".to_string(),
        );
        recommendations
            .push("Build up test coverage around critical paths before migrating".to_string());
    }

    if factors.test_coverage < 50.0 {
        recommendations.push(format!(
            "Test coverage is {:.0}%. Raise it above 50% before starting the migration",
            factors.test_coverage
        ));
    }

    if factors.framework_distance > 60.0 {
        recommendations.push(
            "Frameworks are far apart. Consider running old and new stacks in parallel"
                .to_string(),
        );
    }

    if factors.dependency_count > 50 {
        recommendations.push(format!(
            "{} dependencies detected. Audit and prune unused packages first",
            factors.dependency_count
        ));
    }

    if factors.codebase_size > 20_000 {
        recommendations.push(
            "Large codebase. Migrate incrementally behind feature flags".to_string(),
        );
    }

    if factors.pattern_complexity > 60.0 {
        recommendations.push(
            "Review detected patterns manually before applying automated transformations"
                .to_string(),
        );
    }

    recommendations
}

/// Inputs for a single task time estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTimeInput {
    pub complexity: Severity,
    pub file_count: u32,
    pub task_type: TaskType,
}

/// Manual and tooled duration for a task, whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTimeEstimate {
    pub manual_minutes: u32,
    pub automated_minutes: u32,
}

fn base_minutes_per_file(complexity: Severity) -> f64 {
    match complexity {
        Severity::Low => 5.0,
        Severity::Medium => 15.0,
        Severity::High => 30.0,
    }
}

fn automation_factor(task_type: TaskType) -> f64 {
    match task_type {
        TaskType::Automated => 0.1,
        TaskType::Review => 0.3,
        TaskType::Manual => 1.0,
    }
}

fn aggressiveness_factor(aggressiveness: Aggressiveness) -> f64 {
    match aggressiveness {
        Aggressiveness::Conservative => 1.2,
        Aggressiveness::Balanced => 1.0,
        Aggressiveness::Aggressive => 0.8,
    }
}

/// Ceiling to whole minutes, ignoring float noise (30 × 0.1 must stay 3)
fn ceil_minutes(minutes: f64) -> u32 {
    (minutes - 1e-9).ceil().max(0.0) as u32
}

/// Estimate manual and automated minutes for a task
pub fn estimate_task_time(
    input: TaskTimeInput,
    aggressiveness: Aggressiveness,
) -> TaskTimeEstimate {
    let manual = base_minutes_per_file(input.complexity) * f64::from(input.file_count);
    let automated =
        manual * automation_factor(input.task_type) * aggressiveness_factor(aggressiveness);

    TaskTimeEstimate {
        manual_minutes: ceil_minutes(manual),
        automated_minutes: ceil_minutes(automated),
    }
}
