//! Human-readable output for plans, timelines, validation and complexity

use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use stackshift_core::models::{ExecutionTimeline, MigrationPlan, ValidationResult};
use stackshift_core::ComplexityEstimate;

/// Table styling shared by every renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub no_color: bool,
    /// Pipe-table output instead of box drawing
    pub markdown: bool,
}

fn new_table(headers: &[&str], options: RenderOptions) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if options.markdown {
        table.load_preset(ASCII_MARKDOWN);
    }

    if options.no_color || options.markdown {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn risk_cell(risk: &str, options: RenderOptions) -> Cell {
    let cell = Cell::new(risk);
    if options.no_color || options.markdown {
        return cell;
    }
    match risk {
        "high" => cell.fg(Color::Red),
        "medium" => cell.fg(Color::Yellow),
        _ => cell.fg(Color::Green),
    }
}

/// Task table plus summary lines
pub fn format_plan(plan: &MigrationPlan, options: RenderOptions) -> String {
    let summary = &plan.summary;
    let mut lines = vec![
        format!(
            "Plan {}: {} {} → {} {}",
            plan.id,
            plan.source_stack.framework,
            plan.source_stack.version,
            plan.target_stack.framework,
            plan.target_stack.version
        ),
        format!(
            "Tasks: {} ({} automated, {} manual, {} review)",
            summary.total_tasks, summary.automated_tasks, summary.manual_tasks, summary.review_tasks
        ),
        format!(
            "Effort: {} min manual / {} min with tooling ({}% automated)",
            summary.total_estimated_minutes,
            summary.total_automated_minutes,
            summary.automation_percentage
        ),
        format!(
            "Complexity: {:.1}/100, critical path {} min",
            summary.overall_complexity, summary.critical_path_minutes
        ),
    ];
    if !summary.required_skills.is_empty() {
        lines.push(format!("Skills: {}", summary.required_skills.join(", ")));
    }

    if plan.phases.is_empty() {
        lines.push("No tasks.".to_string());
        return lines.join("\n");
    }

    let mut table = new_table(
        &["Phase", "Task", "Type", "Risk", "Est", "Auto", "Critical"],
        options,
    );
    for phase in &plan.phases {
        for task in &phase.tasks {
            let critical = plan
                .dependency_graph
                .iter()
                .any(|n| n.task_id == task.id && n.critical_path);
            table.add_row(Row::from(vec![
                Cell::new(phase.order),
                Cell::new(&task.id),
                Cell::new(task.task_type.as_str()),
                risk_cell(task.risk_level.as_str(), options),
                Cell::new(format!("{}m", task.estimated_minutes)),
                Cell::new(format!("{}m", task.automated_minutes)),
                Cell::new(if critical { "yes" } else { "" }),
            ]));
        }
    }

    lines.push(String::new());
    lines.push(table.to_string());

    let warnings: Vec<_> = plan.diagnostics.warnings().collect();
    if !warnings.is_empty() {
        lines.push(String::new());
        for warning in warnings {
            lines.push(format!("warning [{}]: {}", warning.source, warning.message));
        }
    }

    lines.join("\n")
}

/// One row per execution batch
pub fn format_timeline(timeline: &ExecutionTimeline, options: RenderOptions) -> String {
    let mut lines = vec![
        format!("Sequential: {} min", timeline.sequential),
        format!(
            "Parallel:   {} min ({} batches)",
            timeline.parallel,
            timeline.batches.len()
        ),
    ];

    if !timeline.batches.is_empty() {
        let mut table = new_table(&["Batch", "Tasks"], options);
        for (i, batch) in timeline.batches.iter().enumerate() {
            table.add_row(vec![(i + 1).to_string(), batch.join(", ")]);
        }
        lines.push(String::new());
        lines.push(table.to_string());
    }

    lines.join("\n")
}

pub fn format_validation(result: &ValidationResult, repaired: bool) -> String {
    let mut lines = Vec::new();
    if repaired {
        lines.push("Circular dependencies were found and repaired.".to_string());
    }
    if result.valid {
        lines.push("Plan is valid.".to_string());
    } else {
        lines.push(format!("Plan is invalid ({} errors):", result.errors.len()));
        lines.extend(result.errors.iter().map(|e| format!("  - {}", e)));
    }
    lines.join("\n")
}

/// Factor table followed by recommendations
pub fn format_complexity(estimate: &ComplexityEstimate, options: RenderOptions) -> String {
    let f = &estimate.factors;
    let mut table = new_table(&["Factor", "Value"], options);
    for (name, value) in [
        ("Codebase size", format!("{} lines", f.codebase_size)),
        ("File count", f.file_count.to_string()),
        ("Dependency count", f.dependency_count.to_string()),
        ("Pattern complexity", format!("{:.1}", f.pattern_complexity)),
        ("Framework distance", format!("{:.1}", f.framework_distance)),
        ("Test coverage", format!("{:.1}%", f.test_coverage)),
        ("Custom code ratio", format!("{:.1}%", f.custom_code_ratio)),
    ] {
        table.add_row(vec![name.to_string(), value]);
    }

    let mut lines = vec![
        format!(
            "Complexity: {:.1}/100 ({})",
            estimate.score,
            estimate.level.as_str()
        ),
        String::new(),
        table.to_string(),
    ];

    if !estimate.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Recommendations:".to_string());
        lines.extend(estimate.recommendations.iter().map(|r| format!("  - {}", r)));
    }

    lines.join("\n")
}
