//! Export functionality for migration plans
//!
//! Renders a plan as pretty JSON or as a Markdown checklist, either to a
//! string or to a file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::models::{ExecutionTimeline, MigrationPlan};

/// Pretty-printed JSON for a plan
pub fn plan_to_json(plan: &MigrationPlan) -> Result<String> {
    serde_json::to_string_pretty(plan).context("Failed to serialize plan to JSON")
}

/// Markdown checklist for a plan
///
/// One section per phase, one checkbox per task. Critical tasks are marked
/// with `(critical)`. The timeline block is included when given.
pub fn write_plan_markdown<W: Write>(
    writer: &mut W,
    plan: &MigrationPlan,
    timeline: Option<&ExecutionTimeline>,
) -> io::Result<()> {
    let summary = &plan.summary;

    writeln!(
        writer,
        "# Migration plan: {} {} → {} {}",
        plan.source_stack.framework,
        plan.source_stack.version,
        plan.target_stack.framework,
        plan.target_stack.version
    )?;
    writeln!(writer)?;
    writeln!(writer, "- Plan: `{}`", plan.id)?;
    writeln!(writer, "- Created: {}", plan.created_at.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(
        writer,
        "- Tasks: {} ({} automated, {} manual, {} review)",
        summary.total_tasks, summary.automated_tasks, summary.manual_tasks, summary.review_tasks
    )?;
    writeln!(
        writer,
        "- Effort: {} min manual, {} min with tooling ({}% automated)",
        summary.total_estimated_minutes,
        summary.total_automated_minutes,
        summary.automation_percentage
    )?;
    writeln!(writer, "- Complexity: {:.1}/100", summary.overall_complexity)?;
    if !summary.required_skills.is_empty() {
        writeln!(writer, "- Skills: {}", summary.required_skills.join(", "))?;
    }

    if let Some(timeline) = timeline {
        writeln!(writer)?;
        writeln!(writer, "## Timeline")?;
        writeln!(writer)?;
        writeln!(writer, "- Sequential: {} min", timeline.sequential)?;
        writeln!(
            writer,
            "- Parallel: {} min across {} batches",
            timeline.parallel,
            timeline.batches.len()
        )?;
    }

    for phase in &plan.phases {
        writeln!(writer)?;
        writeln!(writer, "## {}. {}", phase.order, phase.name)?;
        writeln!(writer)?;
        if !phase.description.is_empty() {
            writeln!(writer, "{}", phase.description)?;
            writeln!(writer)?;
        }
        for task in &phase.tasks {
            let critical = plan
                .dependency_graph
                .iter()
                .any(|n| n.task_id == task.id && n.critical_path);
            writeln!(
                writer,
                "- [ ] **{}** ({}, {} risk, {} min){}",
                task.name,
                task.task_type.as_str(),
                task.risk_level.as_str(),
                task.automated_minutes,
                if critical { " (critical)" } else { "" }
            )?;
            for note in &task.breaking_changes {
                writeln!(writer, "  - ⚠ {}", note)?;
            }
        }
    }

    Ok(())
}

/// Markdown checklist for a plan, as a string
pub fn plan_to_markdown(
    plan: &MigrationPlan,
    timeline: Option<&ExecutionTimeline>,
) -> Result<String> {
    let mut buffer = Vec::new();
    write_plan_markdown(&mut buffer, plan, timeline).context("Failed to render plan Markdown")?;
    String::from_utf8(buffer).context("Plan Markdown is not valid UTF-8")
}

/// Write a plan as JSON to `path`, creating parent directories
pub fn export_plan_to_json(plan: &MigrationPlan, path: &Path) -> Result<()> {
    let mut writer = create_file(path)?;
    serde_json::to_writer_pretty(&mut writer, plan)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;
    writer.flush().context("Failed to flush JSON file")?;
    Ok(())
}

/// Write a plan as Markdown to `path`, creating parent directories
pub fn export_plan_to_markdown(
    plan: &MigrationPlan,
    timeline: Option<&ExecutionTimeline>,
    path: &Path,
) -> Result<()> {
    let mut writer = create_file(path)?;
    write_plan_markdown(&mut writer, plan, timeline)
        .with_context(|| format!("Failed to write Markdown file: {}", path.display()))?;
    writer.flush().context("Failed to flush Markdown file")?;
    Ok(())
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}
