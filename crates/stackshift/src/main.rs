//! stackshift - Migration plan generator

mod input;
mod logging;
mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use stackshift_core::models::{ExecutionTimeline, MigrationPlan};
use stackshift_core::{
    estimate_complexity, export, generate_execution_timeline, optimize_plan, EngineConfig,
    MigrationPlanner,
};
use std::path::{Path, PathBuf};

use crate::logging::LoggingConfig;
use crate::render::RenderOptions;

#[derive(Parser)]
#[command(
    name = "stackshift",
    version,
    about = "Build dependency-aware migration plans",
    long_about = "Turns a description of a source stack, a target stack and detected legacy\n\
                  patterns into a phased migration plan with a dependency graph, critical\n\
                  path, complexity score and execution timeline.\n\
                  \n\
                  Examples:\n\
                    stackshift plan request.json                 # Task table\n\
                    stackshift plan request.yaml --format json   # Full plan as JSON\n\
                    stackshift plan request.json --optimize -o plan.md --format markdown\n\
                    stackshift validate plan.json                # Check a saved plan\n\
                    stackshift timeline request.json             # Parallel batches\n\
                    stackshift complexity request.json           # Factor breakdown\n\
                  \n\
                  Environment Variables:\n\
                    STACKSHIFT_CONFIG                # Engine config file (TOML)\n\
                    STACKSHIFT_FORMAT                # Output format: json|table|markdown\n\
                    STACKSHIFT_NO_COLOR              # Disable ANSI colors\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Engine config file (TOML)
    #[arg(long, global = true, env = "STACKSHIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        env = "STACKSHIFT_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Table
    )]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true, env = "STACKSHIFT_NO_COLOR")]
    no_color: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Debug-level logs
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
    Markdown,
}

#[derive(Subcommand)]
enum Command {
    /// Build a migration plan from a request file
    Plan {
        /// Request file (JSON or YAML)
        request: PathBuf,
        /// Reorder tasks within phases for execution safety
        #[arg(long)]
        optimize: bool,
        /// Write the plan to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Validate a saved plan, repairing circular dependencies
    Validate {
        /// Plan file (JSON or YAML)
        plan: PathBuf,
        /// Write the repaired plan (JSON) here
        #[arg(long)]
        repaired: Option<PathBuf>,
    },
    /// Show sequential vs parallel durations and execution batches
    Timeline {
        /// Request file (JSON or YAML)
        request: PathBuf,
    },
    /// Score migration complexity
    Complexity {
        /// Request file (JSON or YAML)
        request: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(LoggingConfig {
        use_json: cli.log_json,
        no_color: cli.no_color,
        verbose: cli.verbose,
    });

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load engine config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let planner = MigrationPlanner::new(config);

    let options = RenderOptions {
        no_color: cli.no_color,
        markdown: cli.format == OutputFormat::Markdown,
    };

    match cli.command {
        Command::Plan {
            request,
            optimize,
            output,
        } => run_plan(&planner, &request, optimize, output.as_deref(), cli.format, options),
        Command::Validate { plan, repaired } => {
            run_validate(&planner, &plan, repaired.as_deref(), cli.format)
        }
        Command::Timeline { request } => run_timeline(&planner, &request, cli.format, options),
        Command::Complexity { request } => run_complexity(&request, cli.format, options),
    }
}

fn build_plan(planner: &MigrationPlanner, request_path: &Path) -> Result<MigrationPlan> {
    let request = input::load_request(request_path)?;
    planner
        .create_plan(&request)
        .with_context(|| format!("Failed to build plan from {}", request_path.display()))
}

fn run_plan(
    planner: &MigrationPlanner,
    request_path: &Path,
    optimize: bool,
    output: Option<&Path>,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<()> {
    let mut plan = build_plan(planner, request_path)?;
    if optimize {
        plan = optimize_plan(&plan);
    }
    let timeline = generate_execution_timeline(&plan)?;

    match output {
        Some(path) => {
            match format {
                OutputFormat::Json => export::export_plan_to_json(&plan, path)?,
                OutputFormat::Markdown => {
                    export::export_plan_to_markdown(&plan, Some(&timeline), path)?
                }
                OutputFormat::Table => {
                    let text = plan_text(&plan, &timeline, options);
                    std::fs::write(path, text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
            }
            eprintln!("✓ Plan written to {}", path.display());
        }
        None => match format {
            OutputFormat::Json => println!("{}", export::plan_to_json(&plan)?),
            OutputFormat::Markdown => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                export::write_plan_markdown(&mut out, &plan, Some(&timeline))
                    .context("Failed to write plan Markdown to stdout")?;
            }
            OutputFormat::Table => println!("{}", plan_text(&plan, &timeline, options)),
        },
    }

    Ok(())
}

fn plan_text(plan: &MigrationPlan, timeline: &ExecutionTimeline, options: RenderOptions) -> String {
    format!(
        "{}\n\n{}\n",
        render::format_plan(plan, options),
        render::format_timeline(timeline, options)
    )
}

fn run_validate(
    planner: &MigrationPlanner,
    plan_path: &Path,
    repaired_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let plan = input::load_plan(plan_path)?;
    let validation = planner.validate_plan(&plan)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&validation.result)?);
    } else {
        println!(
            "{}",
            render::format_validation(&validation.result, validation.repaired)
        );
    }

    if let Some(path) = repaired_path {
        export::export_plan_to_json(&validation.plan, path)?;
        eprintln!("✓ Repaired plan written to {}", path.display());
    }

    if !validation.result.valid {
        bail!(
            "Plan {} failed validation with {} errors",
            plan.id,
            validation.result.errors.len()
        );
    }
    Ok(())
}

fn run_timeline(
    planner: &MigrationPlanner,
    request_path: &Path,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<()> {
    let plan = build_plan(planner, request_path)?;
    let timeline = generate_execution_timeline(&plan)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&timeline)?),
        _ => println!("{}", render::format_timeline(&timeline, options)),
    }
    Ok(())
}

fn run_complexity(request_path: &Path, format: OutputFormat, options: RenderOptions) -> Result<()> {
    let request = input::load_request(request_path)?;
    let estimate = estimate_complexity(
        &request.source,
        &request.target,
        &request.patterns,
        &request.codebase_stats,
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&estimate)?),
        _ => println!("{}", render::format_complexity(&estimate, options)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_command() {
        let cli = Cli::try_parse_from([
            "stackshift",
            "plan",
            "request.json",
            "--optimize",
            "--format",
            "markdown",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Markdown);
        match cli.command {
            Command::Plan {
                request, optimize, ..
            } => {
                assert_eq!(request, PathBuf::from("request.json"));
                assert!(optimize);
            }
            _ => panic!("Expected plan command"),
        }
    }

    #[test]
    fn test_plan_and_validate_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let request_path = dir.path().join("request.yaml");
        std::fs::write(
            &request_path,
            "\
source:
  framework: react
  version: 17.0.2
  language: javascript
target:
  framework: react
  version: 18.2.0
  language: javascript
patterns:
  - id: legacy-render
    name: ReactDOM.render calls
    category: component
    severity: medium
    occurrences: 1
    affectedFiles: [src/index.js]
    automated: true
codebaseStats:
  totalFiles: 30
  totalLines: 2500
  testCoverage: 70
",
        )
        .unwrap();

        let planner = MigrationPlanner::default();
        let plan_path = dir.path().join("plan.json");
        run_plan(
            &planner,
            &request_path,
            true,
            Some(&plan_path),
            OutputFormat::Json,
            RenderOptions::default(),
        )
        .unwrap();

        run_validate(&planner, &plan_path, None, OutputFormat::Json).unwrap();
    }
}
