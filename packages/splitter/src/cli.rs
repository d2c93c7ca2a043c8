//! Command-line interface for the splitter.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;

use crate::config::{load_plans, plans_to_yaml, resolve_root, ROOT_ENV_VAR, VERIFY_COMMAND};
use crate::emit::{emit_plan, read_source, EmitOptions, Progress};
use crate::error::Result;
use crate::plans::select_plans;
use crate::types::{ConflictPolicy, EmitOutcome, EmitRecord, SplitDescriptor, SplitPlan};
use crate::validate::validate_plan;

/// Split oversized test files into topic-named files by line range.
#[derive(Parser)]
#[command(name = "split-test-files")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory plan paths are relative to (default: current directory)
    #[arg(long, global = true, env = ROOT_ENV_VAR)]
    pub root: Option<PathBuf>,

    /// YAML plan file to use instead of the built-in plans
    #[arg(long, global = true)]
    pub plan_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split the source files (default when no command is given).
    Run(RunArgs),

    /// Show the plans and their line ranges.
    List {
        /// Only show these plans
        #[arg(long)]
        only: Vec<String>,

        /// Print the plans in plan file format
        #[arg(long)]
        yaml: bool,
    },

    /// Report range problems without writing anything.
    Check {
        /// Only check these plans
        #[arg(long)]
        only: Vec<String>,
    },
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Only run these plans (e.g. --only store)
    #[arg(long)]
    pub only: Vec<String>,

    /// Replace every plan's conflict policy
    #[arg(long, value_enum)]
    pub on_conflict: Option<ConflictPolicy>,

    /// Show what would be written without touching any file
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = resolve_root(cli.root.as_deref())?;
    let plan_file = cli.plan_file.as_deref();

    match cli.command {
        None => run_command(&root, plan_file, &RunArgs::default()),
        Some(Commands::Run(args)) => run_command(&root, plan_file, &args),
        Some(Commands::List { only, yaml }) => list_command(plan_file, &only, yaml),
        Some(Commands::Check { only }) => check_command(&root, plan_file, &only),
    }
}

/// Prints progress lines as each output file is handled.
struct ConsoleProgress {
    dry_run: bool,
}

impl Progress for ConsoleProgress {
    fn starting(&mut self, split: &SplitDescriptor) {
        if !self.dry_run {
            println!("Creating {}...", split.filename);
        }
    }

    fn finished(&mut self, record: &EmitRecord) {
        match record.outcome {
            EmitOutcome::Created => {
                println!("{} Created {}", style("✓").green(), record.filename);
            }
            EmitOutcome::Overwritten => println!(
                "{} Created {} {}",
                style("✓").green(),
                record.filename,
                style("(replaced existing)").dim()
            ),
            EmitOutcome::Skipped => {
                println!("Skipping {} (already exists)", record.filename);
            }
            EmitOutcome::Planned => println!(
                "Would create {} ({} lines)",
                record.path.display(),
                record.body_lines
            ),
        }
    }
}

/// Execute the run command.
fn run_command(root: &Path, plan_file: Option<&Path>, args: &RunArgs) -> Result<()> {
    let plans = select_plans(load_plans(plan_file)?, &args.only)?;
    let options = EmitOptions {
        dry_run: args.dry_run,
        on_conflict: args.on_conflict,
    };
    let mut progress = ConsoleProgress {
        dry_run: args.dry_run,
    };

    println!("{}", style("Splitting test files...").bold());

    for plan in &plans {
        println!();
        println!("{}", style(format!("=== {} ===", plan.heading)).bold());
        emit_plan(plan, root, options, &mut progress)?;
    }

    println!();
    if args.dry_run {
        println!("{} Dry run, nothing written.", style("Done!").green().bold());
    } else if plan_file.is_none() {
        println!(
            "{} Run '{}' to verify.",
            style("✅ Done!").green().bold(),
            VERIFY_COMMAND
        );
    } else {
        println!("{}", style("✅ Done!").green().bold());
    }

    Ok(())
}

/// Execute the list command.
fn list_command(plan_file: Option<&Path>, only: &[String], yaml: bool) -> Result<()> {
    let plans = select_plans(load_plans(plan_file)?, only)?;

    if yaml {
        print!("{}", plans_to_yaml(&plans)?);
        return Ok(());
    }

    for (i, plan) in plans.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_plan(plan);
    }
    Ok(())
}

fn print_plan(plan: &SplitPlan) {
    println!(
        "{} {}",
        style(&plan.name).cyan().bold(),
        style(format!("({})", plan.heading)).dim()
    );
    println!("  Source: {}", plan.source.display());
    println!("  Output: {}", plan.out_dir.display());
    println!("  On conflict: {}", plan.on_conflict);
    for split in &plan.splits {
        println!(
            "  {:>5}-{:<5} {} {}",
            split.start,
            split.end,
            split.filename,
            style(format!("\"{}\"", split.title)).green()
        );
    }
}

/// Execute the check command.
fn check_command(root: &Path, plan_file: Option<&Path>, only: &[String]) -> Result<()> {
    let plans = select_plans(load_plans(plan_file)?, only)?;
    let mut total = 0;

    for plan in &plans {
        // Check what can be checked even when the source is missing
        let source_lines = match read_source(plan, root) {
            Ok(text) => Some(text.split_inclusive('\n').count()),
            Err(e) => {
                println!("{} {}", style("warning:").yellow().bold(), e);
                None
            }
        };

        let diagnostics = validate_plan(plan, source_lines);
        total += diagnostics.len();

        let lines = source_lines.map_or_else(|| "unknown".to_string(), |n| n.to_string());
        println!(
            "{} {} source lines, {} issue(s)",
            style(&plan.name).cyan().bold(),
            lines,
            diagnostics.len()
        );
        for diagnostic in diagnostics {
            println!("  {} {}", style("-").yellow(), diagnostic);
        }
    }

    if total == 0 {
        println!("{}", style("No range issues found.").green());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default() {
        let cli = Cli::parse_from(["split-test-files"]);
        assert!(cli.command.is_none());
        assert!(cli.plan_file.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from([
            "split-test-files",
            "run",
            "--only",
            "store",
            "--on-conflict",
            "overwrite",
            "--dry-run",
            "--root",
            "/repo",
        ]);

        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.only, vec!["store".to_string()]);
        assert_eq!(args.on_conflict, Some(ConflictPolicy::Overwrite));
        assert!(args.dry_run);
        assert_eq!(cli.root, Some(PathBuf::from("/repo")));
    }

    #[test]
    fn test_cli_parse_list_yaml() {
        let cli = Cli::parse_from(["split-test-files", "list", "--yaml", "--only", "cache"]);

        let Some(Commands::List { only, yaml }) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(only, vec!["cache".to_string()]);
        assert!(yaml);
    }

    #[test]
    fn test_cli_rejects_unknown_policy() {
        let result = Cli::try_parse_from(["split-test-files", "run", "--on-conflict", "merge"]);
        assert!(result.is_err());
    }
}
