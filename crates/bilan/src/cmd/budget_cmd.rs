//! Shared implementation for the bilan-budget command.
//!
//! Two modes: tracking (a ledger export against one chart) and comparison
//! (two charts side by side, no ledger involved).

use crate::cmd::report_cmd::OutputFormat;
use anyhow::{bail, Context, Result};
use bilan_render::{latex, text};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Track a budget against the books, or compare two budget charts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The budget chart (JSON)
    #[arg(long, value_name = "FILE")]
    pub chart: PathBuf,

    /// The ledger export to track against (EBP or canonical form)
    #[arg(long, value_name = "FILE", required_unless_present = "compare")]
    pub book: Option<PathBuf>,

    /// A second chart to compare against instead of tracking
    #[arg(long, value_name = "FILE", conflicts_with = "book")]
    pub compare: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// LaTeX template with {{ left }}, {{ right }} and {{ quand }} markers
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Write output here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Ignore ledger rows dated after this day (inclusive, YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub cutoff: Option<NaiveDate>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress warnings and summary (just use exit code)
    #[arg(short, long)]
    pub quiet: bool,
}

fn render_latex(args: &Args, left: &str, right: &str) -> Result<String> {
    match &args.template {
        Some(path) => {
            let template = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let quand = chrono::Local::now().format("%F à %T").to_string();
            Ok(latex::apply_template(
                &template,
                &[("left", left), ("right", right), ("quand", &quand)],
            ))
        }
        None => Ok(format!("{left}\n{right}")),
    }
}

fn run_compare(args: &Args, second: &PathBuf) -> Result<ExitCode> {
    let chart_n = bilan_config::load_budget(&args.chart)?;
    let chart_n1 = bilan_config::load_budget(second)?;
    let cmp = bilan_aggregate::compare_budgets(&chart_n, &chart_n1);

    let (imbalance_n, imbalance_n1) = cmp.imbalances();
    let unbalanced = !imbalance_n.is_zero() || !imbalance_n1.is_zero();
    if unbalanced && !args.quiet {
        eprintln!("warning: budget out of equilibrium (N: {imbalance_n}, N+1: {imbalance_n1})");
    }

    let output = match args.format {
        OutputFormat::Text => text::comparison(&cmp),
        OutputFormat::Latex => {
            let (left, right) = latex::comparison(&cmp);
            render_latex(args, &left, &right)?
        }
    };
    crate::cmd::emit(&output, args.outfile.as_deref())?;

    if unbalanced {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    if let Some(second) = &args.compare {
        return run_compare(args, second);
    }
    let Some(book) = &args.book else {
        bail!("either --book or --compare is required");
    };
    let mut stderr = std::io::stderr().lock();

    let chart = bilan_config::load_budget(&args.chart)?;
    let imported = bilan_importer::read_ledger(book)?;
    let snapshot = bilan_importer::build_snapshot(&imported.records, args.cutoff);

    let statement = bilan_aggregate::aggregate_budget(&chart, &snapshot);
    let report = bilan_validate::check_budget(&snapshot, &statement, &chart);

    if !args.quiet {
        crate::report::print_warnings(&report, &mut stderr)?;
        crate::report::print_summary(report.warnings.len(), &mut stderr)?;
    }

    let output = match args.format {
        OutputFormat::Text => text::budget(&statement),
        OutputFormat::Latex => {
            let (left, right) = latex::budget(&statement);
            render_latex(args, &left, &right)?
        }
    };
    crate::cmd::emit(&output, args.outfile.as_deref())?;

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Main entry point for the budget command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    if args.verbose {
        crate::cmd::init_tracing();
    }
    crate::cmd::exit_with(run(&args))
}
