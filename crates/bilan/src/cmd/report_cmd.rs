//! Shared implementation for the bilan-report command.

use anyhow::{Context, Result};
use bilan_core::{RuleSet, StatementLayout};
use bilan_render::{latex, text};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Which statement to produce.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum StatementKind {
    /// The balance sheet.
    Bilan,
    /// The income statement.
    #[default]
    Resultat,
}

/// Output format for the statement.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain text (default).
    #[default]
    Text,
    /// LaTeX table bodies, optionally substituted into a template.
    Latex,
}

/// Aggregate a ledger export into a statement and cross-check it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The ledger export to read (EBP or canonical form)
    #[arg(long, value_name = "FILE")]
    pub book: PathBuf,

    /// Which statement to produce
    #[arg(long, value_enum, default_value = "resultat")]
    pub kind: StatementKind,

    /// Statement configuration file overriding the built-in tables
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

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

fn tables(args: &Args) -> Result<(StatementLayout, RuleSet)> {
    if let Some(path) = &args.config {
        return bilan_config::load_statement(path)
            .with_context(|| format!("failed to load {}", path.display()));
    }
    Ok(match args.kind {
        StatementKind::Bilan => bilan_core::chart::french_balance_sheet(),
        StatementKind::Resultat => bilan_core::chart::french_income_statement(),
    })
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut stderr = std::io::stderr().lock();

    let imported = bilan_importer::read_ledger(&args.book)?;
    if !args.quiet {
        for warning in &imported.warnings {
            writeln!(stderr, "warning: {warning}")?;
        }
    }
    let snapshot = bilan_importer::build_snapshot(&imported.records, args.cutoff);

    let (layout, rules) = tables(args)?;
    let statement = bilan_aggregate::aggregate(&snapshot, &rules, &layout);
    let report = bilan_validate::check(&snapshot, &statement, &layout, &rules);

    if !args.quiet {
        crate::report::print_warnings(&report, &mut stderr)?;
        crate::report::print_summary(report.warnings.len(), &mut stderr)?;
    }

    let output = match args.format {
        OutputFormat::Text => text::statement(&statement),
        OutputFormat::Latex => {
            let (left, right) = latex::statement(&statement);
            match &args.template {
                Some(path) => {
                    let template = std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    let quand = chrono::Local::now().format("%F à %T").to_string();
                    latex::apply_template(
                        &template,
                        &[("left", &left), ("right", &right), ("quand", &quand)],
                    )
                }
                None => format!("{left}\n{right}"),
            }
        }
    };
    crate::cmd::emit(&output, args.outfile.as_deref())?;

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Main entry point for the report command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    if args.verbose {
        crate::cmd::init_tracing();
    }
    crate::cmd::exit_with(run(&args))
}
