//! Terminal reporting of validation warnings.

use bilan_validate::ValidationReport;
use std::io::Write;

/// Print each warning on its own line, `warning[CODE]: message`.
pub fn print_warnings<W: Write>(report: &ValidationReport, writer: &mut W) -> std::io::Result<()> {
    for warning in &report.warnings {
        writeln!(writer, "warning[{}]: {}", warning.code, warning.message)?;
    }
    Ok(())
}

/// Print the one-line summary.
pub fn print_summary<W: Write>(warnings: usize, writer: &mut W) -> std::io::Result<()> {
    if warnings == 0 {
        writeln!(writer, "\x1b[32m\u{2713}\x1b[0m No warnings")?;
    } else {
        let warning_text = if warnings == 1 { "warning" } else { "warnings" };
        writeln!(writer, "\x1b[33m\u{26A0}\x1b[0m {warnings} {warning_text}")?;
    }
    Ok(())
}
