//! Command implementations for the CLI tools.
//!
//! Each module contains the full implementation for a command,
//! which can be invoked by thin wrapper binaries.

pub mod budget_cmd;
pub mod canonical_cmd;
pub mod qif_cmd;
pub mod report_cmd;

use std::process::ExitCode;
use tracing::Level;

/// Initialize tracing at debug level; used by every command's `--verbose`.
pub(crate) fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();
}

/// Write rendered output to a file, or to stdout when no path is given.
pub(crate) fn emit(output: &str, outfile: Option<&std::path::Path>) -> anyhow::Result<()> {
    use anyhow::Context;
    match outfile {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}

/// Map a command result to a process exit code: `2` is a fatal error, `1` a
/// suspect report, `0` a clean run.
pub(crate) fn exit_with(result: anyhow::Result<ExitCode>) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
