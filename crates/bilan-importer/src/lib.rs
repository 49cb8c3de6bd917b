//! Ledger extraction.
//!
//! Accounting programs export the year's books in their own CSV dialects;
//! everything downstream works on one canonical form instead. This crate
//! recognizes the supported export dialects by their header line, parses
//! them into [`LedgerRecord`]s, and folds records into the
//! [`LedgerSnapshot`] the aggregation pass consumes.
//!
//! Dialect detection is deliberately rigid: the first line must match a
//! known export header byte for byte. A new program version changes its
//! header, and silently misreading columns would corrupt every figure, so
//! an unrecognized header is a fatal error rather than a guess.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod canonical;
pub mod ebp;

use bilan_core::{AccountCode, AccountCodeError, LedgerSnapshot};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// One journal line of the canonical ledger form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Entry date.
    pub date: NaiveDate,
    /// Leaf account code.
    pub account: AccountCode,
    /// Entry label.
    pub label: String,
    /// Debit-positive amount (`débit - crédit`).
    pub amount: Decimal,
    /// Accounting piece reference.
    #[serde(default)]
    pub piece: String,
    /// Source document reference.
    #[serde(default)]
    pub document: String,
    /// Account name, when the export carries one.
    #[serde(default)]
    pub account_name: String,
}

/// Errors raised while reading a ledger export.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The first line matches no known export header.
    #[error("{path}: unrecognized book format")]
    UnrecognizedFormat {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// A CSV structural error.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from a row.
    #[error("row {row}: missing column {column}")]
    MissingColumn {
        /// 1-based data row number.
        row: usize,
        /// Name of the missing column.
        column: &'static str,
    },

    /// A date cell could not be parsed.
    #[error("row {row}: bad date {value:?}")]
    BadDate {
        /// 1-based data row number.
        row: usize,
        /// Offending cell content.
        value: String,
    },

    /// An amount cell could not be parsed.
    #[error("row {row}: bad amount {value:?}")]
    BadAmount {
        /// 1-based data row number.
        row: usize,
        /// Offending cell content.
        value: String,
    },

    /// An account cell is not a valid account code.
    #[error("row {row}: {source}")]
    BadAccount {
        /// 1-based data row number.
        row: usize,
        /// Underlying code error.
        source: AccountCodeError,
    },
}

/// Records extracted from one export, plus non-fatal oddities.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// The extracted records, in file order.
    pub records: Vec<LedgerRecord>,
    /// Warnings encountered during import (skipped blank rows and the like).
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Create a result from extracted records.
    #[must_use]
    pub const fn new(records: Vec<LedgerRecord>) -> Self {
        Self {
            records,
            warnings: Vec::new(),
        }
    }

}

fn read_first_line(path: &Path) -> Result<String, ImportError> {
    let file = std::fs::File::open(path).map_err(|source| ImportError::Io {
        path: path.to_owned(),
        source,
    })?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|source| ImportError::Io {
            path: path.to_owned(),
            source,
        })?;
    // Exports from Windows tools open with a UTF-8 BOM.
    Ok(line
        .trim_start_matches('\u{feff}')
        .trim_end_matches(['\r', '\n'])
        .to_owned())
}

/// Read a ledger export, whatever supported dialect it is in.
///
/// The dialect is determined from the first line: the EBP v19 or v21 export
/// header routes to the matching parser, the canonical-form header to the
/// canonical reader, and anything else is fatal.
pub fn read_ledger(path: &Path) -> Result<ImportResult, ImportError> {
    let first_line = read_first_line(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_owned(),
        source,
    })?;
    let content = content.trim_start_matches('\u{feff}');

    if let Some(dialect) = ebp::Dialect::sniff(&first_line) {
        debug!(path = %path.display(), ?dialect, "EBP export detected");
        return ebp::parse(content, dialect);
    }
    if first_line == canonical::HEADER {
        debug!(path = %path.display(), "canonical form detected");
        return canonical::parse(content);
    }
    Err(ImportError::UnrecognizedFormat {
        path: path.to_owned(),
    })
}

/// Fold records into a snapshot of closing balances.
///
/// Records dated after the inclusive `cutoff` are ignored, so a mid-year
/// report can be drawn from a full-year export.
#[must_use]
pub fn build_snapshot(records: &[LedgerRecord], cutoff: Option<NaiveDate>) -> LedgerSnapshot {
    let mut snapshot = LedgerSnapshot::new();
    for record in records {
        if cutoff.is_some_and(|limit| record.date > limit) {
            continue;
        }
        snapshot.add(record.account.clone(), record.amount);
    }
    debug!(
        records = records.len(),
        accounts = snapshot.len(),
        "snapshot built"
    );
    snapshot
}
