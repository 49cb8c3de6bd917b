//! CLI tools for French PCG financial statements.
//!
//! This crate provides the treasurer-facing commands:
//!
//! - `bilan-report`: aggregate a ledger export into a bilan or compte de
//!   résultat, cross-check it, and render text or LaTeX
//! - `bilan-budget`: budget tracking against a chart, or a two-year chart
//!   comparison
//! - `bilan-canonical`: convert an EBP export to the canonical CSV form
//! - `bilan-qif`: export a ledger as QIF
//!
//! # Example Usage
//!
//! ```bash
//! bilan-report --book export.csv --kind resultat
//! bilan-budget --book export.csv --chart budget.json
//! bilan-canonical --book export-ebp.csv --out livre.csv
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod report;
