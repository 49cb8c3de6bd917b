//! Renderers for aggregated statements and ledger exports.
//!
//! Rendering is pure: every function takes the computed structures and
//! returns a `String`. File handling and template loading belong to the
//! caller. Three targets are supported:
//!
//! - [`text`] - aligned plain text for the terminal,
//! - [`latex`] - table bodies to substitute into a LaTeX template,
//! - [`qif`] - Quicken Interchange Format for re-import elsewhere.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod latex;
pub mod qif;
pub mod text;

use rust_decimal::Decimal;

/// Format an amount at the reporting precision.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Format an optional total; an unfed line shows a dash, never `0.00`.
#[must_use]
pub fn format_total(total: Option<Decimal>) -> String {
    total.map_or_else(|| "—".to_owned(), format_amount)
}
