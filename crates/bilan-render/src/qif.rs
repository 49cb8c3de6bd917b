//! Quicken Interchange Format export.
//!
//! Emits a `!Type:Bank` section from canonical ledger records so a book can
//! be re-imported into gnucash or any other QIF consumer. Dates use the
//! French `dd/mm/yyyy` order and amounts the reporting precision. Zero
//! amounts are skipped; they carry no information for the importing side.

use crate::format_amount;
use bilan_importer::LedgerRecord;
use std::fmt::Write;

/// Render records as a QIF bank section.
#[must_use]
pub fn bank(records: &[LedgerRecord]) -> String {
    let mut out = String::from("!Type:Bank\n");
    for record in records {
        if record.amount.is_zero() {
            continue;
        }
        let _ = writeln!(out, "D{}", record.date.format("%d/%m/%Y"));
        let _ = writeln!(out, "T{}", format_amount(record.amount));
        if !record.piece.is_empty() {
            let _ = writeln!(out, "N{}", record.piece);
        }
        let _ = writeln!(out, "P{}", record.label);
        if !record.document.is_empty() {
            let _ = writeln!(out, "M{}", record.document);
        }
        out.push_str("^\n");
    }
    out
}
