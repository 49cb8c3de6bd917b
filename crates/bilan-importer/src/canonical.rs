//! The canonical ledger form.
//!
//! A plain comma-separated file with one header line; dates are ISO 8601 and
//! amounts are debit-positive decimals with a dot separator. Every other
//! dialect converts into this form, and the reporting commands accept it
//! directly, so a book only has to be converted once.

use crate::{ImportError, ImportResult, LedgerRecord};
use std::path::Path;

/// The canonical-form header line.
pub const HEADER: &str = "date,account,label,amount,piece,document,account_name";

/// Parse canonical-form content.
pub fn parse(content: &str) -> Result<ImportResult, ImportError> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: LedgerRecord = row?;
        records.push(record);
    }
    Ok(ImportResult::new(records))
}

/// Write records in canonical form.
pub fn write<W: std::io::Write>(records: &[LedgerRecord], out: W) -> Result<(), ImportError> {
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write records to a canonical-form file.
pub fn write_file(records: &[LedgerRecord], path: &Path) -> Result<(), ImportError> {
    let file = std::fs::File::create(path).map_err(|source| ImportError::Io {
        path: path.to_owned(),
        source,
    })?;
    write(records, file)
}
