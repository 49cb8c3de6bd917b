//! EBP export dialects.
//!
//! EBP Compta's "export all fields" produces a semicolon-separated file
//! whose column set depends on the program version. Two vintages are
//! supported, told apart by their exact header line: the v19 export quotes
//! every column name and carries separate debit and credit columns; the v21
//! export is unquoted and carries a signed amount column. Dates are French
//! (`dd/mm/yyyy`) and decimals use a comma separator in both.

use crate::{ImportError, ImportResult, LedgerRecord};
use bilan_core::AccountCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

/// The EBP v19 export header, quoted column names.
pub const V19_HEADER: &str = r#""Journal";"Compte";"Date";"Date de valeur";"Date de saisie";"Echéance";"Poste";"Pièce";"N° document";"Libellé";"Débit";"Crédit";"Devise";"Cours";"Débit devise";"Crédit devise";"Contrevaleur débit";"Contrevaleur crédit";"Lettre";"Rapp.";"Règl.";"N° Chèque";"Compte TVA sur Enc.";"Mois de TVA sur Enc.";"Type d'écriture transférée de la Gestion : (A)voir - (F)acture - (R)èglement";"N° facture ou règlement GC";"Date de Relevé";"Date de lettrage";"Provenance";"Ref. BVR / Motif";"N° adhérent";"Date dernière genération";"Partiel";"bSaisieKM";"Numéro d'écriture""#;

/// The EBP v21 export header, unquoted column names.
pub const V21_HEADER: &str = "Code journal;Description du journal;Date;Date au format L47;N° de compte;Intitulé du compte;Pièce;Date de pièce;Document;Libellé;Débit;Crédit;Montant seul (positif ou négatif);Montant (associé au sens);Sens;Statut;Date de lettrage;Lettrage;Partiel;Date de l'échéance;Moyen de paiement;Notes;N° de ligne pour les documents associés;Documents associés;Plan analytique;Poste analytique";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// A recognized EBP export vintage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Debit/credit columns, quoted header.
    V19,
    /// Signed amount column, unquoted header.
    V21,
}

impl Dialect {
    /// Recognize a dialect from the export's first line, byte for byte.
    #[must_use]
    pub fn sniff(first_line: &str) -> Option<Self> {
        match first_line {
            V19_HEADER => Some(Self::V19),
            V21_HEADER => Some(Self::V21),
            _ => None,
        }
    }
}

struct Row<'a> {
    record: &'a csv::StringRecord,
    row: usize,
}

impl Row<'_> {
    fn get(&self, index: usize, column: &'static str) -> Result<&str, ImportError> {
        self.record
            .get(index)
            .map(str::trim)
            .ok_or(ImportError::MissingColumn {
                row: self.row,
                column,
            })
    }

    fn date(&self, index: usize, column: &'static str) -> Result<NaiveDate, ImportError> {
        let cell = self.get(index, column)?;
        NaiveDate::parse_from_str(cell, DATE_FORMAT).map_err(|_| ImportError::BadDate {
            row: self.row,
            value: cell.to_owned(),
        })
    }

    fn amount(&self, index: usize, column: &'static str) -> Result<Decimal, ImportError> {
        let cell = self.get(index, column)?;
        parse_decimal(cell).ok_or_else(|| ImportError::BadAmount {
            row: self.row,
            value: cell.to_owned(),
        })
    }

    /// Like [`Self::amount`], but an empty cell reads as zero; the v19
    /// export leaves one of debit/credit blank on every line.
    fn amount_or_zero(&self, index: usize, column: &'static str) -> Result<Decimal, ImportError> {
        let cell = self.get(index, column)?;
        if cell.is_empty() {
            return Ok(Decimal::ZERO);
        }
        parse_decimal(cell).ok_or_else(|| ImportError::BadAmount {
            row: self.row,
            value: cell.to_owned(),
        })
    }

    fn account(&self, index: usize, column: &'static str) -> Result<AccountCode, ImportError> {
        let cell = self.get(index, column)?;
        AccountCode::new(cell).map_err(|source| ImportError::BadAccount {
            row: self.row,
            source,
        })
    }
}

/// Parse a French-locale decimal: comma separator, possible space grouping.
fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    Decimal::from_str(&cleaned).ok()
}

fn parse_v19(row: &Row<'_>) -> Result<LedgerRecord, ImportError> {
    let debit = row.amount_or_zero(10, "Débit")?;
    let credit = row.amount_or_zero(11, "Crédit")?;
    Ok(LedgerRecord {
        date: row.date(2, "Date")?,
        account: row.account(1, "Compte")?,
        label: row.get(9, "Libellé")?.to_owned(),
        // One of credit or debit is zero on any given line.
        amount: debit - credit,
        piece: row.get(7, "Pièce")?.to_owned(),
        document: String::new(),
        account_name: String::new(),
    })
}

fn parse_v21(row: &Row<'_>) -> Result<LedgerRecord, ImportError> {
    Ok(LedgerRecord {
        date: row.date(2, "Date")?,
        account: row.account(4, "N° de compte")?,
        label: row.get(9, "Libellé")?.to_owned(),
        amount: row.amount(12, "Montant")?,
        piece: row.get(6, "Pièce")?.to_owned(),
        document: row.get(8, "Document")?.to_owned(),
        account_name: row.get(5, "Intitulé du compte")?.to_owned(),
    })
}

/// Parse an EBP export of a known dialect.
pub fn parse(content: &str, dialect: Dialect) -> Result<ImportResult, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let record = row?;
        let row = Row {
            record: &record,
            row: i + 1,
        };
        if record.iter().all(|cell| cell.trim().is_empty()) {
            warn!(row = row.row, "skipping blank row");
            warnings.push(format!("row {}: blank, skipped", row.row));
            continue;
        }
        let parsed = match dialect {
            Dialect::V19 => parse_v19(&row)?,
            Dialect::V21 => parse_v21(&row)?,
        };
        records.push(parsed);
    }

    Ok(ImportResult { records, warnings })
}
