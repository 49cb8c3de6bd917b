//! End-to-end pipeline tests: export file in, rendered statement out.

use bilan_core::chart;
use bilan_importer::{build_snapshot, canonical, ebp, read_ledger};
use bilan_render::{latex, qif, text};
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

fn v21_export() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "\u{feff}{}\n\
         BQ;Banque;15/01/2025;20250115;607;Achats;P1;;;Marchandises;100,00;0,00;100,00\n\
         BQ;Banque;20/01/2025;20250120;706;Prestations;P2;;;Stage;0,00;250,00;-250,00\n\
         BQ;Banque;01/07/2025;20250701;706;Prestations;P3;;;Stage été;0,00;999,00;-999,00\n",
        ebp::V21_HEADER
    )
    .unwrap();
    file
}

#[test]
fn test_ebp_to_income_statement() {
    let file = v21_export();
    let imported = read_ledger(file.path()).unwrap();
    assert_eq!(imported.records.len(), 3);

    let snapshot = build_snapshot(&imported.records, None);
    let (layout, rules) = chart::french_income_statement();
    let statement = bilan_aggregate::aggregate(&snapshot, &rules, &layout);
    let report = bilan_validate::check(&snapshot, &statement, &layout, &rules);

    assert!(report.is_clean());
    assert_eq!(statement.left.total, dec!(100.00));
    assert_eq!(statement.right.total, dec!(1249.00));
    assert_eq!(statement.result.amount, dec!(1149.00));
    let (l, r) = statement.closed_totals();
    assert_eq!(l, r);
}

#[test]
fn test_cutoff_limits_the_period() {
    let file = v21_export();
    let imported = read_ledger(file.path()).unwrap();
    let cutoff = "2025-06-30".parse().unwrap();
    let snapshot = build_snapshot(&imported.records, Some(cutoff));

    let (layout, rules) = chart::french_income_statement();
    let statement = bilan_aggregate::aggregate(&snapshot, &rules, &layout);
    assert_eq!(statement.right.total, dec!(250.00));
    assert_eq!(statement.result.amount, dec!(150.00));
}

#[test]
fn test_canonical_conversion_preserves_the_statement() {
    let file = v21_export();
    let imported = read_ledger(file.path()).unwrap();

    let out = NamedTempFile::new().unwrap();
    canonical::write_file(&imported.records, out.path()).unwrap();
    let reread = read_ledger(out.path()).unwrap();
    assert_eq!(imported.records, reread.records);
}

#[test]
fn test_text_and_latex_rendering() {
    let file = v21_export();
    let imported = read_ledger(file.path()).unwrap();
    let snapshot = build_snapshot(&imported.records, None);
    let (layout, rules) = chart::french_income_statement();
    let statement = bilan_aggregate::aggregate(&snapshot, &rules, &layout);

    let rendered = text::statement(&statement);
    assert!(rendered.contains("== Produits =="));
    assert!(rendered.contains("1249.00"));

    let (charges, produits) = latex::statement(&statement);
    assert!(charges.contains("607 & 100.00 \\\\"));
    assert!(produits.contains("706 & 1249.00 \\\\"));

    let template = "\\begin{tabular}{lr}\n{{ left }}\\end{tabular}\n{{ right }}";
    let whole = latex::apply_template(template, &[("left", &charges), ("right", &produits)]);
    assert!(!whole.contains("{{"));
}

#[test]
fn test_uncovered_account_makes_the_run_suspect() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "{}\n2025-01-15,607,Marchandises,100.00,P1,,\n2025-02-01,6092,RRR obtenus,-5.00,P2,,\n",
        canonical::HEADER
    )
    .unwrap();
    let imported = read_ledger(file.path()).unwrap();
    let snapshot = build_snapshot(&imported.records, None);
    let (layout, rules) = chart::french_income_statement();
    let statement = bilan_aggregate::aggregate(&snapshot, &rules, &layout);
    let report = bilan_validate::check(&snapshot, &statement, &layout, &rules);
    assert!(report.is_suspect());
}

#[test]
fn test_qif_export() {
    let file = v21_export();
    let imported = read_ledger(file.path()).unwrap();
    let out = qif::bank(&imported.records);
    assert!(out.starts_with("!Type:Bank\n"));
    assert!(out.contains("D15/01/2025\n"));
    assert!(out.contains("T-250.00\n"));
    assert_eq!(out.matches('^').count(), 3);
}

#[test]
fn test_budget_pipeline() {
    let chart_json = r#"{
        "expenses": [
            { "label": "Achats", "budget": "120.00", "accounts": ["607"] }
        ],
        "income": [
            { "label": "Stages", "budget": "1200.00", "accounts": ["706"] }
        ]
    }"#;
    let chart = bilan_config::parse_budget(chart_json).unwrap();

    let file = v21_export();
    let imported = read_ledger(file.path()).unwrap();
    let snapshot = build_snapshot(&imported.records, None);

    let statement = bilan_aggregate::aggregate_budget(&chart, &snapshot);
    let report = bilan_validate::check_budget(&snapshot, &statement, &chart);
    assert!(report.is_clean());
    assert_eq!(statement.income.total_realised, dec!(1249.00));

    let rendered = text::budget(&statement);
    assert!(rendered.contains("Stages"));
    assert!(rendered.contains("1249.00"));
}
