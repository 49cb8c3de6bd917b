//! Aligned plain-text rendering.

use crate::{format_amount, format_total};
use bilan_aggregate::{BudgetComparison, BudgetEntry, BudgetStatement};
use bilan_core::{GroupColumns, ResultLine, Side, SideRef, Statement};
use std::fmt::Write;

const LABEL_WIDTH: usize = 44;
const AMOUNT_WIDTH: usize = 12;

fn push_line(out: &mut String, label: &str, amounts: &[String]) {
    let _ = write!(out, "{label:<width$}", width = LABEL_WIDTH);
    for amount in amounts {
        let _ = write!(out, " {amount:>width$}", width = AMOUNT_WIDTH);
    }
    out.push('\n');
}

fn render_side(out: &mut String, side: &Side, result: Option<&ResultLine>) {
    let _ = writeln!(out, "== {} ==", side.title);
    for group in &side.groups {
        match &group.columns {
            GroupColumns::Single(col) => {
                push_line(out, &group.label, &[format_total(col.total)]);
                for entry in &col.entries {
                    push_line(
                        out,
                        &format!("  {}", entry.account),
                        &[format_amount(entry.amount)],
                    );
                }
            }
            GroupColumns::Paired { gross, contra } => {
                push_line(
                    out,
                    &group.label,
                    &[
                        format_total(gross.total),
                        format_total(contra.total),
                        format_total(group.total()),
                    ],
                );
                for entry in gross.entries.iter().chain(contra.entries.iter()) {
                    push_line(
                        out,
                        &format!("  {}", entry.account),
                        &[format_amount(entry.amount)],
                    );
                }
            }
        }
    }
    let mut total = side.total;
    if let Some(line) = result {
        push_line(out, &line.label, &[format_amount(line.amount)]);
        total += line.amount;
    }
    push_line(out, "Total", &[format_amount(total)]);
}

/// Render a statement as aligned text, two stacked sides.
#[must_use]
pub fn statement(stmt: &Statement) -> String {
    let mut out = String::new();
    let (left_result, right_result) = match stmt.result.side {
        SideRef::Left => (Some(&stmt.result), None),
        SideRef::Right => (None, Some(&stmt.result)),
    };
    render_side(&mut out, &stmt.left, left_result);
    out.push('\n');
    render_side(&mut out, &stmt.right, right_result);
    let (closed_left, closed_right) = stmt.closed_totals();
    let _ = writeln!(
        out,
        "\n{}: {} ({} / {})",
        stmt.result.label,
        format_amount(stmt.result.amount),
        format_amount(closed_left),
        format_amount(closed_right),
    );
    out
}

fn render_budget_column(
    out: &mut String,
    title: &str,
    column: &bilan_aggregate::BudgetColumn,
    result_amount: Option<&str>,
) {
    let _ = writeln!(out, "== {title} ==");
    push_line(out, "", &["Budget".to_owned(), "Réalisé".to_owned()]);
    for entry in &column.entries {
        match entry {
            BudgetEntry::Heading(heading) => {
                let _ = writeln!(out, "-- {heading} --");
            }
            BudgetEntry::Row(row) => {
                push_line(
                    out,
                    &row.label,
                    &[format_amount(row.budget), format_amount(row.realised)],
                );
            }
        }
    }
    if let Some(amount) = result_amount {
        push_line(out, "Résultat", &[String::new(), amount.to_owned()]);
    }
    push_line(
        out,
        "Total",
        &[
            format_amount(column.total_budget),
            format_amount(column.total_realised),
        ],
    );
}

/// Render a budget statement as aligned text.
#[must_use]
pub fn budget(stmt: &BudgetStatement) -> String {
    let mut out = String::new();
    let result = format_amount(stmt.result.amount);
    let (left_result, right_result) = match stmt.result.side {
        SideRef::Left => (Some(result.as_str()), None),
        SideRef::Right => (None, Some(result.as_str())),
    };
    render_budget_column(&mut out, "Dépenses", &stmt.expenses, left_result);
    out.push('\n');
    render_budget_column(&mut out, "Recettes", &stmt.income, right_result);
    out
}

/// Render a two-year budget comparison as aligned text.
#[must_use]
pub fn comparison(cmp: &BudgetComparison) -> String {
    let mut out = String::new();
    for (title, rows) in [("Dépenses", &cmp.expenses), ("Recettes", &cmp.income)] {
        let _ = writeln!(out, "== {title} ==");
        push_line(&mut out, "", &["N".to_owned(), "N+1".to_owned()]);
        for row in rows {
            push_line(
                &mut out,
                &row.label,
                &[format_amount(row.budget_n), format_amount(row.budget_n1)],
            );
        }
        out.push('\n');
    }
    let (n, n1) = cmp.imbalances();
    let _ = writeln!(
        out,
        "Équilibre N: {}  N+1: {}",
        format_amount(n),
        format_amount(n1)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilan_aggregate::{aggregate, aggregate_budget, compare_budgets};
    use bilan_core::{chart, AccountCode, BudgetChart, BudgetLine, LedgerSnapshot};
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn snapshot(pairs: &[(&str, rust_decimal::Decimal)]) -> LedgerSnapshot {
        pairs
            .iter()
            .map(|(c, b)| (c.parse::<AccountCode>().unwrap(), *b))
            .collect()
    }

    #[test]
    fn test_statement_text_contains_totals_and_dashes() {
        let snap = snapshot(&[("607", dec!(100.00)), ("706", dec!(-250.00))]);
        let (layout, rules) = chart::french_income_statement();
        let stmt = aggregate(&snap, &rules, &layout);
        let rendered = statement(&stmt);

        assert!(rendered.contains("== Charges =="));
        assert!(rendered.contains("100.00"));
        assert!(rendered.contains("250.00"));
        // Unfed groups render a dash, not zero.
        assert!(rendered.contains('—'));
        assert!(rendered.contains("Résultat de l'exercice: 150.00"));
    }

    #[test]
    fn test_budget_text() {
        let chart = BudgetChart {
            expenses: vec![BudgetLine::Line {
                label: "Assurance".to_owned(),
                budget: dec!(100.00),
                accounts: BTreeSet::from(["616".parse().unwrap()]),
            }],
            income: vec![BudgetLine::Line {
                label: "Cotisations".to_owned(),
                budget: dec!(100.00),
                accounts: BTreeSet::from(["756".parse().unwrap()]),
            }],
        };
        let snap = snapshot(&[("616", dec!(90.00)), ("756", dec!(-130.00))]);
        let stmt = aggregate_budget(&chart, &snap);
        let rendered = budget(&stmt);
        assert!(rendered.contains("Assurance"));
        assert!(rendered.contains("90.00"));
        assert!(rendered.contains("130.00"));
    }

    #[test]
    fn test_comparison_text_shows_imbalance() {
        let chart = BudgetChart {
            expenses: vec![BudgetLine::Line {
                label: "Assurance".to_owned(),
                budget: dec!(120.00),
                accounts: BTreeSet::new(),
            }],
            income: vec![BudgetLine::Line {
                label: "Cotisations".to_owned(),
                budget: dec!(100.00),
                accounts: BTreeSet::new(),
            }],
        };
        let rendered = comparison(&compare_budgets(&chart, &chart));
        assert!(rendered.contains("Équilibre N: -20.00"));
    }
}
