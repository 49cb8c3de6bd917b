//! Budget tracking and budget comparison.
//!
//! Budget tracking aggregates the snapshot's income-statement balances onto
//! the lines of a [`BudgetChart`] and closes the report with the period
//! result. Budget comparison aligns two charts by line label, producing
//! year-N / year-N+1 rows without touching any ledger.

use bilan_core::{BudgetChart, BudgetLine, LedgerSnapshot, ResultLine, SideRef};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// One computed budget line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRow {
    /// Line label.
    pub label: String,
    /// Budgeted amount.
    pub budget: Decimal,
    /// Realised amount from the ledger.
    pub realised: Decimal,
}

/// A rendered element of a budget column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetEntry {
    /// A section heading.
    Heading(String),
    /// A computed line.
    Row(BudgetRow),
}

/// One side (expenses or income) of a budget statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetColumn {
    /// Headings and computed lines, in chart order.
    pub entries: Vec<BudgetEntry>,
    /// Sum of the budgeted amounts, before the result line.
    pub total_budget: Decimal,
    /// Sum of the realised amounts, before the result line.
    pub total_realised: Decimal,
}

/// A computed budget-tracking statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetStatement {
    /// Expense column.
    pub expenses: BudgetColumn,
    /// Income column.
    pub income: BudgetColumn,
    /// The result line closing the statement; rendered on the short side.
    pub result: ResultLine,
}

impl BudgetStatement {
    /// Realised side totals with the result line included.
    #[must_use]
    pub fn closed_totals(&self) -> (Decimal, Decimal) {
        match self.result.side {
            SideRef::Left => (
                self.expenses.total_realised + self.result.amount,
                self.income.total_realised,
            ),
            SideRef::Right => (
                self.expenses.total_realised,
                self.income.total_realised + self.result.amount,
            ),
        }
    }
}

fn compute_column(lines: &[BudgetLine], snapshot: &LedgerSnapshot, negate: bool) -> BudgetColumn {
    let mut column = BudgetColumn::default();
    for line in lines {
        match line {
            BudgetLine::Heading { title } => {
                column.entries.push(BudgetEntry::Heading(title.clone()));
            }
            BudgetLine::Line {
                label,
                budget,
                accounts,
            } => {
                let raw: Decimal = snapshot
                    .iter()
                    .filter(|(code, _)| accounts.contains(code))
                    .map(|(_, balance)| *balance)
                    .sum();
                let realised = if negate { -raw } else { raw };
                column.total_budget += *budget;
                column.total_realised += realised;
                column.entries.push(BudgetEntry::Row(BudgetRow {
                    label: label.clone(),
                    budget: *budget,
                    realised,
                }));
            }
        }
    }
    column
}

/// Aggregate a snapshot onto a budget chart.
///
/// Realised expense lines sum raw (debit-positive) balances; income lines
/// negate, so both columns read positive. The result line carries
/// `income - expenses` and lands on the short side.
#[must_use]
pub fn aggregate_budget(chart: &BudgetChart, snapshot: &LedgerSnapshot) -> BudgetStatement {
    let expenses = compute_column(&chart.expenses, snapshot, false);
    let income = compute_column(&chart.income, snapshot, true);

    let result = income.total_realised - expenses.total_realised;
    let result = if result > Decimal::ZERO {
        ResultLine {
            label: "Résultat de l'exercice".to_owned(),
            amount: result,
            side: SideRef::Left,
        }
    } else {
        ResultLine {
            label: "Résultat de l'exercice".to_owned(),
            amount: -result,
            side: SideRef::Right,
        }
    };

    BudgetStatement {
        expenses,
        income,
        result,
    }
}

/// One aligned row of a budget comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    /// Line label (or heading text).
    pub label: String,
    /// Budgeted amount in the first chart, zero when absent.
    pub budget_n: Decimal,
    /// Budgeted amount in the second chart, zero when absent.
    pub budget_n1: Decimal,
}

/// A two-chart comparison: aligned rows per side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetComparison {
    /// Expense-side rows.
    pub expenses: Vec<ComparisonRow>,
    /// Income-side rows.
    pub income: Vec<ComparisonRow>,
}

impl BudgetComparison {
    /// Per-year `income - expenses` imbalances, rounded to 2 decimals.
    /// Both are zero for balanced budgets.
    #[must_use]
    pub fn imbalances(&self) -> (Decimal, Decimal) {
        let sum = |rows: &[ComparisonRow]| -> (Decimal, Decimal) {
            rows.iter()
                .fold((Decimal::ZERO, Decimal::ZERO), |(n, n1), row| {
                    (n + row.budget_n, n1 + row.budget_n1)
                })
        };
        let (exp_n, exp_n1) = sum(&self.expenses);
        let (inc_n, inc_n1) = sum(&self.income);
        ((inc_n - exp_n).round_dp(2), (inc_n1 - exp_n1).round_dp(2))
    }
}

fn line_budgets(lines: &[BudgetLine]) -> HashMap<&str, Decimal> {
    lines
        .iter()
        .filter_map(|line| match line {
            BudgetLine::Line { label, budget, .. } => Some((label.as_str(), *budget)),
            BudgetLine::Heading { .. } => None,
        })
        .collect()
}

fn align_columns(first: &[BudgetLine], second: &[BudgetLine]) -> Vec<ComparisonRow> {
    let labels_1: Vec<&str> = first.iter().map(BudgetLine::label).collect();
    let labels_2: Vec<&str> = second.iter().map(BudgetLine::label).collect();
    let budgets_1 = line_budgets(first);
    let budgets_2 = line_budgets(second);

    // Labels only in the second chart are queued behind the last shared
    // label preceding them, so insertion order survives the merge.
    let mut additions: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut last_shared = labels_1.first().copied().unwrap_or_default();
    for label in &labels_2 {
        if labels_1.contains(label) {
            last_shared = label;
        } else {
            additions.entry(last_shared).or_default().push(label);
        }
    }

    let mut out_labels: Vec<&str> = Vec::new();
    for label in &labels_1 {
        out_labels.push(label);
        if let Some(extra) = additions.get(label) {
            out_labels.extend(extra);
        }
    }

    out_labels
        .into_iter()
        .map(|label| ComparisonRow {
            label: label.to_owned(),
            budget_n: budgets_1.get(label).copied().unwrap_or_default(),
            budget_n1: budgets_2.get(label).copied().unwrap_or_default(),
        })
        .collect()
}

/// Compare two budget charts line by line.
///
/// Rows are matched by label; a renamed line counts as removed plus added.
/// Only budgeted figures are compared, the account sets are ignored.
#[must_use]
pub fn compare_budgets(first: &BudgetChart, second: &BudgetChart) -> BudgetComparison {
    BudgetComparison {
        expenses: align_columns(&first.expenses, &second.expenses),
        income: align_columns(&first.income, &second.income),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilan_core::AccountCode;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn code(s: &str) -> AccountCode {
        AccountCode::new(s).unwrap()
    }

    fn accounts(codes: &[&str]) -> BTreeSet<AccountCode> {
        codes.iter().map(|c| code(c)).collect()
    }

    fn chart() -> BudgetChart {
        BudgetChart {
            expenses: vec![
                BudgetLine::Heading {
                    title: "Fonctionnement".to_owned(),
                },
                BudgetLine::Line {
                    label: "Fournitures".to_owned(),
                    budget: dec!(300.00),
                    accounts: accounts(&["6061", "6064"]),
                },
                BudgetLine::Line {
                    label: "Assurance".to_owned(),
                    budget: dec!(150.00),
                    accounts: accounts(&["616"]),
                },
            ],
            income: vec![BudgetLine::Line {
                label: "Cotisations".to_owned(),
                budget: dec!(450.00),
                accounts: accounts(&["756"]),
            }],
        }
    }

    fn snapshot(pairs: &[(&str, Decimal)]) -> LedgerSnapshot {
        pairs.iter().map(|(c, b)| (code(c), *b)).collect()
    }

    #[test]
    fn test_budget_aggregation() {
        let snap = snapshot(&[
            ("6061", dec!(120.00)),
            ("6064", dec!(80.00)),
            ("616", dec!(140.00)),
            ("756", dec!(-500.00)),
        ]);
        let stmt = aggregate_budget(&chart(), &snap);

        assert_eq!(stmt.expenses.total_realised, dec!(340.00));
        assert_eq!(stmt.income.total_realised, dec!(500.00));
        // Surplus: the result closes the expense column.
        assert_eq!(stmt.result.side, SideRef::Left);
        assert_eq!(stmt.result.amount, dec!(160.00));
        let (l, r) = stmt.closed_totals();
        assert_eq!(l, r);

        let BudgetEntry::Row(fournitures) = &stmt.expenses.entries[1] else {
            panic!("expected a computed row");
        };
        assert_eq!(fournitures.realised, dec!(200.00));
    }

    #[test]
    fn test_budget_deficit_closes_income_column() {
        let snap = snapshot(&[("616", dec!(90.00)), ("756", dec!(-30.00))]);
        let stmt = aggregate_budget(&chart(), &snap);
        assert_eq!(stmt.result.side, SideRef::Right);
        assert_eq!(stmt.result.amount, dec!(60.00));
    }

    #[test]
    fn test_accounts_outside_chart_do_not_contribute() {
        let snap = snapshot(&[("616", dec!(90.00)), ("6063", dec!(999.00))]);
        let stmt = aggregate_budget(&chart(), &snap);
        assert_eq!(stmt.expenses.total_realised, dec!(90.00));
    }

    #[test]
    fn test_compare_identical_charts() {
        let cmp = compare_budgets(&chart(), &chart());
        for row in cmp.expenses.iter().chain(cmp.income.iter()) {
            assert_eq!(row.budget_n, row.budget_n1);
        }
        assert_eq!(cmp.expenses.len(), 3);
    }

    #[test]
    fn test_compare_added_line_follows_predecessor() {
        let mut second = chart();
        second.expenses.insert(
            2,
            BudgetLine::Line {
                label: "Affranchissement".to_owned(),
                budget: dec!(40.00),
                accounts: accounts(&["626"]),
            },
        );
        let cmp = compare_budgets(&chart(), &second);
        let labels: Vec<&str> = cmp.expenses.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Fonctionnement",
                "Fournitures",
                "Affranchissement",
                "Assurance"
            ]
        );
        let added = &cmp.expenses[2];
        assert_eq!(added.budget_n, Decimal::ZERO);
        assert_eq!(added.budget_n1, dec!(40.00));
    }

    #[test]
    fn test_comparison_imbalances() {
        let cmp = compare_budgets(&chart(), &chart());
        // 450 income vs 450 expenses: balanced both years.
        let (n, n1) = cmp.imbalances();
        assert_eq!(n, Decimal::ZERO);
        assert_eq!(n1, Decimal::ZERO);
    }
}
