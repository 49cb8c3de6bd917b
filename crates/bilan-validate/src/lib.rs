//! Consistency checks for aggregated statements.
//!
//! The checker recomputes what the statement claims, independently of any
//! classification rule, and reports every disagreement:
//!
//! - Side reconciliation: the sum of a side's group totals must equal the
//!   raw sum of the snapshot balances in that side's account classes.
//! - Coverage: every snapshot account in the statement's coverage ranges
//!   must be matched by some rule; an uncovered account silently falsifies
//!   the statement without necessarily showing up as an imbalance.
//!
//! The report is advisory. A suspect statement is still produced, with the
//! warnings surfaced to the operator on every invocation; deciding how to
//! display them is the presentation layer's concern.
//!
//! # Warning Codes
//!
//! | Code | Description |
//! |------|-------------|
//! | C1001 | Account covered by no rule |
//! | C2001 | Side total disagrees with raw recompute |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use bilan_aggregate::BudgetStatement;
use bilan_core::{BudgetChart, LedgerSnapshot, RuleSet, Side, SideLayout, Statement, StatementLayout};
use rust_decimal::Decimal;
use thiserror::Error;

/// Reporting precision: totals are compared after rounding to 2 decimals.
pub const REPORT_DECIMALS: u32 = 2;

/// Validation warning codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// C1001: An account in the coverage range matched no rule.
    UncoveredAccounts,
    /// C2001: A side total disagrees with the independent recompute.
    SideImbalance,
}

impl WarningCode {
    /// Get the warning code string (e.g. "C2001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UncoveredAccounts => "C1001",
            Self::SideImbalance => "C2001",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single validation warning.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct ValidationWarning {
    /// Warning code.
    pub code: WarningCode,
    /// Human-readable message carrying both figures where relevant.
    pub message: String,
}

impl ValidationWarning {
    /// Create a new warning.
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// The advisory report of one check run.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// All warnings found, in check order.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// True when no check found anything to report.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// True when the statement's totals are suspect (C2001 present).
    #[must_use]
    pub fn is_suspect(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.code == WarningCode::SideImbalance)
    }

    fn push(&mut self, code: WarningCode, message: String) {
        self.warnings.push(ValidationWarning::new(code, message));
    }
}

fn check_side(
    report: &mut ValidationReport,
    snapshot: &LedgerSnapshot,
    side: &Side,
    layout: &SideLayout,
) {
    if layout.class_prefixes.is_empty() {
        return;
    }
    let raw: Decimal = snapshot.sum_by_prefixes(&layout.class_prefixes);
    let raw = if layout.negate_raw { -raw } else { raw };
    if raw.round_dp(REPORT_DECIMALS) != side.total.round_dp(REPORT_DECIMALS) {
        report.push(
            WarningCode::SideImbalance,
            format!(
                "{}: balances total {:.2} but the statement shows {:.2}",
                side.title, raw, side.total
            ),
        );
    }
}

fn report_uncovered(report: &mut ValidationReport, uncovered: Vec<String>) {
    if !uncovered.is_empty() {
        report.push(
            WarningCode::UncoveredAccounts,
            format!("accounts missing from configuration: {}", uncovered.join(", ")),
        );
    }
}

/// Check an aggregated statement against its source snapshot.
///
/// Recomputes each side's total directly from the raw balances (using the
/// layout's class prefixes) and compares at the reporting precision, then
/// scans the coverage ranges for accounts no rule classifies.
#[must_use]
pub fn check(
    snapshot: &LedgerSnapshot,
    statement: &Statement,
    layout: &StatementLayout,
    rules: &RuleSet,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_side(&mut report, snapshot, &statement.left, &layout.left);
    check_side(&mut report, snapshot, &statement.right, &layout.right);

    let uncovered: Vec<String> = snapshot
        .iter()
        .filter(|(code, balance)| {
            code.matches_any(&layout.coverage_prefixes) && !rules.covers(code, **balance)
        })
        .map(|(code, _)| code.to_string())
        .collect();
    report_uncovered(&mut report, uncovered);

    report
}

/// Check a budget statement against its source snapshot.
///
/// Same two checks as [`check`], with coverage defined by chart membership
/// over the income-statement classes (6 and 7).
#[must_use]
pub fn check_budget(
    snapshot: &LedgerSnapshot,
    statement: &BudgetStatement,
    chart: &BudgetChart,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let raw_expenses = snapshot.sum_by_prefixes(&["6".to_owned()]);
    let raw_income = -snapshot.sum_by_prefixes(&["7".to_owned()]);
    let shown_expenses = statement.expenses.total_realised;
    let shown_income = statement.income.total_realised;
    if raw_expenses.round_dp(REPORT_DECIMALS) != shown_expenses.round_dp(REPORT_DECIMALS)
        || raw_income.round_dp(REPORT_DECIMALS) != shown_income.round_dp(REPORT_DECIMALS)
    {
        report.push(
            WarningCode::SideImbalance,
            format!(
                "expenses: balances {raw_expenses:.2} / shown {shown_expenses:.2}; \
                 income: balances {raw_income:.2} / shown {shown_income:.2}"
            ),
        );
    }

    let uncovered: Vec<String> = snapshot
        .iter()
        .filter(|(code, _)| code.is_income_statement() && !chart.covers(code))
        .map(|(code, _)| code.to_string())
        .collect();
    report_uncovered(&mut report, uncovered);

    report
}
