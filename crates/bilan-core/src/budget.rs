//! Budget charts: the declarative two-list account grouping.
//!
//! A [`BudgetChart`] maps income-statement accounts onto budget lines. Each
//! side (expenses, income) is an ordered list of lines that are either a
//! section heading or a labelled line with a budgeted figure and the set of
//! account codes it aggregates. Charts are plain data loaded from a config
//! file, never evaluated as code.

use crate::account::AccountCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One line of a budget chart column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BudgetLine {
    /// A section heading with no accounts.
    Heading {
        /// Heading text.
        title: String,
    },
    /// A budget line aggregating a set of accounts.
    Line {
        /// Line label.
        label: String,
        /// Budgeted amount for the period.
        budget: Decimal,
        /// Leaf accounts aggregated into this line.
        accounts: BTreeSet<AccountCode>,
    },
}

impl BudgetLine {
    /// The heading text or line label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Heading { title } => title,
            Self::Line { label, .. } => label,
        }
    }

    /// True for section headings.
    #[must_use]
    pub const fn is_heading(&self) -> bool {
        matches!(self, Self::Heading { .. })
    }
}

/// A full budget chart: expense lines and income lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetChart {
    /// Expense-side lines, in display order.
    pub expenses: Vec<BudgetLine>,
    /// Income-side lines, in display order.
    pub income: Vec<BudgetLine>,
}

impl BudgetChart {
    /// All account codes referenced by either side.
    #[must_use]
    pub fn accounts(&self) -> BTreeSet<&AccountCode> {
        self.expenses
            .iter()
            .chain(self.income.iter())
            .filter_map(|line| match line {
                BudgetLine::Line { accounts, .. } => Some(accounts.iter()),
                BudgetLine::Heading { .. } => None,
            })
            .flatten()
            .collect()
    }

    /// Check whether any line aggregates the given account.
    #[must_use]
    pub fn covers(&self, account: &AccountCode) -> bool {
        self.expenses
            .iter()
            .chain(self.income.iter())
            .any(|line| match line {
                BudgetLine::Line { accounts, .. } => accounts.contains(account),
                BudgetLine::Heading { .. } => false,
            })
    }
}
