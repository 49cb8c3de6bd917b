//! Statement structures: groups, sides, layouts, and the result line.
//!
//! A [`Statement`] is the fully aggregated report: two [`Side`]s
//! (assets/liabilities or expenses/income), each an ordered list of
//! [`StatementGroup`]s, closed by a single [`ResultLine`]. The shape of a
//! statement is described by a [`StatementLayout`], which is declarative
//! configuration rather than code.

use crate::account::AccountCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a statement line group (e.g. `immo_corp`,
/// `dettes_fournisseurs`, `charges_sociales`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One classified account balance within a group column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The source account.
    pub account: AccountCode,
    /// The classified (possibly sign-flipped) balance.
    pub amount: Decimal,
}

/// The entries and total of one column of a group.
///
/// The total is `None` until entries have been summed, and stays `None` for
/// a group the layout declares but no account feeds. A missing line and a
/// zero line must be tellable apart on the printed sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnEntries {
    /// Entries in account-code order.
    pub entries: Vec<Entry>,
    /// Exact sum of the entries, or `None` when there are none.
    pub total: Option<Decimal>,
}

impl ColumnEntries {
    /// Append an entry. Totals are recomputed by [`Self::sum`].
    pub fn push(&mut self, account: AccountCode, amount: Decimal) {
        self.entries.push(Entry { account, amount });
    }

    /// Sort entries by account code and compute the total.
    pub fn sum(&mut self) {
        self.entries.sort_by(|a, b| a.account.cmp(&b.account));
        self.total = if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.iter().map(|e| e.amount).sum())
        };
    }
}

/// The column structure of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupColumns {
    /// A one-column group (liabilities, expenses, income).
    Single(ColumnEntries),
    /// A two-column asset group: gross value and contra (amortization).
    Paired {
        /// Gross acquisition values.
        gross: ColumnEntries,
        /// Accumulated depreciation and write-downs, positive magnitude.
        contra: ColumnEntries,
    },
}

/// One line group of a statement side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementGroup {
    /// Group identifier.
    pub id: GroupId,
    /// Human-readable label.
    pub label: String,
    /// Column structure and entries.
    pub columns: GroupColumns,
}

impl StatementGroup {
    /// The group's display total.
    ///
    /// Single-column groups report their column sum; paired groups report
    /// net = gross - contra. `None` means no account fed the group at all.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        match &self.columns {
            GroupColumns::Single(col) => col.total,
            GroupColumns::Paired { gross, contra } => match (gross.total, contra.total) {
                (None, None) => None,
                (g, c) => Some(g.unwrap_or_default() - c.unwrap_or_default()),
            },
        }
    }

    /// True when no account fed this group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.columns {
            GroupColumns::Single(col) => col.entries.is_empty(),
            GroupColumns::Paired { gross, contra } => {
                gross.entries.is_empty() && contra.entries.is_empty()
            }
        }
    }
}

/// Which side of a statement a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideRef {
    /// The left side (assets, or expenses).
    Left,
    /// The right side (liabilities, or income).
    Right,
}

/// One side of an aggregated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Side {
    /// Side title (e.g. "Actif", "Charges").
    pub title: String,
    /// Groups in layout order.
    pub groups: Vec<StatementGroup>,
    /// Sum of the group totals, before result-line injection.
    pub total: Decimal,
}

/// The derived line that closes a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    /// Display label ("Résultat de l'exercice").
    pub label: String,
    /// Positive magnitude of the period result.
    pub amount: Decimal,
    /// The side the line is injected into (the short one).
    pub side: SideRef,
}

/// A fully aggregated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Left side (assets or expenses).
    pub left: Side,
    /// Right side (liabilities or income).
    pub right: Side,
    /// The result line closing the statement.
    pub result: ResultLine,
}

impl Statement {
    /// Side totals with the result line included.
    ///
    /// After injection both figures agree: that is the double-entry
    /// identity the statement closes on.
    #[must_use]
    pub fn closed_totals(&self) -> (Decimal, Decimal) {
        match self.result.side {
            SideRef::Left => (self.left.total + self.result.amount, self.right.total),
            SideRef::Right => (self.left.total, self.right.total + self.result.amount),
        }
    }
}

/// Declared shape of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Group identifier, referenced by classification rules.
    pub id: GroupId,
    /// Display label.
    pub label: String,
    /// Whether the group carries gross/contra columns.
    #[serde(default)]
    pub paired: bool,
}

/// Declared shape of one statement side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideLayout {
    /// Side title.
    pub title: String,
    /// Groups in display order.
    pub groups: Vec<GroupSpec>,
    /// Account-class prefixes whose raw balances this side must reconcile
    /// with (e.g. `["6"]` for expenses). Empty disables the recompute.
    #[serde(default)]
    pub class_prefixes: Vec<String>,
    /// Whether the raw recompute negates its sum (credit-natural sides
    /// under the debit-positive snapshot convention).
    #[serde(default)]
    pub negate_raw: bool,
}

/// Declared shape of a whole statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLayout {
    /// Label of the injected result line.
    pub result_label: String,
    /// Account-class prefixes every snapshot account in which must be
    /// covered by some rule (the missing-account scan).
    #[serde(default)]
    pub coverage_prefixes: Vec<String>,
    /// Left side.
    pub left: SideLayout,
    /// Right side.
    pub right: SideLayout,
}

impl StatementLayout {
    /// Iterate over the group specs of both sides.
    pub fn groups(&self) -> impl Iterator<Item = &GroupSpec> {
        self.left.groups.iter().chain(self.right.groups.iter())
    }

    /// Check whether a group id is declared by either side.
    #[must_use]
    pub fn declares(&self, id: &GroupId) -> bool {
        self.groups().any(|g| &g.id == id)
    }
}
