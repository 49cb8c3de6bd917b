//! Classification rules: the mapping from account codes to statement lines.
//!
//! A [`RuleSet`] is an ordered table of [`ClassificationRule`]s. Each rule
//! routes accounts matching a numeric prefix to a statement group, optionally
//! restricted to one balance sign and optionally flipping the sign of the
//! routed amount. Matching is by longest prefix: a rule on `4091` shields the
//! accounts it matches from a more general rule on `40`, whatever the
//! declaration order.

use crate::account::AccountCode;
use crate::statement::GroupId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which sub-column of a statement group an entry lands in.
///
/// Asset lines carry a gross acquisition column and a contra
/// (depreciation/write-down) column; every other line has a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubColumn {
    /// The single column of a one-column group.
    #[default]
    Single,
    /// The gross column of a two-column asset group.
    Gross,
    /// The contra (amortization) column of a two-column asset group.
    Contra,
}

/// Balance-sign condition under which a rule applies.
///
/// Third-party accounts (classes 40-46, 51) behave as receivables or
/// payables depending on which way the balance nets, so one account code can
/// feed either side of the balance sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignCondition {
    /// The rule applies regardless of sign.
    #[default]
    Any,
    /// The rule applies only to strictly positive balances.
    Positive,
    /// The rule applies only to strictly negative balances.
    Negative,
}

impl SignCondition {
    /// Check whether a balance satisfies this condition.
    #[must_use]
    pub fn admits(self, balance: Decimal) -> bool {
        match self {
            Self::Any => true,
            Self::Positive => balance > Decimal::ZERO,
            Self::Negative => balance < Decimal::ZERO,
        }
    }

    /// Check whether two conditions can admit the same balance.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self == Self::Any || other == Self::Any || self == other
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// The account-code prefix this rule matches.
    pub prefix: String,
    /// The statement group receiving the entry.
    pub group: GroupId,
    /// The sub-column within the group.
    #[serde(default)]
    pub column: SubColumn,
    /// The balance sign under which the rule applies.
    #[serde(default)]
    pub sign: SignCondition,
    /// Whether to flip the sign of the routed balance.
    ///
    /// Set on income-side and liability-side rules: raw balances are
    /// debit-positive, so credit-natural accounts net negative and must be
    /// shown positive. Also set on contra columns, so that net = gross -
    /// contra holds with positive contra magnitudes.
    #[serde(default)]
    pub negate: bool,
}

impl ClassificationRule {
    /// Create a single-column rule with no sign condition.
    #[must_use]
    pub fn new(prefix: impl Into<String>, group: impl Into<GroupId>) -> Self {
        Self {
            prefix: prefix.into(),
            group: group.into(),
            column: SubColumn::Single,
            sign: SignCondition::Any,
            negate: false,
        }
    }

    /// Set the sub-column.
    #[must_use]
    pub const fn in_column(mut self, column: SubColumn) -> Self {
        self.column = column;
        self
    }

    /// Restrict the rule to one balance sign.
    #[must_use]
    pub const fn when(mut self, sign: SignCondition) -> Self {
        self.sign = sign;
        self
    }

    /// Flip the sign of routed balances.
    #[must_use]
    pub const fn negated(mut self) -> Self {
        self.negate = true;
        self
    }
}

/// One classification produced for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    /// The target statement group.
    pub group: GroupId,
    /// The target sub-column.
    pub column: SubColumn,
    /// The balance after any sign flip.
    pub amount: Decimal,
}

/// An ordered table of classification rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<ClassificationRule>,
}

impl RuleSet {
    /// Create a rule set from an ordered list of rules.
    #[must_use]
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// The rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Classify one account balance.
    ///
    /// Returns zero entries when no rule covers the account, one entry in
    /// the common case, and one entry per distinct `(group, column)` target
    /// when several rules tie at the highest specificity (an account shown
    /// on both the gross and contra columns of a line).
    ///
    /// Among the rules whose prefix matches and whose sign condition admits
    /// the balance, only those with the longest prefix apply; a rule on a
    /// sub-prefix therefore excludes the account from every shorter rule.
    /// Equal-length rules aiming at the same target resolve to the first
    /// one declared.
    #[must_use]
    pub fn classify(&self, account: &AccountCode, balance: Decimal) -> Vec<Classified> {
        let matching: Vec<&ClassificationRule> = self
            .rules
            .iter()
            .filter(|r| account.matches_prefix(&r.prefix) && r.sign.admits(balance))
            .collect();

        let Some(best_len) = matching.iter().map(|r| r.prefix.len()).max() else {
            return Vec::new();
        };

        let mut out: Vec<Classified> = Vec::new();
        for rule in matching
            .into_iter()
            .filter(|r| r.prefix.len() == best_len)
        {
            // First rule wins per (group, column) target.
            if out
                .iter()
                .any(|c| c.group == rule.group && c.column == rule.column)
            {
                continue;
            }
            let amount = if rule.negate { -balance } else { balance };
            out.push(Classified {
                group: rule.group.clone(),
                column: rule.column,
                amount,
            });
        }
        out
    }

    /// Check whether any rule applies to this account balance.
    #[must_use]
    pub fn covers(&self, account: &AccountCode, balance: Decimal) -> bool {
        self.rules
            .iter()
            .any(|r| account.matches_prefix(&r.prefix) && r.sign.admits(balance))
    }
}

impl FromIterator<ClassificationRule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = ClassificationRule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
