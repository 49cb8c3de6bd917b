//! The aggregation pass: ledger snapshot + rule set -> structured statement.
//!
//! One pure batch computation. Every `(account, balance)` pair of the
//! snapshot is classified; each classification appends an entry to its
//! group's column. Columns are then summed exactly, group display totals
//! derived (net = gross - contra for paired groups), side totals computed,
//! and the residual result line injected into the short side so that both
//! sides close on the same figure.
//!
//! ```
//! use bilan_aggregate::aggregate;
//! use bilan_core::{chart, AccountCode, LedgerSnapshot};
//! use rust_decimal_macros::dec;
//!
//! let snapshot: LedgerSnapshot = [
//!     ("60700".parse::<AccountCode>().unwrap(), dec!(100.00)),
//!     ("70600".parse::<AccountCode>().unwrap(), dec!(-250.00)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let (layout, rules) = chart::french_income_statement();
//! let statement = aggregate(&snapshot, &rules, &layout);
//! assert_eq!(statement.result.amount, dec!(150.00));
//! let (charges, produits) = statement.closed_totals();
//! assert_eq!(charges, produits);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod budget;

pub use budget::{
    aggregate_budget, compare_budgets, BudgetColumn, BudgetComparison, BudgetEntry, BudgetRow,
    BudgetStatement, ComparisonRow,
};

use bilan_core::{
    ColumnEntries, GroupColumns, GroupId, GroupSpec, LedgerSnapshot, ResultLine, RuleSet, Side,
    SideLayout, SideRef, Statement, StatementGroup, StatementLayout, SubColumn,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::warn;

fn new_group(spec: &GroupSpec) -> StatementGroup {
    StatementGroup {
        id: spec.id.clone(),
        label: spec.label.clone(),
        columns: if spec.paired {
            GroupColumns::Paired {
                gross: ColumnEntries::default(),
                contra: ColumnEntries::default(),
            }
        } else {
            GroupColumns::Single(ColumnEntries::default())
        },
    }
}

fn finish_side(layout: &SideLayout, groups: &mut HashMap<GroupId, StatementGroup>) -> Side {
    let mut out = Vec::with_capacity(layout.groups.len());
    for spec in &layout.groups {
        let mut group = groups
            .remove(&spec.id)
            .unwrap_or_else(|| new_group(spec));
        match &mut group.columns {
            GroupColumns::Single(col) => col.sum(),
            GroupColumns::Paired { gross, contra } => {
                gross.sum();
                contra.sum();
            }
        }
        out.push(group);
    }
    let total = out
        .iter()
        .map(|g| g.total().unwrap_or_default())
        .sum();
    Side {
        title: layout.title.clone(),
        groups: out,
        total,
    }
}

/// Aggregate a ledger snapshot into a statement.
///
/// The snapshot is never mutated; the returned [`Statement`] carries the
/// per-group entry lists (sorted by account code), exact column and side
/// totals, and the injected result line. Accounts no rule covers simply do
/// not appear; the consistency checker reports them.
#[must_use]
pub fn aggregate(
    snapshot: &LedgerSnapshot,
    rules: &RuleSet,
    layout: &StatementLayout,
) -> Statement {
    let mut groups: HashMap<GroupId, StatementGroup> = layout
        .groups()
        .map(|spec| (spec.id.clone(), new_group(spec)))
        .collect();

    for (account, balance) in snapshot.iter() {
        for classified in rules.classify(account, *balance) {
            let Some(group) = groups.get_mut(&classified.group) else {
                // Load-time config validation rejects rules targeting
                // undeclared groups; the built-in tables are checked by test.
                warn!(
                    account = %account,
                    group = %classified.group,
                    "rule targets undeclared group, entry dropped"
                );
                continue;
            };
            match (&mut group.columns, classified.column) {
                (GroupColumns::Single(col), _)
                | (GroupColumns::Paired { gross: col, .. }, SubColumn::Gross | SubColumn::Single)
                | (GroupColumns::Paired { contra: col, .. }, SubColumn::Contra) => {
                    col.push(account.clone(), classified.amount);
                }
            }
        }
    }

    let left = finish_side(&layout.left, &mut groups);
    let right = finish_side(&layout.right, &mut groups);

    // The short side absorbs the result so both sides close equal.
    let diff = left.total - right.total;
    let result = if diff > Decimal::ZERO {
        ResultLine {
            label: layout.result_label.clone(),
            amount: diff,
            side: SideRef::Right,
        }
    } else {
        ResultLine {
            label: layout.result_label.clone(),
            amount: -diff,
            side: SideRef::Left,
        }
    };

    Statement { left, right, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilan_core::{chart, AccountCode, ClassificationRule, GroupId, SignCondition};
    use rust_decimal_macros::dec;

    fn code(s: &str) -> AccountCode {
        AccountCode::new(s).unwrap()
    }

    fn snapshot(pairs: &[(&str, Decimal)]) -> LedgerSnapshot {
        pairs.iter().map(|(c, b)| (code(c), *b)).collect()
    }

    #[test]
    fn test_reference_scenario() {
        // 607xx expense 100, 706xx income -250 (negated to 250),
        // 4091xx prepayment 30 on the asset side.
        let snap = snapshot(&[
            ("60711", dec!(100.00)),
            ("70611", dec!(-250.00)),
        ]);
        let (layout, rules) = chart::french_income_statement();
        let stmt = aggregate(&snap, &rules, &layout);

        assert_eq!(stmt.left.total, dec!(100.00));
        assert_eq!(stmt.right.total, dec!(250.00));
        assert_eq!(stmt.result.amount, dec!(150.00));
        assert_eq!(stmt.result.side, SideRef::Left);
        let (l, r) = stmt.closed_totals();
        assert_eq!(l, dec!(250.00));
        assert_eq!(l, r);
    }

    #[test]
    fn test_entries_sorted_by_account() {
        let snap = snapshot(&[("626", dec!(2.00)), ("613", dec!(1.00)), ("618", dec!(4.00))]);
        let (layout, rules) = chart::french_income_statement();
        let stmt = aggregate(&snap, &rules, &layout);
        let group = stmt
            .left
            .groups
            .iter()
            .find(|g| g.id == GroupId::from("autres_charges_externes"))
            .unwrap();
        let GroupColumns::Single(col) = &group.columns else {
            panic!("expected single column");
        };
        let accounts: Vec<&str> = col.entries.iter().map(|e| e.account.as_str()).collect();
        assert_eq!(accounts, vec!["613", "618", "626"]);
        assert_eq!(col.total, Some(dec!(7.00)));
    }

    #[test]
    fn test_unfed_groups_still_present_with_unset_total() {
        let snap = snapshot(&[("613", dec!(1.00))]);
        let (layout, rules) = chart::french_income_statement();
        let stmt = aggregate(&snap, &rules, &layout);
        let caisse = stmt
            .left
            .groups
            .iter()
            .find(|g| g.id == GroupId::from("charges_sociales"))
            .unwrap();
        assert_eq!(caisse.total(), None);
        assert_eq!(stmt.left.groups.len(), layout.left.groups.len());
    }

    #[test]
    fn test_balance_sheet_nets_amortization() {
        let snap = snapshot(&[
            ("2154", dec!(1000.00)),
            ("28154", dec!(-400.00)),
            ("101", dec!(-600.00)),
        ]);
        let (layout, rules) = chart::french_balance_sheet();
        let stmt = aggregate(&snap, &rules, &layout);
        let immo = stmt
            .left
            .groups
            .iter()
            .find(|g| g.id == GroupId::from("immo_corp"))
            .unwrap();
        assert_eq!(immo.total(), Some(dec!(600.00)));
        assert_eq!(stmt.left.total, dec!(600.00));
        assert_eq!(stmt.right.total, dec!(600.00));
        assert_eq!(stmt.result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_deficit_lands_on_income_side() {
        let snap = snapshot(&[("607", dec!(300.00)), ("706", dec!(-120.00))]);
        let (layout, rules) = chart::french_income_statement();
        let stmt = aggregate(&snap, &rules, &layout);
        assert_eq!(stmt.result.side, SideRef::Right);
        assert_eq!(stmt.result.amount, dec!(180.00));
        let (l, r) = stmt.closed_totals();
        assert_eq!(l, r);
    }

    #[test]
    fn test_sign_flip_moves_account_across_sides() {
        let (layout, rules) = chart::french_balance_sheet();

        let stmt = aggregate(&snapshot(&[("455", dec!(100.00))]), &rules, &layout);
        let creances = stmt
            .left
            .groups
            .iter()
            .find(|g| g.id == GroupId::from("creances_autres"))
            .unwrap();
        assert_eq!(creances.total(), Some(dec!(100.00)));

        let stmt = aggregate(&snapshot(&[("455", dec!(-100.00))]), &rules, &layout);
        let creances = stmt
            .left
            .groups
            .iter()
            .find(|g| g.id == GroupId::from("creances_autres"))
            .unwrap();
        assert_eq!(creances.total(), None);
        let dettes = stmt
            .right
            .groups
            .iter()
            .find(|g| g.id == GroupId::from("dettes_autres"))
            .unwrap();
        // Magnitude preserved across the flip.
        assert_eq!(dettes.total(), Some(dec!(100.00)));
    }

    #[test]
    fn test_rule_targeting_undeclared_group_drops_entry() {
        let rules = RuleSet::new(vec![
            ClassificationRule::new("61", "externes"),
            ClassificationRule::new("62", "inconnu"),
        ]);
        let layout = StatementLayout {
            result_label: "Résultat".to_owned(),
            coverage_prefixes: Vec::new(),
            left: SideLayout {
                title: "Charges".to_owned(),
                groups: vec![GroupSpec {
                    id: "externes".into(),
                    label: "Externes".to_owned(),
                    paired: false,
                }],
                class_prefixes: Vec::new(),
                negate_raw: false,
            },
            right: SideLayout {
                title: "Produits".to_owned(),
                groups: Vec::new(),
                class_prefixes: Vec::new(),
                negate_raw: true,
            },
        };
        let snap = snapshot(&[("613", dec!(10.00)), ("626", dec!(99.00))]);
        let stmt = aggregate(&snap, &rules, &layout);
        // The misrouted entry is dropped, not misfiled or panicking.
        assert_eq!(stmt.left.total, dec!(10.00));
    }

    #[test]
    fn test_additivity_of_nonterminating_decimals() {
        // 0.10 ten times must make exactly 1.00.
        let rules = RuleSet::new(vec![ClassificationRule::new("61", "externes")
            .when(SignCondition::Any)]);
        let layout = StatementLayout {
            result_label: "Résultat".to_owned(),
            coverage_prefixes: Vec::new(),
            left: SideLayout {
                title: "Charges".to_owned(),
                groups: vec![GroupSpec {
                    id: "externes".into(),
                    label: "Externes".to_owned(),
                    paired: false,
                }],
                class_prefixes: vec!["6".to_owned()],
                negate_raw: false,
            },
            right: SideLayout {
                title: "Produits".to_owned(),
                groups: Vec::new(),
                class_prefixes: vec!["7".to_owned()],
                negate_raw: true,
            },
        };
        let snap: LedgerSnapshot = (0..10)
            .map(|i| (code(&format!("61{i:02}")), dec!(0.10)))
            .collect();
        let stmt = aggregate(&snap, &rules, &layout);
        assert_eq!(stmt.left.total, dec!(1.00));
    }
}
