//! Core types for bilan
//!
//! This crate provides the fundamental types of the statement engine:
//!
//! - [`AccountCode`] - A PCG-style account code with prefix matching
//! - [`LedgerSnapshot`] - Closing balances of leaf accounts
//! - [`ClassificationRule`] / [`RuleSet`] - The prefix-precedence rule table
//! - [`Statement`] and friends - Groups, sub-columns, sides, result line
//! - [`StatementLayout`] - The declarative shape of a statement
//! - [`BudgetChart`] - The two-list budget grouping
//! - [`chart`] - Built-in French PCG tables
//!
//! # Example
//!
//! ```
//! use bilan_core::{AccountCode, RuleSet, ClassificationRule, SignCondition};
//! use rust_decimal_macros::dec;
//!
//! let rules = RuleSet::new(vec![
//!     ClassificationRule::new("4091", "avances"),
//!     ClassificationRule::new("40", "creances").when(SignCondition::Positive),
//! ]);
//!
//! let account: AccountCode = "40911".parse().unwrap();
//! let classified = rules.classify(&account, dec!(30.00));
//! // The specific 4091 rule shields the account from the general 40 rule.
//! assert_eq!(classified.len(), 1);
//! assert_eq!(classified[0].group.as_str(), "avances");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod budget;
pub mod chart;
pub mod rule;
pub mod snapshot;
pub mod statement;

pub use account::{AccountCode, AccountCodeError};
pub use budget::{BudgetChart, BudgetLine};
pub use rule::{Classified, ClassificationRule, RuleSet, SignCondition, SubColumn};
pub use snapshot::LedgerSnapshot;
pub use statement::{
    ColumnEntries, Entry, GroupColumns, GroupId, GroupSpec, ResultLine, Side, SideLayout, SideRef,
    Statement, StatementGroup, StatementLayout,
};

// Re-export the decimal type used throughout
pub use rust_decimal::Decimal;
