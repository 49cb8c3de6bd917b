//! Account codes following the French Plan Comptable Général numbering.
//!
//! An [`AccountCode`] is the key of every ledger balance. Its leading digits
//! carry all the classification information: the first digit is the account
//! class (6 = expenses, 7 = income, 1-5 = balance-sheet classes), and longer
//! prefixes select ever more specific statement lines.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when constructing an [`AccountCode`] from invalid input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountCodeError {
    /// The code was empty.
    #[error("account code is empty")]
    Empty,
    /// The code did not start with a digit.
    #[error("account code `{0}` does not start with a digit")]
    NoLeadingDigit(String),
}

/// A PCG-style account code.
///
/// The code must be non-empty and start with an ASCII digit. Ledger exports
/// sometimes suffix the numeric code with a mnemonic (`"706_cotisations"`),
/// so only the leading character is constrained; prefix matching operates on
/// the raw string.
///
/// # Examples
///
/// ```
/// use bilan_core::AccountCode;
///
/// let code: AccountCode = "4091".parse().unwrap();
/// assert!(code.matches_prefix("40"));
/// assert!(code.matches_prefix("4091"));
/// assert!(!code.matches_prefix("41"));
/// assert_eq!(code.class(), '4');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountCode(String);

impl AccountCode {
    /// Create a new account code.
    pub fn new(code: impl Into<String>) -> Result<Self, AccountCodeError> {
        let code = code.into();
        match code.chars().next() {
            None => Err(AccountCodeError::Empty),
            Some(c) if c.is_ascii_digit() => Ok(Self(code)),
            Some(_) => Err(AccountCodeError::NoLeadingDigit(code)),
        }
    }

    /// The raw code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this code's leading characters equal `prefix`.
    #[must_use]
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Check whether this code matches any of the given prefixes.
    #[must_use]
    pub fn matches_any(&self, prefixes: &[String]) -> bool {
        prefixes.iter().any(|p| self.matches_prefix(p))
    }

    /// The PCG account class (the first digit).
    #[must_use]
    pub fn class(&self) -> char {
        // Constructor guarantees a leading digit.
        self.0.chars().next().unwrap_or('0')
    }

    /// True for income-statement accounts (classes 6 and 7).
    #[must_use]
    pub fn is_income_statement(&self) -> bool {
        matches!(self.class(), '6' | '7')
    }
}

impl FromStr for AccountCode {
    type Err = AccountCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountCode {
    type Error = AccountCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AccountCode> for String {
    fn from(code: AccountCode) -> Self {
        code.0
    }
}

impl fmt::Display for AccountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let code = AccountCode::new("706").unwrap();
        assert_eq!(code.as_str(), "706");
    }

    #[test]
    fn test_new_with_suffix() {
        let code = AccountCode::new("606100_fournitures").unwrap();
        assert_eq!(code.class(), '6');
    }

    #[test]
    fn test_new_empty() {
        assert_eq!(AccountCode::new(""), Err(AccountCodeError::Empty));
    }

    #[test]
    fn test_new_no_digit() {
        assert!(matches!(
            AccountCode::new("caisse"),
            Err(AccountCodeError::NoLeadingDigit(_))
        ));
    }

    #[test]
    fn test_prefix_matching() {
        let code = AccountCode::new("4091").unwrap();
        assert!(code.matches_prefix("4"));
        assert!(code.matches_prefix("40"));
        assert!(code.matches_prefix("409"));
        assert!(code.matches_prefix("4091"));
        assert!(!code.matches_prefix("41"));
        assert!(!code.matches_prefix("40911"));
    }

    #[test]
    fn test_income_statement_classes() {
        assert!(AccountCode::new("601").unwrap().is_income_statement());
        assert!(AccountCode::new("758").unwrap().is_income_statement());
        assert!(!AccountCode::new("512").unwrap().is_income_statement());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = AccountCode::new("40").unwrap();
        let b = AccountCode::new("4091").unwrap();
        assert!(a < b);
    }
}
