//! The ledger snapshot: closing balances of leaf accounts.

use crate::account::AccountCode;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Closing balances of leaf accounts, one report run's source of truth.
///
/// Balances are debit-positive (`débit - crédit`), exact decimals. Zero
/// balances are dropped on insertion: only accounts with activity matter to
/// classification, and the missing-account scan must not flag dead accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    balances: BTreeMap<AccountCode, Decimal>,
}

impl LedgerSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to an account's balance, dropping the account if the
    /// balance nets to zero.
    pub fn add(&mut self, account: AccountCode, amount: Decimal) {
        let balance = self.balances.entry(account.clone()).or_default();
        *balance += amount;
        if balance.is_zero() {
            self.balances.remove(&account);
        }
    }

    /// Look up one account's balance.
    #[must_use]
    pub fn get(&self, account: &AccountCode) -> Option<Decimal> {
        self.balances.get(account).copied()
    }

    /// Iterate over `(account, balance)` pairs in account-code order.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountCode, &Decimal)> {
        self.balances.iter()
    }

    /// Number of accounts with a non-zero balance.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// True when no account carries a balance.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Exact sum of the balances of accounts matching any of `prefixes`.
    #[must_use]
    pub fn sum_by_prefixes(&self, prefixes: &[String]) -> Decimal {
        self.balances
            .iter()
            .filter(|(code, _)| code.matches_any(prefixes))
            .map(|(_, balance)| *balance)
            .sum()
    }
}

impl FromIterator<(AccountCode, Decimal)> for LedgerSnapshot {
    fn from_iter<T: IntoIterator<Item = (AccountCode, Decimal)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (account, amount) in iter {
            snapshot.add(account, amount);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> AccountCode {
        AccountCode::new(s).unwrap()
    }

    #[test]
    fn test_add_accumulates() {
        let mut snap = LedgerSnapshot::new();
        snap.add(code("601"), dec!(10.00));
        snap.add(code("601"), dec!(5.50));
        assert_eq!(snap.get(&code("601")), Some(dec!(15.50)));
    }

    #[test]
    fn test_zero_balances_are_dropped() {
        let mut snap = LedgerSnapshot::new();
        snap.add(code("512"), dec!(100.00));
        snap.add(code("512"), dec!(-100.00));
        assert_eq!(snap.get(&code("512")), None);
        assert!(snap.is_empty());
    }

    #[test]
    fn test_sum_by_prefixes() {
        let snap: LedgerSnapshot = [
            (code("601"), dec!(10.00)),
            (code("626"), dec!(20.00)),
            (code("706"), dec!(-50.00)),
        ]
        .into_iter()
        .collect();
        assert_eq!(snap.sum_by_prefixes(&["6".to_owned()]), dec!(30.00));
        assert_eq!(snap.sum_by_prefixes(&["7".to_owned()]), dec!(-50.00));
    }
}
