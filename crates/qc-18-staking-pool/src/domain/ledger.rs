//! # Account Ledger
//!
//! Mapping from account identity to staked balance, plus the pool-wide
//! `total_eth_staked` counter that must track the sum of all balances.
//!
//! Entries are created on first credit and never removed; an account that
//! withdraws everything keeps a zero entry.

use crate::domain::errors::StakingError;
use crate::domain::value_objects::{AccountId, U256};
use std::collections::HashMap;

/// A planned ledger mutation, computed against the current ledger but not
/// yet written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerWrite {
    /// Account being written.
    pub account: AccountId,
    /// Account balance after the write.
    pub balance: U256,
    /// Pool total after the write.
    pub total_eth_staked: U256,
}

/// Per-account staked balances and their running total.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountLedger {
    balances: HashMap<AccountId, U256>,
    total_eth_staked: U256,
}

impl AccountLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Staked balance of `account`, zero if never seen.
    #[must_use]
    pub fn get(&self, account: &AccountId) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Pool-wide staked total.
    #[must_use]
    pub fn total_eth_staked(&self) -> U256 {
        self.total_eth_staked
    }

    /// Add `amount` to `account` and to the pool total.
    pub fn credit(&mut self, account: AccountId, amount: U256) -> Result<(), StakingError> {
        let write = self.plan_credit(account, amount)?;
        self.apply(write);
        Ok(())
    }

    /// Remove `amount` from `account` and from the pool total.
    pub fn debit(&mut self, account: AccountId, amount: U256) -> Result<(), StakingError> {
        let write = self.plan_debit(account, amount)?;
        self.apply(write);
        Ok(())
    }

    /// Remove `amount` from `account` only, leaving the pool total as is.
    ///
    /// This is the reward-claim path. The pool total is intentionally not
    /// reduced, so after a claim `total_eth_staked` exceeds the sum of
    /// balances by the claimed principal.
    pub fn debit_balance_only(
        &mut self,
        account: AccountId,
        amount: U256,
    ) -> Result<(), StakingError> {
        let write = self.plan_debit_balance_only(account, amount)?;
        self.apply(write);
        Ok(())
    }

    /// Compute a credit without writing it.
    ///
    /// Both sums are checked before anything is staged, so an overflow
    /// leaves nothing behind.
    pub fn plan_credit(&self, account: AccountId, amount: U256) -> Result<LedgerWrite, StakingError> {
        let balance = self
            .get(&account)
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let total_eth_staked = self
            .total_eth_staked
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;

        Ok(LedgerWrite {
            account,
            balance,
            total_eth_staked,
        })
    }

    /// Compute a debit of balance and total without writing it.
    pub fn plan_debit(&self, account: AccountId, amount: U256) -> Result<LedgerWrite, StakingError> {
        let balance = self.balance_after_debit(&account, amount)?;
        let total_eth_staked = self
            .total_eth_staked
            .checked_sub(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;

        Ok(LedgerWrite {
            account,
            balance,
            total_eth_staked,
        })
    }

    /// Compute a balance-only debit without writing it.
    pub fn plan_debit_balance_only(
        &self,
        account: AccountId,
        amount: U256,
    ) -> Result<LedgerWrite, StakingError> {
        let balance = self.balance_after_debit(&account, amount)?;

        Ok(LedgerWrite {
            account,
            balance,
            total_eth_staked: self.total_eth_staked,
        })
    }

    fn balance_after_debit(&self, account: &AccountId, amount: U256) -> Result<U256, StakingError> {
        self.get(account)
            .checked_sub(amount)
            .ok_or(StakingError::InsufficientBalance)
    }

    /// Write a planned mutation.
    pub fn apply(&mut self, write: LedgerWrite) {
        self.balances.insert(write.account, write.balance);
        self.total_eth_staked = write.total_eth_staked;
    }

    /// Sum of all balances, `None` on overflow.
    #[must_use]
    pub fn sum(&self) -> Option<U256> {
        self.balances
            .values()
            .try_fold(U256::zero(), |acc, v| acc.checked_add(*v))
    }

    /// Number of accounts with an entry, including zero entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Returns true if no account has ever staked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &U256)> {
        self.balances.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::new([1u8; 20])
    }

    fn bob() -> AccountId {
        AccountId::new([2u8; 20])
    }

    #[test]
    fn test_unknown_account_is_zero() {
        let ledger = AccountLedger::new();
        assert_eq!(ledger.get(&alice()), U256::zero());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_credit_updates_balance_and_total() {
        let mut ledger = AccountLedger::new();
        ledger.credit(alice(), U256::from(10)).unwrap();
        ledger.credit(bob(), U256::from(5)).unwrap();
        ledger.credit(alice(), U256::from(1)).unwrap();

        assert_eq!(ledger.get(&alice()), U256::from(11));
        assert_eq!(ledger.get(&bob()), U256::from(5));
        assert_eq!(ledger.total_eth_staked(), U256::from(16));
        assert_eq!(ledger.sum(), Some(U256::from(16)));
    }

    #[test]
    fn test_debit_insufficient_balance() {
        let mut ledger = AccountLedger::new();
        ledger.credit(alice(), U256::from(3)).unwrap();

        let err = ledger.debit(alice(), U256::from(4)).unwrap_err();
        assert_eq!(err, StakingError::InsufficientBalance);
        assert_eq!(ledger.get(&alice()), U256::from(3));
        assert_eq!(ledger.total_eth_staked(), U256::from(3));
    }

    #[test]
    fn test_debit_to_zero_keeps_entry() {
        let mut ledger = AccountLedger::new();
        ledger.credit(alice(), U256::from(3)).unwrap();
        ledger.debit(alice(), U256::from(3)).unwrap();

        assert_eq!(ledger.get(&alice()), U256::zero());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total_eth_staked(), U256::zero());
    }

    #[test]
    fn test_credit_overflow_leaves_ledger_untouched() {
        let mut ledger = AccountLedger::new();
        ledger.credit(alice(), U256::MAX).unwrap();

        let err = ledger.credit(bob(), U256::from(1)).unwrap_err();
        assert_eq!(err, StakingError::ArithmeticOverflow);
        assert_eq!(ledger.get(&bob()), U256::zero());
        assert_eq!(ledger.total_eth_staked(), U256::MAX);
    }

    #[test]
    fn test_plan_does_not_write() {
        let mut ledger = AccountLedger::new();
        ledger.credit(alice(), U256::from(10)).unwrap();

        let write = ledger.plan_debit(alice(), U256::from(4)).unwrap();
        assert_eq!(write.balance, U256::from(6));
        assert_eq!(write.total_eth_staked, U256::from(6));
        assert_eq!(ledger.get(&alice()), U256::from(10));

        ledger.apply(write);
        assert_eq!(ledger.get(&alice()), U256::from(6));
    }

    #[test]
    fn test_debit_balance_only_keeps_total() {
        let mut ledger = AccountLedger::new();
        ledger.credit(alice(), U256::from(10)).unwrap();
        ledger.debit_balance_only(alice(), U256::from(4)).unwrap();

        assert_eq!(ledger.get(&alice()), U256::from(6));
        assert_eq!(ledger.total_eth_staked(), U256::from(10));
        assert_eq!(ledger.sum(), Some(U256::from(6)));
    }
}
