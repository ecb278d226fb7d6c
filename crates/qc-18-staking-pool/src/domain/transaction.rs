//! # Pool Context & Transactions
//!
//! The pool's singleton state is an explicit [`PoolContext`]. Operations
//! never mutate it directly: they open a [`PoolTransaction`], stage their
//! changes against a copy, hand the owned [`StagedChanges`] back, run any
//! external side effect, and only then [`PoolContext::commit`].
//!
//! ```text
//! ctx.begin() ──stage──→ into_changes() ──external call ok──→ ctx.commit()
//!                                       └──external call err──→ drop
//! ```
//!
//! Dropping staged changes is the rollback; the context is untouched.

use crate::domain::entities::{PoolSnapshot, PoolState};
use crate::domain::errors::StakingError;
use crate::domain::ledger::{AccountLedger, LedgerWrite};
use crate::domain::rewards::RewardAccountant;
use crate::domain::value_objects::{AccountId, U256};

/// Ledger plus pool state, owned by a single coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolContext {
    ledger: AccountLedger,
    state: PoolState,
}

impl PoolContext {
    /// Fresh pool owned by `owner`.
    #[must_use]
    pub fn new(owner: AccountId) -> Self {
        Self {
            ledger: AccountLedger::new(),
            state: PoolState::new(owner),
        }
    }

    /// The account ledger.
    #[must_use]
    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    /// Pool-wide state.
    #[must_use]
    pub fn state(&self) -> &PoolState {
        &self.state
    }

    /// Share and reward queries over the committed state.
    #[must_use]
    pub fn accountant(&self) -> RewardAccountant<'_> {
        RewardAccountant::new(&self.ledger, self.state.total_rewards_received)
    }

    /// Open a transaction against the committed state.
    #[must_use]
    pub fn begin(&self) -> PoolTransaction<'_> {
        PoolTransaction {
            ledger: &self.ledger,
            ledger_write: None,
            state: self.state.clone(),
        }
    }

    /// Write staged changes.
    pub fn commit(&mut self, changes: StagedChanges) {
        if let Some(write) = changes.ledger_write {
            self.ledger.apply(write);
        }
        self.state = changes.state;
    }

    /// Consistent copy of everything.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        let mut balances: Vec<_> = self.ledger.iter().map(|(id, v)| (*id, *v)).collect();
        balances.sort_by(|a, b| a.0.cmp(&b.0));

        PoolSnapshot {
            owner: self.state.owner,
            total_eth_staked: self.ledger.total_eth_staked(),
            total_rewards_received: self.state.total_rewards_received,
            pool_balance: self.state.pool_balance,
            activity: self.state.gate.activity(),
            admission: self.state.gate.admission(),
            rewards_on: self.state.gate.rewards_on(),
            balances,
        }
    }
}

/// Owned result of a transaction, ready to commit or drop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "staged changes do nothing unless committed"]
pub struct StagedChanges {
    ledger_write: Option<LedgerWrite>,
    state: PoolState,
}

/// Staged view over a [`PoolContext`].
///
/// Every pool operation touches at most one ledger entry, so a single
/// staged write is enough.
#[derive(Debug)]
pub struct PoolTransaction<'a> {
    ledger: &'a AccountLedger,
    ledger_write: Option<LedgerWrite>,
    state: PoolState,
}

impl PoolTransaction<'_> {
    /// Staged pool state.
    #[must_use]
    pub fn state(&self) -> &PoolState {
        &self.state
    }

    /// Mutable staged pool state.
    pub fn state_mut(&mut self) -> &mut PoolState {
        &mut self.state
    }

    /// Committed ledger the transaction reads from.
    #[must_use]
    pub fn ledger(&self) -> &AccountLedger {
        self.ledger
    }

    /// Pool total including any staged write.
    #[must_use]
    pub fn total_eth_staked(&self) -> U256 {
        self.ledger_write
            .map_or_else(|| self.ledger.total_eth_staked(), |w| w.total_eth_staked)
    }

    /// Stage a credit of stake.
    pub fn credit_stake(&mut self, account: AccountId, amount: U256) -> Result<(), StakingError> {
        let write = self.ledger.plan_credit(account, amount)?;
        self.stage(write);
        Ok(())
    }

    /// Stage a debit of stake and pool total.
    pub fn debit_stake(&mut self, account: AccountId, amount: U256) -> Result<(), StakingError> {
        let write = self.ledger.plan_debit(account, amount)?;
        self.stage(write);
        Ok(())
    }

    /// Stage a claim debit, which leaves the pool total unchanged.
    pub fn debit_claim(&mut self, account: AccountId, amount: U256) -> Result<(), StakingError> {
        let write = self.ledger.plan_debit_balance_only(account, amount)?;
        self.stage(write);
        Ok(())
    }

    fn stage(&mut self, write: LedgerWrite) {
        debug_assert!(self.ledger_write.is_none(), "one ledger write per transaction");
        self.ledger_write = Some(write);
    }

    /// Stage native currency flowing into the pool.
    pub fn receive_funds(&mut self, amount: U256) -> Result<(), StakingError> {
        self.state.pool_balance = self
            .state
            .pool_balance
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Stage native currency leaving the pool.
    ///
    /// Returns `shortfall` if the pool does not hold `amount`.
    pub fn release_funds(&mut self, amount: U256, shortfall: StakingError) -> Result<(), StakingError> {
        self.state.pool_balance = self.state.pool_balance.checked_sub(amount).ok_or(shortfall)?;
        Ok(())
    }

    /// Finish staging.
    pub fn into_changes(self) -> StagedChanges {
        StagedChanges {
            ledger_write: self.ledger_write,
            state: self.state,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gate::Admission;

    fn owner() -> AccountId {
        AccountId::new([0xEE; 20])
    }

    fn alice() -> AccountId {
        AccountId::new([1u8; 20])
    }

    #[test]
    fn test_commit_applies_staged_changes() {
        let mut ctx = PoolContext::new(owner());

        let changes = {
            let mut tx = ctx.begin();
            tx.credit_stake(alice(), U256::from(10)).unwrap();
            tx.receive_funds(U256::from(10)).unwrap();
            assert_eq!(tx.total_eth_staked(), U256::from(10));
            tx.into_changes()
        };
        // Nothing visible before commit
        assert_eq!(ctx.ledger().get(&alice()), U256::zero());

        ctx.commit(changes);
        assert_eq!(ctx.ledger().get(&alice()), U256::from(10));
        assert_eq!(ctx.state().pool_balance, U256::from(10));
    }

    #[test]
    fn test_dropped_changes_leave_context_untouched() {
        let ctx = PoolContext::new(owner());
        let before = ctx.clone();

        let mut tx = ctx.begin();
        tx.credit_stake(alice(), U256::from(10)).unwrap();
        tx.state_mut().gate.mark_full();
        drop(tx.into_changes());

        assert_eq!(ctx, before);
    }

    #[test]
    fn test_release_funds_shortfall() {
        let ctx = PoolContext::new(owner());
        let mut tx = ctx.begin();

        let err = tx
            .release_funds(U256::from(1), StakingError::InsufficientPoolBalance)
            .unwrap_err();
        assert_eq!(err, StakingError::InsufficientPoolBalance);
        assert!(tx.state().pool_balance.is_zero());
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let mut ctx = PoolContext::new(owner());
        for id in [3u8, 1, 2] {
            let changes = {
                let mut tx = ctx.begin();
                tx.credit_stake(AccountId::new([id; 20]), U256::from(id)).unwrap();
                tx.into_changes()
            };
            ctx.commit(changes);
        }

        let snapshot = ctx.snapshot();
        let ids: Vec<u8> = snapshot.balances.iter().map(|(id, _)| id.0[0]).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(snapshot.total_eth_staked, U256::from(6));
        assert_eq!(snapshot.admission, Admission::Open);
    }
}
