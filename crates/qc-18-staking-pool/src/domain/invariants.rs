//! # Domain Invariants
//!
//! Checks that MUST hold at every quiescent point of the pool.
//!
//! - INVARIANT-1: Ledger Sum (balances sum to `total_eth_staked`)
//! - INVARIANT-2: Capacity Bound (total within capacity + margin while Open)
//! - INVARIANT-3: Zero-Balance Reward (an empty account is owed nothing)
//!
//! INVARIANT-1 only holds while no claim has been made: the claim path
//! debits the account but keeps the pool total, so afterwards the total
//! exceeds the sum by the claimed principal. [`check_ledger_covers_balances`]
//! is the weaker form that always holds.

use crate::domain::gate::Admission;
use crate::domain::ledger::AccountLedger;
use crate::domain::transaction::PoolContext;
use crate::domain::value_objects::{AccountId, U256};

/// INVARIANT-1: `sum(balances) == total_eth_staked`.
#[must_use]
pub fn check_ledger_sum_invariant(ledger: &AccountLedger) -> bool {
    ledger.sum() == Some(ledger.total_eth_staked())
}

/// `sum(balances) <= total_eth_staked`, which survives claims.
#[must_use]
pub fn check_ledger_covers_balances(ledger: &AccountLedger) -> bool {
    ledger
        .sum()
        .is_some_and(|sum| sum <= ledger.total_eth_staked())
}

/// INVARIANT-2: `total_eth_staked <= limit` while the pool is Open.
#[must_use]
pub fn check_capacity_invariant(ctx: &PoolContext, limit: U256) -> bool {
    match ctx.state().gate.admission() {
        Admission::Open => ctx.ledger().total_eth_staked() <= limit,
        Admission::Full => true,
    }
}

/// INVARIANT-3: `reward_of(account) == 0` when its balance is zero.
#[must_use]
pub fn check_zero_balance_reward(ctx: &PoolContext, account: &AccountId) -> bool {
    if !ctx.ledger().get(account).is_zero() {
        return true;
    }
    ctx.accountant()
        .reward_of(account)
        .is_ok_and(|reward| reward.is_zero())
}

/// A broken invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Balances do not sum to the pool total.
    LedgerSumMismatch {
        /// Sum of balances, `None` if it overflowed.
        sum: Option<U256>,
        /// Recorded total.
        total: U256,
    },
    /// Pool total is past the admission limit while Open.
    CapacityExceeded {
        /// Recorded total.
        total: U256,
        /// Capacity plus margin.
        limit: U256,
    },
}

/// Check the invariants that hold before any claim.
#[must_use]
pub fn check_all_invariants(ctx: &PoolContext, limit: U256) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if !check_ledger_sum_invariant(ctx.ledger()) {
        violations.push(InvariantViolation::LedgerSumMismatch {
            sum: ctx.ledger().sum(),
            total: ctx.ledger().total_eth_staked(),
        });
    }

    if !check_capacity_invariant(ctx, limit) {
        violations.push(InvariantViolation::CapacityExceeded {
            total: ctx.ledger().total_eth_staked(),
            limit,
        });
    }

    violations
}

// =============================================================================
// TESTS
// =============================================================================
