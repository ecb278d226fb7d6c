//! # Domain Entities
//!
//! Pool-wide state, the forwarded collateral record, and read snapshots.

use crate::domain::gate::{Activity, Admission, PoolGate};
use crate::domain::value_objects::{AccountId, Bytes, Hash, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// POOL STATE
// =============================================================================

/// Process-wide pool state, apart from the ledger.
///
/// `total_eth_staked` lives on the [`AccountLedger`](crate::domain::AccountLedger)
/// so that it is always written together with the balance it tracks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Privileged identity.
    pub owner: AccountId,
    /// Sum of every unsolicited transfer ever received.
    pub total_rewards_received: U256,
    /// Native currency currently held by the pool.
    pub pool_balance: U256,
    /// Admission flags.
    pub gate: PoolGate,
}

impl PoolState {
    /// Fresh state owned by `owner`.
    #[must_use]
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            total_rewards_received: U256::zero(),
            pool_balance: U256::zero(),
            gate: PoolGate::new(),
        }
    }

    /// Returns true if `caller` is the owner.
    #[must_use]
    pub fn is_owner(&self, caller: &AccountId) -> bool {
        self.owner == *caller
    }
}

// =============================================================================
// COLLATERAL RECORD
// =============================================================================

/// Opaque deposit data sent to the registration authority.
///
/// The pool never inspects these fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralRecord {
    /// Validator public key.
    pub identity_key: Bytes,
    /// Withdrawal credential.
    pub credential: Bytes,
    /// Deposit signature.
    pub signature: Bytes,
    /// Deposit data root.
    pub integrity_root: Hash,
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Consistent read-only copy of the pool, taken under the pool lock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Privileged identity.
    pub owner: AccountId,
    /// Pool-wide staked total.
    pub total_eth_staked: U256,
    /// Sum of received surplus.
    pub total_rewards_received: U256,
    /// Native currency held.
    pub pool_balance: U256,
    /// Paused or active.
    pub activity: Activity,
    /// Open or full.
    pub admission: Admission,
    /// Claims enabled.
    pub rewards_on: bool,
    /// Every ledger entry, sorted by account.
    pub balances: Vec<(AccountId, U256)>,
}

impl PoolSnapshot {
    /// Balance of `account` in this snapshot.
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> U256 {
        self.balances
            .binary_search_by(|(id, _)| id.cmp(account))
            .map(|idx| self.balances[idx].1)
            .unwrap_or_default()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let owner = AccountId::new([9u8; 20]);
        let state = PoolState::new(owner);

        assert!(state.is_owner(&owner));
        assert!(!state.is_owner(&AccountId::ZERO));
        assert!(state.pool_balance.is_zero());
        assert!(!state.gate.rewards_on());
    }

    #[test]
    fn test_snapshot_balance_lookup() {
        let a = AccountId::new([1u8; 20]);
        let b = AccountId::new([2u8; 20]);
        let snapshot = PoolSnapshot {
            owner: AccountId::ZERO,
            total_eth_staked: U256::from(3),
            total_rewards_received: U256::zero(),
            pool_balance: U256::from(3),
            activity: Activity::Active,
            admission: Admission::Open,
            rewards_on: false,
            balances: vec![(a, U256::from(1)), (b, U256::from(2))],
        };

        assert_eq!(snapshot.balance_of(&b), U256::from(2));
        assert_eq!(snapshot.balance_of(&AccountId::ZERO), U256::zero());
    }
}
