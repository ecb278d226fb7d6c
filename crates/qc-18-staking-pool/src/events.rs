//! # Event Schema
//!
//! Audit events emitted by the pool. They are published only after the
//! operation that produced them has committed, and are never consumed by the
//! pool itself.
//!
//! | Event | Emitted by |
//! |-------|------------|
//! | `Stake` | `stake` |
//! | `WithdrawStake` | `withdraw` |
//! | `ClaimRewards` | `claim` |
//! | `RewardsReceived` | `receive_rewards` |
//! | `Paused` / `Unpaused` | `pause` / `unpause` |
//! | `RewardsEnabled` | `turn_on_rewards` |
//! | `PoolReopened` | `turn_off_pool_full` |
//! | `CollateralForwarded` | `forward` |
//! | `OwnershipTransferred` | `transfer_ownership` |

use crate::domain::value_objects::{AccountId, Hash, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Something that happened to the pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    /// An account staked.
    Stake {
        /// Staker.
        account: AccountId,
        /// Amount staked.
        amount: U256,
    },
    /// An account withdrew stake while the pool was open.
    WithdrawStake {
        /// Withdrawer.
        account: AccountId,
        /// Amount withdrawn.
        amount: U256,
    },
    /// An account claimed stake plus its share of rewards.
    ClaimRewards {
        /// Claimer.
        account: AccountId,
        /// Principal withdrawn.
        amount: U256,
        /// Rewards paid on top.
        rewards: U256,
    },
    /// Surplus arrived at the pool.
    RewardsReceived {
        /// Sender.
        from: AccountId,
        /// Amount received.
        amount: U256,
    },
    /// The owner paused the pool.
    Paused {
        /// Caller.
        by: AccountId,
    },
    /// The owner unpaused the pool.
    Unpaused {
        /// Caller.
        by: AccountId,
    },
    /// The owner enabled claims.
    RewardsEnabled,
    /// The owner re-opened admission.
    PoolReopened,
    /// Collateral went to the registration authority.
    CollateralForwarded {
        /// Amount forwarded.
        amount: U256,
        /// Integrity root of the forwarded record.
        integrity_root: Hash,
    },
    /// The owner handed over the pool.
    OwnershipTransferred {
        /// Previous owner.
        previous: AccountId,
        /// New owner.
        new: AccountId,
    },
}

impl PoolEvent {
    /// Short stable name, used as the log/topic key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stake { .. } => "Stake",
            Self::WithdrawStake { .. } => "WithdrawStake",
            Self::ClaimRewards { .. } => "ClaimRewards",
            Self::RewardsReceived { .. } => "RewardsReceived",
            Self::Paused { .. } => "Paused",
            Self::Unpaused { .. } => "Unpaused",
            Self::RewardsEnabled => "RewardsEnabled",
            Self::PoolReopened => "PoolReopened",
            Self::CollateralForwarded { .. } => "CollateralForwarded",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}

/// Event plus delivery metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique id for de-duplication downstream.
    pub event_id: Uuid,
    /// Commit order, starting at 1.
    pub sequence: u64,
    /// The event.
    pub event: PoolEvent,
}

impl EventEnvelope {
    /// Wrap `event` with a fresh id.
    #[must_use]
    pub fn new(sequence: u64, event: PoolEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            sequence,
            event,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
