//! # Driving Ports (API - Inbound)
//!
//! The pool's public surface. Privileged operations take the caller and
//! fail with `Unauthorized` unless it is the owner.

use crate::domain::entities::{CollateralRecord, PoolSnapshot};
use crate::domain::errors::StakingError;
use crate::domain::value_objects::{AccountId, U256};

/// Primary staking pool API.
///
/// Every method is one serialized transaction: it either commits fully or
/// leaves the pool unchanged.
pub trait StakingPoolApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Public operations
    // -------------------------------------------------------------------------

    /// Stake `amount` (the value attached to the call) for `caller`.
    ///
    /// Requires Active/Open, `amount > 0`, and the new pool total within
    /// capacity plus margin.
    fn stake(&self, caller: AccountId, amount: U256) -> Result<(), StakingError>;

    /// Withdraw `amount` of stake while the pool is Active/Open.
    fn withdraw(&self, caller: AccountId, amount: U256) -> Result<(), StakingError>;

    /// Withdraw `amount` of stake plus the proportional reward.
    ///
    /// Returns the reward paid on top of the principal.
    fn claim(&self, caller: AccountId, amount: U256) -> Result<U256, StakingError>;

    /// Accept an unsolicited transfer as reward surplus. Always open.
    fn receive_rewards(&self, from: AccountId, amount: U256) -> Result<(), StakingError>;

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Staked balance of `account`.
    fn stake_of(&self, account: &AccountId) -> U256;

    /// Rewards attributable to `account`.
    fn reward_of(&self, account: &AccountId) -> Result<U256, StakingError>;

    /// Fixed-point (10^18) share of the pool held by `account`.
    fn share_of(&self, account: &AccountId) -> Result<U256, StakingError>;

    /// Sum of staked balances as tracked by the pool.
    fn total_staked(&self) -> U256;

    /// Cumulative surplus received.
    fn total_rewards_received(&self) -> U256;

    /// Native currency currently held.
    fn pool_balance(&self) -> U256;

    /// Consistent copy of the whole pool.
    fn snapshot(&self) -> PoolSnapshot;

    // -------------------------------------------------------------------------
    // Privileged operations
    // -------------------------------------------------------------------------

    /// Active → Paused.
    fn pause(&self, caller: AccountId) -> Result<(), StakingError>;

    /// Paused → Active.
    fn unpause(&self, caller: AccountId) -> Result<(), StakingError>;

    /// Enable claims. One-way.
    fn turn_on_rewards(&self, caller: AccountId) -> Result<(), StakingError>;

    /// Full → Open.
    fn turn_off_pool_full(&self, caller: AccountId) -> Result<(), StakingError>;

    /// Forward the fixed collateral amount to the registration authority
    /// and mark the pool Full.
    fn forward(&self, caller: AccountId, record: CollateralRecord) -> Result<(), StakingError>;

    /// Hand the owner role to `new_owner`.
    fn transfer_ownership(&self, caller: AccountId, new_owner: AccountId)
        -> Result<(), StakingError>;
}
