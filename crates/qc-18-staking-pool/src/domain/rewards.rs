//! # Reward Accountant
//!
//! Proportional share and reward computation over the ledger.
//!
//! All ratios are fixed-point with scale [`PRECISION`] (10^18) and every
//! division truncates toward zero. The three derived values compose:
//!
//! ```text
//! share_of(a)  = balance(a) * P / total_eth_staked
//! reward_of(a) = total_rewards_received * share_of(a) / P
//! claim(a, x)  = reward_of(a) * (x * P / balance(a)) / P
//! ```
//!
//! Truncation compounds across the chain, so some received rewards are never
//! paid out. That residue stays in the pool.

use crate::domain::errors::StakingError;
use crate::domain::ledger::AccountLedger;
use crate::domain::value_objects::{AccountId, U256};

/// Fixed-point scale for share ratios.
pub const PRECISION: u64 = 1_000_000_000_000_000_000;

fn precision() -> U256 {
    U256::from(PRECISION)
}

/// `balance * P / total`, truncated. Zero when either side is zero.
pub fn share_of(balance: U256, total_eth_staked: U256) -> Result<U256, StakingError> {
    if balance.is_zero() || total_eth_staked.is_zero() {
        return Ok(U256::zero());
    }
    let scaled = balance
        .checked_mul(precision())
        .ok_or(StakingError::ArithmeticOverflow)?;
    Ok(scaled / total_eth_staked)
}

/// `total_rewards * share_of / P`, truncated. Zero for a zero balance.
pub fn reward_of(
    balance: U256,
    total_eth_staked: U256,
    total_rewards_received: U256,
) -> Result<U256, StakingError> {
    if balance.is_zero() {
        return Ok(U256::zero());
    }
    let share = share_of(balance, total_eth_staked)?;
    let scaled = total_rewards_received
        .checked_mul(share)
        .ok_or(StakingError::ArithmeticOverflow)?;
    Ok(scaled / precision())
}

/// Amounts paid out by a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimQuote {
    /// Stake being withdrawn.
    pub principal: U256,
    /// Reward attached to the withdrawn fraction.
    pub rewards: U256,
    /// `principal + rewards`.
    pub payout: U256,
}

/// Price a claim of `amount` out of `balance`.
///
/// The reward is proportional to the fraction of the account's own stake
/// being withdrawn, not a flat per-unit rate.
pub fn quote_claim(
    balance: U256,
    total_eth_staked: U256,
    total_rewards_received: U256,
    amount: U256,
) -> Result<ClaimQuote, StakingError> {
    if amount.is_zero() {
        return Err(StakingError::InvalidAmount);
    }
    if amount > balance {
        return Err(StakingError::InsufficientBalance);
    }

    let reward = reward_of(balance, total_eth_staked, total_rewards_received)?;
    let fraction = amount
        .checked_mul(precision())
        .ok_or(StakingError::ArithmeticOverflow)?
        / balance;
    let rewards = reward
        .checked_mul(fraction)
        .ok_or(StakingError::ArithmeticOverflow)?
        / precision();
    let payout = amount
        .checked_add(rewards)
        .ok_or(StakingError::ArithmeticOverflow)?;

    Ok(ClaimQuote {
        principal: amount,
        rewards,
        payout,
    })
}

/// Read-only view answering share and reward queries against a ledger.
#[derive(Clone, Copy, Debug)]
pub struct RewardAccountant<'a> {
    ledger: &'a AccountLedger,
    total_rewards_received: U256,
}

impl<'a> RewardAccountant<'a> {
    /// Bind to a ledger and the pool's received-rewards total.
    #[must_use]
    pub fn new(ledger: &'a AccountLedger, total_rewards_received: U256) -> Self {
        Self {
            ledger,
            total_rewards_received,
        }
    }

    /// Fixed-point share of the pool held by `account`.
    pub fn share_of(&self, account: &AccountId) -> Result<U256, StakingError> {
        share_of(self.ledger.get(account), self.ledger.total_eth_staked())
    }

    /// Rewards currently attributable to `account`.
    pub fn reward_of(&self, account: &AccountId) -> Result<U256, StakingError> {
        reward_of(
            self.ledger.get(account),
            self.ledger.total_eth_staked(),
            self.total_rewards_received,
        )
    }

    /// Price a claim of `amount` by `account`.
    pub fn quote_claim(&self, account: &AccountId, amount: U256) -> Result<ClaimQuote, StakingError> {
        quote_claim(
            self.ledger.get(account),
            self.ledger.total_eth_staked(),
            self.total_rewards_received,
            amount,
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::units;

    #[test]
    fn test_share_of_half() {
        let share = share_of(units(10), units(20)).unwrap();
        assert_eq!(share, U256::from(PRECISION / 2));
    }

    #[test]
    fn test_share_of_zero_denominator_is_guarded() {
        assert_eq!(share_of(U256::zero(), U256::zero()).unwrap(), U256::zero());
        assert_eq!(share_of(units(1), U256::zero()).unwrap(), U256::zero());
    }

    #[test]
    fn test_reward_of_proportional() {
        // 10 of 20 staked, 2 received -> 1
        let reward = reward_of(units(10), units(20), units(2)).unwrap();
        assert_eq!(reward, units(1));
    }

    #[test]
    fn test_reward_of_zero_balance_short_circuits() {
        assert_eq!(reward_of(U256::zero(), units(20), units(2)).unwrap(), U256::zero());
        assert_eq!(
            reward_of(U256::zero(), U256::zero(), U256::MAX).unwrap(),
            U256::zero()
        );
    }

    #[test]
    fn test_reward_of_truncates() {
        // 1 of 3 base units, 10 received: share = 333..333, reward = 3
        let reward = reward_of(U256::from(1), U256::from(3), U256::from(10)).unwrap();
        assert_eq!(reward, U256::from(3));
    }

    #[test]
    fn test_quote_claim_partial() {
        // Reward of 1 unit, withdrawing half the stake -> half the reward
        let quote = quote_claim(units(10), units(20), units(2), units(5)).unwrap();
        assert_eq!(quote.principal, units(5));
        assert_eq!(quote.rewards, U256::from(PRECISION / 2));
        assert_eq!(quote.payout, units(5) + U256::from(PRECISION / 2));
    }

    #[test]
    fn test_quote_claim_leaves_residue() {
        // Three equal stakers of 1 base unit share 10 base units of reward.
        // Each is owed 3, so 1 base unit is never distributed.
        let total = U256::from(3);
        let rewards = U256::from(10);
        let quote = quote_claim(U256::from(1), total, rewards, U256::from(1)).unwrap();
        assert_eq!(quote.rewards, U256::from(3));

        let paid = quote.rewards * U256::from(3);
        assert_eq!(rewards - paid, U256::from(1));
    }

    #[test]
    fn test_quote_claim_rejects_bad_amounts() {
        assert_eq!(
            quote_claim(units(1), units(1), units(1), U256::zero()),
            Err(StakingError::InvalidAmount)
        );
        assert_eq!(
            quote_claim(units(1), units(1), units(1), units(2)),
            Err(StakingError::InsufficientBalance)
        );
        assert_eq!(
            quote_claim(U256::zero(), U256::zero(), units(1), U256::from(1)),
            Err(StakingError::InsufficientBalance)
        );
    }

    #[test]
    fn test_overflow_fails_loudly() {
        assert_eq!(
            share_of(U256::MAX, U256::MAX),
            Err(StakingError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_accountant_reads_ledger() {
        let alice = AccountId::new([1u8; 20]);
        let bob = AccountId::new([2u8; 20]);
        let mut ledger = AccountLedger::new();
        ledger.credit(alice, units(10)).unwrap();
        ledger.credit(bob, units(10)).unwrap();

        let accountant = RewardAccountant::new(&ledger, units(2));
        assert_eq!(accountant.reward_of(&alice).unwrap(), units(1));
        assert_eq!(accountant.share_of(&bob).unwrap(), U256::from(PRECISION / 2));
        assert_eq!(
            accountant.reward_of(&AccountId::ZERO).unwrap(),
            U256::zero()
        );
    }
}
