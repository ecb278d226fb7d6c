//! # Error Types
//!
//! Every failure aborts the whole operation with no partial state mutation.
//! There is no retry logic in the core; retries belong to the caller.

use crate::domain::value_objects::U256;
use thiserror::Error;

// =============================================================================
// STAKING ERRORS
// =============================================================================

/// Errors surfaced by pool operations.
///
/// Each variant is a stable kind integrators can match on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakingError {
    /// Privileged operation invoked by a non-owner.
    #[error("unauthorized: caller is not the pool owner")]
    Unauthorized,

    /// Pool is paused.
    #[error("pool is paused")]
    PoolPaused,

    /// Pool is not paused (unpause on an active pool).
    #[error("pool is not paused")]
    PoolNotPaused,

    /// Pool is full; admission is closed.
    #[error("pool is full")]
    PoolFull,

    /// Pool is not full (re-open on an open pool).
    #[error("pool is not full")]
    PoolNotFull,

    /// Amount is zero.
    #[error("invalid amount: must be greater than zero")]
    InvalidAmount,

    /// Stake would push the pool past capacity plus margin.
    #[error("capacity exceeded: total would reach {requested}, limit is {limit}")]
    CapacityExceeded {
        /// Pool total after the rejected stake.
        requested: U256,
        /// Capacity plus margin.
        limit: U256,
    },

    /// Account balance is smaller than the requested amount.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Rewards have not been turned on.
    #[error("rewards are disabled")]
    RewardsDisabled,

    /// Pool does not hold enough collateral to forward.
    #[error("insufficient pool balance for forwarding")]
    InsufficientPoolBalance,

    /// Native payout transfer failed.
    #[error("payout failed: {0}")]
    PayoutFailed(String),

    /// External registration authority rejected the deposit.
    #[error("registration failed: {0}")]
    RegistrationFailed(String),

    /// Arithmetic would overflow.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

/// Coarse classification of a [`StakingError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Pool state currently forbids the call; may succeed later.
    Retryable,
    /// The caller supplied something invalid.
    Caller,
    /// Something outside the caller's control failed.
    Systemic,
}

impl StakingError {
    /// Classifies the error for integrators.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::PoolPaused | Self::PoolNotPaused | Self::PoolFull | Self::PoolNotFull => {
                ErrorClass::Retryable
            }
            Self::Unauthorized
            | Self::InvalidAmount
            | Self::CapacityExceeded { .. }
            | Self::InsufficientBalance
            | Self::RewardsDisabled
            | Self::InsufficientPoolBalance => ErrorClass::Caller,
            Self::PayoutFailed(_) | Self::RegistrationFailed(_) | Self::ArithmeticOverflow => {
                ErrorClass::Systemic
            }
        }
    }

    /// Returns true if retrying later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Retryable
    }
}

// =============================================================================
// PORT ERRORS
// =============================================================================

/// Errors from the native payout port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayoutError {
    /// The recipient refused the transfer.
    #[error("recipient rejected transfer")]
    Rejected,

    /// The pool cannot fund the transfer.
    #[error("insufficient liquidity: required {required}, available {available}")]
    InsufficientLiquidity {
        /// Amount requested.
        required: U256,
        /// Amount held.
        available: U256,
    },

    /// Other transfer failure.
    #[error("transfer error: {0}")]
    Other(String),
}

impl From<PayoutError> for StakingError {
    fn from(err: PayoutError) -> Self {
        StakingError::PayoutFailed(err.to_string())
    }
}

/// Errors from the external registration authority.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The authority rejected the deposit.
    #[error("deposit rejected: {0}")]
    Rejected(String),

    /// The authority could not be reached.
    #[error("registration authority unavailable")]
    Unavailable,
}

impl From<RegistrationError> for StakingError {
    fn from(err: RegistrationError) -> Self {
        StakingError::RegistrationFailed(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
