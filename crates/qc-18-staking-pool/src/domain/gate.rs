//! # Pool Gate
//!
//! Admission-control state machine over `{Active, Paused} × {Open, Full}`,
//! plus the independent one-way `rewards_on` flag.
//!
//! ```text
//!            pause()                     forward()
//!   Active ─────────→ Paused      Open ────────────→ Full
//!          ←─────────                  ←────────────
//!            unpause()                turn_off_pool_full()
//! ```
//!
//! | State | stake / withdraw | claim |
//! |-------|------------------|-------|
//! | Active/Open | allowed | needs `rewards_on` |
//! | Active/Full | `PoolFull` | needs `rewards_on` |
//! | Paused/* | `PoolPaused` | `PoolPaused` |

use crate::domain::errors::StakingError;
use serde::{Deserialize, Serialize};

/// Whether the pool accepts calls at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    /// Public operations allowed.
    Active,
    /// Only owner transitions allowed.
    Paused,
}

/// Whether the pool admits new stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Admission {
    /// Stake and withdraw allowed.
    Open,
    /// Collateral has been forwarded; stake and withdraw blocked.
    Full,
}

/// Gate flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolGate {
    paused: bool,
    pool_full: bool,
    rewards_on: bool,
}

impl PoolGate {
    /// A fresh gate: active, open, rewards off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            paused: false,
            pool_full: false,
            rewards_on: false,
        }
    }

    /// Current activity state.
    #[must_use]
    pub fn activity(&self) -> Activity {
        if self.paused {
            Activity::Paused
        } else {
            Activity::Active
        }
    }

    /// Current admission state.
    #[must_use]
    pub fn admission(&self) -> Admission {
        if self.pool_full {
            Admission::Full
        } else {
            Admission::Open
        }
    }

    /// Returns true if paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns true if full.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.pool_full
    }

    /// Returns true if rewards can be claimed.
    #[must_use]
    pub fn rewards_on(&self) -> bool {
        self.rewards_on
    }

    // -------------------------------------------------------------------------
    // Guards
    // -------------------------------------------------------------------------

    /// Stake and withdraw need Active/Open.
    pub fn ensure_admission_open(&self) -> Result<(), StakingError> {
        if self.paused {
            return Err(StakingError::PoolPaused);
        }
        if self.pool_full {
            return Err(StakingError::PoolFull);
        }
        Ok(())
    }

    /// Claims need Active and `rewards_on`; fullness is irrelevant.
    pub fn ensure_claimable(&self) -> Result<(), StakingError> {
        if self.paused {
            return Err(StakingError::PoolPaused);
        }
        if !self.rewards_on {
            return Err(StakingError::RewardsDisabled);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Active → Paused.
    pub fn pause(&mut self) -> Result<(), StakingError> {
        if self.paused {
            return Err(StakingError::PoolPaused);
        }
        self.paused = true;
        Ok(())
    }

    /// Paused → Active.
    pub fn unpause(&mut self) -> Result<(), StakingError> {
        if !self.paused {
            return Err(StakingError::PoolNotPaused);
        }
        self.paused = false;
        Ok(())
    }

    /// Open → Full. Idempotent.
    pub fn mark_full(&mut self) {
        self.pool_full = true;
    }

    /// Full → Open.
    pub fn turn_off_pool_full(&mut self) -> Result<(), StakingError> {
        if !self.pool_full {
            return Err(StakingError::PoolNotFull);
        }
        self.pool_full = false;
        Ok(())
    }

    /// Enable claims. There is no way back.
    pub fn turn_on_rewards(&mut self) {
        self.rewards_on = true;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_gate_is_active_open() {
        let gate = PoolGate::new();
        assert_eq!(gate.activity(), Activity::Active);
        assert_eq!(gate.admission(), Admission::Open);
        assert!(!gate.rewards_on());
        assert!(gate.ensure_admission_open().is_ok());
    }

    #[test]
    fn test_full_blocks_admission_not_claims() {
        let mut gate = PoolGate::new();
        gate.turn_on_rewards();
        gate.mark_full();

        assert_eq!(gate.ensure_admission_open(), Err(StakingError::PoolFull));
        assert!(gate.ensure_claimable().is_ok());
    }

    #[test]
    fn test_paused_blocks_everything_public() {
        let mut gate = PoolGate::new();
        gate.turn_on_rewards();
        gate.pause().unwrap();

        assert_eq!(gate.ensure_admission_open(), Err(StakingError::PoolPaused));
        assert_eq!(gate.ensure_claimable(), Err(StakingError::PoolPaused));

        // Paused wins over Full
        gate.mark_full();
        assert_eq!(gate.ensure_admission_open(), Err(StakingError::PoolPaused));
    }

    #[test]
    fn test_claims_need_rewards_on() {
        let gate = PoolGate::new();
        assert_eq!(gate.ensure_claimable(), Err(StakingError::RewardsDisabled));
    }

    #[test]
    fn test_pause_unpause_transitions() {
        let mut gate = PoolGate::new();
        assert_eq!(gate.unpause(), Err(StakingError::PoolNotPaused));

        gate.pause().unwrap();
        assert_eq!(gate.pause(), Err(StakingError::PoolPaused));
        assert_eq!(gate.activity(), Activity::Paused);

        gate.unpause().unwrap();
        assert_eq!(gate.activity(), Activity::Active);
    }

    #[test]
    fn test_full_open_transitions() {
        let mut gate = PoolGate::new();
        assert_eq!(gate.turn_off_pool_full(), Err(StakingError::PoolNotFull));

        gate.mark_full();
        gate.mark_full();
        assert_eq!(gate.admission(), Admission::Full);

        gate.turn_off_pool_full().unwrap();
        assert_eq!(gate.admission(), Admission::Open);
    }
}
