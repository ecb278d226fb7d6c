//! # QC-18 Staking Pool - Pooled Staking Ledger Subsystem
//!
//! **Subsystem ID:** 18
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Lets many accounts pool native currency until the pool holds the fixed
//! collateral one validator registration needs, forwards that collateral to
//! the registration authority, and later distributes surplus sent back to the
//! pool in proportion to each account's share.
//!
//! ## Pool States
//!
//! | Activity | Admission | stake / withdraw | claim |
//! |----------|-----------|------------------|-------|
//! | Active | Open | allowed | if rewards on |
//! | Active | Full | `PoolFull` | if rewards on |
//! | Paused | any | `PoolPaused` | `PoolPaused` |
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Ledger sum equals pool total (absent claims) | `domain/invariants.rs` - `check_ledger_sum_invariant()` |
//! | Pool total within capacity plus margin while Open | `application/service.rs` - `stake()` |
//! | Zero balance earns zero reward | `domain/rewards.rs` - `reward_of()` |
//! | Failed external call leaves no trace | `domain/transaction.rs` - `StagedChanges` |
//! | Privileged calls from the owner only | `application/mod.rs` - `ensure_owner()` |
//!
//! ## Fixed-Point Rewards
//!
//! | Quantity | Formula |
//! |----------|---------|
//! | share | `balance * 10^18 / total_eth_staked` |
//! | reward | `total_rewards_received * share / 10^18` |
//! | claim rewards | `reward * (amount * 10^18 / balance) / 10^18` |
//!
//! Every division truncates. A claim debits the account balance only; the
//! pool total keeps counting claimed principal.
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `RegistrationAuthority` | Receives forwarded collateral |
//! | `PayoutSink` | Native transfers for withdraw and claim |
//! | `EventPublisher` | Audit events after commit |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_18_staking_pool::prelude::*;
//!
//! let service = create_test_service(owner)?;
//! service.stake(alice, units(16))?;
//! service.stake(bob, units(16))?;
//! service.forward(owner, record)?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod telemetry;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{CollateralRecord, PoolSnapshot, PoolState};
    pub use crate::domain::errors::{
        ErrorClass, PayoutError, RegistrationError, StakingError,
    };
    pub use crate::domain::gate::{Activity, Admission, PoolGate};
    pub use crate::domain::invariants::{check_all_invariants, InvariantViolation};
    pub use crate::domain::ledger::AccountLedger;
    pub use crate::domain::rewards::{ClaimQuote, RewardAccountant, PRECISION};
    pub use crate::domain::transaction::PoolContext;
    pub use crate::domain::value_objects::{
        milli_units, units, AccountId, Bytes, Hash, BASE_UNITS_PER_UNIT, U256,
    };

    // Ports
    pub use crate::ports::inbound::StakingPoolApi;
    pub use crate::ports::outbound::{EventPublisher, PayoutSink, RegistrationAuthority};

    // Events
    pub use crate::events::{EventEnvelope, PoolEvent};

    // Adapters
    pub use crate::adapters::{
        BroadcastEventBus, InMemoryPayoutSink, InMemoryRegistrationAuthority,
        RecordingEventPublisher,
    };

    // Service
    pub use crate::application::{
        create_test_service, CollateralForwarder, ServiceStats, StakingPoolService, TestService,
    };

    // Configuration
    pub use crate::config::{ConfigError, PoolConfig};
    pub use crate::telemetry::{init_logging, LogConfig};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 18;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Staking Pool";

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_id() {
        assert_eq!(SUBSYSTEM_ID, 18);
    }

    #[test]
    fn test_prelude_exports() {
        use prelude::*;
        let _ = PoolConfig::default();
        let _ = AccountId::ZERO;
        assert_eq!(PRECISION, BASE_UNITS_PER_UNIT);
    }
}
