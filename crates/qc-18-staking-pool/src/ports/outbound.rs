//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the pool calls into. Every call is synchronous: the pool lock
//! is held across it, and a failure rolls back whatever the operation staged.

use crate::domain::entities::CollateralRecord;
use crate::domain::errors::{PayoutError, RegistrationError};
use crate::domain::value_objects::{AccountId, U256};
use crate::events::EventEnvelope;

// =============================================================================
// REGISTRATION AUTHORITY
// =============================================================================

/// External validator-registration authority.
///
/// Accepts a fixed collateral amount plus four opaque blobs and either
/// succeeds or fails atomically. Its own validation is out of scope.
///
/// Called with the pool lock held. Implementations must not call back into
/// the pool; a re-entrant call deadlocks.
pub trait RegistrationAuthority: Send + Sync {
    /// Deposit `amount` with the given record.
    fn deposit(&self, amount: U256, record: &CollateralRecord) -> Result<(), RegistrationError>;
}

// =============================================================================
// PAYOUT SINK
// =============================================================================

/// Native-currency transfer out of the pool.
///
/// Used by `withdraw` and `claim`.
///
/// Called with the pool lock held. Implementations must not call back into
/// the pool; a re-entrant call deadlocks.
pub trait PayoutSink: Send + Sync {
    /// Send `amount` to `to`.
    fn transfer(&self, to: AccountId, amount: U256) -> Result<(), PayoutError>;
}

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Sink for audit events.
///
/// Publication happens after commit and cannot fail the operation. It runs
/// under the pool lock so sequence numbers follow commit order; publishers
/// must not call back into the pool.
pub trait EventPublisher: Send + Sync {
    /// Publish an event. Returns the number of receivers reached.
    fn publish(&self, envelope: EventEnvelope) -> usize;
}

// =============================================================================
// TESTS
// =============================================================================
