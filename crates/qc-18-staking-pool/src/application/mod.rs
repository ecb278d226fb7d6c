//! # Application Layer
//!
//! - `StakingPoolService`: owns the pool context and serializes every operation
//! - `CollateralForwarder`: privileged forwarding to the registration authority

pub mod forwarder;
pub mod service;

pub use forwarder::CollateralForwarder;
pub use service::{create_test_service, ServiceStats, StakingPoolService, TestService};

use crate::domain::entities::PoolState;
use crate::domain::errors::StakingError;
use crate::domain::value_objects::AccountId;
use tracing::warn;

/// Reject privileged calls from anyone but the owner.
pub(crate) fn ensure_owner(
    state: &PoolState,
    caller: &AccountId,
    operation: &'static str,
) -> Result<(), StakingError> {
    if state.is_owner(caller) {
        Ok(())
    } else {
        warn!(operation, caller = %caller, "Unauthorized privileged call");
        Err(StakingError::Unauthorized)
    }
}
