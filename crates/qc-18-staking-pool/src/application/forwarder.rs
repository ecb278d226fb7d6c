//! # Collateral Forwarder
//!
//! Sends the fixed collateral amount to the registration authority and
//! closes admission.
//!
//! | Step | Failure | Effect |
//! |------|---------|--------|
//! | caller is owner | `Unauthorized` | none |
//! | `pool_balance >= forward_amount` | `InsufficientPoolBalance` | none |
//! | stage Full + debit | | |
//! | `RegistrationAuthority::deposit` | `RegistrationFailed` | staged changes dropped |
//! | commit | | pool Full, balance reduced |

use crate::application::ensure_owner;
use crate::domain::entities::CollateralRecord;
use crate::domain::errors::StakingError;
use crate::domain::transaction::PoolContext;
use crate::domain::value_objects::{AccountId, U256};
use crate::ports::outbound::RegistrationAuthority;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Privileged one-shot forwarding of pooled collateral.
pub struct CollateralForwarder<R: RegistrationAuthority> {
    authority: Arc<R>,
    forward_amount: U256,
}

impl<R: RegistrationAuthority> CollateralForwarder<R> {
    /// Forward `forward_amount` to `authority` on each call.
    pub fn new(authority: Arc<R>, forward_amount: U256) -> Self {
        Self {
            authority,
            forward_amount,
        }
    }

    /// Amount sent per forward.
    #[must_use]
    pub fn forward_amount(&self) -> U256 {
        self.forward_amount
    }

    /// The registration authority.
    #[must_use]
    pub fn authority(&self) -> &Arc<R> {
        &self.authority
    }

    /// Forward collateral and mark the pool Full.
    ///
    /// Allowed while paused and while already Full. The record is passed
    /// through untouched.
    pub fn forward(
        &self,
        ctx: &mut PoolContext,
        caller: &AccountId,
        record: &CollateralRecord,
    ) -> Result<(), StakingError> {
        ensure_owner(ctx.state(), caller, "forward")?;

        let changes = {
            let mut tx = ctx.begin();
            tx.release_funds(self.forward_amount, StakingError::InsufficientPoolBalance)?;
            tx.state_mut().gate.mark_full();
            tx.into_changes()
        };

        warn!(
            credential = ?record.credential,
            "Forwarding without checking the credential is bound to this pool"
        );

        if let Err(e) = self.authority.deposit(self.forward_amount, record) {
            error!(error = %e, amount = %self.forward_amount, "Registration authority rejected deposit");
            return Err(e.into());
        }

        ctx.commit(changes);
        debug_assert!(ctx.state().gate.is_full());

        info!(
            amount = %self.forward_amount,
            integrity_root = ?record.integrity_root,
            pool_balance = %ctx.state().pool_balance,
            "Collateral forwarded, pool marked full"
        );
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
