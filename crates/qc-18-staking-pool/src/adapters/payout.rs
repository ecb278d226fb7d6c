//! # Payout Adapter
//!
//! In-memory native transfer sink. Tracks what each account has been paid.

use crate::domain::errors::PayoutError;
use crate::domain::value_objects::{AccountId, U256};
use crate::ports::outbound::PayoutSink;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Credits every transfer to an in-memory wallet unless the recipient is
/// marked as rejecting.
#[derive(Debug, Default)]
pub struct InMemoryPayoutSink {
    paid: Mutex<HashMap<AccountId, U256>>,
    rejecting: Mutex<HashSet<AccountId>>,
}

impl InMemoryPayoutSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make transfers to `account` fail (or succeed again).
    pub fn set_rejecting(&self, account: AccountId, reject: bool) {
        let mut rejecting = self.rejecting.lock();
        if reject {
            rejecting.insert(account);
        } else {
            rejecting.remove(&account);
        }
    }

    /// Total paid to `account` so far.
    #[must_use]
    pub fn paid_to(&self, account: &AccountId) -> U256 {
        self.paid.lock().get(account).copied().unwrap_or_default()
    }
}

impl PayoutSink for InMemoryPayoutSink {
    fn transfer(&self, to: AccountId, amount: U256) -> Result<(), PayoutError> {
        if self.rejecting.lock().contains(&to) {
            return Err(PayoutError::Rejected);
        }

        let mut paid = self.paid.lock();
        let entry = paid.entry(to).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| PayoutError::Other("recipient balance overflow".to_string()))?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfers_accumulate() {
        let sink = InMemoryPayoutSink::new();
        let alice = AccountId::new([1u8; 20]);

        sink.transfer(alice, U256::from(3)).unwrap();
        sink.transfer(alice, U256::from(4)).unwrap();
        assert_eq!(sink.paid_to(&alice), U256::from(7));
    }

    #[test]
    fn test_rejecting_recipient() {
        let sink = InMemoryPayoutSink::new();
        let alice = AccountId::new([1u8; 20]);
        sink.set_rejecting(alice, true);

        assert_eq!(sink.transfer(alice, U256::one()), Err(PayoutError::Rejected));
        assert!(sink.paid_to(&alice).is_zero());

        sink.set_rejecting(alice, false);
        sink.transfer(alice, U256::one()).unwrap();
        assert_eq!(sink.paid_to(&alice), U256::one());
    }
}
