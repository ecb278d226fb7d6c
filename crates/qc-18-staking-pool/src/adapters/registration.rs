//! # Registration Authority Adapter
//!
//! In-memory registration authority. Production hosts would forward the
//! deposit to the chain's deposit contract instead.

use crate::domain::entities::CollateralRecord;
use crate::domain::errors::RegistrationError;
use crate::domain::value_objects::U256;
use crate::ports::outbound::RegistrationAuthority;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A deposit accepted by [`InMemoryRegistrationAuthority`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedDeposit {
    /// Amount received.
    pub amount: U256,
    /// Record received.
    pub record: CollateralRecord,
}

/// Accepts every deposit unless told to reject.
#[derive(Debug, Default)]
pub struct InMemoryRegistrationAuthority {
    deposits: Mutex<Vec<RecordedDeposit>>,
    reject: AtomicBool,
}

impl InMemoryRegistrationAuthority {
    /// Create an authority that accepts deposits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject (or stop rejecting) subsequent deposits.
    pub fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Every accepted deposit, oldest first.
    #[must_use]
    pub fn deposits(&self) -> Vec<RecordedDeposit> {
        self.deposits.lock().clone()
    }
}

impl RegistrationAuthority for InMemoryRegistrationAuthority {
    fn deposit(&self, amount: U256, record: &CollateralRecord) -> Result<(), RegistrationError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(RegistrationError::Rejected(
                "authority configured to reject".to_string(),
            ));
        }
        self.deposits.lock().push(RecordedDeposit {
            amount,
            record: record.clone(),
        });
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Bytes, Hash};

    fn record() -> CollateralRecord {
        CollateralRecord {
            identity_key: Bytes::from_slice(&[1; 48]),
            credential: Bytes::from_slice(&[2; 32]),
            signature: Bytes::from_slice(&[3; 96]),
            integrity_root: Hash::new([4; 32]),
        }
    }

    #[test]
    fn test_records_deposits() {
        let authority = InMemoryRegistrationAuthority::new();
        authority.deposit(U256::from(32), &record()).unwrap();

        let deposits = authority.deposits();
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].amount, U256::from(32));
        assert_eq!(deposits[0].record, record());
    }

    #[test]
    fn test_rejecting_records_nothing() {
        let authority = InMemoryRegistrationAuthority::new();
        authority.set_rejecting(true);

        assert!(authority.deposit(U256::from(32), &record()).is_err());
        assert!(authority.deposits().is_empty());

        authority.set_rejecting(false);
        assert!(authority.deposit(U256::from(32), &record()).is_ok());
    }
}
