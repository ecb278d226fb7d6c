//! # Domain Layer (Inner Hexagon)
//!
//! Pure bookkeeping for the staking pool.
//! NO I/O, NO locking, NO external calls.

pub mod entities;
pub mod errors;
pub mod gate;
pub mod invariants;
pub mod ledger;
pub mod rewards;
pub mod transaction;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use gate::*;
pub use invariants::*;
pub use ledger::*;
pub use rewards::*;
pub use transaction::*;
pub use value_objects::*;
