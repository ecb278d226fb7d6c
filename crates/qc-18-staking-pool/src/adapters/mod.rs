//! # Adapters Layer (Outer Hexagon)
//!
//! In-process implementations of the driven ports.
//!
//! - `InMemoryRegistrationAuthority`, `InMemoryPayoutSink`: record calls and
//!   can be told to fail, for hosts without a real chain and for tests
//! - `BroadcastEventBus`: fan-out of audit events over `tokio::sync::broadcast`
//! - `RecordingEventPublisher`: keeps every event in order

pub mod event_bus;
pub mod payout;
pub mod registration;

pub use event_bus::*;
pub use payout::*;
pub use registration::*;
