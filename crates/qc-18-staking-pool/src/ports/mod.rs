//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the staking pool.
//!
//! - **Driving Ports (Inbound)**: `StakingPoolApi`
//! - **Driven Ports (Outbound)**: `RegistrationAuthority`, `PayoutSink`, `EventPublisher`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
