//! Settlement core for an atomic cross-chain swap escrow protocol.
//!
//! This crate is the self-contained settlement engine described by the
//! protocol: a maker locks funds in a [`wallet::Wallet`], resolvers mint
//! [`escrow::Escrow`] objects against it in a Dutch auction
//! ([`auction`]), a staged timelock machine ([`timelocks`]) governs who
//! may withdraw or cancel and when, and a Merkle-root scheme
//! ([`merkle`]/[`hash`]) binds a fixed set of secrets to partial fills with
//! strictly monotonic index progression ([`partial_fill`]).
//!
//! It is deliberately not a blockchain program. The wire protocol to the
//! destination chain, key management, auction discovery/matchmaking, and
//! the counterparty chain's own escrow implementation are external
//! collaborators named only by the [`host`] trait interfaces. A real chain
//! integration supplies concrete bindings and wires them into this core.

pub mod auction;
pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod escrow;
pub mod event;
pub mod hash;
pub mod host;
pub mod merkle;
pub mod partial_fill;
#[cfg(feature = "test-util")]
pub mod test_host;
pub mod timelocks;
pub mod u256;
pub mod wallet;

pub use config::EngineConfig;
pub use error::{Result, SettlementError};
pub use escrow::{Escrow, Immutables, Status};
pub use event::{Event, EventSink};
pub use host::{Address, Balance, Clock, Id, NativeGas, SwapToken, Versioned};
pub use timelocks::{Stage, Timelocks};
pub use wallet::Wallet;
