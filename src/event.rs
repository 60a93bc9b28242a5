//! Event sink (spec.md C8, §4.8, §6).
//!
//! Grounded on `examples/near-intents/escrow/src/event.rs`'s
//! `Event` enum + per-variant payload struct + `emit()`-trait idiom. The
//! teacher's own on-chain programs only emit unstructured `msg!` log
//! strings, so this structured-event shape is an enrichment adopted from
//! the wider pack rather than ported from the teacher. Records are
//! structural and copy-only: no object references outlive the call that
//! produces them (spec.md §4.8).

use serde::{Deserialize, Serialize};

use crate::host::{Address, Id};
use crate::timelocks::Timelocks;
use crate::u256::U256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletCreated {
    pub wallet_id: Id,
    pub order_hash: [u8; 32],
    pub salt: U256,
    pub maker: Address,
    pub maker_asset: String,
    pub taker_asset: String,
    pub making_amount: u64,
    pub taking_amount: u64,
    pub duration: u64,
    pub hashlock: [u8; 32],
    pub timelocks: Timelocks,
    pub src_safety_deposit_amount: u64,
    pub dst_safety_deposit_amount: u64,
    pub allow_partial_fills: bool,
    pub parts_amount: u8,
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowCreated {
    pub escrow_id: Id,
    pub order_hash: [u8; 32],
    pub hashlock: [u8; 32],
    pub maker: Address,
    pub taker: Address,
    pub amount: u64,
    pub safety_deposit: u64,
    pub created_at: u64,
    pub last_used_index: u8,
    pub is_src: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowWithdrawn {
    pub escrow_id: Id,
    pub order_hash: [u8; 32],
    pub hashlock: [u8; 32],
    pub secret: Vec<u8>,
    pub withdrawn_by: Address,
    pub maker: Address,
    pub taker: Address,
    pub amount: u64,
    pub withdrawn_at: u64,
    pub is_src: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowCancelled {
    pub escrow_id: Id,
    pub order_hash: [u8; 32],
    pub maker: Address,
    pub taker: Address,
    pub cancelled_by: Address,
    pub amount: u64,
    pub cancelled_at: u64,
    pub is_src: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRescued {
    pub wallet_id: Id,
    pub order_hash: [u8; 32],
    pub maker: Address,
    pub rescued_by: Address,
    pub amount: u64,
    pub rescued_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowType {
    Source,
    Destination,
}

impl EscrowType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Destination => "destination",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRescued {
    pub escrow_id: Id,
    pub order_hash: [u8; 32],
    pub hashlock: [u8; 32],
    pub maker: Address,
    pub taker: Address,
    pub rescued_by: Address,
    pub amount: u64,
    pub rescued_at: u64,
    pub escrow_type: EscrowType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    WalletCreated(WalletCreated),
    EscrowCreated(EscrowCreated),
    EscrowWithdrawn(EscrowWithdrawn),
    EscrowCancelled(EscrowCancelled),
    WalletRescued(WalletRescued),
    EscrowRescued(EscrowRescued),
}

/// The sole channel by which off-chain orchestration observes progress
/// (spec.md §4.8). Events are emitted only on success; a failed transaction
/// emits nothing (spec.md §7).
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// An `EventSink` that discards every record. Useful for callers that only
/// care about the resulting state, not the event stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&mut self, _event: Event) {}
}

/// An in-memory `EventSink` that appends every record, for tests and
/// light-weight hosts (SPEC_FULL.md §2 test tooling).
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventSink {
    pub events: Vec<Event>,
}

impl EventSink for InMemoryEventSink {
    fn emit(&mut self, event: Event) {
        tracing::debug!(?event, "event emitted");
        self.events.push(event);
    }
}
