//! Timelocks & stage machine (spec.md C2, §4.2).
//!
//! Grounded on the teacher's `common::timelocks::{Timelocks, Stage}` (a
//! packed `U256` bitfield of relative offsets, one stage per 32-bit field)
//! and `common::escrow::EscrowBase`'s `withdrawal_start`/
//! `public_withdrawal_start`/`cancellation_start`/`rescue_start` accessor
//! shape. The packed-bitfield storage was a Solana account-size
//! optimization with no purpose once the core is host-abstracted, so this
//! is a plain seven-field record instead (spec.md §3's data model), but the
//! "offsets relative to `created_at`, summed on read" idiom is preserved.

use crate::config::EngineConfig;
use crate::error::{Result, SettlementError};

/// Seven relative offsets, in milliseconds, anchored to an object's `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Timelocks {
    pub src_withdrawal: u64,
    pub src_public_withdrawal: u64,
    pub src_cancellation: u64,
    pub src_public_cancellation: u64,
    pub dst_withdrawal: u64,
    pub dst_public_withdrawal: u64,
    pub dst_cancellation: u64,
}

/// A discrete window in `[created_at, ∞)`, derived from the offsets above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FinalityLock,
    ResolverExclusiveWithdraw,
    PublicWithdraw,
    ResolverExclusiveCancel,
    PublicCancel,
    Rescue,
}

impl Stage {
    pub const fn code(self) -> u8 {
        match self {
            Self::FinalityLock => crate::constants::stage::FINALITY_LOCK,
            Self::ResolverExclusiveWithdraw => crate::constants::stage::RESOLVER_EXCLUSIVE_WITHDRAW,
            Self::PublicWithdraw => crate::constants::stage::PUBLIC_WITHDRAW,
            Self::ResolverExclusiveCancel => crate::constants::stage::RESOLVER_EXCLUSIVE_CANCEL,
            Self::PublicCancel => crate::constants::stage::PUBLIC_CANCEL,
            Self::Rescue => crate::constants::stage::RESCUE,
        }
    }
}

impl Timelocks {
    /// Validates the monotonicity and cross-chain ordering rules of
    /// spec.md §4.2. All seven offsets must be strictly positive.
    pub fn validate(&self) -> Result<()> {
        let all_positive = self.src_withdrawal > 0
            && self.src_public_withdrawal > 0
            && self.src_cancellation > 0
            && self.src_public_cancellation > 0
            && self.dst_withdrawal > 0
            && self.dst_public_withdrawal > 0
            && self.dst_cancellation > 0;

        let src_monotone = self.src_withdrawal < self.src_public_withdrawal
            && self.src_public_withdrawal < self.src_cancellation
            && self.src_cancellation < self.src_public_cancellation;

        let dst_monotone =
            self.dst_withdrawal < self.dst_public_withdrawal && self.dst_public_withdrawal < self.dst_cancellation;

        let cross_chain_order = self.dst_withdrawal < self.src_withdrawal
            && self.dst_public_withdrawal < self.src_public_withdrawal
            && self.dst_cancellation < self.src_cancellation;

        if all_positive && src_monotone && dst_monotone && cross_chain_order {
            Ok(())
        } else {
            Err(SettlementError::InvalidTimelock)
        }
    }

    /// Source-chain stage for an object created at `created_at`, observed at `now`.
    pub fn src_stage(&self, created_at: u64, now: u64) -> Stage {
        let t = now.saturating_sub(created_at);
        if t < self.src_withdrawal {
            Stage::FinalityLock
        } else if t < self.src_public_withdrawal {
            Stage::ResolverExclusiveWithdraw
        } else if t < self.src_cancellation {
            Stage::PublicWithdraw
        } else if t < self.src_public_cancellation {
            Stage::ResolverExclusiveCancel
        } else {
            Stage::PublicCancel
        }
    }

    /// Destination-chain stage. There is no public-cancel window on the
    /// destination side (spec.md §9: this asymmetry is intentional —
    /// destination cancels should not be adversarial) — past
    /// `dst_cancellation` the object simply remains resolver-exclusive
    /// cancellable forever.
    pub fn dst_stage(&self, created_at: u64, now: u64) -> Stage {
        let t = now.saturating_sub(created_at);
        if t < self.dst_withdrawal {
            Stage::FinalityLock
        } else if t < self.dst_public_withdrawal {
            Stage::ResolverExclusiveWithdraw
        } else if t < self.dst_cancellation {
            Stage::PublicWithdraw
        } else {
            Stage::ResolverExclusiveCancel
        }
    }

    /// The timestamp at or past which the rescue path becomes reachable,
    /// regardless of the object's current status (spec.md §4.2, §9).
    pub fn rescue_stage(&self, created_at: u64, is_src: bool, config: &EngineConfig) -> u64 {
        let last_cancellation_offset = if is_src {
            self.src_public_cancellation
        } else {
            self.dst_cancellation
        };
        created_at + last_cancellation_offset + config.rescue_delay_ms
    }

    pub fn is_rescuable(&self, created_at: u64, is_src: bool, now: u64, config: &EngineConfig) -> bool {
        now >= self.rescue_stage(created_at, is_src, config)
    }
}
