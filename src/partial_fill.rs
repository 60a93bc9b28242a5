//! Partial-fill index validator (spec.md C4, §4.4).
//!
//! Grounded on the bucket-index idea in
//! `examples/0xYudhishthra-1prime/.../escrow-factory/src/lib.rs::validate_partial_fill`
//! (cumulative-fill-to-bucket-index mapping with a "filled to completion"
//! special case), but reworked from scratch to match spec.md §4.4's rules
//! exactly — the NEAR example's index arithmetic (`calculated_index + 1`/`+2`
//! offsets, a `remaining_making_amount` countdown) does not match spec.md's
//! sentinel/bucket rules and is not copied verbatim.

use crate::constants::LAST_USED_INDEX_SENTINEL;
use crate::error::{Result, SettlementError};

/// Returns the bucket index `k` that cumulative fill amount `cumulative`
/// falls into, for an order of `making_amount` split into `parts_amount`
/// equal-width buckets plus the reserved 100%-fill bucket `parts_amount`.
pub fn bucket_for(making_amount: u64, parts_amount: u8, cumulative: u64) -> u8 {
    if cumulative == making_amount {
        return parts_amount;
    }
    let n = parts_amount as u128;
    let c = cumulative as u128;
    let s = making_amount as u128;
    // floor(c * n / s), clamped below parts_amount (the exact-100% case is handled above).
    let k = (c * n) / s;
    k.min(n.saturating_sub(1)) as u8
}

/// Validates that `index` is admissible for a fill bringing the cumulative
/// filled amount to `cumulative_filled`, given the wallet's current
/// `last_used_index` (spec.md §4.4). On success the caller must update
/// `last_used_index := index`.
pub fn validate_index(
    making_amount: u64,
    parts_amount: u8,
    last_used_index: u8,
    index: u8,
    cumulative_filled: u64,
) -> Result<()> {
    let n = parts_amount as u128;
    if index as u128 > n {
        return Err(SettlementError::InvalidAmount);
    }
    if last_used_index != LAST_USED_INDEX_SENTINEL && index <= last_used_index {
        return Err(SettlementError::SecretIndexUsed);
    }

    let c = cumulative_filled as u128;
    let s = making_amount as u128;
    let in_bucket = if index as u128 == n {
        c == s
    } else {
        let lower = (index as u128 * s) / n;
        let upper = ((index as u128 + 1) * s) / n;
        lower <= c && c < upper
    };

    if in_bucket {
        Ok(())
    } else {
        Err(SettlementError::InvalidAmount)
    }
}
