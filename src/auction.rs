//! Dutch auction calculator (spec.md C3, §4.3).
//!
//! The teacher's `programs/cross-chain-escrow-src/src/auction.rs` supports
//! an arbitrary piecewise-linear rate-bump curve
//! (`AuctionData::points_and_time_deltas`) computed with `muldiv::MulDiv`'s
//! `mul_div_ceil`/`mul_div_floor`. spec.md §4.3 only needs a single linear
//! segment between `(created_at, making_amount)` and
//! `(created_at+duration, taking_amount)`, so the curve shape is simplified
//! away; the ceilDiv/floorDiv-via-`muldiv` idiom is kept for the final
//! scaling step, exactly as the teacher scales `rate_bump` by
//! `BASE_1E5 + rate_bump` over `BASE_1E5`.

use muldiv::MulDiv;

use crate::error::{Result, SettlementError};

/// Clamps `now` into `[created_at, created_at + duration]`.
fn clamp_time(created_at: u64, duration: u64, now: u64) -> u64 {
    now.clamp(created_at, created_at + duration)
}

/// `T(t)`, the current auction-wide taking amount for a full fill
/// (spec.md §4.3: `(S*(t0+d-t) + E*(t-t0)) / d`). The `S*remaining +
/// E*elapsed` numerator is computed in `u128` (it can exceed `u64` range
/// for large orders) and divided down with a ceiling round, matching the
/// `ceilDiv` the design notes require for the taking side.
pub fn current_price(making_amount: u64, taking_amount: u64, created_at: u64, duration: u64, now: u64) -> Result<u64> {
    if duration == 0 {
        return Err(SettlementError::InvalidAmount);
    }
    let t = clamp_time(created_at, duration, now);
    let remaining = (created_at + duration - t) as u128;
    let elapsed = (t - created_at) as u128;
    let numerator = making_amount as u128 * remaining + taking_amount as u128 * elapsed;
    let denominator = duration as u128;
    let price = numerator.div_ceil(denominator);
    u64::try_from(price).map_err(|_| SettlementError::ArithmeticOverflow)
}

/// The minimum `taking_amount` a resolver must submit to fill
/// `requested_making` at time `now` (spec.md §4.3: `ceilDiv(T(t)*m, S)`).
pub fn expected_taking_amount(
    making_amount: u64,
    taking_amount: u64,
    created_at: u64,
    duration: u64,
    now: u64,
    requested_making: u64,
) -> Result<u64> {
    if making_amount == 0 {
        return Err(SettlementError::InvalidAmount);
    }
    let price = current_price(making_amount, taking_amount, created_at, duration, now)?;
    price
        .mul_div_ceil(requested_making, making_amount)
        .ok_or(SettlementError::ArithmeticOverflow)
}

/// The inverse of `expected_taking_amount`: the maximum `making_amount` a
/// resolver may take while paying `requested_taking` (spec.md §4.3:
/// `floorDiv(S*taking, T(t))`).
pub fn get_making_amount(
    making_amount: u64,
    taking_amount: u64,
    created_at: u64,
    duration: u64,
    now: u64,
    requested_taking: u64,
) -> Result<u64> {
    let price = current_price(making_amount, taking_amount, created_at, duration, now)?;
    if price == 0 {
        return Err(SettlementError::ArithmeticOverflow);
    }
    making_amount
        .mul_div_floor(requested_taking, price)
        .ok_or(SettlementError::ArithmeticOverflow)
}
