//! Authorization gate (spec.md C7, §4.7).
//!
//! The teacher scatters its per-instruction `require!`/`constraint =`
//! caller checks across `programs/cross-chain-escrow-{src,dst}/src/lib.rs`
//! (e.g. `withdraw` requiring `ctx.accounts.taker` to sign, `public_withdraw`
//! accepting any payer). This module factors that pattern into one
//! predicate per transition, keyed by `(stage, caller, taker)` as spec.md
//! §4.7's table lays out.

use crate::error::{Result, SettlementError};
use crate::host::Address;
use crate::timelocks::Stage;

/// Authorizes a withdraw attempt. `ResolverExclusiveWithdraw` requires the
/// caller to be `taker`; `PublicWithdraw` accepts any caller (spec.md §4.7:
/// the safety deposit rewards whoever executes the transition, not a fixed
/// "original filler" — spec.md §9 flags this as deliberate).
pub fn authorize_withdraw(stage: Stage, caller: Address, taker: Address) -> Result<()> {
    match stage {
        Stage::ResolverExclusiveWithdraw => {
            if caller == taker {
                Ok(())
            } else {
                Err(SettlementError::Unauthorised)
            }
        }
        Stage::PublicWithdraw => Ok(()),
        _ => Err(SettlementError::NotWithdrawable),
    }
}

/// Authorizes a cancel attempt. Source escrows additionally admit a
/// `PublicCancel` stage (any caller); destination escrows never reach that
/// stage (spec.md §9: destination cancels should not be adversarial), so
/// their `dst_stage` never yields `PublicCancel` and this branch is simply
/// unreachable for them.
pub fn authorize_cancel(stage: Stage, caller: Address, taker: Address) -> Result<()> {
    match stage {
        Stage::ResolverExclusiveCancel => {
            if caller == taker {
                Ok(())
            } else {
                Err(SettlementError::Unauthorised)
            }
        }
        Stage::PublicCancel => Ok(()),
        _ => Err(SettlementError::NotCancellable),
    }
}

/// Authorizes a rescue attempt: any caller, gated purely on time.
pub fn authorize_rescue(now: u64, rescue_stage: u64) -> Result<()> {
    if now >= rescue_stage {
        Ok(())
    } else {
        Err(SettlementError::NotRescuable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAKER: Address = [1u8; 32];
    const OTHER: Address = [2u8; 32];

    #[test]
    fn withdraw_requires_taker_in_exclusive_stage() {
        assert!(authorize_withdraw(Stage::ResolverExclusiveWithdraw, TAKER, TAKER).is_ok());
        assert_eq!(
            authorize_withdraw(Stage::ResolverExclusiveWithdraw, OTHER, TAKER),
            Err(SettlementError::Unauthorised)
        );
    }

    #[test]
    fn withdraw_is_open_in_public_stage() {
        assert!(authorize_withdraw(Stage::PublicWithdraw, OTHER, TAKER).is_ok());
    }

    #[test]
    fn withdraw_rejected_outside_withdraw_stages() {
        assert_eq!(
            authorize_withdraw(Stage::FinalityLock, TAKER, TAKER),
            Err(SettlementError::NotWithdrawable)
        );
        assert_eq!(
            authorize_withdraw(Stage::ResolverExclusiveCancel, TAKER, TAKER),
            Err(SettlementError::NotWithdrawable)
        );
    }

    #[test]
    fn cancel_requires_taker_in_exclusive_stage_but_opens_publicly() {
        assert_eq!(
            authorize_cancel(Stage::ResolverExclusiveCancel, OTHER, TAKER),
            Err(SettlementError::Unauthorised)
        );
        assert!(authorize_cancel(Stage::PublicCancel, OTHER, TAKER).is_ok());
    }

    #[test]
    fn rescue_is_time_gated_only() {
        assert_eq!(authorize_rescue(99, 100), Err(SettlementError::NotRescuable));
        assert!(authorize_rescue(100, 100).is_ok());
        assert!(authorize_rescue(101, 100).is_ok());
    }
}
