//! Settlement error taxonomy (spec.md §6/§7).
//!
//! The source repo's constants file assigns the same numeric code to two
//! distinct errors (`1014` to both `SafetyDepositTooLow` and
//! `SecretIndexUsed`; `1015` to both `WalletInactive` and
//! `InvalidMerkleProof`). Codes here are reassigned so every variant is
//! distinct; see SPEC_FULL.md §4.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, SettlementError>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SettlementError {
    #[error("invalid amount")]
    InvalidAmount,
    #[error("invalid timelock structure")]
    InvalidTimelock,
    #[error("invalid hashlock")]
    InvalidHashlock,
    #[error("invalid secret")]
    InvalidSecret,
    #[error("invalid address")]
    InvalidAddress,
    #[error("already withdrawn or cancelled")]
    AlreadyWithdrawn,
    #[error("not withdrawable in the current stage")]
    NotWithdrawable,
    #[error("escrow is not active")]
    InactiveEscrow,
    #[error("not cancellable in the current stage")]
    NotCancellable,
    #[error("caller is not authorised for this transition")]
    Unauthorised,
    #[error("invalid order hash")]
    InvalidOrderHash,
    #[error("invalid merkle proof")]
    InvalidMerkleProof,
    #[error("secret index already used")]
    SecretIndexUsed,
    #[error("safety deposit below required minimum")]
    SafetyDepositTooLow,
    #[error("wallet is not active")]
    WalletInactive,
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("submitted taking amount violates the auction price")]
    AuctionViolated,
    #[error("not yet rescuable")]
    NotRescuable,
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
    #[error("object version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u64, found: u64 },
}

impl SettlementError {
    /// Numeric code, per SPEC_FULL.md §4 (collision-free reassignment of spec.md §6/§7).
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidAmount => 1001,
            Self::InvalidTimelock => 1002,
            Self::InvalidHashlock => 1003,
            Self::InvalidSecret => 1004,
            Self::InvalidAddress => 1005,
            Self::AlreadyWithdrawn => 1006,
            Self::NotWithdrawable => 1007,
            Self::InactiveEscrow => 1008,
            Self::NotCancellable => 1009,
            Self::Unauthorised => 1010,
            Self::InvalidOrderHash => 1011,
            Self::InvalidMerkleProof => 1012,
            Self::SecretIndexUsed => 1013,
            Self::SafetyDepositTooLow => 1014,
            Self::WalletInactive => 1015,
            Self::InsufficientBalance => 1016,
            Self::AuctionViolated => 1017,
            Self::NotRescuable => 1018,
            Self::ArithmeticOverflow => 1019,
            Self::VersionMismatch { .. } => 1020,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_distinct() {
        let all = [
            SettlementError::InvalidAmount,
            SettlementError::InvalidTimelock,
            SettlementError::InvalidHashlock,
            SettlementError::InvalidSecret,
            SettlementError::InvalidAddress,
            SettlementError::AlreadyWithdrawn,
            SettlementError::NotWithdrawable,
            SettlementError::InactiveEscrow,
            SettlementError::NotCancellable,
            SettlementError::Unauthorised,
            SettlementError::InvalidOrderHash,
            SettlementError::InvalidMerkleProof,
            SettlementError::SecretIndexUsed,
            SettlementError::SafetyDepositTooLow,
            SettlementError::WalletInactive,
            SettlementError::InsufficientBalance,
            SettlementError::AuctionViolated,
            SettlementError::NotRescuable,
            SettlementError::ArithmeticOverflow,
            SettlementError::VersionMismatch { expected: 0, found: 0 },
        ];
        let codes: HashSet<u32> = all.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), all.len(), "error codes must be pairwise distinct");
    }
}
