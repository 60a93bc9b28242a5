//! The host environment contract consumed by the core (spec.md §6).
//!
//! Everything in this module is an interface the core programs against,
//! never a concrete chain binding — mirroring how the teacher's
//! `common::escrow::EscrowBase` trait lets `create`/`withdraw`/`cancel`
//! operate over either `EscrowSrc` or `EscrowDst` without knowing which.
//! A real chain integration (Solana program, NEAR contract, Sui Move
//! module, ...) supplies concrete `Clock`/`EventSink` implementations and
//! wires `Balance<Kind>` onto its native asset-balance primitive.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::error::SettlementError;

/// A 32-byte address, opaque to the core (maker/taker identities).
pub type Address = [u8; 32];

/// The handle the host's object store assigns when a Wallet/Escrow is first
/// shared (spec.md §6: `new_object(...) -> Id`). The core never generates
/// one itself — it is supplied by the caller, exactly as `order_hash` is
/// supplied already-hashed rather than computed here.
pub type Id = u64;

/// Monotonic wall-clock milliseconds, supplied by the host (spec.md §6: `now_ms() -> u64`).
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Marker type for the order's swap token (maker_asset / taker_asset side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapToken;

/// Marker type for the host's native gas asset (safety deposits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeGas;

/// A typed balance, parameterised by asset kind so a `Balance<SwapToken>`
/// can never be merged with a `Balance<NativeGas>` by accident (invariant
/// 8: safety deposits are denominated separately from the swap token).
///
/// Mirrors spec.md §6's `Balance<T>` host primitive: `split`, `merge`,
/// `withdraw_all`, `value`, `destroy_zero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance<Kind> {
    value: u64,
    #[serde(skip)]
    _kind: PhantomData<Kind>,
}

impl<Kind> Balance<Kind> {
    pub fn zero() -> Self {
        Self { value: 0, _kind: PhantomData }
    }

    pub fn new(value: u64) -> Self {
        Self { value, _kind: PhantomData }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Splits `amount` off this balance, shrinking it in place.
    ///
    /// Panics if `amount > self.value()` — the caller (wallet/escrow
    /// lifecycle code) is responsible for checking sufficiency first and
    /// reporting `InsufficientBalance` before ever calling this.
    pub fn split(&mut self, amount: u64) -> Self {
        assert!(amount <= self.value, "split amount exceeds balance");
        self.value -= amount;
        Self::new(amount)
    }

    /// Merges `other` into this balance, consuming it.
    pub fn merge(&mut self, other: Self) {
        self.value = self.value.saturating_add(other.value);
    }

    /// Takes the entire balance, leaving zero behind.
    pub fn withdraw_all(&mut self) -> Self {
        self.split(self.value)
    }

    /// Consumes a zero balance. The host environment contract requires
    /// balances be explicitly destroyed rather than silently dropped.
    pub fn destroy_zero(self) {
        assert_eq!(self.value, 0, "destroy_zero called on a non-zero balance");
    }
}

/// The object-store facet of the host contract: shared objects are
/// addressable, mutable under explicit borrow, and destructible with a
/// storage refund to the caller. The core never spawns threads or manages
/// its own lock table (spec.md §5); cross-transaction concurrency is the
/// host's job via object versioning.
///
/// `Versioned<T>` is the in-process stand-in for that: every successful
/// mutation bumps the version, and `mutate` rejects a call whose
/// `expected_version` no longer matches — the same shape as a real chain's
/// optimistic-concurrency check, just expressed as a return value instead
/// of a re-submitted transaction. `wallet::Wallet::create` publishes a
/// fresh `Versioned<Wallet>`; `escrow::create_escrow_src` goes through
/// `mutate` to debit it; `escrow::withdraw`/`cancel` go through `mutate` on
/// `Versioned<Escrow>`; `wallet::Wallet::rescue` and `escrow::rescue`
/// consume a `Versioned<_>` via `into_inner_checked` since rescue destroys
/// the object rather than updating it in place.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    version: u64,
    inner: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("object version mismatch: expected {expected}, found {found}")]
pub struct VersionMismatch {
    pub expected: u64,
    pub found: u64,
}

impl<T> Versioned<T> {
    pub fn new(inner: T) -> Self {
        Self { version: 0, inner }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Mutates the object iff `expected_version` matches, bumping the
    /// version on success. `f` returning `Err` leaves the version and
    /// contents untouched (the transaction is not committed).
    pub fn mutate<R, E>(
        &mut self,
        expected_version: u64,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<R, MutateError<E>> {
        if expected_version != self.version {
            return Err(MutateError::VersionMismatch(VersionMismatch {
                expected: expected_version,
                found: self.version,
            }));
        }
        let result = f(&mut self.inner).map_err(MutateError::Inner)?;
        self.version += 1;
        Ok(result)
    }

    /// Consumes the object for destruction, returning its final state for
    /// a storage-refund accounting step.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Consumes the object for destruction iff `expected_version` matches,
    /// the version-checked counterpart of `into_inner` for rescue paths
    /// (spec.md §4.5/§4.6.5: rescue destroys the object outright rather
    /// than updating it in place, so there is no post-rescue version to
    /// bump).
    pub fn into_inner_checked(self, expected_version: u64) -> Result<T, VersionMismatch> {
        if expected_version != self.version {
            return Err(VersionMismatch { expected: expected_version, found: self.version });
        }
        Ok(self.inner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutateError<E> {
    VersionMismatch(VersionMismatch),
    Inner(E),
}

impl From<VersionMismatch> for SettlementError {
    fn from(e: VersionMismatch) -> Self {
        SettlementError::VersionMismatch { expected: e.expected, found: e.found }
    }
}

impl From<MutateError<SettlementError>> for SettlementError {
    fn from(e: MutateError<SettlementError>) -> Self {
        match e {
            MutateError::VersionMismatch(v) => v.into(),
            MutateError::Inner(inner) => inner,
        }
    }
}
