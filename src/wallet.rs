//! Wallet lifecycle (spec.md C5, §4.5).
//!
//! Grounded on `common::escrow::create`'s validation shape (amount/size
//! checks before any balance movement) and
//! `programs/cross-chain-escrow-src/src/lib.rs::create`/`create_escrow`'s
//! split-balance-into-escrow flow, generalized off Solana accounts onto the
//! `host::Balance`/`host::Versioned` abstraction (spec.md §6). `create`
//! publishes a fresh `Versioned<Wallet>`; `rescue` consumes one via
//! `into_inner_checked`, matching the version-gated destroy path spec.md §9
//! describes for the host's object store.

use crate::constants::{LAST_USED_INDEX_SENTINEL, MAX_PARTS_AMOUNT};
use crate::error::{Result, SettlementError};
use crate::event::{Event, EventSink, WalletCreated};
use crate::host::{Address, Balance, Clock, Id, SwapToken, Versioned};
use crate::timelocks::Timelocks;
use crate::u256::U256;

/// An order-scoped funding buffer, shared and addressable by any resolver
/// (spec.md §3). Invariant 1: exists in either single-fill mode
/// (`allow_partial_fills=false, parts_amount=0`) or partial-fill mode
/// (`allow_partial_fills=true, parts_amount>1`) — no other combination.
#[derive(Debug, Clone)]
pub struct Wallet {
    pub id: Id,
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
    pub last_used_index: u8,
    pub balance: Balance<SwapToken>,
    pub created_at: u64,
    pub is_active: bool,
}

#[allow(clippy::too_many_arguments)]
pub struct CreateWalletParams {
    pub id: Id,
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
    pub funding: Balance<SwapToken>,
}

impl Wallet {
    /// Validates inputs and publishes a shared, freshly-versioned Wallet
    /// (spec.md §4.5). Emits `WalletCreated`. Fails with `InvalidAmount`,
    /// `InvalidTimelock`, `InvalidHashlock`, `InvalidOrderHash`.
    pub fn create(params: CreateWalletParams, clock: &dyn Clock, sink: &mut dyn EventSink) -> Result<Versioned<Self>> {
        if params.order_hash == [0u8; 32] {
            return Err(SettlementError::InvalidOrderHash);
        }
        if params.hashlock == [0u8; 32] {
            return Err(SettlementError::InvalidHashlock);
        }
        if params.making_amount == 0 || params.taking_amount == 0 || params.duration == 0 {
            return Err(SettlementError::InvalidAmount);
        }
        if params.funding.value() != params.making_amount {
            return Err(SettlementError::InvalidAmount);
        }
        params.timelocks.validate()?;

        let shape_ok = if params.allow_partial_fills {
            params.parts_amount > 1 && params.parts_amount <= MAX_PARTS_AMOUNT
        } else {
            params.parts_amount == 0
        };
        if !shape_ok {
            return Err(SettlementError::InvalidAmount);
        }

        let created_at = clock.now_ms();
        let wallet = Self {
            id: params.id,
            order_hash: params.order_hash,
            salt: params.salt,
            maker: params.maker,
            maker_asset: params.maker_asset.clone(),
            taker_asset: params.taker_asset.clone(),
            making_amount: params.making_amount,
            taking_amount: params.taking_amount,
            duration: params.duration,
            hashlock: params.hashlock,
            timelocks: params.timelocks,
            src_safety_deposit_amount: params.src_safety_deposit_amount,
            dst_safety_deposit_amount: params.dst_safety_deposit_amount,
            allow_partial_fills: params.allow_partial_fills,
            parts_amount: params.parts_amount,
            last_used_index: LAST_USED_INDEX_SENTINEL,
            balance: params.funding,
            created_at,
            is_active: true,
        };

        tracing::info!(
            wallet_id = wallet.id,
            order_hash = %hex::encode(wallet.order_hash),
            making_amount = wallet.making_amount,
            taking_amount = wallet.taking_amount,
            "wallet created"
        );
        sink.emit(Event::WalletCreated(WalletCreated {
            wallet_id: wallet.id,
            order_hash: wallet.order_hash,
            salt: wallet.salt,
            maker: wallet.maker,
            maker_asset: params.maker_asset,
            taker_asset: params.taker_asset,
            making_amount: wallet.making_amount,
            taking_amount: wallet.taking_amount,
            duration: wallet.duration,
            hashlock: wallet.hashlock,
            timelocks: wallet.timelocks,
            src_safety_deposit_amount: wallet.src_safety_deposit_amount,
            dst_safety_deposit_amount: wallet.dst_safety_deposit_amount,
            allow_partial_fills: wallet.allow_partial_fills,
            parts_amount: wallet.parts_amount,
            created_at: wallet.created_at,
        }));

        Ok(Versioned::new(wallet))
    }

    /// The cumulative amount already filled against this wallet.
    pub fn filled_amount(&self) -> u64 {
        self.making_amount - self.balance.value()
    }

    /// Splits `amount` off the wallet's balance for a new escrow (internal
    /// to C6). Fails with `WalletInactive`, `InsufficientBalance`. Called
    /// from inside `escrow::create_escrow_src`'s `Versioned::mutate` closure
    /// so the debit and the version bump commit atomically.
    pub(crate) fn debit_for_escrow(&mut self, amount: u64) -> Result<Balance<SwapToken>> {
        if !self.is_active {
            return Err(SettlementError::WalletInactive);
        }
        if self.balance.value() < amount {
            return Err(SettlementError::InsufficientBalance);
        }
        Ok(self.balance.split(amount))
    }

    /// Rescues the wallet's residual balance to `maker`, permitted only in
    /// the rescue window, regardless of prior state (spec.md §4.5). Consumes
    /// `wallet` via `into_inner_checked`, rejecting `VersionMismatch` if a
    /// concurrent escrow creation landed first. Returns the residual balance
    /// for the caller to settle; the wallet itself is destroyed.
    pub fn rescue(
        wallet: Versioned<Self>,
        expected_version: u64,
        now: u64,
        config: &crate::config::EngineConfig,
        sink: &mut dyn EventSink,
    ) -> Result<(Address, Balance<SwapToken>)> {
        let mut wallet = wallet.into_inner_checked(expected_version)?;

        let rescue_stage = wallet.timelocks.rescue_stage(wallet.created_at, true, config);
        crate::auth::authorize_rescue(now, rescue_stage)?;

        let residual = wallet.balance.withdraw_all();
        wallet.is_active = false;

        tracing::info!(
            wallet_id = wallet.id,
            order_hash = %hex::encode(wallet.order_hash),
            amount = residual.value(),
            "wallet rescued"
        );
        sink.emit(Event::WalletRescued(crate::event::WalletRescued {
            wallet_id: wallet.id,
            order_hash: wallet.order_hash,
            maker: wallet.maker,
            rescued_by: wallet.maker,
            amount: residual.value(),
            rescued_at: now,
        }));

        Ok((wallet.maker, residual))
    }
}
