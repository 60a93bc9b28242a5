//! Source/Destination escrow lifecycle (spec.md C6, §4.6).
//!
//! Grounded on `common::escrow::{EscrowBase, create, withdraw, cancel,
//! rescue_funds}` — one set of free functions operating generically over
//! either `EscrowSrc` or `EscrowDst` via the `EscrowBase` trait — and both
//! `programs/cross-chain-escrow-{src,dst}/src/lib.rs` instruction bodies
//! for the stage checks and status-before-balance-move ordering. Here the
//! generic parameter collapses to a single `Escrow` struct carrying an
//! `is_src` flag, since the host-abstracted core has no separate Solana
//! account types to distinguish. `create_escrow_src`/`withdraw`/`cancel`
//! route through `Versioned::mutate` on the objects they touch, and
//! `rescue` through `Versioned::into_inner_checked`, so the version bump
//! that spec.md §5/§9 model as optimistic concurrency actually gates these
//! transitions rather than sitting unused beside them.

use crate::auction;
use crate::auth;
use crate::config::EngineConfig;
use crate::constants::LAST_USED_INDEX_SENTINEL;
use crate::error::{Result, SettlementError};
use crate::event::{EscrowCancelled, EscrowCreated, EscrowRescued, EscrowType, EscrowWithdrawn, Event, EventSink};
use crate::hash::keccak;
use crate::host::{Address, Balance, Clock, Id, NativeGas, SwapToken, Versioned};
use crate::merkle;
use crate::partial_fill;
use crate::timelocks::Timelocks;
use crate::wallet::Wallet;

/// Snapshot captured into an Escrow at mint time, never mutated thereafter
/// (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Immutables {
    pub order_hash: [u8; 32],
    pub hashlock: [u8; 32],
    pub maker: Address,
    pub taker: Address,
    pub token_type: String,
    pub amount: u64,
    pub safety_deposit_amount: u64,
    pub timelocks: Timelocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Withdrawn,
    Cancelled,
}

impl Status {
    pub const fn code(self) -> u8 {
        match self {
            Self::Active => crate::constants::status::ACTIVE,
            Self::Withdrawn => crate::constants::status::WITHDRAWN,
            Self::Cancelled => crate::constants::status::CANCELLED,
        }
    }
}

/// A shared object holding one fill's locked tokens plus a safety deposit
/// (spec.md §3). `is_src = true` for an `EscrowSrc` minted against a
/// Wallet; `is_src = false` for an `EscrowDst` minted directly by a
/// resolver depositing the destination asset.
#[derive(Debug, Clone)]
pub struct Escrow {
    pub id: Id,
    pub is_src: bool,
    pub immutables: Immutables,
    pub token_balance: Balance<SwapToken>,
    pub safety_deposit: Balance<NativeGas>,
    pub created_at: u64,
    pub status: Status,
}

pub struct CreateEscrowSrcParams {
    pub id: Id,
    pub secret_hashlock: [u8; 32],
    pub secret_index: u8,
    pub merkle_proof: Vec<[u8; 32]>,
    pub taker: Address,
    pub making_amount: u64,
    pub taking_amount: u64,
    pub safety_deposit: Balance<NativeGas>,
}

/// Mints an `EscrowSrc` against `wallet` (spec.md §4.6.1). Validation order
/// matches the spec exactly: amount/size shape, safety deposit floor,
/// wallet sufficiency, auction compliance, then partial-fill admissibility
/// (or the single-fill shape check). The whole check-then-debit sequence
/// runs inside `wallet.mutate`, so a stale `expected_wallet_version` (a
/// concurrent fill already landed) fails with `VersionMismatch` before any
/// balance moves.
pub fn create_escrow_src(
    wallet: &mut Versioned<Wallet>,
    expected_wallet_version: u64,
    params: CreateEscrowSrcParams,
    clock: &dyn Clock,
    sink: &mut dyn EventSink,
) -> Result<Versioned<Escrow>> {
    let now = clock.now_ms();
    let escrow_id = params.id;

    let escrow = wallet.mutate(expected_wallet_version, |wallet| -> Result<Escrow> {
        if params.making_amount == 0 || params.taking_amount == 0 {
            return Err(SettlementError::InvalidAmount);
        }
        if params.safety_deposit.value() < wallet.src_safety_deposit_amount {
            return Err(SettlementError::SafetyDepositTooLow);
        }
        if !wallet.is_active {
            return Err(SettlementError::WalletInactive);
        }
        if wallet.balance.value() < params.making_amount {
            return Err(SettlementError::InsufficientBalance);
        }

        let expected = auction::expected_taking_amount(
            wallet.making_amount,
            wallet.taking_amount,
            wallet.created_at,
            wallet.duration,
            now,
            params.making_amount,
        )?;
        if params.taking_amount < expected {
            return Err(SettlementError::AuctionViolated);
        }

        if wallet.allow_partial_fills {
            let cumulative = wallet
                .filled_amount()
                .checked_add(params.making_amount)
                .ok_or(SettlementError::ArithmeticOverflow)?;
            partial_fill::validate_index(
                wallet.making_amount,
                wallet.parts_amount,
                wallet.last_used_index,
                params.secret_index,
                cumulative,
            )?;
            if !merkle::verify(&params.secret_hashlock, &params.merkle_proof, &wallet.hashlock) {
                return Err(SettlementError::InvalidMerkleProof);
            }
            wallet.last_used_index = params.secret_index;
        } else {
            if params.secret_index != 0 || !params.merkle_proof.is_empty() {
                return Err(SettlementError::InvalidAmount);
            }
            if params.making_amount != wallet.balance.value() {
                return Err(SettlementError::InvalidAmount);
            }
            if params.secret_hashlock != wallet.hashlock {
                return Err(SettlementError::InvalidHashlock);
            }
        }

        let token_balance = wallet.debit_for_escrow(params.making_amount)?;

        let immutables = Immutables {
            order_hash: wallet.order_hash,
            hashlock: params.secret_hashlock,
            maker: wallet.maker,
            taker: params.taker,
            token_type: wallet.maker_asset.clone(),
            amount: params.making_amount,
            safety_deposit_amount: params.safety_deposit.value(),
            timelocks: wallet.timelocks,
        };
        Ok(Escrow {
            id: escrow_id,
            is_src: true,
            immutables,
            token_balance,
            safety_deposit: params.safety_deposit,
            created_at: now,
            status: Status::Active,
        })
    })?;

    tracing::info!(
        escrow_id = escrow.id,
        order_hash = %hex::encode(escrow.immutables.order_hash),
        amount = escrow.immutables.amount,
        "source escrow created"
    );
    sink.emit(Event::EscrowCreated(EscrowCreated {
        escrow_id: escrow.id,
        order_hash: escrow.immutables.order_hash,
        hashlock: escrow.immutables.hashlock,
        maker: escrow.immutables.maker,
        taker: escrow.immutables.taker,
        amount: escrow.immutables.amount,
        safety_deposit: escrow.safety_deposit.value(),
        created_at: escrow.created_at,
        last_used_index: wallet.get().last_used_index,
        is_src: true,
    }));

    Ok(Versioned::new(escrow))
}

pub struct CreateEscrowDstParams {
    pub id: Id,
    pub order_hash: [u8; 32],
    pub hashlock: [u8; 32],
    pub maker: Address,
    pub taker: Address,
    pub token_type: String,
    pub deposit: Balance<SwapToken>,
    pub safety_deposit: Balance<NativeGas>,
    pub timelocks: Timelocks,
}

/// Mints an `EscrowDst` directly from a resolver's deposit (spec.md
/// §4.6.2). No Merkle proof is needed: the destination chain trusts the
/// source chain's already-selected leaf.
pub fn create_escrow_dst(
    params: CreateEscrowDstParams,
    clock: &dyn Clock,
    config: &EngineConfig,
    sink: &mut dyn EventSink,
) -> Result<Versioned<Escrow>> {
    if params.order_hash == [0u8; 32] {
        return Err(SettlementError::InvalidOrderHash);
    }
    if params.hashlock == [0u8; 32] {
        return Err(SettlementError::InvalidHashlock);
    }
    if params.deposit.value() == 0 {
        return Err(SettlementError::InvalidAmount);
    }
    if params.safety_deposit.value() < config.min_safety_deposit {
        return Err(SettlementError::SafetyDepositTooLow);
    }
    params.timelocks.validate()?;

    let now = clock.now_ms();
    let immutables = Immutables {
        order_hash: params.order_hash,
        hashlock: params.hashlock,
        maker: params.maker,
        taker: params.taker,
        token_type: params.token_type,
        amount: params.deposit.value(),
        safety_deposit_amount: params.safety_deposit.value(),
        timelocks: params.timelocks,
    };
    let escrow = Escrow {
        id: params.id,
        is_src: false,
        immutables,
        token_balance: params.deposit,
        safety_deposit: params.safety_deposit,
        created_at: now,
        status: Status::Active,
    };

    tracing::info!(
        escrow_id = escrow.id,
        order_hash = %hex::encode(escrow.immutables.order_hash),
        amount = escrow.immutables.amount,
        "destination escrow created"
    );
    sink.emit(Event::EscrowCreated(EscrowCreated {
        escrow_id: escrow.id,
        order_hash: escrow.immutables.order_hash,
        hashlock: escrow.immutables.hashlock,
        maker: escrow.immutables.maker,
        taker: escrow.immutables.taker,
        amount: escrow.immutables.amount,
        safety_deposit: escrow.safety_deposit.value(),
        created_at: escrow.created_at,
        last_used_index: LAST_USED_INDEX_SENTINEL,
        is_src: false,
    }));

    Ok(Versioned::new(escrow))
}

pub struct WithdrawOutcome {
    pub token: Balance<SwapToken>,
    pub token_recipient: Address,
    pub safety_deposit: Balance<NativeGas>,
    pub safety_deposit_recipient: Address,
}

fn stage_of(escrow: &Escrow, now: u64) -> crate::timelocks::Stage {
    if escrow.is_src {
        escrow.immutables.timelocks.src_stage(escrow.created_at, now)
    } else {
        escrow.immutables.timelocks.dst_stage(escrow.created_at, now)
    }
}

/// Withdraws the locked token to the beneficiary (taker for src, maker for
/// dst), rewarding the safety deposit to whoever executes the transition
/// (spec.md §4.6.3). `status` is set before balances move, as a defence
/// against re-entrancy (spec.md §9). Routed through `Versioned::mutate`: a
/// stale `expected_version` fails closed with `VersionMismatch` rather than
/// racing a concurrent cancel.
pub fn withdraw(
    escrow: &mut Versioned<Escrow>,
    expected_version: u64,
    secret: &[u8],
    now: u64,
    caller: Address,
    sink: &mut dyn EventSink,
) -> Result<WithdrawOutcome> {
    let outcome = escrow.mutate(expected_version, |escrow| -> Result<WithdrawOutcome> {
        match escrow.status {
            Status::Withdrawn => return Err(SettlementError::AlreadyWithdrawn),
            Status::Cancelled => return Err(SettlementError::InactiveEscrow),
            Status::Active => {}
        }
        if secret.len() < 32 {
            return Err(SettlementError::InvalidSecret);
        }
        if keccak(secret) != escrow.immutables.hashlock {
            return Err(SettlementError::InvalidSecret);
        }

        let stage = stage_of(escrow, now);
        auth::authorize_withdraw(stage, caller, escrow.immutables.taker)?;

        escrow.status = Status::Withdrawn;
        let token = escrow.token_balance.withdraw_all();
        let token_recipient = if escrow.is_src { escrow.immutables.taker } else { escrow.immutables.maker };
        let safety_deposit = escrow.safety_deposit.withdraw_all();

        Ok(WithdrawOutcome {
            token,
            token_recipient,
            safety_deposit,
            safety_deposit_recipient: caller,
        })
    })?;

    let snapshot = escrow.get();
    tracing::info!(
        escrow_id = snapshot.id,
        order_hash = %hex::encode(snapshot.immutables.order_hash),
        withdrawn_by = %hex::encode(caller),
        "escrow withdrawn"
    );
    sink.emit(Event::EscrowWithdrawn(EscrowWithdrawn {
        escrow_id: snapshot.id,
        order_hash: snapshot.immutables.order_hash,
        hashlock: snapshot.immutables.hashlock,
        secret: secret.to_vec(),
        withdrawn_by: caller,
        maker: snapshot.immutables.maker,
        taker: snapshot.immutables.taker,
        amount: outcome.token.value(),
        withdrawn_at: now,
        is_src: snapshot.is_src,
    }));

    Ok(outcome)
}

pub struct CancelOutcome {
    pub token: Balance<SwapToken>,
    pub token_recipient: Address,
    pub safety_deposit: Balance<NativeGas>,
    pub safety_deposit_recipient: Address,
}

/// Cancels the escrow, refunding the locked token to the refund party
/// (maker for src, taker for dst). Source escrows admit a public-cancel
/// stage; destination escrows never reach one, so `auth::authorize_cancel`
/// rejects any caller but `taker` there (spec.md §4.6.4, §9). Routed
/// through `Versioned::mutate` like `withdraw`.
pub fn cancel(
    escrow: &mut Versioned<Escrow>,
    expected_version: u64,
    now: u64,
    caller: Address,
    sink: &mut dyn EventSink,
) -> Result<CancelOutcome> {
    let outcome = escrow.mutate(expected_version, |escrow| -> Result<CancelOutcome> {
        match escrow.status {
            Status::Withdrawn => return Err(SettlementError::AlreadyWithdrawn),
            Status::Cancelled => return Err(SettlementError::InactiveEscrow),
            Status::Active => {}
        }

        let stage = stage_of(escrow, now);
        auth::authorize_cancel(stage, caller, escrow.immutables.taker)?;

        escrow.status = Status::Cancelled;
        let token = escrow.token_balance.withdraw_all();
        let token_recipient = if escrow.is_src { escrow.immutables.maker } else { escrow.immutables.taker };
        let safety_deposit = escrow.safety_deposit.withdraw_all();

        Ok(CancelOutcome {
            token,
            token_recipient,
            safety_deposit,
            safety_deposit_recipient: caller,
        })
    })?;

    let snapshot = escrow.get();
    tracing::info!(
        escrow_id = snapshot.id,
        order_hash = %hex::encode(snapshot.immutables.order_hash),
        cancelled_by = %hex::encode(caller),
        "escrow cancelled"
    );
    sink.emit(Event::EscrowCancelled(EscrowCancelled {
        escrow_id: snapshot.id,
        order_hash: snapshot.immutables.order_hash,
        maker: snapshot.immutables.maker,
        taker: snapshot.immutables.taker,
        cancelled_by: caller,
        amount: outcome.token.value(),
        cancelled_at: now,
        is_src: snapshot.is_src,
    }));

    Ok(outcome)
}

pub struct RescueOutcome {
    pub token: Balance<SwapToken>,
    pub token_recipient: Address,
    pub safety_deposit: Balance<NativeGas>,
    pub safety_deposit_recipient: Address,
}

/// Destroys the escrow for a storage refund, permitted at or past the
/// rescue stage regardless of `status` (spec.md §4.6.5). Any residual
/// balances (zero, if the escrow already withdrew or cancelled) are
/// refunded to the Immutables-declared party. Consumes `escrow` via
/// `into_inner_checked`, rejecting a stale `expected_version`.
pub fn rescue(
    escrow: Versioned<Escrow>,
    expected_version: u64,
    now: u64,
    config: &EngineConfig,
    caller: Address,
    sink: &mut dyn EventSink,
) -> Result<RescueOutcome> {
    let mut escrow = escrow.into_inner_checked(expected_version)?;
    let rescue_stage = escrow.immutables.timelocks.rescue_stage(escrow.created_at, escrow.is_src, config);
    auth::authorize_rescue(now, rescue_stage)?;

    let token = escrow.token_balance.withdraw_all();
    let token_recipient = if escrow.is_src { escrow.immutables.maker } else { escrow.immutables.taker };
    let safety_deposit = escrow.safety_deposit.withdraw_all();

    tracing::info!(
        escrow_id = escrow.id,
        order_hash = %hex::encode(escrow.immutables.order_hash),
        rescued_by = %hex::encode(caller),
        "escrow rescued"
    );
    sink.emit(Event::EscrowRescued(EscrowRescued {
        escrow_id: escrow.id,
        order_hash: escrow.immutables.order_hash,
        hashlock: escrow.immutables.hashlock,
        maker: escrow.immutables.maker,
        taker: escrow.immutables.taker,
        rescued_by: caller,
        amount: token.value(),
        rescued_at: now,
        escrow_type: if escrow.is_src { EscrowType::Source } else { EscrowType::Destination },
    }));

    Ok(RescueOutcome {
        token,
        token_recipient,
        safety_deposit,
        safety_deposit_recipient: caller,
    })
}
