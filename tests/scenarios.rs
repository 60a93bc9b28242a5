//! End-to-end scenarios A-F (spec.md §8's seed vectors), run against the
//! public API with the in-memory test host (`test_host`, `test-util`
//! feature, default-on).

use escrow_settlement_core::escrow::{cancel, create_escrow_dst, create_escrow_src, rescue, withdraw, CreateEscrowDstParams, CreateEscrowSrcParams, Status};
use escrow_settlement_core::event::{Event, InMemoryEventSink};
use escrow_settlement_core::hash::keccak;
use escrow_settlement_core::merkle;
use escrow_settlement_core::test_host::{addr, valid_timelocks, FixedClock};
use escrow_settlement_core::u256::U256;
use escrow_settlement_core::wallet::{CreateWalletParams, Wallet};
use escrow_settlement_core::{Balance, EngineConfig, SettlementError};

fn base_wallet_params(id: u64, hashlock: [u8; 32], funding: u64, allow_partial_fills: bool, parts_amount: u8) -> CreateWalletParams {
    CreateWalletParams {
        id,
        order_hash: [42u8; 32],
        salt: U256::from(7u64),
        maker: addr(1),
        maker_asset: "USDC".into(),
        taker_asset: "ETH".into(),
        making_amount: 1_000_000_000,
        taking_amount: 900_000_000,
        duration: 3_600_000,
        hashlock,
        timelocks: valid_timelocks(),
        src_safety_deposit_amount: 100_000_000,
        dst_safety_deposit_amount: 100_000_000,
        allow_partial_fills,
        parts_amount,
        funding: Balance::new(funding),
    }
}

#[test]
fn scenario_a_single_fill_happy_path() {
    let mut clock = FixedClock(1_000_000);
    let mut sink = InMemoryEventSink::default();
    let secret = b"s0_32_bytes_long_0000000000_aaaa".to_vec();
    let hashlock = keccak(&secret);

    let mut wallet = Wallet::create(base_wallet_params(1, hashlock, 1_000_000_000, false, 0), &clock, &mut sink).unwrap();
    clock.advance(1_600);

    let mut escrow = create_escrow_src(
        &mut wallet,
        0,
        CreateEscrowSrcParams {
            id: 100,
            secret_hashlock: hashlock,
            secret_index: 0,
            merkle_proof: vec![],
            taker: addr(2),
            making_amount: 1_000_000_000,
            taking_amount: 1_000_000_000,
            safety_deposit: Balance::new(100_000_000),
        },
        &clock,
        &mut sink,
    )
    .unwrap();
    assert_eq!(wallet.get().balance.value(), 0);

    let withdraw_at = wallet.get().created_at + valid_timelocks().src_withdrawal;
    let outcome = withdraw(&mut escrow, 0, &secret, withdraw_at, addr(2), &mut sink).unwrap();

    assert_eq!(escrow.get().status, Status::Withdrawn);
    assert_eq!(outcome.token.value(), 1_000_000_000);
    assert_eq!(outcome.token_recipient, addr(2));
    assert_eq!(outcome.safety_deposit.value(), 100_000_000);
    assert_eq!(outcome.safety_deposit_recipient, addr(2));
    assert_eq!(wallet.get().balance.value(), 0);

    assert!(matches!(sink.events.last(), Some(Event::EscrowWithdrawn(e)) if e.secret == secret && e.escrow_id == 100));
}

#[test]
fn scenario_b_four_part_partial_fills() {
    let clock = FixedClock(1_000_000);
    let mut sink = InMemoryEventSink::default();

    let secrets: Vec<Vec<u8>> = (0..=4).map(|i| format!("secret-number-{i:02}-thirtytwo-bytes!").into_bytes()).collect();
    let leaves: Vec<[u8; 32]> = secrets.iter().map(|s| keccak(s)).collect();
    let root = merkle::build_root(&leaves);

    let mut wallet = Wallet::create(base_wallet_params(1, root, 1_000_000_000, true, 4), &clock, &mut sink).unwrap();

    // R1 fills 400M at index 1 (bucket [25%,50%))
    let proof1 = merkle::build_proof(&leaves, 1);
    let e1 = create_escrow_src(
        &mut wallet,
        0,
        CreateEscrowSrcParams {
            id: 101,
            secret_hashlock: leaves[1],
            secret_index: 1,
            merkle_proof: proof1,
            taker: addr(10),
            making_amount: 400_000_000,
            taking_amount: 400_000_000,
            safety_deposit: Balance::new(100_000_000),
        },
        &clock,
        &mut sink,
    )
    .unwrap();
    assert_eq!(wallet.get().last_used_index, 1);

    // R2 fills to 750M cumulative at index 3 (bucket [75%,100%))
    let proof3 = merkle::build_proof(&leaves, 3);
    let e2 = create_escrow_src(
        &mut wallet,
        1,
        CreateEscrowSrcParams {
            id: 102,
            secret_hashlock: leaves[3],
            secret_index: 3,
            merkle_proof: proof3,
            taker: addr(11),
            making_amount: 350_000_000,
            taking_amount: 350_000_000,
            safety_deposit: Balance::new(100_000_000),
        },
        &clock,
        &mut sink,
    )
    .unwrap();
    assert_eq!(wallet.get().last_used_index, 3);

    // R3 fills to 1e9 cumulative (exact 100%) at the reserved last index
    let proof4 = merkle::build_proof(&leaves, 4);
    let e3 = create_escrow_src(
        &mut wallet,
        2,
        CreateEscrowSrcParams {
            id: 103,
            secret_hashlock: leaves[4],
            secret_index: 4,
            merkle_proof: proof4,
            taker: addr(12),
            making_amount: 250_000_000,
            taking_amount: 250_000_000,
            safety_deposit: Balance::new(100_000_000),
        },
        &clock,
        &mut sink,
    )
    .unwrap();

    assert_eq!(wallet.get().balance.value(), 0);
    assert_eq!(wallet.get().last_used_index, 4);
    assert_eq!(wallet.version(), 3);
    assert_eq!(
        e1.get().immutables.amount + e2.get().immutables.amount + e3.get().immutables.amount,
        1_000_000_000
    );
}

#[test]
fn scenario_e_index_reuse_rejected() {
    let clock = FixedClock(1_000_000);
    let mut sink = InMemoryEventSink::default();

    let secrets: Vec<Vec<u8>> = (0..=4).map(|i| format!("secret-number-{i:02}-thirtytwo-bytes!").into_bytes()).collect();
    let leaves: Vec<[u8; 32]> = secrets.iter().map(|s| keccak(s)).collect();
    let root = merkle::build_root(&leaves);

    let mut wallet = Wallet::create(base_wallet_params(1, root, 1_000_000_000, true, 4), &clock, &mut sink).unwrap();

    let proof1 = merkle::build_proof(&leaves, 1);
    create_escrow_src(
        &mut wallet,
        0,
        CreateEscrowSrcParams {
            id: 101,
            secret_hashlock: leaves[1],
            secret_index: 1,
            merkle_proof: proof1.clone(),
            taker: addr(10),
            making_amount: 400_000_000,
            taking_amount: 400_000_000,
            safety_deposit: Balance::new(100_000_000),
        },
        &clock,
        &mut sink,
    )
    .unwrap();

    let balance_before = wallet.get().balance.value();
    let last_used_before = wallet.get().last_used_index;

    // retry at the same index (or anything <= 1) must be rejected
    let err = create_escrow_src(
        &mut wallet,
        1,
        CreateEscrowSrcParams {
            id: 102,
            secret_hashlock: leaves[1],
            secret_index: 1,
            merkle_proof: proof1,
            taker: addr(11),
            making_amount: 100_000_000,
            taking_amount: 100_000_000,
            safety_deposit: Balance::new(100_000_000),
        },
        &clock,
        &mut sink,
    )
    .unwrap_err();

    assert_eq!(err, SettlementError::SecretIndexUsed);
    assert_eq!(wallet.get().balance.value(), balance_before);
    assert_eq!(wallet.get().last_used_index, last_used_before);
}

#[test]
fn scenario_f_public_withdraw_pays_non_taker_caller() {
    let mut clock = FixedClock(1_000_000);
    let mut sink = InMemoryEventSink::default();
    let secret = b"s0_32_bytes_long_0000000000_aaaa".to_vec();
    let hashlock = keccak(&secret);

    let mut wallet = Wallet::create(base_wallet_params(1, hashlock, 1_000_000_000, false, 0), &clock, &mut sink).unwrap();
    let mut escrow = create_escrow_src(
        &mut wallet,
        0,
        CreateEscrowSrcParams {
            id: 100,
            secret_hashlock: hashlock,
            secret_index: 0,
            merkle_proof: vec![],
            taker: addr(2),
            making_amount: 1_000_000_000,
            taking_amount: 1_000_000_000,
            safety_deposit: Balance::new(100_000_000),
        },
        &clock,
        &mut sink,
    )
    .unwrap();

    clock.0 = wallet.get().created_at + valid_timelocks().src_public_withdrawal;
    let outcome = withdraw(&mut escrow, 0, &secret, clock.0, addr(77), &mut sink).unwrap();

    assert_eq!(escrow.get().status, Status::Withdrawn);
    assert_eq!(outcome.token_recipient, addr(2));
    assert_eq!(outcome.safety_deposit_recipient, addr(77));
}

#[test]
fn dst_escrow_withdraw_and_rescue_round_trip() {
    let mut clock = FixedClock(1_000_000);
    let mut sink = InMemoryEventSink::default();
    let config = EngineConfig::default();
    let secret = b"dst_secret_thirtytwobytes_long!!".to_vec();
    let hashlock = keccak(&secret);

    let mut escrow = create_escrow_dst(
        CreateEscrowDstParams {
            id: 200,
            order_hash: [9u8; 32],
            hashlock,
            maker: addr(1),
            taker: addr(2),
            token_type: "ETH".into(),
            deposit: Balance::new(900_000_000),
            safety_deposit: Balance::new(100_000_000),
            timelocks: valid_timelocks(),
        },
        &clock,
        &config,
        &mut sink,
    )
    .unwrap();

    clock.0 = escrow.get().created_at + valid_timelocks().dst_withdrawal;
    let outcome = withdraw(&mut escrow, 0, &secret, clock.0, addr(2), &mut sink).unwrap();
    assert_eq!(outcome.token_recipient, addr(1)); // maker receives on dst withdraw
    assert_eq!(outcome.token.value(), 900_000_000);

    let rescue_at = escrow.get().immutables.timelocks.rescue_stage(escrow.get().created_at, false, &config);
    let rescue_outcome = rescue(escrow, 1, rescue_at, &config, addr(55), &mut sink).unwrap();
    assert_eq!(rescue_outcome.token.value(), 0);
    assert_eq!(rescue_outcome.safety_deposit.value(), 100_000_000);
    assert_eq!(rescue_outcome.safety_deposit_recipient, addr(55));
}

#[test]
fn wallet_rescue_returns_full_amount_at_boundary() {
    let clock = FixedClock(1_000_000);
    let mut sink = InMemoryEventSink::default();
    let config = EngineConfig::default();
    let hashlock = keccak(b"unused_secret_thirtytwo_bytes!!!");

    let wallet = Wallet::create(base_wallet_params(1, hashlock, 1_000_000_000, false, 0), &clock, &mut sink).unwrap();
    let rescue_at = wallet.get().timelocks.rescue_stage(wallet.get().created_at, true, &config);
    let maker = wallet.get().maker;
    let (recipient, residual) = Wallet::rescue(wallet, 0, rescue_at, &config, &mut sink).unwrap();

    assert_eq!(recipient, maker);
    assert_eq!(residual.value(), 1_000_000_000);
}

#[test]
fn dst_side_never_opens_a_public_cancel_stage() {
    let mut clock = FixedClock(1_000_000);
    let mut sink = InMemoryEventSink::default();
    let config = EngineConfig::default();
    let hashlock = keccak(b"cancel_path_secret_thirtytwobyte");

    let mut escrow = create_escrow_dst(
        CreateEscrowDstParams {
            id: 201,
            order_hash: [3u8; 32],
            hashlock,
            maker: addr(1),
            taker: addr(2),
            token_type: "ETH".into(),
            deposit: Balance::new(900_000_000),
            safety_deposit: Balance::new(100_000_000),
            timelocks: valid_timelocks(),
        },
        &clock,
        &config,
        &mut sink,
    )
    .unwrap();

    // Long past dst_cancellation: a non-taker still cannot cancel.
    clock.0 = escrow.get().created_at + valid_timelocks().dst_cancellation + 1_000_000_000;
    let err = cancel(&mut escrow, 0, clock.0, addr(99), &mut sink).unwrap_err();
    assert_eq!(err, SettlementError::Unauthorised);

    let outcome = cancel(&mut escrow, 0, clock.0, addr(2), &mut sink).unwrap();
    assert_eq!(outcome.token_recipient, addr(2));
}

/// Installs a real subscriber so the `tracing::info!`/`debug!` call sites in
/// `wallet`/`escrow`/`event` run through an actual layer instead of the
/// no-op default dispatcher, exercising `tracing-subscriber` end to end.
#[test]
fn tracing_subscriber_reports_wallet_and_escrow_lifecycle() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("escrow_settlement_core=debug")
        .with_test_writer()
        .try_init();

    let clock = FixedClock(1_000_000);
    let mut sink = InMemoryEventSink::default();
    let secret = b"trace_test_secret_thirtytwobytes".to_vec();
    let hashlock = keccak(&secret);

    let mut wallet = Wallet::create(base_wallet_params(1, hashlock, 1_000_000_000, false, 0), &clock, &mut sink).unwrap();
    assert!(wallet.get().is_active);

    let escrow = create_escrow_src(
        &mut wallet,
        0,
        CreateEscrowSrcParams {
            id: 100,
            secret_hashlock: hashlock,
            secret_index: 0,
            merkle_proof: vec![],
            taker: addr(2),
            making_amount: 1_000_000_000,
            taking_amount: 1_000_000_000,
            safety_deposit: Balance::new(100_000_000),
        },
        &clock,
        &mut sink,
    )
    .unwrap();

    assert_eq!(escrow.get().status, Status::Active);
    assert!(sink.events.iter().any(|e| matches!(e, Event::EscrowCreated(_))));
}
