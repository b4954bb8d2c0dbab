//! Trade Routing Integration Tests
//!
//! Drives the router, desk and refresher through the public API against the
//! recording mocks, plus the real curve adapter reading pool accounts from a
//! mock chain. No network calls.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use solana_sdk::pubkey::Pubkey;

use curve_router::adapters::curve::program::{instruction_discriminator, pool_state_address, PoolAccount};
use curve_router::adapters::curve::{CurveProgram, DEVNET_PROGRAM_ID};
use curve_router::application::{RefreshView, TokenRefresher, TradeDesk, TradeRouter};
use curve_router::domain::{TradeError, TradeRecord, TradeRequest, Venue, QUOTE_DECIMALS, TOKEN_DECIMALS};
use curve_router::ports::mocks::{Call, CallLog, MockBackend, MockChain, MockCurve, MockSwap, MockWallet};
use curve_router::ports::{CurveProgramClient, TokenInfo};

// ============================================================================
// Fixtures
// ============================================================================

fn wsol() -> Pubkey {
    spl_token::native_mint::id()
}

struct Harness {
    log: CallLog,
    router: TradeRouter,
    chain: Arc<MockChain>,
    market_id: Pubkey,
}

fn harness_with(wallet: MockWallet, curve: Arc<dyn CurveProgramClient>, chain: MockChain, log: CallLog) -> Harness {
    let chain = Arc::new(chain);
    let backend = MockBackend::new(log.clone());
    let market_id = backend.market_id();
    let router = TradeRouter::new(
        Arc::new(wallet),
        chain.clone(),
        curve,
        Arc::new(MockSwap::new(log.clone())),
        Arc::new(backend),
    );
    Harness {
        log,
        router,
        chain,
        market_id,
    }
}

fn harness(curve: fn(CallLog) -> MockCurve) -> Harness {
    let log = CallLog::new();
    harness_with(
        MockWallet::new(log.clone()),
        Arc::new(curve(log.clone())),
        MockChain::new(log.clone()),
        log,
    )
}

fn is_curve_instruction(call: &Call) -> bool {
    matches!(call, Call::BuyInstruction { .. } | Call::SellInstruction { .. })
}

// ============================================================================
// Router properties
// ============================================================================

#[tokio::test]
async fn test_non_positive_amount_contacts_nobody() {
    let h = harness(MockCurve::active);
    let mint = Pubkey::new_unique();

    for amount in [dec!(0), dec!(-1), dec!(-0.5)] {
        let err = h.router.route(&TradeRequest::buy(mint, amount, wsol())).await.unwrap_err();
        assert!(matches!(err, TradeError::InvalidAmount(_)), "amount {}", amount);
    }
    assert!(h.log.is_empty());
}

#[tokio::test]
async fn test_disconnected_wallet_contacts_nobody() {
    let log = CallLog::new();
    let h = harness_with(
        MockWallet::new(log.clone()).disconnected(),
        Arc::new(MockCurve::active(log.clone())),
        MockChain::new(log.clone()),
        log,
    );

    let err = h
        .router
        .route(&TradeRequest::buy(Pubkey::new_unique(), dec!(1), wsol()))
        .await
        .unwrap_err();

    assert_eq!(err, TradeError::NotConnected);
    assert!(h.log.is_empty());
}

#[tokio::test]
async fn test_buy_on_curve_records_trade() {
    let h = harness(MockCurve::active);
    let mint = Pubkey::new_unique();
    let request = TradeRequest::buy(mint, dec!(1.0), wsol()).with_comment("first!");

    let result = h.router.route(&request).await.unwrap();

    assert_eq!(result.venue, Venue::Curve);
    assert!(result.recorded);
    assert_eq!(h.log.count(|c| *c == Call::Submit), 1);
    assert!(h.log.calls().contains(&Call::BuyInstruction {
        mint,
        amount: 1_000_000_000
    }));

    let records = h.log.records();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0],
        TradeRecord {
            mint: mint.to_string(),
            is_buy: true,
            quote_amount: Decimal::ZERO,
            base_amount: dec!(1.0),
            tx_hash: result.tx_hash.clone(),
            comment: "first!".to_string(),
        }
    );

    // The submitted transaction is the one the hash names, signed by the wallet
    let submitted = h.chain.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].signatures[0].to_string(), result.tx_hash);
    assert!(submitted[0].verify_with_results().iter().all(|ok| *ok));
}

#[tokio::test]
async fn test_buy_then_sell_swaps_record_fields() {
    let h = harness(MockCurve::active);
    let mint = Pubkey::new_unique();

    h.router.route(&TradeRequest::buy(mint, dec!(0.5), wsol())).await.unwrap();
    h.router.route(&TradeRequest::sell(mint, dec!(25000), wsol())).await.unwrap();

    let records = h.log.records();
    assert_eq!(records.len(), 2);

    assert!(records[0].is_buy);
    assert_eq!(records[0].quote_amount, Decimal::ZERO);
    assert_eq!(records[0].base_amount, dec!(0.5));

    assert!(!records[1].is_buy);
    assert_eq!(records[1].quote_amount, dec!(25000));
    assert_eq!(records[1].base_amount, Decimal::ZERO);

    assert!(h.log.calls().contains(&Call::SellInstruction {
        mint,
        amount: 25_000 * 10u64.pow(TOKEN_DECIMALS as u32)
    }));
}

#[tokio::test]
async fn test_complete_pool_goes_to_dex() {
    let h = harness(MockCurve::complete);
    let mint = Pubkey::new_unique();

    let result = h
        .router
        .route(&TradeRequest::buy(mint, dec!(1.0), wsol()))
        .await
        .unwrap();

    assert_eq!(result.venue, Venue::Dex);
    assert_eq!(result.tx_hash, "swap-tx-1");
    assert!(!result.recorded);
    assert_eq!(h.log.count(is_curve_instruction), 0);
    assert_eq!(h.log.count(|c| *c == Call::Submit), 0);
    assert!(h.log.records().is_empty());

    let swap = h
        .log
        .calls()
        .into_iter()
        .find(|c| matches!(c, Call::Swap { .. }))
        .unwrap();
    match swap {
        Call::Swap {
            input,
            output,
            market_id,
            is_buy,
        } => {
            assert_eq!(input.raw, 1_000_000_000);
            assert_eq!(input.token.mint, wsol());
            assert_eq!(input.token.decimals, QUOTE_DECIMALS);
            assert_eq!(output.mint, mint);
            assert_eq!(output.decimals, TOKEN_DECIMALS);
            assert_eq!(market_id, h.market_id);
            assert!(is_buy);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_sell_on_complete_pool_outputs_quote() {
    let h = harness(MockCurve::complete);
    let mint = Pubkey::new_unique();

    h.router.route(&TradeRequest::sell(mint, dec!(10), wsol())).await.unwrap();

    let swap = h.log.calls().into_iter().find(|c| matches!(c, Call::Swap { .. })).unwrap();
    assert_eq!(
        swap,
        Call::Swap {
            input: curve_router::domain::TokenAmount {
                token: curve_router::domain::TokenDescriptor {
                    mint,
                    decimals: TOKEN_DECIMALS
                },
                raw: 10_000_000,
            },
            output: curve_router::domain::TokenDescriptor {
                mint: wsol(),
                decimals: QUOTE_DECIMALS
            },
            market_id: h.market_id,
            is_buy: false,
        }
    );
}

#[tokio::test]
async fn test_missing_pool_is_not_submitted() {
    let h = harness(MockCurve::missing);
    let mint = Pubkey::new_unique();

    let err = h
        .router
        .route(&TradeRequest::buy(mint, dec!(1), wsol()))
        .await
        .unwrap_err();

    assert_eq!(err, TradeError::PoolNotFound(mint));
    assert_eq!(err.to_string(), format!("Pool not created for token '{}'", mint));
    assert_eq!(h.log.count(|c| *c == Call::Submit), 0);
    assert_eq!(h.log.count(is_curve_instruction), 0);
}

#[tokio::test]
async fn test_pool_state_is_never_cached() {
    let h = harness(MockCurve::active);
    let mint = Pubkey::new_unique();
    let request = TradeRequest::buy(mint, dec!(0.1), wsol());

    h.router.route(&request).await.unwrap();
    h.router.route(&request).await.unwrap();

    assert_eq!(h.log.count(|c| *c == Call::IsPoolComplete(mint)), 2);
    assert_eq!(h.log.count(|c| *c == Call::IsPoolCreated(mint)), 2);
}

// ============================================================================
// Real curve adapter over a mock chain
// ============================================================================

fn chain_with_pool(log: &CallLog, mint: Pubkey, complete: bool) -> MockChain {
    let pool = PoolAccount {
        owner: Pubkey::new_unique(),
        mint,
        quote_mint: wsol(),
        real_base_reserves: 793_100_000_000_000,
        virtual_base_reserves: 1_073_000_000_000_000,
        real_quote_reserves: 0,
        virtual_quote_reserves: 30_000_000_000,
        complete,
    };
    MockChain::new(log.clone()).with_account(
        pool_state_address(&DEVNET_PROGRAM_ID, &mint, &wsol()),
        pool.encode().unwrap(),
    )
}

#[tokio::test]
async fn test_curve_program_end_to_end() {
    let log = CallLog::new();
    let mint = Pubkey::new_unique();
    let chain: Arc<MockChain> = Arc::new(chain_with_pool(&log, mint, false));
    let curve = Arc::new(CurveProgram::new(DEVNET_PROGRAM_ID, chain.clone()));

    let backend = MockBackend::new(log.clone());
    let router = TradeRouter::new(
        Arc::new(MockWallet::new(log.clone())),
        chain.clone(),
        curve,
        Arc::new(MockSwap::new(log.clone())),
        Arc::new(backend),
    );

    let result = router
        .route(&TradeRequest::buy(mint, dec!(0.25), wsol()))
        .await
        .unwrap();
    assert_eq!(result.venue, Venue::Curve);

    let submitted = chain.submitted();
    assert_eq!(submitted.len(), 1);
    let message = &submitted[0].message;
    let instruction = &message.instructions()[0];
    let program = message.static_account_keys()[instruction.program_id_index as usize];
    assert_eq!(program, DEVNET_PROGRAM_ID);
    assert_eq!(&instruction.data[..8], &instruction_discriminator("buy"));
    assert_eq!(&instruction.data[8..], &250_000_000u64.to_le_bytes());
}

#[tokio::test]
async fn test_graduated_pool_account_routes_to_dex() {
    let log = CallLog::new();
    let mint = Pubkey::new_unique();
    let chain = chain_with_pool(&log, mint, true);
    let curve: Arc<dyn CurveProgramClient> = Arc::new(CurveProgram::new(DEVNET_PROGRAM_ID, Arc::new(chain)));
    let h = harness_with(MockWallet::new(log.clone()), curve, MockChain::new(log.clone()), log);

    let result = h.router.route(&TradeRequest::sell(mint, dec!(5), wsol())).await.unwrap();
    assert_eq!(result.venue, Venue::Dex);
    assert!(h.chain.submitted().is_empty());
}

#[tokio::test]
async fn test_uncreated_pool_account_is_not_found() {
    let log = CallLog::new();
    let mint = Pubkey::new_unique();
    let curve: Arc<dyn CurveProgramClient> =
        Arc::new(CurveProgram::new(DEVNET_PROGRAM_ID, Arc::new(MockChain::new(log.clone()))));
    let h = harness_with(MockWallet::new(log.clone()), curve, MockChain::new(log.clone()), log);

    let err = h.router.route(&TradeRequest::buy(mint, dec!(1), wsol())).await.unwrap_err();
    assert_eq!(err, TradeError::PoolNotFound(mint));
}

// ============================================================================
// Desk and refresher
// ============================================================================

#[tokio::test]
async fn test_desk_blocks_insufficient_cached_balance() {
    let h = harness(MockCurve::active);
    let log = h.log.clone();
    let desk = TradeDesk::new(h.router);
    let cached = TokenInfo {
        sol_balance: Some(dec!(0.5)),
        token_balance: Some(dec!(100)),
        ..Default::default()
    };

    let err = desk
        .place(&TradeRequest::buy(Pubkey::new_unique(), dec!(1), wsol()), Some(&cached))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        TradeError::InsufficientBalance {
            needed: dec!(1),
            available: dec!(0.5)
        }
    );
    assert!(log.is_empty());
    assert!(!desk.is_pending());

    // Selling is checked against the token balance instead
    desk.place(&TradeRequest::sell(Pubkey::new_unique(), dec!(100), wsol()), Some(&cached))
        .await
        .unwrap();
    assert!(!desk.is_pending());
}

#[tokio::test]
async fn test_desk_reports_unrecorded_curve_trade() {
    let log = CallLog::new();
    let chain = Arc::new(MockChain::new(log.clone()));
    let router = TradeRouter::new(
        Arc::new(MockWallet::new(log.clone())),
        chain.clone(),
        Arc::new(MockCurve::active(log.clone())),
        Arc::new(MockSwap::new(log.clone())),
        Arc::new(MockBackend::new(log.clone()).failing_record("503 Service Unavailable")),
    );
    let desk = TradeDesk::new(router);

    let err = desk
        .place(&TradeRequest::buy(Pubkey::new_unique(), dec!(1), wsol()), None)
        .await
        .unwrap_err();

    let landed = chain.submitted()[0].signatures[0].to_string();
    assert!(matches!(err, TradeError::RecordFailed { .. }));
    assert_eq!(err.confirmed_tx(), Some(landed.as_str()));
    assert_eq!(log.records().len(), 1);
    assert!(!desk.is_pending());
}

#[tokio::test]
async fn test_refresher_follows_view_and_wallet() {
    let log = CallLog::new();
    let mint = Pubkey::new_unique();
    let mut refresher = TokenRefresher::new(
        Arc::new(MockBackend::new(log.clone())),
        Arc::new(MockCurve::active(log.clone())),
        Arc::new(MockWallet::new(log.clone())),
        mint,
        wsol(),
    );

    let snapshot = refresher.refresh().await.unwrap();
    assert!(snapshot.thread.is_some());
    assert_eq!(snapshot.pool_complete, Some(false));

    log.clear();
    refresher.set_view(RefreshView::Trades);
    let snapshot = refresher.refresh().await.unwrap();
    assert!(snapshot.trades.is_some());
    assert_eq!(
        log.calls(),
        vec![
            Call::GetToken(mint),
            Call::GetTradeHistory(mint),
            Call::IsPoolComplete(mint)
        ]
    );
}
