//! Launch and Board Integration Tests
//!
//! Token creation through the real curve adapter over a mock chain, and the
//! board listing through the backend port.

use std::sync::Arc;

use rust_decimal_macros::dec;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use curve_router::adapters::cli::render_board;
use curve_router::adapters::curve::program::{instruction_discriminator, main_state_address};
use curve_router::adapters::curve::{CurveProgram, DEVNET_PROGRAM_ID};
use curve_router::application::TokenLauncher;
use curve_router::domain::{LaunchRequest, TradeError, TOKEN_TOTAL_SUPPLY};
use curve_router::ports::mocks::{Call, CallLog, MockBackend, MockChain, MockWallet};
use curve_router::ports::{BackendApi, SortOrder, TokenInfo, TokenQuery, TokenSort};

fn initialized_chain(log: &CallLog) -> MockChain {
    MockChain::new(log.clone()).with_account(main_state_address(&DEVNET_PROGRAM_ID), vec![0u8; 64])
}

#[tokio::test]
async fn test_launch_builds_one_transaction_with_pool_and_buy() {
    let log = CallLog::new();
    let chain = Arc::new(initialized_chain(&log));
    let launcher = TokenLauncher::new(
        Arc::new(MockWallet::new(log.clone())),
        chain.clone(),
        Arc::new(CurveProgram::new(DEVNET_PROGRAM_ID, chain.clone())),
        Arc::new(MockBackend::new(log.clone())),
    );
    let mint = Keypair::new();
    let request = LaunchRequest::new("Doge Moon", "DMOON").with_initial_buy(dec!(1));

    let result = launcher.launch(&request, &mint).await.unwrap();

    let submitted = chain.submitted();
    assert_eq!(submitted.len(), 1);
    let tx = &submitted[0];
    assert!(tx.verify_with_results().iter().all(|ok| *ok));
    assert_eq!(tx.signatures[0].to_string(), result.tx_hash);

    let keys = tx.message.static_account_keys();
    let program_data: Vec<&[u8]> = tx
        .message
        .instructions()
        .iter()
        .filter(|ix| keys[ix.program_id_index as usize] == DEVNET_PROGRAM_ID)
        .map(|ix| ix.data.as_slice())
        .collect();
    assert_eq!(program_data.len(), 2);
    assert_eq!(&program_data[0][..8], &instruction_discriminator("create_pool"));
    assert_eq!(&program_data[0][8..16], &(TOKEN_TOTAL_SUPPLY * 1_000_000).to_le_bytes());
    assert_eq!(&program_data[1][..8], &instruction_discriminator("buy"));
    assert_eq!(&program_data[1][8..], &1_000_000_000u64.to_le_bytes());

    let updates: Vec<_> = log
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::UpdateToken(metadata) => Some(metadata),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].mint_addr, mint.pubkey().to_string());
    assert_eq!(updates[0].ticker, "DMOON");
}

#[tokio::test]
async fn test_launch_without_buy_has_single_program_instruction() {
    let log = CallLog::new();
    let chain = Arc::new(initialized_chain(&log));
    let launcher = TokenLauncher::new(
        Arc::new(MockWallet::new(log.clone())),
        chain.clone(),
        Arc::new(CurveProgram::new(DEVNET_PROGRAM_ID, chain.clone())),
        Arc::new(MockBackend::new(log.clone())),
    );

    let result = launcher
        .launch(&LaunchRequest::new("Cat Coin", "CAT"), &Keypair::new())
        .await
        .unwrap();

    assert!(result.initial_buy.is_none());
    let tx = &chain.submitted()[0];
    let keys = tx.message.static_account_keys();
    let program_calls = tx
        .message
        .instructions()
        .iter()
        .filter(|ix| keys[ix.program_id_index as usize] == DEVNET_PROGRAM_ID)
        .count();
    assert_eq!(program_calls, 1);
}

#[tokio::test]
async fn test_launch_needs_connected_wallet() {
    let log = CallLog::new();
    let chain = Arc::new(initialized_chain(&log));
    let launcher = TokenLauncher::new(
        Arc::new(MockWallet::new(log.clone()).disconnected()),
        chain.clone(),
        Arc::new(CurveProgram::new(DEVNET_PROGRAM_ID, chain.clone())),
        Arc::new(MockBackend::new(log.clone())),
    );

    let err = launcher
        .launch(&LaunchRequest::new("Cat Coin", "CAT"), &Keypair::new())
        .await
        .unwrap_err();

    assert_eq!(err, TradeError::NotConnected);
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_board_lists_king_and_tokens() {
    let log = CallLog::new();
    let king = TokenInfo {
        name: "Doge Moon".to_string(),
        ticker: "DMOON".to_string(),
        mint_addr: Pubkey::new_unique().to_string(),
        ..Default::default()
    };
    let listed = vec![
        TokenInfo {
            name: "Cat Coin".to_string(),
            ticker: "CAT".to_string(),
            ..Default::default()
        },
        king.clone(),
    ];
    let backend = MockBackend::new(log.clone()).with_board(listed, Some(king));
    let query = TokenQuery {
        name: "o".to_string(),
        sort: TokenSort::ReplyCount,
        order: SortOrder::Desc,
        include_nsfw: false,
    };

    let king = backend.get_king().await.unwrap();
    let tokens = backend.find_tokens(&query).await.unwrap();

    assert_eq!(log.calls(), vec![Call::GetKing, Call::FindTokens(query)]);
    let text = render_board(king.as_ref(), &tokens);
    assert!(text.starts_with("KING OF THE HILL"));
    assert!(text.contains("[CAT]"));
}
