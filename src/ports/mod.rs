//! Ports Layer - Trait definitions for external collaborators
//!
//! Following hexagonal architecture, the router only sees these traits:
//! - `WalletSigner`: connected wallet, public key, transaction signing
//! - `ChainClient`: blockhash, submission, account reads
//! - `CurveProgramClient`: bonding-curve pool status, launch and buy/sell instructions
//! - `SwapClient`: DEX swaps after the curve completes
//! - `BackendApi`: trade records, token registration and display data

pub mod backend;
pub mod chain;
pub mod curve;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod swap;
pub mod wallet;

pub use backend::{
    BackendApi, BackendError, Following, HolderShare, SortOrder, ThreadReply, TokenInfo, TokenQuery, TokenSort,
    TradeHistoryEntry,
};
pub use chain::{ChainClient, ChainError};
pub use curve::{CurveError, CurveProgramClient};
pub use swap::{SwapClient, SwapError};
pub use wallet::{WalletError, WalletSigner};
