//! Adapters Layer - External System Implementations
//!
//! Implementations of the port traits:
//! - Solana: RPC client and keypair wallet
//! - Curve: the launchpad bonding-curve program
//! - Jupiter: DEX swaps for graduated tokens
//! - Backend: the launchpad HTTP API
//! - CLI: command-line interface

pub mod backend;
pub mod cli;
pub mod curve;
pub mod http;
pub mod jupiter;
pub mod solana;

pub use backend::{BackendClient, BackendConfig};
pub use cli::CliApp;
pub use curve::CurveProgram;
pub use jupiter::{JupiterClient, JupiterConfig, JupiterSwap};
pub use solana::{SolanaClient, WalletManager};
