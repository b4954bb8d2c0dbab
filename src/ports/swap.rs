use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use super::chain::ChainError;
use super::wallet::{WalletError, WalletSigner};
use crate::domain::{TokenAmount, TokenDescriptor, TradeError};

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("API request failed: {0}")]
    ApiError(String),
    #[error("No route: {0}")]
    NoRoute(String),
    #[error("Slippage tolerance exceeded")]
    SlippageExceeded,
    #[error("Invalid swap transaction: {0}")]
    InvalidTransaction(String),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// DEX swap execution for pools that left the bonding curve
#[async_trait]
pub trait SwapClient: Send + Sync {
    /// Build, sign and submit the swap; returns the submitted transaction hashes in order.
    async fn swap(
        &self,
        wallet: &dyn WalletSigner,
        input: TokenAmount,
        output: TokenDescriptor,
        market_id: &Pubkey,
        is_buy: bool,
    ) -> Result<Vec<String>, SwapError>;
}

impl From<SwapError> for TradeError {
    fn from(err: SwapError) -> Self {
        match err {
            SwapError::Wallet(e) => e.into(),
            SwapError::Chain(e) => e.into(),
            other => TradeError::Unknown(other.to_string()),
        }
    }
}
