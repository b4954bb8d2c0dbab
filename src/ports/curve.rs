use async_trait::async_trait;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use thiserror::Error;

use super::chain::ChainError;
use crate::domain::{PoolState, TradeError};

#[derive(Debug, Error)]
pub enum CurveError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("Invalid pool account: {0}")]
    InvalidPoolAccount(String),
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),
}

/// Client for the bonding-curve launchpad program
#[async_trait]
pub trait CurveProgramClient: Send + Sync {
    async fn is_pool_created(&self, mint: &Pubkey, quote_mint: &Pubkey) -> Result<bool, CurveError>;

    /// True once the curve has finished and liquidity moved to the DEX
    async fn is_pool_complete(&self, mint: &Pubkey, quote_mint: &Pubkey) -> Result<bool, CurveError>;

    /// Buy `quote_amount` base units worth of `mint`
    async fn buy_instruction(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        quote_mint: &Pubkey,
        quote_amount: u64,
    ) -> Result<Instruction, CurveError>;

    /// Sell `token_amount` base units of `mint`
    async fn sell_instruction(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        quote_mint: &Pubkey,
        token_amount: u64,
    ) -> Result<Instruction, CurveError>;

    /// Whether the program's global state exists; launches need it
    async fn is_initialized(&self) -> Result<bool, CurveError>;

    /// Create `mint` and mint `supply` base units to the creator
    async fn mint_instructions(&self, creator: &Pubkey, mint: &Pubkey, supply: u64) -> Result<Vec<Instruction>, CurveError>;

    /// Open the pool, moving `base_amount` of the creator's tokens into it
    async fn create_pool_instruction(
        &self,
        creator: &Pubkey,
        mint: &Pubkey,
        quote_mint: &Pubkey,
        base_amount: u64,
        quote_amount: u64,
    ) -> Result<Instruction, CurveError>;

    /// Both flags at once, for status displays
    async fn pool_state(&self, mint: &Pubkey, quote_mint: &Pubkey) -> Result<PoolState, CurveError> {
        let exists = self.is_pool_created(mint, quote_mint).await?;
        if !exists {
            return Ok(PoolState::missing());
        }
        let is_complete = self.is_pool_complete(mint, quote_mint).await?;
        Ok(PoolState { exists, is_complete })
    }
}

impl From<CurveError> for TradeError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::Chain(e) => e.into(),
            other => TradeError::Unknown(other.to_string()),
        }
    }
}
