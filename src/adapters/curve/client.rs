//! Chain-backed launchpad client
//!
//! Reads pool state accounts through the chain port and builds trade
//! instructions locally. Pool flags are read fresh on every call.

use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;

use super::program::{
    create_pool_instruction, main_state_address, mint_token_instructions, pool_state_address, trade_instruction,
    PoolAccount,
};
use crate::domain::{TradeSide, TOKEN_DECIMALS};
use crate::ports::{ChainClient, CurveError, CurveProgramClient};

pub struct CurveProgram {
    program_id: Pubkey,
    chain: Arc<dyn ChainClient>,
    token_decimals: u8,
}

impl CurveProgram {
    pub fn new(program_id: Pubkey, chain: Arc<dyn ChainClient>) -> Self {
        Self {
            program_id,
            chain,
            token_decimals: TOKEN_DECIMALS,
        }
    }

    /// Decimals given to newly minted tokens
    pub fn with_token_decimals(mut self, decimals: u8) -> Self {
        self.token_decimals = decimals;
        self
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Decoded pool account, `None` when it has not been created
    pub async fn fetch_pool(&self, mint: &Pubkey, quote_mint: &Pubkey) -> Result<Option<PoolAccount>, CurveError> {
        let address = pool_state_address(&self.program_id, mint, quote_mint);
        let data = self.chain.account_data(&address).await?;

        match data {
            Some(bytes) => {
                let pool = PoolAccount::decode(&bytes)?;
                debug!(%mint, %address, complete = pool.complete, "Loaded pool state");
                Ok(Some(pool))
            }
            None => {
                debug!(%mint, %address, "No pool state account");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl CurveProgramClient for CurveProgram {
    async fn is_pool_created(&self, mint: &Pubkey, quote_mint: &Pubkey) -> Result<bool, CurveError> {
        Ok(self.fetch_pool(mint, quote_mint).await?.is_some())
    }

    async fn is_pool_complete(&self, mint: &Pubkey, quote_mint: &Pubkey) -> Result<bool, CurveError> {
        Ok(self
            .fetch_pool(mint, quote_mint)
            .await?
            .map(|pool| pool.complete)
            .unwrap_or(false))
    }

    async fn is_initialized(&self) -> Result<bool, CurveError> {
        let address = main_state_address(&self.program_id);
        let exists = self.chain.account_data(&address).await?.is_some();
        debug!(program = %self.program_id, %address, exists, "Checked main state");
        Ok(exists)
    }

    async fn mint_instructions(&self, creator: &Pubkey, mint: &Pubkey, supply: u64) -> Result<Vec<Instruction>, CurveError> {
        mint_token_instructions(creator, mint, self.token_decimals, supply)
    }

    async fn create_pool_instruction(
        &self,
        creator: &Pubkey,
        mint: &Pubkey,
        quote_mint: &Pubkey,
        base_amount: u64,
        quote_amount: u64,
    ) -> Result<Instruction, CurveError> {
        Ok(create_pool_instruction(
            &self.program_id,
            creator,
            mint,
            quote_mint,
            base_amount,
            quote_amount,
        ))
    }

    async fn buy_instruction(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        quote_mint: &Pubkey,
        quote_amount: u64,
    ) -> Result<Instruction, CurveError> {
        Ok(trade_instruction(&self.program_id, TradeSide::Buy, user, mint, quote_mint, quote_amount))
    }

    async fn sell_instruction(
        &self,
        user: &Pubkey,
        mint: &Pubkey,
        quote_mint: &Pubkey,
        token_amount: u64,
    ) -> Result<Instruction, CurveError> {
        Ok(trade_instruction(&self.program_id, TradeSide::Sell, user, mint, quote_mint, token_amount))
    }
}
