//! Token Launcher
//!
//! Creates a token and its bonding-curve pool in one transaction: mint the
//! full supply to the creator, hand it to a new pool, optionally buy into the
//! pool straight away, then register the token with the backend.

use std::sync::Arc;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use crate::domain::{
    partial_sign, to_base_units, LaunchRequest, LaunchResult, PairDecimals, TokenMetadata, TradeError,
    TransactionPlan, TOKEN_TOTAL_SUPPLY,
};
use crate::ports::{BackendApi, ChainClient, CurveProgramClient, WalletSigner};

pub struct TokenLauncher {
    wallet: Arc<dyn WalletSigner>,
    chain: Arc<dyn ChainClient>,
    curve: Arc<dyn CurveProgramClient>,
    backend: Arc<dyn BackendApi>,
    quote_mint: Pubkey,
    decimals: PairDecimals,
}

impl TokenLauncher {
    pub fn new(
        wallet: Arc<dyn WalletSigner>,
        chain: Arc<dyn ChainClient>,
        curve: Arc<dyn CurveProgramClient>,
        backend: Arc<dyn BackendApi>,
    ) -> Self {
        Self {
            wallet,
            chain,
            curve,
            backend,
            quote_mint: spl_token::native_mint::id(),
            decimals: PairDecimals::default(),
        }
    }

    pub fn with_decimals(mut self, decimals: PairDecimals) -> Self {
        self.decimals = decimals;
        self
    }

    /// Launch `request` under the address of `mint`.
    ///
    /// `mint` is a fresh keypair; it co-signs the transaction because the
    /// mint account is created in it.
    pub async fn launch(&self, request: &LaunchRequest, mint: &Keypair) -> Result<LaunchResult, TradeError> {
        request.validate()?;
        let initial_buy = request.initial_buy_raw(self.decimals.quote)?;
        let supply = to_base_units(TOKEN_TOTAL_SUPPLY.into(), self.decimals.token).ok_or_else(|| {
            TradeError::InvalidAmount(format!(
                "total supply {} overflows with {} decimals",
                TOKEN_TOTAL_SUPPLY, self.decimals.token
            ))
        })?;

        if !self.wallet.is_connected() {
            return Err(TradeError::NotConnected);
        }
        let creator = self.wallet.public_key().ok_or(TradeError::NotConnected)?;

        if !self.curve.is_initialized().await? {
            return Err(TradeError::ProgramNotInitialized);
        }

        let mint_address = mint.pubkey();
        tracing::info!(mint = %mint_address, name = %request.name, ticker = %request.ticker, "Creating token");

        let mut plan = TransactionPlan::new(creator);
        for instruction in self.curve.mint_instructions(&creator, &mint_address, supply).await? {
            plan.push(instruction);
        }
        plan.push(
            self.curve
                .create_pool_instruction(&creator, &mint_address, &self.quote_mint, supply, 0)
                .await?,
        );
        if let Some(lamports) = initial_buy {
            tracing::debug!(lamports, "Adding initial buy");
            plan.push(
                self.curve
                    .buy_instruction(&creator, &mint_address, &self.quote_mint, lamports)
                    .await?,
            );
        }

        let blockhash = self.chain.finalized_blockhash().await?;
        let mut unsigned = plan.compile(blockhash)?;
        partial_sign(&mut unsigned, mint)?;
        let signed = self.wallet.sign_transaction(unsigned).await?;
        let tx_hash = self.chain.submit(&signed).await?;
        tracing::info!(tx = %tx_hash, mint = %mint_address, "Token created");

        let metadata = TokenMetadata::for_launch(request, &mint_address);
        if let Err(e) = self.backend.update_token(&metadata).await {
            tracing::error!(tx = %tx_hash, "Token created but backend registration failed: {}", e);
            return Err(TradeError::RecordFailed {
                tx_hash,
                message: format!("Failed to update token info! {}", e),
            });
        }

        Ok(LaunchResult {
            mint: mint_address,
            tx_hash,
            initial_buy,
        })
    }
}
