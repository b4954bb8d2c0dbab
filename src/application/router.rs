//! Trade Router
//!
//! Picks the execution venue for a trade and drives it to a confirmed result.
//! While the bonding curve is active, trades go to the curve program; once the
//! curve completes and liquidity migrates, they go through the DEX swap.

use std::sync::Arc;

use crate::domain::{
    PairDecimals, TradeError, TradeLeg, TradeRecord, TradeRequest, TradeResult, TradeSide,
    TransactionPlan, Venue,
};
use crate::ports::{BackendApi, ChainClient, CurveProgramClient, SwapClient, WalletSigner};

/// Routes each trade to the bonding curve or the DEX pool.
///
/// Stateless between calls: pool state is queried on every `route`.
#[derive(Clone)]
pub struct TradeRouter {
    wallet: Arc<dyn WalletSigner>,
    chain: Arc<dyn ChainClient>,
    curve: Arc<dyn CurveProgramClient>,
    swap: Arc<dyn SwapClient>,
    backend: Arc<dyn BackendApi>,
    decimals: PairDecimals,
}

impl TradeRouter {
    pub fn new(
        wallet: Arc<dyn WalletSigner>,
        chain: Arc<dyn ChainClient>,
        curve: Arc<dyn CurveProgramClient>,
        swap: Arc<dyn SwapClient>,
        backend: Arc<dyn BackendApi>,
    ) -> Self {
        Self {
            wallet,
            chain,
            curve,
            swap,
            backend,
            decimals: PairDecimals::default(),
        }
    }

    pub fn with_decimals(mut self, decimals: PairDecimals) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn wallet(&self) -> &Arc<dyn WalletSigner> {
        &self.wallet
    }

    /// Execute one trade.
    ///
    /// Amount and connection are checked before any collaborator is contacted.
    pub async fn route(&self, request: &TradeRequest) -> Result<TradeResult, TradeError> {
        request.validate()?;
        let leg = TradeLeg::for_request(request, self.decimals)?;

        if !self.wallet.is_connected() {
            return Err(TradeError::NotConnected);
        }
        let payer = self.wallet.public_key().ok_or(TradeError::NotConnected)?;

        let complete = self
            .curve
            .is_pool_complete(&request.token_mint, &request.quote_mint)
            .await?;

        if complete {
            tracing::info!(mint = %request.token_mint, "Bonding curve complete, routing {} via DEX", request.side);
            return self.route_dex(request, leg).await;
        }

        let created = self
            .curve
            .is_pool_created(&request.token_mint, &request.quote_mint)
            .await?;
        if !created {
            return Err(TradeError::PoolNotFound(request.token_mint));
        }

        self.route_curve(request, leg, payer).await
    }

    async fn route_dex(&self, request: &TradeRequest, leg: TradeLeg) -> Result<TradeResult, TradeError> {
        let market_id = self
            .backend
            .get_market_id(&request.token_mint, &request.quote_mint)
            .await?;
        tracing::debug!(%market_id, raw = leg.input.raw, "Swapping on DEX");

        let hashes = self
            .swap
            .swap(
                self.wallet.as_ref(),
                leg.input,
                leg.output,
                &market_id,
                request.side.is_buy(),
            )
            .await?;
        tracing::info!("Swap complete: {:?}", hashes);

        let tx_hash = hashes
            .into_iter()
            .next()
            .ok_or_else(|| TradeError::SubmissionFailed("swap returned no transaction".to_string()))?;

        // DEX trades are not recorded with the backend.
        tracing::debug!(tx = %tx_hash, "Skipping backend trade record for DEX swap");

        Ok(TradeResult {
            tx_hash,
            side: request.side,
            amount: request.amount,
            venue: Venue::Dex,
            recorded: false,
        })
    }

    async fn route_curve(
        &self,
        request: &TradeRequest,
        leg: TradeLeg,
        payer: solana_sdk::pubkey::Pubkey,
    ) -> Result<TradeResult, TradeError> {
        let instruction = match request.side {
            TradeSide::Buy => {
                self.curve
                    .buy_instruction(&payer, &request.token_mint, &request.quote_mint, leg.input.raw)
                    .await?
            }
            TradeSide::Sell => {
                self.curve
                    .sell_instruction(&payer, &request.token_mint, &request.quote_mint, leg.input.raw)
                    .await?
            }
        };

        let mut plan = TransactionPlan::new(payer);
        plan.push(instruction);

        let blockhash = self.chain.latest_blockhash().await?;
        let unsigned = plan.compile(blockhash)?;
        let signed = self.wallet.sign_transaction(unsigned).await?;
        let tx_hash = self.chain.submit(&signed).await?;
        tracing::info!(tx = %tx_hash, mint = %request.token_mint, "Trade complete: {} {}", request.side, request.amount);

        let record = TradeRecord::for_request(request, &tx_hash);
        if let Err(e) = self.backend.record_trade(&record).await {
            tracing::error!(tx = %tx_hash, "Trade confirmed but backend record failed: {}", e);
            return Err(TradeError::RecordFailed {
                tx_hash,
                message: e.to_string(),
            });
        }

        Ok(TradeResult {
            tx_hash,
            side: request.side,
            amount: request.amount,
            venue: Venue::Curve,
            recorded: true,
        })
    }
}
