//! DEX swap execution for graduated pools

use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};

use super::client::JupiterClient;
use super::quote::{QuoteRequest, QuoteResponse};
use super::swap::SwapRequest;
use crate::domain::{TokenAmount, TokenDescriptor};
use crate::ports::{ChainClient, SwapClient, SwapError, WalletError, WalletSigner};

/// [`SwapClient`] that quotes and builds through Jupiter, then signs with the
/// user's wallet and submits through the chain port.
pub struct JupiterSwap {
    client: JupiterClient,
    chain: Arc<dyn ChainClient>,
}

impl JupiterSwap {
    pub fn new(client: JupiterClient, chain: Arc<dyn ChainClient>) -> Self {
        Self { client, chain }
    }
}

#[async_trait]
impl SwapClient for JupiterSwap {
    async fn swap(
        &self,
        wallet: &dyn WalletSigner,
        input: TokenAmount,
        output: TokenDescriptor,
        market_id: &Pubkey,
        is_buy: bool,
    ) -> Result<Vec<String>, SwapError> {
        let user = wallet.public_key().ok_or(WalletError::NotConnected)?;

        let request = QuoteRequest::new(&input, &output, self.client.config().slippage_bps);
        let quote = self.client.get_quote(&request).await?;

        check_route(&quote, &input, &output, market_id)?;

        info!(
            side = if is_buy { "buy" } else { "sell" },
            in_amount = input.raw,
            out_amount = quote.output_amount(),
            min_out = quote.min_output_amount(),
            "Swapping on DEX"
        );

        let quote_json =
            serde_json::to_value(&quote).map_err(|e| SwapError::ApiError(format!("quote encoding: {}", e)))?;
        let swap_request = SwapRequest::new(user.to_string(), quote_json)
            .with_priority_fee(self.client.config().priority_fee_lamports);

        let built = self.client.get_swap_transaction(&swap_request).await?;
        let transaction = built.transaction()?;

        let signed = wallet.sign_transaction(transaction).await?;
        let signature = self.chain.submit(&signed).await?;

        info!(%signature, "DEX swap confirmed");
        Ok(vec![signature])
    }
}

/// Only a direct route through the pair's own market is accepted.
fn check_route(
    quote: &QuoteResponse,
    input: &TokenAmount,
    output: &TokenDescriptor,
    market_id: &Pubkey,
) -> Result<(), SwapError> {
    if quote.route_plan.is_empty() {
        return Err(SwapError::NoRoute(format!("{} -> {}", input.mint(), output.mint)));
    }
    if !quote.routes_through(market_id) {
        warn!(%market_id, venues = ?quote.venues(), "Route does not use the pool's market");
        return Err(SwapError::NoRoute(format!(
            "{} -> {} does not go through market {}",
            input.mint(),
            output.mint,
            market_id
        )));
    }
    Ok(())
}
