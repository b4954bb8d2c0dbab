//! Token page refresh
//!
//! One `refresh()` re-fetches everything the token view shows. Scheduling and
//! cancellation belong to the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;

use crate::ports::{
    BackendApi, BackendError, CurveProgramClient, ThreadReply, TokenInfo, TradeHistoryEntry,
    WalletSigner,
};

/// Which secondary panel the view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshView {
    #[default]
    Thread,
    Trades,
}

/// Everything displayed for one token at one point in time
#[derive(Debug, Clone)]
pub struct TokenSnapshot {
    pub token: TokenInfo,
    /// Reply thread; only fetched in thread view with a connected wallet
    pub thread: Option<Vec<ThreadReply>>,
    /// Trade history; only fetched in trades view
    pub trades: Option<Vec<TradeHistoryEntry>>,
    /// Pool completion flag; only checked when a wallet key is present
    pub pool_complete: Option<bool>,
    pub fetched_at: DateTime<Utc>,
}

pub struct TokenRefresher {
    backend: Arc<dyn BackendApi>,
    curve: Arc<dyn CurveProgramClient>,
    wallet: Arc<dyn WalletSigner>,
    mint: Pubkey,
    quote_mint: Pubkey,
    user_id: Option<String>,
    view: RefreshView,
}

impl TokenRefresher {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        curve: Arc<dyn CurveProgramClient>,
        wallet: Arc<dyn WalletSigner>,
        mint: Pubkey,
        quote_mint: Pubkey,
    ) -> Self {
        Self {
            backend,
            curve,
            wallet,
            mint,
            quote_mint,
            user_id: None,
            view: RefreshView::default(),
        }
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn set_view(&mut self, view: RefreshView) {
        self.view = view;
    }

    pub fn view(&self) -> RefreshView {
        self.view
    }

    pub async fn refresh(&self) -> Result<TokenSnapshot, BackendError> {
        let user_id = self.user_id.as_deref();
        let token = self.backend.get_token(&self.mint, user_id).await?;

        let (thread, trades) = match self.view {
            RefreshView::Thread if self.wallet.is_connected() => {
                (Some(self.backend.get_thread(&self.mint, user_id).await?), None)
            }
            RefreshView::Thread => (None, None),
            RefreshView::Trades => (None, Some(self.backend.get_trade_history(&self.mint).await?)),
        };

        let pool_complete = match self.wallet.public_key() {
            Some(_) => match self.curve.is_pool_complete(&self.mint, &self.quote_mint).await {
                Ok(complete) => Some(complete),
                Err(e) => {
                    tracing::warn!(mint = %self.mint, "Pool completion check failed: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(TokenSnapshot {
            token,
            thread,
            trades,
            pool_complete,
            fetched_at: Utc::now(),
        })
    }
}
