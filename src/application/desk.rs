//! Trade Desk
//!
//! Caller-facing entry point for placing trades. Performs the pre-checks the
//! trade dialog does (connection, amount, cached balance) and exposes a single
//! pending flag so callers can disable re-submission while a trade is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;

use super::router::TradeRouter;
use crate::domain::{TradeError, TradeRequest, TradeResult, TradeSide};
use crate::ports::TokenInfo;

pub struct TradeDesk {
    router: TradeRouter,
    pending: Arc<AtomicBool>,
}

/// Clears the pending flag on every exit path
struct PendingGuard(Arc<AtomicBool>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl TradeDesk {
    pub fn new(router: TradeRouter) -> Self {
        Self {
            router,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn router(&self) -> &TradeRouter {
        &self.router
    }

    /// Place a trade after the display-level checks.
    ///
    /// `cached` is the last token snapshot the caller displayed; its balances
    /// are not re-verified on-chain.
    pub async fn place(
        &self,
        request: &TradeRequest,
        cached: Option<&TokenInfo>,
    ) -> Result<TradeResult, TradeError> {
        if !self.router.wallet().is_connected() {
            return Err(TradeError::NotConnected);
        }
        request.validate()?;
        check_cached_balance(request, cached)?;

        if self
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(TradeError::TradeInFlight);
        }
        let _guard = PendingGuard(Arc::clone(&self.pending));

        tracing::info!(mint = %request.token_mint, "Trading {} {}...", request.side, request.amount);
        let result = self.router.route(request).await;
        if let Err(ref e) = result {
            tracing::warn!(mint = %request.token_mint, "Trade failed: {}", e);
        }
        result
    }
}

fn check_cached_balance(request: &TradeRequest, cached: Option<&TokenInfo>) -> Result<(), TradeError> {
    let available: Option<Decimal> = cached.and_then(|info| match request.side {
        TradeSide::Buy => info.sol_balance,
        TradeSide::Sell => info.token_balance,
    });

    match available {
        Some(available) if available < request.amount => Err(TradeError::InsufficientBalance {
            needed: request.amount,
            available,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::{Call, CallLog, MockBackend, MockChain, MockCurve, MockSwap, MockWallet};
    use rust_decimal_macros::dec;
    use solana_sdk::pubkey::Pubkey;

    fn desk(log: &CallLog, wallet: MockWallet) -> TradeDesk {
        TradeDesk::new(TradeRouter::new(
            Arc::new(wallet),
            Arc::new(MockChain::new(log.clone())),
            Arc::new(MockCurve::active(log.clone())),
            Arc::new(MockSwap::new(log.clone())),
            Arc::new(MockBackend::new(log.clone())),
        ))
    }

    fn cached(sol: Decimal, token: Decimal) -> TokenInfo {
        TokenInfo {
            sol_balance: Some(sol),
            token_balance: Some(token),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insufficient_sol_blocks_buy() {
        let log = CallLog::new();
        let desk = desk(&log, MockWallet::new(log.clone()));
        let request = TradeRequest::buy(Pubkey::new_unique(), dec!(2), Pubkey::new_unique());

        let err = desk.place(&request, Some(&cached(dec!(1.5), dec!(0)))).await.unwrap_err();

        assert_eq!(
            err,
            TradeError::InsufficientBalance {
                needed: dec!(2),
                available: dec!(1.5)
            }
        );
        assert!(log.is_empty());
        assert!(!desk.is_pending());
    }

    #[tokio::test]
    async fn test_sell_checks_token_balance() {
        let log = CallLog::new();
        let desk = desk(&log, MockWallet::new(log.clone()));
        let request = TradeRequest::sell(Pubkey::new_unique(), dec!(500), Pubkey::new_unique());

        // plenty of SOL, not enough tokens
        let err = desk.place(&request, Some(&cached(dec!(100), dec!(499)))).await.unwrap_err();
        assert!(matches!(err, TradeError::InsufficientBalance { .. }));

        let ok = desk.place(&request, Some(&cached(dec!(0), dec!(500)))).await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_balance_is_not_blocking() {
        let log = CallLog::new();
        let desk = desk(&log, MockWallet::new(log.clone()));
        let request = TradeRequest::buy(Pubkey::new_unique(), dec!(1), Pubkey::new_unique());

        assert!(desk.place(&request, None).await.is_ok());
        assert!(desk.place(&request, Some(&TokenInfo::default())).await.is_ok());
    }

    #[tokio::test]
    async fn test_disconnected_wallet() {
        let log = CallLog::new();
        let desk = desk(&log, MockWallet::new(log.clone()).disconnected());
        let request = TradeRequest::buy(Pubkey::new_unique(), dec!(1), Pubkey::new_unique());

        assert_eq!(desk.place(&request, None).await.unwrap_err(), TradeError::NotConnected);
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_pending_flag_cleared_after_failure() {
        let log = CallLog::new();
        let desk = desk(&log, MockWallet::new(log.clone()).rejecting());
        let request = TradeRequest::buy(Pubkey::new_unique(), dec!(1), Pubkey::new_unique());

        let err = desk.place(&request, None).await.unwrap_err();

        assert!(matches!(err, TradeError::SignatureRejected(_)));
        assert!(!desk.is_pending());
        assert_eq!(log.count(|c| matches!(c, Call::Sign)), 1);
    }

    #[tokio::test]
    async fn test_pending_flag_refuses_second_trade() {
        let log = CallLog::new();
        let desk = desk(&log, MockWallet::new(log.clone()));
        desk.pending.store(true, Ordering::SeqCst);
        let request = TradeRequest::buy(Pubkey::new_unique(), dec!(1), Pubkey::new_unique());

        assert_eq!(desk.place(&request, None).await.unwrap_err(), TradeError::TradeInFlight);
        assert!(log.is_empty());
    }
}
