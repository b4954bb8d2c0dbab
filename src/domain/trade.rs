use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

use super::error::TradeError;

/// Direction of a trade, from the point of view of the launchpad token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Spend quote (SOL) to receive the token
    Buy,
    /// Spend the token to receive quote (SOL)
    Sell,
}

impl TradeSide {
    pub fn is_buy(&self) -> bool {
        matches!(self, TradeSide::Buy)
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// Where a trade was executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    /// Bonding-curve program (curve still active)
    Curve,
    /// External DEX pool (curve complete, liquidity migrated)
    Dex,
}

/// A user-confirmed trade, consumed once by the router.
///
/// `amount` is denominated in quote (SOL) for buys and in the token for sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub token_mint: Pubkey,
    pub side: TradeSide,
    pub amount: Decimal,
    pub quote_mint: Pubkey,
    /// Free-text comment attached to the backend trade record (may be empty)
    #[serde(default)]
    pub comment: String,
}

impl TradeRequest {
    pub fn new(token_mint: Pubkey, side: TradeSide, amount: Decimal, quote_mint: Pubkey) -> Self {
        Self {
            token_mint,
            side,
            amount,
            quote_mint,
            comment: String::new(),
        }
    }

    pub fn buy(token_mint: Pubkey, amount: Decimal, quote_mint: Pubkey) -> Self {
        Self::new(token_mint, TradeSide::Buy, amount, quote_mint)
    }

    pub fn sell(token_mint: Pubkey, amount: Decimal, quote_mint: Pubkey) -> Self {
        Self::new(token_mint, TradeSide::Sell, amount, quote_mint)
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Amount must be strictly positive
    pub fn validate(&self) -> Result<(), TradeError> {
        if self.amount <= Decimal::ZERO {
            return Err(TradeError::InvalidAmount(format!(
                "amount must be > 0, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Outcome of a successfully routed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeResult {
    pub tx_hash: String,
    pub side: TradeSide,
    pub amount: Decimal,
    pub venue: Venue,
    /// Whether the backend holds a record of the trade; DEX swaps are never recorded
    pub recorded: bool,
}

/// Trade record persisted by the backend after a confirmed curve trade.
///
/// Amount attribution matches what the backend has always received:
/// buys carry the amount in `base_amount`, sells in `quote_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    #[serde(rename = "mintAddr")]
    pub mint: String,
    pub is_buy: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub quote_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_amount: Decimal,
    pub tx_hash: String,
    pub comment: String,
}

impl TradeRecord {
    pub fn for_request(request: &TradeRequest, tx_hash: &str) -> Self {
        let (quote_amount, base_amount) = match request.side {
            TradeSide::Buy => (Decimal::ZERO, request.amount),
            TradeSide::Sell => (request.amount, Decimal::ZERO),
        };

        Self {
            mint: request.token_mint.to_string(),
            is_buy: request.side.is_buy(),
            quote_amount,
            base_amount,
            tx_hash: tx_hash.to_string(),
            comment: request.comment.clone(),
        }
    }
}

impl fmt::Display for TradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let venue = match self.venue {
            Venue::Curve => "bonding curve",
            Venue::Dex => "DEX pool",
        };
        write!(f, "{} {} via {}: {}", self.side, self.amount, venue, self.tx_hash)
    }
}
