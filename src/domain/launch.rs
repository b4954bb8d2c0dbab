//! Token launch types
//!
//! A launch mints the full supply of a new token, opens its bonding-curve
//! pool and optionally buys into it, all in one transaction.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use super::error::TradeError;
use super::units::to_base_units;

/// Whole tokens minted for every launch
pub const TOKEN_TOTAL_SUPPLY: u64 = 1_000_000_000;

/// What the creator fills in for a new token
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaunchRequest {
    pub name: String,
    pub ticker: String,
    pub description: String,
    /// Already-hosted logo; uploading is out of scope
    pub image_url: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
    /// SOL spent on the creator's first buy; zero skips it
    pub initial_buy: Decimal,
}

impl LaunchRequest {
    pub fn new(name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    pub fn with_initial_buy(mut self, amount: Decimal) -> Self {
        self.initial_buy = amount;
        self
    }

    pub fn validate(&self) -> Result<(), TradeError> {
        if self.name.trim().is_empty() {
            return Err(TradeError::InvalidLaunch("No name!".to_string()));
        }
        if self.ticker.trim().is_empty() {
            return Err(TradeError::InvalidLaunch("No ticker!".to_string()));
        }
        if self.initial_buy < Decimal::ZERO {
            return Err(TradeError::InvalidAmount(format!(
                "initial buy must not be negative, got {}",
                self.initial_buy
            )));
        }
        Ok(())
    }

    /// Initial buy in quote base units, `None` when no buy was asked for
    pub fn initial_buy_raw(&self, quote_decimals: u8) -> Result<Option<u64>, TradeError> {
        if self.initial_buy.is_zero() {
            return Ok(None);
        }
        to_base_units(self.initial_buy, quote_decimals)
            .map(Some)
            .ok_or_else(|| {
                TradeError::InvalidAmount(format!(
                    "{} cannot be expressed in base units with {} decimals",
                    self.initial_buy, quote_decimals
                ))
            })
    }
}

/// Token details handed to the backend once the launch transaction lands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub name: String,
    pub ticker: String,
    pub desc: String,
    pub logo: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub website: Option<String>,
    pub mint_addr: String,
}

impl TokenMetadata {
    pub fn for_launch(request: &LaunchRequest, mint: &Pubkey) -> Self {
        Self {
            name: request.name.clone(),
            ticker: request.ticker.clone(),
            desc: request.description.clone(),
            logo: request.image_url.clone(),
            twitter: request.twitter.clone(),
            telegram: request.telegram.clone(),
            website: request.website.clone(),
            mint_addr: mint.to_string(),
        }
    }
}

/// Outcome of a confirmed launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchResult {
    pub mint: Pubkey,
    pub tx_hash: String,
    /// Lamports spent on the creator's first buy
    pub initial_buy: Option<u64>,
}

impl fmt::Display for LaunchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Created a new bonding curve for {}: {}", self.mint, self.tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QUOTE_DECIMALS;
    use rust_decimal_macros::dec;

    #[test]
    fn test_name_and_ticker_required() {
        assert_eq!(
            LaunchRequest::new("", "DMOON").validate(),
            Err(TradeError::InvalidLaunch("No name!".to_string()))
        );
        assert_eq!(
            LaunchRequest::new("Doge Moon", "  ").validate(),
            Err(TradeError::InvalidLaunch("No ticker!".to_string()))
        );
        assert!(LaunchRequest::new("Doge Moon", "DMOON").validate().is_ok());
    }

    #[test]
    fn test_initial_buy_is_optional() {
        let request = LaunchRequest::new("Doge Moon", "DMOON");
        assert_eq!(request.initial_buy_raw(QUOTE_DECIMALS), Ok(None));

        let request = request.with_initial_buy(dec!(0.5));
        assert_eq!(request.initial_buy_raw(QUOTE_DECIMALS), Ok(Some(500_000_000)));
    }

    #[test]
    fn test_negative_or_dust_initial_buy_rejected() {
        let negative = LaunchRequest::new("Doge Moon", "DMOON").with_initial_buy(dec!(-1));
        assert!(matches!(negative.validate(), Err(TradeError::InvalidAmount(_))));

        let dust = LaunchRequest::new("Doge Moon", "DMOON").with_initial_buy(dec!(0.0000000001));
        assert!(matches!(dust.initial_buy_raw(QUOTE_DECIMALS), Err(TradeError::InvalidAmount(_))));
    }

    #[test]
    fn test_metadata_payload_shape() {
        let mint = Pubkey::new_unique();
        let mut request = LaunchRequest::new("Doge Moon", "DMOON");
        request.description = "to the moon".to_string();
        request.website = Some("https://doge.moon".to_string());

        let json = serde_json::to_value(TokenMetadata::for_launch(&request, &mint)).unwrap();
        assert_eq!(json["mintAddr"], mint.to_string());
        assert_eq!(json["desc"], "to the moon");
        assert_eq!(json["website"], "https://doge.moon");
        assert!(json["telegram"].is_null());
    }
}
