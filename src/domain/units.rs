//! Amount units
//!
//! Every decimal → base-unit conversion goes through this module. Buys are
//! denominated in the quote token (SOL, 9 decimals), sells in the launchpad
//! token (6 decimals).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use super::error::TradeError;
use super::trade::{TradeRequest, TradeSide};

/// Decimals of native SOL / wrapped SOL
pub const QUOTE_DECIMALS: u8 = 9;

/// Decimals of every token minted by the launchpad
pub const TOKEN_DECIMALS: u8 = 6;

/// Decimal places of the two sides of a launchpad pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDecimals {
    pub token: u8,
    pub quote: u8,
}

impl Default for PairDecimals {
    fn default() -> Self {
        Self {
            token: TOKEN_DECIMALS,
            quote: QUOTE_DECIMALS,
        }
    }
}

/// A mint together with its decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub mint: Pubkey,
    pub decimals: u8,
}

/// An amount of a token in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub token: TokenDescriptor,
    pub raw: u64,
}

impl TokenAmount {
    pub fn mint(&self) -> Pubkey {
        self.token.mint
    }

    /// Amount back in UI units
    pub fn ui_amount(&self) -> Decimal {
        from_base_units(self.raw, self.token.decimals)
    }
}

/// Input and output of a trade, resolved once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeLeg {
    pub input: TokenAmount,
    pub output: TokenDescriptor,
}

impl TradeLeg {
    /// Resolve the request's side into concrete input/output tokens.
    ///
    /// Buy: input is the quote amount, output the launchpad token.
    /// Sell: input is the token amount, output the quote.
    pub fn for_request(request: &TradeRequest, decimals: PairDecimals) -> Result<Self, TradeError> {
        let token = TokenDescriptor {
            mint: request.token_mint,
            decimals: decimals.token,
        };
        let quote = TokenDescriptor {
            mint: request.quote_mint,
            decimals: decimals.quote,
        };

        let (input, output) = match request.side {
            TradeSide::Buy => (quote, token),
            TradeSide::Sell => (token, quote),
        };

        let raw = to_base_units(request.amount, input.decimals).ok_or_else(|| {
            TradeError::InvalidAmount(format!(
                "{} cannot be expressed in base units with {} decimals",
                request.amount, input.decimals
            ))
        })?;

        Ok(Self {
            input: TokenAmount { token: input, raw },
            output,
        })
    }
}

/// Convert a UI amount into base units, truncating extra precision.
///
/// Returns `None` for non-positive results and on overflow.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Option<u64> {
    let scale = Decimal::from(10u64.checked_pow(decimals as u32)?);
    let raw = amount.checked_mul(scale)?.trunc().to_u64()?;
    (raw > 0).then_some(raw)
}

pub fn from_base_units(raw: u64, decimals: u8) -> Decimal {
    Decimal::from_i128_with_scale(raw as i128, decimals as u32).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sol_to_lamports() {
        assert_eq!(to_base_units(dec!(1.0), QUOTE_DECIMALS), Some(1_000_000_000));
        assert_eq!(to_base_units(dec!(0.25), QUOTE_DECIMALS), Some(250_000_000));
    }

    #[test]
    fn test_truncates_extra_precision() {
        assert_eq!(to_base_units(dec!(1.2345678), TOKEN_DECIMALS), Some(1_234_567));
        assert_eq!(to_base_units(dec!(0.0000001), TOKEN_DECIMALS), None);
    }

    #[test]
    fn test_rejects_non_positive_and_overflow() {
        assert_eq!(to_base_units(dec!(0), QUOTE_DECIMALS), None);
        assert_eq!(to_base_units(dec!(-3), QUOTE_DECIMALS), None);
        assert_eq!(to_base_units(dec!(100000000000000), QUOTE_DECIMALS), None);
    }

    #[test]
    fn test_from_base_units() {
        assert_eq!(from_base_units(1_500_000, TOKEN_DECIMALS), dec!(1.5));
        assert_eq!(from_base_units(1, QUOTE_DECIMALS), dec!(0.000000001));
    }

    #[test]
    fn test_buy_leg_spends_quote() {
        let mint = Pubkey::new_unique();
        let quote = Pubkey::new_unique();
        let leg = TradeLeg::for_request(&TradeRequest::buy(mint, dec!(1.0), quote), PairDecimals::default())
            .unwrap();

        assert_eq!(leg.input.mint(), quote);
        assert_eq!(leg.input.raw, 1_000_000_000);
        assert_eq!(leg.output.mint, mint);
        assert_eq!(leg.output.decimals, TOKEN_DECIMALS);
    }

    #[test]
    fn test_sell_leg_spends_token() {
        let mint = Pubkey::new_unique();
        let quote = Pubkey::new_unique();
        let leg = TradeLeg::for_request(&TradeRequest::sell(mint, dec!(42), quote), PairDecimals::default())
            .unwrap();

        assert_eq!(leg.input.mint(), mint);
        assert_eq!(leg.input.raw, 42_000_000);
        assert_eq!(leg.output.mint, quote);
        assert_eq!(leg.output.decimals, QUOTE_DECIMALS);
        assert_eq!(leg.input.ui_amount(), dec!(42));
    }

    #[test]
    fn test_dust_amount_is_invalid() {
        let request = TradeRequest::buy(Pubkey::new_unique(), dec!(0.0000000001), Pubkey::new_unique());
        let err = TradeLeg::for_request(&request, PairDecimals::default()).unwrap_err();
        assert!(matches!(err, TradeError::InvalidAmount(_)));
    }
}
