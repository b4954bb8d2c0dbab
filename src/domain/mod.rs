//! Domain Layer - Trade types and unit handling
//!
//! Pure types with no I/O. All external interactions happen through the ports layer.
//!
//! - `trade`: requests, results and the backend trade record
//! - `units`: decimal ⇄ base-unit conversion for both sides of a pair
//! - `launch`: new-token requests and the backend metadata payload
//! - `plan`: instruction list compiled into an unsigned versioned transaction
//! - `pool`: bonding-curve pool status
//! - `error`: the trade error taxonomy

pub mod error;
pub mod launch;
pub mod plan;
pub mod pool;
pub mod trade;
pub mod units;

pub use error::TradeError;
pub use launch::{LaunchRequest, LaunchResult, TokenMetadata, TOKEN_TOTAL_SUPPLY};
pub use plan::{partial_sign, PlanError, TransactionPlan};
pub use pool::PoolState;
pub use trade::{TradeRecord, TradeRequest, TradeResult, TradeSide, Venue};
pub use units::{
    from_base_units, to_base_units, PairDecimals, TokenAmount, TokenDescriptor, TradeLeg,
    QUOTE_DECIMALS, TOKEN_DECIMALS,
};
