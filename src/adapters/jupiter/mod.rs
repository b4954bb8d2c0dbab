//! Jupiter adapter
//!
//! Routes trades for graduated tokens through the Jupiter aggregator,
//! restricted to direct routes so the swap hits the token's DEX pool.

mod client;
mod executor;
mod quote;
mod swap;

pub use client::{JupiterClient, JupiterConfig};
pub use executor::JupiterSwap;
pub use quote::{QuoteRequest, QuoteResponse};
pub use swap::{SwapRequest, SwapResponse};
