//! Application Layer
//!
//! - `router`: venue selection and transaction assembly for one trade
//! - `desk`: pre-checks and the pending flag around the router
//! - `refresh`: caller-driven re-fetch of token page data
//! - `launch`: token creation with its pool and an optional first buy

pub mod desk;
pub mod launch;
pub mod refresh;
pub mod router;

pub use desk::TradeDesk;
pub use launch::TokenLauncher;
pub use refresh::{RefreshView, TokenRefresher, TokenSnapshot};
pub use router::TradeRouter;
