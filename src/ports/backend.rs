use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::domain::{TokenMetadata, TradeError, TradeRecord};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("API request failed: {0}")]
    ApiError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<BackendError> for TradeError {
    fn from(err: BackendError) -> Self {
        TradeError::Unknown(err.to_string())
    }
}

/// One holder line of the token page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderShare {
    pub wallet_addr: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub hold_percent: f64,
}

/// Token page data as served by the backend (display only)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenInfo {
    pub mint_addr: String,
    pub name: String,
    pub ticker: String,
    pub desc: String,
    pub logo: String,
    pub username: String,
    /// Market cap in USD
    pub market_cap: f64,
    pub replies: u64,
    /// Percent, 0-100
    pub bonding_curve_progress: f64,
    /// Percent, 0-100
    pub king_of_the_hill_progress: f64,
    pub crown_date: Option<String>,
    pub tokens_available_for_sale: Option<f64>,
    pub real_quote_reserve: Option<f64>,
    pub token_holder_distribution: Vec<HolderShare>,
    /// Cached SOL balance of the requesting user
    pub sol_balance: Option<Decimal>,
    /// Cached token balance of the requesting user
    pub token_balance: Option<Decimal>,
}

/// A reply in the token's comment thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadReply {
    pub reply_mention_id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub liked: bool,
    /// 1 = bought, 2 = sold, absent for plain replies
    #[serde(default)]
    pub buy_sell: Option<u8>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One row of the token's trade history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeHistoryEntry {
    #[serde(default)]
    pub username: String,
    pub is_buy: bool,
    #[serde(default)]
    pub base_amount: f64,
    #[serde(default)]
    pub quote_amount: f64,
    pub tx_hash: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Board ordering, sent as the label the board shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenSort {
    #[default]
    BumpOrder,
    LastReply,
    ReplyCount,
    MarketCap,
    CreationTime,
}

impl TokenSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSort::BumpOrder => "sort: bump order",
            TokenSort::LastReply => "sort: last reply",
            TokenSort::ReplyCount => "sort: reply count",
            TokenSort::MarketCap => "sort: market cap",
            TokenSort::CreationTime => "sort: creation time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Desc => "sort: desc",
            SortOrder::Asc => "sort: asc",
        }
    }
}

/// Token board search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenQuery {
    /// Name filter; empty matches everything
    pub name: String,
    pub sort: TokenSort,
    pub order: SortOrder,
    pub include_nsfw: bool,
}

impl Default for TokenQuery {
    fn default() -> Self {
        Self {
            name: String::new(),
            sort: TokenSort::default(),
            order: SortOrder::default(),
            include_nsfw: true,
        }
    }
}

impl TokenQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("sort", self.sort.as_str().to_string()),
            ("order", self.order.as_str().to_string()),
            ("nsfw", if self.include_nsfw { "1" } else { "0" }.to_string()),
        ]
    }
}

/// A user suggested on the following tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Following {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub num_followers: u64,
    #[serde(default)]
    pub followed: bool,
}

/// Launchpad backend: trade records and display data
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn record_trade(&self, record: &TradeRecord) -> Result<(), BackendError>;

    async fn get_token(&self, mint: &Pubkey, user_id: Option<&str>) -> Result<TokenInfo, BackendError>;

    async fn get_trade_history(&self, mint: &Pubkey) -> Result<Vec<TradeHistoryEntry>, BackendError>;

    /// DEX market identifier of a migrated pair
    async fn get_market_id(&self, mint: &Pubkey, quote_mint: &Pubkey) -> Result<Pubkey, BackendError>;

    async fn get_thread(&self, mint: &Pubkey, user_id: Option<&str>) -> Result<Vec<ThreadReply>, BackendError>;

    async fn post_reply(&self, mint: &Pubkey, comment: &str) -> Result<(), BackendError>;

    async fn like_reply(&self, reply_id: u64, liked: bool) -> Result<(), BackendError>;

    /// Register a freshly launched token's details
    async fn update_token(&self, metadata: &TokenMetadata) -> Result<(), BackendError>;

    async fn find_tokens(&self, query: &TokenQuery) -> Result<Vec<TokenInfo>, BackendError>;

    /// Current king of the hill, if any
    async fn get_king(&self) -> Result<Option<TokenInfo>, BackendError>;

    async fn get_followings(&self, user_id: &str) -> Result<Vec<Following>, BackendError>;

    async fn set_follow(&self, target_id: &str, follow: bool) -> Result<(), BackendError>;
}
