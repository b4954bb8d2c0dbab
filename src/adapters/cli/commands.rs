//! CLI command definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;

use crate::application::RefreshView;
use crate::ports::{SortOrder, TokenQuery, TokenSort};

/// curve-router - trade launchpad tokens on the bonding curve or, once
/// graduated, on their DEX pool
#[derive(Parser, Debug)]
#[command(
    name = "curve-router",
    version = env!("CARGO_PKG_VERSION"),
    about = "Trade launchpad tokens on the bonding curve or their DEX pool",
    long_about = "curve-router checks each token's pool state on every trade: active pools \
                  trade against the launchpad program, completed pools swap on the DEX."
)]
pub struct CliApp {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/devnet.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Buy a token with SOL
    Buy(TradeCmd),

    /// Sell a token for SOL
    Sell(TradeCmd),

    /// Show token info, pool state and wallet balance
    Status(StatusCmd),

    /// Refresh the token view until Ctrl-C
    Watch(WatchCmd),

    /// Post a reply to the token's thread
    Reply(ReplyCmd),

    /// Like or unlike a reply
    Like(LikeCmd),

    /// Create a token with its bonding curve, optionally buying in
    Launch(LaunchCmd),

    /// List tokens on the board
    List(ListCmd),

    /// Follow or unfollow a user
    Follow(FollowCmd),

    /// Show users suggested to follow
    Following,
}

#[derive(Parser, Debug)]
pub struct TradeCmd {
    /// Token mint address
    #[arg(value_name = "MINT")]
    pub mint: Pubkey,

    /// SOL to spend (buy) or tokens to sell (sell)
    #[arg(value_name = "AMOUNT")]
    pub amount: Decimal,

    /// Comment attached to the trade record
    #[arg(long, default_value = "")]
    pub comment: String,
}

#[derive(Parser, Debug)]
pub struct StatusCmd {
    #[arg(value_name = "MINT")]
    pub mint: Pubkey,
}

#[derive(Parser, Debug)]
pub struct WatchCmd {
    #[arg(value_name = "MINT")]
    pub mint: Pubkey,

    /// Secondary panel to refresh
    #[arg(long, value_enum, default_value_t = ViewArg::Thread)]
    pub view: ViewArg,

    /// Override the refresh interval in seconds
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct ReplyCmd {
    #[arg(value_name = "MINT")]
    pub mint: Pubkey,

    #[arg(value_name = "COMMENT")]
    pub comment: String,
}

#[derive(Parser, Debug)]
pub struct LikeCmd {
    /// Reply id as shown in the thread (#id)
    #[arg(value_name = "REPLY_ID")]
    pub reply_id: u64,

    /// Remove a previous like
    #[arg(long)]
    pub unlike: bool,
}

#[derive(Parser, Debug)]
pub struct LaunchCmd {
    #[arg(value_name = "NAME")]
    pub name: String,

    #[arg(value_name = "TICKER")]
    pub ticker: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// URL of an already-hosted logo
    #[arg(long, value_name = "URL")]
    pub image_url: Option<String>,

    #[arg(long)]
    pub twitter: Option<String>,

    #[arg(long)]
    pub telegram: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    /// SOL to buy right after the pool opens
    #[arg(long, value_name = "SOL", default_value = "0")]
    pub buy: Decimal,

    /// Keypair file for the mint address; a fresh one is generated otherwise
    #[arg(long, value_name = "FILE")]
    pub mint_keypair: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ListCmd {
    /// Filter by token name
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long, value_enum, default_value_t = SortArg::Bump)]
    pub sort: SortArg,

    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,

    /// Hide NSFW tokens
    #[arg(long)]
    pub no_nsfw: bool,
}

impl ListCmd {
    pub fn query(&self) -> TokenQuery {
        TokenQuery {
            name: self.search.clone(),
            sort: self.sort.into(),
            order: self.order.into(),
            include_nsfw: !self.no_nsfw,
        }
    }
}

#[derive(Parser, Debug)]
pub struct FollowCmd {
    #[arg(value_name = "USER_ID")]
    pub user_id: String,

    #[arg(long)]
    pub unfollow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Bump,
    LastReply,
    ReplyCount,
    MarketCap,
    Created,
}

impl From<SortArg> for TokenSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Bump => TokenSort::BumpOrder,
            SortArg::LastReply => TokenSort::LastReply,
            SortArg::ReplyCount => TokenSort::ReplyCount,
            SortArg::MarketCap => TokenSort::MarketCap,
            SortArg::Created => TokenSort::CreationTime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Desc,
    Asc,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Desc => SortOrder::Desc,
            OrderArg::Asc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Thread,
    Trades,
}

impl From<ViewArg> for RefreshView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Thread => RefreshView::Thread,
            ViewArg::Trades => RefreshView::Trades,
        }
    }
}
