//! Terminal rendering helpers

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::application::TokenSnapshot;
use crate::ports::{Following, TokenInfo};

/// Compact display of a balance.
///
/// Non-positive amounts render as `0`, amounts below `10^-zeros` as
/// `<0.0001`-style bounds, amounts from 1000 up with a `k` suffix. Trailing
/// zeros are trimmed.
pub fn format_amount(amount: Decimal, zeros: u32) -> String {
    if amount <= Decimal::ZERO {
        return "0".to_string();
    }

    let floor = Decimal::new(1, zeros);
    if amount < floor {
        return format!("<{}", floor);
    }

    let thousand = Decimal::from(1000);
    if amount < thousand {
        return fixed(amount, zeros);
    }
    format!("{}k", fixed(amount / thousand, zeros))
}

fn fixed(amount: Decimal, zeros: u32) -> String {
    amount
        .round_dp_with_strategy(zeros, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Age of `date` relative to `now`: `now`, `5m`, `3h`, `2d`, `4M`, `1y`.
///
/// Dates in the future render as `-`.
pub fn time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if date > now {
        return "-".to_string();
    }

    let minutes = (now - date).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = months / 12;

    if years > 0 {
        format!("{}y", years)
    } else if months > 0 {
        format!("{}M", months)
    } else if days > 0 {
        format!("{}d", days)
    } else if hours > 0 {
        format!("{}h", hours)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        "now".to_string()
    }
}

/// Multi-line text rendering of a refreshed token view
pub fn render_snapshot(snapshot: &TokenSnapshot) -> String {
    let token = &snapshot.token;
    let mut out = Vec::new();

    out.push(format!("{} ({})  {}", token.name, token.ticker, token.mint_addr));
    out.push(format!(
        "Market cap: ${:.2}  Replies: {}",
        token.market_cap, token.replies
    ));

    let pool = match snapshot.pool_complete {
        Some(true) => "graduated (DEX)",
        Some(false) => "bonding curve",
        None => "unknown",
    };
    out.push(format!(
        "Pool: {}  Curve progress: {:.1}%  King of the hill: {:.1}%",
        pool, token.bonding_curve_progress, token.king_of_the_hill_progress
    ));

    if let (Some(sol), Some(tokens)) = (token.sol_balance, token.token_balance) {
        out.push(format!(
            "Balance: {} SOL  {} {}",
            format_amount(sol, 4),
            format_amount(tokens, 4),
            token.ticker
        ));
    }

    if !token.token_holder_distribution.is_empty() {
        out.push("Holders:".to_string());
        for (i, holder) in token.token_holder_distribution.iter().enumerate() {
            let name = if holder.username.is_empty() { &holder.wallet_addr } else { &holder.username };
            out.push(format!("  {}. {}  {:.2}%", i + 1, name, holder.hold_percent));
        }
    }

    if let Some(ref thread) = snapshot.thread {
        out.push(format!("Thread ({}):", thread.len()));
        for reply in thread {
            let when = reply
                .created_at
                .map(|at| time_ago(at, snapshot.fetched_at))
                .unwrap_or_else(|| "-".to_string());
            let heart = if reply.liked { "♥" } else { "♡" };
            out.push(format!(
                "  #{} {} {}  {} {}: {}",
                reply.reply_mention_id, when, reply.username, heart, reply.likes, reply.comment
            ));
        }
    }

    if let Some(ref trades) = snapshot.trades {
        out.push(format!("Trades ({}):", trades.len()));
        for trade in trades {
            let when = trade
                .date
                .map(|at| time_ago(at, snapshot.fetched_at))
                .unwrap_or_else(|| "-".to_string());
            let side = if trade.is_buy { "buy " } else { "sell" };
            out.push(format!(
                "  {} {:>4} {:>12} SOL {:>14} {}  {}",
                side,
                when,
                format_float(trade.quote_amount),
                format_float(trade.base_amount),
                trade.username,
                trade.tx_hash
            ));
        }
    }

    out.join("\n")
}

/// Token board: king of the hill first, then the listing
pub fn render_board(king: Option<&TokenInfo>, tokens: &[TokenInfo]) -> String {
    let mut out = Vec::new();

    if let Some(king) = king {
        out.push("KING OF THE HILL".to_string());
        out.push(format!("  {} [ticker: {}]  {}", king.name, king.ticker, king.mint_addr));
        out.push(format!(
            "  Created by: {}  Market cap: {:.2}k  Replies: {}",
            king.username, king.market_cap, king.replies
        ));
        out.push(String::new());
    }

    if tokens.is_empty() {
        out.push("No tokens found".to_string());
    }
    for token in tokens {
        out.push(format!(
            "{:<24} [{}]  mc {:.2}k  replies {}  by {}  {}",
            token.name, token.ticker, token.market_cap, token.replies, token.username, token.mint_addr
        ));
    }

    out.join("\n")
}

pub fn render_followings(users: &[Following]) -> String {
    if users.is_empty() {
        return "Follow some of your friends to start curating your feed".to_string();
    }
    users
        .iter()
        .map(|user| {
            let state = if user.followed { "following" } else { "not following" };
            format!("{}  {}  {} followers  ({})", user.id, user.username, user.num_followers, state)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_float(value: f64) -> String {
    Decimal::from_f64_retain(value)
        .map(|d| format_amount(d, 4))
        .unwrap_or_else(|| "0".to_string())
}
