//! CLI Adapter
//!
//! Command-line interface for curve-router.
//! Uses clap derive macros for argument parsing.

mod commands;
mod format;

pub use commands::{
    CliApp, Command, FollowCmd, LaunchCmd, LikeCmd, ListCmd, OrderArg, ReplyCmd, SortArg, StatusCmd, TradeCmd,
    ViewArg, WatchCmd,
};
pub use format::{format_amount, render_board, render_followings, render_snapshot, time_ago};
