//! curve-router - launchpad trade router
//!
//! Routes buys and sells of launchpad tokens to the bonding-curve program or,
//! once a pool has graduated, to its DEX market.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use curve_router::adapters::cli::{
    format_amount, render_board, render_followings, render_snapshot, CliApp, Command, FollowCmd, LaunchCmd,
    LikeCmd, ListCmd, ReplyCmd, StatusCmd, TradeCmd, WatchCmd,
};
use curve_router::adapters::{
    BackendClient, BackendConfig, CurveProgram, JupiterClient, JupiterConfig, JupiterSwap, SolanaClient,
    WalletManager,
};
use curve_router::application::{TokenLauncher, TokenRefresher, TradeDesk, TradeRouter};
use curve_router::config::{load_config, Config};
use curve_router::domain::{
    from_base_units, LaunchRequest, PairDecimals, TradeRequest, TradeSide, QUOTE_DECIMALS,
};
use curve_router::ports::{BackendApi, CurveProgramClient};
use solana_sdk::signature::{read_keypair_file, Keypair};

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets go in .env, not in the config file
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    let config = load_config(&app.config)
        .with_context(|| format!("Failed to load configuration from {}", app.config.display()))?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Buy(cmd) => trade_command(config, cmd, TradeSide::Buy).await,
        Command::Sell(cmd) => trade_command(config, cmd, TradeSide::Sell).await,
        Command::Status(cmd) => status_command(config, cmd).await,
        Command::Watch(cmd) => watch_command(config, cmd).await,
        Command::Reply(cmd) => reply_command(config, cmd).await,
        Command::Like(cmd) => like_command(config, cmd).await,
        Command::Launch(cmd) => launch_command(config, cmd).await,
        Command::List(cmd) => list_command(config, cmd).await,
        Command::Follow(cmd) => follow_command(config, cmd).await,
        Command::Following => following_command(config).await,
    }
}

/// `--debug` and `--verbose` win, then RUST_LOG, then the config level
fn init_logging(verbose: bool, debug: bool, level: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

/// Every adapter a trade needs, built from one config
struct Services {
    config: Config,
    chain: Arc<SolanaClient>,
    wallet: Arc<WalletManager>,
    curve: Arc<CurveProgram>,
    swap: Arc<JupiterSwap>,
    backend: Arc<BackendClient>,
}

impl Services {
    fn build(config: Config) -> Result<Self> {
        let commitment = config.network.commitment_config()?;
        let chain = Arc::new(SolanaClient::with_commitment(config.network.get_rpc_url(), commitment));
        let wallet = Arc::new(load_wallet(&config)?);

        let program_id = config.program_id()?;
        let curve = Arc::new(
            CurveProgram::new(program_id, chain.clone()).with_token_decimals(config.program.token_decimals),
        );

        let jupiter = JupiterClient::with_config(JupiterConfig {
            api_base_url: config.swap.api_url.clone(),
            api_key: config.swap.get_api_key(),
            slippage_bps: config.swap.slippage_bps,
            priority_fee_lamports: config.swap.priority_fee_lamports,
            ..Default::default()
        })
        .context("Failed to create Jupiter client")?;
        let swap = Arc::new(JupiterSwap::new(jupiter, chain.clone()));

        let backend = Arc::new(build_backend(&config)?);

        tracing::info!(rpc = %chain.url(), %program_id, wallet = %wallet.pubkey(), "Services ready");
        Ok(Self {
            config,
            chain,
            wallet,
            curve,
            swap,
            backend,
        })
    }

    fn decimals(&self) -> PairDecimals {
        PairDecimals {
            token: self.config.program.token_decimals,
            quote: QUOTE_DECIMALS,
        }
    }

    fn router(&self) -> TradeRouter {
        TradeRouter::new(
            self.wallet.clone(),
            self.chain.clone(),
            self.curve.clone(),
            self.swap.clone(),
            self.backend.clone(),
        )
        .with_decimals(self.decimals())
    }

    fn launcher(&self) -> TokenLauncher {
        TokenLauncher::new(
            self.wallet.clone(),
            self.chain.clone(),
            self.curve.clone(),
            self.backend.clone(),
        )
        .with_decimals(self.decimals())
    }

    fn user_id(&self) -> Option<&str> {
        self.config.backend.user_id.as_deref()
    }
}

fn build_backend(config: &Config) -> Result<BackendClient> {
    BackendClient::new(BackendConfig {
        api_url: config.backend.get_api_url(),
        timeout: Duration::from_secs(config.backend.timeout_secs),
        ..Default::default()
    })
    .context("Failed to create backend client")
}

/// WALLET_PRIVATE_KEY (base58) first, then the configured keypair file
fn load_wallet(config: &Config) -> Result<WalletManager> {
    if let Ok(secret) = std::env::var("WALLET_PRIVATE_KEY") {
        return WalletManager::from_base58(secret.trim())
            .context("WALLET_PRIVATE_KEY is set but is not a valid base58 keypair");
    }
    load_wallet_with_context(&config.wallet.get_keypair_path())
}

/// Load wallet with helpful error messages
fn load_wallet_with_context(keypair_path: &str) -> Result<WalletManager> {
    let path = Path::new(keypair_path);

    if !path.exists() {
        bail!(
            "Wallet file not found: {}\n\n\
             To create a new wallet, run:\n  \
             solana-keygen new --outfile {}\n\n\
             Or set WALLET_PRIVATE_KEY, or update 'keypair_path' in your config file",
            keypair_path,
            keypair_path
        );
    }

    WalletManager::from_file(keypair_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load wallet from '{}': {}\n\n\
             Expected format: JSON array of bytes (e.g., [1,2,3,...])",
            keypair_path,
            e
        )
    })
}

async fn trade_command(config: Config, cmd: TradeCmd, side: TradeSide) -> Result<()> {
    let services = Services::build(config)?;
    let desk = TradeDesk::new(services.router());

    // Balance check runs against the same cached view the user last saw
    let cached = match services.backend.get_token(&cmd.mint, services.user_id()).await {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!(mint = %cmd.mint, "Token info unavailable, skipping balance check: {}", e);
            None
        }
    };

    let request = TradeRequest::new(cmd.mint, side, cmd.amount, spl_token::native_mint::id())
        .with_comment(cmd.comment);

    let result = desk
        .place(&request, cached.as_ref())
        .await
        .with_context(|| format!("Failed to {} {}", side, cmd.mint))?;

    println!("✓ {}", result);
    Ok(())
}

async fn status_command(config: Config, cmd: StatusCmd) -> Result<()> {
    let services = Services::build(config)?;
    let quote_mint = spl_token::native_mint::id();

    let info = services
        .backend
        .get_token(&cmd.mint, services.user_id())
        .await
        .context("Failed to fetch token info")?;
    let pool = services
        .curve
        .pool_state(&cmd.mint, &quote_mint)
        .await
        .context("Failed to read pool state")?;
    let balance = services
        .chain
        .get_balance(&services.wallet.pubkey())
        .await
        .context("Failed to get balance")?;

    println!("{} ({})  {}", info.name, info.ticker, cmd.mint);
    println!(
        "Pool: {}",
        match (pool.exists, pool.is_complete) {
            (false, _) => "not created",
            (true, false) => "bonding curve",
            (true, true) => "graduated (DEX)",
        }
    );
    println!("Bonding curve progress: {:.1}%", info.bonding_curve_progress);
    println!("Wallet: {}", services.wallet.pubkey());
    println!("Balance: {} SOL", format_amount(from_base_units(balance, QUOTE_DECIMALS), 4));
    Ok(())
}

async fn watch_command(config: Config, cmd: WatchCmd) -> Result<()> {
    let interval_secs = cmd.interval.unwrap_or(config.refresh.interval_secs).max(1);
    let services = Services::build(config)?;

    let mut refresher = TokenRefresher::new(
        services.backend.clone(),
        services.curve.clone(),
        services.wallet.clone(),
        cmd.mint,
        spl_token::native_mint::id(),
    )
    .with_user_id(services.config.backend.user_id.clone());
    refresher.set_view(cmd.view.into());

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    tracing::info!(mint = %cmd.mint, interval_secs, "Watching token (Ctrl-C to stop)");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match refresher.refresh().await {
                    Ok(snapshot) => println!("{}\n", render_snapshot(&snapshot)),
                    Err(e) => tracing::warn!("Refresh failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }
    Ok(())
}

async fn reply_command(config: Config, cmd: ReplyCmd) -> Result<()> {
    if cmd.comment.trim().is_empty() {
        bail!("Reply cannot be empty");
    }
    let backend = build_backend(&config)?;
    backend
        .post_reply(&cmd.mint, &cmd.comment)
        .await
        .context("Failed to post reply")?;
    println!("✓ Reply posted");
    Ok(())
}

async fn like_command(config: Config, cmd: LikeCmd) -> Result<()> {
    let backend = build_backend(&config)?;
    backend
        .like_reply(cmd.reply_id, !cmd.unlike)
        .await
        .context("Failed to update like")?;
    println!("✓ {} #{}", if cmd.unlike { "Unliked" } else { "Liked" }, cmd.reply_id);
    Ok(())
}

async fn launch_command(config: Config, cmd: LaunchCmd) -> Result<()> {
    let services = Services::build(config)?;

    let mint = match cmd.mint_keypair {
        Some(ref path) => read_keypair_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to read mint keypair '{}': {}", path.display(), e))?,
        None => Keypair::new(),
    };

    let request = LaunchRequest {
        name: cmd.name,
        ticker: cmd.ticker,
        description: cmd.description,
        image_url: cmd.image_url,
        twitter: cmd.twitter,
        telegram: cmd.telegram,
        website: cmd.website,
        initial_buy: cmd.buy,
    };

    let result = services
        .launcher()
        .launch(&request, &mint)
        .await
        .with_context(|| format!("Failed to create '{}'", request.name))?;

    println!("✓ {}", result);
    if let Some(lamports) = result.initial_buy {
        println!("  Initial buy: {} SOL", format_amount(from_base_units(lamports, QUOTE_DECIMALS), 4));
    }
    Ok(())
}

async fn list_command(config: Config, cmd: ListCmd) -> Result<()> {
    let backend = build_backend(&config)?;

    let king = backend.get_king().await.context("Failed to fetch king of the hill")?;
    let tokens = backend
        .find_tokens(&cmd.query())
        .await
        .context("Failed to list tokens")?;

    println!("{}", render_board(king.as_ref(), &tokens));
    Ok(())
}

async fn follow_command(config: Config, cmd: FollowCmd) -> Result<()> {
    let backend = build_backend(&config)?;
    backend
        .set_follow(&cmd.user_id, !cmd.unfollow)
        .await
        .context("Failed to update follow")?;
    println!("✓ {} {}", if cmd.unfollow { "Unfollowed" } else { "Followed" }, cmd.user_id);
    Ok(())
}

async fn following_command(config: Config) -> Result<()> {
    let Some(user_id) = config.backend.user_id.clone() else {
        bail!("Set 'user_id' in the [backend] config section to see who you follow");
    };
    let backend = build_backend(&config)?;
    let users = backend
        .get_followings(&user_id)
        .await
        .context("Failed to fetch followings")?;
    println!("{}", render_followings(&users));
    Ok(())
}
