// Paper Grid Trading Bot - Telegram entry point

use std::sync::Arc;

use clap::Parser;
use teloxide::prelude::*;
use tracing::{error, info, Level};

use paper_grid_bot::bot::{self, BotContext};
use paper_grid_bot::{BinancePriceClient, Config, SessionRegistry, TradingEngine};

#[derive(Parser)]
#[command(name = "grid-bot")]
#[command(version)]
#[command(about = "Paper grid trading bot for Telegram", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging first (before config load so we can see config errors)
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Load environment variables
    dotenvy::dotenv().ok();

    info!("🚀 Paper Grid Bot v{}", env!("CARGO_PKG_VERSION"));
    info!("📁 Config: {}", cli.config);

    let config = match Config::load_or_create(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuration Error");
            error!("{}", e);
            return Err(e.into());
        }
    };

    let token = config.telegram_token()?;

    info!(
        "📊 Grid: {} levels, {:.2}% step, {:.2} USD balance, ±{:.1}% noise",
        config.grid.levels,
        config.grid.step_pct * 100.0,
        config.grid.initial_balance,
        config.grid.price_noise * 100.0
    );

    let price_client = BinancePriceClient::new(&config.exchange)?;
    let engine = Arc::new(TradingEngine::new(price_client, config.grid.clone()));
    let (sessions, events) = SessionRegistry::new(engine, config.autotrade.interval());

    let bot_api = Bot::new(token);
    tokio::spawn(bot::forward_session_events(bot_api.clone(), events));

    let ctx = Arc::new(BotContext::new(sessions, config.exchange.clone()));

    info!("✅ Starting Telegram dispatcher...");
    bot::run(bot_api, ctx).await;

    info!("🛑 Stopped");
    Ok(())
}
