//! ForecastBTC command-line entry point.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use forecast_btc::config::{Config, LatencyProfile};
use forecast_btc::contract::{
    ContractClient, CreateMarketParams, MockContractClient, PlaceStakeParams, ValidationErrors,
};
use forecast_btc::market::{status_counts, CatalogSource, MarketCatalog, MarketQuery, Outcome, SortKey};
use forecast_btc::metrics;
use forecast_btc::storage::{FileStore, KeyValueStore};
use forecast_btc::trading::{max_stake_for, validate_stake, PortfolioSummary, StakeQuote};
use forecast_btc::utils::{format_volume, short_address};
use forecast_btc::wallet::{
    MockWalletConfig, MockWalletProvider, WalletKind, WalletManager, WalletSession,
};

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

/// Simulated Bitcoin-ecosystem prediction market.
#[derive(Parser, Debug)]
#[command(name = "forecast-btc")]
#[command(about = "Browse, stake on and manage simulated prediction markets on Stacks")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip all simulated latency.
    #[arg(long, global = true)]
    instant: bool,

    /// Print Prometheus metrics after the command finishes.
    #[arg(long, global = true)]
    metrics: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List markets.
    Markets {
        /// Case-insensitive match on title or description.
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category, or "all".
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order: volume, newest, ending or stakes.
        #[arg(long, default_value = "volume")]
        sort: SortKey,
    },

    /// Show one market.
    Market {
        /// Market id.
        id: String,
    },

    /// Connect a wallet and remember it for later commands.
    Connect {
        /// Wallet to connect: leather or xverse.
        wallet: WalletKind,
    },

    /// Forget the connected wallet.
    Disconnect,

    /// Show detected wallets and the remembered one.
    Wallet,

    /// Place a stake on a market outcome.
    Stake {
        /// Market id.
        market_id: String,

        /// Side to back: yes or no.
        outcome: Outcome,

        /// Amount in STX.
        amount: Decimal,

        /// Wallet to stake from. Defaults to the remembered wallet.
        #[arg(short, long)]
        wallet: Option<WalletKind>,
    },

    /// Submit a new market.
    CreateMarket {
        /// Market question.
        #[arg(long)]
        title: String,

        /// Resolution criteria.
        #[arg(long)]
        description: String,

        /// Category tag.
        #[arg(long)]
        category: String,

        /// Resolution date (RFC 3339 or YYYY-MM-DD).
        #[arg(long, value_parser = parse_resolution_date)]
        resolution_date: OffsetDateTime,

        /// Minimum stake in STX.
        #[arg(long, default_value = "1")]
        min_stake: Decimal,

        /// Maximum stake in STX.
        #[arg(long, default_value = "1000")]
        max_stake: Decimal,

        /// Wallet to submit from. Defaults to the remembered wallet.
        #[arg(short, long)]
        wallet: Option<WalletKind>,
    },

    /// Resolve a market.
    Resolve {
        /// Market id.
        market_id: String,

        /// Winning side: yes or no.
        winner: Outcome,
    },

    /// Claim the payout for a resolved market.
    Claim {
        /// Market id.
        market_id: String,
    },

    /// Show positions and portfolio totals.
    Dashboard {
        /// Wallet to query. Defaults to the remembered wallet.
        #[arg(short, long)]
        wallet: Option<WalletKind>,
    },

    /// Check configuration validity.
    CheckConfig,
}

fn parse_resolution_date(raw: &str) -> Result<OffsetDateTime, String> {
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(at);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|e| format!("expected RFC 3339 or YYYY-MM-DD: {}", e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("forecast_btc=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(args.log_json.then(|| fmt::layer().json()))
        .with((!args.log_json).then(fmt::layer))
        .with(filter)
        .init();

    // Initialize metrics
    let prometheus = if args.metrics {
        Some(metrics::install_prometheus()?)
    } else {
        None
    };
    metrics::init_metrics();

    let result = tokio::select! {
        result = run(args.command, args.instant) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted");
            Ok(())
        }
    };

    if let Some(handle) = prometheus {
        println!("{}", THIN_RULE);
        println!("{}", handle.render());
    }

    result
}

async fn run(command: Command, instant: bool) -> anyhow::Result<()> {
    let app = match command {
        Command::CheckConfig => return cmd_check_config().await,
        _ => App::from_env(instant)?,
    };

    match command {
        Command::Markets {
            search,
            category,
            sort,
        } => {
            let mut query = MarketQuery::new().sort(sort);
            if let Some(search) = search {
                query = query.search(search);
            }
            if let Some(category) = category {
                query = query.category(category);
            }
            app.cmd_markets(query).await
        }
        Command::Market { id } => app.cmd_market(&id).await,
        Command::Connect { wallet } => app.cmd_connect(wallet).await,
        Command::Disconnect => app.cmd_disconnect(),
        Command::Wallet => app.cmd_wallet(),
        Command::Stake {
            market_id,
            outcome,
            amount,
            wallet,
        } => app.cmd_stake(&market_id, outcome, amount, wallet).await,
        Command::CreateMarket {
            title,
            description,
            category,
            resolution_date,
            min_stake,
            max_stake,
            wallet,
        } => {
            let params = CreateMarketParams {
                title,
                description,
                category,
                resolution_date,
                min_stake,
                max_stake,
            };
            app.cmd_create_market(params, wallet).await
        }
        Command::Resolve { market_id, winner } => app.cmd_resolve(&market_id, winner).await,
        Command::Claim { market_id } => app.cmd_claim(&market_id).await,
        Command::Dashboard { wallet } => app.cmd_dashboard(wallet).await,
        Command::CheckConfig => unreachable!("handled before building the app"),
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("{}", RULE);
    println!("FORECASTBTC - CONFIGURATION CHECK");
    println!("{}", RULE);

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow!("Configuration validation failed"));
        }
    }

    // Check catalog
    print!("Loading market catalog... ");
    let source = CatalogSource::from(config.forecast_catalog_path.clone());
    match MarketCatalog::load(&source, LatencyProfile::instant().catalog).await {
        Ok(catalog) => {
            println!("OK");
            println!("  Markets: {}", catalog.len());
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow!("Market catalog invalid"));
        }
    }

    // Check storage
    print!("Opening storage... ");
    match FileStore::open(&config.forecast_storage_path) {
        Ok(store) => {
            println!("OK");
            println!("  Path: {}", store.path().display());
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow!("Storage unavailable"));
        }
    }

    // Show configuration summary
    let latency = config.latency();
    println!("{}", THIN_RULE);
    println!("Configuration Summary:");
    match &config.forecast_catalog_path {
        Some(path) => println!("  Catalog: {}", path.display()),
        None => println!("  Catalog: built-in"),
    }
    println!(
        "  Simulated Latency: {}",
        if config.simulate_latency { "Enabled" } else { "Disabled" }
    );
    println!(
        "  Wallet Connect: leather {}ms, xverse {}ms",
        latency.leather_connect.as_millis(),
        latency.xverse_connect.as_millis()
    );
    println!(
        "  Contract Calls: create {}ms, stake {}ms, resolve {}ms, claim {}ms, positions {}ms",
        latency.create_market.as_millis(),
        latency.place_stake.as_millis(),
        latency.resolve_market.as_millis(),
        latency.claim_payout.as_millis(),
        latency.positions.as_millis()
    );
    println!("{}", RULE);
    println!("CONFIGURATION CHECK PASSED");
    println!("{}", RULE);

    Ok(())
}

/// Everything a command needs, built once from configuration.
struct App {
    latency: LatencyProfile,
    catalog_source: CatalogSource,
    wallet: WalletManager<MockWalletProvider>,
    contract: MockContractClient,
    remembered: Option<WalletKind>,
}

impl App {
    fn from_env(instant: bool) -> anyhow::Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        config.validate().map_err(|e| anyhow!(e))?;

        let latency = if instant {
            LatencyProfile::instant()
        } else {
            config.latency()
        };
        debug!(?latency, "Using latency profile");

        let store: Arc<dyn KeyValueStore> = Arc::new(
            FileStore::open(&config.forecast_storage_path)
                .context("Failed to open local storage")?,
        );
        let provider = MockWalletProvider::with_config(MockWalletConfig::from_latency(&latency));
        let wallet = WalletManager::new(provider, store);
        let remembered = wallet.restore();

        Ok(Self {
            latency,
            catalog_source: CatalogSource::from(config.forecast_catalog_path),
            wallet,
            contract: MockContractClient::with_latency(latency),
            remembered,
        })
    }

    async fn catalog(&self) -> anyhow::Result<MarketCatalog> {
        Ok(MarketCatalog::load(&self.catalog_source, self.latency.catalog).await?)
    }

    /// Connect the requested wallet, falling back to the remembered one.
    async fn connect_for(&self, requested: Option<WalletKind>) -> anyhow::Result<WalletSession> {
        let kind = requested.or(self.remembered).ok_or_else(|| {
            anyhow!("No wallet connected. Pass --wallet or run `forecast-btc connect <wallet>`")
        })?;
        Ok(self.wallet.connect(kind).await?)
    }

    async fn cmd_markets(&self, query: MarketQuery) -> anyhow::Result<()> {
        let catalog = self.catalog().await?;
        let markets = query.apply(catalog.markets());
        let counts = status_counts(catalog.markets());
        let now = OffsetDateTime::now_utc();

        println!("{}", RULE);
        println!("FORECASTBTC - MARKETS");
        println!("{}", RULE);
        println!(
            "Active: {}  Resolved: {}  Cancelled: {}  Categories: {}",
            counts.active,
            counts.resolved,
            counts.cancelled,
            catalog.categories().join(", ")
        );
        println!("{}", THIN_RULE);

        if markets.is_empty() {
            println!("No markets match.");
        }
        for market in &markets {
            let timing = if market.is_active() {
                format!("{}d left", market.days_remaining(now).max(0))
            } else {
                market.status.to_string()
            };
            println!("{}  [{}]", market.title, market.category);
            println!(
                "  {:<28} YES {:>3}c  NO {:>3}c  Vol {:>7}  {}",
                market.id,
                market.odds_cents(Outcome::Yes),
                market.odds_cents(Outcome::No),
                format_volume(market.volume),
                timing
            );
        }

        println!("{}", RULE);
        if query.is_filtered() {
            println!("{} of {} markets", markets.len(), catalog.len());
        } else {
            println!("{} markets", markets.len());
        }
        Ok(())
    }

    async fn cmd_market(&self, id: &str) -> anyhow::Result<()> {
        let catalog = self.catalog().await?;
        let market = catalog.require(id)?;

        println!("{}", RULE);
        println!("{}", market.title);
        println!("{}", RULE);
        println!("{}", market.description);
        println!("{}", THIN_RULE);
        println!("  ID: {}", market.id);
        println!("  Category: {}", market.category);
        println!("  Status: {}", market.status);
        if let Some(winner) = market.winner {
            println!("  Winner: {}", winner.to_string().to_uppercase());
        }
        println!(
            "  YES: {}c ({} STX staked)",
            market.odds_cents(Outcome::Yes),
            market.yes_stakes
        );
        println!(
            "  NO:  {}c ({} STX staked)",
            market.odds_cents(Outcome::No),
            market.no_stakes
        );
        println!("  Volume: {}", format_volume(market.volume));
        println!("  Total Staked: {} STX", market.total_staked);
        println!("  Stake Range: {} - {} STX", market.min_stake, market.max_stake);
        println!("  Created: {}", market.created_at.date());
        println!(
            "  Resolves: {} ({} days)",
            market.resolution_date.date(),
            market.days_remaining(OffsetDateTime::now_utc())
        );
        println!("  Creator: {}", short_address(&market.creator));
        println!("{}", RULE);
        Ok(())
    }

    async fn cmd_connect(&self, kind: WalletKind) -> anyhow::Result<()> {
        println!("Connecting to {}...", kind);
        let session = self.wallet.connect(kind).await?;

        println!("{}", RULE);
        println!("WALLET CONNECTED");
        println!("{}", RULE);
        print_session(&session);
        println!("{}", RULE);
        Ok(())
    }

    fn cmd_disconnect(&self) -> anyhow::Result<()> {
        self.wallet.disconnect();
        match self.remembered {
            Some(kind) => println!("Forgot {} wallet.", kind),
            None => println!("No wallet was connected."),
        }
        Ok(())
    }

    fn cmd_wallet(&self) -> anyhow::Result<()> {
        let detected = self.wallet.detect();

        println!("{}", RULE);
        println!("FORECASTBTC - WALLET");
        println!("{}", RULE);
        for kind in [WalletKind::Leather, WalletKind::Xverse] {
            println!(
                "  {}: {}",
                kind,
                if detected.has(kind) { "detected" } else { "not installed" }
            );
        }
        match self.remembered {
            Some(kind) => println!("  Remembered: {}", kind),
            None => println!("  Remembered: none"),
        }
        print_session(&self.wallet.session());
        println!("{}", RULE);
        Ok(())
    }

    async fn cmd_stake(
        &self,
        market_id: &str,
        outcome: Outcome,
        amount: Decimal,
        wallet: Option<WalletKind>,
    ) -> anyhow::Result<()> {
        let catalog = self.catalog().await?;
        let market = catalog.require(market_id)?;
        let session = self.connect_for(wallet).await?;

        println!("{}", RULE);
        println!("PLACE STAKE - {}", market.title);
        println!("{}", RULE);

        if let Err(errors) = validate_stake(market, amount, &session) {
            println!("Max stake: {} STX", max_stake_for(market, &session));
            return reject(errors);
        }

        let quote = StakeQuote::new(market, outcome, amount)
            .ok_or_else(|| anyhow!("{} has no tradable {} price", market.id, outcome))?;
        println!("  Outcome: {}", outcome.to_string().to_uppercase());
        println!("  Amount: {} STX", quote.amount);
        println!("  Price: {}c", quote.price * Decimal::ONE_HUNDRED);
        println!("  Shares: {}", quote.shares.round_dp(2));
        println!("  Potential Payout: {} STX", quote.payout.round_dp(2));
        println!("  Potential Profit: {} STX", quote.profit.round_dp(2));
        println!("{}", THIN_RULE);

        let receipt = self
            .contract
            .place_stake(PlaceStakeParams {
                market_id: market.id.clone(),
                outcome,
                amount,
            })
            .await?;

        if !receipt.success {
            bail!("Stake was not accepted");
        }
        info!(
            transaction_id = ?receipt.transaction_id,
            "Stake placed"
        );
        println!(
            "Stake placed: {}",
            receipt.transaction_id.as_deref().unwrap_or("-")
        );
        println!("{}", RULE);
        Ok(())
    }

    async fn cmd_create_market(
        &self,
        params: CreateMarketParams,
        wallet: Option<WalletKind>,
    ) -> anyhow::Result<()> {
        let params = params.trimmed();
        if let Err(errors) = params.validate() {
            return reject(errors);
        }

        let session = self.connect_for(wallet).await?;
        println!("{}", RULE);
        println!("CREATE MARKET");
        println!("{}", RULE);
        println!("  Title: {}", params.title);
        println!("  Category: {}", params.category);
        println!("  Resolves: {}", params.resolution_date.date());
        println!("  Stake Range: {} - {} STX", params.min_stake, params.max_stake);
        println!("  Creator: {}", session.short_address());
        println!("{}", THIN_RULE);

        let receipt = self.contract.create_market(params).await?;
        match receipt.market_id {
            Some(id) if receipt.success => println!("Market submitted: {}", id),
            _ => bail!("Market was not accepted"),
        }
        println!("{}", RULE);
        Ok(())
    }

    async fn cmd_resolve(&self, market_id: &str, winner: Outcome) -> anyhow::Result<()> {
        let receipt = self.contract.resolve_market(market_id, winner).await?;
        if !receipt.success {
            bail!("Resolution was not accepted");
        }
        println!(
            "Market {} resolved: {}",
            market_id,
            winner.to_string().to_uppercase()
        );
        Ok(())
    }

    async fn cmd_claim(&self, market_id: &str) -> anyhow::Result<()> {
        let receipt = self.contract.claim_payout(market_id).await?;
        match receipt.amount {
            Some(amount) if receipt.success => {
                println!("Claimed {} STX from {}", amount, market_id)
            }
            _ => bail!("Nothing to claim for {}", market_id),
        }
        Ok(())
    }

    async fn cmd_dashboard(&self, wallet: Option<WalletKind>) -> anyhow::Result<()> {
        let session = self.connect_for(wallet).await?;
        let address = session
            .address
            .clone()
            .ok_or_else(|| anyhow!("Connected session has no address"))?;

        let catalog = self.catalog().await?;
        let positions = self.contract.user_positions(&address).await?;
        let summary = PortfolioSummary::from_positions(&positions);

        println!("{}", RULE);
        println!("FORECASTBTC - DASHBOARD");
        println!("{}", RULE);
        print_session(&session);
        println!("{}", THIN_RULE);
        println!("  Total Invested: {} STX", summary.total_invested);
        println!("  Current Value: {} STX", summary.total_current_value);
        println!(
            "  P&L: {:+} STX ({:+}%)",
            summary.total_pnl,
            summary.return_pct.round_dp(2)
        );
        println!(
            "  Win Rate: {}% ({} of {} winning)",
            summary.win_rate.round_dp(1),
            summary.winning,
            summary.positions
        );
        println!("{}", THIN_RULE);

        for position in &positions {
            let title = catalog
                .get(&position.market_id)
                .map_or(position.market_id.as_str(), |m| m.title.as_str());
            println!("{}", title);
            println!(
                "  {:<3}  staked {:>6}  value {:>6}  P&L {:>+6}",
                position.outcome.to_string().to_uppercase(),
                position.amount,
                position.current_value,
                position.pnl
            );
        }
        println!("{}", RULE);
        Ok(())
    }
}

fn print_session(session: &WalletSession) {
    match (&session.address, session.wallet_kind) {
        (Some(address), Some(kind)) if session.connected => {
            println!("  Wallet: {}", kind);
            println!("  Address: {} ({})", short_address(address), address);
            println!("  Balance: {} STX", session.balance);
        }
        _ => println!("  Session: disconnected"),
    }
}

fn reject(errors: ValidationErrors) -> anyhow::Result<()> {
    println!("Cannot submit:");
    for error in &errors {
        println!("  - {}", error);
    }
    Err(anyhow!("{} validation error(s)", errors.len()))
}
