/// Walletscan run lifecycle
///
/// 1. Recent transactions: list, enrich, print summary and details
/// 2. Token portfolio (optional)
/// 3. Live poller until shutdown (optional)
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::{http_url_from_ws, Config};
use crate::display::{print_portfolio, TransactionFormatter};
use crate::errors::WalletscanError;
use crate::logger::{self, LogTag};
use crate::poller::LivePoller;
use crate::portfolio::PortfolioService;
use crate::rpc::{RpcClient, RpcGateway};
use crate::tokens::{HttpRegistryLoader, RegistryCache};
use crate::transactions::EnrichmentPipeline;

/// What a run produced, mostly for logging and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub transactions: usize,
    /// `None` when the portfolio step was skipped or failed
    pub holdings: Option<usize>,
    pub observed: usize,
}

/// Ctrl+C flips the returned receiver to `true`
pub fn install_shutdown_handler() -> Result<watch::Receiver<bool>, ctrlc::Error> {
    let (tx, rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        if tx.send_replace(true) {
            // Second Ctrl+C
            std::process::exit(130);
        }
        println!("\n🛑 [SIGNAL] Received Ctrl+C, shutting down...");
    })?;
    Ok(rx)
}

/// Build the real clients from `config` and run every stage
pub async fn run(
    config: &Config,
    shutdown: watch::Receiver<bool>,
) -> Result<RunReport, WalletscanError> {
    let timeout = Duration::from_secs(config.rpc.request_timeout_secs);
    let gateway = Arc::new(RpcClient::new(&config.rpc.url, timeout)?);

    // The poller talks HTTP to the host behind the live endpoint
    let poll_url = http_url_from_ws(&config.rpc.ws_url);
    let poll_gateway = if poll_url == config.rpc.url {
        Arc::clone(&gateway)
    } else {
        logger::debug(LogTag::Poller, &format!("Polling endpoint: {}", poll_url));
        Arc::new(RpcClient::new(&poll_url, timeout)?)
    };

    let registry = Arc::new(RegistryCache::new(Box::new(HttpRegistryLoader::new(
        &config.registry,
    )?)));

    run_with(config, gateway, poll_gateway, registry, shutdown).await
}

pub async fn run_with<G: RpcGateway + 'static>(
    config: &Config,
    gateway: Arc<G>,
    poll_gateway: Arc<G>,
    registry: Arc<RegistryCache>,
    shutdown: watch::Receiver<bool>,
) -> Result<RunReport, WalletscanError> {
    let wallet = config.inspector.wallet_address.as_str();
    let mut report = RunReport::default();

    logger::info(
        LogTag::System,
        &format!("🚀 Inspecting wallet {} via {}", wallet, config.rpc.url),
    );

    // 1. Recent transactions; a failed listing skips only this report
    let pipeline = EnrichmentPipeline::from_config(Arc::clone(&gateway), &config.inspector);
    let listing_error = match pipeline
        .fetch_account_transactions(wallet, config.inspector.transactions_limit, &shutdown)
        .await
    {
        Ok(batch) => {
            report.transactions = batch.len();
            if batch.is_empty() {
                logger::info(LogTag::Transactions, "No recent transactions found for account");
            } else {
                let formatter = TransactionFormatter::new(config.inspector.show_full_data);
                logger::debug(
                    LogTag::Display,
                    &format!(
                        "Rendering {} transactions (full data: {})",
                        batch.len(),
                        config.inspector.show_full_data
                    ),
                );
                formatter.print_summary(&batch);
                for (index, tx) in batch.transactions.iter().enumerate() {
                    formatter.print_details(tx, index);
                }
            }
            None
        }
        Err(e) => {
            logger::error(
                LogTag::Transactions,
                &format!("Error fetching transactions: {}", e),
            );
            Some(e)
        }
    };

    // 2. Portfolio
    if config.inspector.show_portfolio && !*shutdown.borrow() {
        let service = PortfolioService::new(Arc::clone(&gateway), registry);
        match service.fetch_holdings(wallet).await {
            Ok(holdings) => {
                print_portfolio(wallet, &holdings);
                report.holdings = Some(holdings.len());
            }
            Err(e) => logger::error(LogTag::Portfolio, &format!("Portfolio unavailable: {}", e)),
        }
    }

    // 3. Live poller
    if config.poller.enabled && !*shutdown.borrow() {
        let poller = LivePoller::new(
            poll_gateway,
            wallet,
            Duration::from_secs(config.poller.interval_secs),
        );
        report.observed = poller.run(shutdown).await;
    }

    if let Some(e) = listing_error {
        return Err(e.into());
    }

    logger::info(
        LogTag::System,
        &format!(
            "✅ Done: {} transactions, {} new while polling",
            report.transactions, report.observed
        ),
    );
    Ok(report)
}
