use anyhow::Context;
use walletscan::{
    arguments::{is_help_requested, print_debug_info, print_help},
    config::resolve_config,
    logger::{self as logger, LogTag},
    run::{install_shutdown_handler, run},
};

/// Main entry point for walletscan
///
/// Prints the recent transactions and token portfolio of one wallet, then
/// keeps polling for new signatures until Ctrl+C (unless --no-poll).
#[tokio::main]
async fn main() {
    // .env is optional; real environment variables win
    dotenv::dotenv().ok();

    logger::init();

    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    logger::info(LogTag::System, "🚀 walletscan starting up...");
    print_debug_info();

    let code = match start().await {
        Ok(()) => 0,
        Err(e) => {
            logger::error(LogTag::System, &format!("❌ {:#}", e));
            1
        }
    };

    logger::flush();
    std::process::exit(code);
}

async fn start() -> anyhow::Result<()> {
    let config = resolve_config().context("Configuration error")?;
    logger::info(LogTag::Config, "Configuration loaded successfully");

    let shutdown = install_shutdown_handler().context("Failed to install Ctrl+C handler")?;

    let report = run(&config, shutdown).await?;
    logger::debug(LogTag::System, &format!("Run report: {:?}", report));
    Ok(())
}
