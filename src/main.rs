use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, EnvFilter};

use hl_funding_sim::app::{App, RunOutcome};
use hl_funding_sim::market::hyperliquid::HyperliquidMarketData;
use hl_funding_sim::trading::history::ResultLogger;
use hl_funding_sim::ScannerConfig;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init_logging() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

pub fn init_file_logging(dir: &Path) {
    let file_appender = RollingFileAppender::new(Rotation::NEVER, dir, "funding_sim.log");

    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .with_line_number(true)
        .with_file(true)
        .with_level(true)
        .compact()
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = match ScannerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging();
            error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };

    match &config.log_dir {
        Some(dir) => init_file_logging(dir),
        None => init_logging(),
    }
    info!(?config, "funding simulation starting");

    let source =
        HyperliquidMarketData::new(config.testnet, Duration::from_millis(config.timeout_ms))?;
    let app = App::new(
        source,
        config.simulation,
        config.top_n,
        ResultLogger::new(config.output_path.clone()),
    );

    let mut stdout = io::stdout();
    match app.run(&mut stdout).await {
        Ok(RunOutcome::Logged(result)) => {
            info!(symbol = %result.symbol, net_pnl_1h = result.net_pnl_1h, "run complete");
            Ok(())
        }
        Ok(RunOutcome::NoData) => Ok(()),
        Err(e) => {
            error!(error = %e, "run failed");
            Err(e)
        }
    }
}
