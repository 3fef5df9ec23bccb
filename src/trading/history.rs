use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::simulator::SimulationResult;
use crate::error::ScanError;

/// One line of the history file; field order is the column order.
#[derive(Debug, Serialize)]
pub struct HistoryRow<'a> {
    pub symbol: &'a str,
    pub price: f64,
    pub max_leverage: u32,
    pub collateral_usd: f64,
    pub short_notional_usd: f64,
    pub funding_rate_hourly: f64,
    pub expected_funding_1h: f64,
    pub entry_fees: f64,
    pub net_pnl_1h: f64,
    pub timestamp: String,
}

impl<'a> From<&'a SimulationResult> for HistoryRow<'a> {
    fn from(result: &'a SimulationResult) -> Self {
        Self {
            symbol: &result.symbol,
            price: result.price,
            max_leverage: result.max_leverage,
            collateral_usd: result.collateral_usd,
            short_notional_usd: result.short_notional_usd,
            funding_rate_hourly: result.funding_rate_hourly,
            expected_funding_1h: result.expected_funding_1h,
            entry_fees: result.entry_fees,
            net_pnl_1h: result.net_pnl_1h,
            timestamp: result.timestamp_iso8601(),
        }
    }
}

/// Append-only CSV log of simulation results, one row per run.
#[derive(Debug, Clone)]
pub struct ResultLogger {
    path: PathBuf,
}

impl ResultLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, result: &SimulationResult) -> Result<(), ScanError> {
        let write_header = !self.path.exists();

        let io_err = |source: io::Error| ScanError::Io {
            path: self.path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        wtr.serialize(HistoryRow::from(result))
            .map_err(|e| io_err(e.into()))?;
        wtr.flush().map_err(io_err)?;

        info!(path = %self.path.display(), header = write_header, "appended simulation result");
        Ok(())
    }
}
