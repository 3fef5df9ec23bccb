use std::io::Write;

use anyhow::Result;
use tracing::info;

use crate::market::traits::MarketDataSource;
use crate::market::{fetch_quotes_or_empty, rank, render_ranked_table};
use crate::trading::history::ResultLogger;
use crate::trading::simulator::{render_report, simulate, SimulationResult};
use crate::trading::SimulationConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Nothing to rank; either the venue returned no usable assets or the fetch failed.
    NoData,
    Logged(SimulationResult),
}

/// One scan: fetch, rank, simulate the top asset, print, append to history.
pub struct App<S> {
    source: S,
    simulation: SimulationConfig,
    top_n: usize,
    logger: ResultLogger,
}

impl<S> App<S>
where
    S: MarketDataSource + Sync,
{
    pub fn new(source: S, simulation: SimulationConfig, top_n: usize, logger: ResultLogger) -> Self {
        Self {
            source,
            simulation,
            top_n,
            logger,
        }
    }

    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunOutcome> {
        let quotes = fetch_quotes_or_empty(&self.source, out).await?;
        let ranked = rank(&quotes, self.top_n);

        let Some(best) = ranked.first() else {
            writeln!(out, "No data available from API.")?;
            info!(source = self.source.name(), "no market data, nothing simulated");
            return Ok(RunOutcome::NoData);
        };

        write!(out, "{}", render_ranked_table(&ranked))?;

        let result = simulate(best, &self.simulation);
        writeln!(out)?;
        write!(out, "{}", render_report(&result))?;
        out.flush()?;

        self.logger.append(&result)?;
        writeln!(out, "Logged result to {}", self.logger.path().display())?;

        Ok(RunOutcome::Logged(result))
    }
}
