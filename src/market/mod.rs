pub mod hyperliquid;
pub mod traits;
pub mod types;

use std::fmt::Write as _;
use std::io::{self, Write};

use tracing::warn;

use traits::MarketDataSource;
use types::AssetQuote;

/// Stable sort by hourly funding rate, highest first, keeping at most `limit` entries.
pub fn rank(quotes: &[AssetQuote], limit: usize) -> Vec<AssetQuote> {
    if quotes.is_empty() {
        return Vec::new();
    }
    let mut ranked = quotes.to_vec();
    ranked.sort_by(|a, b| b.funding_rate_hourly.total_cmp(&a.funding_rate_hourly));
    ranked.truncate(limit);
    ranked
}

/// Fetch failures are reported on `out` and collapse to an empty list so the
/// caller falls through to the "no data" path.
pub async fn fetch_quotes_or_empty<S, W>(source: &S, out: &mut W) -> io::Result<Vec<AssetQuote>>
where
    S: MarketDataSource + Sync + ?Sized,
    W: Write,
{
    match source.fetch_quotes().await {
        Ok(quotes) => Ok(quotes),
        Err(e) => {
            warn!(source = source.name(), error = %e, "market data fetch failed");
            writeln!(out, "{}", e)?;
            Ok(Vec::new())
        }
    }
}

pub fn render_ranked_table(ranked: &[AssetQuote]) -> String {
    let mut table = String::new();
    let _ = writeln!(table, "Top coins by funding:");
    let _ = writeln!(
        table,
        "{:<12} {:>20} {:>16} {:>13}",
        "Symbol", "Funding (hourly)", "Price", "Max Leverage"
    );
    let _ = writeln!(table, "{:-<64}", "");
    for quote in ranked {
        let leverage = match quote.max_leverage {
            Some(lev) => format!("{}x", lev),
            None => format!("{}x*", quote.leverage_or_default()),
        };
        let _ = writeln!(
            table,
            "{:<12} {:>19.6}% {:>16} {:>13}",
            quote.symbol,
            quote.funding_rate_hourly * 100.0,
            quote.mark_price,
            leverage
        );
    }
    table
}
