use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use super::{LeveragePolicy, SimulationConfig};
use crate::market::types::AssetQuote;

/// Token counts, notionals and fees of the two legs of the hedge.
#[derive(Debug, Clone, PartialEq)]
pub struct HedgeLegs {
    pub short_tokens: f64,
    pub spot_notional_usd: f64,
    pub spot_tokens: f64,
    pub short_entry_fee: f64,
    pub spot_entry_fee: f64,
    /// Perp margin plus the cash spent on the spot leg.
    pub total_outlay_usd: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub symbol: String,
    pub price: f64,
    pub max_leverage: u32,
    pub collateral_usd: f64,
    pub short_notional_usd: f64,
    pub funding_rate_hourly: f64,
    pub expected_funding_1h: f64,
    pub entry_fees: f64,
    pub net_pnl_1h: f64,
    pub timestamp: DateTime<Utc>,
    pub legs: HedgeLegs,
}

impl SimulationResult {
    pub fn is_profitable(&self) -> bool {
        self.net_pnl_1h >= 0.0
    }

    pub fn timestamp_iso8601(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

pub fn simulate(quote: &AssetQuote, config: &SimulationConfig) -> SimulationResult {
    simulate_at(quote, config, Utc::now())
}

/// Short perp on `collateral × leverage` notional, hedged by an equal spot buy.
pub fn simulate_at(
    quote: &AssetQuote,
    config: &SimulationConfig,
    timestamp: DateTime<Utc>,
) -> SimulationResult {
    let (leverage, collateral_usd) = match config.policy {
        LeveragePolicy::MaxLeverage { collateral_usd } => (quote.leverage_or_default(), collateral_usd),
        LeveragePolicy::FixedLeverage { leverage, collateral_usd } => (leverage, collateral_usd),
    };

    let price = quote.mark_price;
    let short_notional_usd = collateral_usd * leverage as f64;
    let spot_notional_usd = short_notional_usd;

    let short_tokens = tokens_for(short_notional_usd, price);
    let spot_tokens = tokens_for(spot_notional_usd, price);

    let short_entry_fee = short_notional_usd * config.taker_fee_rate;
    let spot_entry_fee = spot_notional_usd * config.taker_fee_rate;
    let entry_fees = short_entry_fee + spot_entry_fee;

    let expected_funding_1h = short_notional_usd * quote.funding_rate_hourly;
    let net_pnl_1h = expected_funding_1h - entry_fees;

    debug!(
        symbol = %quote.symbol,
        leverage,
        short_notional_usd,
        net_pnl_1h,
        "simulated hedged entry"
    );

    SimulationResult {
        symbol: quote.symbol.clone(),
        price,
        max_leverage: leverage,
        collateral_usd,
        short_notional_usd,
        funding_rate_hourly: quote.funding_rate_hourly,
        expected_funding_1h,
        entry_fees,
        net_pnl_1h,
        timestamp,
        legs: HedgeLegs {
            short_tokens,
            spot_notional_usd,
            spot_tokens,
            short_entry_fee,
            spot_entry_fee,
            total_outlay_usd: collateral_usd + spot_notional_usd,
        },
    }
}

// Non-positive prices are degenerate quotes; size them as zero tokens.
fn tokens_for(notional_usd: f64, price: f64) -> f64 {
    if price > 0.0 {
        notional_usd / price
    } else {
        0.0
    }
}

pub fn render_report(result: &SimulationResult) -> String {
    let mut output = String::new();
    let legs = &result.legs;

    let _ = writeln!(output, "--- SIMULATE ENTRY: {} ---", result.symbol);
    let _ = writeln!(output, "Price: ${}", result.price);
    let _ = writeln!(output, "Leverage: {}x", result.max_leverage);
    let _ = writeln!(
        output,
        "Current funding (hourly): {:.6}%",
        result.funding_rate_hourly * 100.0
    );
    let _ = writeln!(
        output,
        "Open SHORT: ${:.2} (x{} on ${:.2}) -> {:.6} tokens",
        result.short_notional_usd, result.max_leverage, result.collateral_usd, legs.short_tokens
    );
    let _ = writeln!(
        output,
        "Buy SPOT: ${:.2} -> {:.6} tokens",
        legs.spot_notional_usd, legs.spot_tokens
    );
    let _ = writeln!(output, "Total cash outlay: ${:.2}", legs.total_outlay_usd);
    let _ = writeln!(output, "Entry fees (spot+perp): ${:.4}", result.entry_fees);
    let _ = writeln!(
        output,
        "Expected funding payout per hour: ${:.4}",
        result.expected_funding_1h
    );
    let _ = writeln!(output, "P&L after 1 hour (w/ entry fees): ${:.4}", result.net_pnl_1h);

    if result.is_profitable() {
        let _ = writeln!(output, "Profitable in first interval (uncommon).");
    } else {
        let _ = writeln!(
            output,
            "WARNING: fees exceed first-interval funding income, requires holding longer."
        );
    }

    output
}
