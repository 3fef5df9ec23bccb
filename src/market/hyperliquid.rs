use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::traits::MarketDataSource;
use super::types::AssetQuote;
use crate::error::ScanError;

pub const MAINNET_INFO_URL: &str = "https://api.hyperliquid.xyz/info";
pub const TESTNET_INFO_URL: &str = "https://api.hyperliquid-testnet.xyz/info";

#[derive(Debug, Clone)]
pub struct HyperliquidMarketData {
    client: reqwest::Client,
    info_url: String,
}

impl HyperliquidMarketData {
    pub fn new(testnet: bool, timeout: Duration) -> Result<Self, ScanError> {
        let url = if testnet { TESTNET_INFO_URL } else { MAINNET_INFO_URL };
        Self::with_url(url, timeout)
    }

    pub fn with_url(info_url: &str, timeout: Duration) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            info_url: info_url.to_string(),
        })
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }
}

#[async_trait]
impl MarketDataSource for HyperliquidMarketData {
    fn name(&self) -> &str {
        "Hyperliquid"
    }

    async fn fetch_quotes(&self) -> Result<Vec<AssetQuote>, ScanError> {
        debug!(url = %self.info_url, "requesting metaAndAssetCtxs");
        let response = self
            .client
            .post(&self.info_url)
            .json(&serde_json::json!({
                "type": "metaAndAssetCtxs"
            }))
            .send()
            .await?
            .error_for_status()?;

        let response_text = response.text().await?;
        let data: Value = serde_json::from_str(&response_text)
            .map_err(|e| ScanError::Format(format!("body is not JSON: {}", e)))?;

        let quotes = parse_meta_and_asset_ctxs(&data)?;
        info!(assets = quotes.len(), "fetched Hyperliquid asset contexts");
        Ok(quotes)
    }
}

/// Pairs `universe[i]` with `assetCtxs[i]`. Entries with a missing or
/// non-numeric name, funding or mark price are dropped individually.
pub fn parse_meta_and_asset_ctxs(data: &Value) -> Result<Vec<AssetQuote>, ScanError> {
    let parts = data
        .as_array()
        .filter(|parts| parts.len() == 2)
        .ok_or_else(|| ScanError::Format("expected a two-element array".to_string()))?;

    let universe = parts[0]
        .get("universe")
        .and_then(Value::as_array)
        .ok_or_else(|| ScanError::Format("element 0 has no universe list".to_string()))?;

    let asset_ctxs = parts[1]
        .as_array()
        .ok_or_else(|| ScanError::Format("element 1 is not a list of asset contexts".to_string()))?;

    if universe.len() != asset_ctxs.len() {
        return Err(ScanError::Format(format!(
            "universe has {} assets but {} contexts were returned",
            universe.len(),
            asset_ctxs.len()
        )));
    }

    let quotes: Vec<AssetQuote> = universe
        .iter()
        .zip(asset_ctxs)
        .enumerate()
        .filter_map(|(index, (meta, ctx))| {
            let quote = build_quote(meta, ctx);
            if quote.is_none() {
                debug!(index, "skipping asset with incomplete metadata or context");
            }
            quote
        })
        .collect();

    Ok(quotes)
}

fn build_quote(meta: &Value, ctx: &Value) -> Option<AssetQuote> {
    Some(AssetQuote {
        symbol: meta.get("name")?.as_str()?.to_string(),
        funding_rate_hourly: numeric(ctx.get("funding")?)?,
        mark_price: numeric(ctx.get("markPx")?)?,
        max_leverage: meta.get("maxLeverage").and_then(leverage),
    })
}

/// Hyperliquid sends decimals as strings; plain JSON numbers are accepted too.
fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn leverage(value: &Value) -> Option<u32> {
    let raw = value.as_f64()?;
    if raw.is_finite() && raw >= 1.0 && raw <= u32::MAX as f64 {
        Some(raw.trunc() as u32)
    } else {
        None
    }
}
