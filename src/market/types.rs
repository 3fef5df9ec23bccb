/// Leverage assumed when the exchange metadata carries none.
pub const DEFAULT_MAX_LEVERAGE: u32 = 10;

/// Funding and price snapshot for one perpetual, as returned by a single fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuote {
    pub symbol: String,
    /// Fractional hourly rate, 0.0001 = 0.01%.
    pub funding_rate_hourly: f64,
    pub mark_price: f64,
    pub max_leverage: Option<u32>,
}

impl AssetQuote {
    pub fn new(symbol: &str, funding_rate_hourly: f64, mark_price: f64, max_leverage: Option<u32>) -> Self {
        Self {
            symbol: symbol.to_string(),
            funding_rate_hourly,
            mark_price,
            max_leverage,
        }
    }

    pub fn leverage_or_default(&self) -> u32 {
        self.max_leverage.unwrap_or(DEFAULT_MAX_LEVERAGE)
    }
}
