use async_trait::async_trait;

use super::types::AssetQuote;
use crate::error::ScanError;

#[async_trait]
pub trait MarketDataSource {
    /// Human-readable venue name, used in log lines.
    fn name(&self) -> &str;
    async fn fetch_quotes(&self) -> Result<Vec<AssetQuote>, ScanError>;
}
