pub mod history;
pub mod simulator;

#[cfg(test)]
mod tests;

/// How the short leg's leverage and margin are chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeveragePolicy {
    /// Use the asset's advertised max leverage on a fixed collateral.
    MaxLeverage { collateral_usd: f64 },
    /// Same leverage and collateral for every asset.
    FixedLeverage { leverage: u32, collateral_usd: f64 },
}

impl LeveragePolicy {
    pub fn collateral_usd(&self) -> f64 {
        match self {
            LeveragePolicy::MaxLeverage { collateral_usd } => *collateral_usd,
            LeveragePolicy::FixedLeverage { collateral_usd, .. } => *collateral_usd,
        }
    }

    pub fn default_output_file(&self) -> &'static str {
        match self {
            LeveragePolicy::MaxLeverage { .. } => "history.csv",
            LeveragePolicy::FixedLeverage { .. } => "history_fixed_leverage.csv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub policy: LeveragePolicy,
    pub taker_fee_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            policy: LeveragePolicy::MaxLeverage {
                collateral_usd: crate::config::DEFAULT_COLLATERAL_USD,
            },
            taker_fee_rate: crate::config::DEFAULT_TAKER_FEE_RATE,
        }
    }
}
