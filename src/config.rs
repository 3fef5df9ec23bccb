use std::path::PathBuf;

use crate::error::ScanError;
use crate::trading::{LeveragePolicy, SimulationConfig};

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_COLLATERAL_USD: f64 = 100.0;
pub const DEFAULT_FIXED_LEVERAGE: u32 = 5;
pub const DEFAULT_TAKER_FEE_RATE: f64 = 0.00035;

const ENV_OUTPUT_CSV: &str = "OUTPUT_CSV";
const ENV_POLICY: &str = "HL_LEVERAGE_POLICY";
const ENV_COLLATERAL: &str = "HL_COLLATERAL_USD";
const ENV_FIXED_LEVERAGE: &str = "HL_FIXED_LEVERAGE";
const ENV_TAKER_FEE: &str = "HL_TAKER_FEE_RATE";
const ENV_TOP_N: &str = "HL_TOP_N";
const ENV_TESTNET: &str = "HL_TESTNET";
const ENV_TIMEOUT_MS: &str = "HL_TIMEOUT_MS";
const ENV_LOG_DIR: &str = "HL_LOG_DIR";

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub testnet: bool,
    pub timeout_ms: u64,
    pub top_n: usize,
    pub simulation: SimulationConfig,
    pub output_path: PathBuf,
    pub log_dir: Option<PathBuf>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        let simulation = SimulationConfig::default();
        Self {
            testnet: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            top_n: DEFAULT_TOP_N,
            output_path: PathBuf::from(simulation.policy.default_output_file()),
            simulation,
            log_dir: None,
        }
    }
}

impl ScannerConfig {
    /// Loads settings from process environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ScanError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let collateral_usd = match read(ENV_COLLATERAL) {
            Some(raw) => parse_positive_f64(ENV_COLLATERAL, &raw)?,
            None => DEFAULT_COLLATERAL_USD,
        };

        let policy = match read(ENV_POLICY).as_deref() {
            None | Some("max") => LeveragePolicy::MaxLeverage { collateral_usd },
            Some("fixed") => {
                let leverage = match read(ENV_FIXED_LEVERAGE) {
                    Some(raw) => raw
                        .parse::<u32>()
                        .ok()
                        .filter(|lev| *lev >= 1)
                        .ok_or_else(|| {
                            ScanError::Config(format!(
                                "{ENV_FIXED_LEVERAGE} must be an integer >= 1, got {raw:?}"
                            ))
                        })?,
                    None => DEFAULT_FIXED_LEVERAGE,
                };
                LeveragePolicy::FixedLeverage { leverage, collateral_usd }
            }
            Some(other) => {
                return Err(ScanError::Config(format!(
                    "{ENV_POLICY} must be 'max' or 'fixed', got {other:?}"
                )))
            }
        };

        let taker_fee_rate = match read(ENV_TAKER_FEE) {
            Some(raw) => {
                let rate: f64 = raw.parse().map_err(|_| {
                    ScanError::Config(format!("{ENV_TAKER_FEE} is not a number: {raw:?}"))
                })?;
                if !rate.is_finite() || rate < 0.0 {
                    return Err(ScanError::Config(format!(
                        "{ENV_TAKER_FEE} must be a non-negative number, got {raw:?}"
                    )));
                }
                rate
            }
            None => DEFAULT_TAKER_FEE_RATE,
        };

        let top_n = match read(ENV_TOP_N) {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| {
                    ScanError::Config(format!("{ENV_TOP_N} must be an integer >= 1, got {raw:?}"))
                })?,
            None => DEFAULT_TOP_N,
        };

        let testnet = match read(ENV_TESTNET).as_deref() {
            None => false,
            Some("1") | Some("true") | Some("TRUE") | Some("yes") => true,
            Some("0") | Some("false") | Some("FALSE") | Some("no") => false,
            Some(other) => {
                return Err(ScanError::Config(format!(
                    "{ENV_TESTNET} must be a boolean, got {other:?}"
                )))
            }
        };

        let timeout_ms = match read(ENV_TIMEOUT_MS) {
            Some(raw) => raw.parse::<u64>().ok().filter(|ms| *ms > 0).ok_or_else(|| {
                ScanError::Config(format!("{ENV_TIMEOUT_MS} must be a positive integer, got {raw:?}"))
            })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        let output_path = read(ENV_OUTPUT_CSV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(policy.default_output_file()));

        Ok(Self {
            testnet,
            timeout_ms,
            top_n,
            simulation: SimulationConfig { policy, taker_fee_rate },
            output_path,
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }
}

fn parse_positive_f64(key: &str, raw: &str) -> Result<f64, ScanError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or_else(|| ScanError::Config(format!("{key} must be a positive number, got {raw:?}")))
}
