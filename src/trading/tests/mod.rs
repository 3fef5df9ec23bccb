#[cfg(test)]
mod simulator_tests {
    use chrono::{TimeZone, Utc};
    use tracing::info;
    use tracing_subscriber::EnvFilter;

    use crate::market::types::AssetQuote;
    use crate::trading::simulator::{render_report, simulate, simulate_at};
    use crate::trading::{LeveragePolicy, SimulationConfig};

    const EPS: f64 = 1e-9;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn max_leverage_config() -> SimulationConfig {
        SimulationConfig {
            policy: LeveragePolicy::MaxLeverage { collateral_usd: 100.0 },
            taker_fee_rate: 0.00035,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn max_leverage_profitable_scenario() {
        init_logging();
        let quote = AssetQuote::new("XYZ", 0.001, 10.0, Some(20));
        let result = simulate(&quote, &max_leverage_config());
        info!(?result, "profitable scenario");

        assert_eq!(result.max_leverage, 20);
        assert_close(result.short_notional_usd, 2000.0);
        assert_close(result.legs.spot_notional_usd, 2000.0);
        assert_close(result.legs.short_tokens, 200.0);
        assert_close(result.legs.spot_tokens, 200.0);
        assert_close(result.legs.short_entry_fee, 0.7);
        assert_close(result.legs.spot_entry_fee, 0.7);
        assert_close(result.entry_fees, 1.4);
        assert_close(result.expected_funding_1h, 2.0);
        assert_close(result.net_pnl_1h, 0.6);
        assert_close(result.legs.total_outlay_usd, 2100.0);
        assert!(result.is_profitable());

        let report = render_report(&result);
        assert!(report.contains("--- SIMULATE ENTRY: XYZ ---"));
        assert!(report.contains("Current funding (hourly): 0.100000%"));
        assert!(report.contains("Open SHORT: $2000.00 (x20 on $100.00) -> 200.000000 tokens"));
        assert!(report.contains("Entry fees (spot+perp): $1.4000"));
        assert!(report.contains("Profitable in first interval"));
    }

    #[test]
    fn low_funding_scenario_warns() {
        let quote = AssetQuote::new("XYZ", 0.0001, 10.0, Some(20));
        let result = simulate(&quote, &max_leverage_config());

        assert_close(result.expected_funding_1h, 0.2);
        assert_close(result.net_pnl_1h, -1.2);
        assert!(!result.is_profitable());

        let report = render_report(&result);
        assert!(report.contains("P&L after 1 hour (w/ entry fees): $-1.2000"));
        assert!(report.contains("WARNING: fees exceed first-interval funding income"));
    }

    #[test]
    fn missing_max_leverage_falls_back_to_ten() {
        let quote = AssetQuote::new("NEW", 0.0002, 4.0, None);
        let result = simulate(&quote, &max_leverage_config());
        assert_eq!(result.max_leverage, 10);
        assert_close(result.short_notional_usd, 1000.0);
    }

    #[test]
    fn fixed_leverage_ignores_quote_leverage() {
        let config = SimulationConfig {
            policy: LeveragePolicy::FixedLeverage { leverage: 3, collateral_usd: 50.0 },
            taker_fee_rate: 0.0005,
        };
        let quote = AssetQuote::new("XYZ", 0.001, 10.0, Some(40));
        let result = simulate(&quote, &config);

        assert_eq!(result.max_leverage, 3);
        assert_close(result.collateral_usd, 50.0);
        assert_close(result.short_notional_usd, 150.0);
        assert_close(result.legs.spot_notional_usd, result.short_notional_usd);
        assert_close(result.entry_fees, 2.0 * 150.0 * 0.0005);
    }

    #[test]
    fn zero_price_zeroes_token_quantities() {
        let quote = AssetQuote::new("DEAD", 0.001, 0.0, Some(20));
        let result = simulate(&quote, &max_leverage_config());

        assert_eq!(result.legs.short_tokens, 0.0);
        assert_eq!(result.legs.spot_tokens, 0.0);
        assert!(result.legs.short_tokens.is_finite());
        assert_close(result.entry_fees, 1.4);

        let negative = AssetQuote::new("NEG", 0.001, -5.0, Some(20));
        let result = simulate(&negative, &max_leverage_config());
        assert_eq!(result.legs.short_tokens, 0.0);
        assert_eq!(result.legs.spot_tokens, 0.0);
    }

    #[test]
    fn negative_funding_produces_negative_payout() {
        let quote = AssetQuote::new("XYZ", -0.0005, 10.0, Some(20));
        let result = simulate(&quote, &max_leverage_config());
        assert_close(result.expected_funding_1h, -1.0);
        assert_close(result.net_pnl_1h, -2.4);
    }

    #[test]
    fn fee_is_notional_times_rate_per_leg() {
        for (leverage, rate) in [(1u32, 0.0001), (7, 0.00035), (50, 0.001)] {
            let config = SimulationConfig {
                policy: LeveragePolicy::FixedLeverage { leverage, collateral_usd: 100.0 },
                taker_fee_rate: rate,
            };
            let quote = AssetQuote::new("XYZ", 0.0, 1.0, None);
            let result = simulate(&quote, &config);
            let notional = 100.0 * leverage as f64;
            assert_close(result.legs.short_entry_fee, notional * rate);
            assert_close(result.entry_fees, 2.0 * notional * rate);
        }
    }

    #[test]
    fn simulation_is_pure_apart_from_timestamp() {
        let quote = AssetQuote::new("XYZ", 0.00042, 12.5, Some(25));
        let config = max_leverage_config();
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(simulate_at(&quote, &config, ts), simulate_at(&quote, &config, ts));

        let mut a = simulate(&quote, &config);
        let b = simulate(&quote, &config);
        a.timestamp = b.timestamp;
        assert_eq!(a, b);
    }

    #[test]
    fn timestamp_is_utc_iso8601_with_z_suffix() {
        let quote = AssetQuote::new("XYZ", 0.001, 10.0, Some(20));
        let ts = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let result = simulate_at(&quote, &max_leverage_config(), ts);
        assert_eq!(result.timestamp_iso8601(), "2026-10-18T09:30:00.000000Z");
    }
}
