//! Weather analysis integration tests
//!
//! Exercises the analyzer end to end through the shared crate:
//! - Alert list shape (never empty, no duplicates)
//! - Only the first forecast week is considered
//! - The baseline record is never modified
//! - Soil adjustment under heavy rain and heat streaks

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    analyze_weather, baseline_soil_health, parse_leading_number, DailyForecast, SoilMetric,
    SoilStatus, ALERT_DROUGHT, ALERT_LEACHING, ALERT_NO_RISK, FORECAST_DAYS,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 5, 6, 0, 0).unwrap()
}

fn day(offset: i64, temp_max: &str, pop: &str, rain: &str) -> DailyForecast {
    DailyForecast {
        timestamp: start() + Duration::days(offset),
        temp_min_celsius: dec("20"),
        temp_max_celsius: dec(temp_max),
        pop: dec(pop),
        rain_mm: Some(dec(rain)),
        wind_speed_mps: Some(dec("3")),
        humidity_percent: Some(60),
        conditions: None,
    }
}

fn soil_value(analysis: &shared::SoilAnalysis, metric: SoilMetric) -> String {
    analysis.adjusted_soil.reading(metric).unwrap().value.clone()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A calm week leaves the soil record as it was
    #[test]
    fn test_calm_week_matches_baseline() {
        let week: Vec<_> = (0..7).map(|i| day(i, "27", "0.3", "2")).collect();
        let analysis = analyze_weather(&week, &baseline_soil_health());

        assert_eq!(analysis.alerts, vec![ALERT_NO_RISK.to_string()]);
        assert_eq!(analysis.adjusted_soil, baseline_soil_health());
        assert!(analysis.diagnostics.is_empty());
    }

    /// Monsoon burst on day two
    #[test]
    fn test_heavy_rain_week() {
        let mut week: Vec<_> = (0..7).map(|i| day(i, "29", "0.4", "0")).collect();
        week[1] = day(1, "26", "0.95", "72.5");

        let analysis = analyze_weather(&week, &baseline_soil_health());

        assert_eq!(analysis.alerts, vec![ALERT_LEACHING.to_string()]);
        assert_eq!(soil_value(&analysis, SoilMetric::Nitrogen), "189 kg/ha");
        assert_eq!(soil_value(&analysis, SoilMetric::Potassium), "110 kg/ha");
        assert_eq!(soil_value(&analysis, SoilMetric::Ph), "5.7");
        assert_eq!(soil_value(&analysis, SoilMetric::OrganicCarbon), "0.44%");
        assert_eq!(
            analysis
                .adjusted_soil
                .reading(SoilMetric::Nitrogen)
                .unwrap()
                .status,
            SoilStatus::Low
        );
    }

    /// Pre-monsoon heat: four dry days above 35°C
    #[test]
    fn test_heat_streak_week() {
        let mut week: Vec<_> = (0..7).map(|i| day(i, "33", "0.5", "1")).collect();
        for (i, d) in week.iter_mut().enumerate().take(5).skip(1) {
            *d = day(i as i64, "38", "0.05", "0");
        }

        let analysis = analyze_weather(&week, &baseline_soil_health());

        assert_eq!(analysis.signals.max_heat_streak, 4);
        assert_eq!(analysis.alerts, vec![ALERT_DROUGHT.to_string()]);
        assert_eq!(soil_value(&analysis, SoilMetric::Potassium), "114 kg/ha");
        assert_eq!(soil_value(&analysis, SoilMetric::Ph), "5.9");
        assert_eq!(soil_value(&analysis, SoilMetric::Nitrogen), "210 kg/ha");
    }

    /// A broken streak does not count
    #[test]
    fn test_interrupted_heat_does_not_trigger_drought() {
        let temps = ["36", "37", "30", "36", "37", "30", "36"];
        let week: Vec<_> = temps
            .iter()
            .enumerate()
            .map(|(i, t)| day(i as i64, t, "0.1", "0"))
            .collect();

        let analysis = analyze_weather(&week, &baseline_soil_health());

        assert_eq!(analysis.signals.max_heat_streak, 2);
        assert!(!analysis.alerts.contains(&ALERT_DROUGHT.to_string()));
    }

    /// The analyzer tolerates soil values that carry no number
    #[test]
    fn test_unparseable_soil_value_is_reported() {
        let mut baseline = baseline_soil_health();
        baseline.reading_mut(SoilMetric::Nitrogen).unwrap().value = "not tested".to_string();
        let week = vec![day(0, "26", "0.9", "55")];

        let analysis = analyze_weather(&week, &baseline);

        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(parse_leading_number(&soil_value(&analysis, SoilMetric::Nitrogen)), Decimal::ZERO);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for one forecast day's weather
    fn weather_strategy() -> impl Strategy<Value = (Decimal, Decimal, Decimal, Decimal, i32)> {
        (
            (150i64..=450i64).prop_map(|n| Decimal::new(n, 1)), // 15.0 to 45.0°C
            (0i64..=100i64).prop_map(|n| Decimal::new(n, 2)),   // pop 0.00 to 1.00
            (0i64..=1200i64).prop_map(|n| Decimal::new(n, 1)),  // 0.0 to 120.0mm
            (0i64..=250i64).prop_map(|n| Decimal::new(n, 1)),   // 0.0 to 25.0 m/s
            0..=100i32,
        )
    }

    /// Strategy for a chronological forecast of up to ten days
    fn forecast_strategy() -> impl Strategy<Value = Vec<DailyForecast>> {
        prop::collection::vec(weather_strategy(), 0..=10).prop_map(|days| {
            days.into_iter()
                .enumerate()
                .map(|(i, (temp_max, pop, rain, wind, humidity))| DailyForecast {
                    timestamp: start() + Duration::days(i as i64),
                    temp_min_celsius: temp_max - Decimal::from(8),
                    temp_max_celsius: temp_max,
                    pop,
                    rain_mm: Some(rain),
                    wind_speed_mps: Some(wind),
                    humidity_percent: Some(humidity),
                    conditions: None,
                })
                .collect()
        })
    }

    /// Strategy for a week that stays under both soil-adjustment thresholds:
    /// rain below 50mm with pop below 0.8, and every third day too cool to
    /// extend a heat streak
    fn sub_threshold_forecast_strategy() -> impl Strategy<Value = Vec<DailyForecast>> {
        let weather = (
            (150i64..=450i64).prop_map(|n| Decimal::new(n, 1)), // 15.0 to 45.0°C
            (0i64..=79i64).prop_map(|n| Decimal::new(n, 2)),    // pop 0.00 to 0.79
            (0i64..=499i64).prop_map(|n| Decimal::new(n, 1)),   // 0.0 to 49.9mm
            (0i64..=250i64).prop_map(|n| Decimal::new(n, 1)),
            0..=100i32,
        );
        prop::collection::vec(weather, 0..=FORECAST_DAYS).prop_map(|days| {
            days.into_iter()
                .enumerate()
                .map(|(i, (temp_max, pop, rain, wind, humidity))| {
                    let temp_max = if i % 3 == 2 { dec("30") } else { temp_max };
                    DailyForecast {
                        timestamp: start() + Duration::days(i as i64),
                        temp_min_celsius: dec("12"),
                        temp_max_celsius: temp_max,
                        pop,
                        rain_mm: Some(rain),
                        wind_speed_mps: Some(wind),
                        humidity_percent: Some(humidity),
                        conditions: None,
                    }
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Below both thresholds the adjusted record equals the baseline, statuses included
        #[test]
        fn prop_sub_threshold_week_leaves_soil_unchanged(
            forecast in sub_threshold_forecast_strategy()
        ) {
            let analysis = analyze_weather(&forecast, &baseline_soil_health());

            prop_assert!(!analysis.signals.has_heavy_rain());
            prop_assert!(analysis.signals.max_heat_streak < 3);
            prop_assert_eq!(analysis.adjusted_soil, baseline_soil_health());
            prop_assert!(analysis.diagnostics.is_empty());
        }

        /// Alerts are never empty and never repeat
        #[test]
        fn prop_alerts_non_empty_and_distinct(forecast in forecast_strategy()) {
            let analysis = analyze_weather(&forecast, &baseline_soil_health());

            prop_assert!(!analysis.alerts.is_empty());
            for (i, alert) in analysis.alerts.iter().enumerate() {
                prop_assert!(!analysis.alerts[i + 1..].contains(alert));
            }
            if analysis.alerts.contains(&ALERT_NO_RISK.to_string()) {
                prop_assert_eq!(analysis.alerts.len(), 1);
            }
        }

        /// Same input, same output; the baseline is left untouched
        #[test]
        fn prop_analysis_is_pure(forecast in forecast_strategy()) {
            let baseline = baseline_soil_health();
            let first = analyze_weather(&forecast, &baseline);
            let second = analyze_weather(&forecast, &baseline);

            prop_assert_eq!(first, second);
            prop_assert_eq!(baseline, baseline_soil_health());
        }

        /// Days past the first week never change the result
        #[test]
        fn prop_only_first_week_counts(forecast in forecast_strategy()) {
            let week = &forecast[..forecast.len().min(FORECAST_DAYS)];
            prop_assert_eq!(
                analyze_weather(&forecast, &baseline_soil_health()),
                analyze_weather(week, &baseline_soil_health())
            );
        }

        /// Nitrogen moves only with heavy rain, and only downwards
        #[test]
        fn prop_nitrogen_follows_heavy_rain(forecast in forecast_strategy()) {
            let analysis = analyze_weather(&forecast, &baseline_soil_health());
            let expected = if analysis.signals.has_heavy_rain() { "189 kg/ha" } else { "210 kg/ha" };
            prop_assert_eq!(soil_value(&analysis, SoilMetric::Nitrogen), expected);
        }

        /// Adjusted statuses always agree with the adjusted values
        #[test]
        fn prop_status_matches_value(forecast in forecast_strategy()) {
            let analysis = analyze_weather(&forecast, &baseline_soil_health());
            for metric in SoilMetric::WEATHER_SENSITIVE {
                let reading = analysis.adjusted_soil.reading(metric).unwrap();
                prop_assert_eq!(
                    reading.status,
                    metric.classify(parse_leading_number(&reading.value))
                );
            }
        }
    }
}
