//! Weather-to-agronomy analysis
//!
//! Turns a week of forecast weather and a baseline soil record into risk
//! alerts, a projected soil record and field recommendations. Everything here
//! is a pure function of its inputs.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    DailyForecast, Recommendations, SoilAnalysis, SoilHealth, SoilMetric, WeatherSignals,
    FORECAST_DAYS,
};

// ============================================================================
// Alert and recommendation text
// ============================================================================

pub const ALERT_NO_RISK: &str = "No unusual weather risks detected this week.";
pub const ALERT_HIGH_WIND: &str =
    "High winds expected: risk of crop lodging and pesticide spray drift.";
pub const ALERT_FUNGAL: &str =
    "Warm, very humid days ahead: elevated fungal disease pressure.";
pub const ALERT_LEACHING: &str =
    "Heavy rainfall expected: risk of Nitrogen and Potassium leaching from the root zone.";
pub const ALERT_DROUGHT: &str =
    "Three or more consecutive hot, dry days expected: drought stress likely.";

pub const FERTILIZER_AFTER_RAIN: &str = "Split the nitrogen dose: apply urea in 2-3 smaller \
     top-dressings after the heavy rain passes to limit leaching losses.";
pub const FERTILIZER_HEAT: &str = "Postpone top-dressing during the heat spell; apply \
     fertilizer after irrigation in the cooler morning hours.";
pub const FERTILIZER_DEFAULT: &str =
    "Apply balanced NPK (10:26:26) at the rate given on your soil health card.";

pub const ZINC_RECOMMENDATION: &str =
    "Apply zinc sulphate at 25 kg/ha as a basal dose to correct zinc deficiency.";

pub const PH_RAIN_PREFIX: &str = "Heavy rain may acidify the soil further. ";
pub const PH_HEAT_PREFIX: &str = "The dry spell may raise pH slightly. ";
pub const PH_LIMING: &str =
    "Apply agricultural lime at 2-4 t/ha to bring soil pH towards 6.5.";

pub const IRRIGATION_HEAT: &str =
    "Switch to shorter, more frequent irrigation to carry the crop through the heat.";
pub const IRRIGATION_AFTER_RAIN: &str =
    "Delay irrigation by 2-3 days after the heavy rain to avoid waterlogging.";
pub const IRRIGATION_DEFAULT: &str =
    "Irrigate every 7-10 days, keeping the soil moist but not saturated.";

pub const PEST_HUMID: &str = "High humidity favours blight: scout for leaf lesions and \
     apply a preventive fungicide if symptoms appear.";
pub const PEST_DEFAULT: &str =
    "Monitor for aphids and whiteflies; yellow sticky traps help with early detection.";

// ============================================================================
// Thresholds
// ============================================================================

fn heavy_rain_mm() -> Decimal {
    Decimal::from(50)
}

fn likely_heavy_rain_mm() -> Decimal {
    Decimal::from(30)
}

fn likely_rain_pop() -> Decimal {
    Decimal::new(8, 1)
}

fn dry_pop() -> Decimal {
    Decimal::new(2, 1)
}

fn heat_celsius() -> Decimal {
    Decimal::from(35)
}

fn high_wind_mps() -> Decimal {
    Decimal::from(12)
}

fn fungal_temp_celsius() -> Decimal {
    Decimal::from(28)
}

const HUMID_PERCENT: i32 = 90;

/// A day that counts towards the heavy-rain tally
pub fn is_heavy_rain_day(day: &DailyForecast) -> bool {
    let rain = day.rainfall();
    rain >= heavy_rain_mm() || (day.pop >= likely_rain_pop() && rain >= likely_heavy_rain_mm())
}

/// A day that extends a drought/heat streak
pub fn is_dry_hot_day(day: &DailyForecast) -> bool {
    day.pop <= dry_pop() && day.temp_max_celsius >= heat_celsius()
}

fn is_windy_day(day: &DailyForecast) -> bool {
    day.wind_speed_mps.map(|w| w >= high_wind_mps()).unwrap_or(false)
}

fn is_humid_day(day: &DailyForecast) -> bool {
    day.humidity_percent.map(|h| h >= HUMID_PERCENT).unwrap_or(false)
}

// ============================================================================
// Analyzer
// ============================================================================

/// Insertion-ordered set of alert messages
#[derive(Debug, Default)]
struct AlertSet(Vec<String>);

impl AlertSet {
    fn raise(&mut self, message: &str) {
        if !self.0.iter().any(|m| m == message) {
            self.0.push(message.to_string());
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Analyze a forecast week against a baseline soil record
///
/// Only the first seven days are considered. The baseline is never modified;
/// the adjusted record is an independent copy.
pub fn analyze_weather(forecast: &[DailyForecast], baseline: &SoilHealth) -> SoilAnalysis {
    let week = &forecast[..forecast.len().min(FORECAST_DAYS)];

    let mut alerts = AlertSet::default();
    let signals = scan_week(week, &mut alerts);

    if signals.has_heavy_rain() {
        alerts.raise(ALERT_LEACHING);
    }
    if signals.has_heat_streak() {
        alerts.raise(ALERT_DROUGHT);
    }
    if alerts.is_empty() {
        alerts.raise(ALERT_NO_RISK);
    }

    let mut diagnostics = Vec::new();
    let adjusted_soil = adjust_soil(baseline, &signals, &mut diagnostics);

    SoilAnalysis {
        alerts: alerts.0,
        signals,
        adjusted_soil,
        recommendations: recommend(&signals),
        diagnostics,
    }
}

/// Single chronological pass collecting weekly signals and per-day hazards
pub fn weather_signals(forecast: &[DailyForecast]) -> WeatherSignals {
    let week = &forecast[..forecast.len().min(FORECAST_DAYS)];
    scan_week(week, &mut AlertSet::default())
}

fn scan_week(week: &[DailyForecast], alerts: &mut AlertSet) -> WeatherSignals {
    let mut signals = WeatherSignals::default();
    let mut streak = 0u32;

    for day in week {
        if is_heavy_rain_day(day) {
            signals.heavy_rain_days += 1;
        }

        if is_dry_hot_day(day) {
            streak += 1;
            signals.max_heat_streak = signals.max_heat_streak.max(streak);
        } else {
            streak = 0;
        }

        if is_windy_day(day) {
            alerts.raise(ALERT_HIGH_WIND);
        }
        if is_humid_day(day) {
            signals.humid_days += 1;
            if day.temp_max_celsius >= fungal_temp_celsius() {
                alerts.raise(ALERT_FUNGAL);
            }
        }
    }

    signals
}

// ============================================================================
// Soil adjustment
// ============================================================================

/// Project the baseline soil record forward under the week's weather
pub fn adjust_soil(
    baseline: &SoilHealth,
    signals: &WeatherSignals,
    diagnostics: &mut Vec<String>,
) -> SoilHealth {
    let mut soil = baseline.clone();
    let zero = Decimal::ZERO;
    let tenth = Decimal::new(1, 1);

    if signals.has_heavy_rain() {
        adjust_reading(
            &mut soil,
            SoilMetric::Nitrogen,
            |v| (v * Decimal::new(90, 2)).max(zero),
            diagnostics,
        );
        adjust_reading(
            &mut soil,
            SoilMetric::Potassium,
            |v| (v * Decimal::new(92, 2)).max(zero),
            diagnostics,
        );
        adjust_reading(&mut soil, SoilMetric::Ph, |v| (v - tenth).max(zero), diagnostics);
        adjust_reading(
            &mut soil,
            SoilMetric::OrganicCarbon,
            |v| (v * Decimal::new(98, 2)).max(zero),
            diagnostics,
        );
    }

    if signals.has_heat_streak() {
        adjust_reading(
            &mut soil,
            SoilMetric::Potassium,
            |v| (v * Decimal::new(95, 2)).max(zero),
            diagnostics,
        );
        adjust_reading(&mut soil, SoilMetric::Ph, |v| v + tenth, diagnostics);
        adjust_reading(
            &mut soil,
            SoilMetric::OrganicCarbon,
            |v| v * Decimal::new(103, 2),
            diagnostics,
        );
    }

    for metric in SoilMetric::WEATHER_SENSITIVE {
        if let Some(reading) = soil.reading_mut(metric) {
            reading.status = metric.classify(parse_leading_number(&reading.value));
        }
    }

    soil
}

/// Rewrite one reading's numeric value, keeping its unit text and precision
fn adjust_reading(
    soil: &mut SoilHealth,
    metric: SoilMetric,
    f: impl Fn(Decimal) -> Decimal,
    diagnostics: &mut Vec<String>,
) {
    let Some(reading) = soil.reading_mut(metric) else {
        return;
    };

    reading.value = match find_numeric_token(&reading.value) {
        Some(token) => {
            let updated = format_decimal(f(token.value), token.decimals);
            format!(
                "{}{}{}",
                &reading.value[..token.start],
                updated,
                &reading.value[token.end..]
            )
        }
        None => {
            diagnostics.push(format!(
                "{} value {:?} has no number; treated as 0",
                reading.name, reading.value
            ));
            format_decimal(f(Decimal::ZERO), 0)
        }
    };
}

fn format_decimal(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    rounded.to_string()
}

// ============================================================================
// Recommendations
// ============================================================================

/// Pick recommendation text from the week's signals
pub fn recommend(signals: &WeatherSignals) -> Recommendations {
    let fertilizer = if signals.has_heavy_rain() {
        FERTILIZER_AFTER_RAIN
    } else if signals.has_heat_streak() {
        FERTILIZER_HEAT
    } else {
        FERTILIZER_DEFAULT
    };

    let ph_prefix = if signals.has_heavy_rain() {
        PH_RAIN_PREFIX
    } else if signals.has_heat_streak() {
        PH_HEAT_PREFIX
    } else {
        ""
    };

    let irrigation = if signals.has_heat_streak() {
        IRRIGATION_HEAT
    } else if signals.has_heavy_rain() {
        IRRIGATION_AFTER_RAIN
    } else {
        IRRIGATION_DEFAULT
    };

    let pest = if signals.has_humid_days() {
        PEST_HUMID
    } else {
        PEST_DEFAULT
    };

    Recommendations {
        fertilizer: fertilizer.to_string(),
        zinc: ZINC_RECOMMENDATION.to_string(),
        ph: format!("{}{}", ph_prefix, PH_LIMING),
        irrigation: irrigation.to_string(),
        pest: pest.to_string(),
    }
}

// ============================================================================
// Numeric parsing
// ============================================================================

/// First signed decimal number found in a display string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericToken {
    pub value: Decimal,
    /// Byte offset where the token starts (including any sign)
    pub start: usize,
    /// Byte offset just past the token
    pub end: usize,
    /// Digits after the decimal point
    pub decimals: u32,
}

/// Locate the first number in `text`, e.g. `210` in "210 kg/ha"
pub fn find_numeric_token(text: &str) -> Option<NumericToken> {
    let bytes = text.as_bytes();
    let is_digit = |i: usize| bytes.get(i).map_or(false, u8::is_ascii_digit);

    let mut start = 0;
    while start < bytes.len() {
        let signed = matches!(bytes[start], b'-' | b'+') && is_digit(start + 1);
        if signed || is_digit(start) {
            break;
        }
        start += 1;
    }
    if start >= bytes.len() {
        return None;
    }

    let mut end = start + 1;
    while is_digit(end) {
        end += 1;
    }

    let mut decimals = 0;
    if bytes.get(end) == Some(&b'.') && is_digit(end + 1) {
        end += 1;
        while is_digit(end) {
            end += 1;
            decimals += 1;
        }
    }

    let literal = text[start..end].trim_start_matches('+');
    let value = Decimal::from_str(literal).ok()?;
    Some(NumericToken {
        value,
        start,
        end,
        decimals,
    })
}

/// Leading number of a display string, or zero when it carries none
pub fn parse_leading_number(text: &str) -> Decimal {
    find_numeric_token(text)
        .map(|token| token.value)
        .unwrap_or(Decimal::ZERO)
}
