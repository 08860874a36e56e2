//! Weather service: forecast retrieval and agronomic analysis

use std::sync::Arc;

use shared::{
    analyze_weather, baseline_soil_health, validate_forecast, DailyForecast, GpsCoordinates,
    SoilAnalysis, WeatherForecast,
};

use crate::error::{AppError, AppResult};
use crate::external::ForecastProvider;

/// Weather service wrapping the configured forecast provider
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn ForecastProvider>,
}

impl WeatherService {
    /// Create a new WeatherService instance
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the one-week forecast for a coordinate
    pub async fn get_forecast(&self, location: GpsCoordinates) -> AppResult<WeatherForecast> {
        let forecast = self.provider.fetch_forecast(location).await?;
        tracing::debug!(
            %location,
            days = forecast.daily.len(),
            "Fetched weather forecast"
        );
        Ok(forecast.truncated_to_week())
    }

    /// Analyze a forecast week against the reference soil record
    pub fn analyze(&self, days: &[DailyForecast]) -> AppResult<SoilAnalysis> {
        analyze_forecast(days)
    }
}

/// Validate a caller-supplied forecast and run the analyzer over it
pub fn analyze_forecast(days: &[DailyForecast]) -> AppResult<SoilAnalysis> {
    validate_forecast(days).map_err(|e| AppError::validation("forecast", e))?;

    let analysis = analyze_weather(days, &baseline_soil_health());
    log_diagnostics(&analysis);
    Ok(analysis)
}

/// Surface soil values that were read as zero
pub fn log_diagnostics(analysis: &SoilAnalysis) {
    for diagnostic in &analysis.diagnostics {
        tracing::warn!("Soil value fallback: {}", diagnostic);
    }
}
