//! Weather API client for fetching field forecasts
//!
//! Integrates with the OpenWeatherMap One Call API for current conditions and
//! the daily forecast.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{CurrentConditions, DailyForecast, GpsCoordinates, WeatherForecast};

use crate::error::{AppError, AppResult};

/// Source of daily forecasts for a coordinate
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(&self, location: GpsCoordinates) -> AppResult<WeatherForecast>;
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

/// OpenWeatherMap One Call response
#[derive(Debug, Deserialize)]
struct OWMOneCallResponse {
    lat: Decimal,
    lon: Decimal,
    current: Option<OWMCurrent>,
    #[serde(default)]
    daily: Vec<OWMDaily>,
}

#[derive(Debug, Deserialize)]
struct OWMCurrent {
    dt: i64,
    temp: Decimal,
    humidity: Option<i32>,
    wind_speed: Option<Decimal>,
    #[serde(default)]
    weather: Vec<OWMWeather>,
}

#[derive(Debug, Deserialize)]
struct OWMDaily {
    dt: i64,
    temp: OWMDailyTemp,
    #[serde(default)]
    pop: Decimal,
    rain: Option<Decimal>,
    wind_speed: Option<Decimal>,
    humidity: Option<i32>,
    #[serde(default)]
    weather: Vec<OWMWeather>,
}

#[derive(Debug, Deserialize)]
struct OWMDailyTemp {
    min: Decimal,
    max: Decimal,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(api_key: Option<String>, base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch current conditions and the daily forecast for a coordinate
    pub async fn get_forecast(&self, location: GpsCoordinates) -> AppResult<WeatherForecast> {
        let api_key = self.api_key.as_deref().ok_or(AppError::WeatherNotConfigured)?;

        // The key travels as a query parameter; errors are stripped of the URL
        let response = self
            .client
            .get(format!("{}/onecall", self.base_url))
            .query(&[
                ("lat", location.latitude.to_string().as_str()),
                ("lon", location.longitude.to_string().as_str()),
                ("exclude", "minutely,hourly,alerts"),
                ("units", "metric"),
                ("appid", api_key),
            ])
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::WeatherUnauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %body, "Weather API returned an error");
            return Err(AppError::WeatherUpstream {
                status: status.as_u16(),
            });
        }

        let data: OWMOneCallResponse = response.json().await.map_err(request_error)?;

        Ok(convert_one_call_response(data))
    }
}

#[async_trait]
impl ForecastProvider for WeatherClient {
    async fn fetch_forecast(&self, location: GpsCoordinates) -> AppResult<WeatherForecast> {
        self.get_forecast(location).await
    }
}

fn request_error(e: reqwest::Error) -> AppError {
    AppError::WeatherRequest(e.without_url().to_string())
}

fn timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_else(Utc::now)
}

/// Convert an OpenWeatherMap One Call response to our format
fn convert_one_call_response(data: OWMOneCallResponse) -> WeatherForecast {
    let current = data.current.map(|c| CurrentConditions {
        timestamp: timestamp(c.dt),
        temperature_celsius: c.temp,
        humidity_percent: c.humidity,
        wind_speed_mps: c.wind_speed,
        conditions: c.weather.into_iter().next().map(|w| w.main),
    });

    let daily = data
        .daily
        .into_iter()
        .map(|d| DailyForecast {
            timestamp: timestamp(d.dt),
            temp_min_celsius: d.temp.min,
            temp_max_celsius: d.temp.max,
            pop: d.pop,
            rain_mm: d.rain,
            wind_speed_mps: d.wind_speed,
            humidity_percent: d.humidity,
            conditions: d.weather.into_iter().next().map(|w| w.main),
        })
        .collect();

    WeatherForecast {
        location: GpsCoordinates::new(data.lat, data.lon),
        current,
        daily,
    }
}
