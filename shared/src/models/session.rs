//! Field session state
//!
//! A session is a single immutable value. Every user action produces a new
//! value, and forecast fetches carry a ticket tagged with the generation that
//! issued them so a superseded fetch can never overwrite a newer selection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{baseline_soil_health, SoilAnalysis, WeatherForecast};
use crate::analysis::analyze_weather;
use crate::geometry::polygon_centroid;
use crate::types::GpsCoordinates;

/// The field currently selected on the map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSelection {
    pub vertices: Vec<GpsCoordinates>,
    /// Planar area in square meters, as measured by the map selector
    pub area_sq_m: Decimal,
    pub centroid: Option<GpsCoordinates>,
}

impl FieldSelection {
    pub fn new(vertices: Vec<GpsCoordinates>, area_sq_m: Decimal) -> Self {
        let centroid = polygon_centroid(&vertices);
        Self {
            vertices,
            area_sq_m,
            centroid,
        }
    }

    /// Coordinate to key the forecast on, if the field supports analysis
    pub fn analysis_point(&self) -> Option<GpsCoordinates> {
        if self.area_sq_m <= Decimal::ZERO {
            return None;
        }
        self.centroid
    }
}

/// Permission to apply one forecast fetch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub centroid: GpsCoordinates,
}

/// Why the last forecast fetch failed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailureKind {
    /// No forecast credential configured
    Configuration,
    /// Provider rejected the credential
    Unauthorized,
    /// Provider answered with another non-success status
    Upstream,
    /// Request never completed or the body could not be read
    Network,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FetchFailureKind,
    pub message: String,
}

/// Everything the dashboard shows for one user session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub generation: u64,
    pub field: Option<FieldSelection>,
    pub soil_report: Option<String>,
    /// A fetch for the current generation is in flight
    pub pending: bool,
    pub forecast: Option<WeatherForecast>,
    pub analysis: Option<SoilAnalysis>,
    pub fetch_error: Option<FetchFailure>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a new field boundary
    ///
    /// Always supersedes outstanding fetches. A ticket is issued only when the
    /// field has a centroid and a positive area.
    pub fn select_field(
        &self,
        vertices: Vec<GpsCoordinates>,
        area_sq_m: Decimal,
    ) -> (Self, Option<FetchTicket>) {
        let field = FieldSelection::new(vertices, area_sq_m);
        let mut next = self.clone();
        next.generation = self.generation + 1;
        next.fetch_error = None;

        let ticket = field.analysis_point().map(|centroid| FetchTicket {
            generation: next.generation,
            centroid,
        });
        if ticket.is_none() {
            next.forecast = None;
            next.analysis = None;
        }
        next.pending = ticket.is_some();
        next.field = Some(field);
        (next, ticket)
    }

    /// Re-trigger the fetch for the current field
    pub fn refresh(&self) -> (Self, Option<FetchTicket>) {
        let mut next = self.clone();
        next.generation = self.generation + 1;
        let ticket = self
            .field
            .as_ref()
            .and_then(FieldSelection::analysis_point)
            .map(|centroid| FetchTicket {
                generation: next.generation,
                centroid,
            });
        next.pending = ticket.is_some();
        (next, ticket)
    }

    /// Whether a ticket still belongs to the latest request
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a fetched forecast; results for superseded tickets are dropped
    pub fn apply_forecast(&self, ticket: &FetchTicket, forecast: WeatherForecast) -> Self {
        if !self.is_current(ticket) {
            return self.clone();
        }
        let forecast = forecast.truncated_to_week();
        let analysis = analyze_weather(&forecast.daily, &baseline_soil_health());

        let mut next = self.clone();
        next.pending = false;
        next.fetch_error = None;
        next.forecast = Some(forecast);
        next.analysis = Some(analysis);
        next
    }

    /// Record a failed fetch, keeping whatever was shown before
    pub fn apply_fetch_error(&self, ticket: &FetchTicket, failure: FetchFailure) -> Self {
        if !self.is_current(ticket) {
            return self.clone();
        }
        let mut next = self.clone();
        next.pending = false;
        next.fetch_error = Some(failure);
        next
    }

    /// Remember an uploaded soil report; the baseline is not derived from it
    pub fn attach_soil_report(&self, reference: String) -> Self {
        let mut next = self.clone();
        next.soil_report = Some(reference);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyForecast;
    use chrono::{Duration, TimeZone, Utc};

    fn square() -> Vec<GpsCoordinates> {
        vec![
            GpsCoordinates::new(Decimal::new(2600, 2), Decimal::new(9100, 2)),
            GpsCoordinates::new(Decimal::new(2601, 2), Decimal::new(9100, 2)),
            GpsCoordinates::new(Decimal::new(2601, 2), Decimal::new(9101, 2)),
            GpsCoordinates::new(Decimal::new(2600, 2), Decimal::new(9101, 2)),
        ]
    }

    fn calm_forecast(location: GpsCoordinates, days: usize) -> WeatherForecast {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 6, 0, 0).unwrap();
        WeatherForecast {
            location,
            current: None,
            daily: (0..days)
                .map(|i| DailyForecast {
                    timestamp: start + Duration::days(i as i64),
                    temp_min_celsius: Decimal::from(18),
                    temp_max_celsius: Decimal::from(25),
                    pop: Decimal::new(1, 1),
                    rain_mm: Some(Decimal::ZERO),
                    wind_speed_mps: Some(Decimal::from(2)),
                    humidity_percent: Some(40),
                    conditions: Some("Clear".to_string()),
                })
                .collect(),
        }
    }

    fn failure(kind: FetchFailureKind) -> FetchFailure {
        FetchFailure {
            kind,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_select_field_issues_ticket_for_centroid() {
        let (state, ticket) = SessionState::new().select_field(square(), Decimal::from(12_000));
        let ticket = ticket.expect("ticket");
        assert_eq!(ticket.generation, 1);
        assert_eq!(ticket.centroid, state.field.as_ref().unwrap().centroid.unwrap());
        assert!(state.pending);
    }

    #[test]
    fn test_empty_or_zero_area_field_issues_no_ticket() {
        let (state, ticket) = SessionState::new().select_field(Vec::new(), Decimal::from(100));
        assert!(ticket.is_none());
        assert!(!state.pending);

        let (state, ticket) = state.select_field(square(), Decimal::ZERO);
        assert!(ticket.is_none());
        assert_eq!(state.generation, 2);
        assert!(state.analysis.is_none());
    }

    #[test]
    fn test_superseded_forecast_is_discarded() {
        let (first, stale) = SessionState::new().select_field(square(), Decimal::from(100));
        let (second, fresh) = first.select_field(square(), Decimal::from(200));
        let stale = stale.unwrap();
        let fresh = fresh.unwrap();

        let after_stale = second.apply_forecast(&stale, calm_forecast(stale.centroid, 7));
        assert_eq!(after_stale, second);

        let after_fresh = after_stale.apply_forecast(&fresh, calm_forecast(fresh.centroid, 7));
        assert!(after_fresh.analysis.is_some());
        assert!(!after_fresh.pending);
    }

    #[test]
    fn test_forecast_truncated_to_one_week() {
        let (state, ticket) = SessionState::new().select_field(square(), Decimal::from(100));
        let ticket = ticket.unwrap();
        let state = state.apply_forecast(&ticket, calm_forecast(ticket.centroid, 10));
        assert_eq!(state.forecast.unwrap().daily.len(), 7);
    }

    #[test]
    fn test_fetch_error_keeps_previous_results() {
        let (state, ticket) = SessionState::new().select_field(square(), Decimal::from(100));
        let ticket = ticket.unwrap();
        let loaded = state.apply_forecast(&ticket, calm_forecast(ticket.centroid, 7));

        let (refreshing, retry) = loaded.refresh();
        let retry = retry.unwrap();
        let failed = refreshing.apply_fetch_error(&retry, failure(FetchFailureKind::Unauthorized));

        assert_eq!(failed.analysis, loaded.analysis);
        assert_eq!(failed.forecast, loaded.forecast);
        assert_eq!(
            failed.fetch_error.as_ref().map(|f| f.kind),
            Some(FetchFailureKind::Unauthorized)
        );
        assert!(!failed.pending);
    }

    #[test]
    fn test_stale_error_is_ignored() {
        let (first, stale) = SessionState::new().select_field(square(), Decimal::from(100));
        let (second, _) = first.select_field(square(), Decimal::from(100));
        let after = second.apply_fetch_error(&stale.unwrap(), failure(FetchFailureKind::Network));
        assert!(after.fetch_error.is_none());
        assert!(after.pending);
    }

    #[test]
    fn test_attach_soil_report_leaves_analysis_untouched() {
        let (state, ticket) = SessionState::new().select_field(square(), Decimal::from(100));
        let ticket = ticket.unwrap();
        let loaded = state.apply_forecast(&ticket, calm_forecast(ticket.centroid, 7));
        let with_report = loaded.attach_soil_report("soil-card-2024.pdf".to_string());
        assert_eq!(with_report.soil_report.as_deref(), Some("soil-card-2024.pdf"));
        assert_eq!(with_report.analysis, loaded.analysis);
        assert_eq!(with_report.generation, loaded.generation);
    }
}
