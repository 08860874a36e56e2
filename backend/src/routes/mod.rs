//! Route definitions for the FieldSense API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/units", get(handlers::list_units))
        .nest("/fields", field_routes())
        .route("/soil/baseline", get(handlers::get_baseline_soil))
        .route("/analysis", post(handlers::analyze_forecast))
        .route("/weather/forecast", get(handlers::get_weather_forecast))
        .nest("/sessions", session_routes())
}

/// Field geometry routes
fn field_routes() -> Router<AppState> {
    Router::new()
        .route("/centroid", post(handlers::compute_centroid))
        .route("/area", post(handlers::convert_area))
}

/// Dashboard session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/:session_id/field", post(handlers::select_field))
        .route("/:session_id/refresh", post(handlers::refresh_session))
        .route("/:session_id/soil-report", post(handlers::attach_soil_report))
}
