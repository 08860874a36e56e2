//! HTTP handlers for dashboard sessions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_field_area, validate_field_boundary, GpsCoordinates, SessionState};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::SessionService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub state: SessionState,
}

fn service(state: &AppState) -> SessionService {
    SessionService::new(state.sessions.clone(), state.weather.clone())
        .with_limits(state.config.sessions.limits())
}

/// Create a new session
pub async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let (id, session) = service(&state).create_session().await;
    Json(SessionResponse { id, state: session })
}

/// Get a session's current state
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let session = service(&state).get_session(session_id).await?;
    Ok(Json(SessionResponse {
        id: session_id,
        state: session,
    }))
}

/// Delete a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    service(&state).delete_session(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Field selected on the map
#[derive(Debug, Deserialize, Validate)]
pub struct SelectFieldInput {
    #[validate(length(max = 1000))]
    pub vertices: Vec<GpsCoordinates>,
    /// Planar area in square meters from the map selector
    pub area_sq_m: Decimal,
}

/// Select a field and fetch its forecast analysis
pub async fn select_field(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<SelectFieldInput>,
) -> AppResult<Json<SessionResponse>> {
    input.validate()?;
    validate_field_boundary(&input.vertices).map_err(|e| AppError::validation("vertices", e))?;
    validate_field_area(input.area_sq_m).map_err(|e| AppError::validation("area_sq_m", e))?;

    let session = service(&state)
        .select_field(session_id, input.vertices, input.area_sq_m)
        .await?;
    Ok(Json(SessionResponse {
        id: session_id,
        state: session,
    }))
}

/// Re-fetch the forecast for the session's field
pub async fn refresh_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let session = service(&state).refresh(session_id).await?;
    Ok(Json(SessionResponse {
        id: session_id,
        state: session,
    }))
}

/// Uploaded soil report reference
#[derive(Debug, Deserialize, Validate)]
pub struct SoilReportInput {
    #[validate(length(min = 1, max = 512))]
    pub reference: String,
}

/// Attach a soil report to the session
pub async fn attach_soil_report(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<SoilReportInput>,
) -> AppResult<Json<SessionResponse>> {
    input.validate()?;
    let session = service(&state)
        .attach_soil_report(session_id, input.reference)
        .await?;
    Ok(Json(SessionResponse {
        id: session_id,
        state: session,
    }))
}
