//! Session service: per-user field selections and their forecast analysis
//!
//! Each session is stored as an immutable `SessionState` value and replaced
//! wholesale on every transition. The lock is never held while a forecast is
//! being fetched; the generation ticket decides whether a result still applies.
//!
//! Sessions expire after a period without use, and the store holds at most a
//! fixed number of them; the least recently used session is evicted first.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use shared::{FetchTicket, GpsCoordinates, SessionState};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::weather::{log_diagnostics, WeatherService};

/// A stored session and the last time it was used
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub state: SessionState,
    touched: Instant,
}

impl SessionEntry {
    fn new(state: SessionState) -> Self {
        Self {
            state,
            touched: Instant::now(),
        }
    }
}

/// In-memory session storage
pub type SessionStore = Arc<RwLock<HashMap<Uuid, SessionEntry>>>;

/// Expiry and capacity bounds for the session store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Idle time after which a session is dropped
    pub ttl: Duration,
    /// Most sessions kept at once
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_sessions: 10_000,
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Session".to_string())
}

/// Session service for field selection and forecast refresh
#[derive(Clone)]
pub struct SessionService {
    sessions: SessionStore,
    weather: WeatherService,
    limits: SessionLimits,
}

impl SessionService {
    /// Create a new SessionService instance
    pub fn new(sessions: SessionStore, weather: WeatherService) -> Self {
        Self {
            sessions,
            weather,
            limits: SessionLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Start an empty session, evicting expired and surplus sessions first
    pub async fn create_session(&self) -> (Uuid, SessionState) {
        let id = Uuid::new_v4();
        let state = SessionState::new();

        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions);
        sessions.insert(id, SessionEntry::new(state.clone()));

        tracing::info!(session_id = %id, active = sessions.len(), "Session created");
        (id, state)
    }

    /// Get the current state of a session
    pub async fn get_session(&self, id: Uuid) -> AppResult<SessionState> {
        let mut sessions = self.sessions.write().await;
        Ok(self.live_entry(&mut sessions, id)?.state.clone())
    }

    /// Drop a session
    pub async fn delete_session(&self, id: Uuid) -> AppResult<()> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(not_found());
        }
        tracing::info!(session_id = %id, "Session deleted");
        Ok(())
    }

    /// Select a field and, when it can be analyzed, fetch its forecast
    pub async fn select_field(
        &self,
        id: Uuid,
        vertices: Vec<GpsCoordinates>,
        area_sq_m: Decimal,
    ) -> AppResult<SessionState> {
        let ticket = self
            .transition(id, |state| state.select_field(vertices, area_sq_m))
            .await?;
        self.run_fetch(id, ticket).await
    }

    /// Re-trigger the forecast fetch for the current field
    pub async fn refresh(&self, id: Uuid) -> AppResult<SessionState> {
        let ticket = self.transition(id, SessionState::refresh).await?;
        self.run_fetch(id, ticket).await
    }

    /// Record an uploaded soil report reference
    pub async fn attach_soil_report(&self, id: Uuid, reference: String) -> AppResult<SessionState> {
        let mut sessions = self.sessions.write().await;
        let entry = self.live_entry(&mut sessions, id)?;
        entry.state = entry.state.attach_soil_report(reference);
        Ok(entry.state.clone())
    }

    /// Apply a ticket-issuing transition under the write lock
    async fn transition<F>(&self, id: Uuid, f: F) -> AppResult<Option<FetchTicket>>
    where
        F: FnOnce(&SessionState) -> (SessionState, Option<FetchTicket>),
    {
        let mut sessions = self.sessions.write().await;
        let entry = self.live_entry(&mut sessions, id)?;
        let (next, ticket) = f(&entry.state);
        entry.state = next;
        Ok(ticket)
    }

    async fn run_fetch(&self, id: Uuid, ticket: Option<FetchTicket>) -> AppResult<SessionState> {
        let Some(ticket) = ticket else {
            tracing::debug!(session_id = %id, "Field has no analysis point; skipping forecast");
            return self.get_session(id).await;
        };

        let result = self.weather.get_forecast(ticket.centroid).await;

        let mut sessions = self.sessions.write().await;
        let entry = self.live_entry(&mut sessions, id)?;
        let state = &mut entry.state;

        if !state.is_current(&ticket) {
            tracing::info!(
                session_id = %id,
                generation = ticket.generation,
                latest = state.generation,
                "Discarding superseded forecast result"
            );
            return Ok(state.clone());
        }

        *state = match result {
            Ok(forecast) => {
                let next = state.apply_forecast(&ticket, forecast);
                if let Some(analysis) = &next.analysis {
                    log_diagnostics(analysis);
                }
                next
            }
            Err(e) => {
                tracing::warn!(session_id = %id, "Forecast fetch failed: {}", e);
                state.apply_fetch_error(&ticket, e.fetch_failure())
            }
        };
        Ok(state.clone())
    }

    fn is_expired(&self, entry: &SessionEntry) -> bool {
        entry.touched.elapsed() >= self.limits.ttl
    }

    /// Look up a session that has not expired and mark it as used
    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<Uuid, SessionEntry>,
        id: Uuid,
    ) -> AppResult<&'a mut SessionEntry> {
        let expired = self.is_expired(sessions.get(&id).ok_or_else(not_found)?);
        if expired {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "Session expired");
            return Err(not_found());
        }
        let entry = sessions.get_mut(&id).ok_or_else(not_found)?;
        entry.touched = Instant::now();
        Ok(entry)
    }

    /// Drop expired sessions, then the least recently used until one slot is free
    fn evict(&self, sessions: &mut HashMap<Uuid, SessionEntry>) {
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry));

        while sessions.len() >= self.limits.max_sessions.max(1) {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
    }
}
