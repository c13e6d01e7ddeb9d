//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::Result;
use crate::events::EventRecord;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CourseEventsResponse {
    pub course_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct RoundEventsResponse {
    pub round: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Render a query result as `200 OK` JSON, or a database error as `500`.
fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /courses/:id/events`
///
/// Returns all indexed events for the given course (and its funding project).
pub async fn get_course_events(
    State(state): State<Arc<ApiState>>,
    Path(course_id): Path<String>,
) -> Response {
    let result = db::get_events_for_course(&state.pool, &course_id)
        .await
        .map(|events| CourseEventsResponse {
            course_id,
            count: events.len(),
            events,
        });
    respond(result)
}

/// `GET /rounds/:round/events`
///
/// Returns the toggles and matching withdrawals of one withdrawal round.
pub async fn get_round_events(
    State(state): State<Arc<ApiState>>,
    Path(round): Path<String>,
) -> Response {
    let result = db::get_events_for_round(&state.pool, &round)
        .await
        .map(|events| RoundEventsResponse {
            round,
            count: events.len(),
            events,
        });
    respond(result)
}

/// `GET /events`
///
/// Returns all indexed events across all courses.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Response {
    let result = db::get_all_events(&state.pool)
        .await
        .map(|events| AllEventsResponse {
            count: events.len(),
            events,
        });
    respond(result)
}
