// SPDX-License-Identifier: MIT

//! Event ("jam") CRUD and attendance routes.
//!
//! Listing is public; everything else requires authentication, and
//! update/delete additionally require ownership. Input validation happens
//! here, before any store access.

use crate::catalog::{self, TaskId};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::event::{normalize_end_time, Event};
use crate::services::attendance;
use crate::time_utils::{format_utc_rfc3339, now_rfc3339};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_TITLE_LEN: usize = 120;
const MAX_DESCRIPTION_LEN: usize = 2000;

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EventsQuery {
    /// Only events starting at or after this instant (RFC3339)
    after: Option<String>,
    /// Filter by vibe tag
    vibe: Option<String>,
    /// Filter by attending subject id
    attendee: Option<String>,
}

/// List events on the shared calendar, soonest first.
///
/// The date range is filtered store-side; vibe and attendee filters are
/// applied in-memory over the (small) result set.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsQuery>,
) -> Result<Json<Vec<Event>>> {
    let after = parse_after_timestamp(params.after.as_deref())?;

    let mut events = state.db.list_events(after).await?;

    if let Some(vibe) = &params.vibe {
        events.retain(|e| e.vibe.as_deref() == Some(vibe.as_str()));
    }
    if let Some(attendee) = &params.attendee {
        events.retain(|e| e.is_attending(attendee));
    }

    Ok(Json(events))
}

/// Parse a timestamp this service wrote earlier; a failure here means the
/// stored document is corrupt.
fn parse_stored_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Stored timestamp {:?} is invalid: {}", raw, e))
        })
}

fn parse_after_timestamp(after: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    after
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| {
                    AppError::BadRequest(
                        "Invalid 'after' parameter: must be RFC3339 datetime".to_string(),
                    )
                })
        })
        .transpose()
}

// ─── Creation ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub vibe: Option<String>,
    pub location_name: Option<String>,
    pub location_url: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub is_core: bool,
}

/// Create an event. The creator becomes the immutable owner and the sole
/// initial attendee, and is awarded CREATE_JAM points with the completion
/// check bypassed so creation pays out every time.
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    validate_title(&req.title)?;
    validate_optional_fields(
        req.description.as_deref(),
        req.vibe.as_deref(),
        req.location_url.as_deref(),
    )?;

    // The creator must already have a user record to receive points.
    if state.db.get_user(&user.subject).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "User {} not found",
            user.subject
        )));
    }

    let now = now_rfc3339();
    let event = Event {
        id: uuid::Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        description: req.description,
        vibe: req.vibe,
        location_name: req.location_name,
        location_url: req.location_url,
        start_time: format_utc_rfc3339(req.start_time),
        end_time: format_utc_rfc3339(normalize_end_time(req.start_time, req.end_time)),
        is_core: req.is_core,
        creator: user.subject.clone(),
        attendees: vec![user.subject.clone()],
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.upsert_event(&event).await?;

    // Ledger side effect after the event is committed; a failure here
    // leaves the event created and the error propagates.
    state
        .ledger
        .award(&user.subject, TaskId::CreateJam, false)
        .await?;

    tracing::info!(event_id = %event.id, creator = %user.subject, "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

// ─── Single-event operations ─────────────────────────────────

/// Get one of the requester's own events (ownership-scoped read).
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    let event = state
        .db
        .get_event(&id)
        .await?
        .filter(|e| e.creator == user.subject)
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

    Ok(Json(event))
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub vibe: Option<String>,
    pub location_name: Option<String>,
    pub location_url: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_core: Option<bool>,
}

/// Update an event's descriptive and temporal fields. Owner only; the
/// owner and the attendee list are not patchable.
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    if let Some(title) = &req.title {
        validate_title(title)?;
    }
    validate_optional_fields(
        req.description.as_deref(),
        req.vibe.as_deref(),
        req.location_url.as_deref(),
    )?;

    let mut event = state
        .db
        .get_event(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

    if event.creator != user.subject {
        return Err(AppError::Forbidden("Only the host can edit a jam".to_string()));
    }

    if let Some(title) = req.title {
        event.title = title.trim().to_string();
    }
    if let Some(description) = req.description {
        event.description = Some(description);
    }
    if let Some(vibe) = req.vibe {
        event.vibe = Some(vibe);
    }
    if let Some(location_name) = req.location_name {
        event.location_name = Some(location_name);
    }
    if let Some(location_url) = req.location_url {
        event.location_url = Some(location_url);
    }
    if let Some(is_core) = req.is_core {
        event.is_core = is_core;
    }

    // Re-apply the overnight policy over the final start/end pair whenever
    // either timestamp changes.
    if req.start_time.is_some() || req.end_time.is_some() {
        let start = match req.start_time {
            Some(start) => start,
            None => parse_stored_timestamp(&event.start_time)?,
        };
        let end = match req.end_time {
            Some(end) => end,
            None => parse_stored_timestamp(&event.end_time)?,
        };
        event.start_time = format_utc_rfc3339(start);
        event.end_time = format_utc_rfc3339(normalize_end_time(start, end));
    }
    event.updated_at = now_rfc3339();

    state.db.upsert_event(&event).await?;

    Ok(Json(event))
}

/// Delete an event. Owner only.
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let event = state
        .db
        .get_event(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

    if event.creator != user.subject {
        return Err(AppError::Forbidden(
            "Only the host can delete a jam".to_string(),
        ));
    }

    state.db.delete_event(&id).await?;

    tracing::info!(event_id = %id, "Event deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ─── Attendance ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct AttendResponse {
    pub success: bool,
    /// Whether the requester attends the event after the toggle.
    pub attending: bool,
}

/// Toggle the requester's attendance on an event.
pub async fn attend_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<AttendResponse>> {
    let outcome =
        attendance::toggle_attendance(&state.db, &state.ledger, &id, &user.subject).await?;

    Ok(Json(AttendResponse {
        success: true,
        attending: outcome.attending,
    }))
}

// ─── Validation helpers ──────────────────────────────────────

fn validate_title(title: &str) -> Result<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if trimmed.len() > MAX_TITLE_LEN {
        return Err(AppError::BadRequest(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

fn validate_optional_fields(
    description: Option<&str>,
    vibe: Option<&str>,
    location_url: Option<&str>,
) -> Result<()> {
    if let Some(description) = description {
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(AppError::BadRequest(format!(
                "Description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
    }
    if let Some(vibe) = vibe {
        if !catalog::is_known_vibe(vibe) {
            return Err(AppError::BadRequest("Unknown vibe tag".to_string()));
        }
    }
    if let Some(url) = location_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::BadRequest(
                "Location link must be an http(s) URL".to_string(),
            ));
        }
    }
    Ok(())
}
