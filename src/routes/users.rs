// SPDX-License-Identifier: MIT

//! User profile routes.

use crate::catalog::{self, TaskId};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

const MAX_BIO_LEN: usize = 500;
const MAX_DISPLAY_NAME_LEN: usize = 32;

/// Get the requester's profile, creating an empty one on first fetch.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    if let Some(profile) = state.db.get_user(&user.subject).await? {
        return Ok(Json(profile));
    }

    // First successful authentication: create the user with an empty
    // profile. Onboarding fills it in later.
    let profile = User::new(user.subject.clone(), now_rfc3339());
    state.db.upsert_user(&profile).await?;

    tracing::info!(subject = %user.subject, "Created user on first fetch");

    Ok(Json(profile))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub vibes: Option<Vec<String>>,
    pub avatar_url: Option<String>,
}

/// Update the requester's profile.
///
/// The first update that sets a display name completes onboarding and
/// awards the SIGN_UP points; the non-repeatable completion check keeps
/// that idempotent.
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    if let Some(name) = &req.display_name {
        validate_display_name(name)?;
    }
    if let Some(bio) = &req.bio {
        if bio.len() > MAX_BIO_LEN {
            return Err(AppError::BadRequest(format!(
                "Bio must be at most {} characters",
                MAX_BIO_LEN
            )));
        }
    }
    if let Some(vibes) = &req.vibes {
        validate_vibes(vibes)?;
    }
    if let Some(url) = &req.avatar_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::BadRequest(
                "Avatar link must be an http(s) URL".to_string(),
            ));
        }
    }

    // Display names are unique across users
    if let Some(name) = &req.display_name {
        if let Some(holder) = state.db.find_user_by_display_name(name).await? {
            if holder.subject != user.subject {
                return Err(AppError::BadRequest(
                    "This display name is already taken".to_string(),
                ));
            }
        }
    }

    let mut profile = state
        .db
        .get_user(&user.subject)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.subject)))?;

    let completes_onboarding = profile.display_name.is_none() && req.display_name.is_some();

    if let Some(name) = req.display_name {
        profile.display_name = Some(name);
    }
    if let Some(bio) = req.bio {
        profile.bio = Some(bio);
    }
    if let Some(vibes) = req.vibes {
        profile.vibes = vibes;
    }
    if let Some(avatar_url) = req.avatar_url {
        profile.avatar_url = Some(avatar_url);
    }
    profile.updated_at = now_rfc3339();

    state.db.upsert_user(&profile).await?;

    if completes_onboarding {
        if let Some(outcome) = state
            .ledger
            .award(&user.subject, TaskId::SignUp, true)
            .await?
        {
            profile.num_points = outcome.new_total;
            profile
                .completed_tasks
                .push(TaskId::SignUp.as_str().to_string());
        }
        tracing::info!(subject = %user.subject, "Onboarding completed");
    }

    Ok(Json(profile))
}

// ─── Validation helpers ──────────────────────────────────────

fn validate_display_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_DISPLAY_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Display name must be 1-{} characters",
            MAX_DISPLAY_NAME_LEN
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(AppError::BadRequest(
            "Display name can only contain lowercase letters, numbers, and underscores"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_vibes(vibes: &[String]) -> Result<()> {
    if vibes.len() > catalog::MAX_VIBES {
        return Err(AppError::BadRequest(format!(
            "At most {} vibes allowed",
            catalog::MAX_VIBES
        )));
    }
    for vibe in vibes {
        if !catalog::is_known_vibe(vibe) {
            return Err(AppError::BadRequest("Unknown vibe tag".to_string()));
        }
    }
    for (i, vibe) in vibes.iter().enumerate() {
        if vibes[..i].contains(vibe) {
            return Err(AppError::BadRequest("Duplicate vibe tag".to_string()));
        }
    }
    Ok(())
}
