//! Axum route handlers for the intake flow.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::pipeline::{
    extract_profile, resolve_duplicate, save_profile, Decision, ResolveOutcome, SaveOutcome,
};
use crate::intake::session::{Claim, PendingProfile};
use crate::profile::models::{PersonalDetails, Profile};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub session_id: Uuid,
    pub details: PersonalDetails,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub awaiting_decision: bool,
    /// Whether the profile's email is already in the candidate table.
    pub already_stored: bool,
    pub details: PersonalDetails,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    #[serde(flatten)]
    pub outcome: SaveOutcome,
    /// Choices offered when a duplicate was found.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub decision: Decision,
}

/// POST /api/v1/resumes/extract
///
/// Multipart upload with a single `file` field (.pdf or .docx).
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Upload is missing a file name".to_string()))?;
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        AppError::Validation(format!("Multipart field '{UPLOAD_FIELD}' is required"))
    })?;

    let profile = extract_profile(
        &file_name,
        &bytes,
        state.documents.as_ref(),
        state.profiles.as_ref(),
    )
    .await?;

    let session_id = state.sessions.create(profile.clone()).await;
    info!("Resume '{file_name}' extracted into session {session_id}");

    Ok(Json(ExtractResponse {
        session_id,
        details: PersonalDetails::from(&profile),
        profile,
    }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let pending = load_session(&state, id).await?;
    let already_stored = match pending.profile.email() {
        Some(email) => state.store.exists(email).await?,
        None => false,
    };
    Ok(Json(SessionResponse {
        session_id: id,
        awaiting_decision: pending.awaiting_decision,
        already_stored,
        details: PersonalDetails::from(&pending.profile),
        profile: pending.profile,
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_discard_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/save
///
/// Saves the session's profile. If the email is already stored nothing is
/// written and the caller must resolve with overwrite or cancel.
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveResponse>, AppError> {
    let pending = load_session(&state, id).await?;

    let outcome = if pending.awaiting_decision {
        let email = pending.profile.email().unwrap_or_default().to_string();
        SaveOutcome::DuplicateFound { email }
    } else {
        save_profile(&state.store, &pending.profile).await?
    };

    let choices = match &outcome {
        SaveOutcome::Saved => {
            state.sessions.remove(id).await;
            Vec::new()
        }
        SaveOutcome::DuplicateFound { .. } => {
            if !state.sessions.mark_awaiting_decision(id).await {
                return Err(session_not_found(id));
            }
            vec!["overwrite", "cancel"]
        }
    };

    Ok(Json(SaveResponse { outcome, choices }))
}

/// POST /api/v1/sessions/:id/resolve
pub async fn handle_resolve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveOutcome>, AppError> {
    let pending = match state.sessions.claim_decision(id).await {
        Claim::Claimed(pending) => pending,
        Claim::NotAwaiting => {
            return Err(AppError::Conflict(format!(
                "Session {id} has no pending duplicate to resolve"
            )))
        }
        Claim::Missing => return Err(session_not_found(id)),
    };

    match resolve_duplicate(&state.store, &pending.profile, req.decision).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            state.sessions.restore(id, pending).await;
            Err(e)
        }
    }
}

async fn load_session(state: &AppState, id: Uuid) -> Result<PendingProfile, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found or expired"))
}
