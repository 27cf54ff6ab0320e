//! Extraction pipeline and the save / duplicate-resolution flow.
//!
//! upload → temp file → document text → structured profile → skill
//! normalization. The temp file is dropped (and deleted) on every exit path.

use std::io::Write;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::documents::{DocumentExtractor, DocumentKind, ExtractError, ExtractOptions};
use crate::errors::AppError;
use crate::models::candidate::CandidateRow;
use crate::profile::extractor::ProfileExtractor;
use crate::profile::models::Profile;
use crate::profile::normalizer::normalize;
use crate::store::{RecordStore, StoreError};

/// Runs steps 1–4: stage the upload, extract text, structure it, normalize skills.
pub async fn extract_profile(
    file_name: &str,
    bytes: &[u8],
    documents: &dyn DocumentExtractor,
    profiles: &dyn ProfileExtractor,
) -> Result<Profile, AppError> {
    let kind = DocumentKind::from_file_name(file_name).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported file '{file_name}': upload a .pdf or .docx resume"
        ))
    })?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let staged = stage_upload(kind, bytes)?;
    debug!("Staged {} bytes at {:?}", bytes.len(), staged.path());

    let text = documents
        .extract(staged.path(), kind, ExtractOptions::RESUME)
        .await?;
    if text.trim().is_empty() {
        return Err(ExtractError::NoText.into());
    }
    info!("Extracted {} chars of resume text from '{file_name}'", text.len());

    let extracted = profiles.extract(&text).await?;
    let profile = normalize(extracted);
    if profile.skills.is_empty() {
        warn!("No skills found in '{file_name}'");
    } else {
        debug!("Normalized {} skill tags", profile.skills.len());
    }
    Ok(profile)
}

fn stage_upload(kind: DocumentKind, bytes: &[u8]) -> Result<NamedTempFile, AppError> {
    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(&format!(".{}", kind.extension()))
        .tempfile()
        .context("Failed to create temp file for upload")?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .context("Failed to write upload to temp file")?;
    Ok(file)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    /// Store left untouched; caller must ask the user to overwrite or cancel.
    DuplicateFound { email: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Overwrite,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveOutcome {
    Overwritten,
    Cancelled,
}

/// Step 6: persist the profile unless its email is already stored.
pub async fn save_profile(store: &RecordStore, profile: &Profile) -> Result<SaveOutcome, AppError> {
    let row = CandidateRow::try_from(profile).map_err(|e| AppError::Validation(e.to_string()))?;
    let email = row.email_id.clone();
    match store.append(row).await {
        Ok(()) => {
            info!("Saved candidate {email}");
            Ok(SaveOutcome::Saved)
        }
        Err(StoreError::DuplicateEmail(_)) => {
            info!("Candidate {email} already stored; awaiting overwrite/cancel");
            Ok(SaveOutcome::DuplicateFound { email })
        }
        Err(e) => Err(e.into()),
    }
}

/// Applies the user's choice after a duplicate was found.
pub async fn resolve_duplicate(
    store: &RecordStore,
    profile: &Profile,
    decision: Decision,
) -> Result<ResolveOutcome, AppError> {
    match decision {
        Decision::Overwrite => {
            let row =
                CandidateRow::try_from(profile).map_err(|e| AppError::Validation(e.to_string()))?;
            let email = row.email_id.clone();
            store.overwrite(&email, row).await?;
            Ok(ResolveOutcome::Overwritten)
        }
        Decision::Cancel => {
            info!("Save cancelled; existing record kept");
            Ok(ResolveOutcome::Cancelled)
        }
    }
}
