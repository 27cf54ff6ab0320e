//! Hand-written fakes for the two external extractors.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::documents::{DocumentExtractor, DocumentKind, ExtractError, ExtractOptions};
use crate::errors::AppError;
use crate::profile::extractor::ProfileExtractor;
use crate::profile::models::ExtractedProfile;

pub struct FakeDocuments {
    text: String,
    seen: Mutex<Option<(PathBuf, ExtractOptions)>>,
}

impl FakeDocuments {
    pub fn returning(text: &str) -> Self {
        Self {
            text: text.to_string(),
            seen: Mutex::new(None),
        }
    }

    pub fn seen_path(&self) -> Option<PathBuf> {
        self.seen.lock().unwrap().as_ref().map(|(p, _)| p.clone())
    }

    pub fn seen_options(&self) -> Option<ExtractOptions> {
        self.seen.lock().unwrap().as_ref().map(|(_, o)| *o)
    }
}

#[async_trait]
impl DocumentExtractor for FakeDocuments {
    async fn extract(
        &self,
        path: &Path,
        _kind: DocumentKind,
        options: ExtractOptions,
    ) -> Result<String, ExtractError> {
        // the staged upload must exist while the extractor runs
        assert!(path.exists(), "staged upload missing: {path:?}");
        *self.seen.lock().unwrap() = Some((path.to_path_buf(), options));
        Ok(self.text.clone())
    }
}

pub struct FakeProfiles {
    profile: Option<ExtractedProfile>,
    seen_text: Mutex<Option<String>>,
}

impl FakeProfiles {
    pub fn returning(profile: ExtractedProfile) -> Self {
        Self {
            profile: Some(profile),
            seen_text: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            profile: None,
            seen_text: Mutex::new(None),
        }
    }

    pub fn seen_text(&self) -> Option<String> {
        self.seen_text.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileExtractor for FakeProfiles {
    async fn extract(&self, resume_text: &str) -> Result<ExtractedProfile, AppError> {
        *self.seen_text.lock().unwrap() = Some(resume_text.to_string());
        self.profile
            .clone()
            .ok_or_else(|| AppError::Llm("LLM returned empty content".to_string()))
    }
}
