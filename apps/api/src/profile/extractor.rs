use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::profile::models::ExtractedProfile;
use crate::profile::prompts::{build_profile_prompt, profile_response_schema, PROFILE_SYSTEM};

/// Turns resume text into a structured profile. Carried in `AppState` as
/// `Arc<dyn ProfileExtractor>` so the hosted model can be swapped out.
#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    async fn extract(&self, resume_text: &str) -> Result<ExtractedProfile, AppError>;
}

/// Schema-constrained extraction through the shared `LlmClient`.
pub struct LlmProfileExtractor {
    llm: LlmClient,
}

impl LlmProfileExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ProfileExtractor for LlmProfileExtractor {
    async fn extract(&self, resume_text: &str) -> Result<ExtractedProfile, AppError> {
        let prompt = build_profile_prompt(resume_text);
        let schema = profile_response_schema();
        let profile: ExtractedProfile = self
            .llm
            .call_json(&prompt, PROFILE_SYSTEM, &schema)
            .await
            .map_err(|e| AppError::Llm(format!("Profile extraction failed: {e}")))?;

        info!(
            "Extracted profile via {} (email present: {})",
            self.llm.model(),
            profile.email_id.is_some()
        );
        Ok(profile)
    }
}
