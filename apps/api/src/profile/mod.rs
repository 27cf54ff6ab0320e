// Candidate profile: LLM schema, structured extraction and skill normalization.

pub mod extractor;
pub mod models;
pub mod normalizer;
pub mod prompts;
