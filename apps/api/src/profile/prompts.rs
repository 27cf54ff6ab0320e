// Profile extraction prompt and the response schema the model is held to.

use serde_json::{json, Value};

pub const PROFILE_SYSTEM: &str = "\
You are a precise resume data extractor. \
Read the resume and fill in the candidate profile schema. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const PROFILE_PROMPT_TEMPLATE: &str = r#"Extract the candidate profile from the resume below.

RESUME:
{resume_text}

RULES:
1. {no_invention}
2. email_id is the candidate's own email address, lower-cased.
3. years_of_experience is a number of years (e.g. 4.5), or null if it cannot be determined.
4. technical_skills is a list holding exactly one object with programming_languages,
   libraries_or_frameworks and other_tools.
5. interpersonal_skills lists soft skills such as communication or leadership.
6. certifications and summary are free text; keep them short."#;

/// Renders the extraction prompt for one resume.
pub fn build_profile_prompt(resume_text: &str) -> String {
    PROFILE_PROMPT_TEMPLATE
        .replace(
            "{no_invention}",
            crate::llm_client::prompts::NO_INVENTION_INSTRUCTION.trim(),
        )
        .replace("{resume_text}", resume_text)
}

fn nullable_string(description: &str) -> Value {
    json!({"type": "STRING", "nullable": true, "description": description})
}

fn string_list(description: &str) -> Value {
    json!({"type": "ARRAY", "items": {"type": "STRING"}, "description": description})
}

/// Gemini `responseSchema` (OpenAPI subset) for `ExtractedProfile`.
pub fn profile_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "fullname": nullable_string("Full name of the candidate"),
            "email_id": nullable_string("Email address"),
            "phone_number": nullable_string("Phone number including country code if present"),
            "designation": nullable_string("Current or most recent job title"),
            "current_location": nullable_string("Current city / country"),
            "years_of_experience": {
                "type": "NUMBER",
                "nullable": true,
                "description": "Total years of professional experience"
            },
            "current_ctc": nullable_string("Current compensation"),
            "expected_ctc": nullable_string("Expected compensation"),
            "current_company": nullable_string("Current employer"),
            "certifications": nullable_string("Certifications, comma separated"),
            "summary": nullable_string("Two or three sentence professional summary"),
            "portfolio_url": nullable_string("Personal website or portfolio URL"),
            "linkedin_url": nullable_string("LinkedIn profile URL"),
            "github_url": nullable_string("GitHub profile URL"),
            "technical_skills": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "programming_languages": string_list("Programming languages"),
                        "libraries_or_frameworks": string_list("Libraries and frameworks"),
                        "other_tools": string_list("Other tools, platforms and databases")
                    }
                }
            },
            "interpersonal_skills": string_list("Soft / interpersonal skills")
        },
        "required": ["fullname", "email_id", "technical_skills", "interpersonal_skills"]
    })
}
