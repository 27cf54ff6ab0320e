use serde::Serialize;
use thiserror::Error;

use crate::models::skills::SkillSet;
use crate::profile::models::Profile;

/// One persisted candidate. `email_id` is the unique key of the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateRow {
    pub fullname: Option<String>,
    pub email_id: String,
    pub phone_number: Option<String>,
    pub designation: Option<String>,
    pub current_location: Option<String>,
    pub years_of_experience: Option<f64>,
    pub current_ctc: Option<String>,
    pub expected_ctc: Option<String>,
    pub current_company: Option<String>,
    pub certifications: Option<String>,
    pub summary: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub skills: SkillSet,
}

#[derive(Debug, Error, PartialEq)]
#[error("profile has no email address and cannot be saved")]
pub struct MissingEmail;

impl TryFrom<&Profile> for CandidateRow {
    type Error = MissingEmail;

    fn try_from(profile: &Profile) -> Result<Self, Self::Error> {
        let email = profile.email().ok_or(MissingEmail)?.to_string();
        let p = profile.extracted.clone();
        Ok(CandidateRow {
            fullname: p.fullname,
            email_id: email,
            phone_number: p.phone_number,
            designation: p.designation,
            current_location: p.current_location,
            years_of_experience: p.years_of_experience,
            current_ctc: p.current_ctc,
            expected_ctc: p.expected_ctc,
            current_company: p.current_company,
            certifications: p.certifications,
            summary: p.summary,
            portfolio_url: p.portfolio_url,
            linkedin_url: p.linkedin_url,
            github_url: p.github_url,
            skills: profile.skills.clone(),
        })
    }
}

/// Email keys compare trimmed and case-insensitively.
pub fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
