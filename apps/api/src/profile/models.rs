use serde::{Deserialize, Deserializer, Serialize};

use crate::models::skills::SkillSet;

/// Technical skill categories as returned by the LLM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSkills {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub programming_languages: Vec<String>,
    #[serde(
        default,
        alias = "libraries_or_framework",
        deserialize_with = "null_as_empty"
    )]
    pub libraries_or_frameworks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub other_tools: Vec<String>,
}

/// Candidate profile exactly as decoded from the structured LLM output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email_id: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<f64>,
    #[serde(default)]
    pub current_ctc: Option<String>,
    #[serde(default)]
    pub expected_ctc: Option<String>,
    #[serde(default)]
    pub current_company: Option<String>,
    #[serde(default)]
    pub certifications: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    /// The schema declares a list of category objects; only the first is used.
    #[serde(default, deserialize_with = "first_category")]
    pub technical_skills: TechnicalSkills,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interpersonal_skills: Vec<String>,
}

/// An extracted profile plus its flattened skill tags. Held in the session
/// until the user saves or discards it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub extracted: ExtractedProfile,
    pub skills: SkillSet,
}

impl Profile {
    /// Trimmed email, if the LLM found a non-blank one.
    pub fn email(&self) -> Option<&str> {
        self.extracted
            .email_id
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Fields shown in the personal details panel after extraction.
#[derive(Debug, Clone, Serialize)]
pub struct PersonalDetails {
    pub fullname: Option<String>,
    pub email_id: Option<String>,
    pub phone_number: Option<String>,
    pub designation: Option<String>,
    pub current_location: Option<String>,
}

impl From<&Profile> for PersonalDetails {
    fn from(profile: &Profile) -> Self {
        let p = &profile.extracted;
        PersonalDetails {
            fullname: p.fullname.clone(),
            email_id: p.email_id.clone(),
            phone_number: p.phone_number.clone(),
            designation: p.designation.clone(),
            current_location: p.current_location.clone(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryShape {
    Many(Vec<TechnicalSkills>),
    One(TechnicalSkills),
}

fn first_category<'de, D>(deserializer: D) -> Result<TechnicalSkills, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<CategoryShape>::deserialize(deserializer)? {
        Some(CategoryShape::Many(list)) => list.into_iter().next().unwrap_or_default(),
        Some(CategoryShape::One(category)) => category,
        None => TechnicalSkills::default(),
    })
}
