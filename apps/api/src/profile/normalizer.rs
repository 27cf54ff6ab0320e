//! Skill normalizer: flattens the nested skill categories into one tag set.

use crate::models::skills::SkillSet;
use crate::profile::models::{ExtractedProfile, Profile};

/// Union of programming languages, libraries/frameworks, other tools and
/// interpersonal skills. Missing categories contribute nothing.
pub fn collect_skills(profile: &ExtractedProfile) -> SkillSet {
    let tech = &profile.technical_skills;
    tech.programming_languages
        .iter()
        .chain(&tech.libraries_or_frameworks)
        .chain(&tech.other_tools)
        .chain(&profile.interpersonal_skills)
        .collect()
}

/// Attaches the derived `skills` field. Computed once, at extraction time.
pub fn normalize(extracted: ExtractedProfile) -> Profile {
    let skills = collect_skills(&extracted);
    Profile { extracted, skills }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::TechnicalSkills;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_union_dedups_across_categories() {
        let extracted = ExtractedProfile {
            technical_skills: TechnicalSkills {
                programming_languages: strings(&["Python", "SQL"]),
                libraries_or_frameworks: strings(&["Pandas", "Python"]),
                other_tools: strings(&["Git", "SQL"]),
            },
            interpersonal_skills: strings(&["Leadership", "Git"]),
            ..Default::default()
        };

        let skills = collect_skills(&extracted);
        let tags: Vec<_> = skills.iter().collect();
        assert_eq!(tags, vec!["Git", "Leadership", "Pandas", "Python", "SQL"]);
    }

    #[test]
    fn test_empty_profile_has_no_skills() {
        let profile = normalize(ExtractedProfile::default());
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn test_interpersonal_only() {
        let extracted = ExtractedProfile {
            interpersonal_skills: strings(&["Mentoring", " Mentoring "]),
            ..Default::default()
        };
        let profile = normalize(extracted);
        assert_eq!(profile.skills.len(), 1);
        assert!(profile.skills.contains("Mentoring"));
    }

    #[test]
    fn test_normalize_from_llm_json_with_missing_categories() {
        let json = r#"{
            "email_id": "x@example.com",
            "technical_skills": [{"programming_languages": ["Go"]}]
        }"#;
        let extracted: ExtractedProfile = serde_json::from_str(json).unwrap();
        let profile = normalize(extracted);
        assert_eq!(profile.skills.iter().collect::<Vec<_>>(), vec!["Go"]);
        assert_eq!(profile.email(), Some("x@example.com"));
    }

    #[test]
    fn test_profile_serializes_flat_with_skills() {
        let extracted = ExtractedProfile {
            fullname: Some("Asha".to_string()),
            interpersonal_skills: strings(&["Teamwork"]),
            ..Default::default()
        };
        let value = serde_json::to_value(normalize(extracted)).unwrap();
        assert_eq!(value["fullname"], "Asha");
        assert_eq!(value["skills"], serde_json::json!(["Teamwork"]));
    }
}
