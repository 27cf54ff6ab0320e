//! Skill filter: conjunctive tag match over the candidate table.

use std::collections::BTreeSet;

use crate::models::candidate::CandidateRow;

/// Query key holding a comma separated list of tags (`skills=python,sql`).
pub const LIST_PARAM: &str = "skills";
/// Query key holding exactly one tag, taken whole (`skill=Sales, Marketing`).
pub const TAG_PARAM: &str = "skill";

/// Collects the selected tags from query pairs. Both keys may repeat and may
/// be mixed; other keys are ignored. Blank tags are dropped.
pub fn parse_selection<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<String> {
    let mut tags: Vec<String> = params
        .into_iter()
        .flat_map(|(key, value)| {
            let parts: Vec<&str> = match key {
                LIST_PARAM => value.split(',').collect(),
                TAG_PARAM => vec![value],
                _ => Vec::new(),
            };
            parts
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Rows whose skills contain every selected tag. An empty selection returns
/// the table unchanged.
pub fn filter_by_skills(rows: Vec<CandidateRow>, selection: &[String]) -> Vec<CandidateRow> {
    if selection.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| row.skills.contains_all(selection.iter().map(String::as_str)))
        .collect()
}

/// Sorted distinct union of every row's tags; the options offered for filtering.
pub fn available_skills(rows: &[CandidateRow]) -> Vec<String> {
    rows.iter()
        .flat_map(|r| r.skills.iter())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}
