//! Parsing of the persisted `skills` column back into a typed set.
//!
//! Accepts a JSON array (what this service writes), a Python-style list
//! literal such as `['sql', "c++"]` (written by older tooling) or an already
//! structured JSON array value. Anything else is rejected.

use serde_json::Value;
use thiserror::Error;

use crate::models::skills::SkillSet;

#[derive(Debug, Error, PartialEq)]
pub enum SkillColumnError {
    #[error("skills column is empty")]
    Empty,

    #[error("skills column is not a list: {0:?}")]
    NotAList(String),

    #[error("skills list contains a non-text item: {0}")]
    NonTextItem(String),
}

/// Parses the text form of the column.
pub fn parse_skill_column(raw: &str) -> Result<SkillSet, SkillColumnError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SkillColumnError::Empty);
    }
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return Err(SkillColumnError::NotAList(trimmed.to_string()));
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => parse_skill_value(&value),
        Err(_) => parse_list_literal(trimmed)
            .ok_or_else(|| SkillColumnError::NotAList(trimmed.to_string())),
    }
}

/// Parses a structured value: an array of strings, or a string holding the
/// text form. Parsing an already parsed column is a no-op.
pub fn parse_skill_value(value: &Value) -> Result<SkillSet, SkillColumnError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.as_str()),
                other => Err(SkillColumnError::NonTextItem(other.to_string())),
            })
            .collect(),
        Value::String(s) => parse_skill_column(s),
        other => Err(SkillColumnError::NotAList(other.to_string())),
    }
}

/// Single- or double-quoted string items inside `[...]`, comma separated.
fn parse_list_literal(text: &str) -> Option<SkillSet> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut set = SkillSet::new();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let quote = match chars.next() {
            None => return Some(set),
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return None,
        };

        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => match chars.next()? {
                    'n' => item.push('\n'),
                    't' => item.push('\t'),
                    other => item.push(other),
                },
                c if c == quote => break,
                c => item.push(c),
            }
        }
        set.insert(&item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => return Some(set),
            Some(',') => {}
            Some(_) => return None,
        }
    }
}
