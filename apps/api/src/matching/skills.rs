//! Skill Matcher: the boolean gate behind jobseeker → company auto-matches.
//!
//! Skills arrive as free-form, comma-delimited text. Every token is trimmed and
//! lower-cased before comparison and empty tokens are dropped, so `" React ,SQL,,"`
//! and `"react, sql"` describe the same set.

#![allow(dead_code)]

use std::collections::BTreeSet;

/// A set of normalized skill tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    /// Parses the comma-delimited representation stored on profiles.
    pub fn parse(raw: &str) -> Self {
        raw.split(',').collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, skill: &str) -> bool {
        normalize_skill(skill).is_some_and(|s| self.0.contains(&s))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Required skills from `self` that `other` does not cover.
    pub fn missing_from<'a>(&'a self, other: &'a SkillSet) -> Vec<&'a str> {
        self.0.difference(&other.0).map(String::as_str).collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SkillSet(
            iter.into_iter()
                .filter_map(|token| normalize_skill(token.as_ref()))
                .collect(),
        )
    }
}

/// Trims and lower-cases a token. Returns `None` for blank tokens.
pub fn normalize_skill(token: &str) -> Option<String> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// True when the jobseeker holds every required skill.
/// An empty requirement set means "no filter" and always matches.
pub fn is_auto_match(jobseeker_skills: &SkillSet, required_skills: &SkillSet) -> bool {
    required_skills.is_empty() || required_skills.0.is_subset(&jobseeker_skills.0)
}
