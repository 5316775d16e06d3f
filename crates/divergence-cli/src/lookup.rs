//! Resolve a subject from what the user typed: an id, a name, or a fuzzy
//! fragment of a name.

use anyhow::{Result, anyhow};
use divergence_core::subject::Subject;
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

pub fn resolve<'a>(subjects: &'a [Subject], query: &str) -> Result<&'a Subject> {
  let query = query.trim();
  if let Some(s) = subjects.iter().find(|s| s.id.as_str() == query) {
    return Ok(s);
  }
  if let Some(s) = subjects.iter().find(|s| s.name.eq_ignore_ascii_case(query)) {
    return Ok(s);
  }

  let matcher = SkimMatcherV2::default();
  let mut best: Option<(i64, &Subject)> = None;
  for subject in subjects {
    let Some(score) = matcher.fuzzy_match(&subject.name, query) else {
      continue;
    };
    // Earlier subjects win ties.
    if best.is_none_or(|(top, _)| score > top) {
      best = Some((score, subject));
    }
  }

  best
    .map(|(_, s)| s)
    .ok_or_else(|| anyhow!("no subject matches {query:?}"))
}
