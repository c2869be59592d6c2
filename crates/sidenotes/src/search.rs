//! # Query Matching
//!
//! Search is plain case-insensitive substring containment. There is no
//! tokenizing and no ranking: results keep the order of the input, which is
//! always the `updated_at`-descending order of `list`.
//!
//! A note matches a query when the lowercased query is contained in:
//! - the lowercased title, or
//! - the lowercased content, or
//! - any lowercased tag.
//!
//! An empty (or all-whitespace) query matches everything.

use crate::model::Note;
use std::collections::BTreeSet;

/// A trimmed, lowercased search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Self {
        Query(raw.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, note: &Note) -> bool {
        if self.is_empty() {
            return true;
        }
        let term = self.as_str();
        note.title.to_lowercase().contains(term)
            || note.content.to_lowercase().contains(term)
            || note.tags.iter().any(|t| t.to_lowercase().contains(term))
    }
}

/// Filter `notes` by `query`, preserving order.
pub fn filter_notes(notes: Vec<Note>, query: &Query) -> Vec<Note> {
    if query.is_empty() {
        return notes;
    }
    notes.into_iter().filter(|n| query.matches(n)).collect()
}

/// Notes carrying `tag` (case-insensitive exact match), preserving order.
pub fn filter_by_tag(notes: Vec<Note>, tag: &str) -> Vec<Note> {
    notes.into_iter().filter(|n| n.has_tag(tag)).collect()
}

/// Every distinct tag across `notes`, ascending.
pub fn collect_tags(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .flat_map(|n| n.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteDraft;

    fn note(id: &str, title: &str, content: &str, tags: &[&str]) -> Note {
        Note::from_draft(
            id.to_string(),
            NoteDraft::new()
                .title(title)
                .content(content)
                .tags(tags.iter().copied()),
        )
    }

    fn fixtures() -> Vec<Note> {
        vec![
            note("a", "Groceries", "milk, eggs", &["home"]),
            note("b", "Standup", "Discussed the MILK budget", &["work"]),
            note("c", "Ideas", "none yet", &["homework"]),
        ]
    }

    #[test]
    fn test_query_is_trimmed_and_lowercased() {
        assert_eq!(Query::parse("  MiLk ").as_str(), "milk");
        assert!(Query::parse("   ").is_empty());
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let notes = fixtures();
        let out = filter_notes(notes.clone(), &Query::parse(""));
        assert_eq!(out, notes);
    }

    #[test]
    fn test_matches_title_content_or_tag() {
        let ids = |q: &str| -> Vec<String> {
            filter_notes(fixtures(), &Query::parse(q))
                .into_iter()
                .map(|n| n.id)
                .collect()
        };
        assert_eq!(ids("groc"), vec!["a"]);
        assert_eq!(ids("MILK"), vec!["a", "b"]);
        assert_eq!(ids("home"), vec!["a", "c"]);
        assert!(ids("nothing-here").is_empty());
    }

    #[test]
    fn test_filter_by_tag_is_exact() {
        let out = filter_by_tag(fixtures(), "HOME");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn test_collect_tags_sorted_distinct() {
        let mut notes = fixtures();
        notes.push(note("d", "x", "y", &["work", "alpha"]));
        assert_eq!(collect_tags(&notes), vec!["alpha", "home", "homework", "work"]);
    }

    #[test]
    fn test_search_is_subset_of_input() {
        let notes = fixtures();
        for q in ["", "a", "e", "work", "zzz", "MI"] {
            let out = filter_notes(notes.clone(), &Query::parse(q));
            assert!(out.iter().all(|n| notes.contains(n)));
        }
    }
}
