//! Schema version, first-run seed data and migrations.
//!
//! The version marker lives under its own storage key. `initialize` compares
//! it with [`SCHEMA_VERSION`]:
//!
//! - marker or collection missing → seed [`default_notes`]
//! - marker older than current → [`migrate`] the stored notes
//! - marker current → nothing to do

use crate::model::Note;
use chrono::{Duration, Utc};
use tracing::info;

pub const SCHEMA_VERSION: &str = "1.0.0";

const WELCOME: &str = "# Welcome to SideNotes! 🗒️

This is your first note. You can:

- Write in **Markdown** with live preview
- Drop images directly into notes
- Use `Ctrl + Shift + N` to toggle the panel
- Create multiple notes with titles
- Everything saves automatically, even offline

## Features
- ✅ Offline first - no internet required
- ✅ Dark/Light mode support
- ✅ Works on mobile, tablet & desktop
- ✅ Installable as a native app

Start writing your notes below!";

const PROJECT_IDEAS: &str = "# Project Ideas 💡

## Web Development
- [ ] Build an offline note-taking app
- [ ] Create a habit tracker
- [ ] Design a portfolio website

## Learning Goals
- [ ] Master async Rust
- [ ] Learn service workers
- [ ] Practice responsive design

## Quick Notes
- Remember to test offline functionality
- Add keyboard shortcuts for better UX
- Consider accessibility features";

const MEETING_NOTES: &str = "# Team Meeting Notes

**Date:** January 15, 2025
**Attendees:** John, Sarah, Mike

## Agenda Items
1. Project timeline review
2. Feature prioritization
3. Next sprint planning

## Key Decisions
- Focus on mobile responsiveness first
- Implement dark mode by end of week
- Weekly demo sessions starting next Monday

## Action Items
- [ ] Sarah: Update design mockups
- [ ] Mike: Set up testing environment
- [ ] John: Research offline caching

*Next meeting: January 22, 2025*";

/// The sample notes written on first run, and the degraded fallback for
/// unreadable state. Timestamps are relative to now: 0, 1 and 2 days ago.
pub fn default_notes() -> Vec<Note> {
    let now = Utc::now();
    let seed = |id: &str, title: &str, content: &str, tags: &[&str], days_ago: i64| {
        let at = now - Duration::days(days_ago);
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: at,
            updated_at: at,
            images: Vec::new(),
        }
    };

    vec![
        seed("1", "Welcome to SideNotes", WELCOME, &["welcome", "tutorial"], 0),
        seed(
            "2",
            "Project Ideas",
            PROJECT_IDEAS,
            &["projects", "ideas", "todo"],
            1,
        ),
        seed(
            "3",
            "Meeting Notes - Jan 15",
            MEETING_NOTES,
            &["meeting", "work", "notes"],
            2,
        ),
    ]
}

/// Bring notes written under an older schema up to the current one.
///
/// Every version so far shares the same JSON shape, so migration is a
/// normalization pass: tags are re-normalized, timestamps re-clamped and
/// duplicate ids dropped (first occurrence wins).
pub fn migrate(notes: Vec<Note>, from: &str) -> Vec<Note> {
    let before = notes.len();
    let mut seen = std::collections::HashSet::new();
    let migrated: Vec<Note> = notes
        .into_iter()
        .filter(|n| !n.id.is_empty() && seen.insert(n.id.clone()))
        .map(|mut n| {
            n.normalize();
            n
        })
        .collect();

    info!(
        from = from,
        to = SCHEMA_VERSION,
        notes = migrated.len(),
        dropped = before - migrated.len(),
        "Migrated note collection"
    );
    migrated
}
