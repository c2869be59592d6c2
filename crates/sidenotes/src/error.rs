use crate::model::Note;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SidenotesError {
    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Invalid backup format: {0}")]
    ImportFormat(String),

    /// A write to the backing store failed. `unsaved` holds the note the
    /// caller was trying to persist so it can retry or report it.
    #[error("Persistence error: {reason}")]
    Persistence {
        reason: String,
        unsaved: Option<Box<Note>>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SidenotesError {
    pub fn persistence(reason: impl Into<String>) -> Self {
        SidenotesError::Persistence {
            reason: reason.into(),
            unsaved: None,
        }
    }

    /// Attach the note that failed to persist. Non-persistence errors pass
    /// through unchanged.
    pub fn with_unsaved(self, note: Note) -> Self {
        match self {
            SidenotesError::Persistence { reason, .. } => SidenotesError::Persistence {
                reason,
                unsaved: Some(Box::new(note)),
            },
            SidenotesError::Io(e) => SidenotesError::Persistence {
                reason: e.to_string(),
                unsaved: Some(Box::new(note)),
            },
            other => other,
        }
    }

    pub fn unsaved_note(&self) -> Option<&Note> {
        match self {
            SidenotesError::Persistence { unsaved, .. } => unsaved.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SidenotesError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, SidenotesError>;
