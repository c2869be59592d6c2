use crate::model::Note;
use crate::store::{NoteStore, StorageBackend};

/// All notes, most recently updated first.
pub fn run<B: StorageBackend>(store: &NoteStore<B>) -> Vec<Note> {
    store.load_notes()
}

/// The note with `id`, if any. Not found is not an error.
pub fn get<B: StorageBackend>(store: &NoteStore<B>, id: &str) -> Option<Note> {
    store.load_notes().into_iter().find(|n| n.id == id)
}
