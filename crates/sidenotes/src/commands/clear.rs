use crate::error::Result;
use crate::store::{NoteStore, StorageBackend};
use tracing::info;

/// Wipe notes, settings and the version marker. The next `initialize`
/// seeds a fresh collection.
pub fn run<B: StorageBackend>(store: &NoteStore<B>) -> Result<()> {
    store.clear()?;
    info!("All sidenotes data cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, init, InitOutcome};
    use crate::model::NoteDraft;
    use crate::store::MemBackend;

    #[test]
    fn test_clear_then_initialize_reseeds() {
        let store = NoteStore::with_backend(MemBackend::new());
        init::run(&store).unwrap();
        create::run(&store, NoteDraft::new().title("gone soon")).unwrap();

        run(&store).unwrap();

        assert_eq!(store.read_notes().unwrap(), None);
        assert_eq!(store.read_version(), None);
        assert_eq!(init::run(&store).unwrap(), InitOutcome::Seeded);
        assert_eq!(store.load_notes().len(), 3);
    }

    #[test]
    fn test_clear_failure_surfaces() {
        let store = NoteStore::with_backend(MemBackend::new());
        store.backend().set_simulate_write_error(true);
        assert!(run(&store).is_err());
    }
}
