//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every UI (the bundled CLI, an editor, a web shell).
//!
//! ## Role and Responsibilities
//!
//! - **Dispatches** to the matching command function
//! - **Owns the lifecycle** of the injected store: [`NotesApi::initialize`]
//!   runs seeding/migration once per instance, [`NotesApi::teardown`] resets it
//! - **Keeps an async contract**: every call is `async` even though the
//!   backends are synchronous today, so a remote backend can be swapped in
//!   without touching callers
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Presentation**: returns domain types, never strings for display
//!
//! ## Generic Over StorageBackend
//!
//! `NotesApi<B: StorageBackend>`:
//! - Production: `NotesApi<FsBackend>`
//! - Testing: `NotesApi<MemBackend>`
//!
//! The facade is `Send + Sync` and is normally shared as `Arc<NotesApi<_>>`
//! (the auto-saver holds one).

use crate::commands::{self, BackupSink, InitOutcome};
use crate::error::Result;
use crate::model::{Note, NoteDraft, NoteUpdate, Settings, StorageInfo};
use crate::store::{NoteStore, StorageBackend};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

pub struct NotesApi<B: StorageBackend> {
    store: NoteStore<B>,
    initialized: AtomicBool,
}

impl<B: StorageBackend> NotesApi<B> {
    pub fn new(store: NoteStore<B>) -> Self {
        Self {
            store,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn with_backend(backend: B) -> Self {
        Self::new(NoteStore::with_backend(backend))
    }

    pub fn store(&self) -> &NoteStore<B> {
        &self.store
    }

    /// Seed or migrate the store. Only the first call per instance does any
    /// work; later calls report `Current`.
    pub async fn initialize(&self) -> Result<InitOutcome> {
        if self.initialized.load(Ordering::SeqCst) {
            return Ok(InitOutcome::Current);
        }
        let outcome = commands::init::run(&self.store)?;
        self.initialized.store(true, Ordering::SeqCst);
        debug!(?outcome, "Store initialized");
        Ok(outcome)
    }

    /// Forget that this instance was initialized. Persisted data is untouched.
    pub async fn teardown(&self) {
        self.initialized.store(false, Ordering::SeqCst);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub async fn list_notes(&self) -> Vec<Note> {
        commands::list::run(&self.store)
    }

    pub async fn get_note(&self, id: &str) -> Option<Note> {
        commands::list::get(&self.store, id)
    }

    pub async fn create_note(&self, draft: NoteDraft) -> Result<Note> {
        commands::create::run(&self.store, draft)
    }

    pub async fn update_note(&self, id: &str, update: NoteUpdate) -> Result<Note> {
        commands::update::run(&self.store, id, update)
    }

    pub async fn delete_note(&self, id: &str) -> Result<Note> {
        commands::delete::run(&self.store, id)
    }

    pub async fn search_notes(&self, query: &str) -> Vec<Note> {
        commands::search::run(&self.store, query)
    }

    pub async fn all_tags(&self) -> Vec<String> {
        commands::tags::all(&self.store)
    }

    pub async fn notes_by_tag(&self, tag: &str) -> Vec<Note> {
        commands::search::by_tag(&self.store, tag)
    }

    /// Export the collection through `sink`; returns the filename written.
    pub async fn export_backup(&self, sink: &dyn BackupSink) -> Result<String> {
        commands::backup::export(&self.store, sink)
    }

    /// Replace the whole collection with a backup. Callers should re-read
    /// the list afterwards.
    pub async fn import_backup(&self, raw: &str) -> Result<usize> {
        commands::backup::import(&self.store, raw)
    }

    pub async fn storage_info(&self) -> Result<StorageInfo> {
        commands::info::run(&self.store)
    }

    pub async fn clear_all_data(&self) -> Result<()> {
        commands::clear::run(&self.store)?;
        self.initialized.store(false, Ordering::SeqCst);
        Ok(())
    }

    pub async fn settings(&self) -> Settings {
        self.store.load_settings()
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.store.save_settings(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemBackend;
    use crate::test_utils::{MemorySink, TestEnv};

    fn make_api() -> NotesApi<MemBackend> {
        NotesApi::with_backend(MemBackend::new())
    }

    #[tokio::test]
    async fn test_initialize_runs_once_per_instance() {
        let api = make_api();
        assert_eq!(api.initialize().await.unwrap(), InitOutcome::Seeded);
        assert!(api.is_initialized());
        assert_eq!(api.initialize().await.unwrap(), InitOutcome::Current);

        api.teardown().await;
        assert!(!api.is_initialized());
        // Data is still there, so a fresh initialize finds it current
        assert_eq!(api.initialize().await.unwrap(), InitOutcome::Current);
    }

    #[tokio::test]
    async fn test_crud_dispatch() {
        let api = make_api();
        api.initialize().await.unwrap();

        let note = api
            .create_note(NoteDraft::new().title("Hello").tags(["Greeting"]))
            .await
            .unwrap();
        assert_eq!(api.get_note(&note.id).await.unwrap().title, "Hello");

        let updated = api
            .update_note(&note.id, NoteUpdate::new().content("world"))
            .await
            .unwrap();
        assert_eq!(updated.content, "world");

        assert_eq!(api.notes_by_tag("greeting").await.len(), 1);
        assert!(api.all_tags().await.contains(&"greeting".to_string()));
        assert_eq!(api.search_notes("WORLD").await.len(), 1);

        api.delete_note(&note.id).await.unwrap();
        assert!(api.get_note(&note.id).await.is_none());
        assert!(api.delete_note(&note.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_backup_dispatch() {
        let api = make_api();
        api.initialize().await.unwrap();
        let sink = MemorySink::default();

        let filename = api.export_backup(&sink).await.unwrap();
        assert!(filename.starts_with("sidenotes-backup-"));

        let count = api.import_backup(&sink.saved()[0].1).await.unwrap();
        assert_eq!(count, 3);
        assert_eq!(api.storage_info().await.unwrap().note_count, 3);
    }

    #[tokio::test]
    async fn test_clear_all_data_resets_lifecycle() {
        let api = make_api();
        api.initialize().await.unwrap();
        api.clear_all_data().await.unwrap();

        assert!(!api.is_initialized());
        assert_eq!(api.initialize().await.unwrap(), InitOutcome::Seeded);
    }

    #[tokio::test]
    async fn test_import_after_clear_is_not_reseeded() {
        let api = make_api();
        api.initialize().await.unwrap();
        api.clear_all_data().await.unwrap();

        api.import_backup(r#"{"notes":[{"id":"restored","title":"R","content":""}]}"#)
            .await
            .unwrap();

        assert_eq!(api.initialize().await.unwrap(), InitOutcome::Current);
        let ids: Vec<String> = api.list_notes().await.into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["restored"]);
    }

    #[tokio::test]
    async fn test_settings_roundtrip() {
        let api = make_api();
        assert_eq!(api.settings().await, Settings::default());

        let mut settings = Settings::default();
        settings.autosave_ms = 500;
        api.save_settings(&settings).await.unwrap();
        assert_eq!(api.settings().await.autosave_ms, 500);
    }

    #[tokio::test]
    async fn test_fs_backed_collection_survives_new_instance() {
        let env = TestEnv::new();
        env.api.initialize().await.unwrap();
        let note = env
            .api
            .create_note(NoteDraft::new().title("Persisted"))
            .await
            .unwrap();

        let reopened = NotesApi::with_backend(crate::store::FsBackend::new(env.root.clone()));
        assert_eq!(reopened.initialize().await.unwrap(), InitOutcome::Current);
        assert_eq!(reopened.get_note(&note.id).await.unwrap().title, "Persisted");
        assert_eq!(reopened.list_notes().await[0].id, note.id);
    }
}
