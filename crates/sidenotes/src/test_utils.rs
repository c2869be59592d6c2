use crate::api::NotesApi;
use crate::commands::BackupSink;
use crate::error::{Result, SidenotesError};
use crate::store::FsBackend;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Records every export instead of writing files.
#[derive(Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl MemorySink {
    /// A sink whose every save fails, like a cancelled "save file" dialog.
    pub fn failing() -> Self {
        Self {
            saved: Mutex::default(),
            fail: true,
        }
    }

    pub fn saved(&self) -> Vec<(String, String)> {
        self.saved.lock().unwrap().clone()
    }
}

impl BackupSink for MemorySink {
    fn save(&self, filename: &str, contents: &str) -> Result<()> {
        if self.fail {
            return Err(SidenotesError::persistence("Simulated save failure"));
        }
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), contents.to_string()));
        Ok(())
    }
}

pub struct TestEnv {
    // Keeps the directory alive until the test is done
    pub _temp_dir: TempDir,
    pub api: NotesApi<FsBackend>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let api = NotesApi::with_backend(FsBackend::new(root.clone()));
        Self {
            _temp_dir: temp_dir,
            api,
            root,
        }
    }
}
