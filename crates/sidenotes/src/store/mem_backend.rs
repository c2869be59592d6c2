use super::{StorageBackend, StorageKey};
use crate::error::{Result, SidenotesError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory storage backend for testing.
///
/// Uses a `Mutex` rather than `RefCell` so the API facade can be shared with
/// spawned tasks (auto-save timers run on the tokio runtime).
#[derive(Default)]
pub struct MemBackend {
    values: Mutex<HashMap<StorageKey, String>>,
    simulate_write_error: AtomicBool,
    simulate_read_error: AtomicBool,
    writes: AtomicUsize,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Enable read error simulation (storage unavailable).
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.store(simulate, Ordering::SeqCst);
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Test helper to plant a raw value, bypassing error simulation and the
    /// write counter.
    pub fn put_raw(&self, key: StorageKey, value: &str) {
        self.lock().insert(key, value.to_string());
    }

    pub fn get_raw(&self, key: StorageKey) -> Option<String> {
        self.lock().get(&key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StorageKey, String>> {
        // A poisoned map is still a valid map; recover it.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, key: StorageKey) -> Result<Option<String>> {
        if self.simulate_read_error.load(Ordering::SeqCst) {
            return Err(SidenotesError::persistence("Simulated read error"));
        }
        Ok(self.lock().get(&key).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(SidenotesError::persistence("Simulated write error"));
        }
        self.lock().insert(key, value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(SidenotesError::persistence("Simulated write error"));
        }
        self.lock().remove(&key);
        Ok(())
    }
}
