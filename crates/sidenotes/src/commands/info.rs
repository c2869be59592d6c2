use crate::error::Result;
use crate::model::StorageInfo;
use crate::store::{NoteStore, StorageBackend};

/// Usage figures for display. The size is the compact serialized collection;
/// no cap is enforced here, the host storage decides when it is full.
pub fn run<B: StorageBackend>(store: &NoteStore<B>) -> Result<StorageInfo> {
    let notes = store.load_notes();
    let size = serde_json::to_string(&notes)?.len() as u64;

    Ok(StorageInfo {
        note_count: notes.len(),
        storage_size: size,
        human_readable_size: format_bytes(size),
        last_updated: notes.first().map(|n| n.updated_at),
    })
}

/// Base-1024 size with up to two decimals, trailing zeros trimmed:
/// `0 Bytes`, `512 Bytes`, `1 KB`, `1.5 KB`, `2.25 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
