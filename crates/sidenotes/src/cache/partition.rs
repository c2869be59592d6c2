use super::http::{cache_key, Request, Response};
use moka::sync::Cache;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use url::Url;

/// A named, versioned bucket of stored responses keyed by URL.
///
/// Cloning is cheap and clones share entries, so a partition can be moved
/// into a background refresh task.
#[derive(Clone)]
pub struct Partition {
    name: String,
    entries: Cache<String, Response>,
}

impl Partition {
    fn new(name: &str, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .name(name)
            .build();
        Self {
            name: name.to_string(),
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, request: &Request) -> Option<Response> {
        self.get_url(&request.url)
    }

    pub fn get_url(&self, url: &Url) -> Option<Response> {
        self.entries.get(&cache_key(url))
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.entries.contains_key(&cache_key(url))
    }

    pub fn put(&self, request: &Request, response: Response) {
        self.put_url(&request.url, response);
    }

    pub fn put_url(&self, url: &Url, response: Response) {
        debug!(partition = %self.name, url = %url, "Stored response");
        self.entries.insert(cache_key(url), response);
    }
}

/// All partitions the application can see, in creation order.
pub struct CacheStorage {
    partitions: Mutex<Vec<Partition>>,
    max_entries: u64,
}

impl CacheStorage {
    pub fn new(max_entries: u64) -> Self {
        Self {
            partitions: Mutex::new(Vec::new()),
            max_entries,
        }
    }

    /// Open `name`, creating it if needed.
    pub fn open(&self, name: &str) -> Partition {
        let mut partitions = self.lock();
        if let Some(existing) = partitions.iter().find(|p| p.name == name) {
            return existing.clone();
        }
        let partition = Partition::new(name, self.max_entries);
        partitions.push(partition.clone());
        partition
    }

    pub fn get(&self, name: &str) -> Option<Partition> {
        self.lock().iter().find(|p| p.name == name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.lock().iter().any(|p| p.name == name)
    }

    /// Returns whether a partition was removed.
    pub fn delete(&self, name: &str) -> bool {
        let mut partitions = self.lock();
        let before = partitions.len();
        partitions.retain(|p| p.name != name);
        before != partitions.len()
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|p| p.name.clone()).collect()
    }

    /// First stored response for `url` across every partition.
    pub fn match_any(&self, url: &Url) -> Option<Response> {
        let partitions = self.lock().clone();
        partitions.iter().find_map(|p| p.get_url(url))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Partition>> {
        self.partitions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
