use super::share::SharedContent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

/// Messages posted from the router to a foreground context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    SharedContent(SharedContent),
    OpenWindow(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientInfo {
    pub id: ClientId,
    pub controlled: bool,
}

struct Entry {
    id: ClientId,
    controlled: bool,
    sender: UnboundedSender<ClientMessage>,
}

/// Registry of open foreground contexts.
#[derive(Default)]
pub struct Clients {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
    // Windows requested while no context was open
    window_requests: Mutex<Vec<String>>,
}

impl Clients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> (ClientId, UnboundedReceiver<ClientMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = ClientId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.lock().push(Entry {
            id,
            controlled: false,
            sender,
        });
        debug!(client = id.0, "Client registered");
        (id, receiver)
    }

    pub fn unregister(&self, id: ClientId) {
        self.lock().retain(|e| e.id != id);
    }

    /// Take control of every open context. Returns how many there are.
    pub fn claim(&self) -> usize {
        let mut entries = self.lock();
        for entry in entries.iter_mut() {
            entry.controlled = true;
        }
        entries.len()
    }

    /// Open contexts in registration order. Contexts whose receiver was
    /// dropped are pruned first.
    pub fn match_all(&self) -> Vec<ClientInfo> {
        let mut entries = self.lock();
        entries.retain(|e| !e.sender.is_closed());
        entries
            .iter()
            .map(|e| ClientInfo {
                id: e.id,
                controlled: e.controlled,
            })
            .collect()
    }

    pub fn post(&self, id: ClientId, message: ClientMessage) -> bool {
        let mut entries = self.lock();
        let Some(pos) = entries.iter().position(|e| e.id == id) else {
            return false;
        };
        if entries[pos].sender.send(message).is_err() {
            entries.remove(pos);
            return false;
        }
        true
    }

    /// Post to the first open context; returns who got it.
    pub fn post_first(&self, message: ClientMessage) -> Option<ClientId> {
        let first = self.match_all().first().map(|c| c.id)?;
        self.post(first, message).then_some(first)
    }

    /// Ask a context to show `url`, or record a new-window request when none
    /// is open.
    pub fn open_window(&self, url: &str) -> Option<ClientId> {
        let posted = self.post_first(ClientMessage::OpenWindow(url.to_string()));
        if posted.is_none() {
            debug!(url, "No open client, recording window request");
            self.window_requests
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(url.to_string());
        }
        posted
    }

    pub fn take_window_requests(&self) -> Vec<String> {
        std::mem::take(&mut *self.window_requests.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
