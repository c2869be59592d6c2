//! # Sidenotes Architecture
//!
//! Sidenotes is the **offline-first core** of a small note-taking
//! application: a durable note collection, search, backup, debounced
//! auto-save and an offline cache router. It is UI-agnostic; the bundled
//! `sidenotes` binary is just one client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients (sidenotes-cli, editors, a web shell)              │
//! │  - Own presentation, prompts and exit codes                 │
//! └─────────────────────────────────────────────────────────────┘
//!              │                                  │
//!              ▼                                  ▼
//! ┌───────────────────────────────┐  ┌──────────────────────────┐
//! │  API Layer (api.rs)           │  │  Auto-save (autosave.rs) │
//! │  - Async facade over commands │◄─│  - Debounced single      │
//! │  - Store lifecycle            │  │    pending write         │
//! └───────────────────────────────┘  └──────────────────────────┘
//!              │
//!              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, invariants, typed errors                 │
//! └─────────────────────────────────────────────────────────────┘
//!              │
//!              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait (how), NoteStore (what)             │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`cache`] router stands apart: it never touches the note store and
//! talks to the network only through its `Fetcher` seam.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Diagnostics go through `tracing`; the embedding client
//! decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: thorough unit tests against `MemBackend`.
//! 2. **API**: dispatch and lifecycle tests.
//! 3. **Auto-save / cache**: tokio tests with a paused clock and stub
//!    fetchers.
//! 4. **Integration** (`tests/`): the same flows against `FsBackend` in a
//!    temp dir.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all note operations
//! - [`autosave`]: Debounced pending-write state machine
//! - [`cache`]: Offline cache router, client registry, share target
//! - [`commands`]: Business logic for each operation
//! - [`config`]: Configuration file
//! - [`error`]: Error types
//! - [`model`]: `Note`, drafts, updates, settings, backup envelope
//! - [`schema`]: Seed data and schema migration
//! - [`search`]: Query matching and tag filtering
//! - [`store`]: Storage abstraction and implementations

pub mod api;
pub mod autosave;
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod schema;
pub mod search;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;
