//! # Command Layer
//!
//! This module contains the **core business logic** of sidenotes. Each
//! operation lives in its own submodule as plain functions over a
//! [`NoteStore`](crate::store::NoteStore).
//!
//! ## What Commands Do
//!
//! - Read the collection, apply the operation, write it back
//! - Enforce note invariants (unique ids, immutable `id`/`createdAt`,
//!   normalized tags, `updatedAt >= createdAt`)
//! - Return domain types (`Note`, `Vec<Note>`, counts) or a typed error
//!
//! ## What Commands Do NOT Do
//!
//! - **Presentation**: no stdout, no formatting beyond the human-readable
//!   size in [`info`]
//! - **Policy the engine does not own**: e.g. "keep at least one note" is a
//!   caller decision
//!
//! ## Read vs. Write Failures
//!
//! Queries start from the degrading read, so they never fail. Mutations start
//! from the strict read: an unreadable collection fails the mutation instead
//! of being replaced by the seed set. Writes surface `Persistence` errors that
//! carry the note which failed to save.
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Tests run against
//! [`MemBackend`](crate::store::MemBackend).
//!
//! ## Command Modules
//!
//! - [`init`]: First-run seeding and schema migration
//! - [`list`]: List and fetch notes
//! - [`create`]: Create notes
//! - [`update`]: Field-level updates
//! - [`delete`]: Hard delete
//! - [`search`]: Substring search and tag filtering
//! - [`tags`]: Tag listing
//! - [`backup`]: Export and import of the backup envelope
//! - [`info`]: Storage usage accounting
//! - [`clear`]: Full reset

pub mod backup;
pub mod clear;
pub mod create;
pub mod delete;
pub mod info;
pub mod init;
pub mod list;
pub mod search;
pub mod tags;
pub mod update;

pub use backup::{BackupSink, DirSink};
pub use init::InitOutcome;
