//! # CLI Behavior
//!
//! This is **one possible UI client** for sidenotes, not the application
//! itself. It is the only place that knows about terminal I/O, exit codes
//! and output formatting.
//!
//! ## Naked Execution
//!
//! Running `sidenotes` with no arguments is `sidenotes list`.
//!
//! ## Data Directory
//!
//! `--data-dir` (or `SIDENOTES_DATA_DIR`) wins; otherwise the platform data
//! directory from `directories`. Notes, settings, the schema marker and
//! `config.json` all live there.
//!
//! ## Keep One Note
//!
//! The library happily stores an empty collection. The CLI refuses to delete
//! the last note unless `--force` is given.
//!
//! ## Module Structure
//!
//! - `commands`: context setup and per-command handlers
//! - `print`: output formatting (colors, relative times, truncation)
//! - `setup`: argument parsing via clap

mod commands;
mod print;
pub mod setup;

pub use commands::run;
