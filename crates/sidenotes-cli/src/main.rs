//! # Sidenotes CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only starts the runtime, invokes `cli::run()` and handles process
//! termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/sidenotes-cli/src/cli/)                  │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (print.rs)                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  sidenotes library (crates/sidenotes/)                      │
//! │  - NotesApi facade, auto-save, cache router                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tests for this crate build argument vectors (`setup.rs`), check rendering
//! helpers (`print.rs`) and run the real binary against a temp data
//! directory (`tests/`).

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
