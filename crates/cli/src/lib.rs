//! Command implementations behind the `noctivault` binary.
//!
//! The clap layer in `main.rs` only parses; everything it dispatches to
//! lives here so the operations stay testable without spawning a process.

pub mod commands;
