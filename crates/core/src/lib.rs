//! Core domain types, errors, and constants for noctivault.
//!
//! This crate establishes the foundational data structures and error handling
//! mechanisms used throughout the entire codebase.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing all possible failure modes for predictable error handling.
//! - **`types`**: Contains the domain vocabulary shared by every layer:
//!   platforms, secret types, version selectors, and resolved paths.
//! - **`constants`**: Shared static constants such as environment variable
//!   names, store file names, and the display mask token.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    types::*,
};
