//! Noctivault: declarative secret references resolved into a masked tree.
//!
//! This crate is the programmatic surface. A caller builds a
//! [`NoctivaultSettings`] value, constructs a [`Noctivault`] client, and
//! calls [`Noctivault::load`] with a store location. The result is an
//! immutable [`SecretNode`] tree whose leaves never stringify to their raw
//! content; values are revealed only through the explicit accessors.
//!
//! ```no_run
//! # async fn demo() -> noctivault::Result<()> {
//! use noctivault::{Noctivault, NoctivaultSettings};
//!
//! let mut vault = Noctivault::new(NoctivaultSettings::default());
//! let secrets = vault.load("./config").await?;
//! let password = secrets.value_at("database.password")?.get();
//! # let _ = password;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod resolver;
pub mod settings;
pub mod store;

pub use client::Noctivault;
pub use resolver::SecretResolver;
pub use settings::{EncMode, LocalEncSettings, NoctivaultSettings, SourceKind};

// Re-exports so callers need only this crate
pub use noctivault_core::{Error, Platform, Result, SecretType, TypedValue, VersionSpec};
pub use noctivault_provider::{
    LocalMockProvider, RemoteClientError, RemoteProvider, RemoteSecretClient, SecretProvider,
};
pub use noctivault_tree::{ResolvedSecret, SecretEntry, SecretNode, SecretValue};
