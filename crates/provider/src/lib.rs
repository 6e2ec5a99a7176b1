//! Secret value sources.
//!
//! Everything a resolver needs is the single-capability [`SecretProvider`]
//! trait; the two implementations are the local mock index and the remote
//! secret manager adapter. The remote SDK itself stays behind the
//! [`RemoteSecretClient`] collaborator trait, so this crate owns only the
//! canonical error mapping and the bounded retry policy around it.

pub mod local;
pub mod remote;
mod retry;

use async_trait::async_trait;
use noctivault_core::{Platform, Result, VersionSpec};

pub use local::LocalMockProvider;
pub use remote::{RemoteProvider, RemoteSecretClient};
pub use retry::RemoteClientError;

/// Uniform fetch capability over any value source.
///
/// Implementations are side-effect-free per call and safe to invoke
/// concurrently; the resolver depends only on this interface.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the raw string value for one reference.
    async fn fetch(
        &self,
        platform: Platform,
        project: &str,
        name: &str,
        version: VersionSpec,
    ) -> Result<String>;
}
