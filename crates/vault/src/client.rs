//! The client facade.

use crate::resolver::SecretResolver;
use crate::settings::{NoctivaultSettings, SourceKind};
use crate::store::StoreLocation;
use noctivault_core::{Error, Result, TypedValue};
use noctivault_provider::{LocalMockProvider, RemoteProvider, RemoteSecretClient, SecretProvider};
use noctivault_schema::{validate_mock_store, validate_references};
use noctivault_tree::SecretNode;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

/// Entry point for callers: owns the settings, an optional remote client,
/// and the tree of the most recent successful load.
///
/// A load either fully succeeds or leaves the previous state untouched;
/// partial results are never observable.
pub struct Noctivault {
    settings: NoctivaultSettings,
    remote_client: Option<Arc<dyn RemoteSecretClient>>,
    secrets: Option<SecretNode>,
}

impl Noctivault {
    /// Create a client for the local mock source.
    #[must_use]
    pub fn new(settings: NoctivaultSettings) -> Self {
        Noctivault {
            settings,
            remote_client: None,
            secrets: None,
        }
    }

    /// Create a client with a remote secret-manager client attached.
    #[must_use]
    pub fn with_remote_client(
        settings: NoctivaultSettings,
        client: Arc<dyn RemoteSecretClient>,
    ) -> Self {
        Noctivault {
            settings,
            remote_client: Some(client),
            secrets: None,
        }
    }

    /// Load and resolve secrets from the given store location.
    ///
    /// Local source: reads the reference document and the mock store
    /// (decrypting the envelope when present) from the location. Remote
    /// source: reads only the reference document; any local mock store at
    /// the location is ignored.
    pub async fn load(&mut self, store_path: impl AsRef<Path>) -> Result<&SecretNode> {
        let location = StoreLocation::resolve(store_path.as_ref())?;
        let refs_text = location.read_references()?;
        let refs = validate_references(&refs_text)?;

        let provider: Arc<dyn SecretProvider> = match self.settings.source {
            SourceKind::Local => {
                let store_text = location.read_mock_store(&self.settings.local_enc)?;
                let mocks = validate_mock_store(&store_text)?;
                Arc::new(LocalMockProvider::from_document(&mocks))
            }
            SourceKind::Remote => {
                let client = self.remote_client.clone().ok_or_else(|| {
                    Error::configuration("remote source requires a secret-manager client")
                })?;
                Arc::new(RemoteProvider::new(client))
            }
        };

        let resolver = SecretResolver::new(provider);
        let tree = self.with_timeout(resolver.resolve_tree(&refs)).await?;
        tracing::debug!(secrets = tree.len(), "load complete");
        Ok(self.secrets.insert(tree))
    }

    async fn with_timeout<F>(&self, fut: F) -> Result<SecretNode>
    where
        F: Future<Output = Result<SecretNode>>,
    {
        match self.settings.load_timeout {
            None => fut.await,
            Some(budget) => match tokio::time::timeout(budget, fut).await {
                Ok(result) => result,
                // outstanding fetches are dropped with the future
                Err(_) => Err(Error::remote_unavailable(format!(
                    "load timed out after {budget:?}"
                ))),
            },
        }
    }

    /// The resolved tree of the most recent load.
    pub fn secrets(&self) -> Result<&SecretNode> {
        self.secrets
            .as_ref()
            .ok_or_else(|| Error::configuration("secrets not loaded; call load() first"))
    }

    /// Direct typed lookup by dotted path.
    pub fn get(&self, path: &str) -> Result<TypedValue> {
        self.secrets()?.value_at(path)?.typed(path)
    }

    /// SHA3-256 hex of the raw value at a dotted path.
    pub fn display_hash(&self, path: &str) -> Result<String> {
        Ok(self.secrets()?.value_at(path)?.display_hash())
    }
}
