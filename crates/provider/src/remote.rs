//! Remote secret manager adapter.
//!
//! Wraps an injected [`RemoteSecretClient`] with the canonical error
//! mapping and the internal bounded retry policy. The resolver never sees
//! a client error directly.

use crate::retry::{retry_delay, RemoteClientError};
use crate::SecretProvider;
use async_trait::async_trait;
use noctivault_core::{Error, Platform, Result, VersionSpec};
use std::sync::Arc;
use tokio::time::sleep;

/// Interface of the external secret-manager SDK.
///
/// `resource` follows the manager's naming scheme:
/// `projects/{project}/secrets/{name}/versions/{version|latest}`.
#[async_trait]
pub trait RemoteSecretClient: Send + Sync {
    async fn access_secret_version(
        &self,
        resource: &str,
    ) -> std::result::Result<Vec<u8>, RemoteClientError>;
}

/// Remote provider over any [`RemoteSecretClient`].
pub struct RemoteProvider {
    client: Arc<dyn RemoteSecretClient>,
}

impl RemoteProvider {
    #[must_use]
    pub fn new(client: Arc<dyn RemoteSecretClient>) -> Self {
        RemoteProvider { client }
    }

    async fn access_with_retry(
        &self,
        resource: &str,
    ) -> std::result::Result<Vec<u8>, RemoteClientError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.client.access_secret_version(resource).await {
                Ok(payload) => return Ok(payload),
                Err(error) => {
                    let Some(delay) = retry_delay(&error, attempt) else {
                        return Err(error);
                    };
                    tracing::warn!(
                        resource = %resource,
                        attempt,
                        error = %error,
                        delay_ms = delay.as_millis() as u64,
                        "remote fetch failed, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    fn map_error(
        error: RemoteClientError,
        project: &str,
        name: &str,
        version: VersionSpec,
    ) -> Error {
        match error {
            RemoteClientError::NotFound => Error::missing_remote_secret(project, name, version),
            RemoteClientError::PermissionDenied(msg) | RemoteClientError::Unauthenticated(msg) => {
                Error::authorization(msg)
            }
            RemoteClientError::InvalidArgument(msg) => Error::remote_argument(msg),
            RemoteClientError::Unavailable(msg) | RemoteClientError::DeadlineExceeded(msg) => {
                Error::remote_unavailable(msg)
            }
            RemoteClientError::RateLimited { .. } => {
                Error::remote_unavailable("rate limit not lifted within the retry budget")
            }
            RemoteClientError::Other(msg) => Error::unknown_source(msg),
        }
    }
}

#[async_trait]
impl SecretProvider for RemoteProvider {
    async fn fetch(
        &self,
        platform: Platform,
        project: &str,
        name: &str,
        version: VersionSpec,
    ) -> Result<String> {
        if platform != Platform::Google {
            return Err(Error::remote_argument(format!(
                "unsupported platform '{platform}'"
            )));
        }
        let resource = format!("projects/{project}/secrets/{name}/versions/{version}");

        let payload = self
            .access_with_retry(&resource)
            .await
            .map_err(|e| Self::map_error(e, project, name, version))?;

        String::from_utf8(payload).map_err(|_| Error::remote_decode(project, name))
    }
}
