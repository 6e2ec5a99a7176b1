//! Local mock store provider.

use crate::SecretProvider;
use async_trait::async_trait;
use noctivault_core::{Error, Platform, Result, VersionSpec};
use noctivault_schema::MockStoreDocument;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MockKey {
    platform: Platform,
    project: String,
    name: String,
}

/// Indexes mock entries for `(platform, project, name) -> {version -> value}`
/// lookup. Built fresh from a validated document per load and discarded
/// after tree assembly.
pub struct LocalMockProvider {
    index: HashMap<MockKey, BTreeMap<u32, String>>,
}

impl LocalMockProvider {
    /// Build the index from a validated mock store document. Entry-level
    /// platform/project are already concrete after validation.
    #[must_use]
    pub fn from_document(doc: &MockStoreDocument) -> Self {
        let mut index: HashMap<MockKey, BTreeMap<u32, String>> = HashMap::new();
        for mock in &doc.mocks {
            let key = MockKey {
                platform: mock.platform,
                project: mock.project_id.clone(),
                name: mock.name.clone(),
            };
            index
                .entry(key)
                .or_default()
                .insert(mock.version, mock.value.clone());
        }
        LocalMockProvider { index }
    }

    fn lookup(
        &self,
        platform: Platform,
        project: &str,
        name: &str,
        version: VersionSpec,
    ) -> Result<String> {
        let key = MockKey {
            platform,
            project: project.to_string(),
            name: name.to_string(),
        };
        let versions = self
            .index
            .get(&key)
            .filter(|versions| !versions.is_empty())
            .ok_or_else(|| Error::missing_local_mock(platform, project, name, version))?;
        let value = match version {
            // highest integer version present for this exact key
            VersionSpec::Latest => versions.values().next_back(),
            VersionSpec::Exact(v) => versions.get(&v),
        };
        value
            .cloned()
            .ok_or_else(|| Error::missing_local_mock(platform, project, name, version))
    }
}

#[async_trait]
impl SecretProvider for LocalMockProvider {
    async fn fetch(
        &self,
        platform: Platform,
        project: &str,
        name: &str,
        version: VersionSpec,
    ) -> Result<String> {
        self.lookup(platform, project, name, version)
    }
}
