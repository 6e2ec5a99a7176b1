//! Reference resolution.
//!
//! The resolver walks the validated reference tree depth-first, fetches
//! every leaf concurrently under a bounded semaphore, validates casts, and
//! hands the flat result to tree assembly. Duplicate-path detection lives
//! in assembly, after all fetches, so completion order never matters. A
//! run either produces a complete tree or fails outright.

use futures::future::join_all;
use noctivault_core::{Error, ResolvedPath, Result};
use noctivault_provider::SecretProvider;
use noctivault_schema::{RefEntry, ReferenceDocument, SecretRef};
use noctivault_tree::{ResolvedSecret, SecretNode, SecretValue};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Upper bound on in-flight fetches per resolver run.
const MAX_CONCURRENT_FETCHES: usize = 10;

/// Resolves a reference document against any [`SecretProvider`].
pub struct SecretResolver {
    provider: Arc<dyn SecretProvider>,
    semaphore: Arc<Semaphore>,
}

impl SecretResolver {
    #[must_use]
    pub fn new(provider: Arc<dyn SecretProvider>) -> Self {
        SecretResolver {
            provider,
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES)),
        }
    }

    /// Resolve every reference to a `(path, value)` pair.
    pub async fn resolve(&self, doc: &ReferenceDocument) -> Result<Vec<ResolvedSecret>> {
        let mut leaves = Vec::new();
        collect_leaves(&doc.refs, &[], &mut leaves);
        tracing::debug!(count = leaves.len(), "resolving references");

        let fetches = leaves.into_iter().map(|(path, leaf)| self.fetch_one(path, leaf));
        let results = join_all(fetches).await;
        results.into_iter().collect()
    }

    /// Resolve and assemble the final tree.
    pub async fn resolve_tree(&self, doc: &ReferenceDocument) -> Result<SecretNode> {
        let entries = self.resolve(doc).await?;
        SecretNode::build(entries)
    }

    async fn fetch_one(&self, path: ResolvedPath, leaf: SecretRef) -> Result<ResolvedSecret> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::configuration(format!("fetch semaphore closed: {e}")))?;
        let raw = self
            .provider
            .fetch(leaf.platform, &leaf.project_id, &leaf.ref_name, leaf.version)
            .await?;
        let value = SecretValue::new(raw, leaf.ty);
        // validate the declared cast now so a bad value fails the load
        // instead of the first reveal
        value.typed(&path.to_string())?;
        Ok(ResolvedSecret { path, value })
    }
}

/// Depth-first walk; the final path of a leaf is the enclosing group keys
/// plus its cast name.
fn collect_leaves(
    entries: &[RefEntry],
    prefix: &[String],
    out: &mut Vec<(ResolvedPath, SecretRef)>,
) {
    for entry in entries {
        match entry {
            RefEntry::Leaf(leaf) => {
                let mut segments = prefix.to_vec();
                segments.push(leaf.cast.clone());
                out.push((ResolvedPath::new(segments), leaf.clone()));
            }
            RefEntry::Group(group) => {
                let mut segments = prefix.to_vec();
                segments.push(group.key.clone());
                collect_leaves(&group.children, &segments, out);
            }
        }
    }
}
