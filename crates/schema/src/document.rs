//! Validated document structures.
//!
//! These are the outputs of [`crate::validator`]: fully normalized, with
//! inheritance already applied. Raw serde-facing structures live in the
//! validator module and never escape this crate.

use noctivault_core::{Platform, SecretType, VersionSpec};

/// A validated top-level document: exactly one of the two entry kinds.
#[derive(Debug, Clone)]
pub enum Document {
    MockStore(MockStoreDocument),
    References(ReferenceDocument),
}

/// A validated local mock store.
#[derive(Debug, Clone)]
pub struct MockStoreDocument {
    pub platform: Platform,
    pub project_id: String,
    pub mocks: Vec<MockEntry>,
}

/// A single mock entry with inheritance applied: `platform` and
/// `project_id` are always concrete here.
#[derive(Debug, Clone)]
pub struct MockEntry {
    pub platform: Platform,
    pub project_id: String,
    pub name: String,
    pub value: String,
    pub version: u32,
}

/// A validated reference document.
#[derive(Debug, Clone)]
pub struct ReferenceDocument {
    pub platform: Platform,
    pub project_id: String,
    pub refs: Vec<RefEntry>,
}

/// A reference entry: either a leaf or a named group of further entries.
/// Groups nest to arbitrary depth.
#[derive(Debug, Clone)]
pub enum RefEntry {
    Leaf(SecretRef),
    Group(SecretGroup),
}

/// A leaf reference with inheritance applied.
#[derive(Debug, Clone)]
pub struct SecretRef {
    pub platform: Platform,
    pub project_id: String,
    /// Leaf segment name of the final tree path.
    pub cast: String,
    /// Name of the secret in the value source.
    pub ref_name: String,
    pub version: VersionSpec,
    pub ty: SecretType,
}

/// A named group; its key contributes one path segment for every
/// descendant leaf.
#[derive(Debug, Clone)]
pub struct SecretGroup {
    pub key: String,
    pub children: Vec<RefEntry>,
}
