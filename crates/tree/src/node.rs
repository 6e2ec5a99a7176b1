//! Tree assembly and navigation.

use crate::value::SecretValue;
use indexmap::IndexMap;
use noctivault_core::{Error, ResolvedPath, Result};
use std::fmt;

/// One resolver output: a final tree path and its masked value.
pub struct ResolvedSecret {
    pub path: ResolvedPath,
    pub value: SecretValue,
}

/// A child of a [`SecretNode`]: either a nested node or a leaf value.
pub enum SecretEntry {
    Node(SecretNode),
    Leaf(SecretValue),
}

/// Immutable ordered mapping from path segment to child entry.
///
/// Built once from the full set of resolved entries; duplicate detection is
/// part of assembly and is independent of insertion order, so concurrent
/// fetch completion order never changes the outcome.
pub struct SecretNode {
    children: IndexMap<String, SecretEntry>,
}

impl SecretNode {
    fn empty() -> Self {
        SecretNode {
            children: IndexMap::new(),
        }
    }

    /// Assemble a tree from flat resolved entries.
    ///
    /// Any two entries targeting the same final path fail with
    /// `DuplicatePath`, as does a leaf whose path collides with a group or
    /// descends through another leaf.
    pub fn build(entries: Vec<ResolvedSecret>) -> Result<SecretNode> {
        let mut root = SecretNode::empty();
        for entry in entries {
            root.insert(&entry.path, entry.value)?;
        }
        Ok(root)
    }

    fn insert(&mut self, path: &ResolvedPath, value: SecretValue) -> Result<()> {
        let segments = path.segments();
        debug_assert!(!segments.is_empty());
        let mut current = self;
        for segment in &segments[..segments.len() - 1] {
            let entry = current
                .children
                .entry(segment.clone())
                .or_insert_with(|| SecretEntry::Node(SecretNode::empty()));
            match entry {
                SecretEntry::Node(node) => current = node,
                // descending through an existing leaf
                SecretEntry::Leaf(_) => return Err(Error::duplicate_path(path.to_string())),
            }
        }
        let leaf = &segments[segments.len() - 1];
        if current.children.contains_key(leaf) {
            return Err(Error::duplicate_path(path.to_string()));
        }
        current.children.insert(leaf.clone(), SecretEntry::Leaf(value));
        Ok(())
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate direct children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretEntry)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a direct child by segment.
    pub fn child(&self, segment: &str) -> Result<&SecretEntry> {
        self.children
            .get(segment)
            .ok_or_else(|| Error::path_not_found(segment))
    }

    /// Look up a direct child that must be a nested node.
    pub fn node(&self, segment: &str) -> Result<&SecretNode> {
        match self.child(segment)? {
            SecretEntry::Node(node) => Ok(node),
            SecretEntry::Leaf(_) => Err(Error::path_not_found(segment)),
        }
    }

    /// Look up a direct child that must be a leaf.
    pub fn value(&self, segment: &str) -> Result<&SecretValue> {
        match self.child(segment)? {
            SecretEntry::Node(_) => Err(Error::path_not_found(segment)),
            SecretEntry::Leaf(value) => Ok(value),
        }
    }

    /// Navigate a dotted path to any entry.
    pub fn at(&self, dotted: &str) -> Result<&SecretEntry> {
        let mut current = self;
        let segments: Vec<&str> = dotted.split('.').collect();
        for (i, segment) in segments.iter().enumerate() {
            let entry = current
                .children
                .get(*segment)
                .ok_or_else(|| Error::path_not_found(dotted))?;
            if i == segments.len() - 1 {
                return Ok(entry);
            }
            match entry {
                SecretEntry::Node(node) => current = node,
                SecretEntry::Leaf(_) => return Err(Error::path_not_found(dotted)),
            }
        }
        Err(Error::path_not_found(dotted))
    }

    /// Navigate a dotted path to a leaf.
    pub fn value_at(&self, dotted: &str) -> Result<&SecretValue> {
        match self.at(dotted)? {
            SecretEntry::Node(_) => Err(Error::path_not_found(dotted)),
            SecretEntry::Leaf(value) => Ok(value),
        }
    }

    /// Export as a nested JSON value.
    ///
    /// `reveal = false` substitutes the mask token at every leaf;
    /// `reveal = true` substitutes the typed real value (strings as JSON
    /// strings, ints as JSON numbers).
    pub fn to_value(&self, reveal: bool) -> Result<serde_json::Value> {
        self.export(reveal, &mut Vec::new())
    }

    fn export(&self, reveal: bool, prefix: &mut Vec<String>) -> Result<serde_json::Value> {
        let mut map = serde_json::Map::with_capacity(self.children.len());
        for (key, entry) in &self.children {
            prefix.push(key.clone());
            let value = match entry {
                SecretEntry::Node(node) => node.export(reveal, prefix)?,
                SecretEntry::Leaf(leaf) => {
                    if reveal {
                        match leaf.typed(&prefix.join("."))? {
                            noctivault_core::TypedValue::Str(s) => serde_json::Value::String(s),
                            noctivault_core::TypedValue::Int(i) => serde_json::Value::from(i),
                        }
                    } else {
                        serde_json::Value::String(
                            noctivault_core::constants::MASK_TOKEN.to_string(),
                        )
                    }
                }
            };
            prefix.pop();
            map.insert(key.clone(), value);
        }
        Ok(serde_json::Value::Object(map))
    }

    fn masked(&self) -> serde_json::Value {
        // reveal = false cannot fail
        self.export(false, &mut Vec::new())
            .unwrap_or_else(|_| serde_json::Value::Null)
    }
}

impl fmt::Display for SecretNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretNode({})", self.masked())
    }
}

impl fmt::Debug for SecretNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noctivault_core::SecretType;

    fn entry(dotted: &str, raw: &str, ty: SecretType) -> ResolvedSecret {
        ResolvedSecret {
            path: ResolvedPath::parse(dotted),
            value: SecretValue::new(raw, ty),
        }
    }

    #[test]
    fn test_build_and_navigate() {
        let tree = SecretNode::build(vec![
            entry("password", "pw", SecretType::Str),
            entry("database.port", "5432", SecretType::Int),
        ])
        .unwrap();

        assert_eq!(tree.value("password").unwrap().get(), "pw");
        assert_eq!(tree.node("database").unwrap().value("port").unwrap().get(), "5432");
        assert_eq!(tree.value_at("database.port").unwrap().get(), "5432");
    }

    #[test]
    fn test_absent_segment_is_path_not_found() {
        let tree = SecretNode::build(vec![entry("password", "pw", SecretType::Str)]).unwrap();
        assert!(matches!(
            tree.value("nope").unwrap_err(),
            Error::PathNotFound { .. }
        ));
        assert!(matches!(
            tree.value_at("password.deeper").unwrap_err(),
            Error::PathNotFound { .. }
        ));
    }

    #[test]
    fn test_duplicate_leaf_fails_either_order() {
        let forward = SecretNode::build(vec![
            entry("database.password", "a", SecretType::Str),
            entry("database.password", "b", SecretType::Str),
        ]);
        assert!(matches!(
            forward.unwrap_err(),
            Error::DuplicatePath { .. }
        ));

        let reversed = SecretNode::build(vec![
            entry("database.password", "b", SecretType::Str),
            entry("database.password", "a", SecretType::Str),
        ]);
        assert!(matches!(
            reversed.unwrap_err(),
            Error::DuplicatePath { .. }
        ));
    }

    #[test]
    fn test_leaf_group_shape_collision_fails() {
        // leaf where a group already exists
        let err = SecretNode::build(vec![
            entry("database.password", "a", SecretType::Str),
            entry("database", "b", SecretType::Str),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicatePath { .. }));

        // group descending through an existing leaf
        let err = SecretNode::build(vec![
            entry("database", "b", SecretType::Str),
            entry("database.password", "a", SecretType::Str),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicatePath { .. }));
    }

    #[test]
    fn test_node_display_is_masked() {
        let tree = SecretNode::build(vec![
            entry("password", "pw", SecretType::Str),
            entry("database.port", "5432", SecretType::Int),
        ])
        .unwrap();
        let rendered = tree.to_string();
        assert!(rendered.contains("***"));
        assert!(!rendered.contains("pw"));
        assert!(!rendered.contains("5432"));
        let debugged = format!("{tree:?}");
        assert!(!debugged.contains("5432"));
    }

    #[test]
    fn test_to_value_masked_and_revealed() {
        let tree = SecretNode::build(vec![
            entry("password", "pw", SecretType::Str),
            entry("database.port", "5432", SecretType::Int),
        ])
        .unwrap();

        let masked = tree.to_value(false).unwrap();
        assert_eq!(masked["password"], "***");
        assert_eq!(masked["database"]["port"], "***");

        let revealed = tree.to_value(true).unwrap();
        assert_eq!(revealed["password"], "pw");
        assert_eq!(revealed["database"]["port"], 5432);
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let tree = SecretNode::build(vec![
            entry("zeta", "1", SecretType::Str),
            entry("alpha", "2", SecretType::Str),
        ])
        .unwrap();
        let keys: Vec<&str> = tree.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
