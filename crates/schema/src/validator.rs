//! Schema validation and normalization.
//!
//! Parsing is delegated to `serde_yaml`; everything after the parse is
//! enforced here: required top-level fields, the exactly-one-of rule for
//! entry kinds, identifier charsets, positive versions, scalar mock value
//! coercion, and eager platform/project inheritance.

use crate::document::{
    Document, MockEntry, MockStoreDocument, RefEntry, ReferenceDocument, SecretGroup, SecretRef,
};
use noctivault_core::{Error, Platform, Result, SecretType, VersionSpec};
use serde::Deserialize;

/// Raw top-level shape as parsed, before any rules are applied.
#[derive(Debug, Deserialize)]
struct RawDocument {
    platform: Option<Platform>,
    #[serde(alias = "gcp_project_id")]
    project_id: Option<String>,
    #[serde(rename = "secret-mocks")]
    secret_mocks: Option<Vec<RawMockEntry>>,
    #[serde(rename = "secret-refs")]
    secret_refs: Option<Vec<RawRefEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawMockEntry {
    platform: Option<Platform>,
    #[serde(alias = "gcp_project_id")]
    project_id: Option<String>,
    name: String,
    value: serde_yaml::Value,
    version: serde_yaml::Value,
}

/// Group and leaf forms are distinguished structurally: a group has
/// `key` + `children`, a leaf has `cast` + `ref`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRefEntry {
    Group {
        key: String,
        children: Vec<RawRefEntry>,
    },
    Leaf {
        platform: Option<Platform>,
        #[serde(alias = "gcp_project_id")]
        project_id: Option<String>,
        cast: String,
        #[serde(rename = "ref")]
        ref_name: String,
        #[serde(default)]
        version: VersionSpec,
        #[serde(rename = "type")]
        ty: Option<SecretType>,
    },
}

/// Validate a raw document into exactly one of the two entry kinds.
///
/// Fails with `SchemaValidation` on parse errors, missing required fields,
/// bad versions, or malformed identifiers, and with
/// `CombinedConfigNotAllowed` when both entry kinds are present.
pub fn validate_document(text: &str) -> Result<Document> {
    let raw: RawDocument =
        serde_yaml::from_str(text).map_err(|e| Error::schema_validation(e.to_string()))?;

    let platform = raw
        .platform
        .ok_or_else(|| Error::schema_validation("missing required field 'platform'"))?;
    let project_id = raw
        .project_id
        .ok_or_else(|| Error::schema_validation("missing required field 'project_id'"))?;

    match (raw.secret_mocks, raw.secret_refs) {
        (Some(_), Some(_)) => Err(Error::CombinedConfigNotAllowed),
        (Some(mocks), None) => {
            let mocks = mocks
                .into_iter()
                .map(|m| validate_mock_entry(m, platform, &project_id))
                .collect::<Result<Vec<_>>>()?;
            Ok(Document::MockStore(MockStoreDocument {
                platform,
                project_id,
                mocks,
            }))
        }
        (None, Some(refs)) => {
            let refs = refs
                .into_iter()
                .map(|r| validate_ref_entry(r, platform, &project_id))
                .collect::<Result<Vec<_>>>()?;
            Ok(Document::References(ReferenceDocument {
                platform,
                project_id,
                refs,
            }))
        }
        (None, None) => Err(Error::schema_validation(
            "document must contain secret-mocks or secret-refs",
        )),
    }
}

/// Validate a document that must be a mock store.
pub fn validate_mock_store(text: &str) -> Result<MockStoreDocument> {
    match validate_document(text)? {
        Document::MockStore(doc) => Ok(doc),
        Document::References(_) => Err(Error::schema_validation(
            "expected a mock store document, found secret-refs",
        )),
    }
}

/// Validate a document that must hold references.
pub fn validate_references(text: &str) -> Result<ReferenceDocument> {
    match validate_document(text)? {
        Document::References(doc) => Ok(doc),
        Document::MockStore(_) => Err(Error::schema_validation(
            "expected a reference document, found secret-mocks",
        )),
    }
}

fn validate_mock_entry(
    raw: RawMockEntry,
    platform: Platform,
    project_id: &str,
) -> Result<MockEntry> {
    let version = mock_version(&raw.version, &raw.name)?;
    let value = scalar_to_string(&raw.value, &raw.name)?;
    Ok(MockEntry {
        platform: raw.platform.unwrap_or(platform),
        project_id: raw.project_id.unwrap_or_else(|| project_id.to_string()),
        name: raw.name,
        value,
        version,
    })
}

fn validate_ref_entry(raw: RawRefEntry, platform: Platform, project_id: &str) -> Result<RefEntry> {
    match raw {
        RawRefEntry::Group { key, children } => {
            check_identifier(&key)?;
            let children = children
                .into_iter()
                .map(|c| validate_ref_entry(c, platform, project_id))
                .collect::<Result<Vec<_>>>()?;
            Ok(RefEntry::Group(SecretGroup { key, children }))
        }
        RawRefEntry::Leaf {
            platform: leaf_platform,
            project_id: leaf_project,
            cast,
            ref_name,
            version,
            ty,
        } => {
            check_identifier(&cast)?;
            Ok(RefEntry::Leaf(SecretRef {
                platform: leaf_platform.unwrap_or(platform),
                project_id: leaf_project.unwrap_or_else(|| project_id.to_string()),
                cast,
                ref_name,
                version,
                ty: ty.unwrap_or_default(),
            }))
        }
    }
}

/// Mock versions must be positive integers; anything else (floats, strings,
/// `latest`) is a schema error.
fn mock_version(value: &serde_yaml::Value, name: &str) -> Result<u32> {
    let n = value.as_u64().ok_or_else(|| {
        Error::schema_validation(format!("mock '{name}': version must be an integer"))
    })?;
    if n == 0 {
        return Err(Error::schema_validation(format!(
            "mock '{name}': version must be >= 1"
        )));
    }
    u32::try_from(n)
        .map_err(|_| Error::schema_validation(format!("mock '{name}': version out of range")))
}

/// Mock values accept any YAML scalar and are stored as strings.
fn scalar_to_string(value: &serde_yaml::Value, name: &str) -> Result<String> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::schema_validation(format!(
            "mock '{name}': value must be a scalar"
        ))),
    }
}

/// Identifiers (group keys and leaf cast names) become tree path segments
/// and must match `[A-Za-z_][A-Za-z0-9_]*`.
fn check_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::schema_validation(format!(
            "invalid identifier '{name}'"
        )))
    }
}
