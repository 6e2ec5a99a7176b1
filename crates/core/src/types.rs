//! Domain vocabulary shared by every layer.
//!
//! These types are deliberately small: they carry the invariants the rest of
//! the system depends on (version integers are >= 1, paths are ordered
//! segment lists) without pulling in any I/O or provider concerns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Secret manager platform a reference or mock belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Google,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Google => write!(f, "google"),
        }
    }
}

/// Declared type of a secret value. Defaults to `Str`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretType {
    #[default]
    Str,
    Int,
}

impl SecretType {
    /// Static name used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SecretType::Str => "str",
            SecretType::Int => "int",
        }
    }
}

/// Version selector for a secret reference.
///
/// Either an exact positive integer version or `latest`, which selects the
/// highest integer version available at resolution time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    #[default]
    Latest,
    Exact(u32),
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Latest => write!(f, "latest"),
            VersionSpec::Exact(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for VersionSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VersionSpec::Latest => serializer.serialize_str("latest"),
            VersionSpec::Exact(v) => serializer.serialize_u32(*v),
        }
    }
}

impl<'de> Deserialize<'de> for VersionSpec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = VersionSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a positive integer version or the string \"latest\"")
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<VersionSpec, E> {
                if value == "latest" {
                    Ok(VersionSpec::Latest)
                } else {
                    Err(E::custom(format!("unknown version spec '{value}'")))
                }
            }

            fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<VersionSpec, E> {
                if value == 0 {
                    return Err(E::custom("version must be >= 1"));
                }
                u32::try_from(value)
                    .map(VersionSpec::Exact)
                    .map_err(|_| E::custom("version out of range"))
            }

            fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<VersionSpec, E> {
                if value < 1 {
                    return Err(E::custom("version must be >= 1"));
                }
                self.visit_u64(value as u64)
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// Ordered sequence of identifier segments naming a resolved secret.
///
/// Paths are globally unique within one load; `Display` renders the dotted
/// form used in lookups and error messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath(Vec<String>);

impl ResolvedPath {
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        ResolvedPath(segments)
    }

    /// Parse a dotted path string into segments.
    #[must_use]
    pub fn parse(dotted: &str) -> Self {
        ResolvedPath(dotted.split('.').map(str::to_string).collect())
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A secret value after casting to its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Str(String),
    Int(i64),
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Str(s) => write!(f, "{s}"),
            TypedValue::Int(i) => write!(f, "{i}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_spec_deserializes_integer_and_latest() {
        let v: VersionSpec = serde_yaml::from_str("3").unwrap();
        assert_eq!(v, VersionSpec::Exact(3));
        let v: VersionSpec = serde_yaml::from_str("latest").unwrap();
        assert_eq!(v, VersionSpec::Latest);
    }

    #[test]
    fn test_version_spec_rejects_zero_and_unknown_sentinel() {
        assert!(serde_yaml::from_str::<VersionSpec>("0").is_err());
        assert!(serde_yaml::from_str::<VersionSpec>("-2").is_err());
        assert!(serde_yaml::from_str::<VersionSpec>("newest").is_err());
    }

    #[test]
    fn test_resolved_path_display_is_dotted() {
        let path = ResolvedPath::new(vec!["database".into(), "password".into()]);
        assert_eq!(path.to_string(), "database.password");
        assert_eq!(ResolvedPath::parse("a.b.c").segments().len(), 3);
    }

    #[test]
    fn test_platform_round_trips_lowercase() {
        let p: Platform = serde_yaml::from_str("google").unwrap();
        assert_eq!(p, Platform::Google);
        assert_eq!(p.to_string(), "google");
    }
}
