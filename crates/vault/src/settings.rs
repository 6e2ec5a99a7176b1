//! Immutable configuration values.
//!
//! Settings are plain values passed into each operation; there is no
//! process-wide mutable configuration. They derive `Deserialize` so a host
//! application can embed them in its own config file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Which value source a load resolves against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Local,
    Remote,
}

/// How the encrypted local store is unlocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncMode {
    #[default]
    KeyFile,
    Passphrase,
}

/// Key-material configuration for the encrypted local store.
///
/// Explicit values here sit at the top of the resolution precedence; the
/// environment and well-known file locations fill in behind them.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LocalEncSettings {
    #[serde(default)]
    pub mode: EncMode,
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    /// Never serialized back out.
    #[serde(default, skip_serializing)]
    pub passphrase: Option<String>,
}

// Hand-written so a logged settings value cannot leak the passphrase.
impl fmt::Debug for LocalEncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEncSettings")
            .field("mode", &self.mode)
            .field("key_file", &self.key_file)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Top-level client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoctivaultSettings {
    #[serde(default)]
    pub source: SourceKind,
    #[serde(default)]
    pub local_enc: LocalEncSettings,
    /// Overall budget for one `load`; elapsing aborts outstanding fetches.
    #[serde(skip)]
    pub load_timeout: Option<Duration>,
}

impl NoctivaultSettings {
    /// Settings for the local mock source with defaults everywhere else.
    #[must_use]
    pub fn local() -> Self {
        NoctivaultSettings::default()
    }

    /// Settings for the remote source.
    #[must_use]
    pub fn remote() -> Self {
        NoctivaultSettings {
            source: SourceKind::Remote,
            ..NoctivaultSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_masks_passphrase() {
        let settings = LocalEncSettings {
            mode: EncMode::Passphrase,
            key_file: None,
            passphrase: Some("hunter2".to_string()),
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_defaults() {
        let settings = NoctivaultSettings::default();
        assert_eq!(settings.source, SourceKind::Local);
        assert_eq!(settings.local_enc.mode, EncMode::KeyFile);
        assert!(settings.load_timeout.is_none());
    }
}
