use crate::types::{Platform, VersionSpec};
use std::path::PathBuf;

/// Result type alias for noctivault operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for noctivault operations
///
/// Every variant carries enough context (platform, project, reference name,
/// version, or resolved path) for diagnosis. No variant ever embeds a raw
/// secret value in its message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Document schema violations: missing required fields, bad versions,
    /// invalid types, malformed identifiers
    #[error("schema validation error: {message}")]
    SchemaValidation { message: String },

    /// A single document contains both reference entries and mock entries
    #[error("document must not combine secret-refs and secret-mocks")]
    CombinedConfigNotAllowed,

    /// No mock entry matches the requested key/version
    #[error("no local mock for {platform}/{project}/{name} (version {version})")]
    MissingLocalMock {
        platform: Platform,
        project: String,
        name: String,
        version: VersionSpec,
    },

    /// A raw value could not be cast to the declared type
    #[error("value at '{path}' cannot be cast to {declared_type}")]
    TypeCast {
        path: String,
        declared_type: &'static str,
    },

    /// Two resolved entries target the same tree path
    #[error("duplicate resolved path '{path}'")]
    DuplicatePath { path: String },

    /// Tree navigation or dotted lookup named a path that does not exist
    #[error("no secret at path '{path}'")]
    PathNotFound { path: String },

    /// Structurally invalid encrypted envelope
    #[error("invalid envelope header: {message}")]
    InvalidEncHeader { message: String },

    /// AEAD verification failed; covers both wrong key and tampered
    /// ciphertext so the failure carries no oracle information
    #[error("decryption failed")]
    Decrypt,

    /// No key material could be resolved before decrypting
    #[error("no key material available: {message}")]
    MissingKeyMaterial { message: String },

    /// The remote secret manager has no such secret/version
    #[error("remote secret {project}/{name} (version {version}) not found")]
    MissingRemoteSecret {
        project: String,
        name: String,
        version: VersionSpec,
    },

    /// Remote permission or authentication failure
    #[error("remote authorization failed: {message}")]
    Authorization { message: String },

    /// The remote request was malformed or unsupported
    #[error("remote argument error: {message}")]
    RemoteArgument { message: String },

    /// Transient remote unavailability, surfaced after retries are exhausted
    #[error("remote unavailable: {message}")]
    RemoteUnavailable { message: String },

    /// The remote payload was not valid UTF-8
    #[error("remote payload for {project}/{name} is not valid UTF-8")]
    RemoteDecode { project: String, name: String },

    /// A value source produced an outcome outside its documented contract
    #[error("unknown source error: {message}")]
    UnknownSource { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

// Helper methods for creating errors with context
impl Error {
    /// Create a schema validation error
    #[must_use]
    pub fn schema_validation(message: impl Into<String>) -> Self {
        Error::SchemaValidation {
            message: message.into(),
        }
    }

    /// Create a missing-local-mock error
    #[must_use]
    pub fn missing_local_mock(
        platform: Platform,
        project: impl Into<String>,
        name: impl Into<String>,
        version: VersionSpec,
    ) -> Self {
        Error::MissingLocalMock {
            platform,
            project: project.into(),
            name: name.into(),
            version,
        }
    }

    /// Create a type-cast error for the value at `path`
    #[must_use]
    pub fn type_cast(path: impl Into<String>, declared_type: &'static str) -> Self {
        Error::TypeCast {
            path: path.into(),
            declared_type,
        }
    }

    /// Create a duplicate-path error
    #[must_use]
    pub fn duplicate_path(path: impl Into<String>) -> Self {
        Error::DuplicatePath { path: path.into() }
    }

    /// Create a path-not-found error
    #[must_use]
    pub fn path_not_found(path: impl Into<String>) -> Self {
        Error::PathNotFound { path: path.into() }
    }

    /// Create an invalid-envelope-header error
    #[must_use]
    pub fn invalid_enc_header(message: impl Into<String>) -> Self {
        Error::InvalidEncHeader {
            message: message.into(),
        }
    }

    /// Create a missing-key-material error
    #[must_use]
    pub fn missing_key_material(message: impl Into<String>) -> Self {
        Error::MissingKeyMaterial {
            message: message.into(),
        }
    }

    /// Create a missing-remote-secret error
    #[must_use]
    pub fn missing_remote_secret(
        project: impl Into<String>,
        name: impl Into<String>,
        version: VersionSpec,
    ) -> Self {
        Error::MissingRemoteSecret {
            project: project.into(),
            name: name.into(),
            version,
        }
    }

    /// Create a remote authorization error
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Error::Authorization {
            message: message.into(),
        }
    }

    /// Create a remote argument error
    #[must_use]
    pub fn remote_argument(message: impl Into<String>) -> Self {
        Error::RemoteArgument {
            message: message.into(),
        }
    }

    /// Create a remote unavailability error
    #[must_use]
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Error::RemoteUnavailable {
            message: message.into(),
        }
    }

    /// Create a remote payload decode error
    #[must_use]
    pub fn remote_decode(project: impl Into<String>, name: impl Into<String>) -> Self {
        Error::RemoteDecode {
            project: project.into(),
            name: name.into(),
        }
    }

    /// Create an unknown-source error
    #[must_use]
    pub fn unknown_source(message: impl Into<String>) -> Self {
        Error::UnknownSource {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}

// Conversion implementations
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a lazy message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            Error::Configuration {
                message: format!("{}: {}", message.into(), base_error),
            }
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let base_error = e.into();
            Error::Configuration {
                message: format!("{}: {}", f(), base_error),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = Error::missing_local_mock(Platform::Google, "proj", "db-password", VersionSpec::Latest);
        let msg = err.to_string();
        assert!(msg.contains("proj"));
        assert!(msg.contains("db-password"));
        assert!(msg.contains("latest"));
    }

    #[test]
    fn test_type_cast_error_never_contains_value() {
        // The constructor only accepts the resolved path and declared type,
        // so there is no channel for the raw value to reach the message.
        let err = Error::type_cast("database.port", "int");
        assert_eq!(
            err.to_string(),
            "value at 'database.port' cannot be cast to int"
        );
    }

    #[test]
    fn test_decrypt_error_is_constant() {
        assert_eq!(Error::Decrypt.to_string(), "decryption failed");
    }
}
