//! Key material resolution and key-file generation.
//!
//! Resolution precedence, key-file mode: explicit setting, then the
//! `NOCTIVAULT_LOCAL_KEY_FILE` environment variable, then a `local.key`
//! sitting next to the envelope, then the fixed default config path.
//! Passphrase mode: explicit setting, then `NOCTIVAULT_LOCAL_PASSPHRASE`,
//! then an injected prompt. Nothing resolving fails with
//! `MissingKeyMaterial` before any decrypt attempt.

use crate::envelope::KEY_SIZE;
use aes_gcm::aead::OsRng;
use noctivault_core::{
    constants::{
        DEFAULT_KEY_DIR, DEFAULT_KEY_FILENAME, KEY_FILE_ENV_VAR, PASSPHRASE_ENV_VAR,
        SIBLING_KEY_FILENAME,
    },
    Error, Result,
};
use rand::RngCore;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Resolved key material for one seal/unseal operation.
pub enum KeyMaterial {
    Key(Zeroizing<[u8; KEY_SIZE]>),
    Passphrase(Zeroizing<String>),
}

/// Collaborator that can ask the user for a passphrase. Implemented by the
/// CLI; the library itself never prompts.
pub trait PassphrasePrompt {
    fn read_passphrase(&self) -> Result<String>;
}

/// Fixed default key location: `<config dir>/noctivault/local.key`.
#[must_use]
pub fn default_key_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(DEFAULT_KEY_DIR).join(DEFAULT_KEY_FILENAME))
}

/// Generate a fresh 32-byte key file.
///
/// Writes to `out` when given, otherwise to the default path, creating
/// parent directories. On unix the file is restricted to owner read/write.
pub fn generate_key_file(out: Option<&Path>) -> Result<PathBuf> {
    let path = match out {
        Some(path) => path.to_path_buf(),
        None => default_key_path()
            .ok_or_else(|| Error::configuration("no config directory available"))?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::file_system(parent, "create_dir_all", e))?;
    }

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    OsRng.fill_bytes(key.as_mut());
    std::fs::write(&path, key.as_slice()).map_err(|e| Error::file_system(&path, "write", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .map_err(|e| Error::file_system(&path, "set_permissions", e))?;
    }

    tracing::debug!(path = %path.display(), "generated key file");
    Ok(path)
}

/// Resolve a key-file mode key following the precedence chain.
///
/// `envelope_dir` is the directory holding the envelope, used for the
/// sibling `local.key` step; pass `None` when there is no meaningful
/// sibling location.
pub fn resolve_key_file(
    explicit: Option<&Path>,
    envelope_dir: Option<&Path>,
) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    if let Some(path) = explicit {
        return read_key_file(path);
    }
    if let Ok(path) = std::env::var(KEY_FILE_ENV_VAR) {
        return read_key_file(Path::new(&path));
    }
    if let Some(dir) = envelope_dir {
        let sibling = dir.join(SIBLING_KEY_FILENAME);
        if sibling.is_file() {
            return read_key_file(&sibling);
        }
    }
    if let Some(path) = default_key_path() {
        if path.is_file() {
            return read_key_file(&path);
        }
    }
    Err(Error::missing_key_material(format!(
        "no key file configured; set one explicitly, export {KEY_FILE_ENV_VAR}, or run key gen"
    )))
}

/// Resolve a passphrase following the precedence chain.
pub fn resolve_passphrase(
    explicit: Option<&str>,
    prompt: Option<&dyn PassphrasePrompt>,
) -> Result<Zeroizing<String>> {
    if let Some(passphrase) = explicit {
        return Ok(Zeroizing::new(passphrase.to_string()));
    }
    if let Ok(passphrase) = std::env::var(PASSPHRASE_ENV_VAR) {
        return Ok(Zeroizing::new(passphrase));
    }
    if let Some(prompt) = prompt {
        return prompt.read_passphrase().map(Zeroizing::new);
    }
    Err(Error::missing_key_material(format!(
        "no passphrase configured; set one explicitly or export {PASSPHRASE_ENV_VAR}"
    )))
}

fn read_key_file(path: &Path) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    let bytes = std::fs::read(path).map_err(|e| Error::file_system(path, "read", e))?;
    let bytes = Zeroizing::new(bytes);
    if bytes.len() != KEY_SIZE {
        return Err(Error::configuration(format!(
            "key file '{}' must be exactly {KEY_SIZE} bytes, found {}",
            path.display(),
            bytes.len()
        )));
    }
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    key.copy_from_slice(&bytes);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write_key(dir: &Path, name: &str, fill: u8) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, [fill; KEY_SIZE]).unwrap();
        path
    }

    #[test]
    #[serial]
    fn test_explicit_path_wins() {
        let tmp = TempDir::new().unwrap();
        let explicit = write_key(tmp.path(), "explicit.key", 1);
        write_key(tmp.path(), SIBLING_KEY_FILENAME, 2);
        std::env::remove_var(KEY_FILE_ENV_VAR);

        let key = resolve_key_file(Some(&explicit), Some(tmp.path())).unwrap();
        assert_eq!(key.as_slice(), &[1u8; KEY_SIZE]);
    }

    #[test]
    #[serial]
    fn test_env_var_beats_sibling() {
        let tmp = TempDir::new().unwrap();
        let env_key = write_key(tmp.path(), "env.key", 3);
        write_key(tmp.path(), SIBLING_KEY_FILENAME, 2);
        std::env::set_var(KEY_FILE_ENV_VAR, &env_key);

        let key = resolve_key_file(None, Some(tmp.path())).unwrap();
        std::env::remove_var(KEY_FILE_ENV_VAR);
        assert_eq!(key.as_slice(), &[3u8; KEY_SIZE]);
    }

    #[test]
    #[serial]
    fn test_sibling_key_is_found() {
        let tmp = TempDir::new().unwrap();
        write_key(tmp.path(), SIBLING_KEY_FILENAME, 2);
        std::env::remove_var(KEY_FILE_ENV_VAR);

        let key = resolve_key_file(None, Some(tmp.path())).unwrap();
        assert_eq!(key.as_slice(), &[2u8; KEY_SIZE]);
    }

    #[test]
    #[serial]
    fn test_nothing_resolving_is_missing_key_material() {
        let tmp = TempDir::new().unwrap();
        std::env::remove_var(KEY_FILE_ENV_VAR);
        // point the config dir somewhere empty so the default path misses
        std::env::set_var("XDG_CONFIG_HOME", tmp.path());

        let err = resolve_key_file(None, Some(tmp.path())).unwrap_err();
        std::env::remove_var("XDG_CONFIG_HOME");
        assert!(matches!(err, Error::MissingKeyMaterial { .. }));
    }

    #[test]
    fn test_wrong_length_key_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let short = tmp.path().join("short.key");
        std::fs::write(&short, [0u8; 16]).unwrap();
        let err = resolve_key_file(Some(&short), None).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    #[serial]
    fn test_passphrase_precedence() {
        std::env::set_var(PASSPHRASE_ENV_VAR, "from-env");
        let explicit = resolve_passphrase(Some("explicit"), None).unwrap();
        assert_eq!(explicit.as_str(), "explicit");

        let from_env = resolve_passphrase(None, None).unwrap();
        assert_eq!(from_env.as_str(), "from-env");
        std::env::remove_var(PASSPHRASE_ENV_VAR);

        struct FixedPrompt;
        impl PassphrasePrompt for FixedPrompt {
            fn read_passphrase(&self) -> Result<String> {
                Ok("prompted".to_string())
            }
        }
        let prompted = resolve_passphrase(None, Some(&FixedPrompt)).unwrap();
        assert_eq!(prompted.as_str(), "prompted");

        let err = resolve_passphrase(None, None).unwrap_err();
        assert!(matches!(err, Error::MissingKeyMaterial { .. }));
    }

    #[test]
    fn test_generate_key_file_writes_32_bytes() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("nested").join("fresh.key");
        let path = generate_key_file(Some(&out)).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), KEY_SIZE);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
