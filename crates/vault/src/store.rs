//! Store location discovery and plaintext recovery.
//!
//! The envelope sits strictly in front of schema validation: this module
//! hands back document *text*, never parsed structures. When both the
//! envelope and the plaintext store exist at the same location, the
//! envelope wins.

use crate::settings::{EncMode, LocalEncSettings};
use noctivault_core::{
    constants::{LOCAL_STORE_ENC_FILENAME, LOCAL_STORE_FILENAME, REFERENCES_FILENAME},
    Error, Result,
};
use noctivault_enc::{resolve_key_file, resolve_passphrase, unseal, KeyMaterial};
use std::path::{Path, PathBuf};

/// Concrete file locations for one load.
#[derive(Debug)]
pub struct StoreLocation {
    dir: PathBuf,
}

impl StoreLocation {
    /// Resolve a base path to a store location.
    ///
    /// A directory is used as-is; a file path must carry one of the known
    /// store file names, and its parent becomes the location.
    pub fn resolve(base: &Path) -> Result<StoreLocation> {
        if base.is_dir() {
            return Ok(StoreLocation {
                dir: base.to_path_buf(),
            });
        }
        if base.is_file() {
            let known = matches!(
                base.file_name().and_then(|n| n.to_str()),
                Some(REFERENCES_FILENAME | LOCAL_STORE_FILENAME | LOCAL_STORE_ENC_FILENAME)
            );
            if !known {
                return Err(Error::configuration(format!(
                    "unsupported store file name '{}'",
                    base.display()
                )));
            }
            let dir = base
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            return Ok(StoreLocation { dir });
        }
        Err(Error::file_system(
            base,
            "resolve",
            std::io::Error::new(std::io::ErrorKind::NotFound, "store location not found"),
        ))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read the reference document text.
    pub fn read_references(&self) -> Result<String> {
        let path = self.dir.join(REFERENCES_FILENAME);
        std::fs::read_to_string(&path).map_err(|e| Error::file_system(&path, "read", e))
    }

    /// Read the mock store text, decrypting the envelope when present.
    ///
    /// Key material is resolved fully before any decrypt attempt; a
    /// missing key is `MissingKeyMaterial`, never `Decrypt`.
    pub fn read_mock_store(&self, enc: &LocalEncSettings) -> Result<String> {
        let enc_path = self.dir.join(LOCAL_STORE_ENC_FILENAME);
        if enc_path.is_file() {
            let data =
                std::fs::read(&enc_path).map_err(|e| Error::file_system(&enc_path, "read", e))?;
            let material = self.key_material(enc)?;
            let plaintext = unseal(&data, &material)?;
            return String::from_utf8(plaintext).map_err(|_| {
                Error::schema_validation("decrypted store is not valid UTF-8")
            });
        }

        let plain_path = self.dir.join(LOCAL_STORE_FILENAME);
        if plain_path.is_file() {
            return std::fs::read_to_string(&plain_path)
                .map_err(|e| Error::file_system(&plain_path, "read", e));
        }

        Err(Error::file_system(
            &plain_path,
            "read",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no local store found"),
        ))
    }

    fn key_material(&self, enc: &LocalEncSettings) -> Result<KeyMaterial> {
        match enc.mode {
            EncMode::KeyFile => {
                let key = resolve_key_file(enc.key_file.as_deref(), Some(&self.dir))?;
                Ok(KeyMaterial::Key(key))
            }
            // the library never prompts; passphrases come from settings or
            // the environment
            EncMode::Passphrase => {
                let passphrase = resolve_passphrase(enc.passphrase.as_deref(), None)?;
                Ok(KeyMaterial::Passphrase(passphrase))
            }
        }
    }
}
