//! Seal, unseal, and verify operations for the local store.

use clap::{Args, Subcommand};
use noctivault_core::{
    constants::{LOCAL_STORE_ENC_FILENAME, LOCAL_STORE_FILENAME},
    Error, Result,
};
use noctivault_enc::{
    envelope_mode, resolve_key_file, resolve_passphrase, seal, unseal, EnvelopeMode, KeyMaterial,
    PassphrasePrompt,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Key-material flags shared by the local subcommands.
#[derive(Args, Default)]
pub struct KeyArgs {
    /// Path to a 32-byte key file
    #[arg(long, value_name = "PATH", conflicts_with_all = ["passphrase", "prompt"])]
    pub key_file: Option<PathBuf>,

    /// Passphrase given directly (prefer --prompt or the environment)
    #[arg(long, value_name = "PASSPHRASE", conflicts_with = "prompt")]
    pub passphrase: Option<String>,

    /// Ask for a passphrase interactively
    #[arg(long)]
    pub prompt: bool,
}

#[derive(Subcommand)]
pub enum LocalCommands {
    /// Seal a plaintext store into an encrypted envelope
    Seal {
        /// Store directory or the plaintext store file itself
        path: PathBuf,

        #[command(flatten)]
        keys: KeyArgs,

        /// Output path; defaults to the envelope name next to the source
        #[arg(long)]
        out: Option<PathBuf>,

        /// Remove the plaintext source after sealing
        #[arg(long)]
        rm_plain: bool,

        /// Overwrite an existing output file
        #[arg(long)]
        force: bool,
    },

    /// Decrypt an envelope and print the plaintext to stdout
    Unseal {
        enc_path: PathBuf,

        #[command(flatten)]
        keys: KeyArgs,
    },

    /// Check that an envelope decrypts; prints OK or FAIL, never plaintext
    Verify {
        enc_path: PathBuf,

        #[command(flatten)]
        keys: KeyArgs,
    },
}

impl LocalCommands {
    pub fn execute(self) -> eyre::Result<i32> {
        match self {
            LocalCommands::Seal {
                path,
                keys,
                out,
                rm_plain,
                force,
            } => {
                let out_path = seal_store(&path, &keys, out.as_deref(), rm_plain, force)?;
                println!("{}", out_path.display());
                Ok(0)
            }
            LocalCommands::Unseal { enc_path, keys } => {
                let plaintext = unseal_store(&enc_path, &keys)?;
                std::io::stdout().write_all(&plaintext)?;
                Ok(0)
            }
            LocalCommands::Verify { enc_path, keys } => {
                if verify_store(&enc_path, &keys)? {
                    println!("OK");
                    Ok(0)
                } else {
                    println!("FAIL");
                    Ok(1)
                }
            }
        }
    }
}

struct TerminalPrompt;

impl PassphrasePrompt for TerminalPrompt {
    fn read_passphrase(&self) -> Result<String> {
        rpassword::prompt_password("Passphrase: ")
            .map_err(|e| Error::missing_key_material(format!("passphrase prompt failed: {e}")))
    }
}

/// Seal the plaintext store at `path` (a directory or the store file).
///
/// Sealing always takes explicit key material; the lookup chains used for
/// unsealing do not apply.
pub fn seal_store(
    path: &Path,
    keys: &KeyArgs,
    out: Option<&Path>,
    rm_plain: bool,
    force: bool,
) -> Result<PathBuf> {
    let plain_path = resolve_plain_path(path)?;
    let directory = plain_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let out_path = match out {
        Some(path) => path.to_path_buf(),
        None => directory.join(LOCAL_STORE_ENC_FILENAME),
    };
    if out_path.exists() && !force {
        return Err(Error::configuration(format!(
            "output '{}' already exists; pass --force to overwrite",
            out_path.display()
        )));
    }

    let material = seal_material(keys)?;
    let plaintext = Zeroizing::new(
        std::fs::read(&plain_path).map_err(|e| Error::file_system(&plain_path, "read", e))?,
    );
    let envelope = seal(&plaintext, &material)?;
    std::fs::write(&out_path, envelope).map_err(|e| Error::file_system(&out_path, "write", e))?;
    tracing::debug!(
        source = %plain_path.display(),
        out = %out_path.display(),
        "sealed local store"
    );

    if rm_plain {
        match std::fs::remove_file(&plain_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::file_system(&plain_path, "remove", e)),
        }
    }
    Ok(out_path)
}

/// Decrypt an envelope to its plaintext bytes.
pub fn unseal_store(enc_path: &Path, keys: &KeyArgs) -> Result<Vec<u8>> {
    let data = std::fs::read(enc_path).map_err(|e| Error::file_system(enc_path, "read", e))?;
    let material = unseal_material(&data, enc_path, keys)?;
    unseal(&data, &material)
}

/// Check whether an envelope decrypts with the resolved key material.
///
/// Header and tag failures mean "no"; anything else (unreadable file,
/// missing key material) stays an error.
pub fn verify_store(enc_path: &Path, keys: &KeyArgs) -> Result<bool> {
    match unseal_store(enc_path, keys) {
        Ok(_) => Ok(true),
        Err(Error::InvalidEncHeader { .. } | Error::Decrypt) => Ok(false),
        Err(e) => Err(e),
    }
}

fn seal_material(keys: &KeyArgs) -> Result<KeyMaterial> {
    if let Some(passphrase) = &keys.passphrase {
        return Ok(KeyMaterial::Passphrase(Zeroizing::new(passphrase.clone())));
    }
    if keys.prompt {
        let passphrase = TerminalPrompt.read_passphrase()?;
        return Ok(KeyMaterial::Passphrase(Zeroizing::new(passphrase)));
    }
    if let Some(key_file) = &keys.key_file {
        return Ok(KeyMaterial::Key(resolve_key_file(Some(key_file), None)?));
    }
    Err(Error::missing_key_material(
        "one of --key-file, --passphrase, or --prompt is required",
    ))
}

/// Explicit flags win; otherwise the envelope's mode byte picks the
/// resolution chain.
fn unseal_material(data: &[u8], enc_path: &Path, keys: &KeyArgs) -> Result<KeyMaterial> {
    if let Some(passphrase) = &keys.passphrase {
        return Ok(KeyMaterial::Passphrase(Zeroizing::new(passphrase.clone())));
    }
    if let Some(key_file) = &keys.key_file {
        return Ok(KeyMaterial::Key(resolve_key_file(Some(key_file), None)?));
    }
    match envelope_mode(data)? {
        EnvelopeMode::Passphrase => {
            let prompt: Option<&dyn PassphrasePrompt> =
                if keys.prompt { Some(&TerminalPrompt) } else { None };
            Ok(KeyMaterial::Passphrase(resolve_passphrase(None, prompt)?))
        }
        EnvelopeMode::KeyFile => Ok(KeyMaterial::Key(resolve_key_file(
            None,
            enc_path.parent(),
        )?)),
    }
}

fn resolve_plain_path(base: &Path) -> Result<PathBuf> {
    if base.is_dir() {
        let candidate = base.join(LOCAL_STORE_FILENAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(Error::file_system(
            &candidate,
            "read",
            std::io::Error::new(std::io::ErrorKind::NotFound, "plaintext store not found"),
        ));
    }
    if base.is_file() {
        if base.file_name().and_then(|n| n.to_str()) != Some(LOCAL_STORE_FILENAME) {
            return Err(Error::configuration(format!(
                "unsupported store file name '{}'",
                base.display()
            )));
        }
        return Ok(base.to_path_buf());
    }
    Err(Error::file_system(
        base,
        "read",
        std::io::Error::new(std::io::ErrorKind::NotFound, "store location not found"),
    ))
}
