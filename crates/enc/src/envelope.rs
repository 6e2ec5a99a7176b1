//! Envelope encode/decode.

use crate::kdf;
use crate::keys::KeyMaterial;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng, Payload},
    Aes256Gcm, Key, Nonce,
};
use noctivault_core::{Error, Result};
use rand::RngCore;

/// Envelope magic; also the AEAD associated data.
pub const MAGIC: &[u8; 5] = b"NVLE1";

/// Size of the symmetric key in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Size of the KDF salt generated in passphrase mode.
pub const SALT_SIZE: usize = 16;

const MODE_KEY_FILE: u8 = 0x00;
const MODE_PASSPHRASE: u8 = 0x01;
const KDF_ID_ARGON2ID: u8 = 0x01;

/// Argon2id cost parameters carried in the passphrase-mode header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub time_cost: u8,
    pub parallelism: u8,
    /// Memory cost in KiB.
    pub memory_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        KdfParams {
            time_cost: 2,
            parallelism: 1,
            memory_cost: 65536,
        }
    }
}

/// Envelope mode, readable without any key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeMode {
    KeyFile,
    Passphrase,
}

/// Peek at an envelope's mode byte. Used to decide which key-material
/// resolution chain applies before touching any secrets.
pub fn envelope_mode(data: &[u8]) -> Result<EnvelopeMode> {
    let rest = strip_magic(data)?;
    let (&mode, _) = rest
        .split_first()
        .ok_or_else(|| Error::invalid_enc_header("truncated envelope"))?;
    match mode {
        MODE_KEY_FILE => Ok(EnvelopeMode::KeyFile),
        MODE_PASSPHRASE => Ok(EnvelopeMode::Passphrase),
        _ => Err(Error::invalid_enc_header(format!(
            "unknown mode 0x{mode:02x}"
        ))),
    }
}

/// Seal plaintext with whichever key material is at hand.
pub fn seal(plaintext: &[u8], material: &KeyMaterial) -> Result<Vec<u8>> {
    match material {
        KeyMaterial::Key(key) => seal_with_key(plaintext, key),
        KeyMaterial::Passphrase(passphrase) => seal_with_passphrase(plaintext, passphrase),
    }
}

/// Unseal an envelope with whichever key material is at hand.
///
/// The envelope's mode byte must match the material kind; a mismatch is a
/// header error, not a decrypt failure.
pub fn unseal(data: &[u8], material: &KeyMaterial) -> Result<Vec<u8>> {
    match material {
        KeyMaterial::Key(key) => unseal_with_key(data, key),
        KeyMaterial::Passphrase(passphrase) => unseal_with_passphrase(data, passphrase),
    }
}

/// Seal plaintext in key-file mode with a fresh random nonce.
pub fn seal_with_key(plaintext: &[u8], key: &[u8; KEY_SIZE]) -> Result<Vec<u8>> {
    let nonce = generate_nonce();
    let ciphertext = encrypt(key, &nonce, plaintext)?;

    let mut out = Vec::with_capacity(MAGIC.len() + 1 + NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(MAGIC);
    out.push(MODE_KEY_FILE);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Seal plaintext in passphrase mode: fresh salt, Argon2id-derived key,
/// fresh nonce.
pub fn seal_with_passphrase(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let params = KdfParams::default();
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    let key = kdf::derive_key(passphrase, &salt, &params)?;

    let nonce = generate_nonce();
    let ciphertext = encrypt(&key, &nonce, plaintext)?;

    let mut out = Vec::with_capacity(
        MAGIC.len() + 9 + SALT_SIZE + NONCE_SIZE + ciphertext.len(),
    );
    out.extend_from_slice(MAGIC);
    out.push(MODE_PASSPHRASE);
    out.push(KDF_ID_ARGON2ID);
    out.push(params.time_cost);
    out.push(params.parallelism);
    out.extend_from_slice(&params.memory_cost.to_be_bytes());
    out.push(salt.len() as u8);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Unseal a key-file mode envelope.
pub fn unseal_with_key(data: &[u8], key: &[u8; KEY_SIZE]) -> Result<Vec<u8>> {
    let rest = strip_magic(data)?;
    let (&mode, rest) = rest
        .split_first()
        .ok_or_else(|| Error::invalid_enc_header("truncated envelope"))?;
    match mode {
        MODE_KEY_FILE => {}
        MODE_PASSPHRASE => {
            return Err(Error::invalid_enc_header("not a key-file mode envelope"))
        }
        _ => return Err(Error::invalid_enc_header(format!("unknown mode 0x{mode:02x}"))),
    }
    let (nonce, ciphertext) = split_body(rest)?;
    decrypt(key, nonce, ciphertext)
}

/// Unseal a passphrase-mode envelope, deriving the key from the header's
/// KDF parameters.
pub fn unseal_with_passphrase(data: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let rest = strip_magic(data)?;
    let (&mode, rest) = rest
        .split_first()
        .ok_or_else(|| Error::invalid_enc_header("truncated envelope"))?;
    match mode {
        MODE_PASSPHRASE => {}
        MODE_KEY_FILE => {
            return Err(Error::invalid_enc_header("not a passphrase mode envelope"))
        }
        _ => return Err(Error::invalid_enc_header(format!("unknown mode 0x{mode:02x}"))),
    }

    // KDF block: id(1) tc(1) par(1) mc(4) salt_len(1)
    if rest.len() < 8 {
        return Err(Error::invalid_enc_header("truncated KDF block"));
    }
    let kdf_id = rest[0];
    if kdf_id != KDF_ID_ARGON2ID {
        return Err(Error::invalid_enc_header(format!(
            "unsupported KDF id 0x{kdf_id:02x}"
        )));
    }
    let params = KdfParams {
        time_cost: rest[1],
        parallelism: rest[2],
        memory_cost: u32::from_be_bytes([rest[3], rest[4], rest[5], rest[6]]),
    };
    let salt_len = rest[7] as usize;
    let rest = &rest[8..];
    if rest.len() < salt_len {
        return Err(Error::invalid_enc_header("truncated salt"));
    }
    let (salt, rest) = rest.split_at(salt_len);

    let key = kdf::derive_key(passphrase, salt, &params)?;
    let (nonce, ciphertext) = split_body(rest)?;
    decrypt(&key, nonce, ciphertext)
}

fn strip_magic(data: &[u8]) -> Result<&[u8]> {
    data.strip_prefix(MAGIC.as_slice())
        .ok_or_else(|| Error::invalid_enc_header("missing or invalid magic"))
}

/// Split the trailing `nonce | ciphertext || tag` section, enforcing the
/// minimum structural size.
fn split_body(rest: &[u8]) -> Result<(&[u8], &[u8])> {
    if rest.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::invalid_enc_header("truncated envelope body"));
    }
    Ok(rest.split_at(NONCE_SIZE))
}

fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

fn encrypt(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad: MAGIC,
            },
        )
        .map_err(|_| Error::configuration("envelope encryption failed"))
}

/// AEAD open. Failure is a single uninformative error: wrong key and
/// tampered ciphertext are indistinguishable on purpose.
fn decrypt(key: &[u8; KEY_SIZE], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: MAGIC,
            },
        )
        .map_err(|_| Error::Decrypt)
}
