//! Argon2id key derivation for passphrase mode.

use crate::envelope::{KdfParams, KEY_SIZE};
use argon2::{Algorithm, Argon2, Params, Version};
use noctivault_core::{Error, Result};
use zeroize::Zeroizing;

/// Derive a 256-bit key from a passphrase and salt.
///
/// Parameters come from the envelope header on decode, so out-of-range
/// values are a header problem, not a crypto one.
pub fn derive_key(
    passphrase: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    let params = Params::new(
        params.memory_cost,
        u32::from(params.time_cost),
        u32::from(params.parallelism),
        Some(KEY_SIZE),
    )
    .map_err(|e| Error::invalid_enc_header(format!("invalid KDF parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, key.as_mut())
        .map_err(|e| Error::invalid_enc_header(format!("key derivation failed: {e}")))?;
    Ok(key)
}
