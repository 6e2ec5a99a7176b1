//! NVLE1 authenticated-encryption envelope.
//!
//! This crate owns everything about protecting the local mock store at
//! rest: the binary envelope format, the Argon2id key derivation used in
//! passphrase mode, and the key-material resolution chain. It is a pure
//! codec - it never parses the plaintext it protects and sits strictly in
//! front of schema validation in the local-file path.
//!
//! ## Format
//!
//! Big-endian multi-byte fields:
//!
//! ```text
//! MAGIC "NVLE1" (5B) | MODE (1B: 0x00 key-file, 0x01 passphrase)
//!   [ KDF_ID (1B) | time_cost (1B) | parallelism (1B)
//!     | memory_cost (4B) | salt_len (1B) | salt ]   # passphrase mode only
//! | nonce (12B) | ciphertext || tag (16B)
//! ```
//!
//! The cipher is AES-256-GCM with the magic bytes as associated data. The
//! nonce (and salt, in passphrase mode) is drawn fresh from the OS RNG on
//! every seal and never reused for a given key.

pub mod envelope;
pub mod kdf;
pub mod keys;

pub use envelope::{
    envelope_mode, seal, seal_with_key, seal_with_passphrase, unseal, unseal_with_key,
    unseal_with_passphrase, EnvelopeMode, KdfParams, KEY_SIZE, MAGIC, NONCE_SIZE,
};
pub use keys::{
    default_key_path, generate_key_file, resolve_key_file, resolve_passphrase, KeyMaterial,
    PassphrasePrompt,
};
