//! The masked leaf value.

use noctivault_core::{constants::MASK_TOKEN, Error, Result, SecretType, TypedValue};
use sha3::{Digest, Sha3_256};
use std::fmt;
use zeroize::Zeroizing;

/// An immutable secret leaf: the pre-cast raw string plus its declared type.
///
/// The raw content is set exactly once at construction and never mutated;
/// the backing buffer is zeroized on drop. Formatting always yields the
/// mask token.
pub struct SecretValue {
    raw: Zeroizing<String>,
    ty: SecretType,
}

impl SecretValue {
    #[must_use]
    pub fn new(raw: impl Into<String>, ty: SecretType) -> Self {
        SecretValue {
            raw: Zeroizing::new(raw.into()),
            ty,
        }
    }

    /// Declared type of this value.
    #[must_use]
    pub fn secret_type(&self) -> SecretType {
        self.ty
    }

    /// Explicit reveal: the raw pre-cast string.
    #[must_use]
    pub fn get(&self) -> &str {
        &self.raw
    }

    /// Explicit reveal: the value cast to its declared type.
    ///
    /// The `path` argument only feeds error context; it never appears in
    /// the success value.
    pub fn typed(&self, path: &str) -> Result<TypedValue> {
        match self.ty {
            SecretType::Str => Ok(TypedValue::Str(self.raw.to_string())),
            SecretType::Int => self
                .raw
                .parse::<i64>()
                .map(TypedValue::Int)
                .map_err(|_| Error::type_cast(path, self.ty.name())),
        }
    }

    /// Compare a candidate string against this value under the declared
    /// type: `int` compares the parsed integers, `str` compares exactly
    /// (no normalization or trimming). A candidate that cannot be cast
    /// fails with `TypeCast`.
    pub fn equals(&self, candidate: &str) -> Result<bool> {
        match self.ty {
            SecretType::Str => Ok(candidate == self.raw.as_str()),
            SecretType::Int => {
                let own = self
                    .raw
                    .parse::<i64>()
                    .map_err(|_| Error::type_cast("<value>", self.ty.name()))?;
                let other = candidate
                    .parse::<i64>()
                    .map_err(|_| Error::type_cast("<candidate>", self.ty.name()))?;
                Ok(own == other)
            }
        }
    }

    /// SHA3-256 of the UTF-8 raw string, lowercase hex.
    ///
    /// Hashing is over the pre-cast text, independent of the declared type:
    /// two refs with identical raw source hash identically even if cast
    /// differently.
    #[must_use]
    pub fn display_hash(&self) -> String {
        let digest = Sha3_256::digest(self.raw.as_bytes());
        hex::encode(digest)
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK_TOKEN)
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK_TOKEN)
    }
}
