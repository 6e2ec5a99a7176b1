//! Masked secret values and the immutable resolved tree.
//!
//! The types here enforce the masking invariant: the `Display` and `Debug`
//! forms of a [`SecretValue`], and of any [`SecretNode`] containing one,
//! always render the fixed mask token. Raw content is reachable only
//! through the explicit reveal operations (`get`, `typed`,
//! `to_value(true)`). Masking never relies on formatting defaults - both
//! impls are written out by hand.

pub mod node;
pub mod value;

pub use node::{ResolvedSecret, SecretEntry, SecretNode};
pub use value::SecretValue;
