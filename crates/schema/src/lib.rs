//! Document models and schema validation for noctivault
//!
//! This crate turns raw document text into validated, normalized typed
//! structures. Validation is strict and happens exactly once per load:
//! after it, every mock entry and every reference leaf carries a concrete
//! platform and project, so downstream layers never re-derive inheritance.

pub mod document;
pub mod validator;

pub use document::{
    Document, MockEntry, MockStoreDocument, RefEntry, ReferenceDocument, SecretGroup, SecretRef,
};
pub use validator::{validate_document, validate_mock_store, validate_references};
