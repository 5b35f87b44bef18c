//! Identifier canonicalization.
//!
//! # Responsibility
//! - Own the per-category canonical identifier strategies.
//! - Map free-form operator tokens to canonical identifiers.
//!
//! # Invariants
//! - Each category has exactly one canonical pattern and formatter.
//! - Normalizing an already canonical identifier returns it unchanged.

mod normalize;
mod scheme;

pub use normalize::{
    normalize, CanonicalIdentifier, NormalizationError, Normalizer, NormalizerConfig,
};
pub use scheme::{canonical_category, format_identifier, is_canonical_for, IdentifierStyle};
