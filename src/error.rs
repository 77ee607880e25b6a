//! Error types for rule construction and dictionary wiring.
//!
//! Note that "no match" is never an error in this crate: every matching stage
//! signals that it did not apply by returning `None`. `FoldError` covers only
//! malformed input (bad steno notation), invalid rule definitions, and a
//! dictionary that is queried before it has been given any rules.

use thiserror::Error;

/// Errors raised while building rules or querying a misconfigured dictionary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FoldError {
    /// A chord was written with keys out of steno order or with unknown keys.
    #[error("invalid steno chord {notation:?}")]
    InvalidChord { notation: String },

    /// An outline contained a chord that could not be parsed.
    #[error("invalid outline {notation:?}: chord {index} is malformed")]
    InvalidOutline { notation: String, index: usize },

    /// A case claims the same keys as both contained and toggled.
    #[error("fold case keys overlap: contained {contained} and toggled {toggled} share keys")]
    OverlappingCase { contained: String, toggled: String },

    /// The folding dictionary was queried before any rule set was loaded.
    #[error("folding dictionary queried before a rule set was loaded; call `FoldingDictionary::load` first")]
    NotLoaded,
}

/// Result type for rule construction and dictionary operations.
pub type FoldResult<T> = Result<T, FoldError>;
