//! Error types for model construction and input validation.
//!
//! Decoding itself never fails: a validated [`Model`](crate::model::Model)
//! accepts every observation sequence, including the empty one. Errors only
//! arise when a model is built ([`ModelError`]) or when a caller chooses to
//! check a sequence against the recognized vocabulary ([`InvalidInput`]).

use thiserror::Error;

/// A malformed model or decoder configuration.
///
/// Raised synchronously by [`Model::new`](crate::model::Model::new) and
/// [`DecoderBuilder::build`](crate::builder::DecoderBuilder::build); there is
/// no partially constructed model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The label set is empty.
    #[error("label set must not be empty")]
    EmptyLabels,

    /// The symbol set is empty.
    #[error("symbol set must not be empty")]
    EmptySymbols,

    /// A label appears more than once in the label set.
    #[error("duplicate label {0}")]
    DuplicateLabel(String),

    /// A symbol appears more than once in the symbol set.
    #[error("duplicate symbol {0}")]
    DuplicateSymbol(String),

    /// A probability table is keyed by a label that is not in the label set.
    #[error("{table} table refers to unknown label {label}")]
    UnknownLabel { table: &'static str, label: String },

    /// `initial` has no entry for a label.
    #[error("missing initial probability for label {0}")]
    MissingInitial(String),

    /// `transition` has no entry for an ordered label pair.
    #[error("missing transition probability {from} -> {to}")]
    MissingTransition { from: String, to: String },

    /// A probability is NaN, infinite or negative.
    #[error("{table} probability {value} at {at} must be finite and non-negative")]
    InvalidProbability {
        table: &'static str,
        at: String,
        value: f64,
    },

    /// The emission floor is not a finite value in `(0, 1]`.
    #[error("emission floor {0} must be finite and in (0, 1]")]
    InvalidEmissionFloor(f64),

    /// The JSON configuration object could not be parsed.
    #[error("model configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// An observation outside the model's recognized vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown symbol {symbol} at position {position}")]
pub struct InvalidInput {
    /// Zero-based index of the offending observation.
    pub position: usize,
    /// Debug rendering of the offending observation.
    pub symbol: String,
}

/// Unified error type for the crate's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    /// Reading a model configuration failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used by the boundary helpers and the CLI.
pub type Result<T> = std::result::Result<T, Error>;
