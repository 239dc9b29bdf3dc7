//! Viterbi decoding for small discrete Hidden Markov Models.
//!
//! Given a fixed model (labels, symbols, initial/transition/emission
//! probabilities) and an observed symbol sequence, the decoder finds the most
//! probable hidden label sequence and returns it together with the full
//! score/backpointer lattice.
//!
//! ## Core idea
//! 1. Describe the model as a [`ModelSpec`] (in code, or as a JSON object).
//! 2. Validate it into an immutable [`Model`]; malformed tables are rejected
//!    with a [`ModelError`] and nothing else can fail later.
//! 3. Call [`decode`] (or build a [`ViterbiDecoder`] to share the model and
//!    configure the emission floor) to obtain a [`DecodeResult`].
//!
//! Decoding runs in natural-log space in O(T·L²) time and O(T·L) memory.
//! Ties are broken deterministically by label declaration order, and a
//! missing or zero emission entry is treated as a small floor probability
//! ([`DEFAULT_EMISSION_FLOOR`]) rather than as impossible.
//!
//! ## Quick start
//! ```
//! use hmm_viterbi::{decode, Model, ModelSpec};
//!
//! let spec = ModelSpec::new(vec!["A", "B"], vec!["x", "y"])
//!     .with_initial("A", 0.6)
//!     .with_initial("B", 0.4)
//!     .with_transition("A", "A", 0.7)
//!     .with_transition("A", "B", 0.3)
//!     .with_transition("B", "A", 0.4)
//!     .with_transition("B", "B", 0.6)
//!     .with_emission("A", "x", 0.9)
//!     .with_emission("B", "x", 0.2)
//!     .with_emission("B", "y", 0.8);
//! let model = Model::new(spec)?;
//!
//! let result = decode(&model, &["x", "y", "y"]);
//! assert_eq!(result.path, vec![Some("A"), Some("B"), Some("B")]);
//! assert_eq!(result.lattice.len(), 3);
//! # Ok::<(), hmm_viterbi::ModelError>(())
//! ```
//!
//! ## Cargo features
//! - `parallel`: [`ViterbiDecoder::decode_batch`] fans out over rayon.
//! - `tracing`: decode calls emit `tracing` spans and events.
//! - `heavy`: enables long-running stress tests.

pub mod builder;
pub mod decoder;
pub mod error;
pub mod lattice;
pub mod model;
pub mod pos;
pub mod traits;
pub mod utils;

pub use crate::builder::DecoderBuilder;
pub use crate::decoder::{decode, ViterbiDecoder, DEFAULT_EMISSION_FLOOR};
pub use crate::error::{Error, InvalidInput, ModelError, Result};
pub use crate::lattice::{DecodeResult, Lattice};
pub use crate::model::{Model, ModelSpec};
pub use crate::traits::Vocabulary;
