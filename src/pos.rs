//! Reference part-of-speech tagger.
//!
//! A three-tag, six-word HMM used by the demo front ends and as the golden
//! fixture for the decoder. Tags and words are closed enums implementing
//! [`Vocabulary`], so the model's label order is the declaration order of
//! [`PartOfSpeech`].
//!
//! ```
//! use hmm_viterbi::pos::{self, PartOfSpeech};
//!
//! let tagged = pos::tag_sentence("fast, run")?;
//! assert_eq!(tagged.path, vec![Some(PartOfSpeech::Adjective), Some(PartOfSpeech::Verb)]);
//! # Ok::<(), hmm_viterbi::Error>(())
//! ```

use crate::decoder::decode;
use crate::error::{InvalidInput, ModelError, Result};
use crate::lattice::DecodeResult;
use crate::model::{Model, ModelSpec};
use crate::traits::Vocabulary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hidden labels of the reference model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
}

impl Vocabulary for PartOfSpeech {
    const ALL: &'static [Self] = &[Self::Noun, Self::Verb, Self::Adjective];

    fn ordinal(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Noun => "Noun",
            Self::Verb => "Verb",
            Self::Adjective => "Adjective",
        }
    }
}

/// Observable words of the reference model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Word {
    Cat,
    Run,
    Fast,
    Dog,
    Jump,
    Big,
}

impl Vocabulary for Word {
    const ALL: &'static [Self] = &[
        Self::Cat,
        Self::Run,
        Self::Fast,
        Self::Dog,
        Self::Jump,
        Self::Big,
    ];

    fn ordinal(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Cat => "cat",
            Self::Run => "run",
            Self::Fast => "fast",
            Self::Dog => "dog",
            Self::Jump => "jump",
            Self::Big => "big",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Row-major by `PartOfSpeech::ALL`: `[from][to]`.
const TRANSITION: [[f64; 3]; 3] = [
    [0.3, 0.5, 0.2],
    [0.4, 0.2, 0.4],
    [0.5, 0.3, 0.2],
];

/// Row-major: `[tag][word]`, words in `Word::ALL` order.
const EMISSION: [[f64; 6]; 3] = [
    [0.4, 0.1, 0.1, 0.3, 0.05, 0.05],
    [0.05, 0.4, 0.1, 0.05, 0.35, 0.05],
    [0.05, 0.1, 0.35, 0.05, 0.1, 0.35],
];

const INITIAL: [f64; 3] = [0.4, 0.3, 0.3];

/// The reference tables as a [`ModelSpec`].
pub fn reference_spec() -> ModelSpec<PartOfSpeech, Word> {
    let mut spec = ModelSpec::from_vocabularies();
    for &from in PartOfSpeech::ALL {
        spec = spec.with_initial(from, INITIAL[from.ordinal()]);
        for &to in PartOfSpeech::ALL {
            spec = spec.with_transition(from, to, TRANSITION[from.ordinal()][to.ordinal()]);
        }
        for &word in Word::ALL {
            spec = spec.with_emission(from, word, EMISSION[from.ordinal()][word.ordinal()]);
        }
    }
    spec
}

/// The validated reference model.
pub fn reference_model() -> std::result::Result<Model<PartOfSpeech, Word>, ModelError> {
    Model::new(reference_spec())
}

/// Split a sentence on commas and whitespace and map each fragment to a
/// [`Word`]. Empty fragments are dropped.
///
/// # Errors
/// [`InvalidInput`] for the first fragment outside the vocabulary; `position`
/// counts non-empty fragments.
pub fn parse_sentence(sentence: &str) -> std::result::Result<Vec<Word>, InvalidInput> {
    sentence
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|fragment| !fragment.is_empty())
        .enumerate()
        .map(|(position, fragment)| {
            Word::from_name(fragment).ok_or_else(|| InvalidInput {
                position,
                symbol: format!("{fragment:?}"),
            })
        })
        .collect()
}

/// Parse, validate and decode a sentence with the reference model.
pub fn tag_sentence(sentence: &str) -> Result<DecodeResult<PartOfSpeech>> {
    let words = parse_sentence(sentence)?;
    let model = reference_model()?;
    Ok(decode(&model, &words))
}
