//! Hidden Markov Model tables and their validated, immutable form.
//!
//! A model is described by a [`ModelSpec`]: the label and symbol universes
//! plus the `initial`, `transition` and `emission` tables, keyed by label and
//! symbol values. This is also the shape of the JSON configuration object:
//!
//! ```json
//! {
//!   "labels": ["A", "B"],
//!   "symbols": ["x", "y"],
//!   "initial": {"A": 0.6, "B": 0.4},
//!   "transition": {"A": {"A": 0.7, "B": 0.3}, "B": {"A": 0.4, "B": 0.6}},
//!   "emission": {"A": {"x": 0.9}, "B": {"x": 0.2, "y": 0.8}}
//! }
//! ```
//!
//! [`Model::new`] validates a `ModelSpec` and interns every label and symbol into a
//! dense ordinal, storing the tables pre-logged in ordinal-indexed vectors so
//! the decoder's inner loop never hashes.

use crate::error::{InvalidInput, ModelError};
use crate::traits::Vocabulary;
use crate::utils::{is_valid_probability, ln_prob};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::io::Read;

/// Raw probability tables, as supplied by the caller or a configuration file.
///
/// Emission rows may be partial (or absent); a missing entry is decoded with
/// the emission floor. `initial` and `transition` must be complete.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelSpec<L: Eq + Hash, S: Eq + Hash> {
    /// Hidden labels, in tie-break order.
    pub labels: Vec<L>,
    /// Recognized observation vocabulary.
    pub symbols: Vec<S>,
    /// `initial[label]`
    pub initial: HashMap<L, f64>,
    /// `transition[from][to]`
    pub transition: HashMap<L, HashMap<L, f64>>,
    /// `emission[label][symbol]`
    #[serde(default = "HashMap::new")]
    pub emission: HashMap<L, HashMap<S, f64>>,
}

impl<L: Eq + Hash, S: Eq + Hash> ModelSpec<L, S> {
    /// A spec with the given universes and empty tables.
    pub fn new(labels: Vec<L>, symbols: Vec<S>) -> Self {
        Self {
            labels,
            symbols,
            initial: HashMap::new(),
            transition: HashMap::new(),
            emission: HashMap::new(),
        }
    }

    pub fn with_initial(mut self, label: L, p: f64) -> Self {
        self.initial.insert(label, p);
        self
    }

    pub fn with_transition(mut self, from: L, to: L, p: f64) -> Self {
        self.transition.entry(from).or_default().insert(to, p);
        self
    }

    pub fn with_emission(mut self, label: L, symbol: S, p: f64) -> Self {
        self.emission.entry(label).or_default().insert(symbol, p);
        self
    }
}

impl<L: Vocabulary, S: Vocabulary> ModelSpec<L, S> {
    /// A spec whose universes are the full, declaration-ordered vocabularies.
    pub fn from_vocabularies() -> Self {
        Self::new(L::ALL.to_vec(), S::ALL.to_vec())
    }
}

impl<L, S> ModelSpec<L, S>
where
    L: DeserializeOwned + Eq + Hash,
    S: DeserializeOwned + Eq + Hash,
{
    /// Parse a JSON configuration object.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a JSON configuration object from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// A validated, immutable discrete HMM.
///
/// Labels and symbols are addressed by ordinal: label `i` is `labels()[i]`.
/// The symbol ordinal space covers the recognized vocabulary first and then
/// any symbol that only appears as an emission key.
#[derive(Clone, Debug)]
pub struct Model<L, S> {
    labels: Vec<L>,
    label_index: HashMap<L, usize>,
    symbols: Vec<S>,
    n_recognized: usize,
    symbol_index: HashMap<S, usize>,
    /// ln initial[s]
    log_initial: Vec<f64>,
    /// ln transition[from][to]
    log_transition: Vec<Vec<f64>>,
    /// ln emission[s][symbol]; `None` where the table has no entry.
    log_emission: Vec<Vec<Option<f64>>>,
}

fn key<T: Debug>(value: &T) -> String {
    format!("{value:?}")
}

/// Smallest debug rendering among `keys` that `known` rejects, so the report
/// does not depend on hash order.
fn first_unknown<'a, K: Debug + 'a>(
    keys: impl IntoIterator<Item = &'a K>,
    known: impl Fn(&K) -> bool,
) -> Option<String> {
    keys.into_iter().filter(|k| !known(*k)).map(key).min()
}

fn checked_ln(
    table: &'static str,
    at: impl FnOnce() -> String,
    p: f64,
) -> Result<f64, ModelError> {
    if is_valid_probability(p) {
        Ok(ln_prob(p))
    } else {
        Err(ModelError::InvalidProbability {
            table,
            at: at(),
            value: p,
        })
    }
}

impl<L, S> Model<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    /// Validate `spec` and build the model.
    ///
    /// # Errors
    /// Returns a [`ModelError`] if either universe is empty or has duplicates,
    /// a table names an unknown label, `initial` or `transition` is
    /// incomplete, or any present probability is negative or non-finite.
    /// Gaps in `emission` are accepted.
    pub fn new(spec: ModelSpec<L, S>) -> Result<Self, ModelError> {
        let ModelSpec {
            labels,
            symbols,
            initial,
            transition,
            emission,
        } = spec;

        if labels.is_empty() {
            return Err(ModelError::EmptyLabels);
        }
        if symbols.is_empty() {
            return Err(ModelError::EmptySymbols);
        }

        let mut label_index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if label_index.insert(label.clone(), i).is_some() {
                return Err(ModelError::DuplicateLabel(key(label)));
            }
        }
        let mut symbol_index = HashMap::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            if symbol_index.insert(symbol.clone(), i).is_some() {
                return Err(ModelError::DuplicateSymbol(key(symbol)));
            }
        }

        let is_label = |l: &L| label_index.contains_key(l);
        let transition_keys = transition
            .keys()
            .chain(transition.values().flat_map(|row| row.keys()));
        for (table, label) in [
            ("initial", first_unknown(initial.keys(), is_label)),
            ("transition", first_unknown(transition_keys, is_label)),
            ("emission", first_unknown(emission.keys(), is_label)),
        ] {
            if let Some(label) = label {
                return Err(ModelError::UnknownLabel { table, label });
            }
        }

        let mut log_initial = Vec::with_capacity(labels.len());
        for label in &labels {
            let p = *initial
                .get(label)
                .ok_or_else(|| ModelError::MissingInitial(key(label)))?;
            log_initial.push(checked_ln("initial", || key(label), p)?);
        }

        let mut log_transition = Vec::with_capacity(labels.len());
        for from in &labels {
            let row = transition.get(from);
            let mut log_row = Vec::with_capacity(labels.len());
            for to in &labels {
                let p = *row.and_then(|r| r.get(to)).ok_or_else(|| {
                    ModelError::MissingTransition {
                        from: key(from),
                        to: key(to),
                    }
                })?;
                log_row.push(checked_ln(
                    "transition",
                    || format!("{} -> {}", key(from), key(to)),
                    p,
                )?);
            }
            log_transition.push(log_row);
        }

        // Emission keys outside the recognized vocabulary still get an
        // ordinal so they can be looked up when observed. They follow the
        // recognized symbols, ordered by debug rendering.
        let n_recognized = symbols.len();
        let mut extra: Vec<&S> = emission
            .values()
            .flat_map(|row| row.keys())
            .filter(|s| !symbol_index.contains_key(*s))
            .collect();
        extra.sort_by_cached_key(|s| key(*s));
        extra.dedup();
        let mut symbols = symbols;
        for symbol in extra {
            symbol_index.insert(symbol.clone(), symbols.len());
            symbols.push(symbol.clone());
        }

        let mut log_emission = Vec::with_capacity(labels.len());
        for label in &labels {
            let row = emission.get(label);
            let mut log_row = Vec::with_capacity(symbols.len());
            for symbol in &symbols {
                let entry = row
                    .and_then(|r| r.get(symbol))
                    .map(|&p| {
                        checked_ln(
                            "emission",
                            || format!("{} / {}", key(label), key(symbol)),
                            p,
                        )
                    })
                    .transpose()?;
                log_row.push(entry);
            }
            log_emission.push(log_row);
        }

        Ok(Self {
            labels,
            label_index,
            symbols,
            n_recognized,
            symbol_index,
            log_initial,
            log_transition,
            log_emission,
        })
    }

    /// Hidden labels in declaration (tie-break) order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Number of hidden labels.
    pub fn n_labels(&self) -> usize {
        self.labels.len()
    }

    /// The recognized observation vocabulary.
    pub fn symbols(&self) -> &[S] {
        &self.symbols[..self.n_recognized]
    }

    /// Ordinal of `label`, if it belongs to the model.
    pub fn label_index(&self, label: &L) -> Option<usize> {
        self.label_index.get(label).copied()
    }

    /// Ordinal of `symbol` in the model's symbol space, if it has one.
    ///
    /// Symbols that only appear as emission keys have an ordinal even though
    /// they are not [recognized](Self::is_recognized).
    pub fn symbol_id(&self, symbol: &S) -> Option<usize> {
        self.symbol_index.get(symbol).copied()
    }

    /// True if `symbol` is part of the recognized vocabulary.
    pub fn is_recognized(&self, symbol: &S) -> bool {
        self.symbol_id(symbol).is_some_and(|id| id < self.n_recognized)
    }

    /// `ln initial[label]`.
    ///
    /// # Panics
    /// Panics if `label >= n_labels()`.
    pub fn log_initial(&self, label: usize) -> f64 {
        self.log_initial[label]
    }

    /// `ln transition[from][to]`.
    ///
    /// # Panics
    /// Panics if either ordinal is out of range.
    pub fn log_transition(&self, from: usize, to: usize) -> f64 {
        self.log_transition[from][to]
    }

    /// `ln emission[label][symbol]`, or `None` if the table has no entry
    /// (including when the symbol has no ordinal at all).
    pub fn log_emission(&self, label: usize, symbol: Option<usize>) -> Option<f64> {
        symbol.and_then(|id| self.log_emission[label][id])
    }

    /// Map observations onto symbol ordinals; unknown symbols become `None`.
    pub fn encode(&self, observations: &[S]) -> Vec<Option<usize>> {
        observations.iter().map(|o| self.symbol_id(o)).collect()
    }

    /// Reject the first observation outside the recognized vocabulary.
    ///
    /// Decoding tolerates unknown symbols; this is the boundary check a
    /// caller performs when out-of-vocabulary input should be refused.
    pub fn validate_observations(&self, observations: &[S]) -> Result<(), InvalidInput> {
        match observations.iter().position(|o| !self.is_recognized(o)) {
            Some(position) => Err(InvalidInput {
                position,
                symbol: key(&observations[position]),
            }),
            None => Ok(()),
        }
    }
}

impl<L, S> Model<L, S>
where
    L: Clone + Eq + Hash + Debug + DeserializeOwned,
    S: Clone + Eq + Hash + Debug + DeserializeOwned,
{
    /// Parse and validate a JSON configuration object.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Self::new(ModelSpec::from_json(json)?)
    }
}
