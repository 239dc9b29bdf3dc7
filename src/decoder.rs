//! Viterbi decoding over a validated [`Model`].
//!
//! The decoder fills one lattice column per observation:
//! - column 0: `ln initial[s] + ln emission(s, o[0])`;
//! - column t: `max_p score(t-1, p) + ln transition[p][c] + ln emission(c, o[t])`,
//!   with the predecessor `p` chosen as the first strict maximum in label order.
//!
//! A missing or zero emission entry contributes `ln(emission_floor)` instead
//! of `-inf`, so an unseen (label, symbol) pair is rare rather than
//! impossible. Zero initial and transition probabilities stay impossible.
//!
//! All arithmetic is in natural-log space; there is no raw-probability path.

use crate::error::InvalidInput;
use crate::lattice::{DecodeResult, Lattice};
use crate::model::Model;
use crate::utils::ln_prob;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Probability substituted for a missing `emission[label][symbol]` entry.
pub const DEFAULT_EMISSION_FLOOR: f64 = 1e-5;

/// Decode `observations` against `model` with [`DEFAULT_EMISSION_FLOOR`].
///
/// Never fails: the empty sequence yields an empty result and unknown
/// symbols fall back to the floor.
pub fn decode<L, S>(model: &Model<L, S>, observations: &[S]) -> DecodeResult<L>
where
    L: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    let symbols = model.encode(observations);
    ForwardPass::new(model, ln_prob(DEFAULT_EMISSION_FLOOR)).run(&symbols)
}

/// A reusable decoder sharing one immutable model.
///
/// Cloning is cheap and clones share the model, so a decoder can be handed to
/// as many threads as needed; every call allocates its own lattice.
#[derive(Clone, Debug)]
pub struct ViterbiDecoder<L, S> {
    model: Arc<Model<L, S>>,
    emission_floor: f64,
    log_floor: f64,
}

impl<L, S> ViterbiDecoder<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    /// Decoder with [`DEFAULT_EMISSION_FLOOR`].
    pub fn new(model: Model<L, S>) -> Self {
        Self::shared(Arc::new(model))
    }

    /// Decoder over an already shared model, with [`DEFAULT_EMISSION_FLOOR`].
    pub fn shared(model: Arc<Model<L, S>>) -> Self {
        Self::with_floor(model, DEFAULT_EMISSION_FLOOR)
    }

    /// Callers are responsible for validating `emission_floor`; see
    /// [`DecoderBuilder`](crate::builder::DecoderBuilder).
    pub(crate) fn with_floor(model: Arc<Model<L, S>>, emission_floor: f64) -> Self {
        Self {
            model,
            emission_floor,
            log_floor: ln_prob(emission_floor),
        }
    }

    pub fn model(&self) -> &Model<L, S> {
        &self.model
    }

    /// The probability used for missing emission entries.
    pub fn emission_floor(&self) -> f64 {
        self.emission_floor
    }

    /// Decode one observation sequence.
    pub fn decode(&self, observations: &[S]) -> DecodeResult<L> {
        self.decode_encoded(&self.model.encode(observations))
    }

    /// Decode a sequence already mapped onto symbol ordinals with
    /// [`Model::encode`]; `None` entries are unknown symbols.
    pub fn decode_encoded(&self, symbols: &[Option<usize>]) -> DecodeResult<L> {
        ForwardPass::new(&self.model, self.log_floor).run(symbols)
    }

    /// Reject out-of-vocabulary observations, then decode.
    pub fn decode_checked(&self, observations: &[S]) -> Result<DecodeResult<L>, InvalidInput> {
        self.model.validate_observations(observations)?;
        Ok(self.decode(observations))
    }
}

#[cfg(feature = "parallel")]
impl<L, S> ViterbiDecoder<L, S>
where
    L: Clone + Eq + Hash + Debug + Send + Sync,
    S: Clone + Eq + Hash + Debug + Send + Sync,
{
    /// Decode independent sequences against the shared model, in parallel.
    ///
    /// Results are in input order and identical to per-sequence [`decode`](Self::decode).
    pub fn decode_batch(&self, sequences: &[Vec<S>]) -> Vec<DecodeResult<L>> {
        use rayon::prelude::*;

        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("viterbi_decode_batch", sequences = sequences.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        sequences.par_iter().map(|obs| self.decode(obs)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
impl<L, S> ViterbiDecoder<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    /// Decode independent sequences against the shared model.
    ///
    /// Results are in input order and identical to per-sequence [`decode`](Self::decode).
    pub fn decode_batch(&self, sequences: &[Vec<S>]) -> Vec<DecodeResult<L>> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("viterbi_decode_batch", sequences = sequences.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        sequences.iter().map(|obs| self.decode(obs)).collect()
    }
}

/// Working state of a single decode call.
struct ForwardPass<'m, L, S> {
    model: &'m Model<L, S>,
    log_floor: f64,
    fallbacks: usize,
}

impl<'m, L, S> ForwardPass<'m, L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    fn new(model: &'m Model<L, S>, log_floor: f64) -> Self {
        Self {
            model,
            log_floor,
            fallbacks: 0,
        }
    }

    fn run(mut self, symbols: &[Option<usize>]) -> DecodeResult<L> {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!(
            "viterbi_decode",
            steps = symbols.len(),
            labels = self.model.n_labels()
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut lattice = Lattice::with_capacity(symbols.len());
        if let Some((&first, rest)) = symbols.split_first() {
            let mut column = self.init_column(first);
            lattice.push(column.clone(), vec![None; column.len()]);
            for &symbol in rest {
                let (next, back) = self.forward_step(&column, symbol);
                lattice.push(next.clone(), back);
                column = next;
            }
        }

        let result = DecodeResult::assemble(lattice, self.model.labels(), self.fallbacks);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            fallbacks = result.emission_fallbacks,
            log_probability = ?result.log_probability,
            "viterbi decode finished"
        );

        result
    }

    /// `ln emission(label, symbol)`, substituting the floor for a missing or
    /// zero entry.
    #[inline]
    fn log_emission(&mut self, label: usize, symbol: Option<usize>) -> f64 {
        match self.model.log_emission(label, symbol) {
            Some(log_p) if log_p > f64::NEG_INFINITY => log_p,
            _ => {
                self.fallbacks += 1;
                self.log_floor
            }
        }
    }

    fn init_column(&mut self, symbol: Option<usize>) -> Vec<f64> {
        (0..self.model.n_labels())
            .map(|s| self.model.log_initial(s) + self.log_emission(s, symbol))
            .collect()
    }

    fn forward_step(
        &mut self,
        prev: &[f64],
        symbol: Option<usize>,
    ) -> (Vec<f64>, Vec<Option<usize>>) {
        let n = self.model.n_labels();
        let mut scores = vec![f64::NEG_INFINITY; n];
        let mut back = vec![None; n];
        for (s_to, (score, arg)) in scores.iter_mut().zip(back.iter_mut()).enumerate() {
            let emit = self.log_emission(s_to, symbol);
            for (s_from, &prev_score) in prev.iter().enumerate() {
                let cand = prev_score + self.model.log_transition(s_from, s_to) + emit;
                if cand > *score {
                    *score = cand;
                    *arg = Some(s_from);
                }
            }
        }
        (scores, back)
    }
}
