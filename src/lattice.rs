//! Score/backpointer lattice and the decode result assembled from it.
//!
//! Each column `t` of the lattice holds, for every label `s`, the best
//! cumulative log-probability of a path ending in `s` at `t` and the label at
//! `t - 1` that achieves it.

use crate::utils::first_argmax;
use serde::Serialize;

/// Per-step scores and backpointers for one decode call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Lattice {
    /// `scores[t][s]`: best log-probability of a path ending in `s` at `t`.
    pub scores: Vec<Vec<f64>>,
    /// `backpointers[t][s]`: predecessor label at `t - 1`; always `None` at
    /// `t = 0`, and `None` wherever no predecessor yields a finite score.
    pub backpointers: Vec<Vec<Option<usize>>>,
}

impl Lattice {
    pub(crate) fn with_capacity(steps: usize) -> Self {
        Self {
            scores: Vec::with_capacity(steps),
            backpointers: Vec::with_capacity(steps),
        }
    }

    pub(crate) fn push(&mut self, scores: Vec<f64>, backpointers: Vec<Option<usize>>) {
        debug_assert_eq!(scores.len(), backpointers.len());
        self.scores.push(scores);
        self.backpointers.push(backpointers);
    }

    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// `scores[t][label]`, if in range.
    pub fn score(&self, t: usize, label: usize) -> Option<f64> {
        self.scores.get(t)?.get(label).copied()
    }

    /// `backpointers[t][label]`, flattened; `None` if out of range or unset.
    pub fn backpointer(&self, t: usize, label: usize) -> Option<usize> {
        *self.backpointers.get(t)?.get(label)?
    }

    /// Best label in the last column and its score.
    ///
    /// Ties go to the lowest label ordinal. `None` when the lattice is empty
    /// or every final score is `-inf`.
    pub fn best_final(&self) -> Option<(usize, f64)> {
        first_argmax(self.scores.last()?.iter().copied())
    }

    /// Follow backpointers from `last` at the final step back to `t = 0`.
    ///
    /// Once a link resolves to `None`, that position and every earlier one
    /// are left undetermined; earlier cells are not consulted on their own.
    pub fn backtrack(&self, last: Option<usize>) -> Vec<Option<usize>> {
        let steps = self.len();
        let mut path = vec![None; steps];
        if steps == 0 {
            return path;
        }
        path[steps - 1] = last;
        for t in (0..steps - 1).rev() {
            path[t] = path[t + 1].and_then(|next| self.backpointer(t + 1, next));
        }
        path
    }
}

/// Outcome of decoding one observation sequence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodeResult<L> {
    /// Most probable label per position; `None` marks an undetermined position.
    pub path: Vec<Option<L>>,
    /// The same path as label ordinals.
    pub path_indices: Vec<Option<usize>>,
    /// Log-probability of the best path, `None` if no path is possible.
    pub log_probability: Option<f64>,
    /// Number of lattice cells whose emission term used the floor.
    pub emission_fallbacks: usize,
    /// Full score/backpointer lattice.
    pub lattice: Lattice,
}

impl<L: Clone> DecodeResult<L> {
    /// Backtrack through `lattice` and resolve ordinals against `labels`.
    pub(crate) fn assemble(lattice: Lattice, labels: &[L], emission_fallbacks: usize) -> Self {
        let best = lattice.best_final();
        let path_indices = lattice.backtrack(best.map(|(s, _)| s));
        let path = path_indices
            .iter()
            .map(|idx| idx.map(|s| labels[s].clone()))
            .collect();
        Self {
            path,
            path_indices,
            log_probability: best.map(|(_, score)| score),
            emission_fallbacks,
            lattice,
        }
    }
}

impl<L> DecodeResult<L> {
    /// Number of decoded positions.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// True if every position resolved to a label.
    pub fn is_fully_determined(&self) -> bool {
        self.path.iter().all(Option::is_some)
    }

    /// Per-step scores, `scores()[t][s]`.
    pub fn scores(&self) -> &[Vec<f64>] {
        &self.lattice.scores
    }

    /// Per-step predecessor ordinals, `backpointers()[t][s]`.
    pub fn backpointers(&self) -> &[Vec<Option<usize>>] {
        &self.lattice.backpointers
    }

    /// Consume the result, keeping only the path.
    pub fn into_path(self) -> Vec<Option<L>> {
        self.path
    }
}
