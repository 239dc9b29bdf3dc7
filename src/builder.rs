use crate::decoder::{ViterbiDecoder, DEFAULT_EMISSION_FLOOR};
use crate::error::ModelError;
use crate::model::Model;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Configures a [`ViterbiDecoder`].
///
/// ```
/// use hmm_viterbi::{pos, DecoderBuilder};
///
/// let decoder = DecoderBuilder::new(pos::reference_model()?)
///     .with_emission_floor(1e-3)
///     .build()?;
/// assert_eq!(decoder.emission_floor(), 1e-3);
/// # Ok::<(), hmm_viterbi::ModelError>(())
/// ```
pub struct DecoderBuilder<L, S> {
    model: Arc<Model<L, S>>,
    emission_floor: Option<f64>,
}

impl<L, S> DecoderBuilder<L, S>
where
    L: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    pub fn new(model: Model<L, S>) -> Self {
        Self::shared(Arc::new(model))
    }

    pub fn shared(model: Arc<Model<L, S>>) -> Self {
        Self {
            model,
            emission_floor: None,
        }
    }

    /// Probability substituted for missing emission entries.
    pub fn with_emission_floor(mut self, emission_floor: f64) -> Self {
        self.emission_floor = Some(emission_floor);
        self
    }

    /// # Errors
    /// [`ModelError::InvalidEmissionFloor`] unless the floor is finite and in `(0, 1]`.
    pub fn build(self) -> Result<ViterbiDecoder<L, S>, ModelError> {
        let floor = self.emission_floor.unwrap_or(DEFAULT_EMISSION_FLOOR);
        if !(floor.is_finite() && floor > 0.0 && floor <= 1.0) {
            return Err(ModelError::InvalidEmissionFloor(floor));
        }
        Ok(ViterbiDecoder::with_floor(self.model, floor))
    }
}
