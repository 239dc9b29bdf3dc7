#![cfg(feature = "parallel")]

use hmm_viterbi::{DecoderBuilder, Model, ModelSpec, ViterbiDecoder};
use proptest::prelude::*;

fn weather() -> Model<&'static str, u8> {
    let spec = ModelSpec::new(vec!["sunny", "cloudy", "rainy"], vec![0u8, 1, 2])
        .with_initial("sunny", 0.5)
        .with_initial("cloudy", 0.3)
        .with_initial("rainy", 0.2)
        .with_transition("sunny", "sunny", 0.6)
        .with_transition("sunny", "cloudy", 0.3)
        .with_transition("sunny", "rainy", 0.1)
        .with_transition("cloudy", "sunny", 0.3)
        .with_transition("cloudy", "cloudy", 0.4)
        .with_transition("cloudy", "rainy", 0.3)
        .with_transition("rainy", "sunny", 0.2)
        .with_transition("rainy", "cloudy", 0.3)
        .with_transition("rainy", "rainy", 0.5)
        .with_emission("sunny", 0, 0.7)
        .with_emission("sunny", 1, 0.2)
        .with_emission("cloudy", 1, 0.6)
        .with_emission("cloudy", 2, 0.2)
        .with_emission("rainy", 0, 0.1)
        .with_emission("rainy", 2, 0.8);
    Model::new(spec).unwrap()
}

proptest! {
    #[test]
    fn batch_matches_sequential(
        sequences in prop::collection::vec(prop::collection::vec(0u8..4, 0..24), 0..16)
    ) {
        let decoder = ViterbiDecoder::new(weather());
        let batch = decoder.decode_batch(&sequences);
        prop_assert_eq!(batch.len(), sequences.len());
        for (obs, parallel) in sequences.iter().zip(&batch) {
            let serial = decoder.decode(obs);
            prop_assert_eq!(&serial, parallel);
        }
    }

    #[test]
    fn batch_respects_configured_floor(
        sequences in prop::collection::vec(prop::collection::vec(0u8..4, 1..12), 1..8)
    ) {
        let decoder = DecoderBuilder::new(weather())
            .with_emission_floor(0.05)
            .build()
            .unwrap();
        for (obs, result) in sequences.iter().zip(decoder.decode_batch(&sequences)) {
            prop_assert_eq!(result, decoder.decode(obs));
        }
    }
}
