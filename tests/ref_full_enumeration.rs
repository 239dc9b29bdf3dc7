use hmm_viterbi::{decode, Model, ModelSpec, DEFAULT_EMISSION_FLOOR};
use proptest::prelude::*;

type Tables = (usize, usize, Vec<f64>, Vec<f64>, Vec<Option<f64>>, Vec<u8>);

/// Up to three labels and three symbols, with gaps in the emission table and
/// observations that may include the unknown symbol `n_symbols`.
fn tables() -> impl Strategy<Value = Tables> {
    (1usize..=3, 1usize..=3).prop_flat_map(|(n, m)| {
        (
            Just(n),
            Just(m),
            prop::collection::vec(0.01f64..1.0, n),
            prop::collection::vec(0.01f64..1.0, n * n),
            prop::collection::vec(prop::option::weighted(0.8, 0.01f64..1.0), n * m),
            prop::collection::vec(0u8..=(m as u8), 0..=5),
        )
    })
}

fn build(tables: &Tables) -> Model<usize, u8> {
    let (n, m, initial, transition, emission, _) = tables;
    let mut spec = ModelSpec::new((0..*n).collect(), (0..*m as u8).collect());
    for from in 0..*n {
        spec = spec.with_initial(from, initial[from]);
        for to in 0..*n {
            spec = spec.with_transition(from, to, transition[from * n + to]);
        }
        for symbol in 0..*m {
            if let Some(p) = emission[from * m + symbol] {
                spec = spec.with_emission(from, symbol as u8, p);
            }
        }
    }
    Model::new(spec).unwrap()
}

fn path_score(model: &Model<usize, u8>, path: &[usize], obs: &[u8]) -> f64 {
    let floor = DEFAULT_EMISSION_FLOOR.ln();
    let ids = model.encode(obs);
    let emit = |s: usize, t: usize| model.log_emission(s, ids[t]).unwrap_or(floor);
    let mut score = model.log_initial(path[0]) + emit(path[0], 0);
    for t in 1..path.len() {
        score += model.log_transition(path[t - 1], path[t]) + emit(path[t], t);
    }
    score
}

/// Best score over all `n^T` label sequences.
fn brute_force(model: &Model<usize, u8>, obs: &[u8]) -> f64 {
    let n = model.n_labels();
    let t = obs.len();
    let mut best = f64::NEG_INFINITY;
    let mut path = vec![0usize; t];
    loop {
        best = best.max(path_score(model, &path, obs));
        let mut i = 0;
        while i < t && path[i] == n - 1 {
            path[i] = 0;
            i += 1;
        }
        if i == t {
            break;
        }
        path[i] += 1;
    }
    best
}

proptest! {
    #[test]
    fn best_score_matches_exhaustive_search(tables in tables()) {
        let model = build(&tables);
        let obs = &tables.5;
        let result = decode(&model, obs);

        prop_assert_eq!(result.path.len(), obs.len());
        prop_assert_eq!(result.scores().len(), obs.len());
        prop_assert_eq!(result.backpointers().len(), obs.len());

        if obs.is_empty() {
            prop_assert_eq!(result.log_probability, None);
        } else {
            let logp = result.log_probability.unwrap();
            let expected = brute_force(&model, obs);
            prop_assert!((logp - expected).abs() < 1e-9, "decoder {} vs exhaustive {}", logp, expected);

            // The returned path actually scores the reported value.
            let path: Vec<usize> = result.path_indices.iter().map(|s| s.unwrap()).collect();
            prop_assert!((path_score(&model, &path, obs) - logp).abs() < 1e-9);
        }
    }

    #[test]
    fn decoding_is_deterministic(tables in tables()) {
        let model = build(&tables);
        let a = decode(&model, &tables.5);
        let b = decode(&model, &tables.5);
        prop_assert_eq!(a.path, b.path);
        prop_assert_eq!(a.lattice.backpointers, b.lattice.backpointers);
        let bits = |scores: &[Vec<f64>]| -> Vec<u64> {
            scores.iter().flatten().map(|v| v.to_bits()).collect()
        };
        prop_assert_eq!(bits(&a.lattice.scores), bits(&b.lattice.scores));
    }

    #[test]
    fn first_column_has_no_predecessors(tables in tables()) {
        let model = build(&tables);
        let result = decode(&model, &tables.5);
        if let Some(first) = result.backpointers().first() {
            prop_assert!(first.iter().all(Option::is_none));
        }
        for col in result.backpointers().iter().skip(1) {
            prop_assert!(col.iter().all(Option::is_some));
        }
    }
}
