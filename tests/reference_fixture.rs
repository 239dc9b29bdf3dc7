use hmm_viterbi::pos::{self, PartOfSpeech::*, Word};
use hmm_viterbi::{decode, DEFAULT_EMISSION_FLOOR};

const EPS: f64 = 1e-10;

#[test]
fn single_word_cat_is_noun() {
    let model = pos::reference_model().unwrap();
    let result = decode(&model, &[Word::Cat]);
    assert_eq!(result.path, vec![Some(Noun)]);
    let logp = result.log_probability.unwrap();
    assert!((logp - (0.4f64 * 0.4).ln()).abs() < EPS);
    assert_eq!(result.backpointers(), &[vec![None, None, None]]);
}

#[test]
fn fast_run_is_adjective_verb() {
    let model = pos::reference_model().unwrap();
    let result = decode(&model, &[Word::Fast, Word::Run]);
    assert_eq!(result.path, vec![Some(Adjective), Some(Verb)]);
    assert_eq!(result.path_indices, vec![Some(2), Some(1)]);

    // Adjective(0.3 * 0.35) -> Verb(0.3 * 0.4)
    let logp = result.log_probability.unwrap();
    assert!((logp - (0.3f64 * 0.35 * 0.3 * 0.4).ln()).abs() < EPS);

    let t0 = &result.scores()[0];
    assert!((t0[0] - (0.4f64.ln() + 0.1f64.ln())).abs() < EPS);
    assert!((t0[1] - (0.3f64.ln() + 0.1f64.ln())).abs() < EPS);
    assert!((t0[2] - (0.3f64.ln() + 0.35f64.ln())).abs() < EPS);

    // Every tag at t = 1 is best reached from Adjective.
    assert_eq!(result.backpointers()[1], vec![Some(2), Some(2), Some(2)]);
    let t1 = &result.scores()[1];
    assert!((t1[0] - -5.249527202378605).abs() < EPS);
    assert!((t1[1] - -4.374058465024705).abs() < EPS);
    assert!((t1[2] - -6.165817934252759).abs() < EPS);
    assert_eq!(result.emission_fallbacks, 0);
}

#[test]
fn four_word_sentence() {
    let model = pos::reference_model().unwrap();
    let result = decode(&model, &[Word::Big, Word::Dog, Word::Run, Word::Fast]);
    assert_eq!(
        result.path,
        vec![Some(Adjective), Some(Noun), Some(Verb), Some(Adjective)]
    );
    let expected = (0.3f64 * 0.35 * 0.5 * 0.3 * 0.5 * 0.4 * 0.4 * 0.35).ln();
    assert!((result.log_probability.unwrap() - expected).abs() < EPS);
}

#[test]
fn tag_sentence_matches_direct_decode() {
    let tagged = pos::tag_sentence("dog,jump").unwrap();
    assert_eq!(tagged.path, vec![Some(Noun), Some(Verb)]);
    let direct = decode(&pos::reference_model().unwrap(), &[Word::Dog, Word::Jump]);
    assert_eq!(tagged, direct);
}

#[test]
fn empty_sentence_decodes_to_nothing() {
    let tagged = pos::tag_sentence("").unwrap();
    assert!(tagged.path.is_empty());
    assert!(tagged.scores().is_empty());
    assert!(tagged.backpointers().is_empty());
}

#[test]
fn floor_constant_is_reference_value() {
    assert_eq!(DEFAULT_EMISSION_FLOOR, 1e-5);
}
