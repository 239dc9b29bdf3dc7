//! Example: tagging a short sentence with the reference part-of-speech HMM.
//!
//! Run with:
//! `cargo run --example pos_tagging`

use hmm_viterbi::pos::{self, PartOfSpeech, Word};
use hmm_viterbi::{DecoderBuilder, Vocabulary};

fn main() -> Result<(), hmm_viterbi::Error> {
    // Tags:  Noun, Verb, Adjective
    // Words: cat, run, fast, dog, jump, big
    let decoder = DecoderBuilder::new(pos::reference_model()?).build()?;

    let sentence = [Word::Big, Word::Dog, Word::Run, Word::Fast];
    let result = decoder.decode(&sentence);

    match result.log_probability {
        Some(logp) => println!("Best path log-probability: {logp:.6}"),
        None => println!("No path has non-zero probability"),
    }
    println!("Tagged sentence:");
    for (t, (word, tag)) in sentence.iter().zip(&result.path).enumerate() {
        let tag = tag.map(PartOfSpeech::name).unwrap_or("?");
        println!("  t = {t:2}, {word:<5} -> {tag}");
    }

    println!("Lattice (score <- predecessor):");
    for (t, scores) in result.scores().iter().enumerate() {
        let cells: Vec<String> = PartOfSpeech::ALL
            .iter()
            .map(|tag| {
                let s = tag.ordinal();
                match result.lattice.backpointer(t, s) {
                    Some(p) => format!("{tag}={:.3} <- {}", scores[s], PartOfSpeech::ALL[p]),
                    None => format!("{tag}={:.3}", scores[s]),
                }
            })
            .collect();
        println!("  t = {t:2}: {}", cells.join(", "));
    }

    Ok(())
}
