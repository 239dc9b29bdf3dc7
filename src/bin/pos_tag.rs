use std::env;
use std::fmt::{Debug, Display};
use std::fs::File;
use std::hash::Hash;
use std::io::BufReader;

use hmm_viterbi::{pos, DecodeResult, DecoderBuilder, Model, ModelSpec, ViterbiDecoder};
use serde::Serialize;

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("pos_tag: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&options) {
        eprintln!("pos_tag: {err}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> hmm_viterbi::Result<()> {
    let sentence = options.words.join(",");
    match &options.model_path {
        None => {
            let words = pos::parse_sentence(&sentence)?;
            let decoder = options.decoder(pos::reference_model()?)?;
            let result = decoder.decode_checked(&words)?;
            options.format.write(&words, decoder.model().labels(), &result, options.lattice);
        }
        Some(path) => {
            let spec: ModelSpec<String, String> =
                ModelSpec::from_reader(BufReader::new(File::open(path)?))?;
            let decoder = options.decoder(Model::new(spec)?)?;
            let words: Vec<String> = sentence
                .split(',')
                .filter(|w| !w.is_empty())
                .map(str::to_owned)
                .collect();
            let result = decoder.decode_checked(&words)?;
            options.format.write(&words, decoder.model().labels(), &result, options.lattice);
        }
    }
    Ok(())
}

struct Options {
    format: OutputFormat,
    lattice: bool,
    floor: Option<f64>,
    model_path: Option<String>,
    words: Vec<String>,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut format = OutputFormat::Text;
        let mut lattice = false;
        let mut floor = None;
        let mut model_path = None;
        let mut words = Vec::new();

        while let Some(arg) = args.next() {
            let arg = arg.into();
            if arg == "--help" || arg == "-h" {
                Options::print_help();
                std::process::exit(0);
            } else if let Some(value) = arg.strip_prefix("--format=") {
                format = OutputFormat::from_str(value)?;
            } else if arg == "--format" {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value after --format".to_string())?
                    .into();
                format = OutputFormat::from_str(&value)?;
            } else if arg == "--lattice" {
                lattice = true;
            } else if let Some(value) = arg.strip_prefix("--floor=") {
                floor = Some(parse_floor(value)?);
            } else if arg == "--floor" {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value after --floor".to_string())?
                    .into();
                floor = Some(parse_floor(&value)?);
            } else if let Some(value) = arg.strip_prefix("--model=") {
                model_path = Some(value.to_string());
            } else if arg == "--model" {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value after --model".to_string())?
                    .into();
                model_path = Some(value);
            } else if arg.starts_with("--") {
                return Err(format!("unrecognized argument '{arg}'"));
            } else {
                words.extend(
                    arg.split(',')
                        .map(str::trim)
                        .filter(|w| !w.is_empty())
                        .map(str::to_owned),
                );
            }
        }

        Ok(Self {
            format,
            lattice,
            floor,
            model_path,
            words,
        })
    }

    fn decoder<L, S>(&self, model: Model<L, S>) -> hmm_viterbi::Result<ViterbiDecoder<L, S>>
    where
        L: Clone + Eq + Hash + Debug,
        S: Clone + Eq + Hash + Debug,
    {
        let mut builder = DecoderBuilder::new(model);
        if let Some(floor) = self.floor {
            builder = builder.with_emission_floor(floor);
        }
        Ok(builder.build()?)
    }

    fn print_help() {
        println!(
            "\
Usage: pos_tag [<options>] <word>[,<word>...] [<word>...]

Tags a sentence with the most probable part-of-speech sequence.

Options:
  --format <text|table|json>    Output format (default: text)
  --lattice                     Also print the score/backpointer lattice
  --floor <P>                   Probability for missing emission entries (default: 1e-5)
  --model <FILE>                JSON model with string labels and symbols
                                (default: built-in noun/verb/adjective model)
  -h, --help                    Print this help message

Built-in vocabulary: cat, run, fast, dog, jump, big

Examples:
  pos_tag fast,run
  pos_tag --format table --lattice big dog run fast
"
        );
    }
}

fn parse_floor(value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("floor must be a number, got '{value}'"))
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Text,
    Table,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "text" => Ok(Self::Text),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write<L, S>(self, words: &[S], labels: &[L], result: &DecodeResult<L>, lattice: bool)
    where
        L: Display + Serialize,
        S: Display + Serialize,
    {
        match self {
            OutputFormat::Text => write_text(words, labels, result, lattice),
            OutputFormat::Table => write_table(words, labels, result, lattice),
            OutputFormat::Json => write_json(words, result, lattice),
        }
    }
}

fn tag_name<L: Display>(label: &Option<L>) -> String {
    match label {
        Some(l) => l.to_string(),
        None => "?".to_string(),
    }
}

fn write_text<L: Display, S: Display>(
    words: &[S],
    labels: &[L],
    result: &DecodeResult<L>,
    lattice: bool,
) {
    if words.is_empty() {
        println!("(empty sentence)");
        return;
    }
    let width = words.iter().map(|w| w.to_string().len()).max().unwrap_or(0);
    for (word, tag) in words.iter().zip(&result.path) {
        println!("{:<width$}  {}", word.to_string(), tag_name(tag));
    }
    match result.log_probability {
        Some(logp) => println!("log P = {logp:.6}"),
        None => println!("log P = -inf (no possible path)"),
    }
    if result.emission_fallbacks > 0 {
        println!("emission floor used in {} cells", result.emission_fallbacks);
    }
    if lattice {
        println!();
        for (t, (scores, back)) in result
            .scores()
            .iter()
            .zip(result.backpointers())
            .enumerate()
        {
            for (s, label) in labels.iter().enumerate() {
                let from = back[s].map(|p| labels[p].to_string());
                println!(
                    "t={t} {label}: {:.6} <- {}",
                    scores[s],
                    from.as_deref().unwrap_or("-")
                );
            }
        }
    }
}

fn write_table<L: Display, S: Display>(
    words: &[S],
    labels: &[L],
    result: &DecodeResult<L>,
    lattice: bool,
) {
    let col = labels
        .iter()
        .map(|l| l.to_string().len())
        .max()
        .unwrap_or(0)
        .max(22);
    print!("{:>4} | {:<10} | {:<10}", "t", "word", "tag");
    if lattice {
        for label in labels {
            print!(" | {:<col$}", label.to_string());
        }
    }
    println!();
    let rule = 4 + 3 + 10 + 3 + 10 + if lattice { labels.len() * (col + 3) } else { 0 };
    println!("{}", "-".repeat(rule));
    for (t, word) in words.iter().enumerate() {
        print!(
            "{:>4} | {:<10} | {:<10}",
            t,
            word.to_string(),
            tag_name(&result.path[t])
        );
        if lattice {
            for s in 0..labels.len() {
                let cell = match result.lattice.backpointer(t, s) {
                    Some(p) => format!("{:.4} <- {}", result.scores()[t][s], labels[p]),
                    None => format!("{:.4}", result.scores()[t][s]),
                };
                print!(" | {cell:<col$}");
            }
        }
        println!();
    }
}

fn write_json<L: Serialize, S: Serialize>(words: &[S], result: &DecodeResult<L>, lattice: bool) {
    let mut value = serde_json::json!({
        "sequence": words,
        "path": result.path,
        "log_probability": result.log_probability,
        "emission_fallbacks": result.emission_fallbacks,
    });
    if lattice {
        value["lattice"] = serde_json::json!(result.lattice);
    }
    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("pos_tag output error: {err}"),
    }
}
