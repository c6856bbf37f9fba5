//! Minimal CLI for creating and folding accumulator values.
//!
//! Values are read and printed as decimal strings so they can be piped
//! between invocations or stored by the caller.

use ring_accumulator::{AccumulatorConfig, AccumulatorEngine, AccumulatorValue, ConfigOverrides};
use std::env;
use std::process;

fn fatal(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn print_help() {
    println!("Usage: accumulator <seed|add|verify|help> [options]");
    println!("  seed");
    println!("  add <value> <element>...");
    println!("  verify <accumulator> <witness> <element>");
    println!("Options:");
    println!("  --hash <name>                     sha256 (default), sha384, sha512, sha3-256, sha3-512, blake2b-256, blake2b-512");
    println!("                                    (sha3-* and blake2b-* need the sha3 / blake2 cargo features)");
    println!("  --bits <n>                        ring size exponent (default 256, at most 512)");
    println!("  --word-width <32|64>              digest word width (default 64)");
    println!("  --exponent <first-word|all-words> exponent rule (default first-word)");
    println!("  --config <file.json>              JSON overrides, applied before the flags above");
}

/// Splits `args` into positionals and an engine built from the option flags.
fn parse_args(args: Vec<String>) -> (Vec<String>, AccumulatorEngine) {
    let mut positionals = Vec::new();
    let mut pairs: Vec<(&'static str, String)> = Vec::new();
    let mut config_path: Option<String> = None;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let key = match arg.as_str() {
            "--hash" => "hash_algorithm",
            "--bits" => "hash_bit_count",
            "--word-width" => "word_width",
            "--exponent" => "exponent_mode",
            "--config" => {
                config_path = Some(
                    iter.next()
                        .unwrap_or_else(|| fatal("--config expects a value")),
                );
                continue;
            }
            other if other.starts_with("--") => fatal(&format!("unknown argument: {other}")),
            _ => {
                positionals.push(arg);
                continue;
            }
        };
        let value = iter
            .next()
            .unwrap_or_else(|| fatal(&format!("{arg} expects a value")));
        pairs.push((key, value));
    }

    let base = match config_path {
        Some(path) => ConfigOverrides::from_json_file(&path)
            .and_then(|file| file.apply(AccumulatorConfig::default()))
            .unwrap_or_else(|err| fatal(&format!("failed to load {path}: {err}"))),
        None => AccumulatorConfig::default(),
    };
    let config = ConfigOverrides::from_pairs(pairs)
        .and_then(|flags| flags.apply(base))
        .unwrap_or_else(|err| fatal(&err.to_string()));
    let engine = AccumulatorEngine::new(config).unwrap_or_else(|err| fatal(&err.to_string()));
    (positionals, engine)
}

fn parse_value(label: &str, input: &str) -> AccumulatorValue {
    input
        .parse()
        .unwrap_or_else(|err| fatal(&format!("{label}: {err}")))
}

fn cmd_seed(args: Vec<String>) {
    let (positionals, engine) = parse_args(args);
    if !positionals.is_empty() {
        fatal("Usage: accumulator seed [options]");
    }
    let seed = engine
        .create_seed()
        .unwrap_or_else(|err| fatal(&err.to_string()));
    println!("{seed}");
}

fn cmd_add(args: Vec<String>) {
    let (positionals, engine) = parse_args(args);
    let (value, elements) = match positionals.split_first() {
        Some((value, elements)) if !elements.is_empty() => (value, elements),
        _ => fatal("Usage: accumulator add <value> <element>... [options]"),
    };
    let current = parse_value("value", value);
    let folded = engine
        .accumulate_all(&current, elements)
        .unwrap_or_else(|err| fatal(&err.to_string()));
    println!("{folded}");
}

fn cmd_verify(args: Vec<String>) {
    let (positionals, engine) = parse_args(args);
    let [accumulator, witness, element] = positionals.as_slice() else {
        fatal("Usage: accumulator verify <accumulator> <witness> <element> [options]");
    };
    let accumulator = parse_value("accumulator", accumulator);
    let witness = parse_value("witness", witness);
    let member = engine
        .verify_membership(&accumulator, &witness, element)
        .unwrap_or_else(|err| fatal(&err.to_string()));
    println!("membership: {member}");
    if !member {
        process::exit(1);
    }
}

fn main() {
    env_logger::init();
    let mut args = env::args().skip(1);
    let command = args.next();
    match command.as_deref() {
        Some("seed") => cmd_seed(args.collect()),
        Some("add") => cmd_add(args.collect()),
        Some("verify") => cmd_verify(args.collect()),
        Some("help") | Some("--help") | Some("-h") => print_help(),
        _ => {
            eprintln!("Usage: accumulator <seed|add|verify|help> ...");
            process::exit(1);
        }
    }
}
