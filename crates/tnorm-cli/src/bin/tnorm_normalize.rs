// tnorm-normalize: Normalize Hindi text from stdin.
//
// Reads text from stdin (one sentence per line) and prints the spoken form
// of each line. With -n, prints up to N candidates per line with weights.
//
// Usage:
//   tnorm-normalize [OPTIONS] [TEXT...]
//
// Options:
//   -n, --candidates N     Print up to N candidates per line
//   -c, --config PATH      TOML configuration file
//   --data-dir PATH        Directory overriding the embedded rule tables
//   --cache-dir PATH       Directory of compiled grammar archives
//   --lower-cased          Input is lower-cased
//   -h, --help             Print help

use std::io::{self, BufRead, Write};

use tnorm_hi::Normalizer;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, args) = tnorm_cli::parse_common(&args);

    if tnorm_cli::wants_help(&args) {
        println!("tnorm-normalize: Convert written Hindi text to its spoken form.");
        println!();
        println!("Usage: tnorm-normalize [OPTIONS] [TEXT...]");
        println!();
        println!("If TEXT arguments are given, normalizes each one.");
        println!("Otherwise reads lines from stdin.");
        println!();
        println!("Options:");
        println!("  -n, --candidates N     Print up to N candidates per line with weights");
        println!("{}", tnorm_cli::COMMON_HELP);
        println!("  -h, --help             Print this help");
        return;
    }

    let mut candidates: Option<usize> = None;
    let mut texts: Vec<String> = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        match arg.as_str() {
            "-n" | "--candidates" => {
                let Some(value) = args.get(i + 1) else {
                    tnorm_cli::fatal(&format!("{arg} requires a value"));
                };
                candidates = Some(
                    value
                        .parse()
                        .unwrap_or_else(|_| tnorm_cli::fatal("invalid number for --candidates")),
                );
                skip_next = true;
            }
            s if !s.starts_with('-') => texts.push(arg.clone()),
            _ => tnorm_cli::fatal(&format!("unknown option {arg}")),
        }
    }

    tnorm_cli::init_logging();
    let mut options = options;
    if candidates.is_some() {
        options.nondeterministic = true;
    }
    let normalizer = tnorm_cli::load_normalizer(&options);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if texts.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line =
                line.unwrap_or_else(|e| tnorm_cli::fatal(&format!("failed to read stdin: {e}")));
            process_line(&normalizer, &line, candidates, &mut out);
        }
    } else {
        for text in &texts {
            process_line(&normalizer, text, candidates, &mut out);
        }
    }
}

fn process_line(
    normalizer: &Normalizer,
    line: &str,
    candidates: Option<usize>,
    out: &mut impl Write,
) {
    match candidates {
        None => match normalizer.normalize(line) {
            Ok(spoken) => {
                let _ = writeln!(out, "{spoken}");
            }
            Err(e) => eprintln!("error: {line:?}: {e}"),
        },
        Some(n) => match normalizer.normalize_candidates(line, n) {
            Ok(all) => {
                for candidate in all {
                    let _ = writeln!(out, "{:.3}\t{}", candidate.weight.value(), candidate.output);
                }
                let _ = writeln!(out);
            }
            Err(e) => eprintln!("error: {line:?}: {e}"),
        },
    }
}
