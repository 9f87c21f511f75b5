// tnorm-tag: Print the tagging of Hindi text as JSON.
//
// Reads text from stdin (one sentence per line) and prints one JSON object
// per line with the segments chosen by the normalizer.
//
// Usage:
//   tnorm-tag [OPTIONS]
//
// Options:
//   --pretty               Pretty-print the JSON
//   -c, --config PATH      TOML configuration file
//   --data-dir PATH        Directory overriding the embedded rule tables
//   --cache-dir PATH       Directory of compiled grammar archives
//   --lower-cased          Input is lower-cased
//   -h, --help             Print help

use std::io::{self, BufRead, Write};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, args) = tnorm_cli::parse_common(&args);

    if tnorm_cli::wants_help(&args) {
        println!("tnorm-tag: Show how Hindi text is segmented and tagged.");
        println!();
        println!("Usage: tnorm-tag [OPTIONS]");
        println!();
        println!("Reads lines from stdin, prints one JSON object per line:");
        println!("  {{\"text\": ..., \"segments\": [{{\"kind\": \"tagged\", ...}}, ...]}}");
        println!();
        println!("Options:");
        println!("  --pretty               Pretty-print the JSON");
        println!("{}", tnorm_cli::COMMON_HELP);
        println!("  -h, --help             Print this help");
        return;
    }

    let pretty = args.iter().any(|a| a == "--pretty");

    tnorm_cli::init_logging();
    let normalizer = tnorm_cli::load_normalizer(&options);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line.unwrap_or_else(|e| tnorm_cli::fatal(&format!("failed to read stdin: {e}")));
        let tagged = match normalizer.tag(&line) {
            Ok(tagged) => tagged,
            Err(e) => {
                eprintln!("error: {line:?}: {e}");
                continue;
            }
        };
        let json = if pretty {
            serde_json::to_string_pretty(&tagged)
        } else {
            serde_json::to_string(&tagged)
        };
        match json {
            Ok(json) => {
                let _ = writeln!(out, "{json}");
            }
            Err(e) => tnorm_cli::fatal(&format!("failed to serialize: {e}")),
        }
    }
}
