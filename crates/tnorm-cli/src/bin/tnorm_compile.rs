// tnorm-compile: Build every grammar and write the archives.
//
// Builds the classify, address word, verbalizer and post-processing
// grammars and writes them to the cache directory, replacing existing
// archives. Later runs with the same --cache-dir load them instead of
// rebuilding.
//
// Usage:
//   tnorm-compile --cache-dir PATH [OPTIONS]
//
// Options:
//   --cache-dir PATH       Output directory (required, or cache_dir in the config)
//   -c, --config PATH      TOML configuration file
//   --data-dir PATH        Directory overriding the embedded rule tables
//   --lower-cased          Build the lower-cased variant
//   -h, --help             Print help

use tnorm_hi::cache::{archive_path, is_shared, SHARED_KEY, STAGES};
use tnorm_hi::Normalizer;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, args) = tnorm_cli::parse_common(&args);

    if tnorm_cli::wants_help(&args) {
        println!("tnorm-compile: Compile normalization grammars to archives.");
        println!();
        println!("Usage: tnorm-compile --cache-dir PATH [OPTIONS]");
        println!();
        println!("Options:");
        println!("{}", tnorm_cli::COMMON_HELP);
        println!("  -h, --help             Print this help");
        return;
    }
    if let Some(arg) = args.first() {
        tnorm_cli::fatal(&format!("unexpected argument {arg}"));
    }

    tnorm_cli::init_logging();
    let mut config = tnorm_cli::load_config(&options).unwrap_or_else(|e| tnorm_cli::fatal(&e));
    let Some(dir) = config.cache_dir.clone() else {
        tnorm_cli::fatal("--cache-dir is required");
    };
    config.overwrite_cache = true;

    let normalizer = Normalizer::new(config)
        .unwrap_or_else(|e| tnorm_cli::fatal(&format!("failed to build grammars: {e}")));
    for stage in STAGES {
        let key = if is_shared(stage) {
            SHARED_KEY
        } else {
            normalizer.config_key()
        };
        println!("{}", archive_path(&dir, stage, key).display());
    }
}
