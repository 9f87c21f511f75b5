// tnorm-cli: shared utilities for CLI tools.

use std::path::PathBuf;
use std::process;

use tnorm_hi::{InputCase, Normalizer, NormalizerConfig};

/// Environment variable naming a default configuration file.
const CONFIG_ENV: &str = "TNORM_CONFIG";

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Options shared by every tool.
#[derive(Debug, Default)]
pub struct CommonOptions {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub lower_cased: bool,
    /// Allow more than one candidate per input.
    pub nondeterministic: bool,
}

/// Route `tracing` output to stderr, filtered by `RUST_LOG`.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse the shared options out of `args`.
///
/// Returns `(options, remaining_args)`.
pub fn parse_common(args: &[String]) -> (CommonOptions, Vec<String>) {
    let mut options = CommonOptions::default();
    let mut remaining = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| -> PathBuf {
            match iter.next() {
                Some(v) => PathBuf::from(v),
                None => fatal(&format!("{name} requires a value")),
            }
        };
        if let Some(v) = arg.strip_prefix("--config=") {
            options.config = Some(PathBuf::from(v));
        } else if arg == "--config" || arg == "-c" {
            options.config = Some(value(arg));
        } else if let Some(v) = arg.strip_prefix("--data-dir=") {
            options.data_dir = Some(PathBuf::from(v));
        } else if arg == "--data-dir" {
            options.data_dir = Some(value(arg));
        } else if let Some(v) = arg.strip_prefix("--cache-dir=") {
            options.cache_dir = Some(PathBuf::from(v));
        } else if arg == "--cache-dir" {
            options.cache_dir = Some(value(arg));
        } else if arg == "--lower-cased" {
            options.lower_cased = true;
        } else {
            remaining.push(arg.clone());
        }
    }

    (options, remaining)
}

/// Configuration from `--config`, then `TNORM_CONFIG`, then the defaults,
/// with command-line overrides applied.
pub fn load_config(options: &CommonOptions) -> Result<NormalizerConfig, String> {
    let path = options
        .config
        .clone()
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));
    let mut config = match path {
        Some(path) => NormalizerConfig::load(&path).map_err(|e| e.to_string())?,
        None => NormalizerConfig::default(),
    };
    if let Some(dir) = &options.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(dir) = &options.cache_dir {
        config.cache_dir = Some(dir.clone());
    }
    if options.lower_cased {
        config.input_case = InputCase::LowerCased;
    }
    if options.nondeterministic {
        config.deterministic = false;
    }
    Ok(config)
}

/// Build a normalizer from the shared options or exit.
pub fn load_normalizer(options: &CommonOptions) -> Normalizer {
    let config = load_config(options).unwrap_or_else(|e| fatal(&e));
    Normalizer::new(config).unwrap_or_else(|e| fatal(&format!("failed to build normalizer: {e}")))
}

/// Help text for the shared options.
pub const COMMON_HELP: &str = "\
  -c, --config PATH      TOML configuration file (default: $TNORM_CONFIG)
  --data-dir PATH        Directory overriding the embedded rule tables
  --cache-dir PATH       Directory of compiled grammar archives
  --lower-cased          Input is lower-cased; only lower-case English forms match";

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
