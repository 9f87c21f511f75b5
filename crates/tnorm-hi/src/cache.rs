// Process-wide grammar cache with optional on-disk archives.
//
// Grammars are keyed by (stage, configuration key) and built at most once
// per key: concurrent callers for the same key wait for the first build.
// A failed build leaves the slot empty so a later call can retry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use tnorm_fst::format;
use tnorm_fst::Grammar;
use tracing::{info, warn};

use crate::error::NormalizeError;

pub const CLASSIFY: &str = "classify";
pub const ADDRESS_WORDS: &str = "address_words";
pub const VERBALIZE: &str = "verbalize";
pub const POST_PROCESS: &str = "post_process";

/// Stages built by a normalizer, in build order.
pub const STAGES: [&str; 4] = [CLASSIFY, ADDRESS_WORDS, VERBALIZE, POST_PROCESS];

/// Configuration key of stages that do not depend on the configuration.
pub const SHARED_KEY: &str = "default";

/// Whether `stage` is cached under [`SHARED_KEY`].
pub fn is_shared(stage: &str) -> bool {
    matches!(stage, VERBALIZE | POST_PROCESS)
}

type Slot = Arc<OnceCell<Arc<Grammar>>>;

static GRAMMARS: Lazy<Mutex<HashMap<(String, String), Slot>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Where archives are read from and written to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveOptions<'a> {
    pub dir: Option<&'a Path>,
    pub overwrite: bool,
}

/// `<dir>/hi_tn_<stage>_<config_key>.far`.
pub fn archive_path(dir: &Path, stage: &str, config_key: &str) -> PathBuf {
    dir.join(format!("hi_tn_{stage}_{config_key}.far"))
}

/// Cached grammar for (`stage`, `config_key`), built by `build` on first use.
pub fn get_or_build<F>(
    stage: &str,
    config_key: &str,
    archive: ArchiveOptions<'_>,
    build: F,
) -> Result<Arc<Grammar>, NormalizeError>
where
    F: FnOnce() -> Result<Grammar, NormalizeError>,
{
    let slot: Slot = {
        let mut grammars = GRAMMARS.lock();
        Arc::clone(
            grammars
                .entry((stage.to_string(), config_key.to_string()))
                .or_default(),
        )
    };
    if let Some(grammar) = slot.get() {
        info!(stage, config_key, "grammar cache hit");
        return Ok(Arc::clone(grammar));
    }

    let grammar = slot.get_or_try_init(|| {
        let grammar = match archive.dir {
            Some(dir) => load_or_build(
                &archive_path(dir, stage, config_key),
                stage,
                archive.overwrite,
                build,
            )?,
            None => build()?,
        };
        Ok::<_, NormalizeError>(Arc::new(grammar))
    })?;
    Ok(Arc::clone(grammar))
}

fn load_or_build<F>(
    path: &Path,
    stage: &str,
    overwrite: bool,
    build: F,
) -> Result<Grammar, NormalizeError>
where
    F: FnOnce() -> Result<Grammar, NormalizeError>,
{
    if !overwrite && path.exists() {
        match format::load_archive(path) {
            Ok(entries) => {
                if let Some((_, fst)) = entries.into_iter().find(|(name, _)| name == stage) {
                    info!(path = %path.display(), stage, "loaded grammar archive");
                    return Ok(Grammar::from_optimized(stage, fst));
                }
                warn!(path = %path.display(), stage, "grammar archive has no entry for stage, rebuilding");
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable grammar archive, rebuilding");
            }
        }
    }

    let grammar = build()?;
    format::save_archive(path, &[(stage, grammar.fst())])?;
    info!(
        path = %path.display(),
        stage,
        states = grammar.num_states(),
        "wrote grammar archive"
    );
    Ok(grammar)
}

/// Number of grammars currently held.
pub fn len() -> usize {
    GRAMMARS.lock().values().filter(|slot| slot.get().is_some()).count()
}
