// Normalizer configuration, loadable from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tnorm_core::enums::InputCase;

use crate::error::NormalizeError;
use crate::tables::{DirectoryTables, EmbeddedTables, TableSource};

pub const DEFAULT_MAX_CANDIDATES: usize = 5;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 4096;

/// Options of a [`crate::Normalizer`].
///
/// ```toml
/// input_case = "cased"
/// deterministic = true
/// cache_dir = "/var/cache/tnorm"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    pub input_case: InputCase,
    /// Produce a single output. When false, `normalize_candidates` returns
    /// up to `max_candidates` alternatives.
    pub deterministic: bool,
    pub max_candidates: usize,
    /// Longer inputs are rejected.
    pub max_input_chars: usize,
    /// Directory of compiled grammar archives.
    pub cache_dir: Option<PathBuf>,
    /// Rebuild and rewrite archives even if they exist.
    pub overwrite_cache: bool,
    /// Directory overriding the embedded rule tables.
    pub data_dir: Option<PathBuf>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            input_case: InputCase::default(),
            deterministic: true,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            cache_dir: None,
            overwrite_cache: false,
            data_dir: None,
        }
    }
}

impl NormalizerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, NormalizeError> {
        toml::from_str(text).map_err(|e| NormalizeError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, NormalizeError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| NormalizeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Rule tables selected by `data_dir`.
    pub fn table_source(&self) -> Box<dyn TableSource> {
        match &self.data_dir {
            Some(dir) => Box::new(DirectoryTables::new(dir.clone())),
            None => Box::new(EmbeddedTables),
        }
    }
}
