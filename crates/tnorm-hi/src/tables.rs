// Rule tables: flat UTF-8 mapping files turned into base transducers.
//
// A table line is `input<TAB>output`; a single column is an acceptor entry.
// Blank lines and `#` comments are skipped. A key may appear only once per
// table.

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use tnorm_core::character::decompose_nukta;
use tnorm_fst::VectorFst;

use crate::alphabet::both_glyph_sets;

/// Error type for rule table loading.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("duplicate key {key:?} in table {table} at line {line}")]
    DuplicateKey {
        table: String,
        key: String,
        line: usize,
    },

    #[error("malformed line {line} in table {table}: {content:?}")]
    MalformedLine {
        table: String,
        line: usize,
        content: String,
    },

    #[error("unknown table: {0}")]
    Missing(String),

    #[error("table {table} has no entry {key:?}")]
    MissingEntry { table: String, key: String },

    #[error("failed to read table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An ordered list of (input, output) pairs with unique inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    entries: Vec<(String, String)>,
}

impl Table {
    /// Parse table text. Precomposed nukta letters are decomposed.
    pub fn parse(name: &str, text: &str) -> Result<Self, TableError> {
        let text = decompose_nukta(text);
        let mut entries = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let columns: Vec<&str> = line.split('\t').collect();
            let (key, value) = match columns.as_slice() {
                [key] => (*key, *key),
                [key, value] => (*key, *value),
                _ => {
                    return Err(TableError::MalformedLine {
                        table: name.to_string(),
                        line: line_no,
                        content: line.to_string(),
                    });
                }
            };
            if key.is_empty() || value.is_empty() {
                return Err(TableError::MalformedLine {
                    table: name.to_string(),
                    line: line_no,
                    content: line.to_string(),
                });
            }
            if seen.insert(key.to_string(), line_no).is_some() {
                return Err(TableError::DuplicateKey {
                    table: name.to_string(),
                    key: key.to_string(),
                    line: line_no,
                });
            }
            entries.push((key.to_string(), value.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            entries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Output of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The table as a transducer.
    pub fn to_fst(&self) -> VectorFst {
        VectorFst::string_map(&self.entries)
    }

    /// Acceptor for the keys.
    pub fn keys_acceptor(&self) -> VectorFst {
        let keys: Vec<&str> = self.keys().collect();
        VectorFst::union_of_strings(&keys)
    }

    /// The table as a transducer accepting digit keys in both glyph sets.
    pub fn to_digit_fst(&self) -> VectorFst {
        VectorFst::string_map(&both_glyph_sets(&self.entries))
    }
}

/// Source of rule tables.
pub trait TableSource: Send + Sync {
    /// Load the table called `name` (e.g. `"numbers/digit"`).
    fn load(&self, name: &str) -> Result<Table, TableError>;

    /// Identifier of the table set, part of grammar cache keys.
    fn id(&self) -> String;
}

/// Names of all tables used by the grammars.
pub const TABLE_NAMES: &[&str] = &[
    "numbers/digit",
    "numbers/zero",
    "numbers/teens_and_ties",
    "numbers/magnitudes",
    "ordinal/exceptions",
    "ordinal/suffixes",
    "measure/unit",
    "measure/unit_year_formal",
    "measure/quarterly_units_map",
    "measure/quarterly_units_list",
    "whitelist/paune_mappings",
    "address/states",
    "address/cities",
    "address/context",
    "address/en_to_hi_mapping",
    "address/letters",
    "address/special_characters",
];

fn embedded_text(name: &str) -> Option<&'static str> {
    Some(match name {
        "numbers/digit" => include_str!("../data/numbers/digit.tsv"),
        "numbers/zero" => include_str!("../data/numbers/zero.tsv"),
        "numbers/teens_and_ties" => include_str!("../data/numbers/teens_and_ties.tsv"),
        "numbers/magnitudes" => include_str!("../data/numbers/magnitudes.tsv"),
        "ordinal/exceptions" => include_str!("../data/ordinal/exceptions.tsv"),
        "ordinal/suffixes" => include_str!("../data/ordinal/suffixes.tsv"),
        "measure/unit" => include_str!("../data/measure/unit.tsv"),
        "measure/unit_year_formal" => include_str!("../data/measure/unit_year_formal.tsv"),
        "measure/quarterly_units_map" => include_str!("../data/measure/quarterly_units_map.tsv"),
        "measure/quarterly_units_list" => {
            include_str!("../data/measure/quarterly_units_list.tsv")
        }
        "whitelist/paune_mappings" => include_str!("../data/whitelist/paune_mappings.tsv"),
        "address/states" => include_str!("../data/address/states.tsv"),
        "address/cities" => include_str!("../data/address/cities.tsv"),
        "address/context" => include_str!("../data/address/context.tsv"),
        "address/en_to_hi_mapping" => include_str!("../data/address/en_to_hi_mapping.tsv"),
        "address/letters" => include_str!("../data/address/letters.tsv"),
        "address/special_characters" => include_str!("../data/address/special_characters.tsv"),
        _ => return None,
    })
}

/// Tables compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTables;

impl TableSource for EmbeddedTables {
    fn load(&self, name: &str) -> Result<Table, TableError> {
        let text = embedded_text(name).ok_or_else(|| TableError::Missing(name.to_string()))?;
        Table::parse(name, text)
    }

    fn id(&self) -> String {
        "embedded".to_string()
    }
}

/// Tables read from `<dir>/<name>.tsv`, falling back to the embedded copy
/// for files that do not exist.
#[derive(Debug, Clone)]
pub struct DirectoryTables {
    dir: PathBuf,
}

impl DirectoryTables {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TableSource for DirectoryTables {
    fn load(&self, name: &str) -> Result<Table, TableError> {
        let path = self.dir.join(format!("{name}.tsv"));
        match std::fs::read_to_string(&path) {
            Ok(text) => Table::parse(name, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => EmbeddedTables.load(name),
            Err(source) => Err(TableError::Io { path, source }),
        }
    }

    fn id(&self) -> String {
        // FNV-1a of the directory path and of every table file present.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        let mut feed = |bytes: &[u8]| {
            for &b in bytes {
                hash ^= u64::from(b);
                hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            }
        };
        feed(self.dir.to_string_lossy().as_bytes());
        for name in TABLE_NAMES {
            if let Ok(contents) = std::fs::read(self.dir.join(format!("{name}.tsv"))) {
                feed(name.as_bytes());
                feed(&(contents.len() as u64).to_le_bytes());
                feed(&contents);
            }
        }
        format!("dir{hash:016x}")
    }
}

/// Every table the grammars read, loaded once.
#[derive(Debug, Clone)]
pub struct RuleTables {
    pub digit: Table,
    pub zero: Table,
    pub teens_and_ties: Table,
    pub magnitudes: Table,
    pub ordinal_exceptions: Table,
    pub ordinal_suffixes: Table,
    pub unit: Table,
    pub unit_year_formal: Table,
    pub quarterly_units_map: Table,
    pub quarterly_units_list: Table,
    pub paune: Table,
    pub states: Table,
    pub cities: Table,
    pub address_context: Table,
    pub en_to_hi: Table,
    pub letters: Table,
    pub special_characters: Table,
}

impl RuleTables {
    pub fn load(source: &dyn TableSource) -> Result<Self, TableError> {
        Ok(Self {
            digit: source.load("numbers/digit")?,
            zero: source.load("numbers/zero")?,
            teens_and_ties: source.load("numbers/teens_and_ties")?,
            magnitudes: source.load("numbers/magnitudes")?,
            ordinal_exceptions: source.load("ordinal/exceptions")?,
            ordinal_suffixes: source.load("ordinal/suffixes")?,
            unit: source.load("measure/unit")?,
            unit_year_formal: source.load("measure/unit_year_formal")?,
            quarterly_units_map: source.load("measure/quarterly_units_map")?,
            quarterly_units_list: source.load("measure/quarterly_units_list")?,
            paune: source.load("whitelist/paune_mappings")?,
            states: source.load("address/states")?,
            cities: source.load("address/cities")?,
            address_context: source.load("address/context")?,
            en_to_hi: source.load("address/en_to_hi_mapping")?,
            letters: source.load("address/letters")?,
            special_characters: source.load("address/special_characters")?,
        })
    }

    /// Spoken name of a magnitude tier (`hundred`, `thousand`, `lakh`, ...).
    pub fn magnitude(&self, tier: &str) -> Result<&str, TableError> {
        self.magnitudes
            .get(tier)
            .ok_or_else(|| TableError::MissingEntry {
                table: self.magnitudes.name().to_string(),
                key: tier.to_string(),
            })
    }
}
