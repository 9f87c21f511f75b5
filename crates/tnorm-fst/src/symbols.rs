// Label helpers and the archive symbol table.
//
// In memory every label is a code point, so grammars built independently
// share one alphabet. Archives store a compact symbol table instead and
// refer to symbols by index.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::FstError;
use crate::fst::{EPSILON, Label, VectorFst};

/// Label of a character.
#[inline]
pub fn label_of(c: char) -> Label {
    c as Label
}

/// Character of a non-epsilon label.
#[inline]
pub fn char_of(label: Label) -> Option<char> {
    if label == EPSILON {
        None
    } else {
        char::from_u32(label)
    }
}

/// Labels of every character of `s`.
pub fn labels(s: &str) -> Vec<Label> {
    s.chars().map(label_of).collect()
}

/// Printable form of a label for diagnostics.
pub fn display_label(label: Label) -> String {
    match char_of(label) {
        Some(' ') => "<space>".to_string(),
        Some(c) if c.is_control() => format!("U+{:04X}", label),
        Some(c) => c.to_string(),
        None if label == EPSILON => "<eps>".to_string(),
        None => format!("<invalid {label}>"),
    }
}

/// Symbol table of an archived transducer.
///
/// Symbols are stored as:
/// 1. Epsilon (index 0) -- empty string
/// 2. One single-character symbol per label, in ascending code point order
pub struct SymbolTable {
    /// Maps symbol index to its label.
    pub index_to_label: Vec<Label>,
    /// Maps a label to its symbol index.
    pub label_to_index: HashMap<Label, u32>,
}

impl SymbolTable {
    /// Collect every label used by `fst` on either side.
    pub fn from_fst(fst: &VectorFst) -> Self {
        let mut used: BTreeSet<Label> = fst.input_alphabet();
        used.extend(fst.output_alphabet());
        Self::from_labels(used)
    }

    fn from_labels(used: BTreeSet<Label>) -> Self {
        let mut index_to_label = Vec::with_capacity(used.len() + 1);
        let mut label_to_index = HashMap::with_capacity(used.len() + 1);
        index_to_label.push(EPSILON);
        label_to_index.insert(EPSILON, 0);
        for label in used {
            label_to_index.insert(label, index_to_label.len() as u32);
            index_to_label.push(label);
        }
        Self {
            index_to_label,
            label_to_index,
        }
    }

    pub fn len(&self) -> usize {
        self.index_to_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_label.is_empty()
    }

    pub fn index_of(&self, label: Label) -> Option<u32> {
        self.label_to_index.get(&label).copied()
    }

    pub fn label(&self, index: u32) -> Option<Label> {
        self.index_to_label.get(index as usize).copied()
    }

    /// Serialize as `count(u16)` followed by NUL-terminated UTF-8 symbols.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<(), FstError> {
        let count = u16::try_from(self.index_to_label.len()).map_err(|_| {
            FstError::InvalidSymbolTable(format!(
                "{} symbols exceed the table limit",
                self.index_to_label.len()
            ))
        })?;
        out.extend_from_slice(&count.to_le_bytes());
        let mut buf = [0u8; 4];
        for &label in &self.index_to_label {
            if let Some(c) = char_of(label) {
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            out.push(0);
        }
        Ok(())
    }
}

/// Parse a symbol table starting at `offset`.
///
/// Returns the table and the byte offset immediately after it (before
/// padding). The caller aligns this offset to the record boundary.
pub fn parse_symbol_table(data: &[u8], offset: usize) -> Result<(SymbolTable, usize), FstError> {
    if offset + 2 > data.len() {
        return Err(FstError::TooShort {
            expected: offset + 2,
            actual: data.len(),
        });
    }

    let symbol_count = u16::from_le_bytes([data[offset], data[offset + 1]]);
    let mut pos = offset + 2;
    let mut used = BTreeSet::new();

    for i in 0..symbol_count {
        let str_start = pos;
        while pos < data.len() && data[pos] != 0 {
            pos += 1;
        }
        if pos >= data.len() {
            return Err(FstError::InvalidSymbolTable(
                "unterminated symbol string".to_string(),
            ));
        }
        let symbol_bytes = &data[str_start..pos];
        pos += 1;

        if i == 0 {
            if !symbol_bytes.is_empty() {
                return Err(FstError::InvalidSymbolTable(
                    "symbol 0 must be epsilon".to_string(),
                ));
            }
            continue;
        }
        let symbol = std::str::from_utf8(symbol_bytes).map_err(|_| {
            FstError::InvalidSymbolTable(format!("invalid UTF-8 in symbol {i}"))
        })?;
        let mut chars = symbol.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                if !used.insert(label_of(c)) {
                    return Err(FstError::InvalidSymbolTable(format!(
                        "duplicate symbol {symbol:?}"
                    )));
                }
            }
            _ => {
                return Err(FstError::InvalidSymbolTable(format!(
                    "symbol {i} is not a single character"
                )));
            }
        }
    }

    Ok((SymbolTable::from_labels(used), pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_from_fst_is_sorted_with_epsilon_first() {
        let fst = VectorFst::cross("ba", "क");
        let table = SymbolTable::from_fst(&fst);
        assert_eq!(table.label(0), Some(EPSILON));
        assert_eq!(table.label(1), Some('a' as Label));
        assert_eq!(table.label(2), Some('b' as Label));
        assert_eq!(table.index_of('क' as Label), Some(3));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn write_then_parse() {
        let fst = VectorFst::cross("x1", "दस");
        let table = SymbolTable::from_fst(&fst);
        let mut buf = vec![0xAA; 3];
        table.write(&mut buf).unwrap();
        let (parsed, end) = parse_symbol_table(&buf, 3).unwrap();
        assert_eq!(end, buf.len());
        assert_eq!(parsed.index_to_label, table.index_to_label);
    }

    #[test]
    fn reject_unterminated() {
        let buf = [2u8, 0, 0, b'a'];
        assert!(matches!(
            parse_symbol_table(&buf, 0),
            Err(FstError::InvalidSymbolTable(_))
        ));
    }

    #[test]
    fn reject_multi_char_symbol() {
        let buf = [2u8, 0, 0, b'a', b'b', 0];
        assert!(matches!(
            parse_symbol_table(&buf, 0),
            Err(FstError::InvalidSymbolTable(_))
        ));
    }

    #[test]
    fn reject_truncated_count() {
        assert!(matches!(
            parse_symbol_table(&[1u8], 0),
            Err(FstError::TooShort { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn display_labels() {
        assert_eq!(display_label(EPSILON), "<eps>");
        assert_eq!(display_label(' ' as Label), "<space>");
        assert_eq!(display_label('क' as Label), "क");
    }
}
