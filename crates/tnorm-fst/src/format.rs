// Binary archive of named transducers: header parsing, writing and loading.
//
// Layout (little-endian):
//   header (16 bytes): cookie1 u32, cookie2 u32, version u8, 3 reserved bytes,
//                      entry count u32
//   per entry:
//     name length u16, name bytes (UTF-8)
//     symbol table: count u16, NUL-terminated symbols, epsilon first
//     zero padding to a 16-byte boundary
//     counts record (16 bytes)
//     state records (16 bytes each)
//     transition records (32 bytes each)

use std::fs;
use std::path::Path;

use crate::FstError;
use crate::fst::{State, Transition, VectorFst};
use crate::symbols::{self, SymbolTable};
use crate::transition::{NO_START, PackedCounts, PackedState, PackedTransition};
use crate::weight::Weight;

/// Archive magic constants.
const COOKIE1: u32 = 0x0002_7F4E;
const COOKIE2: u32 = 0x0004_A15C;

/// Current archive format version.
pub const VERSION: u8 = 1;

/// Size of the archive header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Record alignment inside the archive.
const ALIGN: usize = 16;

/// Parsed archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub version: u8,
    pub entry_count: u32,
}

/// Parses and validates the 16-byte archive header.
pub fn parse_header(data: &[u8]) -> Result<ArchiveHeader, FstError> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let cookie1 = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let cookie2 = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if cookie1 != COOKIE1 || cookie2 != COOKIE2 || data[8] != VERSION {
        return Err(FstError::InvalidMagic);
    }
    let entry_count = u32::from_le_bytes([data[12], data[13], data[14], data[15]]);

    Ok(ArchiveHeader {
        version: data[8],
        entry_count,
    })
}

fn pad_to_alignment(out: &mut Vec<u8>) {
    let partial = out.len() % ALIGN;
    if partial > 0 {
        out.resize(out.len() + (ALIGN - partial), 0);
    }
}

fn aligned(offset: usize) -> usize {
    let partial = offset % ALIGN;
    if partial > 0 {
        offset + (ALIGN - partial)
    } else {
        offset
    }
}

/// Serialize named transducers into an archive.
pub fn write_archive(entries: &[(&str, &VectorFst)]) -> Result<Vec<u8>, FstError> {
    let mut out = Vec::new();
    out.extend_from_slice(&COOKIE1.to_le_bytes());
    out.extend_from_slice(&COOKIE2.to_le_bytes());
    out.push(VERSION);
    out.extend_from_slice(&[0u8; 3]);
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());

    for &(name, fst) in entries {
        let name_len = u16::try_from(name.len())
            .map_err(|_| FstError::InvalidSymbolTable(format!("entry name too long: {name}")))?;
        out.extend_from_slice(&name_len.to_le_bytes());
        out.extend_from_slice(name.as_bytes());

        let table = SymbolTable::from_fst(fst);
        table.write(&mut out)?;
        pad_to_alignment(&mut out);

        let mut states = Vec::with_capacity(fst.num_states());
        let mut transitions = Vec::with_capacity(fst.num_transitions());
        for s in fst.state_ids() {
            let arcs = fst.transitions(s);
            states.push(PackedState {
                first_transition: transitions.len() as u32,
                transition_count: arcs.len() as u32,
                final_weight: fst.final_weight(s).ticks(),
            });
            for t in arcs {
                let index = |label| {
                    table.index_of(label).ok_or_else(|| {
                        FstError::InvalidSymbolTable(format!("label {label} missing from table"))
                    })
                };
                transitions.push(PackedTransition::new(
                    index(t.ilabel)?,
                    index(t.olabel)?,
                    t.target,
                    t.weight.ticks(),
                ));
            }
        }

        let counts = PackedCounts {
            state_count: states.len() as u32,
            transition_count: transitions.len() as u32,
            start_state: fst.start().unwrap_or(NO_START),
            _reserved: 0,
        };
        out.extend_from_slice(bytemuck::bytes_of(&counts));
        out.extend_from_slice(bytemuck::cast_slice(&states));
        out.extend_from_slice(bytemuck::cast_slice(&transitions));
    }
    Ok(out)
}

/// Copy `count` records of type `T` starting at `offset` into an aligned Vec.
fn read_records<T: bytemuck::Pod>(
    data: &[u8],
    offset: usize,
    count: usize,
) -> Result<Vec<T>, FstError> {
    let size = count * size_of::<T>();
    let end = offset + size;
    if end > data.len() {
        return Err(FstError::TooShort {
            expected: end,
            actual: data.len(),
        });
    }
    let mut records = vec![T::zeroed(); count];
    bytemuck::cast_slice_mut::<T, u8>(&mut records).copy_from_slice(&data[offset..end]);
    Ok(records)
}

/// Parse every entry of an archive.
pub fn read_archive(data: &[u8]) -> Result<Vec<(String, VectorFst)>, FstError> {
    let header = parse_header(data)?;
    let mut pos = HEADER_SIZE;
    let mut entries = Vec::with_capacity(header.entry_count as usize);

    for _ in 0..header.entry_count {
        if pos + 2 > data.len() {
            return Err(FstError::TooShort {
                expected: pos + 2,
                actual: data.len(),
            });
        }
        let name_len = u16::from_le_bytes([data[pos], data[pos + 1]]) as usize;
        pos += 2;
        if pos + name_len > data.len() {
            return Err(FstError::TooShort {
                expected: pos + name_len,
                actual: data.len(),
            });
        }
        let name = std::str::from_utf8(&data[pos..pos + name_len])
            .map_err(|_| FstError::InvalidSymbolTable("invalid UTF-8 in entry name".to_string()))?
            .to_string();
        pos += name_len;

        let (table, sym_end) = symbols::parse_symbol_table(data, pos)?;
        pos = aligned(sym_end);
        if pos > data.len() {
            return Err(FstError::AlignmentError);
        }

        let counts = read_records::<PackedCounts>(data, pos, 1)?[0];
        pos += size_of::<PackedCounts>();
        let states: Vec<PackedState> = read_records(data, pos, counts.state_count as usize)?;
        pos += states.len() * size_of::<PackedState>();
        let transitions: Vec<PackedTransition> =
            read_records(data, pos, counts.transition_count as usize)?;
        pos += transitions.len() * size_of::<PackedTransition>();

        entries.push((name, unpack(&table, &counts, &states, &transitions)?));
    }
    Ok(entries)
}

fn unpack(
    table: &SymbolTable,
    counts: &PackedCounts,
    states: &[PackedState],
    transitions: &[PackedTransition],
) -> Result<VectorFst, FstError> {
    let label = |index: u32| {
        table
            .label(index)
            .ok_or_else(|| FstError::InvalidSymbolTable(format!("symbol index {index} out of range")))
    };
    let mut unpacked = Vec::with_capacity(states.len());
    for state in states {
        let first = state.first_transition as usize;
        let last = first + state.transition_count as usize;
        let arcs = transitions.get(first..last).ok_or(FstError::AlignmentError)?;
        let mut out = Vec::with_capacity(arcs.len());
        for t in arcs {
            if t.target_state as usize >= states.len() {
                return Err(FstError::AlignmentError);
            }
            out.push(Transition::new(
                label(t.sym_in)?,
                label(t.sym_out)?,
                Weight::from_ticks(t.weight),
                t.target_state,
            ));
        }
        unpacked.push(State {
            transitions: out,
            final_weight: Weight::from_ticks(state.final_weight),
        });
    }
    let start = match counts.start_state {
        NO_START => None,
        s if (s as usize) < states.len() => Some(s),
        _ => return Err(FstError::NoStartState),
    };
    Ok(VectorFst::from_parts(unpacked, start))
}

/// Write an archive file.
pub fn save_archive(path: &Path, entries: &[(&str, &VectorFst)]) -> Result<(), FstError> {
    let bytes = write_archive(entries)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Read an archive file.
pub fn load_archive(path: &Path) -> Result<Vec<(String, VectorFst)>, FstError> {
    let bytes = fs::read(path)?;
    read_archive(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::ops::{add_weight, union};

    fn sample() -> VectorFst {
        let a = add_weight(&VectorFst::cross("12", "बारह"), Weight::new(-0.1));
        let b = add_weight(&VectorFst::cross("1.5", "डेढ़"), Weight::new(1.05));
        Grammar::new("sample", &union(&a, &b)).unwrap().into_fst()
    }

    #[test]
    fn header_round_trip() {
        let bytes = write_archive(&[]).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.version, VERSION);
        assert_eq!(header.entry_count, 0);
    }

    #[test]
    fn reject_too_short() {
        let err = parse_header(&[0u8; 8]).unwrap_err();
        assert!(matches!(err, FstError::TooShort { expected: 16, actual: 8 }));
    }

    #[test]
    fn reject_invalid_magic() {
        let mut bytes = write_archive(&[]).unwrap();
        bytes[0] = 0xFF;
        assert!(matches!(parse_header(&bytes), Err(FstError::InvalidMagic)));
    }

    #[test]
    fn reject_unknown_version() {
        let mut bytes = write_archive(&[]).unwrap();
        bytes[8] = VERSION + 1;
        assert!(matches!(parse_header(&bytes), Err(FstError::InvalidMagic)));
    }

    #[test]
    fn archive_preserves_transducers() {
        let fst = sample();
        let empty = VectorFst::empty();
        let bytes = write_archive(&[("measure", &fst), ("nothing", &empty)]).unwrap();
        let entries = read_archive(&bytes).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "measure");
        assert_eq!(entries[0].1, fst);
        assert!(entries[1].1.is_empty());

        let restored = Grammar::from_optimized("measure", entries[0].1.clone());
        let best = restored.best("1.5").unwrap();
        assert_eq!(best.output, "डेढ़");
        assert_eq!(best.weight, Weight::new(1.05));
    }

    #[test]
    fn reject_truncated_records() {
        let fst = sample();
        let bytes = write_archive(&[("measure", &fst)]).unwrap();
        let truncated = &bytes[..bytes.len() - 8];
        assert!(matches!(
            read_archive(truncated),
            Err(FstError::TooShort { .. })
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = std::env::temp_dir().join(format!("tnorm-format-{}", std::process::id()));
        let path = dir.join("hi_tn_test.far");
        let fst = sample();
        save_archive(&path, &[("g", &fst)]).unwrap();
        let entries = load_archive(&path).unwrap();
        assert_eq!(entries[0].1, fst);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
