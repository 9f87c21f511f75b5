// Plain-old-data state and transition records for archived transducers.

use bytemuck::{Pod, Zeroable};

/// Sentinel start state index meaning "no start state".
pub const NO_START: u32 = 0xFFFF_FFFF;

/// Archived state (16 bytes).
///
/// - `first_transition` (u32): index of the state's first record in the
///   transition table
/// - `transition_count` (u32): number of consecutive records
/// - `final_weight` (i64): final weight in ticks, `i64::MAX` when not final
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PackedState {
    pub first_transition: u32,
    pub transition_count: u32,
    pub final_weight: i64,
}

/// Archived transition (32 bytes).
///
/// - `sym_in` (u32): input symbol index
/// - `sym_out` (u32): output symbol index
/// - `target_state` (u32): target state index
/// - `_reserved` (u32): zero
/// - `weight` (i64): arc weight in ticks
/// - `_padding` (u64): zero
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PackedTransition {
    pub sym_in: u32,
    pub sym_out: u32,
    pub target_state: u32,
    pub _reserved: u32,
    pub weight: i64,
    pub _padding: u64,
}

impl PackedTransition {
    pub fn new(sym_in: u32, sym_out: u32, target_state: u32, weight: i64) -> Self {
        Self {
            sym_in,
            sym_out,
            target_state,
            _reserved: 0,
            weight,
            _padding: 0,
        }
    }
}

/// Archive entry table header (16 bytes), written after each symbol table.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PackedCounts {
    pub state_count: u32,
    pub transition_count: u32,
    pub start_state: u32,
    pub _reserved: u32,
}

// Static assertions for struct sizes
const _: () = assert!(size_of::<PackedState>() == 16);
const _: () = assert!(size_of::<PackedTransition>() == 32);
const _: () = assert!(size_of::<PackedCounts>() == 16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes() {
        assert_eq!(size_of::<PackedState>(), 16);
        assert_eq!(size_of::<PackedTransition>(), 32);
        assert_eq!(size_of::<PackedCounts>(), 16);
    }

    #[test]
    fn read_transition_from_bytes() {
        let mut raw = [0u8; 32];
        raw[0] = 0x01; // sym_in = 1
        raw[4] = 0x02; // sym_out = 2
        raw[8] = 0x03; // target_state = 3
        raw[16..24].copy_from_slice(&(-5000i64).to_le_bytes()); // weight = -0.5
        let transition: PackedTransition = bytemuck::pod_read_unaligned(&raw);
        assert_eq!(transition, PackedTransition::new(1, 2, 3, -5000));
    }

    #[test]
    fn zero_copy_cast_state() {
        let state = PackedState {
            first_transition: 7,
            transition_count: 2,
            final_weight: i64::MAX,
        };
        let bytes = bytemuck::bytes_of(&state);
        assert_eq!(bytes.len(), 16);
        let back: &PackedState = bytemuck::from_bytes(bytes);
        assert_eq!(*back, state);
    }
}
