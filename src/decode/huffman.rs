//! Canonical Huffman decode tables for DEFLATE.
//!
//! A table is a dense array of `2^max_len` entries indexed directly by the
//! next `max_len` bits of the LSB-first stream. Codes are stored
//! bit-reversed so the reader never reverses bits itself.

use std::ops::Range;
use std::sync::OnceLock;

/// Maximum code length for DEFLATE Huffman codes.
pub const MAX_CODE_LENGTH: u8 = 15;

/// Number of symbols in the fixed literal/length alphabet.
const FIXED_LITERAL_SYMBOLS: usize = 288;

/// Number of symbols in the fixed distance alphabet.
const FIXED_DISTANCE_SYMBOLS: usize = 30;

/// Dense Huffman decode table.
///
/// Entry format: bits 16.. hold the code length, the low 16 bits hold the
/// symbol. A zero length marks a bit pattern no code was assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    entries: Vec<u32>,
    max_len: u8,
}

impl HuffmanTable {
    /// Build a table from the code lengths of a whole alphabet.
    pub fn from_lengths(lengths: &[u8]) -> Self {
        Self::build(lengths, 0..lengths.len())
    }

    /// Build a table from `lengths[range]`.
    ///
    /// Symbols are numbered relative to `range.start`. Codes are assigned
    /// canonically: shorter lengths first, and within a length in symbol
    /// order. Symbols with length 0 get no code. Over- or under-subscribed
    /// length sets are not rejected; unfilled slots decode as invalid.
    pub fn build(lengths: &[u8], range: Range<usize>) -> Self {
        let symbols = &lengths[range];
        let max_len = symbols.iter().copied().max().unwrap_or(0);
        debug_assert!(max_len <= MAX_CODE_LENGTH);

        let mut entries = vec![0u32; 1 << max_len];
        let mut code = 0u32;

        for len in 1..=max_len {
            let step = 1usize << len;
            for (symbol, &sym_len) in symbols.iter().enumerate() {
                if sym_len != len {
                    continue;
                }

                let entry = (u32::from(len) << 16) | symbol as u32;
                let reversed = reverse_bits(code, len) as usize;
                for slot in entries.iter_mut().skip(reversed).step_by(step) {
                    *slot = entry;
                }
                code += 1;
            }
            code <<= 1;
        }

        tracing::trace!(max_len, slots = entries.len(), "built huffman table");

        Self { entries, max_len }
    }

    /// Longest code length in the table; also the index width.
    #[inline]
    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    /// Raw entry for the given `max_len`-bit index.
    #[inline]
    pub fn entry(&self, index: usize) -> u32 {
        self.entries[index]
    }

    /// Number of slots (`2^max_len`); at least 1, even with no codes.
    #[inline]
    pub fn slots(&self) -> usize {
        self.entries.len()
    }

    /// Whether any symbol was assigned a code.
    pub fn has_codes(&self) -> bool {
        self.max_len > 0
    }
}

/// Code length stored in a table entry.
#[inline]
pub fn entry_length(entry: u32) -> u8 {
    (entry >> 16) as u8
}

/// Symbol stored in a table entry.
#[inline]
pub fn entry_symbol(entry: u32) -> u16 {
    (entry & 0xFFFF) as u16
}

/// Reverse the low `length` bits of `value`.
fn reverse_bits(value: u32, length: u8) -> u32 {
    let mut result = 0u32;
    let mut v = value;
    for _ in 0..length {
        result = (result << 1) | (v & 1);
        v >>= 1;
    }
    result
}

/// Fixed literal/length table (RFC 1951 section 3.2.6), built once.
pub fn fixed_literal_table() -> &'static HuffmanTable {
    static FIXED_LITERAL: OnceLock<HuffmanTable> = OnceLock::new();

    FIXED_LITERAL.get_or_init(|| {
        let mut lengths = [0u8; FIXED_LITERAL_SYMBOLS];
        lengths[..144].fill(8);
        lengths[144..256].fill(9);
        lengths[256..280].fill(7);
        lengths[280..].fill(8);
        HuffmanTable::from_lengths(&lengths)
    })
}

/// Fixed distance table: 30 symbols of 5 bits, built once.
///
/// Patterns 30 and 31 stay unassigned and decode as invalid.
pub fn fixed_distance_table() -> &'static HuffmanTable {
    static FIXED_DISTANCE: OnceLock<HuffmanTable> = OnceLock::new();

    FIXED_DISTANCE
        .get_or_init(|| HuffmanTable::from_lengths(&[5u8; FIXED_DISTANCE_SYMBOLS]))
}
