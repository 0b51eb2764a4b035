//! Bit-level reader for DEFLATE decoding.
//!
//! Provides LSB-first bit reads and table-driven Huffman symbol reads over
//! a borrowed byte slice.

use super::huffman::{entry_length, entry_symbol, HuffmanTable};
use crate::error::{Error, Result};

/// Bit reader for LSB-first bit streams (DEFLATE).
///
/// Between reads the bit buffer holds fewer than 8 bits; whole bytes
/// peeked ahead for a Huffman lookup are handed back to the byte cursor.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_buf: u64,
    bits_in_buf: u8,
}

#[inline]
fn low_mask(n: u8) -> u64 {
    (1u64 << n) - 1
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit_buf: 0,
            bits_in_buf: 0,
        }
    }

    /// Load whole bytes until `n` bits are buffered or the input runs out.
    #[inline]
    fn refill(&mut self, n: u8) {
        while self.bits_in_buf < n && self.pos < self.data.len() {
            self.bit_buf |= (self.data[self.pos] as u64) << self.bits_in_buf;
            self.pos += 1;
            self.bits_in_buf += 8;
        }
    }

    #[inline]
    fn consume(&mut self, n: u8) {
        debug_assert!(n <= self.bits_in_buf);
        self.bit_buf >>= n;
        self.bits_in_buf -= n;
    }

    /// Give unconsumed whole bytes back to the byte cursor.
    #[inline]
    fn unread_whole_bytes(&mut self) {
        let whole = self.bits_in_buf / 8;
        if whole > 0 {
            self.pos -= whole as usize;
            self.bits_in_buf -= whole * 8;
            self.bit_buf &= low_mask(self.bits_in_buf);
        }
    }

    /// Read `n` bits LSB-first.
    ///
    /// The input is checked for enough bytes before anything is consumed.
    ///
    /// # Panics
    ///
    /// Panics if `n > 32`.
    #[inline]
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        assert!(n <= 32, "read_bits: {n} bits requested, at most 32 fit in a u32");
        if n > self.bits_in_buf {
            let needed = (n - self.bits_in_buf).div_ceil(8) as usize;
            if self.data.len() - self.pos < needed {
                return Err(Error::TruncatedStream);
            }
            self.refill(n);
        }
        let val = (self.bit_buf & low_mask(n)) as u32;
        self.consume(n);
        Ok(val)
    }

    /// Decode one Huffman symbol using `table`.
    ///
    /// Peeks up to `table.max_len()` bits (missing bits past the end of
    /// input read as zero) and commits exactly the resolved code length.
    #[inline]
    pub fn read_symbol(&mut self, table: &HuffmanTable) -> Result<u16> {
        let max_len = table.max_len();
        self.refill(max_len);

        let entry = table.entry((self.bit_buf & low_mask(max_len)) as usize);
        let len = entry_length(entry);
        if len == 0 || len > self.bits_in_buf {
            return Err(Error::InvalidHuffmanCode);
        }

        self.consume(len);
        self.unread_whole_bytes();
        Ok(entry_symbol(entry))
    }

    /// Align to byte boundary (discard remaining bits in current byte).
    pub fn align_to_byte(&mut self) {
        let discard = self.bits_in_buf % 8;
        self.consume(discard);
        self.unread_whole_bytes();
    }

    /// Borrow the next `len` raw bytes. The reader must be byte-aligned.
    pub fn read_aligned_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        debug_assert_eq!(self.bits_in_buf, 0);
        let data = self.data;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or(Error::TruncatedStream)?;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Current byte position; a partially consumed byte counts as read.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet loaded into the bit buffer.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_lsb_first() {
        let mut reader = BitReader::new(&[0b1010_1101, 0xFF]);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(2).unwrap(), 0b10);
        assert_eq!(reader.read_bits(5).unwrap(), 0b10101);
        assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
    }

    #[test]
    fn test_read_bits_across_bytes() {
        let mut reader = BitReader::new(&[0x34, 0x12, 0x78, 0x56]);
        assert_eq!(reader.read_bits(4).unwrap(), 0x4);
        assert_eq!(reader.read_bits(16).unwrap(), 0x8123);
        assert_eq!(reader.read_bits(12).unwrap(), 0x567);
        assert_eq!(reader.remaining_bytes(), 0);
    }

    #[test]
    fn test_read_bits_32() {
        let mut reader = BitReader::new(&[0x78, 0x56, 0x34, 0x12, 0x01]);
        assert_eq!(reader.read_bits(3).unwrap(), 0);
        assert_eq!(reader.read_bits(32).unwrap(), 0x2246_8ACF);
    }

    #[test]
    #[should_panic(expected = "at most 32")]
    fn test_read_bits_rejects_wide_reads() {
        let mut reader = BitReader::new(&[0xFF; 8]);
        let _ = reader.read_bits(33);
    }

    #[test]
    fn test_read_bits_zero() {
        let mut reader = BitReader::new(&[]);
        assert_eq!(reader.read_bits(0).unwrap(), 0);
    }

    #[test]
    fn test_read_bits_truncated() {
        let mut reader = BitReader::new(&[0xAB]);
        assert_eq!(reader.read_bits(4).unwrap(), 0xB);
        assert_eq!(reader.read_bits(5), Err(Error::TruncatedStream));
        // Nothing was consumed by the failed read.
        assert_eq!(reader.read_bits(4).unwrap(), 0xA);
    }

    fn fixed_literal_lengths() -> [u8; 288] {
        let mut lengths = [0u8; 288];
        lengths[..144].fill(8);
        lengths[144..256].fill(9);
        lengths[256..280].fill(7);
        lengths[280..].fill(8);
        lengths
    }

    #[test]
    fn test_read_symbol_commits_code_length() {
        // Codes: sym1 = "0", sym0 = "10", sym2 = "110", sym3 = "111".
        let table = HuffmanTable::from_lengths(&[2, 1, 3, 3]);
        // Stream bits in order: 0 | 1 0 | 1 1 1 | 1 1 0
        let mut reader = BitReader::new(&[0b1111_1010, 0b0000_0000]);
        assert_eq!(reader.read_symbol(&table).unwrap(), 1);
        assert_eq!(reader.read_symbol(&table).unwrap(), 0);
        assert_eq!(reader.read_symbol(&table).unwrap(), 3);
        assert_eq!(reader.read_symbol(&table).unwrap(), 2);
    }

    #[test]
    fn test_read_symbol_keeps_whole_bytes_unread() {
        let table = HuffmanTable::from_lengths(&fixed_literal_lengths());
        assert_eq!(table.max_len(), 9);

        // A 9-bit peek loads two bytes; the 7-bit end-of-block code leaves
        // one whole byte that goes back to the byte cursor.
        let mut reader = BitReader::new(&[0x00, 0xAB, 0xCD]);
        assert_eq!(reader.read_symbol(&table).unwrap(), 256);
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        reader.align_to_byte();
        assert_eq!(reader.read_aligned_bytes(2).unwrap(), &[0xAB, 0xCD]);
    }

    #[test]
    fn test_read_symbol_near_end_of_input() {
        // 7-bit code at the very end of input with a 9-bit table.
        let table = HuffmanTable::from_lengths(&fixed_literal_lengths());
        let mut reader = BitReader::new(&[0x00]);
        assert_eq!(reader.read_symbol(&table).unwrap(), 256);
    }

    #[test]
    fn test_read_symbol_truncated_mid_code() {
        let table = HuffmanTable::from_lengths(&[2, 2, 2, 2]);
        let mut reader = BitReader::new(&[0xFF]);
        for _ in 0..4 {
            reader.read_symbol(&table).unwrap();
        }
        assert_eq!(reader.read_symbol(&table), Err(Error::InvalidHuffmanCode));
    }

    #[test]
    fn test_read_symbol_empty_table() {
        let table = HuffmanTable::from_lengths(&[0, 0]);
        let mut reader = BitReader::new(&[0xFF]);
        assert_eq!(reader.read_symbol(&table), Err(Error::InvalidHuffmanCode));
    }

    #[test]
    fn test_align_and_read_bytes() {
        let mut reader = BitReader::new(&[0xFF, 1, 2, 3]);
        reader.read_bits(3).unwrap();
        reader.align_to_byte();
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_aligned_bytes(2).unwrap(), &[1, 2]);
        assert_eq!(reader.read_aligned_bytes(2), Err(Error::TruncatedStream));
        assert_eq!(reader.read_aligned_bytes(1).unwrap(), &[3]);
    }
}
