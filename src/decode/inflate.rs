//! DEFLATE block decoding (RFC 1951).
//!
//! Decodes stored, fixed-Huffman and dynamic-Huffman blocks straight into a
//! caller-owned output slice of fixed capacity.

use super::bit_reader::BitReader;
use super::huffman::{fixed_distance_table, fixed_literal_table, HuffmanTable};
use crate::error::{Error, Result};

/// Length code base values (codes 257-285).
const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits for length codes.
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Distance code base values (codes 0-29).
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits for distance codes.
const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Order of code length codes for dynamic Huffman.
const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

const END_OF_BLOCK: u16 = 256;

/// Block encoding from the 2-bit BTYPE field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// Uncompressed, byte-aligned passthrough.
    Stored,
    /// Huffman codes fixed by RFC 1951.
    Fixed,
    /// Huffman codes transmitted in the block.
    Dynamic,
}

/// Parsed 3-bit block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// BFINAL: no blocks follow this one.
    pub is_final: bool,
    /// BTYPE.
    pub block_type: BlockType,
}

/// How a [`BlockDecoder::run`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOutcome {
    /// Bytes written to the output.
    pub written: usize,
    /// Whether the final block was decoded.
    pub reached_final: bool,
    /// Number of blocks decoded.
    pub blocks: usize,
}

/// Block-at-a-time DEFLATE decoder writing into a fixed-capacity buffer.
///
/// Single use: the output cursor only moves forward.
pub struct BlockDecoder<'a, 'o> {
    reader: BitReader<'a>,
    output: &'o mut [u8],
    pos: usize,
}

impl<'a, 'o> BlockDecoder<'a, 'o> {
    /// Create a decoder reading blocks from `reader` into `output`.
    pub fn new(reader: BitReader<'a>, output: &'o mut [u8]) -> Self {
        Self {
            reader,
            output,
            pos: 0,
        }
    }

    /// Decode blocks until the final block, or until the output is full
    /// when `until_final` is false.
    pub fn run(&mut self, until_final: bool) -> Result<DecodeOutcome> {
        let mut blocks = 0;
        loop {
            let header = self.read_header()?;
            tracing::debug!(
                block = blocks,
                kind = ?header.block_type,
                is_final = header.is_final,
                offset = self.pos,
                "inflating block"
            );

            match header.block_type {
                BlockType::Stored => self.stored_block()?,
                BlockType::Fixed => {
                    self.huffman_block(fixed_literal_table(), fixed_distance_table())?
                }
                BlockType::Dynamic => {
                    let (lit_table, dist_table) = self.read_dynamic_tables()?;
                    self.huffman_block(&lit_table, &dist_table)?;
                }
            }
            blocks += 1;

            let full = self.pos == self.output.len();
            if header.is_final || (full && !until_final) {
                return Ok(DecodeOutcome {
                    written: self.pos,
                    reached_final: header.is_final,
                    blocks,
                });
            }
        }
    }

    /// Give back the bit reader, positioned after the last decoded block.
    pub fn into_reader(self) -> BitReader<'a> {
        self.reader
    }

    fn read_header(&mut self) -> Result<BlockHeader> {
        let bits = self.reader.read_bits(3)?;
        let block_type = match bits >> 1 {
            0 => BlockType::Stored,
            1 => BlockType::Fixed,
            2 => BlockType::Dynamic,
            _ => return Err(Error::UnknownBlockType),
        };
        Ok(BlockHeader {
            is_final: bits & 1 == 1,
            block_type,
        })
    }

    /// Claim the next `len` output bytes.
    fn reserve(&mut self, len: usize) -> Result<&mut [u8]> {
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.output.len())
            .ok_or(Error::OutputOverflow {
                capacity: self.output.len(),
            })?;
        self.pos = end;
        Ok(&mut self.output[start..end])
    }

    /// Copy a stored (uncompressed) block.
    fn stored_block(&mut self) -> Result<()> {
        self.reader.align_to_byte();

        let header = self.reader.read_aligned_bytes(4)?;
        let len = u16::from_le_bytes([header[0], header[1]]);
        let nlen = u16::from_le_bytes([header[2], header[3]]);
        if nlen != !len {
            return Err(Error::BadStoredBlockChecksum { len, nlen });
        }

        let bytes = self.reader.read_aligned_bytes(len as usize)?;
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Read the code length tables that open a dynamic block.
    fn read_dynamic_tables(&mut self) -> Result<(HuffmanTable, HuffmanTable)> {
        let hlit = self.reader.read_bits(5)? as usize + 257; // 257-288
        let hdist = self.reader.read_bits(5)? as usize + 1; // 1-32
        let hclen = self.reader.read_bits(4)? as usize + 4; // 4-19

        let mut cl_lengths = [0u8; 19];
        for &symbol in CODE_LENGTH_ORDER.iter().take(hclen) {
            cl_lengths[symbol] = self.reader.read_bits(3)? as u8;
        }
        let cl_table = HuffmanTable::from_lengths(&cl_lengths);

        let total = hlit + hdist;
        let mut lengths = vec![0u8; total];
        let mut i = 0;
        while i < total {
            let symbol = self.reader.read_symbol(&cl_table)?;
            let (value, repeat) = match symbol {
                0..=15 => {
                    lengths[i] = symbol as u8;
                    i += 1;
                    continue;
                }
                // Repeat previous length 3-6 times
                16 => {
                    let prev = i.checked_sub(1).map_or(0, |p| lengths[p]);
                    (prev, 3 + self.reader.read_bits(2)? as usize)
                }
                // Repeat zero 3-10 times
                17 => (0, 3 + self.reader.read_bits(3)? as usize),
                // Repeat zero 11-138 times
                18 => (0, 11 + self.reader.read_bits(7)? as usize),
                _ => return Err(Error::InvalidHuffmanCode),
            };

            let end = i + repeat;
            if end > total {
                return Err(Error::InvalidHuffmanCode);
            }
            lengths[i..end].fill(value);
            i = end;
        }

        tracing::trace!(hlit, hdist, hclen, "read dynamic code lengths");

        Ok((
            HuffmanTable::build(&lengths, 0..hlit),
            HuffmanTable::build(&lengths, hlit..total),
        ))
    }

    /// Decode literal/length and distance symbols until end-of-block.
    fn huffman_block(&mut self, lit_table: &HuffmanTable, dist_table: &HuffmanTable) -> Result<()> {
        loop {
            let symbol = self.reader.read_symbol(lit_table)?;

            match symbol {
                0..=255 => {
                    self.reserve(1)?[0] = symbol as u8;
                }
                END_OF_BLOCK => return Ok(()),
                257..=285 => {
                    let len_idx = (symbol - 257) as usize;
                    let length = LENGTH_BASE[len_idx] as usize
                        + self.reader.read_bits(LENGTH_EXTRA[len_idx])? as usize;

                    let dist_idx = self.reader.read_symbol(dist_table)? as usize;
                    if dist_idx >= DISTANCE_BASE.len() {
                        return Err(Error::InvalidHuffmanCode);
                    }
                    let distance = DISTANCE_BASE[dist_idx] as usize
                        + self.reader.read_bits(DISTANCE_EXTRA[dist_idx])? as usize;

                    self.copy_match(distance, length)?;
                }
                _ => return Err(Error::InvalidHuffmanCode),
            }
        }
    }

    /// Copy `length` bytes from `distance` bytes back, one byte at a time
    /// so overlapping runs repeat.
    fn copy_match(&mut self, distance: usize, length: usize) -> Result<()> {
        if distance > self.pos {
            return Err(Error::InvalidDistance {
                distance,
                available: self.pos,
            });
        }

        let start = self.pos;
        self.reserve(length)?;
        for i in start..start + length {
            self.output[i] = self.output[i - distance];
        }
        Ok(())
    }
}
