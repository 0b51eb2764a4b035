//! Hand-built DEFLATE streams.
//!
//! Lets tests spell out exact block contents that a real compressor would
//! never emit (bad distances, reserved codes, specific code-length runs).

use zinflate::adler32;

/// LSB-first bit packer.
#[derive(Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_count: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `n` bits of `value`, least significant first.
    pub fn bits(&mut self, value: u32, n: u8) -> &mut Self {
        for i in 0..n {
            if self.bit_count % 8 == 0 {
                self.bytes.push(0);
            }
            let bit = ((value >> i) & 1) as u8;
            let last = self.bytes.len() - 1;
            self.bytes[last] |= bit << (self.bit_count % 8);
            self.bit_count += 1;
        }
        self
    }

    /// Append a Huffman code, most significant bit first.
    pub fn code(&mut self, code: u32, len: u8) -> &mut Self {
        for i in (0..len).rev() {
            self.bits((code >> i) & 1, 1);
        }
        self
    }

    /// Block header: BFINAL then BTYPE.
    pub fn block_header(&mut self, is_final: bool, block_type: u32) -> &mut Self {
        self.bits(is_final as u32, 1).bits(block_type, 2)
    }

    /// Fixed-Huffman literal/length symbol (0-287).
    pub fn fixed_symbol(&mut self, symbol: u16) -> &mut Self {
        let symbol = symbol as u32;
        match symbol {
            0..=143 => self.code(0x30 + symbol, 8),
            144..=255 => self.code(0x190 + (symbol - 144), 9),
            256..=279 => self.code(symbol - 256, 7),
            _ => self.code(0xC0 + (symbol - 280), 8),
        }
    }

    /// Fixed-Huffman distance symbol (0-31).
    pub fn fixed_distance(&mut self, symbol: u32) -> &mut Self {
        self.code(symbol, 5)
    }

    /// Fixed-Huffman end-of-block.
    pub fn end_of_block(&mut self) -> &mut Self {
        self.fixed_symbol(256)
    }

    pub fn finish(&mut self) -> Vec<u8> {
        self.bit_count = 0;
        std::mem::take(&mut self.bytes)
    }
}

/// Prefix a zlib header (no dictionary, fastest level).
pub fn zlib_header(deflate: &[u8]) -> Vec<u8> {
    let mut out = vec![0x78, 0x01];
    out.extend_from_slice(deflate);
    out
}

/// Prefix a zlib header and append the Adler-32 of `original`.
pub fn zlib_wrap(deflate: &[u8], original: &[u8]) -> Vec<u8> {
    let mut out = zlib_header(deflate);
    out.extend_from_slice(&adler32(original).to_be_bytes());
    out
}

/// A single final stored block holding `payload` (at most 65535 bytes).
pub fn stored_block(payload: &[u8]) -> Vec<u8> {
    let len = payload.len() as u16;
    let mut out = vec![0b0000_0001];
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
    out.extend_from_slice(payload);
    out
}
