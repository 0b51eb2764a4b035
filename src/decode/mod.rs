//! zlib/DEFLATE decoding.
//!
//! - [`bit_reader`]: LSB-first bit and Huffman symbol reads.
//! - [`huffman`]: canonical Huffman decode tables.
//! - [`inflate`]: the block decoder (stored, fixed, dynamic).
//! - [`zlib`]: header validation, trailer checks and the public entry points.

pub mod bit_reader;
pub mod huffman;
pub mod inflate;
pub mod zlib;

pub use huffman::HuffmanTable;
pub use inflate::{BlockDecoder, BlockHeader, BlockType, DecodeOutcome};
pub use zlib::{inflate_raw_into, inflate_zlib, inflate_zlib_into, Inflater, ZlibHeader};
