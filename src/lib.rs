//! # zinflate
//!
//! A minimal-dependency zlib/DEFLATE decoder for buffers whose decompressed
//! size is known in advance.
//!
//! The decoder validates the 2-byte zlib header (RFC 1950), then decodes
//! stored, fixed-Huffman and dynamic-Huffman blocks (RFC 1951) straight into
//! a caller-owned output slice. It never grows the output: writing past it
//! is an error.
//!
//! ## Features
//!
//! - **No allocation beyond per-block Huffman tables**
//! - **Distinct, matchable error kinds** for every failure
//! - Optional Adler-32 trailer verification
//! - Optional `zinflate` command-line tool via the `cli` feature
//!
//! ## Example
//!
//! ```rust
//! use zinflate::{Inflater, InflateOptions};
//!
//! // zlib stream for "hi" (one stored block)
//! let data = [0x78, 0x01, 0x01, 0x02, 0x00, 0xFD, 0xFF, b'h', b'i', 0x01, 0x3B, 0x00, 0xD2];
//!
//! let mut output = [0u8; 2];
//! let inflater = Inflater::with_options(&data, InflateOptions::strict()).unwrap();
//! let written = inflater.decode_into(&mut output).unwrap();
//! assert_eq!(&output[..written], b"hi");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adler32;
pub mod decode;
pub mod error;
pub mod options;

pub use adler32::adler32;
pub use decode::{inflate_raw_into, inflate_zlib, inflate_zlib_into, Inflater, ZlibHeader};
pub use error::{Error, Result};
pub use options::InflateOptions;
