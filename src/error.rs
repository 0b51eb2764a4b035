//! Error types for the zinflate library.

use std::fmt;

/// Result type alias for zinflate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a zlib/DEFLATE stream.
///
/// Every variant is fatal: a failed decode leaves no usable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The 2-byte zlib header is missing.
    InvalidHeader,
    /// The header's compression method is not DEFLATE (8).
    UnsupportedCompressionMethod(u8),
    /// `(CMF * 256 + FLG)` is not a multiple of 31.
    BadHeaderChecksum {
        /// Compression method and flags byte.
        cmf: u8,
        /// Flags byte.
        flg: u8,
    },
    /// The stream requires a preset dictionary.
    UnsupportedPreset,
    /// Fewer input bits remain than the decoder needs.
    TruncatedStream,
    /// A Huffman lookup resolved to an unassigned or inconsistent code.
    InvalidHuffmanCode,
    /// Reserved block type 3.
    UnknownBlockType,
    /// Stored block `NLEN` is not the one's complement of `LEN`.
    BadStoredBlockChecksum {
        /// Declared block length.
        len: u16,
        /// Declared complement.
        nlen: u16,
    },
    /// A back-reference points before the start of the output.
    InvalidDistance {
        /// Requested distance.
        distance: usize,
        /// Bytes produced so far.
        available: usize,
    },
    /// Decoding would write past the end of the output buffer.
    OutputOverflow {
        /// Size of the caller's buffer.
        capacity: usize,
    },
    /// The Adler-32 trailer does not match the decoded bytes.
    ChecksumMismatch {
        /// Checksum stored in the stream.
        expected: u32,
        /// Checksum of the decoded output.
        actual: u32,
    },
    /// The stream ended before the output buffer was filled.
    SizeMismatch {
        /// Size of the caller's buffer.
        expected: usize,
        /// Bytes actually decoded.
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidHeader => write!(f, "Invalid header: zlib stream too short"),
            Error::UnsupportedCompressionMethod(method) => {
                write!(f, "Unsupported compression method {}", method)
            }
            Error::BadHeaderChecksum { cmf, flg } => {
                write!(
                    f,
                    "Bad header checksum: CMF={:#04x}, FLG={:#04x}",
                    cmf, flg
                )
            }
            Error::UnsupportedPreset => write!(f, "Preset dictionaries are not supported"),
            Error::TruncatedStream => write!(f, "Unexpected end of compressed stream"),
            Error::InvalidHuffmanCode => write!(f, "Invalid Huffman code"),
            Error::UnknownBlockType => write!(f, "Unknown block type 3"),
            Error::BadStoredBlockChecksum { len, nlen } => {
                write!(
                    f,
                    "Stored block length mismatch: LEN={:#06x}, NLEN={:#06x}",
                    len, nlen
                )
            }
            Error::InvalidDistance {
                distance,
                available,
            } => {
                write!(
                    f,
                    "Invalid distance {} with only {} bytes decoded",
                    distance, available
                )
            }
            Error::OutputOverflow { capacity } => {
                write!(f, "Output exceeds buffer capacity of {} bytes", capacity)
            }
            Error::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "Adler32 mismatch: expected {:08X}, got {:08X}",
                    expected, actual
                )
            }
            Error::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Decompressed size mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for Error {}
