//! zlib framing (RFC 1950) around DEFLATE blocks.

use super::bit_reader::BitReader;
use super::inflate::BlockDecoder;
use crate::adler32::adler32;
use crate::error::{Error, Result};
use crate::options::InflateOptions;

/// Parsed 2-byte zlib header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibHeader {
    /// Compression method and info byte.
    pub cmf: u8,
    /// Flags byte.
    pub flg: u8,
}

impl ZlibHeader {
    /// Length of the header in bytes.
    pub const LEN: usize = 2;

    /// Parse and validate the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (cmf, flg) = match data {
            [cmf, flg, ..] => (*cmf, *flg),
            _ => return Err(Error::InvalidHeader),
        };

        // Check compression method (must be 8 = deflate)
        if cmf & 0x0F != 8 {
            return Err(Error::UnsupportedCompressionMethod(cmf & 0x0F));
        }

        if (((cmf as u16) << 8) | (flg as u16)) % 31 != 0 {
            return Err(Error::BadHeaderChecksum { cmf, flg });
        }

        if flg & 0x20 != 0 {
            return Err(Error::UnsupportedPreset);
        }

        Ok(Self { cmf, flg })
    }

    /// LZ77 window size declared by CINFO.
    pub fn window_size(&self) -> usize {
        1 << ((self.cmf >> 4) as usize + 8)
    }

    /// FLEVEL hint: 0 (fastest) through 3 (maximum compression).
    pub fn level(&self) -> u8 {
        self.flg >> 6
    }
}

/// Single-use zlib decoder over a complete compressed buffer.
///
/// Construction validates the header; [`Inflater::decode_into`] then
/// decodes the blocks into a caller-sized buffer.
#[derive(Debug, Clone)]
pub struct Inflater<'a> {
    data: &'a [u8],
    header: ZlibHeader,
    options: InflateOptions,
}

impl<'a> Inflater<'a> {
    /// Validate the zlib header of `data` using default options.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Self::with_options(data, InflateOptions::default())
    }

    /// Validate the zlib header of `data`.
    pub fn with_options(data: &'a [u8], options: InflateOptions) -> Result<Self> {
        let header = ZlibHeader::parse(data)?;
        Ok(Self {
            data,
            header,
            options,
        })
    }

    /// The validated stream header.
    pub fn header(&self) -> ZlibHeader {
        self.header
    }

    /// Options this decoder was built with.
    pub fn options(&self) -> InflateOptions {
        self.options
    }

    /// Decode the stream into `output`, returning the bytes written.
    ///
    /// Stops after the final block, or once `output` is full unless the
    /// checksum is being verified.
    pub fn decode_into(self, output: &mut [u8]) -> Result<usize> {
        let capacity = output.len();
        let reader = BitReader::new(&self.data[ZlibHeader::LEN..]);
        let mut decoder = BlockDecoder::new(reader, output);
        let outcome = decoder.run(self.options.verify_checksum)?;
        let mut reader = decoder.into_reader();

        tracing::debug!(
            written = outcome.written,
            capacity,
            blocks = outcome.blocks,
            reached_final = outcome.reached_final,
            trailing = reader.remaining_bytes(),
            "inflated zlib stream"
        );

        if self.options.verify_checksum {
            reader.align_to_byte();
            let trailer = reader.read_aligned_bytes(4)?;
            let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
            let actual = adler32(&output[..outcome.written]);
            if expected != actual {
                return Err(Error::ChecksumMismatch { expected, actual });
            }
        }

        if self.options.require_full_output && outcome.written != capacity {
            return Err(Error::SizeMismatch {
                expected: capacity,
                actual: outcome.written,
            });
        }

        Ok(outcome.written)
    }
}

/// Decode a zlib stream into `output` with default options.
pub fn inflate_zlib_into(data: &[u8], output: &mut [u8]) -> Result<usize> {
    Inflater::new(data)?.decode_into(output)
}

/// Decode a zlib stream whose decompressed size is known in advance.
///
/// The result is exactly `expected_size` bytes; a stream that ends early
/// fails with [`Error::SizeMismatch`].
pub fn inflate_zlib(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let options = InflateOptions::default().require_full_output(true);
    let mut output = vec![0u8; expected_size];
    Inflater::with_options(data, options)?.decode_into(&mut output)?;
    Ok(output)
}

/// Decode raw DEFLATE blocks (no zlib header) into `output`.
pub fn inflate_raw_into(data: &[u8], output: &mut [u8]) -> Result<usize> {
    let outcome = BlockDecoder::new(BitReader::new(data), output).run(false)?;
    Ok(outcome.written)
}
