//! Adler-32 of decompressed bytes, for checking the 4-byte big-endian
//! trailer that ends a zlib stream.

const BASE: u32 = 65_521;

/// Bytes that can be summed before either running sum can overflow a `u32`.
const NMAX: usize = 5552;

/// Adler-32 of `data`, in the form stored in a zlib trailer.
///
/// An empty input checksums to 1.
#[inline]
#[must_use]
pub fn adler32(data: &[u8]) -> u32 {
    let (mut a, mut b) = (1u32, 0u32);

    for block in data.chunks(NMAX) {
        for &byte in block {
            a += u32::from(byte);
            b += a;
        }
        a %= BASE;
        b %= BASE;
    }

    (b << 16) | a
}
