//! Decode-time configuration.

/// Options controlling how strictly a stream is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateOptions {
    /// Verify the Adler-32 trailer after the final block.
    ///
    /// When set, decoding continues to the final block even if the output
    /// buffer is already full, so the trailer can be located.
    pub verify_checksum: bool,
    /// Fail with [`Error::SizeMismatch`](crate::Error::SizeMismatch) if the
    /// final block ends before the output buffer is full.
    pub require_full_output: bool,
}

impl Default for InflateOptions {
    fn default() -> Self {
        Self::lenient()
    }
}

impl InflateOptions {
    /// Decode blocks only; no trailer or size checks (default).
    pub fn lenient() -> Self {
        Self {
            verify_checksum: false,
            require_full_output: false,
        }
    }

    /// Verify the Adler-32 trailer and require the buffer to be filled.
    pub fn strict() -> Self {
        Self {
            verify_checksum: true,
            require_full_output: true,
        }
    }

    /// Set whether the Adler-32 trailer is verified.
    pub fn verify_checksum(mut self, enabled: bool) -> Self {
        self.verify_checksum = enabled;
        self
    }

    /// Set whether an underfilled output buffer is an error.
    pub fn require_full_output(mut self, enabled: bool) -> Self {
        self.require_full_output = enabled;
        self
    }
}
