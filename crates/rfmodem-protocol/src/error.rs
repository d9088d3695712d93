//! Error types for the rfmodem protocol.

use thiserror::Error;

/// Errors that can occur when decoding a hex payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    /// Decoded payload would exceed the caller's size limit.
    #[error("payload too long: {size} bytes (max {max})")]
    TooLong {
        /// Decoded byte count of the offered payload.
        size: usize,
        /// Maximum byte count accepted by the caller.
        max: usize,
    },

    /// A character outside `[0-9a-fA-F]`.
    #[error("invalid hex digit {byte:#04x} at position {position}")]
    InvalidDigit {
        /// Zero-based character position within the hex string.
        position: usize,
        /// The offending byte.
        byte: u8,
    },
}
