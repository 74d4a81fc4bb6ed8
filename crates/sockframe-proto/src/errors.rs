//! Protocol error types.

use thiserror::Error;

use crate::header::FrameHeader;

/// Errors produced while building or parsing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The first four bytes are not the start marker.
    #[error("invalid magic {found:#010x} (expected {expected:#010x})", expected = FrameHeader::MAGIC)]
    InvalidMagic {
        /// Magic value read from the wire
        found: u32,
    },

    /// Start marker is correct but the version is not one we speak.
    #[error("unsupported protocol version {found} (expected {expected})", expected = FrameHeader::VERSION)]
    UnsupportedVersion {
        /// Version byte read from the wire
        found: u8,
    },

    /// Not enough bytes to hold a header.
    #[error("frame too short: need {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Minimum number of bytes required
        expected: usize,
        /// Number of bytes supplied
        actual: usize,
    },

    /// Payload does not fit in the one-byte length field.
    #[error("payload of {len} bytes exceeds maximum of {max}")]
    PayloadTooLarge {
        /// Requested payload size
        len: usize,
        /// Largest payload the frame can describe
        max: usize,
    },

    /// Header length field disagrees with the bytes that follow it.
    #[error("header declares {declared} payload bytes but {actual} follow")]
    LengthMismatch {
        /// Length from the header
        declared: usize,
        /// Bytes actually present after the header
        actual: usize,
    },
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
