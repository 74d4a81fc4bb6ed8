//! Error types for the protocol engine.

use sockframe_proto::{Address, FrameHeader, ProtocolError};
use thiserror::Error;

/// Errors reported synchronously by a send.
///
/// Nothing is queued or retried internally. After any of these the engine is
/// in the same state as before the call, apart from the sequence id, which
/// advances once a frame has been handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// No peer is connected; the message was not sent.
    #[error("no peer connected")]
    NoPeer,

    /// The transport accepted only part of the frame.
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes the transport accepted
        written: usize,
        /// Full frame length
        expected: usize,
    },

    /// The payload does not fit the prepared region or the length field.
    #[error("payload of {len} bytes exceeds maximum of {max}")]
    PayloadTooLarge {
        /// Requested payload length
        len: usize,
        /// Largest length allowed for this send
        max: usize,
    },
}

/// Why the receiver discarded an in-flight frame.
///
/// Receiving never fails from the caller's point of view: a discarded frame
/// looks the same as "no data yet". These values exist for diagnostics and
/// are exposed through [`crate::Receiver::last_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecvError {
    /// Start marker found but the rest of the header did not arrive.
    #[error("header truncated: got {got} of {expected} bytes after the start marker")]
    HeaderTruncated {
        /// Header bytes expected after the marker
        expected: usize,
        /// Header bytes actually read
        got: usize,
    },

    /// Header failed magic or version checks.
    #[error("invalid header: {0}")]
    Invalid(#[from] ProtocolError),

    /// Declared payload does not fit the receive buffer.
    #[error("payload length {length} exceeds receive capacity {max}")]
    Oversized {
        /// Declared payload length
        length: usize,
        /// Largest payload the receive buffer holds
        max: usize,
    },

    /// Payload was announced as available but fewer bytes were read.
    #[error("body truncated: got {got} of {expected} bytes")]
    BodyTruncated {
        /// Declared payload length
        expected: usize,
        /// Payload bytes actually read
        got: usize,
    },

    /// Complete frame addressed to someone else; dropped.
    #[error("frame for {destination} dropped (filter {filter})")]
    AddressMismatch {
        /// Address the caller asked for
        filter: Address,
        /// Address the frame was sent to
        destination: Address,
    },
}

/// Invalid socket configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Receive buffer cannot hold even a header.
    #[error("receive buffer of {capacity} bytes is smaller than the {min}-byte header", min = FrameHeader::SIZE)]
    BufferTooSmall {
        /// Requested capacity
        capacity: usize,
    },
}
