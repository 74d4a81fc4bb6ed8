//! Transport abstraction for point-to-point byte streams.
//!
//! The engine needs very little from a transport: a way to pick up a newly
//! connected peer, and non-blocking byte I/O on that peer. Production uses
//! [`tcp::TcpTransport`]; tests use the in-memory pipe from
//! `sockframe-harness`.
//!
//! Every method must return promptly. A read with nothing to deliver returns
//! `None` or a short count, a write the transport cannot take returns a short
//! count. Nothing here may block waiting for the remote side.

pub mod tcp;

/// A source of inbound peers.
pub trait Transport {
    /// Handle to one connected peer.
    type Peer: PeerStream;

    /// Whether a newly connected peer is waiting to be accepted.
    fn has_pending_peer(&mut self) -> bool;

    /// Take the next waiting peer, if any.
    fn accept_peer(&mut self) -> Option<Self::Peer>;
}

/// Non-blocking byte I/O on a connected peer.
pub trait PeerStream {
    /// Whether the remote side has closed. Bytes it sent before closing may
    /// still be buffered.
    fn is_closed(&mut self) -> bool;

    /// Whether the peer is still usable.
    ///
    /// A peer that has closed its side but still has unread bytes buffered
    /// counts as connected until those bytes are consumed.
    fn is_connected(&mut self) -> bool {
        !self.is_closed() || self.bytes_available() > 0
    }

    /// Number of bytes that can be read right now without waiting.
    fn bytes_available(&mut self) -> usize;

    /// Read one byte, or `None` if nothing is available.
    fn read_byte(&mut self) -> Option<u8>;

    /// Fill as much of `buf` as is available and return the count.
    ///
    /// Unlike [`std::io::Read::read_exact`] this never waits; a short count is
    /// a normal outcome.
    fn read_exact(&mut self, buf: &mut [u8]) -> usize;

    /// Write as much of `bytes` as the transport accepts and return the count.
    fn write(&mut self, bytes: &[u8]) -> usize;
}
