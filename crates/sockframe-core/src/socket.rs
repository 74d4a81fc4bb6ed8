//! Socket facade: gate, receiver and sender behind one value.

use std::fmt;

use sockframe_proto::{Address, FrameHeader};
use tracing::{debug, trace};

use crate::{
    config::SocketConfig,
    error::{ConfigError, RecvError, SendError},
    gate::ConnectionGate,
    receiver::{Receiver, RecvStats},
    sender::Sender,
    transport::{PeerStream, Transport},
};

/// Framed message socket over a single-peer transport.
///
/// Every method is non-blocking. Call [`Socket::recv`] (or
/// [`Socket::recv_for`]) once per iteration of the application loop; it
/// returns at most one message per call.
pub struct Socket<T: Transport> {
    address: Address,
    gate: ConnectionGate<T>,
    receiver: Receiver,
    sender: Sender,
    /// Gate adoption count the receiver state belongs to.
    peer_generation: u64,
}

impl<T: Transport> Socket<T> {
    /// Create a socket over `transport`.
    pub fn new(transport: T, config: &SocketConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            address: config.address,
            gate: ConnectionGate::new(transport),
            receiver: Receiver::new(config.recv_buffer_size)?,
            sender: Sender::new(config.address),
            peer_generation: 0,
        })
    }

    /// Our logical address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Whether a peer is connected, adopting a waiting one if needed.
    pub fn connected(&mut self) -> bool {
        self.ensure_peer()
    }

    /// Like [`ConnectionGate::ensure_peer`], but also lets go of a closed
    /// peer whose leftover bytes can never complete a frame, and drops any
    /// receive state left over from a previous peer.
    fn ensure_peer(&mut self) -> bool {
        let stalled = self.gate.peer_mut().is_some_and(|peer| {
            peer.is_closed() && !self.receiver.can_advance(peer.bytes_available())
        });
        if stalled {
            debug!(
                state = ?self.receiver.state(),
                "closed peer cannot complete another frame, releasing"
            );
            self.gate.release();
            self.receiver.reset();
        }

        let connected = self.gate.ensure_peer();
        if self.gate.adopted() != self.peer_generation {
            self.peer_generation = self.gate.adopted();
            self.receiver.reset();
        }
        connected
    }

    /// Next message addressed to us.
    pub fn recv(&mut self) -> Option<&[u8]> {
        self.recv_for(self.address)
    }

    /// Next message addressed to `filter`.
    ///
    /// Returns `None` without touching the transport if no peer is connected.
    pub fn recv_for(&mut self, filter: Address) -> Option<&[u8]> {
        if !self.ensure_peer() {
            trace!("recv without connection");
            return None;
        }
        let peer = self.gate.peer_mut()?;
        self.receiver.poll(peer, filter)
    }

    /// Reserve a payload region of up to `payload_capacity` bytes in the send
    /// buffer. Write the payload into it, then call [`Self::send_to`].
    pub fn prepare(&mut self, payload_capacity: usize) -> &mut [u8] {
        self.sender.prepare(payload_capacity)
    }

    /// Send the first `len` bytes of the prepared region to `destination`.
    pub fn send_to(&mut self, destination: Address, len: usize) -> Result<(), SendError> {
        let peer = if self.ensure_peer() { self.gate.peer_mut() } else { None };
        self.sender.send(peer, destination, len)
    }

    /// Copy `payload` into the send buffer and send it to `destination`.
    pub fn send_payload_to(&mut self, destination: Address, payload: &[u8]) -> Result<(), SendError> {
        let peer = if self.ensure_peer() { self.gate.peer_mut() } else { None };
        self.sender.send_payload(peer, destination, payload)
    }

    /// Length of the most recently received payload.
    pub fn last_len(&self) -> usize {
        self.receiver.last_len()
    }

    /// Header of the most recently received message.
    pub fn last_header(&self) -> Option<&FrameHeader> {
        self.receiver.last_header()
    }

    /// Sender of the most recently received message.
    pub fn last_source(&self) -> Option<Address> {
        self.receiver.last_header().map(FrameHeader::source)
    }

    /// Why the most recent frame was discarded, if it was.
    pub fn last_error(&self) -> Option<RecvError> {
        self.receiver.last_error()
    }

    /// Receive counters.
    pub fn stats(&self) -> RecvStats {
        self.receiver.stats()
    }

    /// Connection gate.
    pub fn gate(&self) -> &ConnectionGate<T> {
        &self.gate
    }

    /// Connection gate, mutably.
    pub fn gate_mut(&mut self) -> &mut ConnectionGate<T> {
        &mut self.gate
    }

    /// Receive engine.
    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }
}

impl<T: Transport> fmt::Debug for Socket<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socket")
            .field("address", &self.address)
            .field("has_peer", &self.gate.has_peer())
            .field("receiver", &self.receiver)
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}
