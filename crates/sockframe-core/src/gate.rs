//! Single-peer connection gate.
//!
//! The gate holds at most one peer. A new peer is only adopted after the held
//! one has gone away, so any other client that connects meanwhile waits at
//! the transport until the slot frees up.

use tracing::debug;

use crate::transport::{PeerStream, Transport};

/// Holds the one active peer of a transport.
#[derive(Debug)]
pub struct ConnectionGate<T: Transport> {
    transport: T,
    peer: Option<T::Peer>,
    adopted: u64,
}

impl<T: Transport> ConnectionGate<T> {
    /// Create a gate with no peer.
    pub fn new(transport: T) -> Self {
        Self { transport, peer: None, adopted: 0 }
    }

    /// Make sure a live peer is held, adopting a waiting one if needed.
    ///
    /// Returns `true` if a peer is available after the call. A held peer that
    /// the transport reports as gone is dropped first.
    pub fn ensure_peer(&mut self) -> bool {
        if let Some(peer) = self.peer.as_mut() {
            if peer.is_connected() {
                return true;
            }
            debug!("peer went away, releasing");
            self.peer = None;
        }

        if !self.transport.has_pending_peer() {
            return false;
        }

        match self.transport.accept_peer() {
            Some(peer) => {
                self.adopted += 1;
                debug!(adopted = self.adopted, "adopted new peer");
                self.peer = Some(peer);
                true
            },
            None => false,
        }
    }

    /// Whether a peer is currently held. Does not check liveness.
    pub fn has_peer(&self) -> bool {
        self.peer.is_some()
    }

    /// Number of peers adopted so far. Changes exactly when a new peer
    /// replaces the old one.
    pub fn adopted(&self) -> u64 {
        self.adopted
    }

    /// The held peer, if any.
    pub fn peer_mut(&mut self) -> Option<&mut T::Peer> {
        self.peer.as_mut()
    }

    /// Give up the held peer so the next [`Self::ensure_peer`] can adopt
    /// another.
    pub fn release(&mut self) -> Option<T::Peer> {
        self.peer.take()
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
