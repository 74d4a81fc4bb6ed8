//! Queue-backed transport for unit tests.

use std::collections::VecDeque;

use sockframe_proto::{Address, Frame};

use crate::transport::{PeerStream, Transport};

#[derive(Debug, Default)]
pub struct QueuePeer {
    pub inbox: VecDeque<u8>,
    pub outbox: Vec<u8>,
    pub closed: bool,
    pub write_limit: Option<usize>,
    /// Bytes `bytes_available` claims beyond what is really queued.
    pub overstate: usize,
}

impl QueuePeer {
    pub fn push(&mut self, bytes: &[u8]) {
        self.inbox.extend(bytes.iter().copied());
    }
}

impl PeerStream for QueuePeer {
    fn is_closed(&mut self) -> bool {
        self.closed
    }

    fn bytes_available(&mut self) -> usize {
        self.inbox.len() + self.overstate
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.inbox.pop_front()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.inbox.len());
        for (slot, byte) in buf.iter_mut().zip(self.inbox.drain(..n)) {
            *slot = byte;
        }
        n
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        let n = self.write_limit.map_or(bytes.len(), |limit| limit.min(bytes.len()));
        self.outbox.extend_from_slice(&bytes[..n]);
        n
    }
}

#[derive(Debug, Default)]
pub struct QueueTransport {
    pub pending: VecDeque<QueuePeer>,
}

impl Transport for QueueTransport {
    type Peer = QueuePeer;

    fn has_pending_peer(&mut self) -> bool {
        !self.pending.is_empty()
    }

    fn accept_peer(&mut self) -> Option<QueuePeer> {
        self.pending.pop_front()
    }
}

pub fn frame_bytes(destination: u16, payload: &[u8]) -> Vec<u8> {
    Frame::new(0, Address(0x99), Address(destination), payload.to_vec()).unwrap().to_vec()
}
