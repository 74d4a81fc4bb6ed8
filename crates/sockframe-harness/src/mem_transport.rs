//! In-memory transport.
//!
//! [`mem_transport`] returns the listening side, handed to the engine, and a
//! [`MemConnector`] kept by the test. Each [`MemConnector::connect`] queues a
//! new peer at the transport and returns the [`MemRemote`] end of it, through
//! which the test injects bytes and inspects what the engine wrote.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use sockframe_core::{PeerStream, Transport};
use sockframe_proto::Frame;
use tracing::debug;

#[derive(Debug)]
struct Pipe {
    /// Bytes travelling towards the engine.
    inbound: VecDeque<u8>,
    /// Bytes the engine wrote.
    outbound: Vec<u8>,
    remote_open: bool,
    /// Maximum bytes accepted per engine write.
    write_limit: Option<usize>,
}

type SharedPipe = Arc<Mutex<Pipe>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create a connected transport / connector pair.
pub fn mem_transport() -> (MemTransport, MemConnector) {
    let pending = Arc::new(Mutex::new(VecDeque::new()));
    (MemTransport { pending: Arc::clone(&pending) }, MemConnector { pending })
}

/// Listening side of the in-memory transport.
#[derive(Debug)]
pub struct MemTransport {
    pending: Arc<Mutex<VecDeque<MemPeer>>>,
}

impl Transport for MemTransport {
    type Peer = MemPeer;

    fn has_pending_peer(&mut self) -> bool {
        !lock(&self.pending).is_empty()
    }

    fn accept_peer(&mut self) -> Option<MemPeer> {
        lock(&self.pending).pop_front()
    }
}

/// Test-side handle that opens new connections.
#[derive(Debug, Clone)]
pub struct MemConnector {
    pending: Arc<Mutex<VecDeque<MemPeer>>>,
}

impl MemConnector {
    /// Queue a new peer at the transport.
    pub fn connect(&self) -> MemRemote {
        let pipe = Arc::new(Mutex::new(Pipe {
            inbound: VecDeque::new(),
            outbound: Vec::new(),
            remote_open: true,
            write_limit: None,
        }));
        let mut pending = lock(&self.pending);
        pending.push_back(MemPeer { pipe: Arc::clone(&pipe) });
        debug!(queued = pending.len(), "peer connecting");
        MemRemote { pipe }
    }

    /// Number of peers waiting to be accepted.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

/// Engine side of one in-memory connection.
#[derive(Debug)]
pub struct MemPeer {
    pipe: SharedPipe,
}

impl PeerStream for MemPeer {
    fn is_closed(&mut self) -> bool {
        !lock(&self.pipe).remote_open
    }

    fn bytes_available(&mut self) -> usize {
        lock(&self.pipe).inbound.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        lock(&self.pipe).inbound.pop_front()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> usize {
        let mut pipe = lock(&self.pipe);
        let n = buf.len().min(pipe.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(pipe.inbound.drain(..n)) {
            *slot = byte;
        }
        n
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        let mut pipe = lock(&self.pipe);
        if !pipe.remote_open {
            return 0;
        }
        let n = pipe.write_limit.map_or(bytes.len(), |limit| limit.min(bytes.len()));
        pipe.outbound.extend_from_slice(&bytes[..n]);
        n
    }
}

/// Test side of one in-memory connection.
#[derive(Debug, Clone)]
pub struct MemRemote {
    pipe: SharedPipe,
}

impl MemRemote {
    /// Deliver raw bytes to the engine.
    pub fn send(&self, bytes: &[u8]) {
        lock(&self.pipe).inbound.extend(bytes.iter().copied());
    }

    /// Deliver an encoded frame to the engine.
    pub fn send_frame(&self, frame: &Frame) {
        self.send(&frame.to_vec());
    }

    /// Take everything the engine has written so far.
    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut lock(&self.pipe).outbound)
    }

    /// Bytes delivered but not yet consumed by the engine.
    pub fn unread(&self) -> usize {
        lock(&self.pipe).inbound.len()
    }

    /// Cap how many bytes each engine write may transfer.
    pub fn set_write_limit(&self, limit: Option<usize>) {
        lock(&self.pipe).write_limit = limit;
    }

    /// Close the remote side. Bytes already delivered stay readable.
    pub fn close(&self) {
        debug!("remote closing");
        lock(&self.pipe).remote_open = false;
    }
}
