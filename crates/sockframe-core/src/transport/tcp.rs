//! Non-blocking TCP transport.
//!
//! The listener and every accepted stream run in non-blocking mode. Bytes are
//! pulled off the socket into a bounded `BytesMut` inbox whenever the engine
//! asks how much is available, which is what lets `bytes_available` answer
//! without a platform-specific ioctl.

use std::{
    io::{self, Read, Write},
    net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
};

use bytes::{Buf, BytesMut};
use tracing::{debug, warn};

use super::{PeerStream, Transport};

/// Upper bound on bytes buffered per peer ahead of the parser.
const INBOX_LIMIT: usize = 4096;

/// Read chunk size when draining the socket.
const READ_CHUNK: usize = 512;

/// TCP listener handing out one peer at a time.
///
/// Only one connection is taken off the listen queue ahead of time; any
/// further clients wait in the kernel backlog until they are accepted.
#[derive(Debug)]
pub struct TcpTransport {
    listener: TcpListener,
    pending: Option<(TcpStream, SocketAddr)>,
}

impl TcpTransport {
    /// Bind a non-blocking listener.
    pub fn bind(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        debug!(local = %listener.local_addr()?, "listening");
        Ok(Self { listener, pending: None })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for TcpTransport {
    type Peer = TcpPeer;

    fn has_pending_peer(&mut self) -> bool {
        if self.pending.is_none() {
            match self.listener.accept() {
                Ok(conn) => self.pending = Some(conn),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {},
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }
        self.pending.is_some()
    }

    fn accept_peer(&mut self) -> Option<TcpPeer> {
        if !self.has_pending_peer() {
            return None;
        }
        let (stream, remote) = self.pending.take()?;
        match TcpPeer::new(stream, remote) {
            Ok(peer) => {
                debug!(%remote, "connection accepted");
                Some(peer)
            },
            Err(e) => {
                warn!(%remote, error = %e, "failed to configure accepted stream");
                None
            },
        }
    }
}

/// One accepted TCP connection.
#[derive(Debug)]
pub struct TcpPeer {
    stream: TcpStream,
    remote: SocketAddr,
    inbox: BytesMut,
    closed: bool,
}

impl TcpPeer {
    fn new(stream: TcpStream, remote: SocketAddr) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        Ok(Self { stream, remote, inbox: BytesMut::with_capacity(INBOX_LIMIT), closed: false })
    }

    /// Remote socket address.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote
    }

    /// Drain whatever the socket has ready into the inbox.
    fn fill(&mut self) {
        let mut chunk = [0u8; READ_CHUNK];
        while !self.closed && self.inbox.len() < INBOX_LIMIT {
            let room = (INBOX_LIMIT - self.inbox.len()).min(READ_CHUNK);
            match self.stream.read(&mut chunk[..room]) {
                Ok(0) => {
                    debug!(remote = %self.remote, "peer closed connection");
                    self.closed = true;
                },
                Ok(n) => self.inbox.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
                Err(e) => {
                    debug!(remote = %self.remote, error = %e, "read failed, dropping peer");
                    self.closed = true;
                },
            }
        }
    }
}

impl PeerStream for TcpPeer {
    fn is_closed(&mut self) -> bool {
        self.fill();
        self.closed
    }

    fn bytes_available(&mut self) -> usize {
        self.fill();
        self.inbox.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.inbox.is_empty() {
            self.fill();
        }
        if self.inbox.is_empty() {
            return None;
        }
        Some(self.inbox.get_u8())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> usize {
        if self.inbox.len() < buf.len() {
            self.fill();
        }
        let n = buf.len().min(self.inbox.len());
        self.inbox.copy_to_slice(&mut buf[..n]);
        n
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        let mut written = 0;
        while written < bytes.len() && !self.closed {
            match self.stream.write(&bytes[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    debug!(remote = %self.remote, error = %e, "write failed, dropping peer");
                    self.closed = true;
                },
            }
        }
        written
    }
}
