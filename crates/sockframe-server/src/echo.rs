//! One tick of the echo loop.

use sockframe_core::{SendError, Socket, Transport};
use sockframe_proto::FrameHeader;
use tracing::{debug, warn};

/// Receive at most one message and send it back to whoever sent it.
///
/// Returns the number of payload bytes echoed, or `None` if nothing was
/// delivered this tick.
pub fn tick<T: Transport>(socket: &mut Socket<T>) -> Option<usize> {
    let mut scratch = [0u8; FrameHeader::MAX_PAYLOAD];
    let len = {
        let payload = socket.recv()?;
        scratch[..payload.len()].copy_from_slice(payload);
        payload.len()
    };
    let destination = socket.last_source()?;
    debug!(len, %destination, "echoing message");

    match socket.send_payload_to(destination, &scratch[..len]) {
        Ok(()) => Some(len),
        Err(SendError::NoPeer) => {
            debug!("peer left before the echo went out");
            None
        },
        Err(e) => {
            warn!(error = %e, "echo failed");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use sockframe_core::SocketConfig;
    use sockframe_harness::{MemRemote, MemTransport, mem_transport};
    use sockframe_proto::{Address, Frame};

    use super::*;

    const SERVER: Address = Address(1);
    const CLIENT: Address = Address(0x22);

    fn server() -> (Socket<MemTransport>, MemRemote) {
        let (transport, connector) = mem_transport();
        let config = SocketConfig::with_payload_capacity(SERVER, 64);
        let socket = Socket::new(transport, &config).unwrap();
        (socket, connector.connect())
    }

    #[test]
    fn echoes_to_source() {
        let (mut socket, remote) = server();
        remote.send_frame(&Frame::new(9, CLIENT, SERVER, &b"marco"[..]).unwrap());

        assert_eq!(tick(&mut socket), Some(5));

        let reply = Frame::decode(&remote.take_written()).unwrap();
        assert_eq!(reply.header.source(), SERVER);
        assert_eq!(reply.header.destination(), CLIENT);
        assert_eq!(&reply.payload[..], b"marco");
    }

    #[test]
    fn idle_tick_writes_nothing() {
        let (mut socket, remote) = server();
        assert_eq!(tick(&mut socket), None);
        assert!(remote.take_written().is_empty());
    }

    #[test]
    fn messages_for_others_are_not_echoed() {
        let (mut socket, remote) = server();
        remote.send_frame(&Frame::new(0, CLIENT, Address(7), &b"nope"[..]).unwrap());

        assert_eq!(tick(&mut socket), None);
        assert!(remote.take_written().is_empty());
    }

    #[test]
    fn empty_message_echoed() {
        let (mut socket, remote) = server();
        remote.send_frame(&Frame::new(0, CLIENT, SERVER, Vec::new()).unwrap());

        assert_eq!(tick(&mut socket), Some(0));
        assert_eq!(remote.take_written().len(), FrameHeader::SIZE);
    }

    #[test]
    fn failed_echo_reported_as_nothing() {
        let (mut socket, remote) = server();
        remote.send_frame(&Frame::new(0, CLIENT, SERVER, &b"ping"[..]).unwrap());
        remote.set_write_limit(Some(3));

        assert_eq!(tick(&mut socket), None);
        assert_eq!(remote.take_written().len(), 3);
    }
}
