//! End-to-end tests over real loopback TCP.

use std::{
    io::{Read, Write},
    net::TcpStream,
    thread,
    time::{Duration, Instant},
};

use sockframe_core::{Socket, SocketConfig, transport::tcp::TcpTransport};
use sockframe_proto::{Address, Frame, FrameHeader};

const SERVER: Address = Address(0x80);
const CLIENT: Address = Address(0x12);

/// Call `step` until it yields a value or five seconds pass.
fn poll_until<T>(mut step: impl FnMut() -> Option<T>) -> Option<T> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(value) = step() {
            return Some(value);
        }
        thread::sleep(Duration::from_millis(2));
    }
    None
}

fn server() -> (Socket<TcpTransport>, std::net::SocketAddr) {
    let transport = TcpTransport::bind("127.0.0.1:0").unwrap();
    let addr = transport.local_addr().unwrap();
    let config = SocketConfig::with_payload_capacity(SERVER, 64);
    (Socket::new(transport, &config).unwrap(), addr)
}

#[test]
fn receives_frame_written_in_pieces() {
    let (mut sock, addr) = server();
    let mut client = TcpStream::connect(addr).unwrap();

    let frame = Frame::new(0, CLIENT, SERVER, vec![0xde, 0xad, 0xbe, 0xef]).unwrap().to_vec();
    client.write_all(&[0xff, 0x00]).unwrap();
    client.write_all(&frame[..7]).unwrap();
    client.flush().unwrap();

    // Not enough for a header yet, or header without body: nothing delivered.
    for _ in 0..10 {
        assert_eq!(sock.recv(), None);
        thread::sleep(Duration::from_millis(2));
    }

    client.write_all(&frame[7..]).unwrap();
    let payload = poll_until(|| sock.recv().map(<[u8]>::to_vec));
    assert_eq!(payload.as_deref(), Some(&[0xde, 0xad, 0xbe, 0xef][..]));
    assert_eq!(sock.last_source(), Some(CLIENT));
}

#[test]
fn reply_reaches_client() {
    let (mut sock, addr) = server();
    let mut client = TcpStream::connect(addr).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    assert!(poll_until(|| sock.connected().then_some(())).is_some());
    sock.send_payload_to(CLIENT, b"pong").unwrap();

    let mut buf = [0u8; FrameHeader::SIZE + 4];
    client.read_exact(&mut buf).unwrap();
    let frame = Frame::decode(&buf).unwrap();
    assert_eq!(frame.header.source(), SERVER);
    assert_eq!(frame.header.destination(), CLIENT);
    assert_eq!(&frame.payload[..], b"pong");
}

#[test]
fn next_client_adopted_after_disconnect() {
    let (mut sock, addr) = server();

    let first = TcpStream::connect(addr).unwrap();
    assert!(poll_until(|| sock.connected().then_some(())).is_some());
    drop(first);

    let mut second = TcpStream::connect(addr).unwrap();
    let frame = Frame::new(1, CLIENT, SERVER, &b"again"[..]).unwrap().to_vec();
    second.write_all(&frame).unwrap();

    let payload = poll_until(|| sock.recv().map(<[u8]>::to_vec));
    assert_eq!(payload.as_deref(), Some(&b"again"[..]));
}

#[test]
fn client_dropping_mid_frame_releases_the_slot() {
    let (mut sock, addr) = server();

    let mut first = TcpStream::connect(addr).unwrap();
    assert!(poll_until(|| sock.connected().then_some(())).is_some());
    let partial = Frame::new(0, CLIENT, SERVER, &b"never finished"[..]).unwrap().to_vec();
    first.write_all(&partial[..FrameHeader::SIZE + 3]).unwrap();
    drop(first);

    let mut second = TcpStream::connect(addr).unwrap();
    let frame = Frame::new(1, CLIENT, SERVER, &b"fresh"[..]).unwrap().to_vec();
    second.write_all(&frame).unwrap();

    let payload = poll_until(|| sock.recv().map(<[u8]>::to_vec));
    assert_eq!(payload.as_deref(), Some(&b"fresh"[..]));
}
