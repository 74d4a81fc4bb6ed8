//! Feed arbitrary byte streams, in arbitrary fragments, through the receive
//! engine.
//!
//! Input layout: byte 0 picks the payload capacity, byte 1 the largest
//! fragment size, bytes 2..10 seed the fragmenter, the rest is the stream.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sockframe_core::{Socket, SocketConfig};
use sockframe_harness::{mem_transport, Fragmenter};
use sockframe_proto::{Address, FrameHeader};

const ME: Address = Address(0x80);

fuzz_target!(|data: &[u8]| {
    if data.len() < 10 {
        return;
    }
    let capacity = usize::from(data[0]);
    let max_chunk = usize::from(data[1]).max(1);
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&data[2..10]);
    let stream = &data[10..];

    let (transport, connector) = mem_transport();
    let config = SocketConfig::with_payload_capacity(ME, capacity);
    let Ok(mut socket) = Socket::new(transport, &config) else {
        return;
    };
    let remote = connector.connect();
    let max_payload = capacity.min(FrameHeader::MAX_PAYLOAD);

    for chunk in Fragmenter::with_seed(u64::from_le_bytes(seed)).split(stream, max_chunk) {
        remote.send(&chunk);
        while let Some(payload) = socket.recv() {
            assert!(payload.len() <= max_payload);
            let header = socket.last_header().copied().unwrap();
            assert!(sockframe_proto::validate(&header));
            assert_eq!(header.destination(), ME);
        }
    }
});
