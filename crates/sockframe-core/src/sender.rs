//! Frame encoder.
//!
//! The sender owns one contiguous buffer laid out as `[header | payload]`. The
//! caller writes its payload straight into the payload region returned by
//! [`Sender::prepare`]; [`Sender::send`] then fills in the header in front of
//! it and hands the whole frame to the transport in a single write.

use sockframe_proto::{Address, FrameFlags, FrameHeader};
use tracing::{debug, trace, warn};

use crate::{error::SendError, transport::PeerStream};

/// Frame encoder with a reusable send buffer.
#[derive(Debug)]
pub struct Sender {
    source: Address,
    seq: u8,
    buf: Vec<u8>,
}

impl Sender {
    /// Create a sender that stamps `source` on every frame.
    pub fn new(source: Address) -> Self {
        Self { source, seq: 0, buf: vec![0u8; FrameHeader::SIZE] }
    }

    /// Source address written into outgoing headers.
    pub fn source(&self) -> Address {
        self.source
    }

    /// Sequence id the next frame will carry.
    pub fn next_seq(&self) -> u8 {
        self.seq
    }

    /// Reserve room for a payload of up to `payload_capacity` bytes and return
    /// the writable payload region.
    ///
    /// Capacity is clamped to what the length field can describe. The region
    /// is zeroed.
    pub fn prepare(&mut self, payload_capacity: usize) -> &mut [u8] {
        let capacity = payload_capacity.min(FrameHeader::MAX_PAYLOAD);
        self.buf.clear();
        self.buf.resize(FrameHeader::SIZE + capacity, 0);
        &mut self.buf[FrameHeader::SIZE..]
    }

    /// Size of the payload region reserved by the last [`Self::prepare`].
    pub fn payload_capacity(&self) -> usize {
        self.buf.len() - FrameHeader::SIZE
    }

    /// Send the first `len` bytes of the prepared payload region to
    /// `destination`.
    pub fn send<P: PeerStream>(
        &mut self,
        peer: Option<&mut P>,
        destination: Address,
        len: usize,
    ) -> Result<(), SendError> {
        let Some(peer) = peer else {
            debug!(%destination, "send without connection");
            return Err(SendError::NoPeer);
        };

        let max = self.payload_capacity();
        let length = u8::try_from(len)
            .ok()
            .filter(|_| len <= max)
            .ok_or(SendError::PayloadTooLarge { len, max })?;

        let header =
            FrameHeader::new(self.seq, length, FrameFlags::empty(), self.source, destination);
        self.seq = self.seq.wrapping_add(1);
        self.buf[..FrameHeader::SIZE].copy_from_slice(&header.to_bytes());

        let frame = &self.buf[..FrameHeader::SIZE + len];
        let written = peer.write(frame);
        if written != frame.len() {
            warn!(written, expected = frame.len(), "short write");
            return Err(SendError::ShortWrite { written, expected: frame.len() });
        }

        trace!(seq = header.seq(), %destination, len, "frame sent");
        Ok(())
    }

    /// Copy `payload` into the send buffer and send it to `destination`.
    pub fn send_payload<P: PeerStream>(
        &mut self,
        peer: Option<&mut P>,
        destination: Address,
        payload: &[u8],
    ) -> Result<(), SendError> {
        let Some(peer) = peer else {
            debug!(%destination, "send without connection");
            return Err(SendError::NoPeer);
        };
        if payload.len() > FrameHeader::MAX_PAYLOAD {
            return Err(SendError::PayloadTooLarge {
                len: payload.len(),
                max: FrameHeader::MAX_PAYLOAD,
            });
        }

        self.prepare(payload.len()).copy_from_slice(payload);
        self.send(Some(peer), destination, payload.len())
    }
}

#[cfg(test)]
mod tests {
    use sockframe_proto::Frame;

    use super::*;
    use crate::testing::QueuePeer;

    #[test]
    fn writes_header_then_payload() {
        let mut tx = Sender::new(Address(0x12));
        let mut peer = QueuePeer::default();

        tx.prepare(8)[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        tx.send(Some(&mut peer), Address(128), 4).unwrap();

        let frame = Frame::decode(&peer.outbox).unwrap();
        assert_eq!(frame.header.seq(), 0);
        assert_eq!(frame.header.source(), Address(0x12));
        assert_eq!(frame.header.destination(), Address(128));
        assert!(frame.header.flags().is_empty());
        assert_eq!(&frame.payload[..], &[0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn no_peer_sends_nothing() {
        let mut tx = Sender::new(Address(1));
        tx.prepare(4);

        assert_eq!(tx.send(None::<&mut QueuePeer>, Address(2), 4), Err(SendError::NoPeer));
        assert_eq!(
            tx.send_payload(None::<&mut QueuePeer>, Address(2), b"abc"),
            Err(SendError::NoPeer)
        );
        assert_eq!(tx.next_seq(), 0);
    }

    #[test]
    fn short_write_is_reported() {
        let mut tx = Sender::new(Address(1));
        let mut peer = QueuePeer { write_limit: Some(5), ..QueuePeer::default() };

        let result = tx.send_payload(Some(&mut peer), Address(2), b"abc");
        assert_eq!(result, Err(SendError::ShortWrite { written: 5, expected: 15 }));
    }

    #[test]
    fn length_beyond_prepared_region_is_rejected() {
        let mut tx = Sender::new(Address(1));
        let mut peer = QueuePeer::default();
        tx.prepare(4);

        assert_eq!(
            tx.send(Some(&mut peer), Address(2), 5),
            Err(SendError::PayloadTooLarge { len: 5, max: 4 })
        );
        assert!(peer.outbox.is_empty());
    }

    #[test]
    fn prepare_clamps_to_length_field() {
        let mut tx = Sender::new(Address(1));
        assert_eq!(tx.prepare(1000).len(), 255);

        let mut peer = QueuePeer::default();
        assert_eq!(
            tx.send_payload(Some(&mut peer), Address(2), &[0u8; 256]),
            Err(SendError::PayloadTooLarge { len: 256, max: 255 })
        );
    }

    #[test]
    fn sequence_id_wraps() {
        let mut tx = Sender::new(Address(1));
        let mut peer = QueuePeer::default();

        for _ in 0..256 {
            tx.send_payload(Some(&mut peer), Address(2), b"").unwrap();
        }
        assert_eq!(tx.next_seq(), 0);

        tx.send_payload(Some(&mut peer), Address(2), b"").unwrap();
        let last = Frame::decode(&peer.outbox[256 * 12..]).unwrap();
        assert_eq!(last.header.seq(), 0);
    }
}
