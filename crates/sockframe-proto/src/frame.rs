//! Owned header + payload.

use bytes::{BufMut, Bytes};

use crate::{
    address::Address,
    errors::{ProtocolError, Result},
    flags::FrameFlags,
    header::FrameHeader,
};

/// A complete frame.
///
/// The streaming receiver never allocates one of these; it parses into its
/// own fixed buffer. `Frame` is the convenient form for building test streams,
/// decoding complete captures, and anything else that has the whole frame in
/// hand at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame header. Its length field always equals `payload.len()`.
    pub header: FrameHeader,
    /// Opaque application payload.
    pub payload: Bytes,
}

impl Frame {
    /// Build a frame with zero flags.
    pub fn new(
        seq: u8,
        source: Address,
        destination: Address,
        payload: impl Into<Bytes>,
    ) -> Result<Self> {
        Self::with_flags(seq, FrameFlags::empty(), source, destination, payload)
    }

    /// Build a frame carrying the given flag bits.
    pub fn with_flags(
        seq: u8,
        flags: FrameFlags,
        source: Address,
        destination: Address,
        payload: impl Into<Bytes>,
    ) -> Result<Self> {
        let payload = payload.into();
        let length = u8::try_from(payload.len()).map_err(|_| ProtocolError::PayloadTooLarge {
            len: payload.len(),
            max: FrameHeader::MAX_PAYLOAD,
        })?;
        let header = FrameHeader::new(seq, length, flags, source, destination);
        Ok(Self { header, payload })
    }

    /// Decode one complete frame from `bytes`.
    ///
    /// `bytes` must hold exactly one header and the payload it declares.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = FrameHeader::parse(bytes)?;
        let body = &bytes[FrameHeader::SIZE..];
        if body.len() != header.payload_len() {
            return Err(ProtocolError::LengthMismatch {
                declared: header.payload_len(),
                actual: body.len(),
            });
        }
        Ok(Self { header, payload: Bytes::copy_from_slice(body) })
    }

    /// Append the wire encoding to `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.payload);
    }

    /// Wire encoding as a fresh vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out);
        out
    }

    /// Size of the wire encoding.
    pub fn encoded_len(&self) -> usize {
        FrameHeader::SIZE + self.payload.len()
    }
}
