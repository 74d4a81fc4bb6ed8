//! Fixed-size frame header.

use std::fmt;

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    little_endian::{U16, U32},
};

use crate::{
    address::Address,
    errors::{ProtocolError, Result},
    flags::FrameFlags,
};

/// 12-byte frame header.
///
/// Laid out exactly as it appears on the wire. Multi-byte fields are stored
/// little-endian so a received header can be viewed in place without any byte
/// swapping by the caller.
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct FrameHeader {
    magic: U32,
    version: u8,
    seq: u8,
    length: u8,
    flags: u8,
    source: U16,
    destination: U16,
}

const _: () = assert!(size_of::<FrameHeader>() == FrameHeader::SIZE);

// Receivers resynchronize with a restart scan: on a mismatch they compare the
// offending byte against the first magic byte and otherwise start over. That
// is only a correct search if no prefix of the marker has a border, which
// holds whenever the first byte never reappears in it.
const fn first_byte_recurs(bytes: &[u8; 4]) -> bool {
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == bytes[0] {
            return true;
        }
        i += 1;
    }
    false
}

const _: () = assert!(!first_byte_recurs(&FrameHeader::MAGIC_BYTES));

impl FrameHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 12;

    /// Start marker, "TCPS" read as a big-endian word.
    pub const MAGIC: u32 = 0x5443_5053;

    /// Start marker as it appears on the wire.
    pub const MAGIC_BYTES: [u8; 4] = Self::MAGIC.to_le_bytes();

    /// The only protocol version this crate speaks.
    pub const VERSION: u8 = 1;

    /// Largest payload the length field can describe.
    pub const MAX_PAYLOAD: usize = u8::MAX as usize;

    /// Build a header with the start marker and current version filled in.
    pub fn new(seq: u8, length: u8, flags: FrameFlags, source: Address, destination: Address) -> Self {
        Self {
            magic: U32::new(Self::MAGIC),
            version: Self::VERSION,
            seq,
            length,
            flags: flags.bits(),
            source: U16::new(source.get()),
            destination: U16::new(destination.get()),
        }
    }

    /// View the first [`Self::SIZE`] bytes of `bytes` as a header.
    ///
    /// Only the size is checked. Use [`Self::check`] (or [`Self::parse`]) before
    /// trusting any field.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(bytes)
            .map(|(header, _rest)| header)
            .map_err(|_| ProtocolError::FrameTooShort { expected: Self::SIZE, actual: bytes.len() })
    }

    /// Copy a header out of `bytes` and check magic and version.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let header = *Self::from_bytes(bytes)?;
        header.check()?;
        Ok(header)
    }

    /// Check the start marker and version.
    pub fn check(&self) -> Result<()> {
        if self.magic() != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic { found: self.magic() });
        }
        if self.version != Self::VERSION {
            return Err(ProtocolError::UnsupportedVersion { found: self.version });
        }
        Ok(())
    }

    /// Serialize to wire bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    /// Start marker as read from the wire.
    pub fn magic(&self) -> u32 {
        self.magic.get()
    }

    /// Protocol version byte.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Sender-assigned sequence id. Informational only.
    pub fn seq(&self) -> u8 {
        self.seq
    }

    /// Declared payload length.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// Declared payload length as a `usize`.
    pub fn payload_len(&self) -> usize {
        usize::from(self.length)
    }

    /// Flag bits, unknown bits included.
    pub fn flags(&self) -> FrameFlags {
        FrameFlags::from_bits_retain(self.flags)
    }

    /// Logical address of the sender.
    pub fn source(&self) -> Address {
        Address(self.source.get())
    }

    /// Logical address of the intended receiver.
    pub fn destination(&self) -> Address {
        Address(self.destination.get())
    }
}

impl fmt::Debug for FrameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHeader")
            .field("magic", &format_args!("{:#010x}", self.magic()))
            .field("version", &self.version)
            .field("seq", &self.seq)
            .field("length", &self.length)
            .field("flags", &format_args!("{:#04x}", self.flags))
            .field("source", &self.source())
            .field("destination", &self.destination())
            .finish()
    }
}

/// True iff the header carries the start marker and the supported version.
pub fn validate(header: &FrameHeader) -> bool {
    header.check().is_ok()
}

/// True iff the header is addressed exactly to `filter`.
pub fn address_matches(filter: Address, header: &FrameHeader) -> bool {
    header.destination() == filter
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    // Header as produced by the reference tool: seq 0, 4-byte payload,
    // flags 0x56, source 0x12, destination 128.
    const TOOL_HEADER: [u8; 12] = hex!("53504354 01 00 04 56 1200 8000");

    #[test]
    fn magic_bytes_on_wire() {
        assert_eq!(FrameHeader::MAGIC_BYTES, *b"SPCT");
    }

    #[test]
    fn parses_reference_header() {
        let header = FrameHeader::parse(&TOOL_HEADER).unwrap();
        assert_eq!(header.version(), 1);
        assert_eq!(header.seq(), 0);
        assert_eq!(header.payload_len(), 4);
        assert_eq!(header.flags().bits(), 0x56);
        assert_eq!(header.source(), Address(0x12));
        assert_eq!(header.destination(), Address(128));
    }

    #[test]
    fn new_matches_wire_layout() {
        let header = FrameHeader::new(
            0,
            4,
            FrameFlags::from_bits_retain(0x56),
            Address(0x12),
            Address(128),
        );
        assert_eq!(header.to_bytes(), TOOL_HEADER);
    }

    #[test]
    fn rejects_wrong_version() {
        let mut bytes = TOOL_HEADER;
        bytes[4] = 2;
        let header = FrameHeader::from_bytes(&bytes).unwrap();
        assert!(!validate(header));
        assert_eq!(header.check(), Err(ProtocolError::UnsupportedVersion { found: 2 }));
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = TOOL_HEADER;
        bytes[0] = 0x54;
        let header = FrameHeader::from_bytes(&bytes).unwrap();
        assert!(!validate(header));
        assert!(matches!(header.check(), Err(ProtocolError::InvalidMagic { .. })));
    }

    #[test]
    fn short_input_is_an_error() {
        let result = FrameHeader::from_bytes(&TOOL_HEADER[..11]);
        assert_eq!(result, Err(ProtocolError::FrameTooShort { expected: 12, actual: 11 }));
    }

    #[test]
    fn address_filter_is_exact() {
        let header = FrameHeader::parse(&TOOL_HEADER).unwrap();
        assert!(address_matches(Address(128), &header));
        assert!(!address_matches(Address(0x12), &header));
        assert!(!address_matches(Address(129), &header));
    }
}
