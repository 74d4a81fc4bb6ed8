//! Property tests for header parsing and validation.

use proptest::prelude::*;
use sockframe_proto::{Address, Frame, FrameFlags, FrameHeader, ProtocolError, validate};

proptest! {
    #[test]
    fn validate_agrees_with_magic_and_version(bytes in prop::array::uniform12(any::<u8>())) {
        let header = FrameHeader::from_bytes(&bytes).unwrap();
        let expected = bytes[..4] == FrameHeader::MAGIC_BYTES && bytes[4] == FrameHeader::VERSION;
        prop_assert_eq!(validate(header), expected);
    }

    #[test]
    fn wrong_version_never_parses(version in any::<u8>().prop_filter("not current", |v| *v != FrameHeader::VERSION)) {
        let mut bytes = FrameHeader::new(0, 0, FrameFlags::empty(), Address(1), Address(2)).to_bytes();
        bytes[4] = version;
        prop_assert_eq!(
            FrameHeader::parse(&bytes),
            Err(ProtocolError::UnsupportedVersion { found: version })
        );
    }

    #[test]
    fn every_field_survives_encoding(
        seq in any::<u8>(),
        flags in any::<u8>(),
        source in any::<u16>(),
        destination in any::<u16>(),
        payload in prop::collection::vec(any::<u8>(), 0..=255),
    ) {
        let frame = Frame::with_flags(
            seq,
            FrameFlags::from_bits_retain(flags),
            Address(source),
            Address(destination),
            payload.clone(),
        ).unwrap();

        let decoded = Frame::decode(&frame.to_vec()).unwrap();
        prop_assert_eq!(decoded.header.seq(), seq);
        prop_assert_eq!(decoded.header.flags().bits(), flags);
        prop_assert_eq!(decoded.header.source(), Address(source));
        prop_assert_eq!(decoded.header.destination(), Address(destination));
        prop_assert_eq!(&decoded.payload[..], &payload[..]);
    }
}
