//! Frame flag bits.

use bitflags::bitflags;

bitflags! {
    /// Per-frame flag byte.
    ///
    /// No bit is interpreted by the receiver yet. Senders write zero, and any
    /// bits a peer sets are carried through parsing unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FrameFlags: u8 {
        const _ = !0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bits_are_retained() {
        let flags = FrameFlags::from_bits_retain(0x56);
        assert_eq!(flags.bits(), 0x56);
        assert_eq!(FrameFlags::from_bits_truncate(0xff).bits(), 0xff);
    }

    #[test]
    fn default_is_empty() {
        assert!(FrameFlags::default().is_empty());
    }
}
