//! Logical endpoint addresses.

use std::fmt;

/// Logical identifier of a protocol endpoint.
///
/// This names a sender or receiver role at the protocol level. It has nothing
/// to do with the IP address or port of the underlying transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub u16);

impl Address {
    /// Raw 16-bit value.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl From<u16> for Address {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Address> for u16 {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}
