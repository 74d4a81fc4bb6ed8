//! Socket configuration.

use sockframe_proto::{Address, FrameHeader};

use crate::error::ConfigError;

/// Payload bytes the receive buffer holds by default.
pub const DEFAULT_PAYLOAD_CAPACITY: usize = 64;

/// Socket configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketConfig {
    /// Our logical address. Written as the source of every outgoing frame and
    /// used as the default receive filter.
    pub address: Address,
    /// Receive buffer size in bytes, header included.
    pub recv_buffer_size: usize,
}

impl SocketConfig {
    /// Configuration whose receive buffer holds `payload_capacity` payload
    /// bytes after the header.
    pub fn with_payload_capacity(address: Address, payload_capacity: usize) -> Self {
        Self { address, recv_buffer_size: payload_capacity + FrameHeader::SIZE }
    }

    /// Check that the receive buffer can hold a header.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recv_buffer_size < FrameHeader::SIZE {
            return Err(ConfigError::BufferTooSmall { capacity: self.recv_buffer_size });
        }
        Ok(())
    }
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self::with_payload_capacity(Address::default(), DEFAULT_PAYLOAD_CAPACITY)
    }
}
