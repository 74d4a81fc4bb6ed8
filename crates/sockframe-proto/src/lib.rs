//! Wire format for the sockframe protocol.
//!
//! A frame is a fixed 12-byte header followed by at most 255 bytes of opaque
//! payload. There are no delimiters between frames: a receiver that loses its
//! place in the stream finds the next frame by scanning for the 4-byte start
//! marker, so the header carries a magic value and a version byte that are
//! checked before anything else in it is trusted.
//!
//! ```text
//!  0               4       5       6       7       8               10              12
//!  +---------------+-------+-------+-------+-------+---------------+---------------+
//!  | magic (LE)    |version|  seq  |length | flags | source (LE)   | dest (LE)     |
//!  +---------------+-------+-------+-------+-------+---------------+---------------+
//! ```
//!
//! All multi-byte fields are little-endian. The header layout is checked at
//! compile time via `zerocopy`, so parsing is a size check plus a cast.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod errors;
pub mod flags;
pub mod frame;
pub mod header;

pub use address::Address;
pub use errors::{ProtocolError, Result};
pub use flags::FrameFlags;
pub use frame::Frame;
pub use header::{FrameHeader, address_matches, validate};
