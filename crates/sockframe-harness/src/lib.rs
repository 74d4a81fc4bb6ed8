//! Deterministic test harness for the sockframe engine.
//!
//! An in-memory implementation of the transport traits plus seeded helpers for
//! chopping byte streams into arbitrary fragments, so that split-delivery and
//! resynchronization behaviour can be reproduced exactly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fragment;
pub mod mem_transport;

pub use fragment::Fragmenter;
pub use mem_transport::{MemConnector, MemPeer, MemRemote, MemTransport, mem_transport};
