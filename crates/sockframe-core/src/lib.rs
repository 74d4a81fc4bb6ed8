//! sockframe protocol engine
//!
//! Turns a raw byte stream from a single point-to-point transport into
//! discrete, validated messages, and frames outgoing messages the other way.
//!
//! # Architecture
//!
//! Everything here is synchronous and non-blocking. No call waits for bytes:
//! when not enough data has arrived, the call returns "nothing yet" and the
//! receiver records how far it got, so the next call picks up from there.
//! The application drives the engine by calling it on its own cadence (once
//! per loop iteration, once per tick).
//!
//! The engine never owns a socket directly. It talks to the outside world
//! through the [`transport`] traits, so the same code runs over non-blocking
//! TCP in production and over an in-memory pipe in tests.
//!
//! # Components
//!
//! - [`receiver`]: resumable frame parser with a fixed receive buffer
//! - [`sender`]: frame encoder writing header + payload in one transmission
//! - [`gate`]: holds at most one peer, adopting a new one when the old one goes
//! - [`socket`]: the three above behind one value
//! - [`transport`]: transport abstraction and a non-blocking TCP implementation
//! - [`config`]: socket configuration
//! - [`error`]: send, receive and configuration errors

pub mod config;
pub mod error;
pub mod gate;
pub mod receiver;
pub mod sender;
pub mod socket;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SocketConfig;
pub use error::{ConfigError, RecvError, SendError};
pub use gate::ConnectionGate;
pub use receiver::{ParseState, Receiver, RecvStats};
pub use sender::Sender;
pub use socket::Socket;
pub use transport::{PeerStream, Transport};
