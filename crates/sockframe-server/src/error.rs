//! Server error types.

use std::{io, net::SocketAddr};

use sockframe_core::ConfigError;
use thiserror::Error;

/// Fatal server errors.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Could not bind the listener.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested listen address
        addr: SocketAddr,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Engine configuration was rejected.
    #[error("invalid socket configuration: {0}")]
    Config(#[from] ConfigError),

    /// Runtime could not be started or a signal handler installed.
    #[error("runtime error: {0}")]
    Runtime(#[from] io::Error),
}
