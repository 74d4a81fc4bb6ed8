//! CLI arguments for the echo server

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;
use sockframe_core::SocketConfig;
use sockframe_proto::Address;

/// sockframe echo server
///
/// Accepts one TCP peer at a time and sends every message addressed to it
/// straight back to the message's source.
#[derive(Parser, Debug)]
#[command(name = "sockframe-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Interface to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// TCP port to listen on
    #[arg(short, long, default_value_t = 5050)]
    pub port: u16,

    /// Logical address of this node
    #[arg(short, long, default_value_t = 1)]
    pub address: u16,

    /// Receive buffer payload capacity in bytes
    #[arg(long, default_value_t = sockframe_core::config::DEFAULT_PAYLOAD_CAPACITY)]
    pub buffer_size: usize,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "sockframe_core=trace")
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Socket address to bind the listener to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Engine configuration derived from the arguments.
    pub fn socket_config(&self) -> SocketConfig {
        SocketConfig::with_payload_capacity(Address(self.address), self.buffer_size)
    }
}
