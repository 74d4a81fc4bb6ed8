//! sockframe echo server
//!
//! Listens on a TCP port, adopts one peer at a time, and on every tick polls
//! the engine once. Each delivered message is sent back to its source
//! address. Useful as the far end when exercising a client implementation.

use std::{process::ExitCode, time::Duration};

use clap::Parser;
use sockframe_core::{Socket, transport::tcp::TcpTransport};
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod echo;
mod error;

use cli::Cli;
use error::ServerError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let addr = cli.listen_addr();
    let config = cli.socket_config();
    config.validate()?;

    let transport =
        TcpTransport::bind(addr).map_err(|source| ServerError::Bind { addr, source })?;
    let mut socket = Socket::new(transport, &config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        address = %config.address,
        buffer = config.recv_buffer_size,
        tick_ms = cli.tick_ms,
        "sockframe echo server started"
    );

    let mut ticker = tokio::time::interval(Duration::from_millis(cli.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut echoed: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if echo::tick(&mut socket).is_some() {
                    echoed += 1;
                }
            }
            result = &mut shutdown => {
                result?;
                break;
            }
        }
    }

    let stats = socket.stats();
    info!(
        echoed,
        delivered = stats.delivered,
        discarded = stats.discarded,
        dropped = stats.dropped,
        skipped_bytes = stats.skipped_bytes,
        "shutting down"
    );
    Ok(())
}
