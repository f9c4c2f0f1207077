//! Localhost TCP server accepting picker clients.

mod connection;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::DaemonError;
use crate::state::DaemonState;

pub use connection::handle_connection;

/// Accept connections until shutdown. The listener is bound by the caller so
/// tests can bind port 0 and read the actual address back.
pub async fn run_server(
    state: Arc<DaemonState>,
    listener: TcpListener,
    shutdown: CancellationToken,
) -> Result<(), DaemonError> {
    let addr = listener.local_addr()?;
    info!(event = "daemon.server.started", addr = %addr);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!(event = "daemon.server.stopped", addr = %addr);
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => {
                    tokio::spawn(handle_connection(
                        stream,
                        state.clone(),
                        shutdown.clone(),
                    ));
                }
                Err(e) => {
                    warn!(event = "daemon.server.accept_failed", error = %e);
                }
            },
        }
    }
}
