// Server loop module
// Accepts connections until shutdown is signalled, then drains in-flight requests

use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::{accept_connection, ConnectionCounter};
use crate::config::AppState;
use crate::logger;

/// Configuration for server loop behavior
pub struct ServerLoopConfig {
    /// Notified once to stop accepting and begin draining
    pub shutdown_signal: Arc<Notify>,
    /// Upper bound on the drain phase
    pub grace_period: Duration,
}

/// Serve until `shutdown_signal` fires, then wait up to `grace_period`
/// for open connections to finish their current request.
///
/// Returns the number of connections still open when the loop gave up.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    config: ServerLoopConfig,
) -> std::io::Result<usize> {
    let counter = ConnectionCounter::default();
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &counter, &graceful);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = config.shutdown_signal.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown_requested(counter.active());

    if tokio::time::timeout(config.grace_period, graceful.shutdown())
        .await
        .is_err()
    {
        logger::log_debug("Graceful shutdown deadline reached");
    }

    let remaining = counter.active();
    logger::log_shutdown_complete(remaining);
    Ok(remaining)
}
