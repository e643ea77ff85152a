// Connection handling module
// Accepts a single TCP connection and serves it with hyper on its own task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Counts connections currently being served
#[derive(Debug, Clone, Default)]
pub struct ConnectionCounter(Arc<AtomicUsize>);

impl ConnectionCounter {
    pub fn active(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Reserve a slot, or `None` when `max` connections are already active
    fn try_acquire(&self, max: Option<u64>) -> Option<ConnectionSlot> {
        // Increment first, then check limit, so concurrent accepts cannot overshoot
        let prev_count = self.0.fetch_add(1, Ordering::SeqCst);
        if let Some(max_conn) = max {
            if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                self.0.fetch_sub(1, Ordering::SeqCst);
                logger::log_warning(&format!(
                    "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
                ));
                return None;
            }
        }
        Some(ConnectionSlot(Arc::clone(&self.0)))
    }
}

/// Releases its counter slot when dropped
struct ConnectionSlot(Arc<AtomicUsize>);

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept and process a connection, checking limits and logging.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    counter: &ConnectionCounter,
    graceful: &GracefulShutdown,
) {
    let Some(slot) = counter.try_acquire(state.config.performance.max_connections) else {
        drop(stream);
        return;
    };

    logger::log_connection_accepted(&peer_addr);

    let perf = &state.config.performance;
    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .keep_alive(perf.keep_alive)
        .header_read_timeout(Duration::from_secs(perf.read_timeout));

    let service_state = Arc::clone(state);
    let service = service_fn(move |req| {
        handler::handle_request(req, Arc::clone(&service_state), peer_addr)
    });
    let conn = graceful.watch(builder.serve_connection(TokioIo::new(stream), service));

    tokio::spawn(async move {
        match conn.await {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                logger::log_debug(&format!("Idle connection from {peer_addr} timed out"));
            }
            Err(err) => logger::log_connection_error(&err),
        }
        drop(slot);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_limit() {
        let counter = ConnectionCounter::default();
        let first = counter.try_acquire(Some(2)).unwrap();
        let second = counter.try_acquire(Some(2)).unwrap();
        assert!(counter.try_acquire(Some(2)).is_none());
        assert_eq!(counter.active(), 2);

        drop(first);
        assert_eq!(counter.active(), 1);
        let _third = counter.try_acquire(Some(2)).unwrap();
        drop(second);
        assert_eq!(counter.active(), 1);
    }

    #[test]
    fn test_counter_unlimited() {
        let counter = ConnectionCounter::default();
        let slots: Vec<_> = (0..10).filter_map(|_| counter.try_acquire(None)).collect();
        assert_eq!(counter.active(), 10);
        drop(slots);
        assert_eq!(counter.active(), 0);
    }
}
