// Server module entry
// Listener creation, connection serving, the accept loop, and signal-driven shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is renamed
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used types
pub use listener::create_reusable_listener;
pub use server_loop::{start_server_loop, ServerLoopConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config};
    use crate::store::MovieStore;
    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;
    use hyper::{Request, StatusCode};
    use hyper_util::rt::TokioIo;
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpStream;
    use tokio::sync::Notify;

    type Sender = hyper::client::conn::http1::SendRequest<Full<Bytes>>;

    async fn call(
        sender: &mut Sender,
        addr: SocketAddr,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(hyper::header::HOST, addr.to_string())
            .header(hyper::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(
                body.map(|b| b.to_string()).unwrap_or_default(),
            )))
            .unwrap();
        sender.ready().await.unwrap();
        let response = sender.send_request(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_round_trip_over_tcp() {
        let mut config = Config::defaults();
        config.logging.access_log = false;
        let store = MovieStore::in_memory().unwrap();
        store.seed_defaults().unwrap();
        let state = Arc::new(AppState::new(&config, store));

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(
            listener,
            state,
            ServerLoopConfig {
                shutdown_signal: Arc::clone(&shutdown),
                grace_period: Duration::from_secs(2),
            },
        ));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        let client = tokio::spawn(conn);

        let (status, created) = call(
            &mut sender,
            addr,
            "POST",
            "/movies",
            Some(json!({"name": "X", "img": "u", "summary": "s"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created, json!({"id": 4, "name": "X", "img": "u", "summary": "s"}));

        let (status, fetched) = call(&mut sender, addr, "GET", "/movies/4", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, listed) = call(&mut sender, addr, "GET", "/movies", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 4);

        drop(sender);
        let _ = client.await;

        shutdown.notify_one();
        let remaining = server.await.unwrap().unwrap();
        assert_eq!(remaining, 0);
    }
}
