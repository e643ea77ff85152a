//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for route matching,
//! method validation, body size checks, and access logging.

use crate::api;
use crate::config::AppState;
use crate::handler::health;
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, Endpoint};
use hyper::body::Body;
use hyper::{Method, Request, StatusCode};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<HttpResponse, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_log = state.config.logging.access_log;
    let mut entry = access_log.then(|| AccessLogEntry::from_request(&remote_addr.to_string(), &req));
    let is_head = *req.method() == Method::HEAD;

    let request_timeout = Duration::from_secs(state.config.performance.request_timeout);
    let mut response = with_deadline(request_timeout, route_request(req, &state)).await;

    let http_config = &state.config.http;
    http::apply_common_headers(&mut response, &http_config.server_name, http_config.enable_cors);

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.finish(
            response.status().as_u16(),
            usize::try_from(body_bytes).unwrap_or(usize::MAX),
            started,
        );
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    if is_head {
        response = http::strip_body(response);
    }
    Ok(response)
}

/// Answer 503 when the handler runs past `limit`
async fn with_deadline<F>(limit: Duration, handler: F) -> HttpResponse
where
    F: Future<Output = HttpResponse>,
{
    tokio::time::timeout(limit, handler).await.unwrap_or_else(|_| {
        logger::log_warning(&format!("Request exceeded {}s deadline", limit.as_secs()));
        http::build_message_response(StatusCode::SERVICE_UNAVAILABLE, "Request timed out")
    })
}

/// Route request based on path and method
async fn route_request<B>(req: Request<B>, state: &AppState) -> HttpResponse
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_owned();
    let Some(endpoint) = routing::match_path(&path) else {
        return http::build_404_response();
    };

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(req.method(), endpoint, state.config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    // 3. Dispatch
    match endpoint {
        Endpoint::Liveness => health::liveness(),
        Endpoint::Readiness => health::readiness(state).await,
        Endpoint::Movies | Endpoint::Movie(_) => api::handle_movies(req, endpoint, state).await,
    }
}

/// Answer OPTIONS and reject methods the endpoint does not support
fn check_http_method(
    method: &Method,
    endpoint: Endpoint<'_>,
    enable_cors: bool,
) -> Option<HttpResponse> {
    let allowed = endpoint.allowed_methods();
    if *method == Method::OPTIONS {
        return Some(http::build_options_response(allowed, enable_cors));
    }
    let head_as_get = *method == Method::HEAD && allowed.contains(&Method::GET);
    if head_as_get || allowed.contains(method) {
        None
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        Some(http::build_405_response(allowed))
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = req.headers().get(hyper::header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
