//! HTTP response building module
//!
//! Builders for the JSON responses the service sends. Every body is JSON,
//! errors use the `{"message": ...}` shape.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode};
use serde::Serialize;

pub type HttpResponse = Response<Full<Bytes>>;

const JSON: &str = "application/json; charset=utf-8";

/// Serialize `body` and build a JSON response with the given status
pub fn build_json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(json) => Response::builder()
            .status(status)
            .header(CONTENT_TYPE, JSON)
            .body(Full::new(Bytes::from(json)))
            .unwrap_or_else(|e| {
                log_build_error(status.as_str(), &e);
                Response::new(Full::new(Bytes::new()))
            }),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build_message_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// `{"message": ...}` with the given status
pub fn build_message_response(status: StatusCode, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "message": message }).to_string();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON)
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

pub fn build_404_response() -> HttpResponse {
    build_message_response(StatusCode::NOT_FOUND, "Not found")
}

/// 405 with an `Allow` header listing what the path supports
pub fn build_405_response(allowed: &[Method]) -> HttpResponse {
    let mut response = build_message_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    if let Ok(value) = HeaderValue::from_str(&allow_list(allowed)) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}

pub fn build_413_response() -> HttpResponse {
    build_message_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(allowed: &[Method], enable_cors: bool) -> HttpResponse {
    let allow = allow_list(allowed);
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, allow.as_str());

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", allow.as_str())
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Headers every response carries: `Server`, plus CORS origin when enabled
pub fn apply_common_headers(response: &mut HttpResponse, server_name: &str, enable_cors: bool) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(hyper::header::SERVER, value);
    }
    if enable_cors {
        headers.insert(
            hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
}

/// Drop the body of a response to a HEAD request, keeping its headers
pub fn strip_body(response: HttpResponse) -> HttpResponse {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

fn allow_list(allowed: &[Method]) -> String {
    allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
