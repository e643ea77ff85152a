// API module entry
// Movie CRUD endpoints over the record store

mod error;
mod handlers;
mod types;

use hyper::body::Body;
use hyper::{Method, Request};

use crate::config::AppState;
use crate::http::{self, BodyError, HttpResponse};
use crate::logger;
use crate::routing::Endpoint;

use error::ApiError;

/// Movie route handler
///
/// Dispatches `/movies` and `/movies/:id` requests to the handler for the
/// method. HEAD is answered like GET; the router strips the body.
pub async fn handle_movies<B>(req: Request<B>, endpoint: Endpoint<'_>, state: &AppState) -> HttpResponse
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let result = match (&method, endpoint) {
        (&Method::GET | &Method::HEAD, Endpoint::Movies) => handlers::list_movies(state).await,
        (&Method::POST, Endpoint::Movies) => match read_body(req, state).await {
            Ok(body) => handlers::create_movie(state, &body).await,
            Err(response) => return response,
        },
        (&Method::GET | &Method::HEAD, Endpoint::Movie(id)) => handlers::get_movie(state, id).await,
        (&Method::PUT, Endpoint::Movie(id)) => match read_body(req, state).await {
            Ok(body) => handlers::update_movie(state, id, &body).await,
            Err(response) => return response,
        },
        (&Method::DELETE, Endpoint::Movie(id)) => handlers::delete_movie(state, id).await,
        _ => return http::build_405_response(endpoint.allowed_methods()),
    };

    result.unwrap_or_else(|err| {
        match &err {
            ApiError::Storage(e) => logger::log_store_error(method.as_str(), &path, e),
            _ => logger::log_debug(&format!("{method} {path} rejected: {err}")),
        }
        err.into_response()
    })
}

async fn read_body<B>(req: Request<B>, state: &AppState) -> Result<hyper::body::Bytes, HttpResponse>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match http::read_limited(req.into_body(), state.config.http.max_body_size).await {
        Ok(body) => Ok(body),
        Err(BodyError::TooLarge(max)) => {
            logger::log_warning(&format!("Request body too large (max: {max} bytes)"));
            Err(http::build_413_response())
        }
        Err(err @ BodyError::Read(_)) => Err(ApiError::Validation(err.to_string()).into_response()),
    }
}
