// Movie handlers module
// One store operation per request; errors are mapped by the caller

use hyper::StatusCode;

use super::error::ApiError;
use super::types::{DeleteResponse, MovieInput};
use crate::config::AppState;
use crate::http::{build_json_response, HttpResponse};

/// Non-numeric ids can never match a row
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// GET /movies
pub async fn list_movies(state: &AppState) -> Result<HttpResponse, ApiError> {
    let movies = state.store.run(|store| store.list_all()).await?;
    Ok(build_json_response(StatusCode::OK, &movies))
}

/// GET /movies/:id
pub async fn get_movie(state: &AppState, raw_id: &str) -> Result<HttpResponse, ApiError> {
    let id = parse_id(raw_id)?;
    let movie = state.store.run(move |store| store.get_by_id(id)).await?;
    Ok(build_json_response(StatusCode::OK, &movie))
}

/// POST /movies
pub async fn create_movie(state: &AppState, body: &[u8]) -> Result<HttpResponse, ApiError> {
    let movie = MovieInput::parse(body)?.validate()?;
    let created = state
        .store
        .run(move |store| store.insert(&movie).map(|id| movie.with_id(id)))
        .await?;
    Ok(build_json_response(StatusCode::CREATED, &created))
}

/// PUT /movies/:id
///
/// Input is validated before the id is looked at, so a bad body on an
/// unknown id is a 400.
pub async fn update_movie(
    state: &AppState,
    raw_id: &str,
    body: &[u8],
) -> Result<HttpResponse, ApiError> {
    let movie = MovieInput::parse(body)?.validate()?;
    let id = parse_id(raw_id)?;
    let updated = state
        .store
        .run(move |store| {
            let changes = store.update_by_id(id, &movie)?;
            Ok((changes > 0).then(|| movie.with_id(id)))
        })
        .await?;
    let movie = updated.ok_or(ApiError::NotFound)?;
    Ok(build_json_response(StatusCode::OK, &movie))
}

/// DELETE /movies/:id
pub async fn delete_movie(state: &AppState, raw_id: &str) -> Result<HttpResponse, ApiError> {
    let id = parse_id(raw_id)?;
    let changes = state.store.run(move |store| store.delete_by_id(id)).await?;
    if changes == 0 {
        return Err(ApiError::NotFound);
    }
    let body = DeleteResponse {
        message: "Movie deleted",
        changes,
    };
    Ok(build_json_response(StatusCode::OK, &body))
}
