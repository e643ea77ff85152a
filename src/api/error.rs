// API error module
// Maps store and validation failures onto HTTP status codes

use hyper::StatusCode;
use thiserror::Error;

use crate::http::{build_message_response, HttpResponse};
use crate::store::StoreError;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Name, img, and summary are required";

/// Failure of a single movie request
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, empty, or unparseable input
    #[error("{0}")]
    Validation(String),

    #[error("Movie not found")]
    NotFound,

    /// Backend failure, message passed through to the client
    #[error(transparent)]
    Storage(StoreError),
}

impl ApiError {
    pub fn required_fields() -> Self {
        Self::Validation(REQUIRED_FIELDS_MESSAGE.to_string())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        build_message_response(self.status(), &self.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::required_fields().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(StoreError::Poisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err = ApiError::from(StoreError::NotFound(7));
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.to_string(), "Movie not found");
    }

    #[test]
    fn test_storage_message_surfaced() {
        let err = ApiError::from(StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        assert_eq!(
            err.to_string(),
            rusqlite::Error::QueryReturnedNoRows.to_string()
        );
    }
}
