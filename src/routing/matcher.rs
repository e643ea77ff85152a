//! Route matching module
//!
//! Maps a request path onto one of the service endpoints.

use hyper::Method;

/// Path of the movie collection
pub const MOVIES_PATH: &str = "/movies";
pub const LIVENESS_PATH: &str = "/healthz";
pub const READINESS_PATH: &str = "/readyz";

const COLLECTION_METHODS: &[Method] = &[Method::GET, Method::POST];
const ITEM_METHODS: &[Method] = &[Method::GET, Method::PUT, Method::DELETE];
const PROBE_METHODS: &[Method] = &[Method::GET];

/// Endpoint a path resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `/movies`
    Movies,
    /// `/movies/:id`, carrying the raw id segment
    Movie(&'a str),
    Liveness,
    Readiness,
}

impl Endpoint<'_> {
    /// Methods the endpoint answers; HEAD follows GET and OPTIONS is answered by the router
    pub const fn allowed_methods(&self) -> &'static [Method] {
        match self {
            Self::Movies => COLLECTION_METHODS,
            Self::Movie(_) => ITEM_METHODS,
            Self::Liveness | Self::Readiness => PROBE_METHODS,
        }
    }
}

/// Resolve a path, tolerating one trailing slash
pub fn match_path(path: &str) -> Option<Endpoint<'_>> {
    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };

    match path {
        MOVIES_PATH => Some(Endpoint::Movies),
        LIVENESS_PATH => Some(Endpoint::Liveness),
        READINESS_PATH => Some(Endpoint::Readiness),
        _ => {
            let id = path.strip_prefix(MOVIES_PATH)?.strip_prefix('/')?;
            if id.is_empty() || id.contains('/') {
                return None;
            }
            Some(Endpoint::Movie(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_collection() {
        assert_eq!(match_path("/movies"), Some(Endpoint::Movies));
        assert_eq!(match_path("/movies/"), Some(Endpoint::Movies));
    }

    #[test]
    fn test_match_item() {
        assert_eq!(match_path("/movies/4"), Some(Endpoint::Movie("4")));
        assert_eq!(match_path("/movies/4/"), Some(Endpoint::Movie("4")));
        assert_eq!(match_path("/movies/abc"), Some(Endpoint::Movie("abc")));
    }

    #[test]
    fn test_match_health() {
        assert_eq!(match_path("/healthz"), Some(Endpoint::Liveness));
        assert_eq!(match_path("/readyz"), Some(Endpoint::Readiness));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(match_path("/"), None);
        assert_eq!(match_path("/moviesx"), None);
        assert_eq!(match_path("/movies//"), None);
        assert_eq!(match_path("/movies/1/extra"), None);
        assert_eq!(match_path("/api/movies"), None);
    }

    #[test]
    fn test_allowed_methods() {
        assert_eq!(
            Endpoint::Movies.allowed_methods(),
            &[Method::GET, Method::POST]
        );
        assert!(Endpoint::Movie("1")
            .allowed_methods()
            .contains(&Method::DELETE));
    }
}
