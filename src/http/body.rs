//! Request body reading
//!
//! Collects a request body while enforcing the configured size limit.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(u64),

    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Collect the whole body, failing once more than `max_bytes` arrive
pub async fn read_limited<B>(body: B, max_bytes: u64) -> Result<Bytes, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_bytes).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(BodyError::TooLarge(max_bytes))
        }
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    #[tokio::test]
    async fn test_within_limit() {
        let body = Full::new(Bytes::from_static(b"{\"name\":\"X\"}"));
        let bytes = read_limited(body, 64).await.unwrap();
        assert_eq!(&bytes[..], b"{\"name\":\"X\"}");
    }

    #[tokio::test]
    async fn test_over_limit() {
        let body = Full::new(Bytes::from(vec![b'a'; 32]));
        let err = read_limited(body, 16).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge(16)));
    }

    #[tokio::test]
    async fn test_empty_body() {
        let bytes = read_limited(Full::new(Bytes::new()), 16).await.unwrap();
        assert!(bytes.is_empty());
    }
}
