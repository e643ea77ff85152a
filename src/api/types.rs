// API types module
// Request and response bodies of the movie endpoints

use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::store::NewMovie;

/// Body of POST and PUT; every field may be absent until validated
#[derive(Debug, Default, Deserialize)]
pub struct MovieInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl MovieInput {
    /// Parse a request body. An empty body counts as `{}`; anything other
    /// than a JSON object carries none of the required fields.
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::Validation(format!("Invalid JSON body: {e}")))?;
        if !value.is_object() {
            return Ok(Self::default());
        }

        serde_json::from_value(value)
            .map_err(|e| ApiError::Validation(format!("Invalid movie fields: {e}")))
    }

    /// All three fields present and non-empty
    pub fn validate(self) -> Result<NewMovie, ApiError> {
        match (non_empty(self.name), non_empty(self.img), non_empty(self.summary)) {
            (Some(name), Some(img), Some(summary)) => Ok(NewMovie::new(name, img, summary)),
            _ => Err(ApiError::required_fields()),
        }
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Body of a successful DELETE
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub changes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(body: &str) -> Result<NewMovie, ApiError> {
        MovieInput::parse(body.as_bytes())?.validate()
    }

    #[test]
    fn test_valid_input() {
        let movie = validate(r#"{"name":"X","img":"u","summary":"s"}"#).unwrap();
        assert_eq!(movie, NewMovie::new("X", "u", "s"));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let movie = validate(r#"{"id":99,"name":"X","img":"u","summary":"s"}"#).unwrap();
        assert_eq!(movie.name, "X");
    }

    #[test]
    fn test_missing_empty_or_null_fields() {
        for body in [
            r#"{"img":"u","summary":"s"}"#,
            r#"{"name":"","img":"u","summary":"s"}"#,
            r#"{"name":"X","img":null,"summary":"s"}"#,
            r#"{"name":"X","img":"u"}"#,
            "{}",
            "",
            "[]",
        ] {
            let err = validate(body).unwrap_err();
            assert_eq!(err.to_string(), "Name, img, and summary are required", "{body}");
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = validate(r#"{"name":"#).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().starts_with("Invalid JSON body"));
    }

    #[test]
    fn test_wrong_field_type() {
        let err = validate(r#"{"name":5,"img":"u","summary":"s"}"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid movie fields"));
    }
}
