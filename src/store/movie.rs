// Movie record types

use serde::Serialize;

/// A stored movie, as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub img: String,
    pub summary: String,
}

/// The mutable fields of a movie, used by insert and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub name: String,
    pub img: String,
    pub summary: String,
}

impl NewMovie {
    pub fn new(name: impl Into<String>, img: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            img: img.into(),
            summary: summary.into(),
        }
    }

    /// Attach a store-assigned id
    pub fn with_id(self, id: i64) -> Movie {
        Movie {
            id,
            name: self.name,
            img: self.img,
            summary: self.summary,
        }
    }
}

impl Movie {
    pub(super) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            img: row.get("img")?,
            summary: row.get("summary")?,
        })
    }
}
