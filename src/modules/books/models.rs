use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use folio_store::BookRecord;

use crate::utils;

/// Calendar year of publication.
///
/// Accepted on the wire as either a bare integer (`1997`) or a string
/// (`"1997"`), always rendered back as the 4-digit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishedYear(pub i32);

impl Serialize for PublishedYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for PublishedYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct YearVisitor;

        impl Visitor<'_> for YearVisitor {
            type Value = PublishedYear;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a calendar year as an integer or string")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                i32::try_from(value)
                    .map(PublishedYear)
                    .map_err(|_| E::custom(format!("year out of range: {value}")))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                i32::try_from(value)
                    .map(PublishedYear)
                    .map_err(|_| E::custom(format!("year out of range: {value}")))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value
                    .trim()
                    .parse::<i32>()
                    .map(PublishedYear)
                    .map_err(|_| E::custom(format!("invalid year: {value:?}")))
            }
        }

        deserializer.deserialize_any(YearVisitor)
    }
}

/// Request body for create and update. Required-field enforcement comes
/// from serde; content rules live in [`BookPayload::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct BookPayload {
    pub name: String,
    pub author: String,
    pub published_year: PublishedYear,
    pub genres: Vec<String>,
    pub description: String,
}

impl BookPayload {
    /// Content validation beyond the schema shape.
    pub fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut details = Vec::new();
        if self.name.trim().is_empty() {
            details.push(serde_json::json!({"field": "name", "error": "must not be empty"}));
        }
        if self.genres.is_empty() {
            details.push(serde_json::json!({"field": "genres", "error": "must not be empty"}));
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }

    /// Build the document to persist: server-assigned identity, author
    /// normalized to title case, fingerprint left for the caller to
    /// compute.
    pub fn into_record(self, book_id: String) -> BookRecord {
        BookRecord {
            book_id,
            name: self.name,
            author: utils::title_case(&self.author),
            description: self.description,
            published_year: self.published_year.0,
            genres: self.genres,
            etag: None,
        }
    }
}

/// Full book representation returned by create, get, and update. The
/// identity travels as the `link`; the fingerprint travels as the `ETag`
/// header, not in the body.
#[derive(Debug, Clone, Serialize)]
pub struct BookResponse {
    pub name: String,
    pub author: String,
    pub published_year: PublishedYear,
    pub genres: Vec<String>,
    pub description: String,
    pub link: String,
}

impl BookResponse {
    pub fn from_record(record: &BookRecord, link: String) -> Self {
        Self {
            name: record.name.clone(),
            author: record.author.clone(),
            published_year: PublishedYear(record.published_year),
            genres: record.genres.clone(),
            description: record.description.clone(),
            link,
        }
    }
}

/// Abbreviated book representation used in list pages.
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub name: String,
    pub author: String,
    pub link: String,
}

/// Response body for `GET /books`.
#[derive(Debug, Clone, Serialize)]
pub struct BookListResponse {
    pub total_results: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    pub books: Vec<BookSummary>,
}
