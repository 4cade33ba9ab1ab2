//! Content fingerprint derivation.
//!
//! The fingerprint is a pure function of a book's content fields: the
//! canonical field map (lexicographically sorted keys, stable textual
//! values) is serialized as canonical JSON and digested with SHA-256.
//! Identity and the fingerprint itself never participate, so a replace
//! that changes no content field keeps the same fingerprint.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use folio_store::BookRecord;

/// A field could not be rendered into its canonical form.
#[derive(Debug, thiserror::Error)]
#[error("failed to canonicalize book fields: {0}")]
pub struct EncodingError(#[from] serde_json::Error);

/// Derive the content fingerprint for a book document.
pub fn fingerprint(record: &BookRecord) -> Result<String, EncodingError> {
    // BTreeMap keeps the key order lexicographic; serde_json preserves it.
    let mut fields: BTreeMap<&'static str, serde_json::Value> = BTreeMap::new();
    fields.insert("author", serde_json::Value::String(record.author.clone()));
    fields.insert(
        "description",
        serde_json::Value::String(record.description.clone()),
    );
    fields.insert("genres", serde_json::to_value(&record.genres)?);
    fields.insert("name", serde_json::Value::String(record.name.clone()));
    // Years render as point-in-time strings, never locale-dependent.
    fields.insert(
        "published_year",
        serde_json::Value::String(format!("{:04}-01-01T00:00:00Z", record.published_year)),
    );

    let canonical = serde_json::to_string(&fields)?;
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(digest.iter().fold(String::new(), |mut hex, byte| {
        let _ = write!(hex, "{byte:02x}");
        hex
    }))
}
