//! Common types for the shared crate

use serde::{Deserialize, Deserializer};

/// Canonical row identifier.
///
/// The hosted backend serves UUID strings for some tables and integer ids
/// for others. Every id is normalized to a `String` when a row is decoded,
/// so filter comparisons downstream are always plain string equality.
pub type RowId = String;

/// Entities addressable by a row id inside an in-memory collection.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Deserialize an id that may arrive as a JSON string or number.
///
/// Used with `#[serde(deserialize_with = "types::row_id")]` on id fields.
pub fn row_id<'de, D>(deserializer: D) -> Result<RowId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        // Json numbers from loosely typed columns; integral floats only
        Raw::Float(f) => (f as i64).to_string(),
    })
}

/// Same normalization for optional id columns (nullable foreign keys).
pub fn opt_row_id<'de, D>(deserializer: D) -> Result<Option<RowId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(raw.map(|r| match r {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    }))
}
