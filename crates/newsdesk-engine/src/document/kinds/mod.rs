//! Per-kind block payloads.
//!
//! Each kind owns the knowledge of its `data` shape: which fields are required,
//! which are optional, and how legacy shapes are coerced. Keys a kind does not
//! understand are kept in its `extra` map so they survive a save.

pub mod header;
pub mod image;
pub mod list;
pub mod paragraph;
pub mod quote;
pub mod video;

pub use header::HeaderData;
pub use image::ImageData;
pub use list::{ListData, ListStyle};
pub use paragraph::ParagraphData;
pub use quote::QuoteData;
pub use video::VideoData;

use serde_json::{Map, Value};

use super::DataError;

/// JSON object fields of a block payload.
pub type Fields = Map<String, Value>;

/// Removes a required string field.
pub(crate) fn require_string(fields: &mut Fields, key: &'static str) -> Result<String, DataError> {
    optional_string(fields, key)?.ok_or(DataError::MissingField(key))
}

/// Removes an optional string field. `null` counts as absent.
pub(crate) fn optional_string(
    fields: &mut Fields,
    key: &'static str,
) -> Result<Option<String>, DataError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(DataError::WrongType {
            field: key,
            expected: "a string",
        }),
    }
}

/// Removes an optional integer field. Whole-valued floats (`3.0`) are accepted.
pub(crate) fn optional_integer(
    fields: &mut Fields,
    key: &'static str,
) -> Result<Option<i64>, DataError> {
    let wrong_type = DataError::WrongType {
        field: key,
        expected: "an integer",
    };
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                    _ => Err(wrong_type),
                }
            }
        }
        Some(_) => Err(wrong_type),
    }
}
