use serde::Serialize;
use serde_json::Value;

use super::{Fields, optional_string};
use crate::document::DataError;

/// Image payload.
///
/// Image tools store the source either as `url` or nested as `file.url`; the
/// first non-empty one is the [`source`](ImageData::source). Both are kept as
/// stored, so an empty `url` next to a `file` object survives a save.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl ImageData {
    pub fn new(url: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            url: Some(url.into()),
            caption,
            extra: Fields::new(),
        }
    }

    pub fn from_data(mut data: Fields) -> Result<Self, DataError> {
        let url = optional_string(&mut data, "url")?;
        let caption = optional_string(&mut data, "caption")?;
        let image = Self {
            url,
            caption,
            extra: data,
        };
        match image.source() {
            Some(_) => Ok(image),
            None => Err(DataError::MissingField("url")),
        }
    }

    /// The image location: `url`, else `file.url`, whichever is non-empty.
    pub fn source(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| file_url(&self.extra))
    }
}

fn file_url(data: &Fields) -> Option<&str> {
    match data.get("file")?.get("url")? {
        Value::String(url) if !url.is_empty() => Some(url),
        _ => None,
    }
}
