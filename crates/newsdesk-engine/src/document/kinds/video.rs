use serde::Serialize;

use super::{Fields, optional_string};
use crate::document::DataError;

/// Video payload. Holds the URL exactly as the author pasted it; the embed
/// locator is derived again at render time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl VideoData {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url,
            extra: Fields::new(),
        }
    }

    pub fn from_data(mut data: Fields) -> Result<Self, DataError> {
        let url = optional_string(&mut data, "url")?;
        Ok(Self { url, extra: data })
    }
}
