use serde::Serialize;

use super::{Fields, optional_string, require_string};
use crate::document::DataError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteData {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl QuoteData {
    pub fn new(text: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            text: text.into(),
            caption,
            extra: Fields::new(),
        }
    }

    pub fn from_data(mut data: Fields) -> Result<Self, DataError> {
        let text = require_string(&mut data, "text")?;
        let caption = optional_string(&mut data, "caption")?;
        Ok(Self {
            text,
            caption,
            extra: data,
        })
    }
}
