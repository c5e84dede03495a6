use serde::Serialize;

use super::{Fields, require_string};
use crate::document::DataError;

/// Paragraph payload: a single run of rich text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParagraphData {
    pub text: String,
    #[serde(flatten)]
    pub extra: Fields,
}

impl ParagraphData {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Fields::new(),
        }
    }

    pub fn from_data(mut data: Fields) -> Result<Self, DataError> {
        let text = require_string(&mut data, "text")?;
        Ok(Self { text, extra: data })
    }
}
