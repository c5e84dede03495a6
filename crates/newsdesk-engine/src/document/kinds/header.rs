use serde::Serialize;

use super::{Fields, optional_integer, require_string};
use crate::document::DataError;

/// Header payload.
///
/// `level` is stored as given; clamping to the renderable range happens in the
/// renderer, so an out-of-range level survives a save untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderData {
    pub text: String,
    pub level: i64,
    #[serde(flatten)]
    pub extra: Fields,
}

impl HeaderData {
    /// Level used when the payload carries none.
    pub const DEFAULT_LEVEL: i64 = 2;
    /// Smallest level the renderer emits.
    pub const MIN_RENDER_LEVEL: i64 = 2;
    /// Largest level the renderer emits.
    pub const MAX_RENDER_LEVEL: i64 = 4;

    pub fn new(text: impl Into<String>, level: i64) -> Self {
        Self {
            text: text.into(),
            level,
            extra: Fields::new(),
        }
    }

    pub fn from_data(mut data: Fields) -> Result<Self, DataError> {
        let text = require_string(&mut data, "text")?;
        let level = optional_integer(&mut data, "level")?.unwrap_or(Self::DEFAULT_LEVEL);
        Ok(Self {
            text,
            level,
            extra: data,
        })
    }

    /// The heading level actually rendered.
    pub fn render_level(&self) -> u8 {
        self.level
            .clamp(Self::MIN_RENDER_LEVEL, Self::MAX_RENDER_LEVEL) as u8
    }
}

impl Default for HeaderData {
    fn default() -> Self {
        Self::new("", Self::DEFAULT_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(-3, 2)]
    #[case(1, 2)]
    #[case(2, 2)]
    #[case(3, 3)]
    #[case(4, 4)]
    #[case(9, 4)]
    fn render_level_is_clamped(#[case] level: i64, #[case] expected: u8) {
        assert_eq!(HeaderData::new("x", level).render_level(), expected);
    }

    #[test]
    fn missing_level_defaults() {
        let Value::Object(data) = json!({ "text": "Hi" }) else {
            unreachable!()
        };
        let header = HeaderData::from_data(data).unwrap();
        assert_eq!(header.level, HeaderData::DEFAULT_LEVEL);
    }

    #[test]
    fn string_level_is_malformed() {
        let Value::Object(data) = json!({ "text": "Hi", "level": "two" }) else {
            unreachable!()
        };
        assert!(HeaderData::from_data(data).is_err());
    }
}
