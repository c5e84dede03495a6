use serde::Serialize;
use serde_json::Value;

use super::DataError;
use super::kinds::Fields;

/// Presentation class for highlighted blocks, in the editor and on the page.
pub const HIGHLIGHT_CLASS: &str = "editor-highlight";

/// State of the highlight tune. Keys other than `highlighted` are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HighlightTune {
    pub highlighted: bool,
    #[serde(flatten)]
    pub extra: Fields,
}

impl HighlightTune {
    pub fn new(highlighted: bool) -> Self {
        Self {
            highlighted,
            extra: Fields::new(),
        }
    }
}

/// Per-block decorations, keyed by tune name.
///
/// Only `highlight` has meaning to the renderer; other tunes are carried along.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tunes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightTune>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Tunes {
    pub const HIGHLIGHT: &'static str = "highlight";

    pub fn highlighted(highlighted: bool) -> Self {
        Self {
            highlight: Some(HighlightTune::new(highlighted)),
            extra: Fields::new(),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlight.as_ref().is_some_and(|h| h.highlighted)
    }

    pub fn is_empty(&self) -> bool {
        self.highlight.is_none() && self.extra.is_empty()
    }

    /// Sets the highlight state, keeping any other keys of the tune.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlight.get_or_insert_with(HighlightTune::default).highlighted = highlighted;
    }

    /// Reads a `tunes` object. A missing or `null` highlight flag reads as
    /// not highlighted and is written back as `false`.
    pub fn from_value(value: Value) -> Result<Self, DataError> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Err(DataError::WrongType {
                    field: "tunes",
                    expected: "an object",
                });
            }
        };

        let highlight = match fields.remove(Self::HIGHLIGHT) {
            None | Some(Value::Null) => None,
            Some(Value::Object(mut h)) => Some(HighlightTune {
                highlighted: match h.remove("highlighted") {
                    None | Some(Value::Null) => false,
                    Some(Value::Bool(b)) => b,
                    Some(_) => {
                        return Err(DataError::WrongType {
                            field: "tunes.highlight.highlighted",
                            expected: "a boolean",
                        });
                    }
                },
                extra: h,
            }),
            Some(_) => {
                return Err(DataError::WrongType {
                    field: "tunes.highlight",
                    expected: "an object",
                });
            }
        };

        Ok(Self {
            highlight,
            extra: fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn highlight_state_is_read() {
        let tunes = Tunes::from_value(json!({ "highlight": { "highlighted": true } })).unwrap();
        assert!(tunes.is_highlighted());
    }

    #[test]
    fn missing_flag_means_not_highlighted() {
        let tunes = Tunes::from_value(json!({ "highlight": {} })).unwrap();
        assert!(!tunes.is_highlighted());
        assert!(!tunes.is_empty());
    }

    #[test]
    fn other_tunes_are_kept() {
        let tunes = Tunes::from_value(json!({ "anchor": { "id": "intro" } })).unwrap();
        assert_eq!(tunes.extra.get("anchor"), Some(&json!({ "id": "intro" })));
        assert_eq!(
            serde_json::to_value(&tunes).unwrap(),
            json!({ "anchor": { "id": "intro" } })
        );
    }

    #[test]
    fn highlight_keeps_its_other_keys() {
        let raw = json!({ "highlight": { "color": "red", "highlighted": true } });
        let mut tunes = Tunes::from_value(raw.clone()).unwrap();
        assert!(tunes.is_highlighted());
        assert_eq!(serde_json::to_value(&tunes).unwrap(), raw);

        tunes.set_highlighted(false);
        assert_eq!(
            serde_json::to_value(&tunes).unwrap(),
            json!({ "highlight": { "color": "red", "highlighted": false } })
        );
    }

    #[test]
    fn non_object_tunes_are_malformed() {
        assert!(Tunes::from_value(json!("bold")).is_err());
        assert!(Tunes::from_value(json!({ "highlight": true })).is_err());
    }
}
