use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Fields, optional_string};
use crate::document::DataError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

impl ListStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ListStyle::Ordered => "ordered",
            ListStyle::Unordered => "unordered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ordered" => Some(ListStyle::Ordered),
            "unordered" => Some(ListStyle::Unordered),
            _ => None,
        }
    }
}

/// List payload: a flat sequence of rich-text items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListData {
    pub style: ListStyle,
    pub items: Vec<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl ListData {
    pub fn new(style: ListStyle, items: Vec<String>) -> Self {
        Self {
            style,
            items,
            extra: Fields::new(),
        }
    }

    /// Parses a list payload.
    ///
    /// A missing `style` means unordered. Items are plain strings; the
    /// object form `{ "content": "...", "items": [] }` written by newer list
    /// tools is accepted only while it has no nested children, since a flat
    /// list cannot hold them.
    pub fn from_data(mut data: Fields) -> Result<Self, DataError> {
        let style = match optional_string(&mut data, "style")? {
            None => ListStyle::default(),
            Some(s) => ListStyle::parse(&s).ok_or(DataError::UnknownListStyle(s))?,
        };

        let items = match data.remove("items") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(list_item)
                .collect::<Result<Vec<_>, _>>()?,
            None => return Err(DataError::MissingField("items")),
            Some(_) => {
                return Err(DataError::WrongType {
                    field: "items",
                    expected: "an array",
                });
            }
        };

        Ok(Self {
            style,
            items,
            extra: data,
        })
    }
}

fn list_item(item: Value) -> Result<String, DataError> {
    let not_flat = DataError::WrongType {
        field: "items",
        expected: "an array of strings",
    };
    match item {
        Value::String(s) => Ok(s),
        Value::Object(mut obj) => {
            let content = match obj.remove("content") {
                Some(Value::String(s)) => s,
                _ => return Err(not_flat),
            };
            let nested_empty = match obj.remove("items") {
                None => true,
                Some(Value::Array(children)) => children.is_empty(),
                Some(_) => false,
            };
            let meta_empty = match obj.remove("meta") {
                None => true,
                Some(Value::Object(meta)) => meta.is_empty(),
                Some(_) => false,
            };
            if nested_empty && meta_empty && obj.is_empty() {
                Ok(content)
            } else {
                Err(not_flat)
            }
        }
        _ => Err(not_flat),
    }
}
