//! # Normalization
//!
//! Turns whatever the article store hands back into a [`Document`], without
//! ever failing. Content arrives from heterogeneous sources: editor saves,
//! hand-edited JSON, legacy schemas, string-encoded columns.
//!
//! Two tiers of fail-soft handling:
//!
//! 1. **Envelope**: a missing value, unparseable text, or a `blocks` field that is
//!    not an array yields an empty document.
//! 2. **Blocks**: an element that cannot be read as one of the known kinds is
//!    kept verbatim as a [`Block::Fallback`] and reported as a [`Degradation`].
//!    Nothing is dropped, so a single bad block never blanks an article.

use serde_json::Value;

use crate::document::{
    Block, BlockContent, BlockType, DataError, Document, FallbackBlock, Fields, Tunes, TypedBlock,
};

/// A block that was kept as fallback rather than typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degradation {
    /// Position of the block in the document.
    pub index: usize,
    pub reason: DataError,
}

/// Result of [`normalize_with_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub document: Document,
    pub degradations: Vec<Degradation>,
}

/// Normalizes a raw content value: `null`, a JSON string, or a structured
/// document.
pub fn normalize(raw: &Value) -> Document {
    normalize_with_report(raw).document
}

/// Normalizes JSON text.
pub fn normalize_str(text: &str) -> Document {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => normalize_structured(&value).document,
        Err(e) => {
            log::debug!("content is not valid JSON, using empty document: {e}");
            Document::empty()
        }
    }
}

/// Normalizes an optional raw value; `None` behaves like `null`.
pub fn normalize_opt(raw: Option<&Value>) -> Document {
    raw.map(normalize).unwrap_or_default()
}

/// Like [`normalize`], also reporting which blocks degraded to fallback.
pub fn normalize_with_report(raw: &Value) -> Normalized {
    match raw {
        Value::Null => Normalized::empty(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => normalize_structured(&value),
            Err(e) => {
                log::debug!("string content is not valid JSON, using empty document: {e}");
                Normalized::empty()
            }
        },
        structured => normalize_structured(structured),
    }
}

impl Normalized {
    fn empty() -> Self {
        Self {
            document: Document::empty(),
            degradations: Vec::new(),
        }
    }
}

fn normalize_structured(value: &Value) -> Normalized {
    let Value::Object(envelope) = value else {
        return Normalized::empty();
    };

    let mut normalized = match envelope.get("blocks") {
        Some(Value::Array(raw_blocks)) => {
            let mut degradations = Vec::new();
            let blocks = raw_blocks
                .iter()
                .enumerate()
                .map(|(index, raw)| match normalize_block(raw) {
                    Ok(block) => block,
                    Err(reason) => {
                        log::debug!("block {index} kept as fallback: {reason}");
                        degradations.push(Degradation { index, reason });
                        Block::Fallback(FallbackBlock::new(raw.clone()))
                    }
                })
                .collect();
            Normalized {
                document: Document::new(blocks),
                degradations,
            }
        }
        _ => Normalized::empty(),
    };

    if let Some(time) = envelope.get("time").and_then(timestamp) {
        normalized.document = normalized.document.with_time(time);
    }
    if let Some(Value::String(version)) = envelope.get("version") {
        normalized.document = normalized.document.with_version(version.clone());
    }
    normalized
}

fn timestamp(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// Reads one raw block as a typed block.
///
/// Errors say why the block must stay fallback; callers keep the raw value.
///
/// Equivalent shapes are read to one form and written back in it, without a
/// degradation: a `null` `id`, `data`, `tunes` or optional field is the same
/// as an absent one, a missing or `null` highlight flag is `false`, a missing
/// header level is [`HeaderData::DEFAULT_LEVEL`](crate::document::HeaderData::DEFAULT_LEVEL),
/// and list items in object form become strings. Everything else the block
/// carries is written back as stored.
pub fn normalize_block(raw: &Value) -> Result<Block, DataError> {
    let Value::Object(fields) = raw else {
        return Err(DataError::NotAnObject);
    };
    let mut fields = fields.clone();

    let tag = match fields.remove("type") {
        Some(Value::String(tag)) => tag,
        _ => return Err(DataError::MissingType),
    };
    let block_type = BlockType::from_tag(&tag).ok_or(DataError::UnknownType(tag))?;

    let id = match fields.remove("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id),
        Some(_) => {
            return Err(DataError::WrongType {
                field: "id",
                expected: "a string",
            });
        }
    };

    let data = match fields.remove("data") {
        None | Some(Value::Null) => Fields::new(),
        Some(Value::Object(data)) => data,
        Some(_) => {
            return Err(DataError::WrongType {
                field: "data",
                expected: "an object",
            });
        }
    };

    let tunes = match fields.remove("tunes") {
        None => Tunes::default(),
        Some(value) => Tunes::from_value(value)?,
    };

    if let Some(unexpected) = fields.keys().next() {
        return Err(DataError::UnexpectedField(unexpected.clone()));
    }

    let content = BlockContent::from_data(block_type, data)?;
    Ok(Block::Typed(TypedBlock { id, content, tunes }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ListStyle;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn null_and_empty_inputs_yield_empty_documents() {
        for raw in [json!(null), json!({}), json!([]), json!(7), json!(true)] {
            assert!(normalize(&raw).is_empty(), "input {raw}");
        }
        assert!(normalize_opt(None).is_empty());
    }

    #[test]
    fn malformed_json_text_yields_empty_document() {
        assert!(normalize(&json!("{not json")).is_empty());
        assert!(normalize_str("{\"blocks\": [").is_empty());
    }

    #[test]
    fn string_encoded_document_is_parsed() {
        let text = r#"{"time": 5, "blocks": [{"type": "paragraph", "data": {"text": "Hi"}}], "version": "2.31.0"}"#;
        let doc = normalize(&Value::String(text.to_string()));
        assert_eq!(doc.time(), Some(5));
        assert_eq!(doc.version(), Some("2.31.0"));
        assert_eq!(doc.blocks(), &[Block::paragraph("Hi")]);
    }

    #[test]
    fn non_array_blocks_become_empty() {
        let doc = normalize(&json!({ "blocks": { "0": "x" }, "version": "1" }));
        assert!(doc.is_empty());
        assert_eq!(doc.version(), Some("1"));
    }

    #[test]
    fn typed_blocks_are_recognized() {
        let doc = normalize(&json!({
            "blocks": [
                { "id": "a", "type": "header", "data": { "text": "T", "level": 3 } },
                { "type": "list", "data": { "style": "ordered", "items": ["1", "2"] } },
                { "type": "video", "data": {} },
                { "type": "video" }
            ]
        }));
        assert_eq!(
            doc.blocks(),
            &[
                Block::header("T", 3).with_id("a"),
                Block::list(ListStyle::Ordered, ["1", "2"]),
                Block::video(None),
                Block::video(None),
            ]
        );
    }

    #[test]
    fn equivalent_shapes_are_written_canonically() {
        let raw = json!({
            "blocks": [
                { "type": "video", "data": null, "tunes": null },
                { "id": null, "type": "quote", "data": { "text": "Q", "caption": null } },
                { "type": "list", "data": { "items": [{ "content": "a", "items": [] }] } },
                { "type": "image", "data": { "url": "", "file": { "url": "b.png" } } }
            ]
        });

        let report = normalize_with_report(&raw);

        assert!(report.degradations.is_empty());
        assert_eq!(
            report.document.to_value()["blocks"],
            json!([
                { "type": "video", "data": {} },
                { "type": "quote", "data": { "text": "Q" } },
                { "type": "list", "data": { "style": "unordered", "items": ["a"] } },
                { "type": "image", "data": { "url": "", "file": { "url": "b.png" } } }
            ])
        );
        assert_eq!(normalize(&report.document.to_value()), report.document);
    }

    #[test]
    fn malformed_blocks_are_kept_as_fallback_in_place() {
        let raw = json!({
            "blocks": [
                { "type": "paragraph", "data": { "text": "ok" } },
                { "type": "paragraph", "data": { "text": 12 } },
                { "data": { "text": "no type" } },
                "stray string",
                { "type": "header", "data": "oops" },
                { "type": "unknown-future-type", "data": { "foo": 1 } },
                { "type": "paragraph", "data": { "text": "end" } }
            ]
        });

        let Normalized {
            document,
            degradations,
        } = normalize_with_report(&raw);

        assert_eq!(document.len(), 7);
        assert_eq!(document.blocks()[0], Block::paragraph("ok"));
        assert_eq!(document.blocks()[6], Block::paragraph("end"));
        for (i, block) in document.blocks().iter().enumerate().skip(1).take(5) {
            assert_eq!(
                serde_json::to_value(block).unwrap(),
                raw["blocks"][i],
                "block {i} must be preserved verbatim"
            );
        }

        let indices: Vec<_> = degradations.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert_eq!(degradations[1].reason, DataError::MissingType);
        assert_eq!(degradations[2].reason, DataError::NotAnObject);
        assert_eq!(
            degradations[4].reason,
            DataError::UnknownType("unknown-future-type".into())
        );
    }

    #[test]
    fn bad_tunes_or_stray_fields_degrade_the_block() {
        let doc = normalize(&json!({
            "blocks": [
                { "type": "paragraph", "data": { "text": "a" }, "tunes": { "highlight": "yes" } },
                { "type": "paragraph", "data": { "text": "b" }, "style": "lead" },
                { "type": "paragraph", "data": { "text": "c" }, "id": 3 }
            ]
        }));
        assert!(doc.blocks().iter().all(Block::is_fallback));
    }

    #[test]
    fn extra_data_fields_survive() {
        let raw = json!({
            "blocks": [
                { "type": "quote", "data": { "text": "q", "caption": "c", "alignment": "left" } }
            ]
        });
        let doc = normalize(&raw);
        assert_eq!(doc.to_value(), raw);
    }

    #[test]
    fn float_time_is_truncated() {
        let doc = normalize(&json!({ "time": 1718000000000.7, "blocks": [] }));
        assert_eq!(doc.time(), Some(1718000000000));
    }
}
