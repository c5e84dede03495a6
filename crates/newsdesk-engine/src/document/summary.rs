use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::{Block, BlockContent, Document};

/// Shape statistics for a document, for dashboards and diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub block_count: usize,
    pub fallback_count: usize,
    /// Count per `type` tag; blocks without a tag are counted under `"?"`.
    pub by_type: BTreeMap<String, usize>,
    pub first_block_type: Option<String>,
    pub highlighted_count: usize,
}

impl Document {
    pub fn summary(&self) -> DocumentSummary {
        let mut summary = DocumentSummary {
            block_count: self.blocks.len(),
            first_block_type: self
                .blocks
                .first()
                .map(|b| b.type_tag().unwrap_or("?").to_string()),
            ..Default::default()
        };

        for block in &self.blocks {
            let tag = block.type_tag().unwrap_or("?");
            *summary.by_type.entry(tag.to_string()).or_default() += 1;
            if block.is_fallback() {
                summary.fallback_count += 1;
            }
            if block.is_highlighted() {
                summary.highlighted_count += 1;
            }
        }

        summary
    }

    /// Plain-text excerpt built from the leading paragraphs, with inline markup
    /// stripped and entities decoded, cut at a word boundary to at most
    /// `max_chars` characters (an ellipsis is appended when cut).
    pub fn excerpt(&self, max_chars: usize) -> Option<String> {
        let mut text = String::new();
        for block in &self.blocks {
            let Block::Typed(typed) = block else {
                continue;
            };
            let BlockContent::Paragraph(p) = &typed.content else {
                continue;
            };
            let plain = plain_text(&p.text);
            if plain.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&plain);
            if text.chars().count() >= max_chars {
                break;
            }
        }

        if text.is_empty() {
            return None;
        }
        Some(truncate_words(&text, max_chars))
    }
}

/// Strips inline tags and decodes HTML entities, collapsing whitespace.
pub fn plain_text(rich: &str) -> String {
    static BREAK_REGEX: OnceLock<Regex> = OnceLock::new();
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let breaks =
        BREAK_REGEX.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("Invalid break regex"));
    let tags = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

    let spaced = breaks.replace_all(rich, " ");
    let stripped = tags.replace_all(&spaced, "");
    let decoded = html_escape::decode_html_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let at_word_end = text
        .chars()
        .nth(max_chars)
        .is_some_and(char::is_whitespace);
    let trimmed = match cut.rfind(' ') {
        _ if at_word_end => cut.as_str(),
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end_matches([',', '.', ';', ':']))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ListStyle;
    use serde_json::json;

    #[test]
    fn summary_counts_kinds() {
        let doc = Document::new(vec![
            Block::header("Title", 2),
            Block::paragraph("a").with_highlight(true),
            Block::paragraph("b"),
            Block::list(ListStyle::Ordered, ["x"]),
            Block::fallback(json!({ "type": "table", "data": {} })),
            Block::fallback(json!(42)),
        ]);

        let summary = doc.summary();
        assert_eq!(summary.block_count, 6);
        assert_eq!(summary.fallback_count, 2);
        assert_eq!(summary.highlighted_count, 1);
        assert_eq!(summary.first_block_type.as_deref(), Some("header"));
        assert_eq!(summary.by_type.get("paragraph"), Some(&2));
        assert_eq!(summary.by_type.get("table"), Some(&1));
        assert_eq!(summary.by_type.get("?"), Some(&1));
    }

    #[test]
    fn plain_text_strips_markup() {
        assert_eq!(
            plain_text("<b>Breaking</b>:&nbsp;rates <a href=\"x\">rise</a>"),
            "Breaking: rates rise"
        );
    }

    #[test]
    fn excerpt_skips_non_paragraphs_and_truncates() {
        let doc = Document::new(vec![
            Block::header("Ignored", 2),
            Block::paragraph("The council voted on Tuesday to approve the budget."),
        ]);
        assert_eq!(doc.excerpt(20).as_deref(), Some("The council voted on…"));
        assert_eq!(
            doc.excerpt(200).as_deref(),
            Some("The council voted on Tuesday to approve the budget.")
        );
    }

    #[test]
    fn excerpt_of_empty_document_is_none() {
        assert_eq!(Document::empty().excerpt(100), None);
    }
}
