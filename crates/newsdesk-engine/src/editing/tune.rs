//! Highlight tune: a per-block toggle owned by the session, not the tool.
//! Every block takes it, including blocks no loaded tool can edit.

use serde_json::Value;

use crate::document::{Fields, Tunes};
use crate::render::{Element, Node};

pub const SETTINGS_BUTTON: &str = "cdx-settings-button";
pub const SETTINGS_BUTTON_ACTIVE: &str = "cdx-settings-button--active";

/// Flips the highlight state and returns the new value.
pub fn toggle(tunes: &mut Tunes) -> bool {
    let highlighted = !tunes.is_highlighted();
    tunes.set_highlighted(highlighted);
    highlighted
}

/// Writes the highlight state into a block held as raw JSON, creating the
/// `tunes.highlight` objects as needed. Returns false, leaving `raw`
/// untouched, when the block or either of those entries is not an object.
pub fn write_raw(raw: &mut Value, highlighted: bool) -> bool {
    let Some(block) = raw.as_object_mut() else {
        return false;
    };
    let Some(tunes) = object_entry(block, "tunes") else {
        return false;
    };
    let Some(highlight) = object_entry(tunes, Tunes::HIGHLIGHT) else {
        return false;
    };
    highlight.insert("highlighted".into(), Value::Bool(highlighted));
    true
}

/// The object under `key`, created when absent or `null`.
fn object_entry<'a>(fields: &'a mut Fields, key: &str) -> Option<&'a mut Fields> {
    let entry = fields.entry(key).or_insert(Value::Null);
    if entry.is_null() {
        *entry = Value::Object(Fields::new());
    }
    entry.as_object_mut()
}

/// The tune's control in the block settings menu.
pub fn button(tunes: &Tunes) -> Node {
    let mut button = Element::new("button")
        .attr("type", "button")
        .attr("title", "Highlight block")
        .class(SETTINGS_BUTTON);
    if tunes.is_highlighted() {
        button.add_class(SETTINGS_BUTTON_ACTIVE);
    }
    button.child(Node::text("⚡")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toggle_flips_and_records_state() {
        let mut tunes = Tunes::default();
        assert!(toggle(&mut tunes));
        assert_eq!(tunes, Tunes::highlighted(true));
        assert!(!toggle(&mut tunes));
        assert_eq!(tunes, Tunes::highlighted(false));
    }

    #[test]
    fn write_raw_creates_and_keeps_tune_entries() {
        let mut raw = json!({ "type": "table", "data": {} });
        assert!(write_raw(&mut raw, true));
        assert_eq!(raw["tunes"], json!({ "highlight": { "highlighted": true } }));

        let mut raw = json!({ "type": "table", "tunes": { "anchor": "a", "highlight": { "color": "red" } } });
        assert!(write_raw(&mut raw, false));
        assert_eq!(
            raw["tunes"],
            json!({ "anchor": "a", "highlight": { "color": "red", "highlighted": false } })
        );
    }

    #[test]
    fn write_raw_refuses_shapes_it_would_overwrite() {
        for raw in [json!("stray"), json!({ "tunes": "bold" }), json!({ "tunes": { "highlight": 1 } })] {
            let mut copy = raw.clone();
            assert!(!write_raw(&mut copy, true), "{raw}");
            assert_eq!(copy, raw);
        }
    }

    #[test]
    fn button_shows_active_state() {
        assert!(!button(&Tunes::default()).to_html().contains(SETTINGS_BUTTON_ACTIVE));
        assert_eq!(
            button(&Tunes::highlighted(true)).to_html(),
            r#"<button type="button" title="Highlight block" class="cdx-settings-button cdx-settings-button--active">⚡</button>"#
        );
    }
}
