use super::{BlockTool, PARAGRAPH, PasteOutcome, ToolFactory, Toolbox};
use crate::document::{BlockContent, DataError, Fields, ParagraphData};
use crate::editing::settings::ParagraphSettings;
use crate::render::Node;

#[derive(Debug, Clone, Default)]
pub struct ParagraphFactory {
    settings: ParagraphSettings,
}

impl ParagraphFactory {
    pub fn new(settings: ParagraphSettings) -> Self {
        Self { settings }
    }
}

impl ToolFactory for ParagraphFactory {
    fn name(&self) -> &'static str {
        PARAGRAPH
    }

    fn toolbox(&self) -> Toolbox {
        Toolbox {
            title: "Text",
            icon: "¶",
        }
    }

    fn create(&self, data: Option<Fields>) -> Result<Box<dyn BlockTool>, DataError> {
        let data = match data {
            Some(data) => ParagraphData::from_data(data)?,
            None => ParagraphData::default(),
        };
        Ok(Box::new(ParagraphTool {
            data,
            placeholder: self.settings.placeholder.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct ParagraphTool {
    data: ParagraphData,
    placeholder: Option<String>,
}

impl BlockTool for ParagraphTool {
    fn name(&self) -> &'static str {
        PARAGRAPH
    }

    fn render(&self, read_only: bool) -> Node {
        let mut el = super::editable("div", "ce-paragraph", read_only);
        if let Some(placeholder) = &self.placeholder {
            el = el.attr("data-placeholder", placeholder);
        }
        el.child(Node::html(&self.data.text)).into()
    }

    fn save(&self) -> Fields {
        BlockContent::Paragraph(self.data.clone()).to_data()
    }

    fn update(&mut self, data: Fields) -> Result<(), DataError> {
        self.data = ParagraphData::from_data(data)?;
        Ok(())
    }

    /// Empty paragraphs are not saved.
    fn validate(&self) -> bool {
        !self.data.text.trim().is_empty()
    }

    fn on_paste(&mut self, text: &str) -> PasteOutcome {
        super::append_plain(&mut self.data.text, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_paragraph_does_not_validate() {
        let mut tool = ParagraphFactory::default().create(None).unwrap();
        assert!(!tool.validate());
        tool.on_paste("Breaking");
        assert!(tool.validate());
        assert_eq!(tool.save().get("text"), Some(&json!("Breaking")));
    }

    #[test]
    fn surface_is_editable_unless_read_only() {
        let tool = ParagraphFactory::new(ParagraphSettings {
            placeholder: Some("Type".into()),
        })
        .create(None)
        .unwrap();
        assert_eq!(
            tool.render(false).to_html(),
            r#"<div class="ce-paragraph" contenteditable="true" data-placeholder="Type"></div>"#
        );
        assert!(tool.render(true).to_html().contains(r#"contenteditable="false""#));
    }
}
