use super::{BlockTool, QUOTE, ToolFactory, Toolbox};
use crate::document::{BlockContent, DataError, Fields, QuoteData};
use crate::editing::settings::QuoteSettings;
use crate::render::{Element, Node};

#[derive(Debug, Clone, Default)]
pub struct QuoteFactory {
    settings: QuoteSettings,
}

impl QuoteFactory {
    pub fn new(settings: QuoteSettings) -> Self {
        Self { settings }
    }
}

impl ToolFactory for QuoteFactory {
    fn name(&self) -> &'static str {
        QUOTE
    }

    fn toolbox(&self) -> Toolbox {
        Toolbox {
            title: "Quote",
            icon: "❝",
        }
    }

    fn create(&self, data: Option<Fields>) -> Result<Box<dyn BlockTool>, DataError> {
        let data = match data {
            Some(data) => QuoteData::from_data(data)?,
            None => QuoteData::default(),
        };
        Ok(Box::new(QuoteTool {
            data,
            settings: self.settings.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct QuoteTool {
    data: QuoteData,
    settings: QuoteSettings,
}

impl BlockTool for QuoteTool {
    fn name(&self) -> &'static str {
        QUOTE
    }

    fn render(&self, read_only: bool) -> Node {
        let text = super::editable("div", "cdx-quote__text", read_only)
            .attr("data-placeholder", &self.settings.text_placeholder)
            .child(Node::html(&self.data.text));
        let caption = super::editable("div", "cdx-quote__caption", read_only)
            .attr("data-placeholder", &self.settings.caption_placeholder)
            .child(Node::text(self.data.caption.clone().unwrap_or_default()));
        Element::new("blockquote")
            .class("cdx-quote")
            .child(text)
            .child(caption)
            .into()
    }

    fn save(&self) -> Fields {
        BlockContent::Quote(self.data.clone()).to_data()
    }

    fn update(&mut self, data: Fields) -> Result<(), DataError> {
        self.data = QuoteData::from_data(data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn caption_round_trips_and_is_escaped_on_the_surface() {
        let Value::Object(data) = json!({ "text": "Q", "caption": "A & B" }) else {
            unreachable!()
        };
        let tool = QuoteFactory::default().create(Some(data.clone())).unwrap();
        assert_eq!(tool.save(), data);
        assert!(tool.render(true).to_html().contains(">A &amp; B</div>"));
    }
}
