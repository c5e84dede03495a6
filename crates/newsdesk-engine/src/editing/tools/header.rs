use super::{BlockTool, HEADER, PasteOutcome, ToolFactory, Toolbox};
use crate::document::{BlockContent, DataError, Fields, HeaderData};
use crate::editing::settings::HeaderSettings;
use crate::render::Node;

#[derive(Debug, Clone, Default)]
pub struct HeaderFactory {
    settings: HeaderSettings,
}

impl HeaderFactory {
    pub fn new(settings: HeaderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &HeaderSettings {
        &self.settings
    }
}

impl ToolFactory for HeaderFactory {
    fn name(&self) -> &'static str {
        HEADER
    }

    fn toolbox(&self) -> Toolbox {
        Toolbox {
            title: "Heading",
            icon: "H",
        }
    }

    /// Stored levels are kept even when outside the configured set, so
    /// loading and saving never rewrites content.
    fn create(&self, data: Option<Fields>) -> Result<Box<dyn BlockTool>, DataError> {
        let data = match data {
            Some(data) => HeaderData::from_data(data)?,
            None => HeaderData::new("", self.settings.default_level),
        };
        Ok(Box::new(HeaderTool {
            data,
            settings: self.settings.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct HeaderTool {
    data: HeaderData,
    settings: HeaderSettings,
}

impl BlockTool for HeaderTool {
    fn name(&self) -> &'static str {
        HEADER
    }

    fn render(&self, read_only: bool) -> Node {
        let tag = match self.data.level {
            ..=1 => "h1",
            2 => "h2",
            3 => "h3",
            4 => "h4",
            5 => "h5",
            _ => "h6",
        };
        super::editable(tag, "ce-header", read_only)
            .attr("data-placeholder", &self.settings.placeholder)
            .child(Node::html(&self.data.text))
            .into()
    }

    fn save(&self) -> Fields {
        BlockContent::Header(self.data.clone()).to_data()
    }

    /// Edits may only pick one of the configured levels.
    fn update(&mut self, data: Fields) -> Result<(), DataError> {
        let data = HeaderData::from_data(data)?;
        if !self.settings.levels.contains(&data.level) {
            return Err(DataError::WrongType {
                field: "level",
                expected: "one of the configured heading levels",
            });
        }
        self.data = data;
        Ok(())
    }

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
    use serde_json::{Value, json};

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(fields) => fields,
            _ => unreachable!(),
        }
    }

    #[test]
    fn new_header_uses_default_level() {
        let tool = HeaderFactory::default().create(None).unwrap();
        assert_eq!(tool.save(), fields(json!({ "text": "", "level": 2 })));
    }

    #[test]
    fn update_rejects_unconfigured_levels() {
        let mut tool = HeaderFactory::default().create(None).unwrap();
        assert!(tool.update(fields(json!({ "text": "A", "level": 6 }))).is_err());
        assert!(tool.update(fields(json!({ "text": "A", "level": 3 }))).is_ok());
        assert_eq!(tool.save(), fields(json!({ "text": "A", "level": 3 })));
    }

    #[test]
    fn stored_out_of_range_level_is_kept() {
        let tool = HeaderFactory::default()
            .create(Some(fields(json!({ "text": "Hi", "level": 9 }))))
            .unwrap();
        assert_eq!(tool.save()["level"], json!(9));
        assert!(tool.render(false).to_html().starts_with("<h6"));
    }
}
