use super::{BlockTool, LIST, PasteOutcome, ToolFactory, Toolbox};
use crate::document::{BlockContent, DataError, Fields, ListData, ListStyle};
use crate::editing::settings::ListSettings;
use crate::render::{Element, Node};

#[derive(Debug, Clone, Default)]
pub struct ListFactory {
    settings: ListSettings,
}

impl ListFactory {
    pub fn new(settings: ListSettings) -> Self {
        Self { settings }
    }
}

impl ToolFactory for ListFactory {
    fn name(&self) -> &'static str {
        LIST
    }

    fn toolbox(&self) -> Toolbox {
        Toolbox {
            title: "List",
            icon: "≡",
        }
    }

    fn create(&self, data: Option<Fields>) -> Result<Box<dyn BlockTool>, DataError> {
        let data = match data {
            Some(data) => ListData::from_data(data)?,
            None => ListData::new(self.settings.default_style, Vec::new()),
        };
        Ok(Box::new(ListTool { data }))
    }
}

#[derive(Debug)]
pub struct ListTool {
    data: ListData,
}

impl BlockTool for ListTool {
    fn name(&self) -> &'static str {
        LIST
    }

    fn render(&self, read_only: bool) -> Node {
        let tag = match self.data.style {
            ListStyle::Ordered => "ol",
            ListStyle::Unordered => "ul",
        };
        let class = format!("cdx-list cdx-list--{}", self.data.style.as_str());
        Element::new(tag)
            .class(&class)
            .children(self.data.items.iter().map(|item| {
                super::editable("li", "cdx-list__item", read_only)
                    .child(Node::html(item))
                    .into()
            }))
            .into()
    }

    fn save(&self) -> Fields {
        BlockContent::List(self.data.clone()).to_data()
    }

    fn update(&mut self, data: Fields) -> Result<(), DataError> {
        self.data = ListData::from_data(data)?;
        Ok(())
    }

    fn validate(&self) -> bool {
        self.data.items.iter().any(|item| !item.trim().is_empty())
    }

    /// Each non-blank pasted line becomes an item.
    fn on_paste(&mut self, text: &str) -> PasteOutcome {
        let before = self.data.items.len();
        self.data.items.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| html_escape::encode_text(line).into_owned()),
        );
        if self.data.items.len() == before {
            PasteOutcome::Ignored
        } else {
            PasteOutcome::Applied
        }
    }
}
