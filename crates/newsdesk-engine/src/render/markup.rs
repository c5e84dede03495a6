//! A small markup tree and its HTML serialization.
//!
//! Text nodes are escaped on output. [`Node::Html`] is written verbatim and is
//! reserved for rich text the model already trusts.

/// Elements written without a closing tag.
const VOID_ELEMENTS: [&str; 4] = ["br", "hr", "img", "input"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: &'static str,
    /// `None` for boolean attributes such as `allowfullscreen`.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push(Attr {
            name,
            value: Some(value.into()),
        });
        self
    }

    pub fn flag(mut self, name: &'static str) -> Self {
        self.attrs.push(Attr { name, value: None });
        self
    }

    /// Appends to the `class` attribute, creating it if needed. Empty class
    /// strings are ignored.
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() {
            return;
        }
        match self.attrs.iter_mut().find(|a| a.name == "class") {
            Some(Attr {
                value: Some(existing),
                ..
            }) if !existing.is_empty() => {
                existing.push(' ');
                existing.push_str(class);
            }
            Some(attr) => attr.value = Some(class.to_string()),
            None => self.attrs.push(Attr {
                name: "class",
                value: Some(class.to_string()),
            }),
        }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_deref())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Plain text, escaped when written.
    Text(String),
    /// Trusted markup, written verbatim.
    Html(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn html(html: impl Into<String>) -> Self {
        Node::Html(html.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => {
                html_escape::encode_text_to_string(text, out);
            }
            Node::Html(html) => out.push_str(html),
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                for attr in &el.attrs {
                    out.push(' ');
                    out.push_str(attr.name);
                    if let Some(value) = &attr.value {
                        out.push_str("=\"");
                        html_escape::encode_double_quoted_attribute_to_string(value, out);
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag) {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(el.tag);
                out.push('>');
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Output of rendering a document: a sequence of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub nodes: Vec<Node>,
}

impl Markup {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_escaped_and_html_is_not() {
        let el = Element::new("p")
            .child(Node::text("a < b"))
            .child(Node::html("<b>c</b>"));
        assert_eq!(Node::from(el).to_html(), "<p>a &lt; b<b>c</b></p>");
    }

    #[test]
    fn attributes_are_escaped_and_flags_are_bare() {
        let el = Element::new("iframe")
            .attr("src", "https://x.test/?a=1&b=\"2\"")
            .flag("allowfullscreen");
        assert_eq!(
            Node::from(el).to_html(),
            "<iframe src=\"https://x.test/?a=1&amp;b=&quot;2&quot;\" allowfullscreen></iframe>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let el = Element::new("img").attr("src", "a.png");
        assert_eq!(Node::from(el).to_html(), "<img src=\"a.png\">");
    }

    #[test]
    fn classes_accumulate() {
        let el = Element::new("p").class("a").class("").class("b");
        assert_eq!(el.get_attr("class"), Some("a b"));
        assert!(el.has_class("b"));
    }
}
