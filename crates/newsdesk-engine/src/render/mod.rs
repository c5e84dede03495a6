//! # Renderer
//!
//! [`render`] turns a [`Document`] into a [`Markup`] tree for readers. It is
//! total: every block either produces one node or nothing, and nothing here can
//! fail. Rich text is passed through as trusted markup; captions are plain text
//! and escaped.
//!
//! Non-empty documents are wrapped in an `<article>`; an empty document renders
//! to empty markup.
//!
//! ## Modules
//!
//! - [`markup`]: the node tree and its HTML serialization

pub mod markup;

pub use markup::{Attr, Element, Markup, Node};

use crate::document::{
    Block, BlockContent, Document, HIGHLIGHT_CLASS, HeaderData, ImageData, ListData, ListStyle,
    QuoteData, TypedBlock, VideoData,
};
use crate::embed;

/// `allow` list for embedded video frames.
pub const FRAME_ALLOW: &str = "autoplay; encrypted-media; picture-in-picture";

/// Presentation classes applied by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderClasses {
    pub article: String,
    pub highlight: String,
    pub paragraph: String,
    pub header: String,
    pub ordered_list: String,
    pub unordered_list: String,
    pub quote: String,
    pub quote_caption: String,
    pub figure: String,
    pub image: String,
    pub figure_caption: String,
    pub video: String,
    pub video_frame: String,
}

impl Default for RenderClasses {
    fn default() -> Self {
        Self {
            article: "prose max-w-none".into(),
            highlight: HIGHLIGHT_CLASS.into(),
            paragraph: "mt-3 leading-7 text-slate-800".into(),
            header: "mt-6 font-bold".into(),
            ordered_list: "mt-3 list-decimal pl-6".into(),
            unordered_list: "mt-3 list-disc pl-6".into(),
            quote: "mt-6 border-l-4 pl-4 italic".into(),
            quote_caption: "mt-2 block text-sm not-italic text-slate-500".into(),
            figure: "my-6".into(),
            image: "w-full rounded-lg".into(),
            figure_caption: "mt-2 text-sm text-slate-500".into(),
            video: "my-6 aspect-video w-full overflow-hidden rounded-xl border border-slate-200"
                .into(),
            video_frame: "h-full w-full".into(),
        }
    }
}

/// Renders documents with a fixed set of classes.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    classes: RenderClasses,
}

impl Renderer {
    pub fn new(classes: RenderClasses) -> Self {
        Self { classes }
    }

    /// Renders a whole document.
    pub fn render(&self, document: &Document) -> Markup {
        if document.is_empty() {
            return Markup::default();
        }

        let article = Element::new("article")
            .class(&self.classes.article)
            .children(document.blocks().iter().filter_map(|b| self.render_block(b)));

        Markup {
            nodes: vec![article.into()],
        }
    }

    /// Renders one block, or nothing for fallback blocks, images without a
    /// source and unresolvable videos.
    pub fn render_block(&self, block: &Block) -> Option<Node> {
        let Block::Typed(typed) = block else {
            return None;
        };
        let mut element = self.render_content(typed)?;
        if typed.tunes.is_highlighted() {
            element.add_class(&self.classes.highlight);
        }
        Some(element.into())
    }

    fn render_content(&self, block: &TypedBlock) -> Option<Element> {
        Some(match &block.content {
            BlockContent::Paragraph(p) => Element::new("p")
                .class(&self.classes.paragraph)
                .child(Node::html(&p.text)),
            BlockContent::Header(h) => self.header(h),
            BlockContent::List(l) => self.list(l),
            BlockContent::Quote(q) => self.quote(q),
            BlockContent::Image(i) => self.image(i)?,
            BlockContent::Video(v) => self.video(v)?,
        })
    }

    fn header(&self, header: &HeaderData) -> Element {
        let tag = match header.render_level() {
            2 => "h2",
            3 => "h3",
            _ => "h4",
        };
        Element::new(tag)
            .class(&self.classes.header)
            .child(Node::html(&header.text))
    }

    fn list(&self, list: &ListData) -> Element {
        let (tag, class) = match list.style {
            ListStyle::Ordered => ("ol", &self.classes.ordered_list),
            ListStyle::Unordered => ("ul", &self.classes.unordered_list),
        };
        Element::new(tag).class(class).children(
            list.items
                .iter()
                .map(|item| Element::new("li").child(Node::html(item)).into()),
        )
    }

    fn quote(&self, quote: &QuoteData) -> Element {
        let mut element = Element::new("blockquote")
            .class(&self.classes.quote)
            .child(Element::new("div").child(Node::html(&quote.text)));
        if let Some(caption) = quote.caption.as_deref().filter(|c| !c.trim().is_empty()) {
            element = element.child(
                Element::new("cite")
                    .class(&self.classes.quote_caption)
                    .child(Node::text(caption)),
            );
        }
        element
    }

    fn image(&self, image: &ImageData) -> Option<Element> {
        let src = image.source()?;
        let caption = image.caption.as_deref().filter(|c| !c.trim().is_empty());
        let img = Element::new("img")
            .attr("src", src)
            .attr("alt", caption.unwrap_or_default())
            .attr("loading", "lazy")
            .class(&self.classes.image);

        let mut figure = Element::new("figure")
            .class(&self.classes.figure)
            .child(img);
        if let Some(caption) = caption {
            figure = figure.child(
                Element::new("figcaption")
                    .class(&self.classes.figure_caption)
                    .child(Node::text(caption)),
            );
        }
        Some(figure)
    }

    /// Resolves the stored URL on every render; nothing is cached on the block.
    fn video(&self, video: &VideoData) -> Option<Element> {
        let url = video.url.as_deref()?;
        let src = match embed::resolve(url) {
            Ok(locator) => locator.embed_url(),
            Err(reason) => {
                log::debug!("video block not rendered: {reason}");
                return None;
            }
        };

        Some(
            Element::new("div").class(&self.classes.video).child(
                Element::new("iframe")
                    .attr("src", src)
                    .class(&self.classes.video_frame)
                    .attr("allow", FRAME_ALLOW)
                    .flag("allowfullscreen")
                    .attr("loading", "lazy"),
            ),
        )
    }
}

/// Renders a document with the default classes.
pub fn render(document: &Document) -> Markup {
    Renderer::default().render(document)
}

/// Renders a document straight to an HTML string.
pub fn render_html(document: &Document) -> String {
    render(document).to_html()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn bare() -> Renderer {
        Renderer::new(RenderClasses {
            article: String::new(),
            highlight: HIGHLIGHT_CLASS.into(),
            paragraph: String::new(),
            header: String::new(),
            ordered_list: String::new(),
            unordered_list: String::new(),
            quote: String::new(),
            quote_caption: String::new(),
            figure: String::new(),
            image: String::new(),
            figure_caption: String::new(),
            video: String::new(),
            video_frame: String::new(),
        })
    }

    fn block_html(block: Block) -> String {
        bare()
            .render_block(&block)
            .map(|n| n.to_html())
            .unwrap_or_default()
    }

    #[test]
    fn empty_document_renders_nothing() {
        assert!(render(&Document::empty()).is_empty());
        assert_eq!(render_html(&normalize(&json!({ "blocks": [] }))), "");
    }

    #[rstest]
    #[case(-3, "h2")]
    #[case(1, "h2")]
    #[case(2, "h2")]
    #[case(3, "h3")]
    #[case(4, "h4")]
    #[case(9, "h4")]
    fn header_level_is_clamped(#[case] level: i64, #[case] tag: &str) {
        assert_eq!(
            block_html(Block::header("Hi", level)),
            format!("<{tag}>Hi</{tag}>")
        );
    }

    #[test]
    fn header_nine_renders_as_h4_from_raw_input() {
        let doc = normalize(&json!({
            "blocks": [{ "type": "header", "data": { "text": "Hi", "level": 9 } }]
        }));
        insta::assert_snapshot!(
            render_html(&doc),
            @r#"<article class="prose max-w-none"><h4 class="mt-6 font-bold">Hi</h4></article>"#
        );
    }

    #[test]
    fn rich_text_passes_through() {
        assert_eq!(
            block_html(Block::paragraph("<b>Bold</b> &amp; <i>true</i>")),
            "<p><b>Bold</b> &amp; <i>true</i></p>"
        );
    }

    #[test]
    fn lists_render_by_style() {
        insta::assert_snapshot!(
            block_html(Block::list(ListStyle::Ordered, ["one", "<i>two</i>"])),
            @"<ol><li>one</li><li><i>two</i></li></ol>"
        );
        insta::assert_snapshot!(
            block_html(Block::list(ListStyle::Unordered, ["a"])),
            @"<ul><li>a</li></ul>"
        );
    }

    #[test]
    fn quote_caption_is_escaped() {
        insta::assert_snapshot!(
            block_html(Block::quote("Words", Some("A & B <co>"))),
            @"<blockquote><div>Words</div><cite>A &amp; B &lt;co&gt;</cite></blockquote>"
        );
        assert_eq!(
            block_html(Block::quote("Words", None)),
            "<blockquote><div>Words</div></blockquote>"
        );
    }

    #[test]
    fn image_renders_lazy_figure() {
        insta::assert_snapshot!(
            block_html(Block::image("https://cdn.test/a.jpg", Some("Harbour"))),
            @r#"<figure><img src="https://cdn.test/a.jpg" alt="Harbour" loading="lazy"><figcaption>Harbour</figcaption></figure>"#
        );
    }

    #[test]
    fn image_file_alias_is_used() {
        let doc = normalize(&json!({
            "blocks": [{ "type": "image", "data": { "file": { "url": "https://cdn.test/b.png" } } }]
        }));
        let html = bare().render(&doc).to_html();
        assert!(html.contains(r#"src="https://cdn.test/b.png""#), "{html}");
        assert!(!html.contains("figcaption"));
    }

    #[test]
    fn video_resolves_at_render_time() {
        insta::assert_snapshot!(
            block_html(Block::video(Some("https://youtu.be/abc123"))),
            @r#"<div><iframe src="https://www.youtube.com/embed/abc123" allow="autoplay; encrypted-media; picture-in-picture" allowfullscreen loading="lazy"></iframe></div>"#
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some("https://vimeo.com/1"))]
    #[case(Some("not a url"))]
    fn unresolvable_video_renders_nothing(#[case] url: Option<&str>) {
        assert_eq!(bare().render_block(&Block::video(url)), None);
    }

    #[test]
    fn highlight_adds_class_to_any_block() {
        assert_eq!(
            block_html(Block::paragraph("x").with_highlight(true)),
            r#"<p class="editor-highlight">x</p>"#
        );
        let html = render_html(&Document::new(vec![
            Block::header("H", 2).with_highlight(true),
        ]));
        assert!(html.contains(r#"<h2 class="mt-6 font-bold editor-highlight">"#), "{html}");
        assert_eq!(
            block_html(Block::paragraph("x").with_highlight(false)),
            "<p>x</p>"
        );
    }

    #[test]
    fn unknown_blocks_render_nothing_but_survive() {
        let raw = json!({
            "blocks": [{ "type": "unknown-future-type", "data": { "foo": 1 } }]
        });
        let doc = normalize(&raw);
        insta::assert_snapshot!(
            render_html(&doc),
            @r#"<article class="prose max-w-none"></article>"#
        );
        assert_eq!(normalize(&doc.to_value()), doc);
        assert_eq!(doc.to_value(), raw);
    }

    #[test]
    fn blocks_render_in_order() {
        let doc = Document::new(vec![
            Block::paragraph("first"),
            Block::fallback(json!({ "type": "table" })),
            Block::video(Some("https://vimeo.com/1")),
            Block::paragraph("last"),
        ]);
        assert_eq!(
            bare().render(&doc).to_html(),
            "<article><p>first</p><p>last</p></article>"
        );
    }
}
