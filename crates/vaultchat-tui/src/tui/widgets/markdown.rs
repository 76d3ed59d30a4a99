//! Markdown capability and its default pulldown-cmark implementation.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag as MdTag};
use tracing::{instrument, warn};

use crate::error::Result;
use crate::tui::view::{Element, Tag};

/// Renders markdown source into a view tree.
///
/// Implementations append to `target`; they never clear it. A host whose
/// renderer completes later delivers the tree through
/// [`crate::tui::widgets::MessageRenderer::settle_content`] instead.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, source: &str, target: &mut Element) -> Result<()>;
}

/// CommonMark renderer backed by pulldown-cmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownMarkdown;

impl MarkdownRenderer for PulldownMarkdown {
    #[instrument(level = "trace", skip_all, fields(len = source.len()))]
    fn render(&self, source: &str, target: &mut Element) -> Result<()> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_TASKLISTS);
        let parser = Parser::new_ext(source, options);

        let mut builder = TreeBuilder::new();
        for event in parser {
            builder.handle_event(event);
        }
        for child in builder.finish() {
            target.children.push(child);
        }
        Ok(())
    }
}

struct TreeBuilder {
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new(Tag::Block)],
        }
    }

    fn top(&mut self) -> &mut Element {
        if self.stack.is_empty() {
            self.stack.push(Element::new(Tag::Block));
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn open(&mut self, tag: Tag) {
        self.stack.push(Element::new(tag));
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            warn!(target: "tui.markdown", "Unbalanced end tag in markdown stream");
            return;
        }
        if let Some(done) = self.stack.pop() {
            self.top().push(done);
        }
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.top().push_text(text.to_string()),
            Event::Code(code) => {
                let code = Element::new(Tag::Code).with_text(code.to_string());
                self.top().push(code);
            }
            Event::Html(html) => self.top().push_text(html.to_string()),
            Event::FootnoteReference(reference) => {
                self.top().push_text(format!("[^{reference}]"));
            }
            Event::SoftBreak => self.top().push_text(" "),
            Event::HardBreak => self.top().push(Element::new(Tag::LineBreak)),
            Event::Rule => self.top().push(Element::new(Tag::Rule)),
            Event::TaskListMarker(checked) => {
                self.top().push_text(if checked { "[x] " } else { "[ ] " });
            }
        }
    }

    fn start_tag(&mut self, tag: MdTag<'_>) {
        match tag {
            MdTag::Paragraph => self.open(Tag::Paragraph),
            MdTag::Heading(level, _, _) => self.open(Tag::Heading(heading_level(level))),
            MdTag::BlockQuote => self.open(Tag::BlockQuote),
            MdTag::CodeBlock(_) => {
                self.open(Tag::Pre);
                self.open(Tag::Code);
            }
            MdTag::List(start) => self.open(Tag::List { start }),
            MdTag::Item => self.open(Tag::ListItem),
            MdTag::FootnoteDefinition(_) | MdTag::Table(_) | MdTag::TableHead | MdTag::TableRow => {
                self.open(Tag::Block);
            }
            MdTag::TableCell => self.open(Tag::Inline),
            MdTag::Emphasis => self.open(Tag::Emphasis),
            MdTag::Strong => self.open(Tag::Strong),
            MdTag::Strikethrough => self.open(Tag::Strikethrough),
            MdTag::Link(_link_type, dest_url, _title) => self.open(Tag::Link {
                href: dest_url.to_string(),
            }),
            MdTag::Image(..) => self.open(Tag::Inline),
        }
    }

    fn end_tag(&mut self, tag: MdTag<'_>) {
        match tag {
            MdTag::CodeBlock(_) => {
                self.close();
                self.close();
            }
            MdTag::TableCell => {
                self.close();
                self.top().push_text(" | ");
            }
            _ => self.close(),
        }
    }

    fn finish(mut self) -> Vec<crate::tui::view::ViewNode> {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack
            .pop()
            .map(|root| root.children)
            .unwrap_or_default()
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
