use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Parser, Tag};

use super::{
    options::Options,
    span::Span,
    tree::{Node, NodeId, NodeKind, Tree},
};

/// Builds a [`Tree`] from the `pulldown-cmark` offset event stream.
///
/// Every `Start` event opens a node under the current container and every
/// `End` event closes it, so the tree mirrors the event nesting exactly.
pub(crate) fn build(source: &str, options: Options) -> Tree<'_> {
    let mut builder = TreeBuilder::new(source, options);
    for (event, range) in Parser::new_ext(source, options.to_cmark()).into_offset_iter() {
        builder.push(event, range.into());
    }
    builder.finish()
}

struct TreeBuilder<'a> {
    source: &'a str,
    tree: Tree<'a>,
    stack: Vec<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str, options: Options) -> Self {
        let tree = Tree::new(source, options);
        let root = tree.root();
        Self {
            source,
            tree,
            stack: vec![root],
        }
    }

    fn current(&self) -> NodeId {
        // The root is pushed first and never popped.
        self.stack[self.stack.len() - 1]
    }

    fn push(&mut self, event: Event<'a>, span: Span) {
        match event {
            Event::Start(tag) => {
                let id = self.open(kind_for_tag(tag), span);
                self.stack.push(id);
            }
            Event::End(_) => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
            Event::Text(text) => self.push_text(text, span),
            Event::Code(code) => self.leaf(NodeKind::Code(code), span),
            Event::Html(html) | Event::InlineHtml(html) => self.leaf(NodeKind::Html(html), span),
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak, span),
            Event::HardBreak => self.leaf(NodeKind::HardBreak, span),
            Event::Rule => {
                self.open(NodeKind::ThematicBreak, span);
            }
            Event::TaskListMarker(checked) => self.leaf(NodeKind::TaskMarker { checked }, span),
            // Footnotes and math are not enabled.
            _ => {}
        }
    }

    fn open(&mut self, kind: NodeKind<'a>, span: Span) -> NodeId {
        let block = is_block(&kind);
        let mut node = Node::new(kind, span);
        if block {
            node.blank_previous_line = blank_line_before(self.source, span.start);
        }
        self.tree.push(self.current(), node)
    }

    fn leaf(&mut self, kind: NodeKind<'a>, span: Span) {
        self.tree.push(self.current(), Node::new(kind, span));
    }

    /// Appends a text run, merging it into a directly preceding run.
    ///
    /// `pulldown-cmark` splits text at characters that might start inline
    /// syntax (`<`, `*`, ...); inline rules need each run whole. Only runs
    /// that are verbatim source text are merged, so text produced by a
    /// backslash escape or an entity stays a separate run.
    fn push_text(&mut self, text: CowStr<'a>, span: Span) {
        let source = self.source;
        let parent = self.current();
        let last = self.tree.children(parent).last().copied();
        if let Some(last) = last
            && let NodeKind::Text(prev) = &self.tree.node(last).kind
            && self.tree.node(last).span.end == span.start
            && is_verbatim(source, prev, self.tree.node(last).span)
            && is_verbatim(source, &text, span)
        {
            let start = self.tree.node(last).span.start;
            let node = self.tree.node_mut(last);
            node.kind = NodeKind::Text(CowStr::Borrowed(&source[start..span.end]));
            node.span.end = span.end;
            return;
        }
        self.leaf(NodeKind::Text(text), span);
    }

    fn finish(self) -> Tree<'a> {
        self.tree
    }
}

fn kind_for_tag(tag: Tag<'_>) -> NodeKind<'_> {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading {
            level: heading_level_to_u8(level),
        },
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::CodeBlock { info },
        Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::CodeBlock {
            info: CowStr::Borrowed(""),
        },
        Tag::HtmlBlock => NodeKind::HtmlBlock,
        Tag::List(start) => NodeKind::List { start },
        Tag::Item => NodeKind::Item,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link {
            link_type: LinkType::Autolink,
            dest_url,
            ..
        } => NodeKind::AutoLink {
            destination: dest_url,
            email: false,
        },
        Tag::Link {
            link_type: LinkType::Email,
            dest_url,
            ..
        } => NodeKind::AutoLink {
            destination: dest_url,
            email: true,
        },
        Tag::Link {
            dest_url, title, ..
        } => NodeKind::Link {
            destination: dest_url,
            title,
        },
        Tag::Image {
            dest_url, title, ..
        } => NodeKind::Image {
            destination: dest_url,
            title,
        },
        _ => NodeKind::Other,
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn is_block(kind: &NodeKind<'_>) -> bool {
    matches!(
        kind,
        NodeKind::Paragraph
            | NodeKind::Heading { .. }
            | NodeKind::BlockQuote
            | NodeKind::CodeBlock { .. }
            | NodeKind::HtmlBlock
            | NodeKind::List { .. }
            | NodeKind::Item
            | NodeKind::ThematicBreak
    )
}

fn is_verbatim(source: &str, text: &str, span: Span) -> bool {
    source.get(span.start..span.end) == Some(text)
}

/// Whether the source line before the line containing `start` is blank.
///
/// A block on the first line has no previous line and reports false.
fn blank_line_before(source: &str, start: usize) -> bool {
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    if line_start == 0 {
        return false;
    }
    let before = &source[..line_start - 1];
    let prev_start = before.rfind('\n').map_or(0, |i| i + 1);
    before[prev_start..].trim().is_empty()
}
