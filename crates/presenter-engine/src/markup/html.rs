use std::fmt::{self, Write};

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::tree::{NodeId, NodeKind, Tree};

/// The part of a tree to render.
#[derive(Debug, Clone, Copy)]
pub enum Fragment<'f> {
    /// A node including its own element.
    Node(NodeId),
    /// Only the node's children, without the node's own element.
    Contents(NodeId),
    /// The given nodes wrapped in a synthetic paragraph.
    Paragraph(&'f [NodeId]),
    /// The given nodes rendered one after another as a synthetic document.
    Document(&'f [NodeId]),
}

/// Renders a fragment of `tree` as HTML into `out`.
///
/// Text and attribute values are escaped. Raw HTML passes through only when
/// the tree was parsed with [`Options::raw_html`](super::Options::raw_html).
pub fn render<W: Write>(tree: &Tree<'_>, fragment: Fragment<'_>, out: &mut W) -> fmt::Result {
    let mut r = HtmlRenderer { tree, out };
    match fragment {
        Fragment::Node(id) => r.node(id),
        Fragment::Contents(id) => r.nodes(tree.children(id)),
        Fragment::Paragraph(ids) => {
            r.out.write_str("<p>")?;
            r.nodes(ids)?;
            r.out.write_str("</p>\n")
        }
        Fragment::Document(ids) => r.nodes(ids),
    }
}

const RAW_HTML_OMITTED: &str = "<!-- raw HTML omitted -->";

struct HtmlRenderer<'t, 'a, W> {
    tree: &'t Tree<'a>,
    out: &'t mut W,
}

impl<W: Write> HtmlRenderer<'_, '_, W> {
    fn nodes(&mut self, ids: &[NodeId]) -> fmt::Result {
        for &id in ids {
            self.node(id)?;
        }
        Ok(())
    }

    fn children(&mut self, id: NodeId) -> fmt::Result {
        let tree = self.tree;
        self.nodes(tree.children(id))
    }

    fn attributes(&mut self, id: NodeId) -> fmt::Result {
        for attr in self.tree.node(id).attributes() {
            write!(
                self.out,
                " {}=\"{}\"",
                attr.name,
                encode_double_quoted_attribute(&attr.value)
            )?;
        }
        Ok(())
    }

    fn wrap(&mut self, tag: &str, id: NodeId) -> fmt::Result {
        write!(self.out, "<{tag}")?;
        self.attributes(id)?;
        self.out.write_char('>')?;
        self.children(id)?;
        write!(self.out, "</{tag}>")
    }

    fn node(&mut self, id: NodeId) -> fmt::Result {
        let tree = self.tree;
        let node = tree.node(id);
        match &node.kind {
            NodeKind::Document | NodeKind::Other => self.children(id),
            NodeKind::Paragraph => {
                self.wrap("p", id)?;
                self.out.write_char('\n')
            }
            NodeKind::Heading { level } => {
                self.wrap(&format!("h{level}"), id)?;
                self.out.write_char('\n')
            }
            NodeKind::BlockQuote => {
                self.out.write_str("<blockquote>\n")?;
                self.children(id)?;
                self.out.write_str("</blockquote>\n")
            }
            NodeKind::CodeBlock { info } => {
                match info.split_whitespace().next() {
                    Some(lang) => write!(
                        self.out,
                        "<pre><code class=\"language-{}\">",
                        encode_double_quoted_attribute(lang)
                    )?,
                    None => self.out.write_str("<pre><code>")?,
                }
                for &child in tree.children(id) {
                    if let NodeKind::Text(text) = &tree.node(child).kind {
                        self.out.write_str(&encode_text(&**text))?;
                    }
                }
                self.out.write_str("</code></pre>\n")
            }
            NodeKind::HtmlBlock => {
                if tree.options().raw_html {
                    self.children(id)
                } else {
                    writeln!(self.out, "{RAW_HTML_OMITTED}")
                }
            }
            NodeKind::List { start } => {
                let tag = match start {
                    Some(1) => {
                        self.out.write_str("<ol>\n")?;
                        "ol"
                    }
                    Some(n) => {
                        writeln!(self.out, "<ol start=\"{n}\">")?;
                        "ol"
                    }
                    None => {
                        self.out.write_str("<ul>\n")?;
                        "ul"
                    }
                };
                self.children(id)?;
                writeln!(self.out, "</{tag}>")
            }
            NodeKind::Item => {
                self.wrap("li", id)?;
                self.out.write_char('\n')
            }
            NodeKind::ThematicBreak => self.out.write_str("<hr>\n"),
            NodeKind::Text(text) => self.out.write_str(&encode_text(&**text)),
            NodeKind::Code(code) => write!(self.out, "<code>{}</code>", encode_text(&**code)),
            NodeKind::Html(html) => {
                if tree.options().raw_html {
                    self.out.write_str(html)
                } else {
                    self.out.write_str(RAW_HTML_OMITTED)
                }
            }
            NodeKind::Emphasis => self.wrap("em", id),
            NodeKind::Strong => self.wrap("strong", id),
            NodeKind::Strikethrough => self.wrap("del", id),
            NodeKind::Link { destination, title } => {
                write!(
                    self.out,
                    "<a href=\"{}\"",
                    encode_double_quoted_attribute(&**destination)
                )?;
                if !title.is_empty() {
                    write!(
                        self.out,
                        " title=\"{}\"",
                        encode_double_quoted_attribute(&**title)
                    )?;
                }
                self.attributes(id)?;
                self.out.write_char('>')?;
                self.children(id)?;
                self.out.write_str("</a>")
            }
            NodeKind::AutoLink { destination, email } => {
                let scheme = if *email { "mailto:" } else { "" };
                write!(
                    self.out,
                    "<a href=\"{scheme}{}\"",
                    encode_double_quoted_attribute(&**destination)
                )?;
                self.attributes(id)?;
                self.out.write_char('>')?;
                self.children(id)?;
                self.out.write_str("</a>")
            }
            NodeKind::Image { destination, title } => {
                write!(
                    self.out,
                    "<img src=\"{}\" alt=\"{}\"",
                    encode_double_quoted_attribute(&**destination),
                    encode_double_quoted_attribute(&tree.text(id))
                )?;
                if !title.is_empty() {
                    write!(
                        self.out,
                        " title=\"{}\"",
                        encode_double_quoted_attribute(&**title)
                    )?;
                }
                self.attributes(id)?;
                self.out.write_char('>')
            }
            NodeKind::SoftBreak => self.out.write_char('\n'),
            NodeKind::HardBreak => self.out.write_str("<br>\n"),
            NodeKind::TaskMarker { checked } => {
                if *checked {
                    self.out
                        .write_str("<input checked=\"\" disabled=\"\" type=\"checkbox\"> ")
                } else {
                    self.out.write_str("<input disabled=\"\" type=\"checkbox\"> ")
                }
            }
        }
    }
}
