use std::fmt;

use chrono::{DateTime, Utc};

use crate::markup::{Fragment, NodeId, NodeKind, Tree, render};

/// Markup that is already escaped and safe to embed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Html(String);

impl Html {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every newline becomes an explicit `<br>` so multi-line fragments keep
    /// their line structure inside a single element.
    fn with_line_breaks(self) -> Self {
        Self(self.0.replace('\n', "<br>\n"))
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Html {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Renders a fragment, logging (not propagating) renderer failures.
fn render_fragment(tree: &Tree<'_>, fragment: Fragment<'_>, what: &str) -> Html {
    let mut out = String::new();
    if let Err(e) = render(tree, fragment, &mut out) {
        log::error!("failed to render {what}: {e}");
    }
    Html(out)
}

/// An entire present document.
#[derive(Debug, Default)]
pub struct Doc<'a> {
    /// Plain text of the level-1 heading; `None` iff there was none.
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub authors: Vec<Author<'a>>,
    /// Speaker notes for the title slide.
    pub title_notes: Vec<String>,
    pub sections: Vec<Section<'a>>,
    pub tags: Vec<String>,
}

impl Doc<'_> {
    /// Title for listings; empty when the document has none.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// The person who wrote and/or is presenting the document.
///
/// Holds the inline nodes of one author block as a view into the document's
/// tree.
pub struct Author<'a> {
    tree: &'a Tree<'a>,
    node: NodeId,
    nodes: Vec<NodeId>,
}

impl<'a> Author<'a> {
    pub(crate) fn new(tree: &'a Tree<'a>, node: NodeId) -> Self {
        Self {
            tree,
            node,
            nodes: tree.children(node).to_vec(),
        }
    }

    /// The paragraph this author block was taken from.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Plain text runs and the line breaks that end them. Links, handles and
    /// any other inline nodes are dropped.
    fn text_nodes(&self) -> Vec<NodeId> {
        let mut kept = vec![];
        let mut after_text = false;
        for &id in &self.nodes {
            match self.tree.node(id).kind {
                NodeKind::Text(_) => {
                    kept.push(id);
                    after_text = true;
                }
                NodeKind::SoftBreak | NodeKind::HardBreak if after_text => {
                    kept.push(id);
                    after_text = false;
                }
                _ => after_text = false,
            }
        }
        kept
    }

    /// The plain text lines of the block, such as name and job title.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = vec![];
        let mut line = String::new();
        for id in self.text_nodes() {
            match &self.tree.node(id).kind {
                NodeKind::Text(text) => line.push_str(text),
                _ => lines.push(std::mem::take(&mut line)),
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }

    /// Renders only the plain text lines, for compact author summaries.
    pub fn render_full_text(&self) -> Html {
        let nodes = self.text_nodes();
        render_fragment(self.tree, Fragment::Paragraph(&nodes), "author text").with_line_breaks()
    }

    /// Renders every inline node of the block, links included.
    pub fn render(&self) -> Html {
        render_fragment(self.tree, Fragment::Paragraph(&self.nodes), "author").with_line_breaks()
    }
}

impl fmt::Debug for Author<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Author")
            .field("node", &self.node)
            .field("lines", &self.text_lines())
            .finish()
    }
}

/// A section of a document (such as a presentation slide) comprising a title
/// and a list of elements.
pub struct Section<'a> {
    pub number: Vec<u32>,
    pub notes: Vec<String>,
    tree: &'a Tree<'a>,
    title: NodeId,
    body: Vec<NodeId>,
}

impl<'a> Section<'a> {
    pub(crate) fn new(tree: &'a Tree<'a>, title: NodeId, body: Vec<NodeId>) -> Self {
        Self {
            number: vec![],
            notes: vec![],
            tree,
            title,
            body,
        }
    }

    /// True when nothing but the heading belongs to this section.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Heading level, 2 or 3.
    pub fn level(&self) -> u8 {
        self.tree
            .node(self.title)
            .kind
            .heading_level()
            .unwrap_or_default()
    }

    pub fn title_node(&self) -> NodeId {
        self.title
    }

    pub fn title_text(&self) -> String {
        self.tree.text(self.title)
    }

    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    /// Renders the heading's inline content, never the body.
    pub fn render_title(&self) -> Html {
        render_fragment(self.tree, Fragment::Contents(self.title), "section title")
    }

    /// Renders the body as a document fragment.
    pub fn render(&self) -> Html {
        render_fragment(self.tree, Fragment::Document(&self.body), "section")
    }
}

impl fmt::Debug for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("title", &self.title_text())
            .field("level", &self.level())
            .field("body", &self.body.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_breaks_replace_every_newline() {
        let html = Html("<p>a\nb\n</p>\n".to_string()).with_line_breaks();
        assert_eq!(html.as_str(), "<p>a<br>\nb<br>\n</p><br>\n");
    }

    #[test]
    fn html_displays_verbatim() {
        let html = Html("<em>x</em>".to_string());
        assert_eq!(html.to_string(), "<em>x</em>");
        assert!(!html.is_empty());
        assert!(Html::default().is_empty());
    }

    #[test]
    fn doc_title_or_empty() {
        let mut doc = Doc::default();
        assert_eq!(doc.title_or_empty(), "");
        doc.title = Some("Go".to_string());
        assert_eq!(doc.title_or_empty(), "Go");
    }
}
