use pulldown_cmark::CowStr;

use super::{options::Options, span::Span};

/// Index of a node in a [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

/// The kind of a markup node.
///
/// Text-bearing variants hold [`CowStr`] values that borrow the source buffer
/// whenever the text is a verbatim slice of it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<'a> {
    Document,
    Paragraph,
    Heading {
        level: u8,
    },
    BlockQuote,
    CodeBlock {
        /// Fence info string, empty for indented blocks.
        info: CowStr<'a>,
    },
    HtmlBlock,
    List {
        /// Start number for ordered lists, `None` for bullet lists.
        start: Option<u64>,
    },
    Item,
    ThematicBreak,
    Text(CowStr<'a>),
    Code(CowStr<'a>),
    /// Raw HTML, either inline or the content of an [`NodeKind::HtmlBlock`].
    Html(CowStr<'a>),
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        destination: CowStr<'a>,
        title: CowStr<'a>,
    },
    /// A `<scheme:...>` or `<user@host>` autolink.
    AutoLink {
        destination: CowStr<'a>,
        email: bool,
    },
    Image {
        destination: CowStr<'a>,
        title: CowStr<'a>,
    },
    SoftBreak,
    HardBreak,
    TaskMarker {
        checked: bool,
    },
    /// Constructs the engine does not model; their children are kept.
    Other,
}

impl NodeKind<'_> {
    /// Short, stable name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Heading { .. } => "Heading",
            NodeKind::BlockQuote => "BlockQuote",
            NodeKind::CodeBlock { .. } => "CodeBlock",
            NodeKind::HtmlBlock => "HtmlBlock",
            NodeKind::List { .. } => "List",
            NodeKind::Item => "Item",
            NodeKind::ThematicBreak => "ThematicBreak",
            NodeKind::Text(_) => "Text",
            NodeKind::Code(_) => "Code",
            NodeKind::Html(_) => "Html",
            NodeKind::Emphasis => "Emphasis",
            NodeKind::Strong => "Strong",
            NodeKind::Strikethrough => "Strikethrough",
            NodeKind::Link { .. } => "Link",
            NodeKind::AutoLink { .. } => "AutoLink",
            NodeKind::Image { .. } => "Image",
            NodeKind::SoftBreak => "SoftBreak",
            NodeKind::HardBreak => "HardBreak",
            NodeKind::TaskMarker { .. } => "TaskMarker",
            NodeKind::Other => "Other",
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, NodeKind::Link { .. } | NodeKind::AutoLink { .. })
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            NodeKind::Heading { level } => Some(*level),
            _ => None,
        }
    }
}

/// A rendering attribute attached to a node, emitted as `name="value"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub value: String,
}

/// One node of the parsed tree.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    pub kind: NodeKind<'a>,
    pub span: Span,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) blank_previous_line: bool,
}

impl<'a> Node<'a> {
    pub(crate) fn new(kind: NodeKind<'a>, span: Span) -> Self {
        Self {
            kind,
            span,
            children: vec![],
            attributes: vec![],
            blank_previous_line: false,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute, replacing any previous value of the same name.
    pub fn set_attribute(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Whether the source line directly before this block is blank.
    ///
    /// Always false for inline nodes.
    pub fn has_blank_previous_line(&self) -> bool {
        self.blank_previous_line
    }
}

/// Return value of a [`Tree::walk`] visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    Continue,
    SkipChildren,
    Stop,
}

/// A parsed markup tree over one immutable source buffer.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. The tree is
/// built once by [`Markdown::parse`](super::Markdown::parse) and is read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct Tree<'a> {
    source: &'a str,
    nodes: Vec<Node<'a>>,
    options: Options,
}

impl<'a> Tree<'a> {
    pub(crate) fn new(source: &'a str, options: Options) -> Self {
        let root = Node::new(NodeKind::Document, Span::new(0, source.len()));
        Self {
            source,
            nodes: vec![root],
            options,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<'a> {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub(crate) fn push(&mut self, parent: NodeId, node: Node<'a>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Allocates a node without attaching it to a parent.
    pub(crate) fn alloc(&mut self, node: Node<'a>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        self.nodes[id.0].children = children;
    }

    /// Returns the exact source text covered by `span`.
    pub fn slice(&self, span: Span) -> &'a str {
        &self.source[span.start..span.end]
    }

    /// Concatenated plain text of a subtree: text runs and code spans only,
    /// with no markup.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text(t) | NodeKind::Code(t) => out.push_str(t),
            _ => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Source lines covered by a block node, without line terminators.
    pub fn lines(&self, id: NodeId) -> impl Iterator<Item = &'a str> + '_ {
        self.slice(self.node(id).span)
            .lines()
            .map(|line| line.trim_end_matches('\r'))
    }

    /// Pre-order walk starting at `id`.
    ///
    /// The visitor decides per node whether to descend, skip the node's
    /// children, or stop the whole walk. Returns false if the walk stopped.
    pub fn walk<F>(&self, id: NodeId, visit: &mut F) -> bool
    where
        F: FnMut(NodeId, &Node<'a>) -> WalkStatus,
    {
        match visit(id, self.node(id)) {
            WalkStatus::Stop => return false,
            WalkStatus::SkipChildren => return true,
            WalkStatus::Continue => {}
        }
        for &child in self.children(id) {
            if !self.walk(child, visit) {
                return false;
            }
        }
        true
    }
}
