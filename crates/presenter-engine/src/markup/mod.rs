//! # Markup Engine
//!
//! A CommonMark engine built on `pulldown-cmark` that produces an arena
//! [`Tree`] of typed nodes with byte spans into the source, and renders any
//! fragment of that tree back to HTML.
//!
//! ## Pipeline
//!
//! 1. **Build** (`builder`): the `pulldown-cmark` offset event stream becomes
//!    a [`Tree`]; adjacent text runs are merged and every block records
//!    whether a blank source line precedes it.
//! 2. **Inline rules** (`inline`): registered [`InlineRule`]s run over the
//!    remaining text runs in priority order.
//! 3. **Transforms**: registered [`Transform`]s run over the whole tree in
//!    priority order.
//!
//! An engine is configured once through [`MarkdownBuilder`] and is immutable
//! afterwards, so one engine can serve any number of concurrent parses.

mod builder;
pub mod cursor;
pub mod html;
mod inline;
pub mod options;
pub mod registry;
pub mod span;
pub mod tree;

pub use html::{Fragment, render};
pub use options::Options;
pub use pulldown_cmark::CowStr;
pub use registry::{InlineInput, InlineNode, InlineRule, Prioritized, Transform};
pub use span::Span;
pub use tree::{Attribute, Node, NodeId, NodeKind, Tree, WalkStatus};

/// Something that registers rules or transforms on an engine.
pub trait Extension {
    fn extend(self, builder: MarkdownBuilder) -> MarkdownBuilder;
}

/// A configured markdown engine.
pub struct Markdown {
    options: Options,
    inline_rules: Vec<Prioritized<Box<dyn InlineRule>>>,
    transforms: Vec<Prioritized<Box<dyn Transform>>>,
}

impl Markdown {
    /// An engine with default options and no extensions.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MarkdownBuilder {
        MarkdownBuilder::default()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Registered inline rule names, in dispatch order.
    pub fn inline_rule_names(&self) -> Vec<&'static str> {
        self.inline_rules.iter().map(|r| r.value.name()).collect()
    }

    /// Registered transform names, in run order.
    pub fn transform_names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.value.name()).collect()
    }

    /// Parses `source` into a tree, then runs inline rules and transforms.
    pub fn parse<'a>(&self, source: &'a str) -> Tree<'a> {
        let mut tree = builder::build(source, self.options);
        inline::apply_rules(&mut tree, &self.inline_rules);
        for transform in &self.transforms {
            transform.value.transform(&mut tree);
        }
        tree
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Markdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Markdown")
            .field("options", &self.options)
            .field("inline_rules", &self.inline_rule_names())
            .field("transforms", &self.transform_names())
            .finish()
    }
}

/// Collects options, rules and transforms before building a [`Markdown`].
#[derive(Default)]
pub struct MarkdownBuilder {
    options: Options,
    inline_rules: Vec<Prioritized<Box<dyn InlineRule>>>,
    transforms: Vec<Prioritized<Box<dyn Transform>>>,
}

impl MarkdownBuilder {
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Registers an inline rule. Lower priority values are tried first.
    pub fn inline_rule(mut self, rule: Box<dyn InlineRule>, priority: u16) -> Self {
        self.inline_rules.push(Prioritized::new(rule, priority));
        self
    }

    /// Registers a transform. Lower priority values run first.
    pub fn transform(mut self, transform: Box<dyn Transform>, priority: u16) -> Self {
        self.transforms.push(Prioritized::new(transform, priority));
        self
    }

    pub fn extension(self, extension: impl Extension) -> Self {
        extension.extend(self)
    }

    pub fn build(mut self) -> Markdown {
        self.inline_rules.retain(|rule| {
            let ascii = rule.value.trigger().is_ascii();
            if !ascii {
                log::warn!(
                    "inline rule {} has a non-ASCII trigger; not registered",
                    rule.value.name()
                );
            }
            ascii
        });
        registry::sort_by_priority(&mut self.inline_rules);
        registry::sort_by_priority(&mut self.transforms);
        Markdown {
            options: self.options,
            inline_rules: self.inline_rules,
            transforms: self.transforms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Named(&'static str);

    impl Transform for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn transform(&self, _tree: &mut Tree<'_>) {}
    }

    #[test]
    fn transforms_are_sorted_by_priority() {
        let md = Markdown::builder()
            .transform(Box::new(Named("b")), 20)
            .transform(Box::new(Named("a")), 10)
            .transform(Box::new(Named("c")), 20)
            .build();
        assert_eq!(md.transform_names(), ["a", "b", "c"]);
    }

    struct Umlaut;

    impl InlineRule for Umlaut {
        fn name(&self) -> &'static str {
            "umlaut"
        }

        fn trigger(&self) -> &[u8] {
            // Second byte of "ü".
            b"\xbc"
        }

        fn parse<'a>(&self, _input: &InlineInput<'_, 'a>) -> Option<InlineNode<'a>> {
            None
        }
    }

    #[test]
    fn non_ascii_triggers_are_dropped() {
        let md = Markdown::builder()
            .inline_rule(Box::new(Umlaut), 1)
            .build();
        assert!(md.inline_rule_names().is_empty());

        let tree = md.parse("über\n");
        let para = tree.children(tree.root())[0];
        assert_eq!(tree.text(para), "über");
    }

    #[test]
    fn markdown_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Markdown>();
    }

    #[test]
    fn parse_keeps_source() {
        let source = String::from("# Hi\n");
        let tree = Markdown::new().parse(&source);
        assert_eq!(tree.source(), "# Hi\n");
        let heading = tree.children(tree.root())[0];
        assert_eq!(tree.text(heading), "Hi");
    }
}
