//! # Extension Registry
//!
//! Inline rules and tree transforms are registered with a numeric priority
//! when a [`Markdown`](super::Markdown) engine is built. Lower values run
//! first. The lists are sorted once at build time and never change after.
//!
//! Built-in CommonMark constructs (links, autolinks, email autolinks, inline
//! HTML, code spans) are recognized by `pulldown-cmark` while the tree is
//! built, before any registered rule runs. Registered inline rules therefore
//! only ever see text that no built-in construct claimed.

use std::ops::Range;

use pulldown_cmark::CowStr;

use super::tree::{NodeKind, Tree};

/// A value paired with its dispatch priority.
#[derive(Debug, Clone)]
pub struct Prioritized<T> {
    pub value: T,
    pub priority: u16,
}

impl<T> Prioritized<T> {
    pub fn new(value: T, priority: u16) -> Self {
        Self { value, priority }
    }
}

pub(crate) fn sort_by_priority<T>(items: &mut [Prioritized<T>]) {
    // Stable: equal priorities keep registration order.
    items.sort_by_key(|p| p.priority);
}

/// The text a rule is asked to match: the rest of the current line, starting
/// at a trigger byte.
pub struct InlineInput<'s, 'a> {
    text: &'s CowStr<'a>,
    start: usize,
    end: usize,
}

impl<'s, 'a> InlineInput<'s, 'a> {
    pub(crate) fn new(text: &'s CowStr<'a>, start: usize) -> Self {
        let s: &str = text;
        let end = s[start..].find('\n').map_or(s.len(), |n| start + n);
        Self { text, start, end }
    }

    /// The remaining line, starting with the trigger byte.
    pub fn line(&self) -> &str {
        let s: &str = self.text;
        &s[self.start..self.end]
    }

    /// A piece of [`line`](Self::line) that keeps borrowing the document
    /// source when the underlying run does.
    pub fn slice(&self, range: Range<usize>) -> CowStr<'a> {
        slice_cow(self.text, self.start + range.start..self.start + range.end)
    }
}

/// Slices a text value, borrowing from the source when `text` does.
pub(crate) fn slice_cow<'a>(text: &CowStr<'a>, range: Range<usize>) -> CowStr<'a> {
    match text {
        CowStr::Borrowed(s) => {
            let s: &'a str = *s;
            CowStr::Borrowed(&s[range])
        }
        other => {
            let s: &str = other;
            CowStr::from(s[range].to_string())
        }
    }
}

/// A node produced by an inline rule. Ranges are relative to
/// [`InlineInput::line`].
#[derive(Debug, Clone)]
pub struct InlineNode<'a> {
    pub kind: NodeKind<'a>,
    pub range: Range<usize>,
    pub children: Vec<InlineNode<'a>>,
}

/// A custom inline syntax rule.
pub trait InlineRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Bytes that make the engine offer a position to this rule.
    ///
    /// Triggers must be ASCII. [`MarkdownBuilder::build`](super::MarkdownBuilder::build)
    /// drops a rule with any other trigger byte.
    fn trigger(&self) -> &[u8];

    /// Tries to match at the start of `input`. A match must start at 0 and
    /// consume at least one byte; `None` lets the next rule try.
    fn parse<'a>(&self, input: &InlineInput<'_, 'a>) -> Option<InlineNode<'a>>;
}

/// A whole-tree pass run after inline parsing.
pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    fn transform(&self, tree: &mut Tree<'_>);
}
