/// Markdown dialect and rendering switches for a [`Markdown`](super::Markdown) engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// `~~deleted~~` text.
    pub strikethrough: bool,
    /// `- [x] done` list items.
    pub tasklists: bool,
    /// Pass raw HTML through to the output. When false it is replaced by an
    /// HTML comment.
    pub raw_html: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strikethrough: true,
            tasklists: true,
            raw_html: true,
        }
    }
}

impl Options {
    pub(crate) fn to_cmark(self) -> pulldown_cmark::Options {
        let mut opts = pulldown_cmark::Options::empty();
        if self.strikethrough {
            opts.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
        }
        if self.tasklists {
            opts.insert(pulldown_cmark::Options::ENABLE_TASKLISTS);
        }
        opts
    }
}
