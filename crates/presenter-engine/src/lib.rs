//! Parsing and rendering of present files: slide presentations and articles
//! written in a constrained markdown dialect.
//!
//! # File format
//!
//! A present file starts with a header giving the title and other metadata:
//!
//! ```text
//! # Title of document
//! Subtitle of document
//! 15:04 2 Jan 2006
//! Tags: foo, bar, baz
//! Summary: This is a great document you want to read.
//! ```
//!
//! The `#` line is the title. No blank line may separate it from the other
//! header lines. The date may be written without a time (`2 Jan 2006`), in
//! which case it means 11:00 UTC on that date. Only the title is required.
//!
//! After the header come zero or more author blocks, each preceded by its own
//! blank line:
//!
//! ```text
//! Author Name
//! Job title, Company
//! <joe@example.com>
//! <https://url/>
//! <@twitter_name>
//! ```
//!
//! Then come the slides or article sections. Each starts with a `##` or `###`
//! heading; `####` and deeper headings are ordinary section content.
//!
//! # Usage
//!
//! ```
//! use presenter_engine::{ParseMode, markdown, parse_slide};
//!
//! let source = "# Talk\nA subtitle\n\nGopher\n<@gopher>\n\n## Hello\n\nHi!\n";
//! let tree = markdown().parse(source);
//! let doc = parse_slide(&tree, ParseMode::Full).unwrap();
//! assert_eq!(doc.title.as_deref(), Some("Talk"));
//! assert_eq!(doc.sections[0].render().as_str(), "<p>Hi!</p>\n");
//! ```

pub mod error;
pub mod extensions;
pub mod io;
pub mod markup;
pub mod slide;

use std::sync::LazyLock;

pub use error::SlideError;
pub use extensions::{HandleLinkExtension, TargetBlankExtension};
pub use markup::{Markdown, MarkdownBuilder, Options, Tree};
pub use slide::{Author, Doc, Html, ParseMode, Section, parse_slide};

/// Engine builder with the present dialect's extensions registered.
pub fn presenter_builder() -> MarkdownBuilder {
    Markdown::builder()
        .extension(HandleLinkExtension)
        .extension(TargetBlankExtension)
}

static MARKDOWN: LazyLock<Markdown> = LazyLock::new(|| presenter_builder().build());

/// The process-wide engine: default options plus handle links and
/// target-blank links.
pub fn markdown() -> &'static Markdown {
    &MARKDOWN
}
