//! # Slide Documents
//!
//! Classifies a parsed [`Tree`] into a [`Doc`]: title, header fields, author
//! blocks and sections.
//!
//! ## Modules
//!
//! - **`extract`**: one walk over the top-level nodes, sorting them by role
//! - **`header`**: header block lines → subtitle, time, tags, summary
//! - **`model`**: `Doc`, `Author`, `Section` and their HTML rendering
//!
//! ## Roles
//!
//! - The level-1 heading is the title.
//! - Paragraphs between the title and the first section heading are
//!   metadata. The one not preceded by a blank line is the header block;
//!   every one preceded by a blank line is an author block.
//! - Each level-2 or level-3 heading starts a section that collects every
//!   node up to the next such heading.

mod extract;
pub mod header;
pub mod model;

pub use model::{Author, Doc, Html, Section};

use crate::{
    error::SlideError,
    markup::{NodeKind, Tree},
};

/// How much of a document to classify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    #[default]
    Full,
    /// Stop right after the title heading: no header fields, authors or
    /// sections.
    TitlesOnly,
}

/// Classifies `tree` into a [`Doc`] that borrows the tree.
///
/// Fails if the metadata contains anything but paragraphs, or if the header
/// block has a line that fits no field.
pub fn parse_slide<'a>(tree: &'a Tree<'a>, mode: ParseMode) -> Result<Doc<'a>, SlideError> {
    let outline = extract::outline(tree, mode);

    let mut doc = Doc {
        title: outline.title.map(|id| tree.text(id)),
        ..Doc::default()
    };

    for meta in outline.metadata {
        let node = tree.node(meta);
        if node.kind != NodeKind::Paragraph {
            return Err(SlideError::UnexpectedNode {
                kind: node.kind.name(),
                span: node.span,
            });
        }
        if node.has_blank_previous_line() {
            doc.authors.push(Author::new(tree, meta));
        } else {
            header::parse_header(&mut doc, tree, meta)?;
        }
    }

    doc.sections = outline
        .sections
        .into_iter()
        .map(|raw| Section::new(tree, raw.title, raw.nodes))
        .collect();

    log::debug!(
        "parsed {:?}: {} authors, {} sections",
        doc.title_or_empty(),
        doc.authors.len(),
        doc.sections.len()
    );
    Ok(doc)
}
