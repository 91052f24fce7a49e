use crate::markup::{NodeId, NodeKind, Tree, WalkStatus};

use super::ParseMode;

/// A section before its body is wrapped into a [`Section`](super::Section).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawSection {
    pub title: NodeId,
    pub nodes: Vec<NodeId>,
}

/// Top-level nodes sorted by role.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Outline {
    pub title: Option<NodeId>,
    pub metadata: Vec<NodeId>,
    pub sections: Vec<RawSection>,
}

/// Where the walk currently sends ordinary nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing before the title is kept.
    BeforeTitle,
    /// Between the title and the first section heading.
    InHeader,
    /// Inside `sections[index]`.
    InSection(usize),
}

/// Splits the document's top-level nodes into title, metadata and sections.
///
/// Headings of level 1 to 3 drive the state; everything else, including
/// headings of level 4 and deeper, goes wherever the current state says.
/// The walk never descends below the top level and never fails.
pub(crate) fn outline(tree: &Tree<'_>, mode: ParseMode) -> Outline {
    let mut out = Outline::default();
    let mut state = State::BeforeTitle;
    let root = tree.root();

    tree.walk(root, &mut |id, node| {
        if id == root {
            return WalkStatus::Continue;
        }
        match node.kind {
            NodeKind::Heading { level: 1 } => {
                out.title = Some(id);
                state = State::InHeader;
                if mode == ParseMode::TitlesOnly {
                    return WalkStatus::Stop;
                }
            }
            NodeKind::Heading { level: 2 | 3 } => {
                out.sections.push(RawSection {
                    title: id,
                    nodes: vec![],
                });
                state = State::InSection(out.sections.len() - 1);
            }
            _ => match state {
                State::BeforeTitle => {}
                State::InHeader => out.metadata.push(id),
                State::InSection(index) => out.sections[index].nodes.push(id),
            },
        }
        WalkStatus::SkipChildren
    });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Markdown;
    use pretty_assertions::assert_eq;

    fn kinds(tree: &Tree<'_>, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| match tree.node(id).kind {
                NodeKind::Heading { level } => format!("H{level}"),
                ref other => other.name().to_string(),
            })
            .collect()
    }

    #[test]
    fn content_before_title_is_ignored() {
        let tree = Markdown::new().parse("stray\n\n# Title\nSub\n");
        let out = outline(&tree, ParseMode::Full);
        assert_eq!(tree.text(out.title.unwrap()), "Title");
        assert_eq!(kinds(&tree, &out.metadata), ["Paragraph"]);
        assert_eq!(tree.text(out.metadata[0]), "Sub");
    }

    #[test]
    fn h2_and_h3_start_sections_h4_does_not() {
        let tree = Markdown::new().parse(
            "# T\n\n## One\n\ntext\n\n#### Deep\n\nmore\n\n### Two\n\n- item\n",
        );
        let out = outline(&tree, ParseMode::Full);
        assert_eq!(out.sections.len(), 2);
        assert_eq!(
            kinds(&tree, &out.sections[0].nodes),
            ["Paragraph", "H4", "Paragraph"]
        );
        assert_eq!(kinds(&tree, &out.sections[1].nodes), ["List"]);
    }

    #[test]
    fn adjacent_headings_give_empty_section() {
        let tree = Markdown::new().parse("# T\n\n## Divider\n### Next\n\nbody\n");
        let out = outline(&tree, ParseMode::Full);
        assert_eq!(out.sections.len(), 2);
        assert!(out.sections[0].nodes.is_empty());
        assert_eq!(out.sections[1].nodes.len(), 1);
    }

    #[test]
    fn titles_only_stops_at_title() {
        let tree = Markdown::new().parse("# T\nSub\n\nAuthor\n\n## One\n\ntext\n");
        let out = outline(&tree, ParseMode::TitlesOnly);
        assert!(out.title.is_some());
        assert!(out.metadata.is_empty());
        assert!(out.sections.is_empty());
    }

    #[test]
    fn sections_without_title_are_still_collected() {
        let tree = Markdown::new().parse("intro\n\n## One\n\ntext\n");
        let out = outline(&tree, ParseMode::Full);
        assert_eq!(out.title, None);
        assert!(out.metadata.is_empty());
        assert_eq!(out.sections.len(), 1);
    }

    #[test]
    fn later_level_one_heading_replaces_title() {
        let tree = Markdown::new().parse("# First\n\n## S\n\n# Second\nmeta\n");
        let out = outline(&tree, ParseMode::Full);
        assert_eq!(tree.text(out.title.unwrap()), "Second");
        assert_eq!(out.metadata.len(), 1);
        assert_eq!(out.sections.len(), 1);
    }
}
