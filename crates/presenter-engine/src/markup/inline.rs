use pulldown_cmark::CowStr;

use super::{
    registry::{InlineInput, InlineNode, InlineRule, Prioritized, slice_cow},
    span::Span,
    tree::{Node, NodeId, NodeKind, Tree, WalkStatus},
};

/// Runs the registered inline rules over every eligible text run.
///
/// Text inside code blocks, HTML blocks, links and images is never offered
/// to a rule, and neither is a byte written as a backslash escape or an
/// entity. At each trigger position rules are tried in priority order and
/// the first match wins.
pub(crate) fn apply_rules(tree: &mut Tree<'_>, rules: &[Prioritized<Box<dyn InlineRule>>]) {
    if rules.is_empty() {
        return;
    }

    let mut parents = vec![];
    let shared: &Tree<'_> = tree;
    shared.walk(shared.root(), &mut |id, node| {
        if is_raw_zone(&node.kind) {
            return WalkStatus::SkipChildren;
        }
        if node.children.iter().any(|&c| is_text(shared, c)) {
            parents.push(id);
        }
        WalkStatus::Continue
    });

    for parent in parents {
        let old = tree.children(parent).to_vec();
        let mut new = Vec::with_capacity(old.len());
        let mut changed = false;
        for child in old {
            if is_text(tree, child) {
                changed |= split_text(tree, child, rules, &mut new);
            } else {
                new.push(child);
            }
        }
        if changed {
            tree.set_children(parent, new);
        }
    }
}

fn is_raw_zone(kind: &NodeKind<'_>) -> bool {
    matches!(
        kind,
        NodeKind::CodeBlock { .. }
            | NodeKind::HtmlBlock
            | NodeKind::Link { .. }
            | NodeKind::AutoLink { .. }
            | NodeKind::Image { .. }
    )
}

fn is_text(tree: &Tree<'_>, id: NodeId) -> bool {
    matches!(tree.node(id).kind, NodeKind::Text(_))
}

/// Splits one text run around rule matches, pushing the resulting node ids
/// onto `out`. Returns false (and pushes `id` unchanged) if nothing matched.
fn split_text<'a>(
    tree: &mut Tree<'a>,
    id: NodeId,
    rules: &[Prioritized<Box<dyn InlineRule>>],
    out: &mut Vec<NodeId>,
) -> bool {
    let node = tree.node(id);
    let NodeKind::Text(text) = node.kind.clone() else {
        out.push(id);
        return false;
    };
    let span = node.span;

    // Runs that are not verbatim source came from escapes or entities and
    // hold no literal syntax.
    if tree.source().get(span.start..span.end) != Some(&*text) {
        out.push(id);
        return false;
    }

    let mut pieces: Vec<NodeId> = vec![];
    let mut seg_start = 0;
    let mut i = 0;
    while i < text.len() {
        let b = text.as_bytes()[i];
        if is_escaped(tree.source(), span.start + i) {
            i += 1;
            continue;
        }
        let matched = rules
            .iter()
            .filter(|r| r.value.trigger().contains(&b))
            .find_map(|r| {
                let input = InlineInput::new(&text, i);
                let m = r.value.parse(&input)?;
                if m.range.start != 0 || m.range.end == 0 || !input.line().is_char_boundary(m.range.end)
                {
                    log::warn!(
                        "inline rule {} returned an invalid range {:?}; ignored",
                        r.value.name(),
                        m.range
                    );
                    return None;
                }
                Some(m)
            });

        let Some(m) = matched else {
            i += 1;
            continue;
        };

        if seg_start < i {
            pieces.push(text_piece(tree, &text, seg_start..i, span));
        }
        let len = m.range.end;
        pieces.push(alloc_inline(tree, m, i, span));
        i += len;
        seg_start = i;
    }

    if pieces.is_empty() {
        out.push(id);
        return false;
    }
    if seg_start < text.len() {
        pieces.push(text_piece(tree, &text, seg_start..text.len(), span));
    }
    out.extend(pieces);
    true
}

/// Whether the source byte at `at` follows an odd run of backslashes.
fn is_escaped(source: &str, at: usize) -> bool {
    let backslashes = source.as_bytes()[..at]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    backslashes % 2 == 1
}

fn text_piece<'a>(
    tree: &mut Tree<'a>,
    text: &CowStr<'a>,
    range: std::ops::Range<usize>,
    span: Span,
) -> NodeId {
    let piece = slice_cow(text, range.clone());
    tree.alloc(Node::new(NodeKind::Text(piece), span.sub(range)))
}

fn alloc_inline<'a>(
    tree: &mut Tree<'a>,
    inline: InlineNode<'a>,
    base: usize,
    span: Span,
) -> NodeId {
    let range = base + inline.range.start..base + inline.range.end;
    let children = inline
        .children
        .into_iter()
        .map(|child| alloc_inline(tree, child, base, span))
        .collect();
    let id = tree.alloc(Node::new(inline.kind, span.sub(range)));
    tree.set_children(id, children);
    id
}
