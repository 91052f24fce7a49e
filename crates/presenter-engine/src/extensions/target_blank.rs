use crate::markup::{Extension, MarkdownBuilder, NodeId, Transform, Tree, WalkStatus};

/// Marks every link and autolink to open in a new browsing context.
///
/// `rel="noopener"` keeps the opened page from reaching back into the
/// opener through `window.opener`.
pub struct TargetBlank;

impl TargetBlank {
    pub const PRIORITY: u16 = 10;
}

impl Transform for TargetBlank {
    fn name(&self) -> &'static str {
        "target-blank"
    }

    fn transform(&self, tree: &mut Tree<'_>) {
        let mut links: Vec<NodeId> = vec![];
        tree.walk(tree.root(), &mut |id, node| {
            if node.kind.is_link() {
                links.push(id);
            }
            WalkStatus::Continue
        });
        log::trace!("marking {} links target=_blank", links.len());
        for id in links {
            let node = tree.node_mut(id);
            node.set_attribute("target", "_blank");
            node.set_attribute("rel", "noopener");
        }
    }
}

/// Registers [`TargetBlank`] at [`TargetBlank::PRIORITY`].
pub struct TargetBlankExtension;

impl Extension for TargetBlankExtension {
    fn extend(self, builder: MarkdownBuilder) -> MarkdownBuilder {
        builder.transform(Box::new(TargetBlank), TargetBlank::PRIORITY)
    }
}
