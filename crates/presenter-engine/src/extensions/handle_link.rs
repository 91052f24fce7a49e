use crate::markup::{
    CowStr, Extension, InlineInput, InlineNode, InlineRule, MarkdownBuilder, NodeKind,
    cursor::Cursor,
};

/// Inline rule for `<@handle>` links.
///
/// Registered behind every built-in construct, so `<scheme:...>` and
/// `<user@host>` autolinks are claimed by CommonMark first.
pub struct HandleLink;

impl HandleLink {
    pub const OPEN: u8 = b'<';
    pub const AT: u8 = b'@';
    pub const CLOSE: u8 = b'>';
    /// Prefix of the emitted destination. The bytes between `<` and `>`
    /// (including the `@`) are appended verbatim.
    pub const DESTINATION_PREFIX: &'static str = "https://twitter.com/";
    pub const PRIORITY: u16 = 999;

    fn is_handle_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_'
    }

    /// Length of `@handle` at the start of `s`, or `None` if `s` does not
    /// start with `@` followed by at least one handle byte.
    pub fn find_handle(s: &str) -> Option<usize> {
        let mut cur = Cursor::new(s);
        if !cur.eat(Self::AT) || cur.bump_while(Self::is_handle_byte) == 0 {
            return None;
        }
        Some(cur.pos())
    }
}

impl InlineRule for HandleLink {
    fn name(&self) -> &'static str {
        "handle-link"
    }

    fn trigger(&self) -> &[u8] {
        b"<"
    }

    fn parse<'a>(&self, input: &InlineInput<'_, 'a>) -> Option<InlineNode<'a>> {
        let line = input.line();
        let mut cur = Cursor::new(line);
        if !cur.eat(Self::OPEN) {
            return None;
        }
        let stop = 1 + Self::find_handle(&line[1..])?;
        if line.as_bytes().get(stop) != Some(&Self::CLOSE) {
            return None;
        }

        let handle = input.slice(1..stop);
        let destination = CowStr::from(format!("{}{}", Self::DESTINATION_PREFIX, &*handle));
        Some(InlineNode {
            kind: NodeKind::Link {
                destination,
                title: CowStr::Borrowed(""),
            },
            range: 0..stop + 1,
            children: vec![InlineNode {
                kind: NodeKind::Text(handle),
                range: 1..stop,
                children: vec![],
            }],
        })
    }
}

/// Registers [`HandleLink`] at [`HandleLink::PRIORITY`].
pub struct HandleLinkExtension;

impl Extension for HandleLinkExtension {
    fn extend(self, builder: MarkdownBuilder) -> MarkdownBuilder {
        builder.inline_rule(Box::new(HandleLink), HandleLink::PRIORITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Fragment, Markdown, Tree, render};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse_rule<'a>(text: &'a CowStr<'a>) -> Option<InlineNode<'a>> {
        HandleLink.parse(&InlineInput::new(text, 0))
    }

    #[test]
    fn matches_handle() {
        let text = CowStr::Borrowed("<@abc_123> and more");
        let node = parse_rule(&text).expect("handle should match");
        assert_eq!(node.range, 0..10);
        match &node.kind {
            NodeKind::Link { destination, .. } => {
                assert_eq!(&**destination, "https://twitter.com/@abc_123");
            }
            other => panic!("expected link, got {other:?}"),
        }
        assert_eq!(node.children.len(), 1);
        match &node.children[0].kind {
            NodeKind::Text(text) => {
                assert_eq!(&**text, "@abc_123");
                assert!(matches!(text, CowStr::Borrowed(_)));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[rstest]
    #[case::empty_handle("<@>")]
    #[case::no_at("<not-a-handle>")]
    #[case::unclosed("<@abc")]
    #[case::space_before_close("<@abc >")]
    #[case::punctuation("<@a.b>")]
    #[case::email("<me@example.com>")]
    #[case::bare("<")]
    fn rejects(#[case] input: &str) {
        let text = CowStr::Borrowed(input);
        assert!(parse_rule(&text).is_none(), "{input} should not match");
    }

    #[test]
    fn find_handle_lengths() {
        assert_eq!(HandleLink::find_handle("@a"), Some(2));
        assert_eq!(HandleLink::find_handle("@rob_pike>"), Some(9));
        assert_eq!(HandleLink::find_handle("@"), None);
        assert_eq!(HandleLink::find_handle("x@y"), None);
    }

    fn link_in_first_paragraph<'t>(tree: &'t Tree<'t>) -> Option<&'t NodeKind<'t>> {
        let para = tree.children(tree.root())[0];
        tree.children(para)
            .iter()
            .map(|&c| &tree.node(c).kind)
            .find(|k| k.is_link())
    }

    #[test]
    fn engine_turns_handles_into_links() {
        let md = Markdown::builder().extension(HandleLinkExtension).build();
        let tree = md.parse("And finally, a twitter alias <@rob_pike>.\n");
        let para = tree.children(tree.root())[0];
        let link = tree.children(para)[1];
        assert_eq!(tree.text(link), "@rob_pike");
        assert_eq!(tree.slice(tree.node(link).span), "<@rob_pike>");
        assert!(matches!(
            link_in_first_paragraph(&tree),
            Some(NodeKind::Link { destination, .. }) if &**destination == "https://twitter.com/@rob_pike"
        ));
    }

    #[test]
    fn builtin_autolinks_win() {
        let md = Markdown::builder().extension(HandleLinkExtension).build();
        let tree = md.parse("<me@example.com>\n");
        assert!(matches!(
            link_in_first_paragraph(&tree),
            Some(NodeKind::AutoLink { email: true, .. })
        ));

        let tree = md.parse("<https://example.com/>\n");
        assert!(matches!(
            link_in_first_paragraph(&tree),
            Some(NodeKind::AutoLink { email: false, .. })
        ));
    }

    fn render_html(source: &str) -> String {
        let tree = crate::markdown().parse(source);
        let mut out = String::new();
        render(&tree, Fragment::Node(tree.root()), &mut out).unwrap();
        out
    }

    #[rstest]
    #[case::backslash("\\<@abc>\n")]
    #[case::entity("&lt;@abc>\n")]
    #[case::numeric_entity("&#60;@abc>\n")]
    fn escaped_open_stays_text(#[case] source: &str) {
        assert_eq!(render_html(source), "<p>&lt;@abc&gt;</p>\n");
    }

    #[test]
    fn escaped_backslash_before_handle_still_links() {
        assert_eq!(
            render_html("\\\\<@abc>\n"),
            "<p>\\<a href=\"https://twitter.com/@abc\" target=\"_blank\" rel=\"noopener\">@abc</a></p>\n"
        );
    }

    #[test]
    fn non_handles_through_engine() {
        let tree = crate::markdown().parse("<@> <not-a-handle>\n");
        let para = tree.children(tree.root())[0];
        let kinds: Vec<_> = tree
            .children(para)
            .iter()
            .map(|&c| tree.node(c).kind.name())
            .collect();
        assert!(!kinds.iter().any(|k| *k == "Link" || *k == "AutoLink"));
        assert!(kinds.contains(&"Html"));
        assert_eq!(
            render_html("<@> <not-a-handle>\n"),
            "<p>&lt;@&gt; <not-a-handle></p>\n"
        );
    }

    #[test]
    fn handles_in_code_spans_stay_code() {
        let md = Markdown::builder().extension(HandleLinkExtension).build();
        let tree = md.parse("`<@abc>`\n");
        assert!(link_in_first_paragraph(&tree).is_none());
    }
}
