//! Markdown reader with generic directive syntax.
//!
//! Produces a [`Root`] where `:name`, `::name` and `:::name` directives are
//! [`Directive`] nodes. Lines are first split into markdown runs, leaf lines
//! and container blocks (skipping anything inside fenced code), then each
//! markdown run is parsed with `pulldown-cmark`.
//!
//! # Example
//!
//! ```
//! use rds_tree::{DirectiveKind, Node, reader};
//!
//! let root = reader::parse("::video-youtube{#dQw4w9WgXcQ}");
//! let Node::Directive(directive) = &root.children[0] else {
//!     panic!("expected directive");
//! };
//! assert_eq!(directive.kind, DirectiveKind::Leaf);
//! assert_eq!(directive.attr("id"), Some("dQw4w9WgXcQ"));
//! ```

mod args;
mod builder;
mod fence;
mod syntax;

use builder::{directive_node, inline_nodes, markdown_to_nodes};
use fence::FenceTracker;
use syntax::ParsedDirective;

use crate::ast::{Directive, DirectiveKind, Node, Paragraph, Root};

/// Parse markdown with directive syntax into a tree.
#[must_use]
pub fn parse(markdown: &str) -> Root {
    Root {
        children: build(split_blocks(markdown)),
    }
}

/// Source split at directive boundaries.
#[derive(Debug)]
enum Block {
    Markdown(String),
    Leaf(ParsedDirective),
    Container {
        directive: ParsedDirective,
        body: Vec<Block>,
    },
}

/// Blocks collected at one nesting level.
#[derive(Debug, Default)]
struct Section {
    blocks: Vec<Block>,
    pending: String,
}

impl Section {
    fn push_line(&mut self, line: &str) {
        self.pending.push_str(line);
        self.pending.push('\n');
    }

    fn push_block(&mut self, block: Block) {
        self.flush();
        self.blocks.push(block);
    }

    fn flush(&mut self) {
        if !self.pending.trim().is_empty() {
            self.blocks
                .push(Block::Markdown(std::mem::take(&mut self.pending)));
        }
        self.pending.clear();
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

/// An open container: its directive, opening colon count and body so far.
#[derive(Debug)]
struct OpenContainer {
    directive: ParsedDirective,
    colons: usize,
    body: Section,
}

#[derive(Debug, Default)]
struct Splitter {
    root: Section,
    open: Vec<OpenContainer>,
    fence: FenceTracker,
}

impl Splitter {
    fn section(&mut self) -> &mut Section {
        match self.open.last_mut() {
            Some(container) => &mut container.body,
            None => &mut self.root,
        }
    }

    fn line(&mut self, line: &str) {
        if self.fence.update(line) || self.fence.in_fence() {
            self.section().push_line(line);
            return;
        }

        if let Some(colons) = syntax::parse_container_close(line)
            && self
                .open
                .last()
                .is_some_and(|container| colons >= container.colons)
        {
            self.close_container();
            return;
        }

        if let Some((colons, directive)) = syntax::parse_container_open(line) {
            self.section().flush();
            self.open.push(OpenContainer {
                directive,
                colons,
                body: Section::default(),
            });
            return;
        }

        if let Some(directive) = syntax::parse_leaf_line(line) {
            self.section().push_block(Block::Leaf(directive));
            return;
        }

        self.section().push_line(line);
    }

    fn close_container(&mut self) {
        if let Some(container) = self.open.pop() {
            let block = Block::Container {
                directive: container.directive,
                body: container.body.finish(),
            };
            self.section().push_block(block);
        }
    }

    /// Close containers left open at the end of input.
    fn finish(mut self) -> Vec<Block> {
        while !self.open.is_empty() {
            self.close_container();
        }
        self.root.finish()
    }
}

fn split_blocks(markdown: &str) -> Vec<Block> {
    let mut splitter = Splitter::default();
    for line in markdown.lines() {
        splitter.line(line);
    }
    splitter.finish()
}

fn build(blocks: Vec<Block>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for block in blocks {
        match block {
            Block::Markdown(source) => nodes.extend(markdown_to_nodes(&source)),
            Block::Leaf(directive) => {
                nodes.push(Node::Directive(directive_node(DirectiveKind::Leaf, directive)));
            }
            Block::Container { directive, body } => {
                nodes.push(Node::Directive(container_node(directive, body)));
            }
        }
    }
    nodes
}

/// Container children: the label paragraph (if any) followed by the body.
fn container_node(parsed: ParsedDirective, body: Vec<Block>) -> Directive {
    let mut directive = Directive::new(DirectiveKind::Container, parsed.name);
    directive.attributes = parsed.attributes;

    let label = inline_nodes(&parsed.label);
    if !label.is_empty() {
        let mut paragraph = Paragraph::new(label);
        paragraph.data.directive_label = true;
        directive.children.push(Node::Paragraph(paragraph));
    }

    directive.children.extend(build(body));
    directive
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn only_directive(root: &Root) -> &Directive {
        match root.children.as_slice() {
            [Node::Directive(directive)] => directive,
            other => panic!("expected a single directive, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_markdown() {
        let root = parse("# Title\n\nSome text.\n");
        assert_eq!(root.children.len(), 2);
        assert!(matches!(&root.children[0], Node::Heading(h) if h.depth == 1));
    }

    #[test]
    fn test_leaf_directive_with_label() {
        let root = parse("::video-youtube[Never *gonna*]{#dQw4w9WgXcQ}\n");
        let directive = only_directive(&root);
        assert_eq!(directive.kind, DirectiveKind::Leaf);
        assert_eq!(directive.name, "video-youtube");
        assert_eq!(directive.children.len(), 2);
    }

    #[test]
    fn test_container_with_label_and_body() {
        let root = parse(":::image-figure[A caption]\n![alt](a.png)\n:::\n");
        let directive = only_directive(&root);
        assert_eq!(directive.kind, DirectiveKind::Container);
        assert_eq!(directive.children.len(), 2);

        let Node::Paragraph(label) = &directive.children[0] else {
            panic!("expected label paragraph");
        };
        assert!(label.data.directive_label);
        assert_eq!(label.children, vec![Node::text("A caption")]);

        let Node::Paragraph(body) = &directive.children[1] else {
            panic!("expected body paragraph");
        };
        assert!(!body.data.directive_label);
        assert!(matches!(&body.children[0], Node::Image(image) if image.url == "a.png"));
    }

    #[test]
    fn test_nested_containers() {
        let root = parse("::::outer\n:::inner\ntext\n:::\nafter\n::::\n");
        let outer = only_directive(&root);
        assert_eq!(outer.name, "outer");
        assert_eq!(outer.children.len(), 2);
        assert!(matches!(&outer.children[0], Node::Directive(d) if d.name == "inner"));
        assert!(matches!(&outer.children[1], Node::Paragraph(_)));
    }

    #[test]
    fn test_unclosed_container_closes_at_end() {
        let root = parse(":::note\nbody\n");
        let directive = only_directive(&root);
        assert_eq!(directive.children, vec![Node::paragraph(vec![Node::text("body")])]);
    }

    #[test]
    fn test_stray_close_is_text() {
        let root = parse("para\n:::\n");
        assert_eq!(
            root.children,
            vec![Node::paragraph(vec![Node::text("para\n:::")])]
        );
    }

    #[test]
    fn test_directive_in_code_fence_is_literal() {
        let root = parse("```md\n:::image-figure\n::video{#x}\n```\n");
        assert!(matches!(&root.children[..], [Node::Code(code)] if code.value == ":::image-figure\n::video{#x}\n"));
    }

    #[test]
    fn test_text_directive_in_paragraph() {
        let root = parse("Status: :badge-new[NEW] shipped");
        let Node::Paragraph(paragraph) = &root.children[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(paragraph.children.len(), 3);
        assert!(matches!(&paragraph.children[1], Node::Directive(d) if d.kind == DirectiveKind::Text));
    }

    #[test]
    fn test_leaf_interrupts_paragraph() {
        let root = parse("intro\n::video-vimeo{#123}\noutro\n");
        assert_eq!(root.children.len(), 3);
        assert!(matches!(&root.children[1], Node::Directive(d) if d.name == "video-vimeo"));
    }

    #[test]
    fn test_text_directive_label_with_markup_stays_literal() {
        let root = parse("See :badge[**x**] here");
        let Node::Paragraph(paragraph) = &root.children[0] else {
            panic!("expected paragraph");
        };
        assert!(!paragraph.children.iter().any(|n| matches!(n, Node::Directive(_))));
        assert!(paragraph.children.iter().any(|n| matches!(n, Node::Strong(_))));
    }
}
