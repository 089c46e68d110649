//! Converts `pulldown-cmark` events into [`Node`]s.
//!
//! Text directives are recognized after each inline container closes, once
//! adjacent text events have been merged.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::syntax::{self, ParsedDirective};
use crate::ast::{Code, Directive, DirectiveKind, Heading, Image, Link, List, Node};

/// Parse a markdown fragment without directive blocks into nodes.
pub(crate) fn markdown_to_nodes(source: &str) -> Vec<Node> {
    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH) {
        builder.event(event);
    }
    builder.finish()
}

/// Parse a directive label as inline content.
pub(crate) fn inline_nodes(label: &str) -> Vec<Node> {
    if label.trim().is_empty() {
        return Vec::new();
    }
    let mut nodes = markdown_to_nodes(label);
    if nodes.len() == 1
        && let Some(Node::Paragraph(paragraph)) = nodes.first_mut()
    {
        return std::mem::take(&mut paragraph.children);
    }
    nodes
}

/// Build a directive node from its recognized syntax.
pub(crate) fn directive_node(kind: DirectiveKind, parsed: ParsedDirective) -> Directive {
    let mut directive = Directive::new(kind, parsed.name);
    directive.attributes = parsed.attributes;
    directive.children = inline_nodes(&parsed.label);
    directive
}

#[derive(Debug)]
enum FrameKind {
    Root,
    Paragraph,
    Heading(u8),
    Blockquote,
    List(Option<u64>),
    Item,
    Emphasis,
    Strong,
    Delete,
    Link { url: String, title: Option<String> },
    Image { url: String, title: Option<String> },
    CodeBlock { lang: Option<String> },
    /// Constructs without a node of their own; children go to the parent.
    Transparent,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    children: Vec<Node>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct TreeBuilder {
    stack: Vec<Frame>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            stack: vec![Frame::new(FrameKind::Root)],
        }
    }
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.stack.push(Frame::new(frame_kind(tag))),
            Event::End(_) => self.close(),
            Event::Text(text) => self.push(Node::Text(text.into_string())),
            Event::Code(code) => self.push(Node::InlineCode(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => self.push(Node::Html(html.into_string())),
            Event::SoftBreak => self.push(Node::text("\n")),
            Event::HardBreak => self.push(Node::Break),
            Event::Rule => self.push(Node::ThematicBreak),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.push(Node::Text(math.into_string()));
            }
            Event::FootnoteReference(_) | Event::TaskListMarker(_) => {}
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };

        let Frame { kind, children } = frame;
        let node = match kind {
            FrameKind::Root => return,
            FrameKind::Paragraph => Node::paragraph(expand_text_directives(children)),
            FrameKind::Heading(depth) => Node::Heading(Heading {
                depth,
                children: expand_text_directives(children),
            }),
            FrameKind::Blockquote => Node::Blockquote(children),
            FrameKind::List(start) => Node::List(List { start, children }),
            FrameKind::Item => Node::ListItem(expand_text_directives(children)),
            FrameKind::Emphasis => Node::Emphasis(expand_text_directives(children)),
            FrameKind::Strong => Node::Strong(expand_text_directives(children)),
            FrameKind::Delete => Node::Delete(expand_text_directives(children)),
            FrameKind::Link { url, title } => Node::Link(Link {
                url,
                title,
                children: expand_text_directives(children),
            }),
            FrameKind::Image { url, title } => {
                let alt: String = children.iter().map(Node::plain_text).collect();
                let mut image = Image::new(url, alt);
                image.title = title;
                Node::Image(image)
            }
            FrameKind::CodeBlock { lang } => Node::Code(Code {
                lang,
                value: children.iter().map(Node::plain_text).collect(),
            }),
            FrameKind::Transparent => {
                for child in children {
                    self.push(child);
                }
                return;
            }
        };
        self.push(node);
    }

    fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack
            .pop()
            .map(|root| root.children)
            .unwrap_or_default()
    }
}

fn frame_kind(tag: Tag<'_>) -> FrameKind {
    match tag {
        Tag::Paragraph => FrameKind::Paragraph,
        Tag::Heading { level, .. } => FrameKind::Heading(level as u8),
        Tag::BlockQuote(_) => FrameKind::Blockquote,
        Tag::CodeBlock(kind) => {
            let lang = match kind {
                CodeBlockKind::Fenced(info) => info
                    .split_whitespace()
                    .next()
                    .map(str::to_owned),
                CodeBlockKind::Indented => None,
            };
            FrameKind::CodeBlock { lang }
        }
        Tag::List(start) => FrameKind::List(start),
        Tag::Item => FrameKind::Item,
        Tag::Emphasis => FrameKind::Emphasis,
        Tag::Strong => FrameKind::Strong,
        Tag::Strikethrough => FrameKind::Delete,
        Tag::Link {
            dest_url, title, ..
        } => FrameKind::Link {
            url: dest_url.into_string(),
            title: non_empty(title.into_string()),
        },
        Tag::Image {
            dest_url, title, ..
        } => FrameKind::Image {
            url: dest_url.into_string(),
            title: non_empty(title.into_string()),
        },
        _ => FrameKind::Transparent,
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Merge adjacent text nodes, then split text directives out of them.
///
/// Only plain text is scanned, so a label holding inline markup is not a directive.
fn expand_text_directives(children: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for node in children {
        if let Node::Text(value) = &node
            && let Some(Node::Text(prev)) = merged.last_mut()
        {
            prev.push_str(value);
            continue;
        }
        merged.push(node);
    }

    let mut out = Vec::with_capacity(merged.len());
    for node in merged {
        match node {
            Node::Text(value) => split_text(&value, &mut out),
            other => out.push(other),
        }
    }
    out
}

fn split_text(mut text: &str, out: &mut Vec<Node>) {
    while let Some((start, end, parsed)) = syntax::find_text_directive(text) {
        if start > 0 {
            out.push(Node::text(&text[..start]));
        }
        out.push(Node::Directive(directive_node(DirectiveKind::Text, parsed)));
        text = &text[end..];
    }
    if !text.is_empty() {
        out.push(Node::text(text));
    }
}
