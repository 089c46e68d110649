//! Markdown syntax tree with directive nodes.

use crate::hast::HastNode;
use crate::props::{Attributes, Properties};

/// Root of a parsed document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Root {
    /// Top-level block nodes.
    pub children: Vec<Node>,
}

/// Render target side-channel attached to a node.
///
/// Filled in by directive handlers and read by the HTML writer:
/// `h_name` replaces the element name, `h_properties` the attributes and
/// `h_children` (when set) the rendered children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Data {
    /// Element name to render instead of the node's default.
    pub h_name: Option<String>,
    /// Element properties.
    pub h_properties: Option<Properties>,
    /// Replacement children, rendered instead of the node's own children.
    pub h_children: Option<Vec<HastNode>>,
    /// Set on the paragraph holding a container directive's `[label]`.
    pub directive_label: bool,
}

impl Data {
    /// Whether a render target has been written.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.h_name.is_some()
    }
}

/// Structural kind of a directive, given by its fencing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum DirectiveKind {
    /// `:::name` ... `:::`, encloses blocks.
    Container,
    /// `::name`, a single line.
    Leaf,
    /// `:name`, inline within text.
    Text,
}

impl DirectiveKind {
    /// Number of colons that open this kind of directive.
    #[must_use]
    pub fn colons(self) -> usize {
        match self {
            Self::Container => 3,
            Self::Leaf => 2,
            Self::Text => 1,
        }
    }

    /// Lowercase name used in messages (`container`, `leaf`, `text`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Leaf => "leaf",
            Self::Text => "text",
        }
    }

    /// Fencing syntax in words, for messages.
    #[must_use]
    pub fn fence(self) -> &'static str {
        match self {
            Self::Container => "three colons (`:::`)",
            Self::Leaf => "double colons (`::`)",
            Self::Text => "single colon (`:`)",
        }
    }
}

impl std::fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directive node as produced by the reader.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Directive {
    /// Container, leaf or text.
    pub kind: DirectiveKind,
    /// Directive name as written (`image-figure`, `badge-v`).
    pub name: String,
    /// Attributes from the `{...}` block.
    pub attributes: Attributes,
    /// Label content (leaf/text) or body blocks (container).
    pub children: Vec<Node>,
    /// Render target, written once by the directive core.
    pub data: Data,
}

impl Directive {
    /// Create a directive with no attributes and no children.
    #[must_use]
    pub fn new(kind: DirectiveKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            data: Data::default(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Value of the first child when it is a text node.
    ///
    /// For leaf and text directives this is the `[label]` text.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        match self.children.first() {
            Some(Node::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// First image in depth-first order among the descendants.
    pub fn first_image_mut(&mut self) -> Option<&mut Image> {
        first_image_mut(&mut self.children)
    }

    /// Visit every image among the descendants in depth-first order.
    pub fn for_each_image_mut(&mut self, f: &mut dyn FnMut(&mut Image)) {
        for_each_image_mut(&mut self.children, f);
    }
}

/// Paragraph block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Paragraph {
    pub children: Vec<Node>,
    pub data: Data,
}

impl Paragraph {
    /// Create a paragraph from inline children.
    #[must_use]
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            data: Data::default(),
        }
    }
}

/// ATX or setext heading.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Heading {
    /// Level 1-6.
    pub depth: u8,
    pub children: Vec<Node>,
}

/// Ordered or bullet list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct List {
    /// Start number for ordered lists, `None` for bullet lists.
    pub start: Option<u64>,
    /// `ListItem` nodes.
    pub children: Vec<Node>,
}

/// Fenced or indented code block.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Code {
    /// Info string language, if any.
    pub lang: Option<String>,
    pub value: String,
}

/// Inline link.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub children: Vec<Node>,
}

/// Inline image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Image {
    pub url: String,
    /// Alt text (plain text of the `![...]` part).
    pub alt: String,
    pub title: Option<String>,
    pub data: Data,
}

impl Image {
    /// Create an image with the given source and alt text.
    #[must_use]
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.into(),
            title: None,
            data: Data::default(),
        }
    }
}

/// A node of the markdown tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", content = "node", rename_all = "camelCase")
)]
pub enum Node {
    Paragraph(Paragraph),
    Heading(Heading),
    Blockquote(Vec<Node>),
    List(List),
    ListItem(Vec<Node>),
    Code(Code),
    /// Raw HTML, block or inline.
    Html(String),
    ThematicBreak,
    Text(String),
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Delete(Vec<Node>),
    InlineCode(String),
    Break,
    Link(Link),
    Image(Image),
    Directive(Directive),
}

impl Node {
    /// Create a text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Create a paragraph node.
    #[must_use]
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::Paragraph(Paragraph::new(children))
    }

    /// Child nodes, for node types that have them.
    #[must_use]
    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Self::Paragraph(p) => Some(&p.children),
            Self::Heading(h) => Some(&h.children),
            Self::List(l) => Some(&l.children),
            Self::Link(l) => Some(&l.children),
            Self::Directive(d) => Some(&d.children),
            Self::Blockquote(c)
            | Self::ListItem(c)
            | Self::Emphasis(c)
            | Self::Strong(c)
            | Self::Delete(c) => Some(c),
            Self::Code(_)
            | Self::Html(_)
            | Self::ThematicBreak
            | Self::Text(_)
            | Self::InlineCode(_)
            | Self::Break
            | Self::Image(_) => None,
        }
    }

    /// Mutable child nodes, for node types that have them.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Paragraph(p) => Some(&mut p.children),
            Self::Heading(h) => Some(&mut h.children),
            Self::List(l) => Some(&mut l.children),
            Self::Link(l) => Some(&mut l.children),
            Self::Directive(d) => Some(&mut d.children),
            Self::Blockquote(c)
            | Self::ListItem(c)
            | Self::Emphasis(c)
            | Self::Strong(c)
            | Self::Delete(c) => Some(c),
            Self::Code(_)
            | Self::Html(_)
            | Self::ThematicBreak
            | Self::Text(_)
            | Self::InlineCode(_)
            | Self::Break
            | Self::Image(_) => None,
        }
    }

    /// Concatenated plain text of this node and its descendants.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(value) | Node::InlineCode(value) => out.push_str(value),
        Node::Image(image) => out.push_str(&image.alt),
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    collect_text(child, out);
                }
            }
        }
    }
}

fn first_image_mut(nodes: &mut [Node]) -> Option<&mut Image> {
    for node in nodes {
        match node {
            Node::Image(image) => return Some(image),
            other => {
                if let Some(children) = other.children_mut()
                    && let Some(found) = first_image_mut(children)
                {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn for_each_image_mut(nodes: &mut [Node], f: &mut dyn FnMut(&mut Image)) {
    for node in nodes {
        match node {
            Node::Image(image) => f(image),
            other => {
                if let Some(children) = other.children_mut() {
                    for_each_image_mut(children, f);
                }
            }
        }
    }
}
