//! HTML writer.
//!
//! Serializes a [`Root`] to HTML. Nodes carrying a render target in their
//! [`Data`] are emitted as `h_name` with `h_properties`, and `h_children`
//! replaces their own children when present. Directives without a render
//! target fall back to a plain `div` (blocks) or `span` (text).

use std::fmt::Write;

use crate::ast::{Data, DirectiveKind, Node, Root};
use crate::hast::{Element, HastNode};
use crate::props::{Properties, PropertyValue};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Serialize a document to HTML.
///
/// # Example
///
/// ```
/// use rds_tree::{Node, Root, html};
///
/// let root = Root { children: vec![Node::paragraph(vec![Node::text("a < b")])] };
/// assert_eq!(html::to_html(&root), "<p>a &lt; b</p>\n");
/// ```
#[must_use]
pub fn to_html(root: &Root) -> String {
    let mut out = String::with_capacity(1024);
    write_nodes(&root.children, &mut out);
    out
}

/// Serialize a single replacement element to HTML.
#[must_use]
pub fn element_to_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

/// Escape special HTML characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        write_node(node, out);
    }
}

fn is_block(node: &Node) -> bool {
    match node {
        Node::Paragraph(_)
        | Node::Heading(_)
        | Node::Blockquote(_)
        | Node::List(_)
        | Node::ListItem(_)
        | Node::Code(_)
        | Node::ThematicBreak => true,
        Node::Directive(d) => d.kind != DirectiveKind::Text,
        _ => false,
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Paragraph(p) => {
            write_target(out, "p", Properties::new(), &p.data, &p.children, false);
        }
        Node::Heading(h) => {
            let tag = format!("h{}", h.depth);
            write_open(out, &tag, &Properties::new());
            write_nodes(&h.children, out);
            write_close(out, &tag);
        }
        Node::Blockquote(children) => {
            out.push_str("<blockquote>\n");
            write_nodes(children, out);
            out.push_str("</blockquote>");
        }
        Node::List(list) => {
            let (tag, props) = match list.start {
                Some(1) => ("ol", Properties::new()),
                Some(start) => (
                    "ol",
                    Properties::from([("start".to_owned(), PropertyValue::Int(
                        i64::try_from(start).unwrap_or(i64::MAX),
                    ))]),
                ),
                None => ("ul", Properties::new()),
            };
            write_open(out, tag, &props);
            out.push('\n');
            write_nodes(&list.children, out);
            write_close(out, tag);
        }
        Node::ListItem(children) => {
            out.push_str("<li>");
            write_nodes(children, out);
            out.push_str("</li>");
        }
        Node::Code(code) => {
            out.push_str("<pre><code");
            if let Some(lang) = &code.lang {
                write!(out, r#" class="language-{}""#, escape_html(lang)).unwrap();
            }
            write!(out, ">{}</code></pre>", escape_html(&code.value)).unwrap();
        }
        Node::Html(raw) => out.push_str(raw),
        Node::ThematicBreak => out.push_str("<hr>"),
        Node::Text(value) => out.push_str(&escape_html(value)),
        Node::Emphasis(children) => write_simple(out, "em", children),
        Node::Strong(children) => write_simple(out, "strong", children),
        Node::Delete(children) => write_simple(out, "del", children),
        Node::InlineCode(value) => {
            write!(out, "<code>{}</code>", escape_html(value)).unwrap();
        }
        Node::Break => out.push_str("<br>\n"),
        Node::Link(link) => {
            let mut props = Properties::new();
            props.insert("href".to_owned(), PropertyValue::from(link.url.as_str()));
            if let Some(title) = &link.title {
                props.insert("title".to_owned(), PropertyValue::from(title.as_str()));
            }
            write_open(out, "a", &props);
            write_nodes(&link.children, out);
            write_close(out, "a");
        }
        Node::Image(image) => {
            let mut props = Properties::new();
            props.insert("src".to_owned(), PropertyValue::from(image.url.as_str()));
            props.insert("alt".to_owned(), PropertyValue::from(image.alt.as_str()));
            if let Some(title) = &image.title {
                props.insert("title".to_owned(), PropertyValue::from(title.as_str()));
            }
            write_target(out, "img", props, &image.data, &[], false);
        }
        Node::Directive(directive) => {
            let default_tag = if directive.kind == DirectiveKind::Text {
                "span"
            } else {
                "div"
            };
            let blocks = directive.kind == DirectiveKind::Container;
            write_target(
                out,
                default_tag,
                Properties::new(),
                &directive.data,
                &directive.children,
                blocks,
            );
        }
    }

    if is_block(node) {
        out.push('\n');
    }
}

/// Write a node that may carry a render target.
fn write_target(
    out: &mut String,
    default_tag: &str,
    mut props: Properties,
    data: &Data,
    children: &[Node],
    blocks: bool,
) {
    let tag = data.h_name.as_deref().unwrap_or(default_tag);
    if let Some(h_properties) = &data.h_properties {
        props.extend(h_properties.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    write_open(out, tag, &props);
    if is_void(tag) {
        return;
    }

    if let Some(h_children) = &data.h_children {
        for child in h_children {
            write_hast(child, out);
        }
    } else {
        if blocks && !children.is_empty() {
            out.push('\n');
        }
        write_nodes(children, out);
    }
    write_close(out, tag);
}

fn write_simple(out: &mut String, tag: &str, children: &[Node]) {
    write_open(out, tag, &Properties::new());
    write_nodes(children, out);
    write_close(out, tag);
}

fn write_hast(node: &HastNode, out: &mut String) {
    match node {
        HastNode::Text(value) => out.push_str(&escape_html(value)),
        HastNode::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    write_open(out, &element.tag_name, &element.properties);
    if is_void(&element.tag_name) {
        return;
    }
    for child in &element.children {
        write_hast(child, out);
    }
    write_close(out, &element.tag_name);
}

fn write_open(out: &mut String, tag: &str, props: &Properties) {
    out.push('<');
    out.push_str(tag);
    write_attributes(out, props);
    out.push('>');
}

fn write_close(out: &mut String, tag: &str) {
    write!(out, "</{tag}>").unwrap();
}

fn write_attributes(out: &mut String, props: &Properties) {
    for (key, value) in props {
        let name = if key == "className" { "class" } else { key };
        if !is_attribute_name(name) {
            continue;
        }
        match value {
            PropertyValue::Bool(true) => write!(out, " {name}").unwrap(),
            PropertyValue::Bool(false) => {}
            PropertyValue::List(items) if items.is_empty() => {}
            other => write!(out, r#" {name}="{}""#, escape_html(&other.to_string())).unwrap(),
        }
    }
}

/// Whether `name` can be written as an HTML attribute name.
pub(crate) fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}
