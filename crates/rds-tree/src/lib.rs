//! Document tree for the directive sugar pipeline.
//!
//! This crate provides the data shared by every stage of the pipeline:
//!
//! - [`Root`] and [`Node`]: a markdown syntax tree in which directives are
//!   first-class [`Directive`] nodes (container `:::`, leaf `::`, text `:`)
//! - [`Data`]: the render target side-channel a directive handler fills in
//!   (element name, [`Properties`], replacement children)
//! - [`Element`] / [`HastNode`]: HTML-oriented nodes used for replacement children
//! - [`h`]: the generic element constructor for directives no family claims
//!
//! Around the tree sit the two collaborators of the directive core:
//!
//! - [`reader`]: markdown text to [`Root`], recognizing directive syntax
//! - [`html`]: [`Root`] to HTML text, honoring render targets
//!
//! # Example
//!
//! ```
//! use rds_tree::{html, reader};
//!
//! let root = reader::parse("Hello *world*");
//! assert_eq!(html::to_html(&root), "<p>Hello <em>world</em></p>\n");
//! ```

mod ast;
mod hast;
pub mod html;
mod props;
pub mod reader;

pub use ast::{Code, Data, Directive, DirectiveKind, Heading, Image, Link, List, Node, Paragraph, Root};
pub use hast::{Element, HastNode, h};
pub use html::escape_html;
pub use props::{Attributes, Properties, PropertyValue};
