//! Directive sugar: image, video, link and badge directives.
//!
//! This crate rewrites directive nodes of an [`rds_tree::Root`] into render
//! targets that the HTML writer emits as ordinary elements:
//!
//! - `:::image-<tag>` wraps images in a `figure` (with a generated caption)
//!   or another container tag
//! - `::video[-<platform>]{id=...}` embeds a player iframe
//! - `:link{id=...}` links GitHub accounts and repositories, npm packages
//!   and URLs, with an avatar or favicon
//! - `:badge[-<type>][text]` renders a colored badge, optionally from a preset
//!
//! # Architecture
//!
//! [`DirectiveTransformer`] walks the tree once and tests each directive name
//! against the compiled [`Pattern`] of every [`Family`]; the first match
//! selects the resolver. Names that match no family fall back to
//! [`rds_tree::h`]. Properties from options and the directive's own
//! attributes are layered with [`merge`].
//!
//! Every failure is a [`DirectiveError`] and aborts the transform.
//!
//! # Example
//!
//! ```
//! use rds_directives::{BadgeOptions, BadgePreset, DirectiveTransformer, SugarOptions};
//! use rds_tree::{html, reader};
//!
//! let options = SugarOptions::default()
//!     .with_badge(BadgeOptions::default().with_preset("new", BadgePreset::new("NEW")));
//! let transformer = DirectiveTransformer::new(options).unwrap();
//!
//! let mut root = reader::parse("Release :badge-new[]");
//! transformer.transform(&mut root).unwrap();
//! assert!(html::to_html(&root).contains(r#"data-badge="new""#));
//! ```

mod badge;
mod error;
mod image;
mod link;
mod matcher;
mod options;
mod props;
mod resolver;
mod transformer;
mod video;

pub use error::DirectiveError;
pub use image::VALID_TAGS;
pub use matcher::{Family, NameMatch, Pattern, Suffix};
pub use options::{
    BadgeOptions, BadgePreset, DEFAULT_BADGE_COLOR, DEFAULT_FAVICON, ImageOptions, ImgPropsScope,
    LinkIcon, LinkOptions, SugarOptions, VideoOptions,
};
pub use props::{ComputeProperties, PropertySource, merge, merge_layers};
pub use resolver::RenderTarget;
pub use transformer::{DirectiveTransformer, Resolution, TransformReport};
pub use video::BUILTIN_PLATFORMS;
