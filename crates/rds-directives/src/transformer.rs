//! Tree walk that routes every directive node to its family resolver.

use rds_tree::{Directive, Node, Root, h};

use crate::badge::BadgeResolver;
use crate::error::DirectiveError;
use crate::image::ImageResolver;
use crate::link::LinkResolver;
use crate::matcher::{Family, Pattern};
use crate::options::SugarOptions;
use crate::resolver::Resolver;
use crate::video::VideoResolver;

/// How one directive node was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Handled by a family resolver.
    Family(Family),
    /// No family matched; rendered by the generic element constructor.
    Fallback,
}

/// Number of directive nodes resolved per path in one transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub image: usize,
    pub video: usize,
    pub link: usize,
    pub badge: usize,
    pub fallback: usize,
}

impl TransformReport {
    fn record(&mut self, resolution: Resolution) {
        let counter = match resolution {
            Resolution::Family(Family::Image) => &mut self.image,
            Resolution::Family(Family::Video) => &mut self.video,
            Resolution::Family(Family::Link) => &mut self.link,
            Resolution::Family(Family::Badge) => &mut self.badge,
            Resolution::Fallback => &mut self.fallback,
        };
        *counter += 1;
    }

    /// Directive nodes visited.
    #[must_use]
    pub fn total(&self) -> usize {
        self.image + self.video + self.link + self.badge + self.fallback
    }
}

/// Rewrites directive nodes into render targets.
///
/// Built once from [`SugarOptions`]; patterns are compiled and options
/// checked up front, so building is where configuration errors surface.
/// Families are tried in the order image, video, link, badge.
///
/// # Example
///
/// ```
/// use rds_directives::{DirectiveTransformer, SugarOptions};
/// use rds_tree::{html, reader};
///
/// let transformer = DirectiveTransformer::new(SugarOptions::default()).unwrap();
/// let mut root = reader::parse("Status :badge[NEW]{color=green}");
/// let report = transformer.transform(&mut root).unwrap();
///
/// assert_eq!(report.badge, 1);
/// assert!(html::to_html(&root).contains(r#"<span class="rds-badge""#));
/// ```
pub struct DirectiveTransformer {
    families: Vec<(Pattern, Box<dyn Resolver>)>,
}

impl DirectiveTransformer {
    /// Compile family patterns and resolvers.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::Config`] if an alias is reserved by another
    /// family or a video platform is named `url`.
    pub fn new(options: SugarOptions) -> Result<Self, DirectiveError> {
        let SugarOptions {
            class_prefix,
            image,
            video,
            link,
            badge,
        } = options;

        let mut families: Vec<(Pattern, Box<dyn Resolver>)> = Vec::with_capacity(4);
        families.push((
            Pattern::build(Family::Image, &image.alias)?,
            Box::new(ImageResolver::new(image)),
        ));
        families.push((
            Pattern::build(Family::Video, &video.alias)?,
            Box::new(VideoResolver::new(video, &class_prefix)?),
        ));
        families.push((
            Pattern::build(Family::Link, &link.alias)?,
            Box::new(LinkResolver::new(link, &class_prefix)),
        ));
        families.push((
            Pattern::build(Family::Badge, &badge.alias)?,
            Box::new(BadgeResolver::new(badge, &class_prefix)),
        ));

        for (pattern, resolver) in &families {
            debug_assert_eq!(pattern.family(), resolver.family());
            tracing::debug!(
                family = %resolver.family(),
                aliases = ?pattern.aliases(),
                "Registered directive family"
            );
        }

        Ok(Self { families })
    }

    /// Resolve every directive node in `root`.
    ///
    /// # Errors
    ///
    /// Returns the first [`DirectiveError`] raised by a resolver; the tree may
    /// be partially transformed at that point.
    pub fn transform(&self, root: &mut Root) -> Result<TransformReport, DirectiveError> {
        self.transform_with(root, |_, _| {})
    }

    /// Like [`transform`](Self::transform), calling `observer` after each
    /// directive node is resolved.
    ///
    /// # Errors
    ///
    /// Returns the first [`DirectiveError`] raised by a resolver.
    pub fn transform_with<F>(
        &self,
        root: &mut Root,
        mut observer: F,
    ) -> Result<TransformReport, DirectiveError>
    where
        F: FnMut(&Directive, Resolution),
    {
        let mut report = TransformReport::default();
        self.visit(&mut root.children, &mut observer, &mut report)?;
        tracing::debug!(
            directives = report.total(),
            fallback = report.fallback,
            "Transformed directives"
        );
        Ok(report)
    }

    /// Resolve a single directive node and write its render target.
    ///
    /// Descendants are left untouched.
    ///
    /// # Errors
    ///
    /// Returns a kind error if the node matched a family by name but uses the
    /// wrong fencing, or the family's validation error.
    pub fn resolve(&self, directive: &mut Directive) -> Result<Resolution, DirectiveError> {
        for (pattern, resolver) in &self.families {
            let Some(matched) = pattern.match_name(&directive.name) else {
                continue;
            };
            let family = pattern.family();
            family.check_kind(directive.kind)?;

            let suffix = matched.suffix.map(str::to_owned);
            let target = resolver.resolve(directive, suffix.as_deref())?;
            tracing::debug!(name = %directive.name, %family, tag = %target.name, "Resolved directive");
            target.apply(&mut directive.data);
            return Ok(Resolution::Family(family));
        }

        let element = h(&directive.name, &directive.attributes);
        tracing::trace!(name = %directive.name, "No directive family matched, using generic element");
        directive.data.h_name = Some(element.tag_name);
        directive.data.h_properties = Some(element.properties);
        Ok(Resolution::Fallback)
    }

    fn visit<F>(
        &self,
        nodes: &mut [Node],
        observer: &mut F,
        report: &mut TransformReport,
    ) -> Result<(), DirectiveError>
    where
        F: FnMut(&Directive, Resolution),
    {
        for node in nodes {
            if let Node::Directive(directive) = node {
                let resolution = self.resolve(directive)?;
                report.record(resolution);
                observer(directive, resolution);
            }
            if let Some(children) = node.children_mut() {
                self.visit(children, observer, report)?;
            }
        }
        Ok(())
    }
}
