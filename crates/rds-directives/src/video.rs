//! `::video` and `::video-<platform>` leaf directives.

use std::collections::BTreeMap;

use rds_tree::{Directive, Element, HastNode, PropertyValue};
use tracing::debug;

use crate::error::DirectiveError;
use crate::link::GENERIC_URL;
use crate::matcher::Family;
use crate::options::VideoOptions;
use crate::props::{attributes_to_properties, attributes_without, layer, merge_layers};
use crate::resolver::{RenderTarget, Resolver};

/// Built-in platforms and their embed templates.
pub const BUILTIN_PLATFORMS: &[(&str, &str)] = &[
    ("youtube", "https://www.youtube-nocookie.com/embed/{id}"),
    ("bilibili", "https://player.bilibili.com/player.html?bvid={id}"),
    ("vimeo", "https://player.vimeo.com/video/{id}"),
];

/// Marker for videos whose `id` is the source URL itself.
const DIRECT_SOURCE: &str = "url";

const DEFAULT_TITLE: &str = "Video Player";

const IFRAME_ALLOW: &str =
    "accelerometer; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share";

pub(crate) struct VideoResolver {
    options: VideoOptions,
    platforms: BTreeMap<String, String>,
    base_class: String,
}

impl VideoResolver {
    pub(crate) fn new(options: VideoOptions, class_prefix: &str) -> Result<Self, DirectiveError> {
        if options.platforms.contains_key(DIRECT_SOURCE) {
            return Err(DirectiveError::Config(
                "Invalid `video` directive config. The `url` is reserved.".to_owned(),
            ));
        }

        let mut platforms: BTreeMap<String, String> = BUILTIN_PLATFORMS
            .iter()
            .map(|(name, template)| ((*name).to_owned(), (*template).to_owned()))
            .collect();
        platforms.extend(options.platforms.clone());
        debug!(platforms = platforms.len(), "Video platforms registered");

        Ok(Self {
            options,
            platforms,
            base_class: format!("{class_prefix}-video"),
        })
    }

    /// Platform name (or the direct-source marker) and embed URL.
    fn source<'a>(
        &'a self,
        suffix: Option<&'a str>,
        id: &str,
    ) -> Result<(&'a str, String), DirectiveError> {
        match suffix {
            Some(platform) => {
                let template = self.platforms.get(platform).ok_or_else(|| {
                    DirectiveError::validation(
                        Family::Video,
                        "The directive failed to match a valid video platform.",
                    )
                })?;
                Ok((platform, template.replace("{id}", id)))
            }
            None if GENERIC_URL.is_match(id) => Ok((DIRECT_SOURCE, id.to_owned())),
            None => Err(DirectiveError::validation(
                Family::Video,
                "Ensure a valid URL is passed via `id` instead of `#`.",
            )),
        }
    }
}

impl Resolver for VideoResolver {
    fn family(&self) -> Family {
        Family::Video
    }

    fn resolve(
        &self,
        directive: &mut Directive,
        suffix: Option<&str>,
    ) -> Result<RenderTarget, DirectiveError> {
        let node: &Directive = directive;
        let id = node
            .attr("id")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DirectiveError::validation(Family::Video, "The `id` is missing."))?;
        let (platform, src) = self.source(suffix, id)?;
        let title = node.first_text().unwrap_or(DEFAULT_TITLE).to_owned();

        let class = layer("className", vec![self.base_class.clone()]);
        let marker = layer("data-video", platform);
        let iframe_props = self.options.iframe_props.as_ref().and_then(|s| s.resolve(node));
        let local = Some(attributes_to_properties(&attributes_without(
            &node.attributes,
            &["id"],
        )));

        if !self.options.wrapper {
            let properties = merge_layers([
                layer("src", src),
                layer("title", title),
                class,
                iframe_props,
                marker,
                local,
            ]);
            return Ok(RenderTarget::new("iframe", properties).with_children(Vec::new()));
        }

        let mut iframe = merge_layers([
            layer("src", src),
            layer("title", title),
            layer("loading", "lazy"),
            layer("allow", IFRAME_ALLOW),
            iframe_props,
            local,
        ]);
        iframe
            .entry("allowfullscreen".to_owned())
            .or_insert(PropertyValue::Bool(true));

        let wrapper = merge_layers([class, marker]);
        let children = vec![HastNode::from(Element::new("iframe").with_properties(iframe))];
        Ok(RenderTarget::new("div", wrapper).with_children(children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rds_tree::{DirectiveKind, Node, Properties};

    fn video(name: &str) -> Directive {
        Directive::new(DirectiveKind::Leaf, name)
    }

    fn resolver(options: VideoOptions) -> VideoResolver {
        VideoResolver::new(options, "rds").unwrap()
    }

    #[test]
    fn test_youtube_template() {
        let mut node = video("video-youtube").with_attr("id", "abc123");
        let target = resolver(VideoOptions::default())
            .resolve(&mut node, Some("youtube"))
            .unwrap();

        assert_eq!(target.name, "iframe");
        assert_eq!(
            target.properties["src"],
            PropertyValue::from("https://www.youtube-nocookie.com/embed/abc123")
        );
        assert_eq!(target.properties["title"], PropertyValue::from("Video Player"));
        assert_eq!(target.properties["data-video"], PropertyValue::from("youtube"));
        assert_eq!(
            target.properties["className"],
            PropertyValue::List(vec!["rds-video".to_owned()])
        );
        assert!(!target.properties.contains_key("id"));
        assert_eq!(target.children, Some(Vec::new()));
    }

    #[test]
    fn test_direct_url() {
        let mut node = video("video")
            .with_attr("id", "https://example.com/movie.mp4")
            .with_child(Node::text("Trailer"));
        let target = resolver(VideoOptions::default()).resolve(&mut node, None).unwrap();

        assert_eq!(target.properties["src"], PropertyValue::from("https://example.com/movie.mp4"));
        assert_eq!(target.properties["title"], PropertyValue::from("Trailer"));
        assert_eq!(target.properties["data-video"], PropertyValue::from("url"));
    }

    #[test]
    fn test_no_platform_and_not_a_url() {
        let mut node = video("video").with_attr("id", "not-a-url");
        let err = resolver(VideoOptions::default()).resolve(&mut node, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid `video` directive. Ensure a valid URL is passed via `id` instead of `#`."
        );
    }

    #[test]
    fn test_unknown_platform() {
        let mut node = video("video-dailymotion").with_attr("id", "x");
        let err = resolver(VideoOptions::default())
            .resolve(&mut node, Some("dailymotion"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to match a valid video platform"));
    }

    #[test]
    fn test_missing_id_checked_before_platform() {
        let mut node = video("video-dailymotion");
        let err = resolver(VideoOptions::default())
            .resolve(&mut node, Some("dailymotion"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid `video` directive. The `id` is missing.");
    }

    #[test]
    fn test_user_platform() {
        let options = VideoOptions::default().with_platform("loom", "https://www.loom.com/embed/{id}");
        let mut node = video("video-loom").with_attr("id", "42");
        let target = resolver(options).resolve(&mut node, Some("loom")).unwrap();
        assert_eq!(target.properties["src"], PropertyValue::from("https://www.loom.com/embed/42"));
    }

    #[test]
    fn test_reserved_platform_name() {
        let options = VideoOptions::default().with_platform("url", "https://x/{id}");
        let err = VideoResolver::new(options, "rds").err().unwrap();
        assert_eq!(
            err,
            DirectiveError::Config("Invalid `video` directive config. The `url` is reserved.".to_owned())
        );
    }

    #[test]
    fn test_wrapper() {
        let options = VideoOptions::default()
            .with_wrapper(true)
            .with_iframe_props(Properties::from([("width".to_owned(), PropertyValue::Int(560))]));
        let mut node = video("video-vimeo").with_attr("id", "76979871").with_attr("class", "wide");
        let target = resolver(options).resolve(&mut node, Some("vimeo")).unwrap();

        assert_eq!(target.name, "div");
        assert_eq!(target.properties["data-video"], PropertyValue::from("vimeo"));
        assert_eq!(
            target.properties["className"],
            PropertyValue::List(vec!["rds-video".to_owned()])
        );

        let children = target.children.unwrap();
        let HastNode::Element(iframe) = &children[0] else {
            panic!("expected iframe");
        };
        assert_eq!(iframe.tag_name, "iframe");
        assert_eq!(iframe.properties["src"], PropertyValue::from("https://player.vimeo.com/video/76979871"));
        assert_eq!(iframe.properties["loading"], PropertyValue::from("lazy"));
        assert_eq!(iframe.properties["allowfullscreen"], PropertyValue::Bool(true));
        assert_eq!(iframe.properties["width"], PropertyValue::Int(560));
        assert_eq!(iframe.properties["className"], PropertyValue::List(vec!["wide".to_owned()]));
    }

    #[test]
    fn test_iframe_props_class_joins_base_class() {
        let options = VideoOptions::default()
            .with_iframe_props(Properties::from([("class".to_owned(), PropertyValue::from("player"))]));
        let mut node = video("video-youtube").with_attr("id", "abc123");
        let target = resolver(options).resolve(&mut node, Some("youtube")).unwrap();

        assert_eq!(
            target.properties["className"],
            PropertyValue::List(vec!["rds-video".to_owned(), "player".to_owned()])
        );
        assert!(!target.properties.contains_key("class"));
    }
}
