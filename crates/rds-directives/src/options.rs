//! Immutable per-family options.
//!
//! Built once from [`rds_config::Config`] (or by hand) and handed to
//! [`DirectiveTransformer::new`](crate::DirectiveTransformer::new). Property
//! options are [`PropertySource`]s, so the `with_*` builders also accept
//! computed sources.

use std::collections::BTreeMap;

use rds_config::Config;
pub use rds_config::{ImgPropsScope, LinkIcon};
use rds_tree::Properties;

use crate::props::PropertySource;

/// Default favicon service template.
pub const DEFAULT_FAVICON: &str = "https://www.google.com/s2/favicons?domain={domain}&sz=128";

/// Default badge color.
pub const DEFAULT_BADGE_COLOR: &str = "rgb(8, 109, 221)";

/// Options for all directive families.
#[derive(Debug, Clone)]
pub struct SugarOptions {
    /// Prefix for base classes (`<prefix>-badge`, `<prefix>-link`, `<prefix>-video`).
    pub class_prefix: String,
    pub image: ImageOptions,
    pub video: VideoOptions,
    pub link: LinkOptions,
    pub badge: BadgeOptions,
}

impl Default for SugarOptions {
    fn default() -> Self {
        Self {
            class_prefix: "rds".to_owned(),
            image: ImageOptions::default(),
            video: VideoOptions::default(),
            link: LinkOptions::default(),
            badge: BadgeOptions::default(),
        }
    }
}

impl SugarOptions {
    /// Set the class prefix.
    #[must_use]
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Replace the image options.
    #[must_use]
    pub fn with_image(mut self, image: ImageOptions) -> Self {
        self.image = image;
        self
    }

    /// Replace the video options.
    #[must_use]
    pub fn with_video(mut self, video: VideoOptions) -> Self {
        self.video = video;
        self
    }

    /// Replace the link options.
    #[must_use]
    pub fn with_link(mut self, link: LinkOptions) -> Self {
        self.link = link;
        self
    }

    /// Replace the badge options.
    #[must_use]
    pub fn with_badge(mut self, badge: BadgeOptions) -> Self {
        self.badge = badge;
        self
    }
}

/// `:::image-<tag>` options.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub alias: Vec<String>,
    pub img_props: Option<PropertySource>,
    pub img_props_scope: ImgPropsScope,
    pub figure_props: Option<PropertySource>,
    pub figcaption_props: Option<PropertySource>,
    pub element_props: Option<PropertySource>,
    pub strip_paragraph: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            alias: Vec::new(),
            img_props: None,
            img_props_scope: ImgPropsScope::First,
            figure_props: None,
            figcaption_props: None,
            element_props: None,
            strip_paragraph: true,
        }
    }
}

impl ImageOptions {
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias.push(alias.into());
        self
    }

    /// Properties merged into images.
    #[must_use]
    pub fn with_img_props(mut self, source: impl Into<PropertySource>) -> Self {
        self.img_props = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_img_props_scope(mut self, scope: ImgPropsScope) -> Self {
        self.img_props_scope = scope;
        self
    }

    #[must_use]
    pub fn with_figure_props(mut self, source: impl Into<PropertySource>) -> Self {
        self.figure_props = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_figcaption_props(mut self, source: impl Into<PropertySource>) -> Self {
        self.figcaption_props = Some(source.into());
        self
    }

    /// Properties of wrappers other than `figure`.
    #[must_use]
    pub fn with_element_props(mut self, source: impl Into<PropertySource>) -> Self {
        self.element_props = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_strip_paragraph(mut self, strip: bool) -> Self {
        self.strip_paragraph = strip;
        self
    }
}

/// `::video[-<platform>]` options.
#[derive(Debug, Clone, Default)]
pub struct VideoOptions {
    pub alias: Vec<String>,
    pub iframe_props: Option<PropertySource>,
    /// User platforms, merged over the built-in ones.
    pub platforms: BTreeMap<String, String>,
    pub wrapper: bool,
}

impl VideoOptions {
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias.push(alias.into());
        self
    }

    #[must_use]
    pub fn with_iframe_props(mut self, source: impl Into<PropertySource>) -> Self {
        self.iframe_props = Some(source.into());
        self
    }

    /// Add a platform with an `{id}` placeholder in its template.
    #[must_use]
    pub fn with_platform(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.platforms.insert(name.into(), template.into());
        self
    }

    #[must_use]
    pub fn with_wrapper(mut self, wrapper: bool) -> Self {
        self.wrapper = wrapper;
        self
    }
}

/// `:link` options.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    pub alias: Vec<String>,
    pub a_props: Option<PropertySource>,
    pub img_props: Option<PropertySource>,
    /// Favicon template with a `{domain}` placeholder.
    pub favicon: String,
    pub icon: LinkIcon,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            alias: Vec::new(),
            a_props: None,
            img_props: None,
            favicon: DEFAULT_FAVICON.to_owned(),
            icon: LinkIcon::Background,
        }
    }
}

impl LinkOptions {
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias.push(alias.into());
        self
    }

    #[must_use]
    pub fn with_a_props(mut self, source: impl Into<PropertySource>) -> Self {
        self.a_props = Some(source.into());
        self
    }

    /// Properties of the icon element.
    #[must_use]
    pub fn with_img_props(mut self, source: impl Into<PropertySource>) -> Self {
        self.img_props = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_favicon(mut self, template: impl Into<String>) -> Self {
        self.favicon = template.into();
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: LinkIcon) -> Self {
        self.icon = icon;
        self
    }
}

/// `:badge[-<type>]` options.
#[derive(Debug, Clone)]
pub struct BadgeOptions {
    pub alias: Vec<String>,
    pub span_props: Option<PropertySource>,
    pub presets: BTreeMap<String, BadgePreset>,
    pub default_color: String,
}

impl Default for BadgeOptions {
    fn default() -> Self {
        Self {
            alias: Vec::new(),
            span_props: None,
            presets: BTreeMap::new(),
            default_color: DEFAULT_BADGE_COLOR.to_owned(),
        }
    }
}

impl BadgeOptions {
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias.push(alias.into());
        self
    }

    #[must_use]
    pub fn with_span_props(mut self, source: impl Into<PropertySource>) -> Self {
        self.span_props = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_preset(mut self, name: impl Into<String>, preset: BadgePreset) -> Self {
        self.presets.insert(name.into(), preset);
        self
    }

    #[must_use]
    pub fn with_default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = color.into();
        self
    }
}

/// A badge type selected with `:badge-<type>`.
#[derive(Debug, Clone)]
pub struct BadgePreset {
    pub text: String,
    /// One color, or `light|dark`.
    pub color: Option<String>,
    pub props: Option<PropertySource>,
}

impl BadgePreset {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            props: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_props(mut self, source: impl Into<PropertySource>) -> Self {
        self.props = Some(source.into());
        self
    }
}

fn static_source(props: Option<&Properties>) -> Option<PropertySource> {
    props.cloned().map(PropertySource::Static)
}

impl From<&Config> for SugarOptions {
    fn from(config: &Config) -> Self {
        let aliases = |alias: Option<&rds_config::Aliases>| {
            alias.map(rds_config::Aliases::to_vec).unwrap_or_default()
        };

        Self {
            class_prefix: config.class_prefix.clone(),
            image: ImageOptions {
                alias: aliases(config.image.alias.as_ref()),
                img_props: static_source(config.image.img_props.as_ref()),
                img_props_scope: config.image.img_props_scope,
                figure_props: static_source(config.image.figure_props.as_ref()),
                figcaption_props: static_source(config.image.figcaption_props.as_ref()),
                element_props: static_source(config.image.element_props.as_ref()),
                strip_paragraph: config.image.strip_paragraph,
            },
            video: VideoOptions {
                alias: aliases(config.video.alias.as_ref()),
                iframe_props: static_source(config.video.iframe_props.as_ref()),
                platforms: config.video.platforms.clone(),
                wrapper: config.video.wrapper,
            },
            link: LinkOptions {
                alias: aliases(config.link.alias.as_ref()),
                a_props: static_source(config.link.a_props.as_ref()),
                img_props: static_source(config.link.img_props.as_ref()),
                favicon: config
                    .link
                    .favicon
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FAVICON.to_owned()),
                icon: config.link.icon,
            },
            badge: BadgeOptions {
                alias: aliases(config.badge.alias.as_ref()),
                span_props: static_source(config.badge.span_props.as_ref()),
                presets: config
                    .badge
                    .presets
                    .iter()
                    .map(|(name, preset)| {
                        let preset = BadgePreset {
                            text: preset.text.clone(),
                            color: preset.color.clone(),
                            props: static_source(preset.props.as_ref()),
                        };
                        (name.clone(), preset)
                    })
                    .collect(),
                default_color: config.badge.default_color.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rds_tree::PropertyValue;

    #[test]
    fn test_defaults_match_config_defaults() {
        let from_config = SugarOptions::from(&Config::default());
        let defaults = SugarOptions::default();
        assert_eq!(from_config.class_prefix, defaults.class_prefix);
        assert_eq!(from_config.link.favicon, defaults.link.favicon);
        assert_eq!(from_config.badge.default_color, defaults.badge.default_color);
        assert_eq!(from_config.image.strip_paragraph, defaults.image.strip_paragraph);
        assert_eq!(from_config.video.wrapper, defaults.video.wrapper);
    }

    #[test]
    fn test_from_config() {
        let config = Config::from_toml_str(
            r#"
class_prefix = "docs"

[badge]
alias = "b"

[badge.presets.v]
text = "VIDEO"
props = { title = "Video" }

[video.platforms]
loom = "https://www.loom.com/embed/{id}"
"#,
        )
        .unwrap();
        let options = SugarOptions::from(&config);

        assert_eq!(options.class_prefix, "docs");
        assert_eq!(options.badge.alias, vec!["b".to_owned()]);
        let preset = &options.badge.presets["v"];
        assert_eq!(preset.text, "VIDEO");
        let node = rds_tree::Directive::new(rds_tree::DirectiveKind::Text, "badge-v");
        let props = preset.props.as_ref().and_then(|p| p.resolve(&node)).unwrap();
        assert_eq!(props["title"], PropertyValue::from("Video"));
        assert_eq!(
            options.video.platforms.get("loom").map(String::as_str),
            Some("https://www.loom.com/embed/{id}")
        );
    }

    #[test]
    fn test_builders() {
        let options = SugarOptions::default()
            .with_class_prefix("x")
            .with_badge(
                BadgeOptions::default()
                    .with_alias("b")
                    .with_preset("new", BadgePreset::new("NEW").with_color("red")),
            )
            .with_link(LinkOptions::default().with_icon(LinkIcon::Img));
        assert_eq!(options.class_prefix, "x");
        assert_eq!(options.badge.presets["new"].color.as_deref(), Some("red"));
        assert_eq!(options.link.icon, LinkIcon::Img);
    }
}
