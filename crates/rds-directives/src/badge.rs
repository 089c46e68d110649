//! `:badge` and `:badge-<type>` text directives.

use rds_tree::{Directive, HastNode, PropertyValue};

use crate::error::DirectiveError;
use crate::matcher::Family;
use crate::options::{BadgeOptions, BadgePreset};
use crate::props::{attributes_to_properties, attributes_without, layer, merge_layers};
use crate::resolver::{RenderTarget, Resolver};

pub(crate) struct BadgeResolver {
    options: BadgeOptions,
    base_class: String,
}

impl BadgeResolver {
    pub(crate) fn new(options: BadgeOptions, class_prefix: &str) -> Self {
        Self {
            options,
            base_class: format!("{class_prefix}-badge"),
        }
    }

    fn preset<'a>(&'a self, badge_type: &str) -> Result<&'a BadgePreset, DirectiveError> {
        self.options.presets.get(badge_type).ok_or_else(|| {
            DirectiveError::validation(
                Family::Badge,
                "The directive failed to match a valid badge type. \
                 Please check the `presets` option in the `badge` config.",
            )
        })
    }
}

impl Resolver for BadgeResolver {
    fn family(&self) -> Family {
        Family::Badge
    }

    fn resolve(
        &self,
        directive: &mut Directive,
        suffix: Option<&str>,
    ) -> Result<RenderTarget, DirectiveError> {
        let typed = suffix.map(|t| self.preset(t).map(|p| (t, p))).transpose()?;

        let text = match typed {
            Some((_, preset)) => Some(preset.text.as_str()),
            None => directive.first_text(),
        }
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            DirectiveError::validation(
                Family::Badge,
                "The text is missing. Specify it in the `[]` of `:badge[]{}` \
                 or in the `text` field of the `presets` option in the `badge` config.",
            )
        })?
        .to_owned();

        let color = directive
            .attr("color")
            .filter(|c| !c.is_empty())
            .or_else(|| typed.and_then(|(_, p)| p.color.as_deref()))
            .unwrap_or(self.options.default_color.as_str());
        let (light, dark) = split_colors(color)?;

        let node: &Directive = directive;
        let local = attributes_without(&node.attributes, &["color"]);
        let mut properties = merge_layers([
            layer("className", vec![self.base_class.clone()]),
            self.options.span_props.as_ref().and_then(|s| s.resolve(node)),
            typed.and_then(|(t, _)| layer("data-badge", t)),
            typed.and_then(|(_, p)| p.props.as_ref()).and_then(|s| s.resolve(node)),
            Some(attributes_to_properties(&local)),
        ]);

        let color_style = format!("--badge-color-light:{light}; --badge-color-dark:{dark}");
        let style = match properties.get("style") {
            Some(existing) => format!("{color_style}; {existing}"),
            None => color_style,
        };
        properties.insert("style".to_owned(), PropertyValue::from(style));

        Ok(RenderTarget::new("span", properties).with_children(vec![HastNode::Text(text)]))
    }
}

/// Split `light|dark` (or a single color used for both).
fn split_colors(color: &str) -> Result<(String, String), DirectiveError> {
    let parts: Vec<&str> = color.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [both] => Ok(((*both).to_owned(), (*both).to_owned())),
        [light, dark] => Ok(((*light).to_owned(), (*dark).to_owned())),
        _ => Err(DirectiveError::validation(
            Family::Badge,
            "The `color` expected one or two color values split by '|'.",
        )),
    }
}
