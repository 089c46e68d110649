//! HTML-oriented element nodes and the generic element constructor.

use crate::props::{Attributes, Properties, PropertyValue};

/// Attributes that are rendered without a value when set.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "default",
    "defer",
    "disabled",
    "hidden",
    "inert",
    "loop",
    "muted",
    "nomodule",
    "novalidate",
    "open",
    "playsinline",
    "readonly",
    "required",
    "reversed",
    "selected",
];

/// A node in replacement content.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", content = "node", rename_all = "camelCase")
)]
pub enum HastNode {
    Element(Element),
    Text(String),
}

/// An HTML element with properties and children.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Element {
    pub tag_name: String,
    pub properties: Properties,
    pub children: Vec<HastNode>,
}

impl Element {
    /// Create an element with no properties and no children.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    /// Replace the properties.
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: HastNode) -> Self {
        self.children.push(child);
        self
    }
}

impl From<Element> for HastNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Build an element from a tag name and raw attributes.
///
/// Used for directives that no family handles: the directive name becomes the
/// tag and its attributes become properties, without validation. The tag is
/// lowercased, `class` is split into a `className` list and boolean attributes
/// written as `hidden=""` or `hidden=hidden` become `true`.
///
/// # Example
///
/// ```
/// use rds_tree::{Attributes, PropertyValue, h};
///
/// let mut attributes = Attributes::new();
/// attributes.insert("class".to_owned(), "note wide".to_owned());
/// attributes.insert("hidden".to_owned(), String::new());
///
/// let element = h("Aside", &attributes);
/// assert_eq!(element.tag_name, "aside");
/// assert_eq!(
///     element.properties.get("className"),
///     Some(&PropertyValue::List(vec!["note".to_owned(), "wide".to_owned()]))
/// );
/// assert_eq!(element.properties.get("hidden"), Some(&PropertyValue::Bool(true)));
/// ```
#[must_use]
pub fn h(name: &str, attributes: &Attributes) -> Element {
    let mut properties = Properties::new();

    for (key, value) in attributes {
        let key = key.to_ascii_lowercase();
        if key == "class" || key == "classname" {
            let classes: Vec<String> = value.split_whitespace().map(str::to_owned).collect();
            if !classes.is_empty() {
                properties.insert("className".to_owned(), PropertyValue::List(classes));
            }
        } else if BOOLEAN_ATTRIBUTES.contains(&key.as_str())
            && (value.is_empty() || value.eq_ignore_ascii_case(&key))
        {
            properties.insert(key, PropertyValue::Bool(true));
        } else {
            properties.insert(key, PropertyValue::String(value.clone()));
        }
    }

    Element::new(name.to_ascii_lowercase()).with_properties(properties)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_h_plain_attributes() {
        let element = h("details", &attrs(&[("id", "faq"), ("title", "More")]));
        assert_eq!(element.tag_name, "details");
        assert_eq!(element.properties.get("id"), Some(&PropertyValue::from("faq")));
        assert_eq!(element.properties.get("title"), Some(&PropertyValue::from("More")));
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_h_boolean_attribute_with_value_stays_string() {
        let element = h("details", &attrs(&[("open", "later")]));
        assert_eq!(element.properties.get("open"), Some(&PropertyValue::from("later")));
    }

    #[test]
    fn test_h_boolean_attribute_named() {
        let element = h("details", &attrs(&[("open", "open")]));
        assert_eq!(element.properties.get("open"), Some(&PropertyValue::Bool(true)));
    }

    #[test]
    fn test_h_empty_class_dropped() {
        let element = h("div", &attrs(&[("class", "  ")]));
        assert!(element.properties.is_empty());
    }
}
