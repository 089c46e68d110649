//! Element properties and directive attributes.

use std::collections::BTreeMap;
use std::fmt;

/// Raw directive attributes from the `{...}` block, keyed by attribute name.
pub type Attributes = BTreeMap<String, String>;

/// Element properties keyed by HTML attribute name.
///
/// The class list lives under the `className` key as a [`PropertyValue::List`].
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single property value.
///
/// Truthiness follows the rules used when merging property sources:
/// `false`, `0` and the empty string are falsy, lists are always truthy.
///
/// # Example
///
/// ```
/// use rds_tree::PropertyValue;
///
/// assert!(PropertyValue::from("lazy").is_truthy());
/// assert!(!PropertyValue::from("").is_truthy());
/// assert!(PropertyValue::List(Vec::new()).is_truthy());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum PropertyValue {
    /// Boolean attribute (`allowfullscreen`, `hidden`).
    Bool(bool),
    /// Numeric attribute (`width`, `tabindex`).
    Int(i64),
    /// Plain string attribute.
    String(String),
    /// Space-separated token list (`className`).
    List(Vec<String>),
}

impl PropertyValue {
    /// Whether the value counts as set when layering property sources.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::String(s) => !s.is_empty(),
            Self::List(_) => true,
        }
    }

    /// Borrow the string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(PropertyValue::Bool(true).is_truthy());
        assert!(!PropertyValue::Bool(false).is_truthy());
        assert!(PropertyValue::Int(560).is_truthy());
        assert!(!PropertyValue::Int(0).is_truthy());
        assert!(!PropertyValue::from("").is_truthy());
        assert!(PropertyValue::List(vec![]).is_truthy());
    }

    #[test]
    fn test_display_joins_lists() {
        let value = PropertyValue::List(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(value.to_string(), "a b");
    }

    #[test]
    fn test_as_str() {
        assert_eq!(PropertyValue::from("x").as_str(), Some("x"));
        assert_eq!(PropertyValue::Bool(true).as_str(), None);
    }
}
