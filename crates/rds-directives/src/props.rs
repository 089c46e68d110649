//! Property sources and the layered merge.

use std::fmt;
use std::sync::Arc;

use rds_tree::{Attributes, Directive, Properties, PropertyValue};

/// Function computing properties from the directive being resolved.
pub type ComputeProperties = dyn Fn(&Directive) -> Option<Properties> + Send + Sync;

/// A set of properties, fixed or computed per directive.
///
/// # Example
///
/// ```
/// use rds_directives::PropertySource;
/// use rds_tree::{Directive, DirectiveKind, Properties, PropertyValue};
///
/// let source = PropertySource::computed(|node| {
///     let alt = node.attr("alt")?;
///     Some(Properties::from([("title".to_owned(), PropertyValue::from(alt))]))
/// });
///
/// let node = Directive::new(DirectiveKind::Container, "image-figure").with_attr("alt", "Cat");
/// let props = source.resolve(&node).unwrap();
/// assert_eq!(props["title"], PropertyValue::from("Cat"));
/// ```
#[derive(Clone)]
pub enum PropertySource {
    Static(Properties),
    Computed(Arc<ComputeProperties>),
}

impl PropertySource {
    /// Wrap a function of the directive.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Directive) -> Option<Properties> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Concrete properties for `node`.
    #[must_use]
    pub fn resolve(&self, node: &Directive) -> Option<Properties> {
        match self {
            Self::Static(props) => Some(props.clone()),
            Self::Computed(f) => f(node),
        }
    }
}

impl From<Properties> for PropertySource {
    fn from(props: Properties) -> Self {
        Self::Static(props)
    }
}

impl fmt::Debug for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(props) => f.debug_tuple("Static").field(props).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Merge property sources and the directive's own attributes.
///
/// Sources are listed lowest precedence first; absent sources are skipped and
/// the local attributes come last. See [`merge_layers`] for the rules.
pub fn merge(
    sources: &[Option<&PropertySource>],
    node: &Directive,
    local: Option<&Attributes>,
) -> Properties {
    let resolved = sources
        .iter()
        .map(|source| source.and_then(|s| s.resolve(node)));
    merge_layers(resolved.chain(std::iter::once(local.map(attributes_to_properties))))
}

/// Merge concrete property layers, lowest precedence first.
///
/// A truthy value overrides the same key from an earlier layer; falsy values
/// never erase anything. `class` and `className` are not overridden: their
/// tokens from every layer are collected in first-seen order without
/// duplicates and emitted once as a `className` list.
///
/// # Example
///
/// ```
/// use rds_directives::merge_layers;
/// use rds_tree::{Properties, PropertyValue};
///
/// let layer = |pairs: &[(&str, PropertyValue)]| -> Option<Properties> {
///     Some(pairs.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect())
/// };
///
/// let merged = merge_layers([
///     layer(&[("class", "a b".into()), ("title", "one".into())]),
///     None,
///     layer(&[("className", vec!["b".to_owned(), "c".to_owned()].into()), ("title", "".into())]),
/// ]);
/// assert_eq!(merged["className"], PropertyValue::List(vec!["a".into(), "b".into(), "c".into()]));
/// assert_eq!(merged["title"], PropertyValue::from("one"));
/// ```
pub fn merge_layers<I>(layers: I) -> Properties
where
    I: IntoIterator<Item = Option<Properties>>,
{
    let mut merged = Properties::new();
    let mut classes: Vec<String> = Vec::new();

    for layer in layers.into_iter().flatten() {
        for (key, value) in layer {
            if !value.is_truthy() {
                continue;
            }
            if key == "class" || key == "className" {
                collect_classes(&value, &mut classes);
            } else {
                merged.insert(key, value);
            }
        }
    }

    if !classes.is_empty() {
        merged.insert("className".to_owned(), PropertyValue::List(classes));
    }
    merged
}

/// Directive attributes as string properties.
pub(crate) fn attributes_to_properties(attributes: &Attributes) -> Properties {
    attributes
        .iter()
        .map(|(key, value)| (key.clone(), PropertyValue::from(value.as_str())))
        .collect()
}

/// Directive attributes without the given keys.
pub(crate) fn attributes_without(attributes: &Attributes, consumed: &[&str]) -> Attributes {
    attributes
        .iter()
        .filter(|(key, _)| !consumed.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// A single-entry layer.
pub(crate) fn layer(key: &str, value: impl Into<PropertyValue>) -> Option<Properties> {
    Some(Properties::from([(key.to_owned(), value.into())]))
}

fn collect_classes(value: &PropertyValue, classes: &mut Vec<String>) {
    let mut add = |token: &str| {
        if !token.is_empty() && !classes.iter().any(|c| c == token) {
            classes.push(token.to_owned());
        }
    };
    match value {
        PropertyValue::String(s) => s.split_whitespace().for_each(&mut add),
        PropertyValue::List(items) => items.iter().for_each(|item| add(item.as_str())),
        PropertyValue::Bool(_) | PropertyValue::Int(_) => {}
    }
}
