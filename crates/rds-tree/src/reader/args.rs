//! Directive attribute parsing.
//!
//! Parses the `{#id .class key="value"}` block of a directive.

use crate::html::is_attribute_name;
use crate::props::Attributes;

/// Attributes parsed from a directive's brace block.
///
/// Shorthands are kept apart until [`into_attributes`](Self::into_attributes)
/// folds them into the flat attribute map the tree stores.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct DirectiveArgs {
    /// `#id` shorthand (last one wins).
    pub id: Option<String>,
    /// `.class` shorthands in order.
    pub classes: Vec<String>,
    /// `key=value` pairs (last writer wins).
    pub attrs: Attributes,
}

impl DirectiveArgs {
    /// Parse the content of a `{...}` block (without braces).
    pub(crate) fn parse(attrs_str: &str) -> Self {
        let mut args = Self::default();
        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            remaining = remaining.trim_start();

            if let Some(rest) = remaining.strip_prefix('#') {
                let end = shorthand_end(rest);
                if end > 0 {
                    args.id = Some(rest[..end].to_owned());
                }
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let end = shorthand_end(rest);
                if end > 0 {
                    args.classes.push(rest[..end].to_owned());
                }
                remaining = &rest[end..];
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                args.attrs.insert(key.to_owned(), value.to_owned());
                remaining = rest;
            } else {
                // Bare word: a boolean-style attribute with an empty value.
                let end = remaining
                    .find(char::is_whitespace)
                    .unwrap_or(remaining.len());
                let word = &remaining[..end];
                if is_attribute_name(word) {
                    args.attrs.insert(word.to_owned(), String::new());
                }
                remaining = &remaining[end.max(1).min(remaining.len())..];
            }
        }

        args
    }

    /// Fold shorthands into a flat attribute map.
    ///
    /// `#id` sets `id`; `.class` shorthands are appended to any explicit
    /// `class` value.
    pub(crate) fn into_attributes(self) -> Attributes {
        let mut attrs = self.attrs;

        if let Some(id) = self.id {
            attrs.insert("id".to_owned(), id);
        }

        if !self.classes.is_empty() {
            let mut classes: Vec<String> = attrs
                .remove("class")
                .map(|explicit| explicit.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default();
            classes.extend(self.classes);
            attrs.insert("class".to_owned(), classes.join(" "));
        }

        attrs
    }
}

/// Length of an `#id` or `.class` shorthand value.
fn shorthand_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse a key-value pair: `key="value"`, `key='value'` or `key=value`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = &s[..eq_pos];

    if !is_attribute_name(key) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}
