//! Directive syntax recognition.
//!
//! Recognizes `:::name[label]{attrs}` container fences, `::name[label]{attrs}`
//! leaf lines and `:name[label]{attrs}` text directives inside inline text.

use super::args::DirectiveArgs;
use crate::props::Attributes;

/// A directive recognized in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedDirective {
    pub name: String,
    /// Raw `[...]` content, empty when absent.
    pub label: String,
    pub attributes: Attributes,
}

/// Directive name and delimiters following the colons.
struct Tail {
    directive: ParsedDirective,
    /// Bytes consumed after the colons.
    consumed: usize,
    /// Whether a `[...]` or `{...}` part was present.
    delimited: bool,
}

/// Parse a container opening line: `:::name[label]{attrs}`.
///
/// Returns the colon count (three or more) and the directive.
pub(crate) fn parse_container_open(line: &str) -> Option<(usize, ParsedDirective)> {
    let trimmed = strip_indent(line)?;
    let colons = colon_run(trimmed);
    if colons < 3 {
        return None;
    }
    let tail = parse_tail(&trimmed[colons..])?;
    if !trimmed[colons + tail.consumed..].trim().is_empty() {
        return None;
    }
    Some((colons, tail.directive))
}

/// Parse a container closing line: three or more colons and nothing else.
pub(crate) fn parse_container_close(line: &str) -> Option<usize> {
    let trimmed = strip_indent(line)?;
    let colons = colon_run(trimmed);
    (colons >= 3 && trimmed[colons..].trim().is_empty()).then_some(colons)
}

/// Parse a leaf directive occupying a whole line: `::name[label]{attrs}`.
pub(crate) fn parse_leaf_line(line: &str) -> Option<ParsedDirective> {
    let trimmed = strip_indent(line)?;
    if colon_run(trimmed) != 2 {
        return None;
    }
    let tail = parse_tail(&trimmed[2..])?;
    if !trimmed[2 + tail.consumed..].trim().is_empty() {
        return None;
    }
    Some(tail.directive)
}

/// Find the first text directive in a run of inline text.
///
/// Returns the byte range of the whole directive and the directive. A text
/// directive needs a `[label]` or `{attrs}` part, and its colon may not follow
/// an alphanumeric character or another colon. Colons that fail to start a
/// directive are skipped and scanning continues.
pub(crate) fn find_text_directive(text: &str) -> Option<(usize, usize, ParsedDirective)> {
    for (start, _) in text.match_indices(':') {
        let prev = text[..start].chars().next_back();
        if prev.is_some_and(|c| c.is_alphanumeric() || c == ':') {
            continue;
        }

        let rest = &text[start + 1..];
        if rest.starts_with(':') {
            continue;
        }

        if let Some(tail) = parse_tail(rest)
            && tail.delimited
        {
            return Some((start, start + 1 + tail.consumed, tail.directive));
        }
    }
    None
}

/// Check if a name is a valid directive name.
///
/// Names start with an ASCII letter and continue with alphanumerics, hyphens
/// and underscores.
fn is_valid_directive_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse `name[label]{attrs}` directly after the colons.
fn parse_tail(s: &str) -> Option<Tail> {
    let name_end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len());
    let name = &s[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }

    let mut pos = name_end;
    let mut delimited = false;

    let mut label = "";
    if s[pos..].starts_with('[') {
        let (content, consumed) = parse_delimited(&s[pos..], '[', ']')?;
        label = content;
        pos += consumed;
        delimited = true;
    }

    let mut attributes = Attributes::new();
    if s[pos..].starts_with('{') {
        let (content, consumed) = parse_delimited(&s[pos..], '{', '}')?;
        attributes = DirectiveArgs::parse(content).into_attributes();
        pos += consumed;
        delimited = true;
    }

    Some(Tail {
        directive: ParsedDirective {
            name: name.to_owned(),
            label: label.to_owned(),
            attributes,
        },
        consumed: pos,
        delimited,
    })
}

/// Content between balanced delimiters at the start of `s`.
///
/// Returns (content, `bytes_consumed`), or `None` when unbalanced.
fn parse_delimited(s: &str, open: char, close: char) -> Option<(&str, usize)> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some((&s[1..i], i + 1));
            }
        }
    }
    None
}

/// Strip up to three spaces of indentation.
fn strip_indent(line: &str) -> Option<&str> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    (indent <= 3).then(|| &line[indent..])
}

fn colon_run(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b':').count()
}
