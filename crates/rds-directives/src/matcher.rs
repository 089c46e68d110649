//! Directive families and their name patterns.

use std::fmt;

use rds_tree::DirectiveKind;
use regex::Regex;

use crate::error::DirectiveError;

/// A built-in directive family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Image,
    Video,
    Link,
    Badge,
}

/// How a family's names carry a sub-type after the alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    /// `alias-<sub>` only.
    Required,
    /// `alias` or `alias-<sub>`.
    Optional,
    /// `alias` only.
    None,
}

impl Family {
    /// All families in dispatch order.
    pub const ALL: [Self; 4] = [Self::Image, Self::Video, Self::Link, Self::Badge];

    /// Canonical name, reserved against the other families' aliases.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Link => "link",
            Self::Badge => "badge",
        }
    }

    /// Structural kind the family accepts.
    #[must_use]
    pub fn expected_kind(self) -> DirectiveKind {
        match self {
            Self::Image => DirectiveKind::Container,
            Self::Video => DirectiveKind::Leaf,
            Self::Link | Self::Badge => DirectiveKind::Text,
        }
    }

    /// Sub-type policy: image tag, video platform, badge type.
    #[must_use]
    pub fn suffix(self) -> Suffix {
        match self {
            Self::Image => Suffix::Required,
            Self::Video | Self::Badge => Suffix::Optional,
            Self::Link => Suffix::None,
        }
    }

    /// Indefinite article for messages.
    #[must_use]
    pub fn article(self) -> &'static str {
        match self {
            Self::Image => "an",
            Self::Video | Self::Link | Self::Badge => "a",
        }
    }

    /// Fail with a kind error unless `kind` is what the family accepts.
    pub fn check_kind(self, kind: DirectiveKind) -> Result<(), DirectiveError> {
        let expected = self.expected_kind();
        if kind == expected {
            return Ok(());
        }
        Err(DirectiveError::Kind {
            family: self,
            found: kind,
            expected,
        })
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of matching a directive name against a family pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMatch<'n> {
    /// Captured sub-type after `alias-`.
    pub suffix: Option<&'n str>,
}

/// Compiled name pattern for one family.
///
/// # Example
///
/// ```
/// use rds_directives::{Family, Pattern};
///
/// let pattern = Pattern::build(Family::Badge, &["b".to_owned()]).unwrap();
/// assert_eq!(pattern.match_name("b-new").unwrap().suffix, Some("new"));
/// assert_eq!(pattern.match_name("badge").unwrap().suffix, None);
/// assert!(pattern.match_name("badges").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    family: Family,
    aliases: Vec<String>,
    regex: Regex,
}

impl Pattern {
    /// Build the pattern for `family` from its canonical name plus `aliases`.
    ///
    /// Aliases are matched literally. An alias equal to another family's
    /// canonical name is a configuration error.
    pub fn build(family: Family, aliases: &[String]) -> Result<Self, DirectiveError> {
        let mut names: Vec<String> = vec![family.name().to_owned()];
        for alias in aliases {
            if !names.contains(alias) {
                names.push(alias.clone());
            }
        }

        for reserved in Family::ALL.iter().filter(|other| **other != family) {
            if names.iter().any(|name| name == reserved.name()) {
                return Err(DirectiveError::Config(format!(
                    "The alias '{}' is reserved and cannot be used for the '{family}' directive.",
                    reserved.name()
                )));
            }
        }

        let alternation = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let source = match family.suffix() {
            Suffix::Required => format!(r"^(?:{alternation})-([0-9A-Za-z_]+)$"),
            Suffix::Optional => format!(r"^(?:{alternation})(?:-([0-9A-Za-z_]+))?$"),
            Suffix::None => format!(r"^(?:{alternation})$"),
        };
        let regex = Regex::new(&source)
            .map_err(|e| DirectiveError::Config(format!("Invalid `{family}` alias: {e}")))?;

        Ok(Self {
            family,
            aliases: names,
            regex,
        })
    }

    /// Family this pattern selects.
    #[must_use]
    pub fn family(&self) -> Family {
        self.family
    }

    /// Canonical name followed by the user aliases.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Match a directive name, capturing the sub-type suffix if any.
    #[must_use]
    pub fn match_name<'n>(&self, name: &'n str) -> Option<NameMatch<'n>> {
        let captures = self.regex.captures(name)?;
        Some(NameMatch {
            suffix: captures.get(1).map(|m| m.as_str()),
        })
    }
}
