//! Error types for directive resolution.

use rds_tree::DirectiveKind;

use crate::matcher::Family;

/// Error raised while building the transformer or resolving a directive.
///
/// Every variant is fatal: the first error aborts the whole transform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// Invalid options, detected when the transformer is built.
    #[error("{0}")]
    Config(String),
    /// Directive matched a family by name but uses the wrong fencing.
    #[error(
        "Unexpected {found} directive. Use {} for {} `{family}` {expected} directive.",
        .expected.fence(),
        .family.article()
    )]
    Kind {
        family: Family,
        found: DirectiveKind,
        expected: DirectiveKind,
    },
    /// Family-specific precondition failed.
    #[error("Invalid `{family}` directive. {message}")]
    Validation { family: Family, message: String },
}

impl DirectiveError {
    pub(crate) fn validation(family: Family, message: impl Into<String>) -> Self {
        Self::Validation {
            family,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_message() {
        let err = DirectiveError::Kind {
            family: Family::Badge,
            found: DirectiveKind::Leaf,
            expected: DirectiveKind::Text,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected leaf directive. Use single colon (`:`) for a `badge` text directive."
        );
    }

    #[test]
    fn test_kind_message_uses_an_for_image() {
        let err = DirectiveError::Kind {
            family: Family::Image,
            found: DirectiveKind::Text,
            expected: DirectiveKind::Container,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected text directive. Use three colons (`:::`) for an `image` container directive."
        );
    }

    #[test]
    fn test_validation_message() {
        let err = DirectiveError::validation(Family::Link, "The `id` is missing.");
        assert_eq!(err.to_string(), "Invalid `link` directive. The `id` is missing.");
    }
}
