//! Resolver trait and the render target it produces.

use rds_tree::{Data, Directive, HastNode, Properties};

use crate::error::DirectiveError;
use crate::matcher::Family;

/// Element name, properties and (optionally) replacement children computed for
/// one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub name: String,
    pub properties: Properties,
    /// Replacement children; `None` keeps the directive's own children.
    pub children: Option<Vec<HastNode>>,
}

impl RenderTarget {
    #[must_use]
    pub fn new(name: impl Into<String>, properties: Properties) -> Self {
        Self {
            name: name.into(),
            properties,
            children: None,
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<HastNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Write every render target field at once.
    pub fn apply(self, data: &mut Data) {
        data.h_name = Some(self.name);
        data.h_properties = Some(self.properties);
        data.h_children = self.children;
    }
}

/// Resolver for one directive family.
///
/// Called only after the directive's name matched the family pattern and its
/// kind was checked. `suffix` is the captured sub-type, if any. Resolvers may
/// rewrite the directive's children but leave its render target to the caller.
pub(crate) trait Resolver: Send + Sync {
    fn family(&self) -> Family;

    fn resolve(
        &self,
        directive: &mut Directive,
        suffix: Option<&str>,
    ) -> Result<RenderTarget, DirectiveError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rds_tree::PropertyValue;

    #[test]
    fn test_apply_writes_all_fields() {
        let mut data = Data::default();
        let props = Properties::from([("id".to_owned(), PropertyValue::from("x"))]);
        RenderTarget::new("span", props.clone())
            .with_children(vec![HastNode::Text("t".to_owned())])
            .apply(&mut data);

        assert_eq!(data.h_name.as_deref(), Some("span"));
        assert_eq!(data.h_properties, Some(props));
        assert_eq!(data.h_children, Some(vec![HastNode::Text("t".to_owned())]));
    }
}
