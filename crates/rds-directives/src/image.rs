//! `:::image-<tag>` container directives.

use rds_tree::{Directive, Image, Node, Paragraph, Properties};

use crate::error::DirectiveError;
use crate::matcher::Family;
use crate::options::{ImageOptions, ImgPropsScope};
use crate::props::{merge, merge_layers};
use crate::resolver::{RenderTarget, Resolver};

/// Tags an image container may render as.
pub const VALID_TAGS: &[&str] = &[
    "figure", "a", "div", "span", "section", "article", "main", "aside", "header", "footer", "nav",
    "fieldset", "form",
];

pub(crate) struct ImageResolver {
    options: ImageOptions,
}

impl ImageResolver {
    pub(crate) fn new(options: ImageOptions) -> Self {
        Self { options }
    }

    /// Merge `img_props` into the selected images; false if there is no image.
    fn inject_img_props(&self, directive: &mut Directive) -> bool {
        let props = self
            .options
            .img_props
            .as_ref()
            .and_then(|source| source.resolve(directive));
        let mut apply = |image: &mut Image| {
            if let Some(props) = &props {
                let existing = image.data.h_properties.take();
                image.data.h_properties = Some(merge_layers([existing, Some(props.clone())]));
            }
        };

        match self.options.img_props_scope {
            ImgPropsScope::First => directive.first_image_mut().map(&mut apply).is_some(),
            ImgPropsScope::All => {
                let mut found = false;
                directive.for_each_image_mut(&mut |image| {
                    apply(image);
                    found = true;
                });
                found
            }
        }
    }

    fn figure(&self, directive: &mut Directive) -> Result<RenderTarget, DirectiveError> {
        let node: &Directive = directive;
        let figure_props = merge(&[self.options.figure_props.as_ref()], node, None);
        let figcaption_props = merge(
            &[self.options.figcaption_props.as_ref()],
            node,
            Some(&node.attributes),
        );

        let caption = take_caption(&mut directive.children)?;
        let mut figcaption = Paragraph::new(caption);
        figcaption.data.h_name = Some("figcaption".to_owned());
        figcaption.data.h_properties = Some(figcaption_props);
        directive.children.push(Node::Paragraph(figcaption));

        Ok(RenderTarget::new("figure", figure_props))
    }
}

impl Resolver for ImageResolver {
    fn family(&self) -> Family {
        Family::Image
    }

    fn resolve(
        &self,
        directive: &mut Directive,
        suffix: Option<&str>,
    ) -> Result<RenderTarget, DirectiveError> {
        let tag = suffix
            .filter(|tag| VALID_TAGS.contains(tag))
            .ok_or_else(|| {
                DirectiveError::validation(
                    Family::Image,
                    "The directive failed to match a valid HTML tag.",
                )
            })?;

        if !self.inject_img_props(directive) {
            return Err(DirectiveError::validation(Family::Image, "The image is missing."));
        }

        if self.options.strip_paragraph {
            unwrap_image_paragraphs(&mut directive.children);
        }

        if tag == "figure" {
            return self.figure(directive);
        }

        let properties: Properties = merge(
            &[self.options.element_props.as_ref()],
            directive,
            Some(&directive.attributes),
        );
        Ok(RenderTarget::new(tag, properties))
    }
}

/// Replace paragraphs holding nothing but one image with the image itself.
fn unwrap_image_paragraphs(children: &mut [Node]) {
    for child in children {
        let Node::Paragraph(paragraph) = child else {
            continue;
        };
        if paragraph.data.directive_label {
            continue;
        }
        if let [Node::Image(_)] = paragraph.children.as_slice()
            && let Some(image) = paragraph.children.pop()
        {
            *child = image;
        }
    }
}

/// Caption content: the container label (consumed), else the leading image's alt.
///
/// An empty label is dropped. The leading image is the first child, or the
/// first child of a leading paragraph that was not unwrapped.
fn take_caption(children: &mut Vec<Node>) -> Result<Vec<Node>, DirectiveError> {
    children.retain(|child| {
        !matches!(child, Node::Paragraph(p) if p.data.directive_label && p.children.is_empty())
    });
    let has_label = matches!(
        children.first(),
        Some(Node::Paragraph(label)) if label.data.directive_label && !label.children.is_empty()
    );
    if has_label && let Node::Paragraph(label) = children.remove(0) {
        return Ok(label.children);
    }

    let leading_image = match children.first() {
        Some(Node::Image(image)) => Some(image),
        Some(Node::Paragraph(paragraph)) => match paragraph.children.first() {
            Some(Node::Image(image)) => Some(image),
            _ => None,
        },
        _ => None,
    };
    match leading_image {
        Some(image) if !image.alt.is_empty() => Ok(vec![Node::text(image.alt.as_str())]),
        _ => Err(DirectiveError::validation(
            Family::Image,
            "The figcaption text is missing. Specify it in the `[]` of `:::image-figure[]{}` or `![]()`.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rds_tree::{DirectiveKind, PropertyValue};

    fn image(alt: &str) -> Node {
        Node::Image(Image::new("cat.png", alt))
    }

    fn image_paragraph(alt: &str) -> Node {
        Node::paragraph(vec![image(alt)])
    }

    fn label(text: &str) -> Node {
        let mut paragraph = Paragraph::new(vec![Node::text(text)]);
        paragraph.data.directive_label = true;
        Node::Paragraph(paragraph)
    }

    fn container(name: &str, children: Vec<Node>) -> Directive {
        let mut directive = Directive::new(DirectiveKind::Container, name);
        directive.children = children;
        directive
    }

    fn resolve(
        options: ImageOptions,
        directive: &mut Directive,
        tag: &str,
    ) -> Result<RenderTarget, DirectiveError> {
        ImageResolver::new(options).resolve(directive, Some(tag))
    }

    fn caption(directive: &Directive) -> &Paragraph {
        match directive.children.last() {
            Some(Node::Paragraph(p)) if p.data.h_name.as_deref() == Some("figcaption") => p,
            other => panic!("expected figcaption, got {other:?}"),
        }
    }

    #[test]
    fn test_figure_caption_from_alt() {
        let mut node = container("image-figure", vec![image_paragraph("alt-text")]);
        let target = resolve(ImageOptions::default(), &mut node, "figure").unwrap();

        assert_eq!(target.name, "figure");
        assert_eq!(target.children, None);
        assert_eq!(node.children.len(), 2);
        assert!(matches!(node.children[0], Node::Image(_)));
        assert_eq!(caption(&node).children, vec![Node::text("alt-text")]);
    }

    #[test]
    fn test_figure_caption_from_label() {
        let mut node = container(
            "image-figure",
            vec![label("A cat"), image_paragraph("ignored")],
        )
        .with_attr("class", "caption");
        resolve(ImageOptions::default(), &mut node, "figure").unwrap();

        assert_eq!(node.children.len(), 2);
        let caption = caption(&node);
        assert_eq!(caption.children, vec![Node::text("A cat")]);
        assert_eq!(
            caption.data.h_properties.as_ref().unwrap()["className"],
            PropertyValue::List(vec!["caption".to_owned()])
        );
    }

    #[test]
    fn test_figure_caption_missing() {
        let mut node = container("image-figure", vec![image_paragraph("")]);
        let err = resolve(ImageOptions::default(), &mut node, "figure").unwrap_err();
        assert!(err.to_string().contains("The figcaption text is missing."));
    }

    #[test]
    fn test_caption_from_paragraph_when_not_unwrapped() {
        let options = ImageOptions::default().with_strip_paragraph(false);
        let mut node = container("image-figure", vec![image_paragraph("kept")]);
        resolve(options, &mut node, "figure").unwrap();

        assert!(matches!(node.children[0], Node::Paragraph(_)));
        assert_eq!(caption(&node).children, vec![Node::text("kept")]);
    }

    #[test]
    fn test_image_missing() {
        let mut node = container("image-div", vec![Node::paragraph(vec![Node::text("no image")])]);
        let err = resolve(ImageOptions::default(), &mut node, "div").unwrap_err();
        assert_eq!(err.to_string(), "Invalid `image` directive. The image is missing.");
    }

    #[test]
    fn test_invalid_tag() {
        let mut node = container("image-table", vec![image_paragraph("x")]);
        let err = resolve(ImageOptions::default(), &mut node, "table").unwrap_err();
        assert!(err.to_string().contains("failed to match a valid HTML tag"));
    }

    #[test]
    fn test_other_tag_properties() {
        let options = ImageOptions::default().with_element_props(Properties::from([
            ("class".to_owned(), PropertyValue::from("gallery")),
            ("role".to_owned(), PropertyValue::from("group")),
        ]));
        let mut node = container("image-a", vec![image_paragraph("x")]).with_attr("href", "/cats");
        let target = resolve(options, &mut node, "a").unwrap();

        assert_eq!(target.name, "a");
        assert_eq!(target.properties["href"], PropertyValue::from("/cats"));
        assert_eq!(target.properties["role"], PropertyValue::from("group"));
        assert_eq!(
            target.properties["className"],
            PropertyValue::List(vec!["gallery".to_owned()])
        );
    }

    #[test]
    fn test_mixed_paragraph_not_unwrapped() {
        let mixed = Node::paragraph(vec![image("x"), Node::text(" trailing")]);
        let mut node = container("image-div", vec![mixed.clone()]);
        resolve(ImageOptions::default(), &mut node, "div").unwrap();
        assert_eq!(node.children, vec![mixed]);
    }

    #[test]
    fn test_img_props_scope() {
        let props = Properties::from([("loading".to_owned(), PropertyValue::from("lazy"))]);
        let loading = |node: &Node| match node {
            Node::Image(image) => image.data.h_properties.as_ref().map(|p| p["loading"].clone()),
            _ => None,
        };

        let mut first = container("image-div", vec![image_paragraph("a"), image_paragraph("b")]);
        resolve(ImageOptions::default().with_img_props(props.clone()), &mut first, "div").unwrap();
        assert_eq!(loading(&first.children[0]), Some(PropertyValue::from("lazy")));
        assert_eq!(loading(&first.children[1]), None);

        let mut all = container("image-div", vec![image_paragraph("a"), image_paragraph("b")]);
        let options = ImageOptions::default()
            .with_img_props(props)
            .with_img_props_scope(ImgPropsScope::All);
        resolve(options, &mut all, "div").unwrap();
        assert_eq!(loading(&all.children[0]), Some(PropertyValue::from("lazy")));
        assert_eq!(loading(&all.children[1]), Some(PropertyValue::from("lazy")));
    }

    #[test]
    fn test_caption_from_paragraph_with_several_images() {
        let mut node = container(
            "image-figure",
            vec![Node::paragraph(vec![image("first"), image("second")])],
        );
        resolve(ImageOptions::default(), &mut node, "figure").unwrap();

        assert!(matches!(node.children[0], Node::Paragraph(_)));
        assert_eq!(caption(&node).children, vec![Node::text("first")]);
    }

    #[test]
    fn test_caption_from_image_followed_by_text() {
        let mut node = container(
            "image-figure",
            vec![Node::paragraph(vec![image("cat"), Node::text(" a cat")])],
        );
        resolve(ImageOptions::default(), &mut node, "figure").unwrap();
        assert_eq!(caption(&node).children, vec![Node::text("cat")]);
    }

    #[test]
    fn test_figure_props_are_normalized() {
        let options = ImageOptions::default().with_figure_props(Properties::from([
            ("class".to_owned(), PropertyValue::from("a b")),
            ("hidden".to_owned(), PropertyValue::Bool(false)),
        ]));
        let mut node = container("image-figure", vec![image_paragraph("x")]);
        let target = resolve(options, &mut node, "figure").unwrap();

        assert_eq!(
            target.properties,
            Properties::from([(
                "className".to_owned(),
                PropertyValue::List(vec!["a".to_owned(), "b".to_owned()])
            )])
        );
    }

    #[test]
    fn test_empty_label_falls_back_to_alt() {
        let mut empty = Paragraph::new(Vec::new());
        empty.data.directive_label = true;
        let mut node = container("image-figure", vec![Node::Paragraph(empty), image_paragraph("alt")]);
        resolve(ImageOptions::default(), &mut node, "figure").unwrap();
        assert_eq!(node.children.len(), 2);
        assert_eq!(caption(&node).children, vec![Node::text("alt")]);
    }
}
