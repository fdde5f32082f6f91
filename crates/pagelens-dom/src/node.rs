//! Node values stored in a page document tree.

/// Tags whose subtrees never contribute visible text.
///
/// Text nodes under any of these are excluded from scanning: scripts, styles,
/// no-render fallbacks, embedded frames, canvases, and vector containers.
pub const NON_CONTENT_TAGS: [&str; 6] = ["script", "style", "noscript", "iframe", "canvas", "svg"];

/// Tags serialized without a closing tag.
const VOID_TAGS: [&str; 8] = ["area", "base", "br", "col", "hr", "img", "input", "meta"];

/// A single node in a page document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageNode {
    /// The document root
    Document,
    /// An element with a tag name and attributes
    Element(ElementData),
    /// A text node
    Text(String),
}

impl PageNode {
    /// Borrow the element data, if this is an element node.
    #[must_use]
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            PageNode::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Borrow the text content, if this is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PageNode::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Tag name and attributes of an element node.
///
/// Attribute order is preserved from the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attribute name/value pairs in document order
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Create element data with a tag and no attributes.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Whether this element's subtree is excluded from text scanning.
    #[must_use]
    pub fn is_non_content(&self) -> bool {
        NON_CONTENT_TAGS.contains(&self.tag.as_str())
    }

    /// Whether this tag is serialized without a closing tag.
    #[must_use]
    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }
}

/// One piece of a text node replacement sequence.
///
/// The concatenation of literal texts and marker texts must reproduce the
/// original node content exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPart {
    /// Plain text kept as a bare text node
    Literal(String),
    /// An interactive marker element wrapping the matched text
    Marker {
        /// The marker element (tag and attributes)
        element: ElementData,
        /// The matched text, placed as the marker's only child
        text: String,
    },
}

impl TextPart {
    /// The text this part contributes to the node's content.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            TextPart::Literal(text) | TextPart::Marker { text, .. } => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_attrs() {
        let mut el = ElementData::new("MARK").with_attr("class", "hl");
        assert_eq!(el.tag, "mark");
        assert_eq!(el.attr("class"), Some("hl"));
        assert_eq!(el.attr("style"), None);

        el.set_attr("class", "hl active");
        assert_eq!(el.attr("class"), Some("hl active"));
        assert_eq!(el.attrs.len(), 1);
    }

    #[test]
    fn test_non_content_tags() {
        assert!(ElementData::new("script").is_non_content());
        assert!(ElementData::new("svg").is_non_content());
        assert!(!ElementData::new("div").is_non_content());
        assert!(!ElementData::new("a").is_non_content());
    }

    #[test]
    fn test_text_part_text() {
        let literal = TextPart::Literal("hello ".to_string());
        let marker = TextPart::Marker {
            element: ElementData::new("mark"),
            text: "a@b.com".to_string(),
        };
        assert_eq!(literal.text(), "hello ");
        assert_eq!(marker.text(), "a@b.com");
    }
}
