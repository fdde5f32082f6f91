//! An owned, mutable page document.
//!
//! HTML is parsed with `scraper` and immediately converted into an
//! [`ego_tree::Tree`] owned by this crate. The scanner takes snapshots of node
//! handles before any mutation, so annotation never walks a live cursor into
//! the tree it is rewriting.

use crate::error::{DomError, Result};
use crate::node::{ElementData, PageNode, TextPart};
use ego_tree::{NodeId, NodeMut, NodeRef, Tree};
use scraper::Html;
use url::Url;

/// A parsed page with its source URL.
#[derive(Debug, Clone)]
pub struct PageDocument {
    tree: Tree<PageNode>,
    url: String,
}

impl PageDocument {
    /// Parse an HTML string into an owned document.
    ///
    /// Parsing is total: malformed markup is repaired by the HTML parser the
    /// same way a browser would repair it.
    #[must_use]
    pub fn parse(html: &str, url: impl Into<String>) -> Self {
        let parsed = Html::parse_document(html);
        let mut tree = Tree::new(PageNode::Document);
        convert_children(parsed.tree.root(), &mut tree.root_mut());

        let url = url.into();
        tracing::debug!(url, nodes = tree.nodes().count(), "parsed page document");
        Self { tree, url }
    }

    /// The URL this document was loaded from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Snapshot of all non-empty text nodes under the body, in document order.
    ///
    /// Nodes inside non-content subtrees (`script`, `style`, `noscript`,
    /// `iframe`, `canvas`, `svg`) are excluded. The returned sequence is
    /// materialized: later mutations do not shift or revisit entries.
    #[must_use]
    pub fn text_nodes(&self) -> Vec<NodeId> {
        let scope = self
            .find_element("body")
            .and_then(|id| self.tree.get(id))
            .unwrap_or_else(|| self.tree.root());

        scope
            .descendants()
            .filter(|node| {
                let Some(text) = node.value().as_text() else {
                    return false;
                };
                !text.is_empty() && !Self::in_non_content_subtree(node)
            })
            .map(|node| node.id())
            .collect()
    }

    /// Snapshot of every hyperlink element and its raw `href` target.
    #[must_use]
    pub fn links(&self) -> Vec<(NodeId, String)> {
        self.tree
            .root()
            .descendants()
            .filter_map(|node| {
                let element = node.value().as_element()?;
                if element.tag != "a" {
                    return None;
                }
                let href = element.attr("href")?;
                Some((node.id(), href.to_string()))
            })
            .collect()
    }

    /// Resolve a possibly relative `href` against the document URL.
    #[must_use]
    pub fn resolve_href(&self, href: &str) -> Option<String> {
        match Url::parse(&self.url) {
            Ok(base) => base.join(href).ok().map(String::from),
            // Document URL unusable as a base; absolute targets still resolve.
            Err(_) => Url::parse(href).ok().map(String::from),
        }
    }

    /// Content of a text node.
    pub fn node_text(&self, id: NodeId) -> Result<&str> {
        let node = self.tree.get(id).ok_or(DomError::StaleNode)?;
        node.value().as_text().ok_or(DomError::NotAText)
    }

    /// Tag name of an element node.
    pub fn tag(&self, id: NodeId) -> Result<&str> {
        let node = self.tree.get(id).ok_or(DomError::StaleNode)?;
        node.value()
            .as_element()
            .map(|el| el.tag.as_str())
            .ok_or(DomError::NotAnElement)
    }

    /// Attribute value of an element node.
    pub fn attr(&self, id: NodeId, name: &str) -> Result<Option<&str>> {
        let node = self.tree.get(id).ok_or(DomError::StaleNode)?;
        node.value()
            .as_element()
            .map(|el| el.attr(name))
            .ok_or(DomError::NotAnElement)
    }

    /// Set an attribute on an element node, replacing any existing value.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let mut node = self.tree.get_mut(id).ok_or(DomError::StaleNode)?;
        match node.value() {
            PageNode::Element(element) => {
                element.set_attr(name, value);
                Ok(())
            }
            _ => Err(DomError::NotAnElement),
        }
    }

    /// Replace a text node with an ordered sequence of literal text nodes and
    /// marker elements in one structural edit.
    ///
    /// The concatenation of the parts' text must reproduce the original node
    /// content exactly; the replacement is rejected otherwise, so no character
    /// can be lost or duplicated. Returns the new marker node handles in
    /// sequence order.
    pub fn replace_text_node(&mut self, id: NodeId, parts: &[TextPart]) -> Result<Vec<NodeId>> {
        let original = self.node_text(id)?.to_string();
        // A detached node can still be looked up in the arena; treat it as stale
        // rather than trying to insert siblings next to an orphan.
        let attached = self
            .tree
            .get(id)
            .ok_or(DomError::StaleNode)?
            .parent()
            .is_some();
        if !attached {
            return Err(DomError::StaleNode);
        }

        let combined: String = parts.iter().map(TextPart::text).collect();
        if combined != original {
            return Err(DomError::TextMismatch {
                expected: original.len(),
                actual: combined.len(),
            });
        }

        let mut marker_ids = Vec::new();
        let mut node = self.tree.get_mut(id).ok_or(DomError::StaleNode)?;

        for part in parts {
            match part {
                TextPart::Literal(text) => {
                    node.insert_before(PageNode::Text(text.clone()));
                }
                TextPart::Marker { element, text } => {
                    let mut marker = node.insert_before(PageNode::Element(element.clone()));
                    marker.append(PageNode::Text(text.clone()));
                    marker_ids.push(marker.id());
                }
            }
        }

        node.detach();
        Ok(marker_ids)
    }

    /// Concatenated text content of a node's subtree, in document order.
    pub fn text_content(&self, id: NodeId) -> Result<String> {
        let node = self.tree.get(id).ok_or(DomError::StaleNode)?;
        let mut out = String::new();
        for descendant in node.descendants() {
            if let Some(text) = descendant.value().as_text() {
                out.push_str(text);
            }
        }
        Ok(out)
    }

    /// Concatenated text content of the whole document.
    #[must_use]
    pub fn document_text(&self) -> String {
        self.text_content(self.tree.root().id())
            .unwrap_or_default()
    }

    /// Serialize the document back to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        serialize_children(self.tree.root(), &mut out);
        out
    }

    /// Find the first element with the given tag, in document order.
    #[must_use]
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.tree.root().descendants().find_map(|node| {
            let element = node.value().as_element()?;
            (element.tag == tag).then(|| node.id())
        })
    }

    fn in_non_content_subtree(node: &NodeRef<'_, PageNode>) -> bool {
        node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(ElementData::is_non_content)
        })
    }
}

/// Copy the children of a scraper node into our tree, dropping comments,
/// doctypes, and processing instructions.
fn convert_children(src: NodeRef<'_, scraper::Node>, dst: &mut NodeMut<'_, PageNode>) {
    for child in src.children() {
        match child.value() {
            scraper::Node::Element(el) => {
                let mut data = ElementData::new(el.name());
                for (name, value) in el.attrs() {
                    data.set_attr(name, value);
                }
                let mut node = dst.append(PageNode::Element(data));
                convert_children(child, &mut node);
            }
            scraper::Node::Text(text) => {
                dst.append(PageNode::Text(text.text.to_string()));
            }
            _ => {}
        }
    }
}

fn serialize_children(node: NodeRef<'_, PageNode>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            PageNode::Document => serialize_children(child, out),
            PageNode::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if !element.is_void() {
                    serialize_children(child, out);
                    out.push_str("</");
                    out.push_str(&element.tag);
                    out.push('>');
                }
            }
            PageNode::Text(text) => out.push_str(&escape_text(text)),
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <p>Contact a@b.com today</p>
            <script>var hidden = "x@y.com";</script>
            <div><span>or call 555-123-4567</span></div>
            <svg><text>vector@nowhere.com</text></svg>
            <a href="/profile">profile</a>
            <a href="https://facebook.com/page">fb</a>
        </body></html>
    "#;

    #[test]
    fn test_text_node_snapshot_skips_non_content() {
        let doc = PageDocument::parse(PAGE, "https://example.com/");
        let texts: Vec<String> = doc
            .text_nodes()
            .into_iter()
            .map(|id| doc.node_text(id).expect("text node").to_string())
            .collect();

        let joined = texts.join("|");
        assert!(joined.contains("Contact a@b.com today"));
        assert!(joined.contains("or call 555-123-4567"));
        assert!(!joined.contains("x@y.com"), "script text must be skipped");
        assert!(
            !joined.contains("vector@nowhere.com"),
            "svg subtree must be skipped"
        );
    }

    #[test]
    fn test_links_and_resolution() {
        let doc = PageDocument::parse(PAGE, "https://example.com/dir/page.html");
        let links = doc.links();
        assert_eq!(links.len(), 2);

        assert_eq!(
            doc.resolve_href(&links[0].1).expect("resolve relative"),
            "https://example.com/profile"
        );
        assert_eq!(
            doc.resolve_href(&links[1].1).expect("resolve absolute"),
            "https://facebook.com/page"
        );
    }

    #[test]
    fn test_replace_text_node_preserves_text() {
        let mut doc = PageDocument::parse("<p>mail a@b.com now</p>", "https://example.com/");
        let nodes = doc.text_nodes();
        assert_eq!(nodes.len(), 1);
        let original = doc.node_text(nodes[0]).expect("text node").to_string();

        let marker = ElementData::new("mark").with_attr("data-kind", "email");
        let parts = vec![
            TextPart::Literal("mail ".to_string()),
            TextPart::Marker {
                element: marker,
                text: "a@b.com".to_string(),
            },
            TextPart::Literal(" now".to_string()),
        ];

        let markers = doc
            .replace_text_node(nodes[0], &parts)
            .expect("replace text node");
        assert_eq!(markers.len(), 1);
        assert_eq!(doc.tag(markers[0]).expect("marker tag"), "mark");

        let body = doc.find_element("body").expect("body element");
        assert_eq!(doc.text_content(body).expect("body text"), original);

        let html = doc.to_html();
        assert!(html.contains(r#"<mark data-kind="email">a@b.com</mark>"#));
    }

    #[test]
    fn test_replace_text_node_rejects_text_loss() {
        let mut doc = PageDocument::parse("<p>mail a@b.com now</p>", "https://example.com/");
        let nodes = doc.text_nodes();

        let parts = vec![TextPart::Literal("mail ".to_string())];
        let err = doc
            .replace_text_node(nodes[0], &parts)
            .expect_err("must reject lossy replacement");
        assert!(matches!(err, DomError::TextMismatch { .. }));

        // The node must be untouched after a rejected replacement.
        assert_eq!(
            doc.node_text(nodes[0]).expect("text node"),
            "mail a@b.com now"
        );
    }

    #[test]
    fn test_replace_stale_handle() {
        let mut doc = PageDocument::parse("<p>one</p><p>two</p>", "https://example.com/");
        let nodes = doc.text_nodes();

        let parts = vec![TextPart::Literal("one".to_string())];
        doc.replace_text_node(nodes[0], &parts)
            .expect("first replacement");

        // Replacing the already-detached node is an error, not a panic.
        let second = doc.replace_text_node(nodes[0], &parts);
        assert!(second.is_err());
    }

    #[test]
    fn test_set_attr() {
        let mut doc = PageDocument::parse("<p id=\"x\">hi</p>", "https://example.com/");
        let p = doc.find_element("p").expect("p element");

        doc.set_attr(p, "style", "background: none").expect("set style");
        assert_eq!(
            doc.attr(p, "style").expect("element"),
            Some("background: none")
        );
        assert!(doc.to_html().contains(r#"style="background: none""#));
    }

    #[test]
    fn test_escaping() {
        let doc = PageDocument::parse("<p>a &lt; b &amp; c</p>", "https://example.com/");
        assert!(doc.to_html().contains("a &lt; b &amp; c"));
        assert!(doc.document_text().contains("a < b & c"));
    }
}
