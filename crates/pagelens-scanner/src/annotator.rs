//! DOM annotation: rewriting a text node into text and highlight markers.

use crate::error::Result;
use pagelens_core::TextMatch;
use pagelens_dom::{ElementData, NodeId, PageDocument, TextPart};

/// Class carried by every highlight marker element.
pub const HIGHLIGHT_CLASS: &str = "pagelens-highlight";

/// Visual style applied to active highlights.
pub const HIGHLIGHT_STYLE: &str =
    "background-color: rgba(255, 255, 0, 0.3); border-bottom: 2px solid #ff6b6b; cursor: pointer;";

/// Style applied when a session is stopped: markers stay, emphasis goes.
pub const NEUTRAL_STYLE: &str = "background-color: transparent; border-bottom: none;";

/// Style applied to a highlight targeted by a jump request.
pub const PULSE_STYLE: &str = "background-color: #ff6b6b; color: white;";

/// A resolved, deduplicated match together with its position in its kind's
/// accepted order.
#[derive(Debug, Clone)]
pub struct AcceptedMatch {
    /// The accepted match
    pub inner: TextMatch,
    /// Index the highlight will occupy within its kind
    pub kind_index: usize,
}

/// Replace a text node with literal text interleaved with highlight markers.
///
/// `accepted` must be ascending by start offset and pairwise non-overlapping
/// (the resolver's output). The node is rewritten in a single structural edit,
/// and every character of the original content appears exactly once across the
/// replacement sequence; the document layer rejects anything else. Returns the
/// marker handles in acceptance order.
pub fn annotate(
    doc: &mut PageDocument,
    node: NodeId,
    accepted: &[AcceptedMatch],
) -> Result<Vec<NodeId>> {
    if accepted.is_empty() {
        return Ok(Vec::new());
    }

    let text = doc.node_text(node)?.to_string();
    let mut parts = Vec::with_capacity(accepted.len() * 2 + 1);
    let mut cursor = 0;

    for mark in accepted {
        if mark.inner.start > cursor {
            parts.push(TextPart::Literal(text[cursor..mark.inner.start].to_string()));
        }
        parts.push(TextPart::Marker {
            element: marker_element(mark),
            text: mark.inner.value.clone(),
        });
        cursor = mark.inner.end;
    }

    if cursor < text.len() {
        parts.push(TextPart::Literal(text[cursor..].to_string()));
    }

    Ok(doc.replace_text_node(node, &parts)?)
}

fn marker_element(mark: &AcceptedMatch) -> ElementData {
    ElementData::new("mark")
        .with_attr("class", HIGHLIGHT_CLASS)
        .with_attr("data-kind", mark.inner.kind.as_str())
        .with_attr("data-value", mark.inner.value.clone())
        .with_attr("data-index", mark.kind_index.to_string())
        .with_attr("style", HIGHLIGHT_STYLE)
}
