use super::document::NodeId;

/// A single element stored in the document arena
#[derive(Debug, Clone)]
pub struct Element {
    pub(super) name: String,
    pub(super) attrs: Vec<(String, String)>,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) content: Vec<Content>,
    /// Last node of this element's subtree in preorder (itself when childless)
    pub(super) last_descendant: NodeId,
}

/// Ordered content of an element: child elements interleaved with text runs
#[derive(Debug, Clone)]
pub(super) enum Content {
    Element(NodeId),
    Text(String),
}

impl Element {
    /// Local tag name, lowercase as produced by the parser
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of an attribute, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Whitespace-separated class tokens
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }
}

/// Matches `<a>` elements carrying an `href` attribute
pub fn is_anchor_with_href(element: &Element) -> bool {
    element.name() == "a" && element.has_attr("href")
}
