use super::element::{Content, Element};
use crate::ParseError;
use scraper::{ElementRef, Html};

/// Stable handle of an element inside one [`Document`]
///
/// Ids are assigned in document (preorder) order, so comparing two ids of the
/// same document compares their position in the markup. A handle is only
/// meaningful for the document that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A parsed HTML document flattened into an element arena
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Parses raw HTML permissively
    ///
    /// Malformed markup (unclosed tags, stray attributes, missing `<html>`)
    /// is recovered by the parser. Only a parse that yields no root element
    /// at all is reported as an error.
    ///
    /// # Arguments
    ///
    /// * `raw` - The HTML content to parse
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - The element arena
    /// * `Err(ParseError)` - The parser produced no tree
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let html = Html::parse_document(raw);

        let root = html
            .tree
            .root()
            .children()
            .find_map(ElementRef::wrap)
            .ok_or(ParseError {
                errors: html.errors.len(),
            })?;

        if !html.errors.is_empty() {
            tracing::trace!("Recovered from {} HTML parse errors", html.errors.len());
        }

        let mut doc = Document {
            elements: Vec::new(),
        };
        let root_id = doc.alloc(root, None);

        // Iterative preorder walk; deeply nested markup must not exhaust the stack
        let mut stack = vec![(root_id, root.children())];
        while let Some((parent, children)) = stack.last_mut() {
            let parent = *parent;
            let next = children.next();

            match next {
                None => {
                    let last = NodeId(doc.elements.len() - 1);
                    doc.elements[parent.0].last_descendant = last;
                    stack.pop();
                }
                Some(child) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        let id = doc.alloc(element, Some(parent));
                        stack.push((id, element.children()));
                    } else if let Some(text) = child.value().as_text() {
                        doc.elements[parent.0]
                            .content
                            .push(Content::Text(text.to_string()));
                    }
                }
            }
        }

        Ok(doc)
    }

    /// Appends an element to the arena and links it under its parent
    fn alloc(&mut self, element: ElementRef<'_>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.elements.len());
        let value = element.value();

        self.elements.push(Element {
            name: value.name().to_string(),
            attrs: value
                .attrs()
                .map(|(key, val)| (key.to_string(), val.to_string()))
                .collect(),
            parent,
            children: Vec::new(),
            content: Vec::new(),
            last_descendant: id,
        });

        if let Some(parent) = parent {
            let parent = &mut self.elements[parent.0];
            parent.children.push(id);
            parent.content.push(Content::Element(id));
        }

        id
    }

    /// The document element (normally `<html>`)
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.elements[node.0]
    }

    /// All elements matching `predicate`, in document order
    pub fn select_all<P>(&self, predicate: P) -> Vec<NodeId>
    where
        P: Fn(&Element) -> bool,
    {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| predicate(element))
            .map(|(index, _)| NodeId(index))
            .collect()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.elements[node.0].parent
    }

    /// Direct element children, in document order
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.elements[node.0].children
    }

    /// First strict descendant of `node` (in document order) matching `predicate`
    pub fn first_descendant_matching<P>(&self, node: NodeId, predicate: P) -> Option<NodeId>
    where
        P: Fn(&Element) -> bool,
    {
        let last = self.elements[node.0].last_descendant.0;
        (node.0 + 1..=last)
            .find(|&index| predicate(&self.elements[index]))
            .map(NodeId)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.elements[node.0].attr(name)
    }

    /// All descendant text runs of `node`, joined by a single space
    ///
    /// Runs are emitted in document order and are not trimmed, so whitespace
    /// between tags survives as its own run.
    pub fn text(&self, node: NodeId) -> String {
        let mut runs: Vec<&str> = Vec::new();
        let mut stack: Vec<std::slice::Iter<'_, Content>> =
            vec![self.elements[node.0].content.iter()];

        while let Some(iter) = stack.last_mut() {
            match iter.next() {
                None => {
                    stack.pop();
                }
                Some(Content::Text(text)) => runs.push(text),
                Some(Content::Element(child)) => {
                    stack.push(self.elements[child.0].content.iter());
                }
            }
        }

        runs.join(" ")
    }
}
