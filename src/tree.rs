//! Arena-backed document tree.
//!
//! Parsed HTML is held as a flat arena of nodes indexed by stable
//! [`NodeId`] handles; parent and child links are indices, not owning
//! references, so back-references cannot form ownership cycles. Parsing is
//! delegated to the `scraper` backend (html5ever); this module only walks
//! the parse result once to build the arena, then owns all traversal and
//! mutation.
//!
//! Two independent trees may exist per source document: the working tree
//! that the cleaner mutates, and a snapshot taken via [`DocumentTree::deep_clone`]
//! before any destructive pass. They never share node storage.

use ego_tree::NodeRef as ParsedRef;
use scraper::{Html, Node as ParsedNode};

use crate::error::{Error, Result};
use crate::patterns::WHITESPACE;

/// Opaque handle to a node inside a [`DocumentTree`] arena.
///
/// Handles are only meaningful for the tree that produced them; a deep
/// clone produces a fresh arena with its own handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node payload: an element with tag and ordered attributes, or a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element node.
    Element {
        /// Lowercase tag name.
        tag: String,
        /// Attributes in document order.
        attrs: Vec<(String, String)>,
    },
    /// A text node.
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "source", "track", "wbr",
];

/// In-memory tree representation of a parsed HTML document.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl DocumentTree {
    /// Parse raw HTML into a tree rooted at the `<html>` element.
    ///
    /// Empty or whitespace-only input, or a parse yielding no element
    /// content at all, is an [`Error::Parse`]; anything else goes through
    /// the error-recovering html5ever parse and always yields a tree.
    pub fn parse(html: &str) -> Result<Self> {
        if html.trim().is_empty() {
            return Err(Error::Parse("empty input".to_string()));
        }

        let parsed = Html::parse_document(html);
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };

        // Find the <html> element under the parse root; html5ever always
        // synthesizes one for non-empty input.
        let html_ref = parsed
            .tree
            .root()
            .children()
            .find(|child| matches!(child.value(), ParsedNode::Element(el) if el.name() == "html"))
            .ok_or_else(|| Error::Parse("no html element in parse result".to_string()))?;

        let root = tree.convert_element(&html_ref, None);
        tree.root = root;
        Ok(tree)
    }

    /// Convert one parsed element and its subtree into arena nodes.
    fn convert_element(
        &mut self,
        source: &ParsedRef<'_, ParsedNode>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let kind = match source.value() {
            ParsedNode::Element(el) => NodeKind::Element {
                tag: el.name().to_ascii_lowercase(),
                attrs: el
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            },
            ParsedNode::Text(text) => NodeKind::Text(text.to_string()),
            // Comments, doctypes and processing instructions are dropped.
            _ => NodeKind::Text(String::new()),
        };

        let id = self.push(kind, parent);
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }

        // Iterative descent with an explicit stack of (source, arena parent)
        // pairs; children are pushed in reverse so they pop in document order.
        let mut stack: Vec<(ParsedRef<'_, ParsedNode>, NodeId)> = source
            .children()
            .rev()
            .filter(|c| Self::is_convertible(c.value()))
            .map(|c| (c, id))
            .collect();

        while let Some((node, parent_id)) = stack.pop() {
            let kind = match node.value() {
                ParsedNode::Element(el) => NodeKind::Element {
                    tag: el.name().to_ascii_lowercase(),
                    attrs: el
                        .attrs()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect(),
                },
                ParsedNode::Text(text) => NodeKind::Text(text.to_string()),
                _ => continue,
            };
            let child_id = self.push(kind, Some(parent_id));
            self.nodes[parent_id.0].children.push(child_id);

            for grandchild in node.children().rev() {
                if Self::is_convertible(grandchild.value()) {
                    stack.push((grandchild, child_id));
                }
            }
        }

        id
    }

    fn is_convertible(node: &ParsedNode) -> bool {
        matches!(node, ParsedNode::Element(_) | ParsedNode::Text(_))
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Root handle (the `<html>` element for parsed documents).
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena slots (detached nodes included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty (never true for parsed documents).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node payload.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Tag name, or `None` for text nodes.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element { .. })
    }

    /// Attribute value by name, or `None` for text nodes / missing attrs.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(attr_name, _)| attr_name == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Parent handle; `None` for the root and for detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Child handles in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// All handles of the subtree rooted at `id`, pre-order (document
    /// order), starting with `id` itself.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Element handles of the subtree with the given tag, document order.
    #[must_use]
    pub fn find_all(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.subtree(id)
            .into_iter()
            .filter(|n| self.tag(*n) == Some(tag))
            .collect()
    }

    /// Detach the subtree rooted at `id` from its parent.
    ///
    /// Detaching the root or an already-detached node is a no-op. Arena
    /// slots are not reclaimed; the subtree simply becomes unreachable.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != id);
    }

    /// Replace `id` with its own children, splicing them into the parent at
    /// the same position. No-op for the root and for text nodes.
    pub fn unwrap_node(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        let Some(position) = self.nodes[parent.0].children.iter().position(|c| *c == id)
        else {
            return;
        };
        self.nodes[parent.0]
            .children
            .splice(position..=position, children);
        self.nodes[id.0].parent = None;
    }

    /// Replace the node's payload with a plain text run, dropping its
    /// children. Used when inline markup (anchors) is flattened to text.
    pub fn replace_with_text(&mut self, id: NodeId, text: String) {
        for child in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.nodes[id.0].kind = NodeKind::Text(text);
    }

    /// Whitespace-normalized text of the subtree rooted at `id`.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        let mut raw = String::new();
        for node in self.subtree(id) {
            if let NodeKind::Text(text) = &self.nodes[node.0].kind {
                raw.push_str(text);
                raw.push(' ');
            }
        }
        WHITESPACE.replace_all(raw.trim(), " ").into_owned()
    }

    /// Whitespace-normalized text of the direct text children only.
    #[must_use]
    pub fn own_text(&self, id: NodeId) -> String {
        let mut raw = String::new();
        for child in &self.nodes[id.0].children {
            if let NodeKind::Text(text) = &self.nodes[child.0].kind {
                raw.push_str(text);
                raw.push(' ');
            }
        }
        WHITESPACE.replace_all(raw.trim(), " ").into_owned()
    }

    /// Deep-copy the subtree rooted at `id` into a fresh arena.
    ///
    /// The copy shares no storage with this tree; handles from one are
    /// meaningless in the other.
    #[must_use]
    pub fn clone_subtree(&self, id: NodeId) -> DocumentTree {
        let mut copy = DocumentTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        // (source id, destination parent)
        let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(id, None)];
        while let Some((source, dst_parent)) = stack.pop() {
            let dst = copy.push(self.nodes[source.0].kind.clone(), dst_parent);
            if let Some(parent) = dst_parent {
                copy.nodes[parent.0].children.push(dst);
            }
            for child in self.nodes[source.0].children.iter().rev() {
                stack.push((*child, Some(dst)));
            }
        }
        copy
    }

    /// Deep-copy the whole document.
    #[must_use]
    pub fn deep_clone(&self) -> DocumentTree {
        self.clone_subtree(self.root)
    }

    /// Serialize the subtree rooted at `id` back to HTML, attributes
    /// included. Text is entity-escaped.
    #[must_use]
    pub fn to_html(&self, id: NodeId) -> String {
        enum Step {
            Open(NodeId),
            Close(usize),
        }

        let mut out = String::new();
        let mut stack = vec![Step::Open(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(node) => match &self.nodes[node.0].kind {
                    NodeKind::Text(text) => out.push_str(&escape_text(text)),
                    NodeKind::Element { tag, attrs } => {
                        out.push('<');
                        out.push_str(tag);
                        for (name, value) in attrs {
                            out.push(' ');
                            out.push_str(name);
                            out.push_str("=\"");
                            out.push_str(&escape_attr(value));
                            out.push('"');
                        }
                        out.push('>');
                        if !VOID_TAGS.contains(&tag.as_str()) {
                            stack.push(Step::Close(node.0));
                            for child in self.nodes[node.0].children.iter().rev() {
                                stack.push(Step::Open(*child));
                            }
                        }
                    }
                },
                Step::Close(index) => {
                    if let NodeKind::Element { tag, .. } = &self.nodes[index].kind {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                }
            }
        }
        out
    }
}

/// Escape text content for HTML serialization.
#[must_use]
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
