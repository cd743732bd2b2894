//! DOM tree implementation for the larch HTML parser.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/). The tree builder in
//! `larch-html` only ever talks to the tree through the create/insert/remove
//! primitives defined here.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Nodes are
//! never freed: a removed node simply loses its parent and stays addressable.

mod attributes;
pub mod dump;
mod error;
mod namespace;
pub mod serialize;
mod table;

pub use attributes::{Attribute, AttributeList};
pub use error::DomError;
pub use namespace::{Namespace, QuirksMode};

use std::collections::HashSet;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    DocumentType(DoctypeData),
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    ///
    /// Used for template contents and for the result of fragment parsing.
    DocumentFragment,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
///
/// "Doctypes have an associated name, public ID, and system ID."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctypeData {
    /// "name"
    pub name: String,
    /// "public ID"
    pub public_id: String,
    /// "system ID"
    pub system_id: String,
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name, ..."
///
/// The parser never creates prefixed elements, so the prefix is not stored.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's namespace"
    pub namespace: Namespace,
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributeList,
    /// [§ 4.12.3 The template element](https://html.spec.whatwg.org/multipage/scripting.html#template-contents)
    ///
    /// "Each template element has an associated `DocumentFragment` object that
    /// is its template contents."
    pub template_contents: Option<NodeId>,
}

impl ElementData {
    /// Whether this is an element in the given namespace with the given local name.
    #[must_use]
    pub fn is(&self, namespace: Namespace, tag_name: &str) -> bool {
        self.namespace == namespace && self.tag_name == tag_name
    }

    /// Whether this is an HTML element with the given local name.
    #[must_use]
    pub fn is_html(&self, tag_name: &str) -> bool {
        self.is(Namespace::Html, tag_name)
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Returns the set of class names from the class attribute.
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attrs
            .get("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,

    /// [§ 4.5](https://dom.spec.whatwg.org/#concept-document-mode)
    quirks_mode: QuirksMode,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
            quirks_mode: QuirksMode::NoQuirks,
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes ever allocated in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The document's mode.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// Set the document's mode.
    pub const fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// [§ 4.9 create an element](https://dom.spec.whatwg.org/#concept-create-element)
    ///
    /// Allocates a detached element. HTML `template` elements get their
    /// template contents fragment allocated alongside.
    pub fn create_element(
        &mut self,
        namespace: Namespace,
        tag_name: &str,
        attrs: AttributeList,
    ) -> NodeId {
        let template_contents = (namespace == Namespace::Html && tag_name == "template")
            .then(|| self.alloc(NodeType::DocumentFragment));
        self.alloc(NodeType::Element(ElementData {
            namespace,
            tag_name: tag_name.to_string(),
            attrs,
            template_contents,
        }))
    }

    /// Create a detached HTML element without attributes.
    pub fn create_html_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element(Namespace::Html, tag_name, AttributeList::new())
    }

    /// Create a detached Text node.
    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(data.into()))
    }

    /// Create a detached Comment node.
    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Comment(data.into()))
    }

    /// Create a detached `DocumentType` node.
    pub fn create_doctype(&mut self, doctype: DoctypeData) -> NodeId {
        self.alloc(NodeType::DocumentType(doctype))
    }

    /// Create a detached, empty `DocumentFragment`.
    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeType::DocumentFragment)
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// The child is first removed from its current parent, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownNode`] if either id is not in this tree, and
    /// [`DomError::HierarchyRequest`] if `child` is an inclusive ancestor of
    /// `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_exists(parent)?;
        self.check_exists(child)?;
        if child == parent || self.is_descendant_of(parent, child) {
            return Err(DomError::HierarchyRequest {
                parent,
                node: child,
            });
        }
        self.detach(child);
        let index = self.nodes[parent.0].children.len();
        self.attach_at(parent, child, index);
        Ok(())
    }

    /// [§ 4.2.3 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Insert `child` into `parent` immediately before `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAChild`] if `reference` is not a child of
    /// `parent`, and [`DomError::HierarchyRequest`] if `child` is an
    /// inclusive ancestor of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.check_exists(parent)?;
        self.check_exists(child)?;
        if child == parent || self.is_descendant_of(parent, child) {
            return Err(DomError::HierarchyRequest {
                parent,
                node: child,
            });
        }
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        self.detach(child);
        let index = self
            .index_in_parent(reference)
            .ok_or(DomError::NotAChild {
                parent,
                child: reference,
            })?;
        self.attach_at(parent, child, index);
        Ok(())
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-pre-remove)
    ///
    /// "If child's parent is not parent, then throw a `NotFoundError`."
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAChild`] when `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_exists(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    /// [§ 4.2.3 Replace](https://dom.spec.whatwg.org/#concept-node-replace)
    ///
    /// Replace `old` with `new` in `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAChild`] when `old` is not a child of `parent`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        self.insert_before(parent, new, old)?;
        self.remove_child(parent, old)
    }

    /// Remove a node from its parent, if it has one.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let prev = self.nodes[node.0].prev_sibling;
        let next = self.nodes[node.0].next_sibling;
        self.nodes[parent.0].children.retain(|&id| id != node);
        if let Some(prev) = prev {
            self.nodes[prev.0].next_sibling = next;
        }
        if let Some(next) = next {
            self.nodes[next.0].prev_sibling = prev;
        }
        let detached = &mut self.nodes[node.0];
        detached.parent = None;
        detached.prev_sibling = None;
        detached.next_sibling = None;
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownNode`] if either id is not in this tree, and
    /// [`DomError::HierarchyRequest`] if `to` is `from` or lies inside it.
    /// Nothing moves when an error is returned.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<(), DomError> {
        self.check_exists(from)?;
        self.check_exists(to)?;
        if to == from || self.is_descendant_of(to, from) {
            return Err(DomError::HierarchyRequest {
                parent: to,
                node: from,
            });
        }
        let children = std::mem::take(&mut self.nodes[from.0].children);
        for child in children {
            let node = &mut self.nodes[child.0];
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
            let index = self.nodes[to.0].children.len();
            self.attach_at(to, child, index);
        }
        Ok(())
    }

    /// Link a detached `child` into `parent` at `index`.
    fn attach_at(&mut self, parent: NodeId, child: NodeId, index: usize) {
        self.nodes[parent.0].children.insert(index, child);
        let siblings = &self.nodes[parent.0].children;
        let prev = index.checked_sub(1).map(|i| siblings[i]);
        let next = siblings.get(index + 1).copied();

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = next;
        if let Some(prev) = prev {
            self.nodes[prev.0].next_sibling = Some(child);
        }
        if let Some(next) = next {
            self.nodes[next.0].prev_sibling = Some(child);
        }
    }

    fn check_exists(&self, id: NodeId) -> Result<(), DomError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(DomError::UnknownNode(id))
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Position of a node among its parent's children.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Whether the node is an HTML element with the given local name.
    #[must_use]
    pub fn is_html_element(&self, id: NodeId, tag_name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.is_html(tag_name))
    }

    /// The template contents fragment of a `template` element.
    #[must_use]
    pub fn template_contents(&self, id: NodeId) -> Option<NodeId> {
        self.as_element(id).and_then(|e| e.template_contents)
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// "The descendant text content of a node node is the concatenation of the
    /// data of all the Text node descendants of node, in tree order."
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.as_text(id) {
            out.push_str(text);
            return;
        }
        for &child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// [§ 4.4 clone a node](https://dom.spec.whatwg.org/#concept-node-clone)
    ///
    /// Shallow clone: same node type and data, no parent, no children.
    /// A cloned template gets a fresh, empty contents fragment.
    pub fn clone_node_shallow(&mut self, id: NodeId) -> Option<NodeId> {
        let node_type = self.get(id)?.node_type.clone();
        Some(match node_type {
            NodeType::Element(data) => self.create_element(data.namespace, &data.tag_name, data.attrs),
            other => self.alloc(other),
        })
    }

    /// Deep-copy `node` from `source` into this tree, appending the copy to
    /// `parent`. Template contents are copied along with their template.
    /// The copy stays detached if `parent` is not in this tree.
    pub fn import_subtree(&mut self, source: &Self, node: NodeId, parent: NodeId) -> NodeId {
        let Some(original) = source.get(node) else {
            return parent;
        };
        let copy = match &original.node_type {
            NodeType::Element(data) => {
                let copy = self.create_element(data.namespace, &data.tag_name, data.attrs.clone());
                if let (Some(from), Some(to)) = (data.template_contents, self.template_contents(copy)) {
                    for &child in source.children(from) {
                        let _ = self.import_subtree(source, child, to);
                    }
                }
                copy
            }
            other => self.alloc(other.clone()),
        };
        if self.append_child(parent, copy).is_err() {
            return copy;
        }
        for &child in source.children(node) {
            let _ = self.import_subtree(source, child, copy);
        }
        copy
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| self.is_html_element(id, "body") || self.is_html_element(id, "frameset"))
            .copied()
    }

    /// The first HTML `head` child of the document element.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| self.is_html_element(id, "head"))
            .copied()
    }

    /// Depth-first search for the first HTML element with this local name.
    #[must_use]
    pub fn find_element(&self, from: NodeId, tag_name: &str) -> Option<NodeId> {
        if self.is_html_element(from, tag_name) {
            return Some(from);
        }
        self.children(from)
            .iter()
            .find_map(|&child| self.find_element(child, tag_name))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}
