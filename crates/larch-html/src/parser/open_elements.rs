//! The stack of open elements.
//!
//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)

use larch_dom::{DomTree, Namespace, NodeId};

use super::tags::{MATHML_SCOPING, SVG_SCOPING};

/// The boundary sets used by "has an element in ... scope".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    ///
    /// "applet, caption, html, table, td, th, marquee, object, template,
    /// MathML mi, mo, mn, ms, mtext, annotation-xml, SVG foreignObject, desc,
    /// title"
    Default,
    /// "has an element in list item scope": the default set plus ol and ul.
    ListItem,
    /// "has an element in button scope": the default set plus button.
    Button,
    /// "has an element in table scope": html, table, template.
    Table,
    /// "has an element in select scope": every element except optgroup and option.
    Select,
}

impl Scope {
    /// Whether an element bounds a scope query of this kind.
    #[must_use]
    pub fn is_boundary(self, namespace: Namespace, tag_name: &str) -> bool {
        let default = || match namespace {
            Namespace::Html => matches!(
                tag_name,
                "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object"
                    | "template"
            ),
            Namespace::MathMl => MATHML_SCOPING.contains(&tag_name),
            Namespace::Svg => SVG_SCOPING.contains(&tag_name),
            _ => false,
        };
        let html = namespace == Namespace::Html;
        match self {
            Self::Default => default(),
            Self::ListItem => default() || (html && matches!(tag_name, "ol" | "ul")),
            Self::Button => default() || (html && tag_name == "button"),
            Self::Table => html && matches!(tag_name, "html" | "table" | "template"),
            Self::Select => !(html && matches!(tag_name, "optgroup" | "option")),
        }
    }
}

/// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
///
/// "Initially, the stack of open elements is empty. The stack grows downwards;
/// the topmost node on the stack is the first one added to the stack, and the
/// bottommost node of the stack is the most recently added node in the stack."
///
/// Index 0 is the top (the `html` element); the last index is the current node.
#[derive(Debug, Clone, Default)]
pub struct StackOfOpenElements {
    items: Vec<NodeId>,
}

impl StackOfOpenElements {
    /// Create an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Push a node; it becomes the current node.
    pub fn push(&mut self, node: NodeId) {
        self.items.push(node);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.items.pop()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.items.last().copied()
    }

    /// The topmost node (the `html` element once one exists).
    #[must_use]
    pub fn top(&self) -> Option<NodeId> {
        self.items.first().copied()
    }

    /// Node at position `index`, counted from the top.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no elements are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `node` is on the stack.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.items.contains(&node)
    }

    /// Position of `node`, counted from the top.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.items.iter().rposition(|&id| id == node)
    }

    /// Remove `node` wherever it is in the stack.
    pub fn remove(&mut self, node: NodeId) -> bool {
        self.position(node).is_some_and(|pos| {
            let _ = self.items.remove(pos);
            true
        })
    }

    /// Insert `node` at `index` (counted from the top).
    pub fn insert_at(&mut self, index: usize, node: NodeId) {
        self.items.insert(index.min(self.items.len()), node);
    }

    /// Insert `node` immediately below `reference`.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if let Some(pos) = self.position(reference) {
            self.items.insert(pos + 1, node);
        }
    }

    /// Replace `old` with `new` in place.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if let Some(pos) = self.position(old) {
            self.items[pos] = new;
        }
    }

    /// Drop everything below position `len`.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Iterate from the top of the stack to the current node.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.items.iter()
    }

    /// The stack as a slice, top first.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.items
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the stack).
    ///  2. If node is the target node, terminate in a match state.
    ///  3. Otherwise, if node is one of the element types in list, terminate in a
    ///     failure state.
    ///  4. Otherwise, set node to the previous entry in the stack of open elements
    ///     and return to step 2."
    fn scan_scope(&self, tree: &DomTree, scope: Scope, is_target: impl Fn(NodeId) -> bool) -> bool {
        for &node in self.items.iter().rev() {
            if is_target(node) {
                return true;
            }
            if let Some(element) = tree.as_element(node)
                && scope.is_boundary(element.namespace, &element.tag_name)
            {
                return false;
            }
        }
        false
    }

    /// Whether an HTML element with `tag_name` is in the given scope.
    #[must_use]
    pub fn has_in_scope(&self, tree: &DomTree, tag_name: &str, scope: Scope) -> bool {
        self.scan_scope(tree, scope, |node| tree.is_html_element(node, tag_name))
    }

    /// Whether any HTML element named in `tag_names` is in the given scope.
    #[must_use]
    pub fn has_any_in_scope(&self, tree: &DomTree, tag_names: &[&str], scope: Scope) -> bool {
        self.scan_scope(tree, scope, |node| {
            tree.as_element(node)
                .is_some_and(|e| e.namespace == Namespace::Html && tag_names.contains(&e.tag_name.as_str()))
        })
    }

    /// Whether the specific node `target` is in the given scope.
    #[must_use]
    pub fn has_node_in_scope(&self, tree: &DomTree, target: NodeId, scope: Scope) -> bool {
        self.scan_scope(tree, scope, |node| node == target)
    }

    /// Whether an HTML element with `tag_name` is anywhere on the stack.
    #[must_use]
    pub fn contains_html(&self, tree: &DomTree, tag_name: &str) -> bool {
        self.items.iter().any(|&id| tree.is_html_element(id, tag_name))
    }

    /// "Pop elements from the stack of open elements until an HTML element with
    /// the same tag name has been popped from the stack."
    pub fn pop_until(&mut self, tree: &DomTree, tag_name: &str) {
        self.pop_until_any(tree, &[tag_name]);
    }

    /// Pop until an HTML element named in `tag_names` has been popped.
    pub fn pop_until_any(&mut self, tree: &DomTree, tag_names: &[&str]) {
        while let Some(node) = self.items.pop() {
            if tree
                .as_element(node)
                .is_some_and(|e| e.namespace == Namespace::Html && tag_names.contains(&e.tag_name.as_str()))
            {
                break;
            }
        }
    }

    /// Pop until `target` has been popped.
    pub fn pop_until_node(&mut self, target: NodeId) {
        while let Some(node) = self.items.pop() {
            if node == target {
                break;
            }
        }
    }

    /// Pop while the current node is not an HTML element named in `tag_names`.
    ///
    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    /// "clear the stack back to a table context" and its body/row variants.
    pub fn clear_back_to(&mut self, tree: &DomTree, tag_names: &[&str]) {
        while let Some(current) = self.current() {
            if tree
                .as_element(current)
                .is_some_and(|e| e.namespace == Namespace::Html && tag_names.contains(&e.tag_name.as_str()))
            {
                break;
            }
            let _ = self.items.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(tree: &mut DomTree, names: &[(Namespace, &str)]) -> StackOfOpenElements {
        let mut stack = StackOfOpenElements::new();
        for &(ns, name) in names {
            let id = tree.create_element(ns, name, larch_dom::AttributeList::new());
            stack.push(id);
        }
        stack
    }

    #[test]
    fn test_scope_stops_at_table() {
        let mut tree = DomTree::new();
        let stack = stack_of(
            &mut tree,
            &[
                (Namespace::Html, "html"),
                (Namespace::Html, "p"),
                (Namespace::Html, "table"),
                (Namespace::Html, "td"),
            ],
        );
        assert!(!stack.has_in_scope(&tree, "p", Scope::Default));
        assert!(stack.has_in_scope(&tree, "td", Scope::Table));
        assert!(stack.has_in_scope(&tree, "table", Scope::Table));
    }

    #[test]
    fn test_scope_query_is_idempotent() {
        let mut tree = DomTree::new();
        let stack = stack_of(
            &mut tree,
            &[
                (Namespace::Html, "html"),
                (Namespace::Html, "ul"),
                (Namespace::Html, "li"),
                (Namespace::Html, "button"),
            ],
        );
        for _ in 0..3 {
            assert!(stack.has_in_scope(&tree, "li", Scope::ListItem));
            assert!(!stack.has_in_scope(&tree, "li", Scope::Button));
            assert!(!stack.has_in_scope(&tree, "ul", Scope::Button));
        }
    }

    #[test]
    fn test_foreign_scoping_elements_bound_scope() {
        let mut tree = DomTree::new();
        let stack = stack_of(
            &mut tree,
            &[
                (Namespace::Html, "html"),
                (Namespace::Html, "p"),
                (Namespace::Svg, "svg"),
                (Namespace::Svg, "foreignObject"),
            ],
        );
        assert!(!stack.has_in_scope(&tree, "p", Scope::Default));
        assert!(stack.has_in_scope(&tree, "p", Scope::Table));
    }

    #[test]
    fn test_select_scope() {
        let mut tree = DomTree::new();
        let stack = stack_of(
            &mut tree,
            &[
                (Namespace::Html, "select"),
                (Namespace::Html, "optgroup"),
                (Namespace::Html, "option"),
            ],
        );
        assert!(stack.has_in_scope(&tree, "select", Scope::Select));
    }

    #[test]
    fn test_remove_insert_replace() {
        let mut tree = DomTree::new();
        let mut stack = stack_of(&mut tree, &[(Namespace::Html, "html"), (Namespace::Html, "b")]);
        let b = stack.current().unwrap();
        let i = tree.create_html_element("i");
        stack.insert_after(stack.top().unwrap(), i);
        assert_eq!(stack.position(i), Some(1));
        assert!(stack.remove(b));
        assert_eq!(stack.current(), Some(i));
        let u = tree.create_html_element("u");
        stack.replace(i, u);
        assert_eq!(stack.as_slice().len(), 2);
        assert_eq!(stack.current(), Some(u));
    }
}
