//! The list of active formatting elements.
//!
//! [§ 13.2.4.4 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)

use std::collections::HashMap;

use larch_dom::{AttributeList, DomTree, NodeId};

use crate::tokenizer::Token;

/// An entry in the list of active formatting elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormattingEntry {
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Pushed when entering applet, object, marquee, template, td, th and
    /// caption, so formatting elements from outside do not leak in.
    Marker,
    /// A formatting element.
    Element(NodeId),
}

impl FormattingEntry {
    /// The element of a non-marker entry.
    #[must_use]
    pub const fn node(self) -> Option<NodeId> {
        match self {
            Self::Marker => None,
            Self::Element(node) => Some(node),
        }
    }
}

/// [§ 13.2.4.4](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "Initially, the list of active formatting elements is empty. It is used to
/// handle mis-nested formatting element tags."
#[derive(Debug, Clone, Default)]
pub struct ActiveFormattingElements {
    entries: Vec<FormattingEntry>,
}

impl ActiveFormattingElements {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<FormattingEntry> {
        self.entries.get(index).copied()
    }

    /// The last entry.
    #[must_use]
    pub fn last(&self) -> Option<FormattingEntry> {
        self.entries.last().copied()
    }

    /// Iterate entries, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, FormattingEntry> {
        self.entries.iter()
    }

    /// Whether `node` is in the list.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// Index of `node` in the list.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|&entry| entry == FormattingEntry::Element(node))
    }

    /// [§ 13.2.4.4 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "1. If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if there
    /// are no markers, that have the same tag name, namespace, and attributes as
    /// element, then remove the earliest such element from the list of active
    /// formatting elements. For these purposes, the attributes must be compared
    /// as they were when the elements were created by the parser; two elements
    /// have the same attributes if all their parsed attributes can be paired
    /// such that the two attributes in each pair have identical names,
    /// namespaces, and values (the order of the attributes does not matter).
    ///
    /// 2. Add element to the list of active formatting elements."
    ///
    /// Attributes are read from the start tag recorded in `origin`, falling
    /// back to the element's current attributes. Returns the evicted element.
    pub fn push(
        &mut self,
        tree: &DomTree,
        node: NodeId,
        origin: &HashMap<NodeId, Token>,
    ) -> Option<NodeId> {
        let element = tree.as_element(node)?;
        let attrs = created_attributes(tree, origin, node)?;
        let mut duplicates = Vec::new();
        for (index, entry) in self.entries.iter().enumerate().rev() {
            let FormattingEntry::Element(other) = *entry else {
                break;
            };
            let same = tree.as_element(other).is_some_and(|o| {
                o.namespace == element.namespace
                    && o.tag_name == element.tag_name
                    && created_attributes(tree, origin, other).is_some_and(|a| a.same_set(&attrs))
            });
            if same {
                duplicates.push(index);
            }
        }
        // "Noah's Ark" clause: at most three identical entries.
        let evicted = if duplicates.len() >= 3
            && let Some(&earliest) = duplicates.last()
        {
            self.entries.remove(earliest).node()
        } else {
            None
        };
        self.entries.push(FormattingEntry::Element(node));
        evicted
    }

    /// Push a marker.
    pub fn insert_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.4](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "1. Let entry be the last (most recently added) entry in the list of
    /// active formatting elements.
    /// 2. Remove entry from the list of active formatting elements.
    /// 3. If entry was a marker, then stop the algorithm at this point.
    /// 4. Go to step 1."
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if entry == FormattingEntry::Marker {
                break;
            }
        }
    }

    /// Remove `node`, returning the index it occupied.
    pub fn remove(&mut self, node: NodeId) -> Option<usize> {
        let pos = self.position(node)?;
        let _ = self.entries.remove(pos);
        Some(pos)
    }

    /// Replace the entry at `index`.
    pub fn set(&mut self, index: usize, node: NodeId) {
        if let Some(entry) = self.entries.get_mut(index) {
            *entry = FormattingEntry::Element(node);
        }
    }

    /// Insert `node` at `index`.
    pub fn insert_at(&mut self, index: usize, node: NodeId) {
        self.entries
            .insert(index.min(self.entries.len()), FormattingEntry::Element(node));
    }

    /// The last element with `tag_name` between the end of the list and the
    /// last marker.
    #[must_use]
    pub fn last_element_named(&self, tree: &DomTree, tag_name: &str) -> Option<NodeId> {
        for entry in self.iter().rev() {
            match *entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element(node) if tree.is_html_element(node, tag_name) => {
                    return Some(node);
                }
                FormattingEntry::Element(_) => {}
            }
        }
        None
    }
}

/// The attributes `node` was created with by the parser.
fn created_attributes(
    tree: &DomTree,
    origin: &HashMap<NodeId, Token>,
    node: NodeId,
) -> Option<AttributeList> {
    match origin.get(&node) {
        Some(Token::StartTag { attributes, .. }) => Some(attributes.iter().cloned().collect()),
        _ => tree.as_element(node).map(|element| element.attrs.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larch_dom::{Attribute, AttributeList, Namespace};

    fn element(tree: &mut DomTree, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let list: AttributeList = attrs.iter().map(|&(n, v)| Attribute::new(n, v)).collect();
        tree.create_element(Namespace::Html, name, list)
    }

    fn count_named(list: &ActiveFormattingElements, tree: &DomTree, name: &str) -> usize {
        list.iter()
            .filter_map(|e| e.node())
            .filter(|&n| tree.is_html_element(n, name))
            .count()
    }

    #[test]
    fn test_noahs_ark_caps_at_three() {
        let mut tree = DomTree::new();
        let mut list = ActiveFormattingElements::new();
        let first = element(&mut tree, "b", &[("class", "x")]);
        let _ = list.push(&tree, first, &HashMap::new());
        for _ in 0..4 {
            let b = element(&mut tree, "b", &[("class", "x")]);
            let _ = list.push(&tree, b, &HashMap::new());
            assert!(count_named(&list, &tree, "b") <= 3);
        }
        assert_eq!(count_named(&list, &tree, "b"), 3);
        assert!(!list.contains(first));
    }

    #[test]
    fn test_noahs_ark_respects_attributes_and_markers() {
        let mut tree = DomTree::new();
        let mut list = ActiveFormattingElements::new();
        for _ in 0..3 {
            let b = element(&mut tree, "b", &[]);
            let _ = list.push(&tree, b, &HashMap::new());
        }
        let different = element(&mut tree, "b", &[("id", "1")]);
        let _ = list.push(&tree, different, &HashMap::new());
        assert_eq!(list.len(), 4);

        list.insert_marker();
        for _ in 0..3 {
            let b = element(&mut tree, "b", &[]);
            let _ = list.push(&tree, b, &HashMap::new());
        }
        assert_eq!(list.len(), 8);
    }

    #[test]
    fn test_clear_to_last_marker() {
        let mut tree = DomTree::new();
        let mut list = ActiveFormattingElements::new();
        let a = element(&mut tree, "a", &[]);
        let _ = list.push(&tree, a, &HashMap::new());
        list.insert_marker();
        let i = element(&mut tree, "i", &[]);
        let _ = list.push(&tree, i, &HashMap::new());

        assert_eq!(list.last_element_named(&tree, "a"), None);
        list.clear_to_last_marker();
        assert_eq!(list.len(), 1);
        assert_eq!(list.last_element_named(&tree, "a"), Some(a));
    }

    #[test]
    fn test_noahs_ark_compares_attributes_at_creation() {
        let mut tree = DomTree::new();
        let mut list = ActiveFormattingElements::new();
        let mut origin = HashMap::new();
        let token = Token::start_tag("b", vec![Attribute::new("class", "x")]);
        let mut pushed = Vec::new();
        for _ in 0..3 {
            let b = element(&mut tree, "b", &[("class", "x")]);
            let _ = origin.insert(b, token.clone());
            assert_eq!(list.push(&tree, b, &origin), None);
            pushed.push(b);
        }
        if let Some(first) = tree.as_element_mut(pushed[0]) {
            first.attrs = AttributeList::new();
        }

        let fourth = element(&mut tree, "b", &[("class", "x")]);
        let _ = origin.insert(fourth, token);
        assert_eq!(list.push(&tree, fourth, &origin), Some(pushed[0]));

        assert_eq!(list.len(), 3);
        assert!(!list.contains(pushed[0]));
        assert!(list.contains(fourth));
    }
}
