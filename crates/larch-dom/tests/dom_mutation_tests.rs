//! Tests for DOM tree mutation methods: append_child, remove_child,
//! insert_before, replace_child, move_children, cloning and import.

use larch_dom::{Attribute, AttributeList, DomError, DomTree, Namespace, NodeId};

/// Helper to create an element attached under `parent`.
fn append_element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.create_html_element(tag);
    tree.append_child(parent, id).unwrap();
    id
}

// ========== append_child ==========

#[test]
fn test_append_child_unknown_parent() {
    let mut tree = DomTree::new();
    let p = tree.create_html_element("p");

    assert_eq!(
        tree.append_child(NodeId(999), p),
        Err(DomError::UnknownNode(NodeId(999)))
    );
    assert_eq!(tree.parent(p), None);
}

#[test]
fn test_append_child_rejects_cycle() {
    let mut tree = DomTree::new();
    let a = append_element(&mut tree, NodeId::ROOT, "div");
    let b = append_element(&mut tree, a, "span");

    assert_eq!(
        tree.append_child(b, a),
        Err(DomError::HierarchyRequest { parent: b, node: a })
    );
    assert_eq!(tree.append_child(a, a), Err(DomError::HierarchyRequest { parent: a, node: a }));
    assert_eq!(tree.parent(a), Some(NodeId::ROOT));
    assert_eq!(tree.parent(b), Some(a));
    assert_eq!(tree.ancestors(b).collect::<Vec<_>>(), vec![a, NodeId::ROOT]);
}

// ========== remove_child ==========

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let a = append_element(&mut tree, parent, "a");
    let b = append_element(&mut tree, parent, "b");
    let c = append_element(&mut tree, parent, "c");

    tree.remove_child(parent, b).unwrap();

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_child_wrong_parent() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let other = append_element(&mut tree, NodeId::ROOT, "span");
    let child = append_element(&mut tree, other, "p");

    assert_eq!(
        tree.remove_child(parent, child),
        Err(DomError::NotAChild { parent, child })
    );
    assert_eq!(tree.parent(child), Some(other));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let b = append_element(&mut tree, parent, "b");
    let a = tree.create_html_element("a");

    tree.insert_before(parent, a, b).unwrap();

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
}

#[test]
fn test_insert_before_moves_from_old_parent() {
    let mut tree = DomTree::new();
    let old = append_element(&mut tree, NodeId::ROOT, "div");
    let new = append_element(&mut tree, NodeId::ROOT, "section");
    let moving = append_element(&mut tree, old, "p");
    let reference = append_element(&mut tree, new, "span");

    tree.insert_before(new, moving, reference).unwrap();

    assert!(tree.children(old).is_empty());
    assert_eq!(tree.children(new), &[moving, reference]);
    assert_eq!(tree.parent(moving), Some(new));
}

#[test]
fn test_insert_before_rejects_cycle() {
    let mut tree = DomTree::new();
    let outer = append_element(&mut tree, NodeId::ROOT, "div");
    let inner = append_element(&mut tree, outer, "div");
    let leaf = append_element(&mut tree, inner, "p");

    assert_eq!(
        tree.insert_before(inner, outer, leaf),
        Err(DomError::HierarchyRequest {
            parent: inner,
            node: outer
        })
    );
}

#[test]
fn test_insert_before_reference_not_child() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let stray = tree.create_html_element("p");
    let node = tree.create_html_element("b");

    assert!(matches!(
        tree.insert_before(parent, node, stray),
        Err(DomError::NotAChild { .. })
    ));
    assert_eq!(tree.parent(node), None);
}

// ========== replace_child / move_children ==========

#[test]
fn test_replace_child_keeps_position() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let a = append_element(&mut tree, parent, "a");
    let b = append_element(&mut tree, parent, "b");
    let c = append_element(&mut tree, parent, "c");
    let replacement = tree.create_html_element("i");

    tree.replace_child(parent, replacement, b).unwrap();

    assert_eq!(tree.children(parent), &[a, replacement, c]);
    assert_eq!(tree.parent(b), None);
}

#[test]
fn test_move_children_appends_in_order() {
    let mut tree = DomTree::new();
    let from = append_element(&mut tree, NodeId::ROOT, "div");
    let to = append_element(&mut tree, NodeId::ROOT, "div");
    let existing = append_element(&mut tree, to, "hr");
    let a = append_element(&mut tree, from, "a");
    let b = append_element(&mut tree, from, "b");

    tree.move_children(from, to).unwrap();

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, a, b]);
    assert_eq!(tree.prev_sibling(a), Some(existing));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.parent(b), Some(to));
}

#[test]
fn test_move_children_into_own_subtree_is_rejected() {
    let mut tree = DomTree::new();
    let from = append_element(&mut tree, NodeId::ROOT, "div");
    let inner = append_element(&mut tree, from, "p");
    let sibling = append_element(&mut tree, from, "b");

    assert_eq!(
        tree.move_children(from, inner),
        Err(DomError::HierarchyRequest {
            parent: inner,
            node: from
        })
    );
    assert_eq!(
        tree.move_children(from, from),
        Err(DomError::HierarchyRequest {
            parent: from,
            node: from
        })
    );
    assert_eq!(tree.children(from), &[inner, sibling]);
    assert_eq!(
        tree.move_children(NodeId(999), from),
        Err(DomError::UnknownNode(NodeId(999)))
    );
}

// ========== cloning, import, queries ==========

#[test]
fn test_clone_node_shallow_copies_attributes_only() {
    let mut tree = DomTree::new();
    let attrs: AttributeList = [Attribute::new("class", "x y"), Attribute::new("id", "a")]
        .into_iter()
        .collect();
    let original = tree.create_element(Namespace::Html, "b", attrs);
    tree.append_child(NodeId::ROOT, original).unwrap();
    let _ = append_element(&mut tree, original, "i");

    let clone = tree.clone_node_shallow(original).unwrap();

    let data = tree.as_element(clone).unwrap();
    assert_eq!(data.tag_name, "b");
    assert_eq!(data.id(), Some("a"));
    assert!(data.classes().contains("y"));
    assert!(tree.children(clone).is_empty());
    assert_eq!(tree.parent(clone), None);
}

#[test]
fn test_import_subtree_deep_copy() {
    let mut source = DomTree::new();
    let div = append_element(&mut source, NodeId::ROOT, "div");
    let text = source.create_text("hello");
    source.append_child(div, text).unwrap();
    let template = append_element(&mut source, div, "template");
    let contents = source.template_contents(template).unwrap();
    let _ = append_element(&mut source, contents, "span");

    let mut target = DomTree::new();
    let copy = target.import_subtree(&source, div, NodeId::ROOT);

    assert_eq!(target.text_content(copy), "hello");
    let copied_template = target.find_element(copy, "template").unwrap();
    let copied_contents = target.template_contents(copied_template).unwrap();
    assert_eq!(target.children(copied_contents).len(), 1);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = DomTree::new();
    let p = append_element(&mut tree, NodeId::ROOT, "p");
    let a = tree.create_text("a");
    tree.append_child(p, a).unwrap();
    let b = append_element(&mut tree, p, "b");
    let inner = tree.create_text("b");
    tree.append_child(b, inner).unwrap();
    let c = tree.create_text("c");
    tree.append_child(p, c).unwrap();

    assert_eq!(tree.text_content(p), "abc");
}

#[test]
fn test_document_element_body_and_head() {
    let mut tree = DomTree::new();
    let comment = tree.create_comment("before");
    tree.append_child(NodeId::ROOT, comment).unwrap();
    let html = append_element(&mut tree, NodeId::ROOT, "html");
    let head = append_element(&mut tree, html, "head");
    let body = append_element(&mut tree, html, "body");

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.ancestors(body).collect::<Vec<_>>(), vec![html, NodeId::ROOT]);
    assert_eq!(tree.preceding_siblings(body).collect::<Vec<_>>(), vec![head]);
}
