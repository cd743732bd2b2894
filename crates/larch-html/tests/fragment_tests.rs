//! Integration tests for fragment parsing and the markup setters.

use larch_dom::dump::{dump_children, dump_document};
use larch_dom::serialize::{inner_html, outer_html};
use larch_dom::{Namespace, NodeId};
use larch_html::{
    FragmentContext, ParserOptions, StructuralError, parse_document, parse_fragment,
    set_inner_html, set_outer_html,
};

/// Helper to parse a document and return it with the first element named `tag`
fn document_with(html: &str, tag: &str) -> (larch_dom::DomTree, NodeId) {
    let tree = parse_document(html, ParserOptions::new());
    let node = tree.find_element(NodeId::ROOT, tag).unwrap();
    (tree, node)
}

#[test]
fn test_fragment_nodes_are_root_children() {
    let fragment = parse_fragment("a<i>b</i>", &FragmentContext::html("div"), ParserOptions::new());
    assert_eq!(fragment.nodes().len(), 2);
    assert_eq!(dump_children(&fragment.tree, fragment.root), "| \"a\"\n| <i>\n|   \"b\"\n");
}

#[test]
fn test_table_context_implies_tbody() {
    let fragment = parse_fragment(
        "<tr><td>x",
        &FragmentContext::html("table"),
        ParserOptions::new(),
    );
    let expected = "\
| <tbody>
|   <tr>
|     <td>
|       \"x\"
";
    assert_eq!(dump_children(&fragment.tree, fragment.root), expected);
}

#[test]
fn test_script_context_is_raw() {
    let fragment = parse_fragment(
        "if (a < b) {}",
        &FragmentContext::html("script"),
        ParserOptions::new(),
    );
    assert_eq!(dump_children(&fragment.tree, fragment.root), "| \"if (a < b) {}\"\n");
}

#[test]
fn test_math_context_html_breakout() {
    let fragment = parse_fragment(
        "<mi>x</mi><p>y",
        &FragmentContext::foreign(Namespace::MathMl, "math"),
        ParserOptions::new(),
    );
    let expected = "\
| <math mi>
|   \"x\"
| <p>
|   \"y\"
";
    assert_eq!(dump_children(&fragment.tree, fragment.root), expected);
}

#[test]
fn test_set_inner_html_replaces_children() {
    let (mut tree, div) = document_with("<!DOCTYPE html><div><span>old</span></div>", "div");

    let issues = set_inner_html(&mut tree, div, "<b>new</b> text", ParserOptions::new()).unwrap();

    assert!(issues.is_empty());
    assert_eq!(inner_html(&tree, div), "<b>new</b> text");
    assert_eq!(tree.children(div).len(), 2);
    assert!(
        tree.children(div)
            .iter()
            .all(|&child| tree.parent(child) == Some(div))
    );
}

#[test]
fn test_set_inner_html_on_template_fills_contents() {
    let (mut tree, template) = document_with("<!DOCTYPE html><template></template>", "template");

    let _ = set_inner_html(&mut tree, template, "<td>1</td>", ParserOptions::new()).unwrap();

    assert!(tree.children(template).is_empty());
    let contents = tree.template_contents(template).unwrap();
    assert_eq!(dump_children(&tree, contents), "| <td>\n|   \"1\"\n");
}

#[test]
fn test_set_inner_html_on_text_is_rejected() {
    let (mut tree, p) = document_with("<!DOCTYPE html><p>x", "p");
    let text = tree.first_child(p).unwrap();

    assert_eq!(
        set_inner_html(&mut tree, text, "y", ParserOptions::new()),
        Err(StructuralError::ContextNotElement(text))
    );
}

#[test]
fn test_set_outer_html_replaces_node() {
    let (mut tree, span) = document_with("<!DOCTYPE html><p>a<span>b</span>c", "span");
    let p = tree.parent(span).unwrap();

    let _ = set_outer_html(&mut tree, span, "<em>1</em><em>2</em>", ParserOptions::new()).unwrap();

    assert_eq!(outer_html(&tree, p), "<p>a<em>1</em><em>2</em>c</p>");
    assert_eq!(tree.parent(span), None);
}

#[test]
fn test_set_outer_html_uses_parent_context() {
    let (mut tree, td) = document_with("<!DOCTYPE html><table><tr><td>x</td></tr></table>", "td");
    let tr = tree.parent(td).unwrap();

    let _ = set_outer_html(&mut tree, td, "<th>h</th>", ParserOptions::new()).unwrap();

    assert_eq!(inner_html(&tree, tr), "<th>h</th>");
}

#[test]
fn test_set_outer_html_on_detached_node() {
    let mut tree = parse_document("", ParserOptions::new());
    let lonely = tree.create_html_element("div");

    assert_eq!(
        set_outer_html(&mut tree, lonely, "x", ParserOptions::new()),
        Err(StructuralError::NoParent(lonely))
    );
}

#[test]
fn test_set_outer_html_on_document_element() {
    let mut tree = parse_document("", ParserOptions::new());
    let html = tree.document_element().unwrap();

    assert_eq!(
        set_outer_html(&mut tree, html, "<p>", ParserOptions::new()),
        Err(StructuralError::ParentIsDocument(html))
    );
    assert!(dump_document(&tree).starts_with("| <html>"));
}
