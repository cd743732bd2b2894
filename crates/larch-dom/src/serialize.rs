//! HTML fragment serialization.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)

use crate::{DomTree, Namespace, NodeId, NodeType};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// The serializer also treats the legacy basefont, bgsound, frame, keygen and
/// param as void.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Parents whose text children are emitted literally.
const RAW_TEXT_PARENTS: &[&str] = &[
    "style",
    "script",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
];

/// Whether an HTML element with this name never has an end tag.
#[must_use]
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(&tag_name)
}

/// The `innerHTML` getter: serialize the children of `node`.
///
/// For a `template` element, its template contents are serialized instead.
#[must_use]
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    let source = tree.template_contents(node).unwrap_or(node);
    for &child in tree.children(source) {
        serialize_node(tree, child, &mut out);
    }
    out
}

/// The `outerHTML` getter: serialize `node` itself and its subtree.
#[must_use]
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    serialize_node(tree, node, &mut out);
    out
}

/// Serialize a whole document (doctype, comments, and the document element).
#[must_use]
pub fn serialize_document(tree: &DomTree) -> String {
    inner_html(tree, NodeId::ROOT)
}

fn serialize_node(tree: &DomTree, node: NodeId, out: &mut String) {
    let Some(data) = tree.get(node) else {
        return;
    };
    match &data.node_type {
        NodeType::Element(element) => {
            let name = element.tag_name.as_str();
            out.push('<');
            out.push_str(name);
            for attr in &element.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');

            let is_html = element.namespace == Namespace::Html;
            if is_html && is_void_element(name) {
                return;
            }

            // A leading newline directly after these start tags is dropped
            // by the parser, so a text child starting with one needs an
            // extra newline to survive the round trip.
            if is_html
                && matches!(name, "pre" | "textarea" | "listing")
                && tree
                    .first_child(node)
                    .and_then(|child| tree.as_text(child))
                    .is_some_and(|text| text.starts_with('\n'))
            {
                out.push('\n');
            }

            out.push_str(&inner_html(tree, node));
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        NodeType::Text(text) => {
            let literal = tree
                .parent(node)
                .and_then(|parent| tree.as_element(parent))
                .is_some_and(|parent| {
                    parent.namespace == Namespace::Html
                        && RAW_TEXT_PARENTS.contains(&parent.tag_name.as_str())
                });
            if literal {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        NodeType::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeType::DocumentType(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(&doctype.name);
            out.push('>');
        }
        NodeType::Document | NodeType::DocumentFragment => {
            for &child in tree.children(node) {
                serialize_node(tree, child, out);
            }
        }
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrence of the "&" character by the string "&amp;".
/// Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
/// string "&nbsp;". If the algorithm was invoked in the attribute mode,
/// replace any occurrences of the """ character by the string "&quot;". If
/// the algorithm was not invoked in the attribute mode, replace any
/// occurrences of the "<" character by the string "&lt;", and any
/// occurrences of the ">" character by the string "&gt;"."
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, AttributeList};

    #[test]
    fn test_void_and_escaping() {
        let mut tree = DomTree::new();
        let p = tree.create_html_element("p");
        let attrs: AttributeList = [Attribute::new("title", "a\"b&c")].into_iter().collect();
        let img = tree.create_element(Namespace::Html, "img", attrs);
        let text = tree.create_text("1 < 2 & 3");
        tree.append_child(p, img).unwrap();
        tree.append_child(p, text).unwrap();

        assert_eq!(
            outer_html(&tree, p),
            "<p><img title=\"a&quot;b&amp;c\">1 &lt; 2 &amp; 3</p>"
        );
    }

    #[test]
    fn test_raw_text_parent() {
        let mut tree = DomTree::new();
        let script = tree.create_html_element("script");
        let text = tree.create_text("if (a < b) {}");
        tree.append_child(script, text).unwrap();
        assert_eq!(inner_html(&tree, script), "if (a < b) {}");
    }

    #[test]
    fn test_template_contents_serialized() {
        let mut tree = DomTree::new();
        let template = tree.create_html_element("template");
        let contents = tree.template_contents(template).unwrap();
        let span = tree.create_html_element("span");
        tree.append_child(contents, span).unwrap();
        assert_eq!(
            outer_html(&tree, template),
            "<template><span></span></template>"
        );
    }

    #[test]
    fn test_pre_leading_newline_doubled() {
        let mut tree = DomTree::new();
        let pre = tree.create_html_element("pre");
        let text = tree.create_text("\nx");
        tree.append_child(pre, text).unwrap();
        assert_eq!(outer_html(&tree, pre), "<pre>\n\nx</pre>");
    }
}
