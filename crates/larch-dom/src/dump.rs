//! Tree dump in the html5lib tree-construction test format.
//!
//! Each node is one line, prefixed with `| ` and indented two spaces per
//! level:
//!
//! ```text
//! | <!DOCTYPE html>
//! | <html>
//! |   <head>
//! |   <body>
//! |     <svg svg>
//! |       viewBox="0 0 1 1"
//! |     "text"
//! ```

use std::fmt::Write;

use crate::{DomTree, Namespace, NodeId, NodeType};

/// Dump every child of the document.
#[must_use]
pub fn dump_document(tree: &DomTree) -> String {
    dump_children(tree, NodeId::ROOT)
}

/// Dump the children of `parent` starting at depth zero.
///
/// Fragment parse results are dumped this way, from their `html` root.
#[must_use]
pub fn dump_children(tree: &DomTree, parent: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(parent) {
        dump_node(tree, child, 0, &mut out);
    }
    out
}

fn line(out: &mut String, depth: usize, content: &str) {
    out.push_str("| ");
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(content);
    out.push('\n');
}

fn dump_node(tree: &DomTree, node: NodeId, depth: usize, out: &mut String) {
    let Some(data) = tree.get(node) else {
        return;
    };
    match &data.node_type {
        NodeType::DocumentType(doctype) => {
            let content = if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                format!("<!DOCTYPE {}>", doctype.name)
            } else {
                format!(
                    "<!DOCTYPE {} \"{}\" \"{}\">",
                    doctype.name, doctype.public_id, doctype.system_id
                )
            };
            line(out, depth, &content);
        }
        NodeType::Element(element) => {
            let content = match element.namespace {
                Namespace::Html => format!("<{}>", element.tag_name),
                ns => format!("<{ns} {}>", element.tag_name),
            };
            line(out, depth, &content);

            let mut attrs: Vec<String> = element
                .attrs
                .iter()
                .map(|attr| {
                    let mut rendered = String::new();
                    match (attr.namespace, attr.prefix()) {
                        (Some(_), Some(prefix)) => {
                            let _ = write!(rendered, "{prefix} {}", attr.local_name());
                        }
                        _ => rendered.push_str(&attr.name),
                    }
                    let _ = write!(rendered, "=\"{}\"", attr.value);
                    rendered
                })
                .collect();
            attrs.sort();
            for attr in &attrs {
                line(out, depth + 1, attr);
            }

            if let Some(contents) = element.template_contents {
                line(out, depth + 1, "content");
                for &child in tree.children(contents) {
                    dump_node(tree, child, depth + 2, out);
                }
            }
            for &child in tree.children(node) {
                dump_node(tree, child, depth + 1, out);
            }
        }
        NodeType::Text(text) => line(out, depth, &format!("\"{text}\"")),
        NodeType::Comment(text) => line(out, depth, &format!("<!-- {text} -->")),
        NodeType::Document | NodeType::DocumentFragment => {
            for &child in tree.children(node) {
                dump_node(tree, child, depth, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, AttributeList, DoctypeData};

    #[test]
    fn test_dump_format() {
        let mut tree = DomTree::new();
        let doctype = tree.create_doctype(DoctypeData {
            name: "html".to_string(),
            ..DoctypeData::default()
        });
        tree.append_child(NodeId::ROOT, doctype).unwrap();
        let html = tree.create_html_element("html");
        tree.append_child(NodeId::ROOT, html).unwrap();
        let attrs: AttributeList = [
            Attribute::new("viewbox", "0"),
            Attribute::namespaced("xlink:href", "#a", Namespace::XLink),
        ]
        .into_iter()
        .collect();
        let svg = tree.create_element(Namespace::Svg, "svg", attrs);
        tree.append_child(html, svg).unwrap();
        let text = tree.create_text("hi");
        tree.append_child(html, text).unwrap();

        assert_eq!(
            dump_document(&tree),
            "| <!DOCTYPE html>\n\
             | <html>\n\
             |   <svg svg>\n\
             |     viewbox=\"0\"\n\
             |     xlink href=\"#a\"\n\
             |   \"hi\"\n"
        );
    }

    #[test]
    fn test_template_content_line() {
        let mut tree = DomTree::new();
        let template = tree.create_html_element("template");
        tree.append_child(NodeId::ROOT, template).unwrap();
        let contents = tree.template_contents(template).unwrap();
        let comment = tree.create_comment("x");
        tree.append_child(contents, comment).unwrap();

        assert_eq!(
            dump_document(&tree),
            "| <template>\n|   content\n|     <!-- x -->\n"
        );
    }
}
