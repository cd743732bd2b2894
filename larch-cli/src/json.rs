//! JSON rendering of a parsed tree.

use std::collections::BTreeMap;

use larch_dom::{DomTree, NodeId, NodeType};
use serde::Serialize;

/// One node of the tree, tagged by its `type`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum JsonNode {
    Document {
        children: Vec<JsonNode>,
    },
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    Fragment {
        children: Vec<JsonNode>,
    },
    Element {
        tag_name: String,
        namespace: String,
        attributes: BTreeMap<String, String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<Vec<JsonNode>>,
        children: Vec<JsonNode>,
    },
    Text {
        content: String,
    },
    Comment {
        content: String,
    },
}

impl JsonNode {
    /// Convert `node` and everything below it.
    pub fn from_tree(tree: &DomTree, node: NodeId) -> Option<Self> {
        let children = |parent: NodeId| -> Vec<Self> {
            tree.children(parent)
                .iter()
                .filter_map(|&child| Self::from_tree(tree, child))
                .collect()
        };
        let json = match &tree.get(node)?.node_type {
            NodeType::Document => Self::Document {
                children: children(node),
            },
            NodeType::DocumentType(doctype) => Self::Doctype {
                name: doctype.name.clone(),
                public_id: doctype.public_id.clone(),
                system_id: doctype.system_id.clone(),
            },
            NodeType::DocumentFragment => Self::Fragment {
                children: children(node),
            },
            NodeType::Element(element) => Self::Element {
                tag_name: element.tag_name.clone(),
                namespace: element.namespace.to_string(),
                attributes: element
                    .attrs
                    .iter()
                    .map(|attr| (attr.name.clone(), attr.value.clone()))
                    .collect(),
                content: element.template_contents.map(children),
                children: children(node),
            },
            NodeType::Text(text) => Self::Text {
                content: text.clone(),
            },
            NodeType::Comment(text) => Self::Comment {
                content: text.clone(),
            },
        };
        Some(json)
    }
}

#[cfg(test)]
mod tests {
    use larch_html::{ParserOptions, parse_document};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_element_shape() {
        let tree = parse_document("<!DOCTYPE html><p class=x>hi", ParserOptions::new());
        let p = tree.find_element(NodeId::ROOT, "p").unwrap();

        let value = serde_json::to_value(JsonNode::from_tree(&tree, p).unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "element",
                "tagName": "p",
                "namespace": "html",
                "attributes": { "class": "x" },
                "children": [{ "type": "text", "content": "hi" }],
            })
        );
    }

    #[test]
    fn test_template_has_content() {
        let tree = parse_document("<template>a</template>", ParserOptions::new());
        let template = tree.find_element(NodeId::ROOT, "template").unwrap();

        let value = serde_json::to_value(JsonNode::from_tree(&tree, template).unwrap()).unwrap();

        assert_eq!(value["content"], json!([{ "type": "text", "content": "a" }]));
        assert_eq!(value["children"], json!([]));
    }
}
