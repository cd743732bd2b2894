//! Fragment parsing and the `innerHTML` / `outerHTML` setters.
//!
//! [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)

use larch_dom::{DomTree, Namespace, NodeId, NodeType};

use crate::error::StructuralError;
use crate::parser::{
    FragmentContext, HtmlParser, InsertionMode, ParseIssue, ParserOptions, TreeBuilder,
};
use crate::tokenizer::{HtmlTokenizer, LexicalState, TokenSource};

/// The result of parsing a fragment.
///
/// The parsed nodes are the children of [`ParsedFragment::root`], the `html`
/// element the fragment algorithm creates, inside [`ParsedFragment::tree`].
#[derive(Debug)]
pub struct ParsedFragment {
    /// The scratch document the fragment was parsed into.
    pub tree: DomTree,
    /// The `html` element whose children are the fragment's nodes.
    pub root: NodeId,
    /// Parse issues raised while parsing.
    pub issues: Vec<ParseIssue>,
}

impl ParsedFragment {
    /// The top-level nodes produced by the parse, in order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        self.tree.children(self.root)
    }

    /// Copy the fragment's nodes into `target`, appending them to `parent`.
    /// Returns the ids of the copies in `target`.
    pub fn import_into(&self, target: &mut DomTree, parent: NodeId) -> Vec<NodeId> {
        self.nodes()
            .iter()
            .map(|&node| target.import_subtree(&self.tree, node, parent))
            .collect()
    }
}

/// [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#html-fragment-parsing-algorithm)
///
/// "The following steps form the HTML fragment parsing algorithm. The
/// algorithm takes as input an Element node, referred to as the context
/// element, which gives the context for the parser, as well as input, a
/// string to parse, and returns a list of zero or more nodes."
#[must_use]
pub fn parse_fragment(
    html: &str,
    context: &FragmentContext,
    options: ParserOptions,
) -> ParsedFragment {
    let mut builder = TreeBuilder::new(options);

    // STEP 3: "If the node document of the context element is in quirks
    //         mode, then let the Document be in quirks mode. ..."
    builder.tree.set_quirks_mode(context.quirks_mode);

    let context_node = builder.tree.create_element(
        context.namespace,
        &context.local_name,
        context.attributes.clone(),
    );

    // STEP 6: "Let root be the result of creating an element given document,
    //         "html", and the HTML namespace."
    // STEP 7: "Append the element root to the Document node created above."
    let root = builder.tree.create_html_element("html");
    builder.append_node(NodeId::ROOT, root);

    // STEP 8: "Set up the HTML parser's stack of open elements so that it
    //         contains just the single element root."
    builder.open_elements.push(root);
    builder.context_element = Some(context_node);

    let is_html_context = context.namespace == Namespace::Html;

    // STEP 9: "If the context element is a template element, then push "in
    //         template" onto the stack of template insertion modes so that it
    //         is the new current template insertion mode."
    if is_html_context && context.local_name == "template" {
        builder.template_modes.push(InsertionMode::InTemplate);
    }

    // STEP 11: "Reset the parser's insertion mode appropriately."
    builder.reset_insertion_mode_appropriately();

    // STEP 12: "Set the HTML parser's form element pointer to the nearest
    //          node to the context element that is a form element (going
    //          straight up the ancestor chain, and including the element
    //          itself, if it is a form element), if any."
    if is_html_context && context.local_name == "form" {
        builder.form_element = Some(context_node);
    } else if context.form_ancestor {
        builder.form_element = Some(builder.tree.create_html_element("form"));
    }

    log::trace!(
        "fragment parse in <{}> starting in {}",
        context.local_name,
        builder.insertion_mode()
    );

    let mut parser = HtmlParser::with_builder(HtmlTokenizer::new(html), builder);

    // STEP 5: "Set the state of the HTML parser's tokenization stage as
    //         follows, switching on the context element"
    if is_html_context {
        if let Some(state) = initial_lexical_state(&context.local_name, options) {
            parser.source_mut().switch_state(state);
        }
        parser
            .source_mut()
            .set_last_start_tag(Some(&context.local_name));
    }

    let mut builder = parser.finish();
    let issues = builder.take_issues();
    ParsedFragment {
        tree: builder.into_tree(),
        root,
        issues,
    }
}

/// Tokenizer state for an HTML context element, or `None` for the data state.
fn initial_lexical_state(local_name: &str, options: ParserOptions) -> Option<LexicalState> {
    match local_name {
        "title" | "textarea" => Some(LexicalState::Rcdata),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(LexicalState::Rawtext),
        "script" => Some(LexicalState::ScriptData),
        "noscript" if options.scripting_enabled => Some(LexicalState::Rawtext),
        "plaintext" => Some(LexicalState::Plaintext),
        _ => None,
    }
}

/// Describe `element` as a fragment parsing context.
///
/// # Errors
///
/// [`StructuralError::NotInTree`] for an unknown id and
/// [`StructuralError::ContextNotElement`] for a non-element node.
pub fn context_for(tree: &DomTree, element: NodeId) -> Result<FragmentContext, StructuralError> {
    let node = tree.get(element).ok_or(StructuralError::NotInTree(element))?;
    let NodeType::Element(data) = &node.node_type else {
        return Err(StructuralError::ContextNotElement(element));
    };
    let form_ancestor = std::iter::once(element)
        .chain(tree.ancestors(element))
        .any(|node| tree.is_html_element(node, "form"));
    Ok(FragmentContext {
        local_name: data.tag_name.clone(),
        namespace: data.namespace,
        attributes: data.attrs.clone(),
        form_ancestor,
        quirks_mode: tree.quirks_mode(),
    })
}

/// [§ 3.5.7 innerHTML](https://html.spec.whatwg.org/multipage/dynamic-markup-insertion.html#dom-element-innerhtml)
///
/// "Let context be this. Let fragment be the result of invoking the fragment
/// parsing algorithm steps with context and the given value. If context is a
/// template element, then set context to the template element's template
/// contents. Replace all with fragment within context."
///
/// # Errors
///
/// Fails when `element` is not an element in `tree`.
pub fn set_inner_html(
    tree: &mut DomTree,
    element: NodeId,
    html: &str,
    options: ParserOptions,
) -> Result<Vec<ParseIssue>, StructuralError> {
    let context = context_for(tree, element)?;
    let fragment = parse_fragment(html, &context, options);

    let target = tree.template_contents(element).unwrap_or(element);
    for child in tree.children(target).to_vec() {
        tree.remove_child(target, child)?;
    }
    let inserted = fragment.import_into(tree, target);
    log::trace!("innerHTML inserted {} nodes into {target:?}", inserted.len());
    Ok(fragment.issues)
}

/// [§ 3.5.8 outerHTML](https://html.spec.whatwg.org/multipage/dynamic-markup-insertion.html#dom-element-outerhtml)
///
/// Replace `node` with the nodes parsed from `html`, using its parent as the
/// context element. A `DocumentFragment` parent parses in a `body` context.
///
/// # Errors
///
/// [`StructuralError::NoParent`] when `node` is detached and
/// [`StructuralError::ParentIsDocument`] when it is a child of the Document.
pub fn set_outer_html(
    tree: &mut DomTree,
    node: NodeId,
    html: &str,
    options: ParserOptions,
) -> Result<Vec<ParseIssue>, StructuralError> {
    if tree.get(node).is_none() {
        return Err(StructuralError::NotInTree(node));
    }
    // "Let parent be this's parent. If parent is null, return."
    let parent = tree.parent(node).ok_or(StructuralError::NoParent(node))?;

    let context = match tree.get(parent).map(|parent| &parent.node_type) {
        // "If parent is a Document, throw a "NoModificationAllowedError"."
        Some(NodeType::Document) => return Err(StructuralError::ParentIsDocument(node)),
        // "If parent is a DocumentFragment, let parent be a new Element with
        // body as its local name, the HTML namespace as its namespace, and
        // with its node document set to this's node document."
        Some(NodeType::DocumentFragment) => FragmentContext {
            quirks_mode: tree.quirks_mode(),
            ..FragmentContext::html("body")
        },
        _ => context_for(tree, parent)?,
    };
    let fragment = parse_fragment(html, &context, options);

    // "Replace this with fragment within this's parent."
    let staging = tree.create_fragment();
    for copy in fragment.import_into(tree, staging) {
        tree.insert_before(parent, copy, node)?;
    }
    tree.remove_child(parent, node)?;
    Ok(fragment.issues)
}

#[cfg(test)]
mod tests {
    use larch_dom::dump::dump_children;

    use super::*;

    fn dump_fragment(html: &str, context: &FragmentContext) -> String {
        let fragment = parse_fragment(html, context, ParserOptions::new());
        dump_children(&fragment.tree, fragment.root)
    }

    #[test]
    fn test_body_context_has_no_implied_elements() {
        let expected = "\
| <p>
|   \"a\"
| <b>
|   \"b\"
";
        assert_eq!(dump_fragment("<p>a</p><b>b", &FragmentContext::html("body")), expected);
    }

    #[test]
    fn test_textarea_context_is_rcdata() {
        let expected = "| \"<b>x</b>\"\n";
        assert_eq!(
            dump_fragment("<b>x</b>", &FragmentContext::html("textarea")),
            expected
        );
    }

    #[test]
    fn test_tr_context_starts_in_row() {
        let expected = "\
| <td>
|   \"1\"
";
        assert_eq!(dump_fragment("<td>1", &FragmentContext::html("tr")), expected);
    }

    #[test]
    fn test_template_context_accepts_rows() {
        let expected = "\
| <tr>
|   <td>
";
        assert_eq!(
            dump_fragment("<tr><td>", &FragmentContext::html("template")),
            expected
        );
    }

    #[test]
    fn test_svg_context_is_foreign() {
        let expected = "| <svg circle>\n";
        assert_eq!(
            dump_fragment("<circle/>", &FragmentContext::foreign(Namespace::Svg, "svg")),
            expected
        );
    }

    #[test]
    fn test_form_ancestor_ignores_nested_form() {
        let context = FragmentContext {
            form_ancestor: true,
            ..FragmentContext::html("div")
        };
        assert_eq!(dump_fragment("<form><input>", &context), "| <input>\n");
    }
}
