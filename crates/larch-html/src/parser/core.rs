use std::collections::HashMap;

use larch_dom::{AttributeList, DomTree, Namespace, NodeId, NodeType, QuirksMode};

use super::foreign_content::{is_html_integration_point, is_mathml_text_integration_point};
use super::formatting::{ActiveFormattingElements, FormattingEntry};
use super::insertion_mode::InsertionMode;
use super::issue::{ParseIssue, ParseIssueKind};
use super::open_elements::{Scope, StackOfOpenElements};
use super::options::ParserOptions;
use super::tags::{IMPLIED_END_TAGS, IMPLIED_END_TAGS_THOROUGH};
use crate::tokenizer::{
    Attribute, HtmlTokenizer, LexicalState, Token, TokenSource, TokenizerError,
};

/// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
///
/// An adjusted insertion location: inside `parent`, before `before` or after
/// its last child when `before` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertionPoint {
    pub(crate) parent: NodeId,
    pub(crate) before: Option<NodeId>,
}

impl InsertionPoint {
    const fn append_to(parent: NodeId) -> Self {
        Self {
            parent,
            before: None,
        }
    }
}

/// Callback receiving every parse issue as it is raised.
pub type IssueSink = Box<dyn FnMut(&ParseIssue)>;

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The tree construction stage. Consumes tokens one at a time through
/// [`TreeBuilder::process_token`] and builds a [`DomTree`].
///
/// All mutable parser state lives here, so independent parses never share
/// anything.
pub struct TreeBuilder {
    /// The document being built. `NodeId::ROOT` is the Document node.
    pub(crate) tree: DomTree,

    pub(crate) options: ParserOptions,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(crate) mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// Set when switching to "text" or "in table text", restored when leaving.
    pub(crate) original_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(crate) template_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(crate) open_elements: StackOfOpenElements,

    /// [§ 13.2.4.4 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(crate) active_formatting: ActiveFormattingElements,

    /// The start tag each formatting element was created for, so the
    /// element can be recreated "as if freshly parsed" by reconstruction and
    /// the adoption agency algorithm.
    pub(crate) origin: HashMap<NodeId, Token>,

    /// [§ 13.2.4.5 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#head-element-pointer)
    pub(crate) head_element: Option<NodeId>,

    /// [§ 13.2.4.5](https://html.spec.whatwg.org/multipage/parsing.html#form-element-pointer)
    pub(crate) form_element: Option<NodeId>,

    /// [§ 13.2.4.6 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// Starts "ok"; only ever set to "not ok".
    pub(crate) frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(crate) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    pub(crate) pending_table_characters: Vec<char>,

    /// Drop the next token if it is a single U+000A LINE FEED character
    /// (after `pre`, `listing` and `textarea` start tags).
    pub(crate) skip_next_newline: bool,

    /// [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#concept-frag-parse-context)
    ///
    /// The context element of a fragment parse.
    pub(crate) context_element: Option<NodeId>,

    stopped: bool,
    token_index: usize,
    issues: Vec<ParseIssue>,
    issue_sink: Option<IssueSink>,
    tokenizer_directive: Option<LexicalState>,
}

impl TreeBuilder {
    /// Create a tree builder for a new, empty document.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            tree: DomTree::new(),
            options,
            mode: InsertionMode::Initial,
            original_mode: None,
            template_modes: Vec::new(),
            open_elements: StackOfOpenElements::new(),
            active_formatting: ActiveFormattingElements::new(),
            origin: HashMap::new(),
            head_element: None,
            form_element: None,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_characters: Vec::new(),
            skip_next_newline: false,
            context_element: None,
            stopped: false,
            token_index: 0,
            issues: Vec::new(),
            issue_sink: None,
            tokenizer_directive: None,
        }
    }

    /// Install a callback that observes every parse issue.
    pub fn set_issue_sink(&mut self, sink: IssueSink) {
        self.issue_sink = Some(sink);
    }

    /// The document built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Consume the builder, returning the document.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// Parse issues collected so far.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Take the collected parse issues.
    pub fn take_issues(&mut self) -> Vec<ParseIssue> {
        std::mem::take(&mut self.issues)
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.mode
    }

    /// Whether the frameset-ok flag is still "ok".
    #[must_use]
    pub const fn frameset_ok(&self) -> bool {
        self.frameset_ok
    }

    /// Number of elements on the stack of open elements.
    #[must_use]
    pub fn open_element_count(&self) -> usize {
        self.open_elements.len()
    }

    /// Whether [`TreeBuilder::stop_parsing`] has run.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The lexical state the tokenizer must switch to before producing the
    /// next token, if the last token requested one.
    pub const fn take_tokenizer_directive(&mut self) -> Option<LexicalState> {
        self.tokenizer_directive.take()
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace, then switch to the CDATA section state."
    #[must_use]
    pub fn cdata_allowed(&self) -> bool {
        self.adjusted_current_node()
            .and_then(|node| self.tree.as_element(node))
            .is_some_and(|element| element.namespace != Namespace::Html)
    }

    /// Record a tokenizer error as a parse issue.
    pub fn tokenizer_issue(&mut self, error: &TokenizerError) {
        self.parse_error(
            ParseIssueKind::Tokenizer,
            format!("{} at offset {}", error.code, error.position),
        );
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must
    /// follow the appropriate steps from the following list, known as the
    /// tree construction dispatcher"
    pub fn process_token(&mut self, token: &Token) {
        if self.stopped {
            return;
        }
        // "If the next token is a U+000A LINE FEED (LF) character token, then
        // ignore that token and move on to the next one."
        let skip_newline = std::mem::take(&mut self.skip_next_newline);
        if !(skip_newline && matches!(token, Token::Character { data: '\n' })) {
            self.dispatch(token);
        }
        self.token_index += 1;
    }

    /// [§ 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Chooses between the current insertion mode and the rules for parsing
    /// tokens in foreign content.
    pub(crate) fn dispatch(&mut self, token: &Token) {
        if self.uses_insertion_mode_rules(token) {
            self.process_using_mode(self.mode, token);
        } else {
            self.process_in_foreign_content(token);
        }
    }

    fn uses_insertion_mode_rules(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(node) = self.adjusted_current_node() else {
            return true;
        };
        let Some(element) = self.tree.as_element(node) else {
            return true;
        };
        // "If the adjusted current node is an element in the HTML namespace"
        if element.namespace == Namespace::Html {
            return true;
        }
        // "If the adjusted current node is a MathML text integration point and
        // the token is a start tag whose tag name is neither "mglyph" nor
        // "malignmark"" / "... and the token is a character token"
        if is_mathml_text_integration_point(element) {
            match token {
                Token::StartTag { name, .. } if name != "mglyph" && name != "malignmark" => {
                    return true;
                }
                Token::Character { .. } => return true,
                _ => {}
            }
        }
        // "If the adjusted current node is a MathML annotation-xml element and
        // the token is a start tag whose tag name is "svg""
        if element.is(Namespace::MathMl, "annotation-xml") && token.is_start_tag("svg") {
            return true;
        }
        // "If the adjusted current node is an HTML integration point and the
        // token is a start tag" / "... and the token is a character token"
        if is_html_integration_point(element)
            && matches!(token, Token::StartTag { .. } | Token::Character { .. })
        {
            return true;
        }
        // "If the token is an end-of-file token"
        token.is_eof()
    }

    /// "Process the token using the rules for the X insertion mode"
    pub(crate) fn process_using_mode(&mut self, mode: InsertionMode, token: &Token) {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// Switch the insertion mode.
    pub(crate) fn switch_to(&mut self, mode: InsertionMode) {
        if self.mode != mode {
            log::trace!("insertion mode {} -> {mode}", self.mode);
        }
        self.mode = mode;
    }

    /// Ask the tokenizer to switch lexical state before the next token.
    pub(crate) const fn switch_tokenizer(&mut self, state: LexicalState) {
        self.tokenizer_directive = Some(state);
    }

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub fn stop_parsing(&mut self) {
        log::trace!("stop parsing after {} tokens", self.token_index);
        self.open_elements.truncate(0);
        self.stopped = true;
    }

    /// Report a parse error. Parsing always continues.
    pub(crate) fn parse_error(&mut self, kind: ParseIssueKind, message: impl Into<String>) {
        let issue = ParseIssue {
            message: message.into(),
            token_index: self.token_index,
            kind,
        };
        log::debug!("parse error: {issue}");
        if let Some(sink) = self.issue_sink.as_mut() {
            sink(&issue);
        }
        if self.options.collect_issues {
            self.issues.push(issue);
        }
    }

    /// Report a token the current mode ignores.
    pub(crate) fn ignore_token(&mut self, token: &Token) {
        self.parse_error(
            ParseIssueKind::IgnoredToken,
            format!("{token} ignored in {}", self.mode),
        );
    }

    /// Report a token that forced the tree to be repaired.
    pub(crate) fn unexpected_token(&mut self, token: &Token) {
        self.parse_error(
            ParseIssueKind::UnexpectedToken,
            format!("unexpected {token} in {}", self.mode),
        );
    }

    // ===== Node access =====

    /// "The current node is the bottommost node in this stack of open elements."
    pub(crate) fn current_node(&self) -> Option<NodeId> {
        self.open_elements.current()
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(crate) fn adjusted_current_node(&self) -> Option<NodeId> {
        match self.context_element {
            Some(context) if self.open_elements.len() == 1 => Some(context),
            _ => self.current_node(),
        }
    }

    /// Tag name of the current node if it is an HTML element.
    pub(crate) fn current_html_tag(&self) -> Option<&str> {
        self.current_node()
            .and_then(|node| self.tree.as_element(node))
            .filter(|element| element.namespace == Namespace::Html)
            .map(|element| element.tag_name.as_str())
    }

    /// Whether the current node is the HTML element `tag_name`.
    pub(crate) fn current_node_is(&self, tag_name: &str) -> bool {
        self.current_html_tag() == Some(tag_name)
    }

    /// Whether the current node is an HTML element named in `tag_names`.
    pub(crate) fn current_node_is_one_of(&self, tag_names: &[&str]) -> bool {
        self.current_html_tag()
            .is_some_and(|tag| tag_names.contains(&tag))
    }

    /// Whether an HTML element `tag_name` is in the given scope.
    pub(crate) fn in_scope(&self, tag_name: &str, scope: Scope) -> bool {
        self.open_elements.has_in_scope(&self.tree, tag_name, scope)
    }

    /// Whether any HTML element named in `tag_names` is in the given scope.
    pub(crate) fn any_in_scope(&self, tag_names: &[&str], scope: Scope) -> bool {
        self.open_elements
            .has_any_in_scope(&self.tree, tag_names, scope)
    }

    /// Whether a `template` element is on the stack of open elements.
    pub(crate) fn has_template_on_stack(&self) -> bool {
        self.open_elements.contains_html(&self.tree, "template")
    }

    /// Pop until an HTML element `tag_name` has been popped.
    pub(crate) fn pop_until(&mut self, tag_name: &str) {
        self.open_elements.pop_until(&self.tree, tag_name);
    }

    /// Pop until an HTML element named in `tag_names` has been popped.
    pub(crate) fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        self.open_elements.pop_until_any(&self.tree, tag_names);
    }

    // ===== Creating and inserting nodes =====

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target"
    pub(crate) fn appropriate_place(&self, override_target: Option<NodeId>) -> InsertionPoint {
        // STEP 1: "If there was an override target specified, then let target
        //          be the override target. Otherwise, let target be the
        //          current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "Determine the adjusted insertion location"
        let is_table_part = self.tree.as_element(target).is_some_and(|element| {
            element.namespace == Namespace::Html
                && matches!(
                    element.tag_name.as_str(),
                    "table" | "tbody" | "tfoot" | "thead" | "tr"
                )
        });
        let point = if self.foster_parenting && is_table_part {
            self.foster_parent_place()
        } else {
            InsertionPoint::append_to(target)
        };

        // STEP 3: "If the adjusted insertion location is inside a template
        //          element, let it instead be inside the template element's
        //          template contents, after its last child (if any)."
        match self.tree.template_contents(point.parent) {
            Some(contents) => InsertionPoint::append_to(contents),
            None => point,
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// The foster parenting branch of the appropriate place for inserting a
    /// node.
    fn foster_parent_place(&self) -> InsertionPoint {
        let stack = self.open_elements.as_slice();
        // "Let last template be the last template element in the stack of open
        //  elements, if any."
        let last_template = stack
            .iter()
            .rposition(|&node| self.tree.is_html_element(node, "template"));
        // "Let last table be the last table element in the stack of open
        //  elements, if any."
        let last_table = stack
            .iter()
            .rposition(|&node| self.tree.is_html_element(node, "table"));

        // "If there is a last template and either there is no last table, or
        //  there is one, but last template is lower (more recently added) than
        //  last table in the stack of open elements, then: let adjusted
        //  insertion location be inside last template's template contents"
        if let Some(template_index) = last_template
            && last_table.is_none_or(|table_index| template_index > table_index)
        {
            let template = stack[template_index];
            let contents = self.tree.template_contents(template).unwrap_or(template);
            return InsertionPoint::append_to(contents);
        }

        // "If there is no last table, then let adjusted insertion location be
        //  inside the first element in the stack of open elements (the html
        //  element), after its last child (if any)." (fragment case)
        let Some(table_index) = last_table else {
            return InsertionPoint::append_to(self.open_elements.top().unwrap_or(NodeId::ROOT));
        };
        let table = stack[table_index];

        // "If last table has a parent node, then let adjusted insertion
        //  location be inside last table's parent node, immediately before last
        //  table"
        if let Some(parent) = self.tree.parent(table) {
            return InsertionPoint {
                parent,
                before: Some(table),
            };
        }

        // "Let previous element be the element immediately above last table in
        //  the stack of open elements."
        let previous = table_index
            .checked_sub(1)
            .map_or(NodeId::ROOT, |index| stack[index]);
        InsertionPoint::append_to(previous)
    }

    /// Insert a detached node at an adjusted insertion location.
    pub(crate) fn insert_at(&mut self, point: InsertionPoint, node: NodeId) {
        match point.before {
            Some(reference) => {
                if self.tree.insert_before(point.parent, node, reference).is_err() {
                    self.append_node(point.parent, node);
                }
            }
            None => self.append_node(point.parent, node),
        }
    }

    /// Append `node` as the last child of `parent`, logging a rejected append.
    pub(crate) fn append_node(&mut self, parent: NodeId, node: NodeId) {
        if let Err(error) = self.tree.append_child(parent, node) {
            log::warn!("tree builder append rejected: {error}");
        }
    }

    /// [§ 13.2.6.1 Create an element for the token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// No custom element definitions and no form association: the element is
    /// created with the token's local name and attributes.
    pub(crate) fn create_element(
        &mut self,
        tag_name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
    ) -> NodeId {
        let attrs: AttributeList = attributes.iter().cloned().collect();
        self.tree.create_element(namespace, tag_name, attrs)
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "1. Let the adjusted insertion location be the appropriate place for
    ///     inserting a node.
    ///  2. Let element be the result of creating an element for the token in
    ///     the given namespace, with the intended parent being the element in
    ///     which the adjusted insertion location finds itself.
    ///  3. If onlyAddToElementStack is false, then run insert an element at
    ///     the adjusted insertion location with element.
    ///  4. Push element onto the stack of open elements so that it is the new
    ///     current node.
    ///  5. Return element."
    pub(crate) fn insert_foreign_element(
        &mut self,
        tag_name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
        only_add_to_element_stack: bool,
    ) -> NodeId {
        let point = self.appropriate_place(None);
        let element = self.create_element(tag_name, attributes, namespace);
        if !only_add_to_element_stack {
            self.insert_at(point, element);
        }
        self.open_elements.push(element);
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the
    /// token, with the HTML namespace and false."
    pub(crate) fn insert_html_element(&mut self, tag_name: &str, attributes: &[Attribute]) -> NodeId {
        self.insert_foreign_element(tag_name, attributes, Namespace::Html, false)
    }

    /// Insert an HTML element with no attributes, for tags the parser implies.
    pub(crate) fn insert_implied_element(&mut self, tag_name: &str) -> NodeId {
        self.insert_html_element(tag_name, &[])
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(crate) fn insert_character(&mut self, c: char) {
        // STEP 2: "Let the adjusted insertion location be the appropriate
        //          place for inserting a node."
        let point = self.appropriate_place(None);

        // STEP 3: "If the adjusted insertion location is inside a Document
        //          node, then ignore the token."
        if matches!(
            self.tree.get(point.parent).map(|node| &node.node_type),
            Some(NodeType::Document)
        ) {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        //          insertion location, then append data to that Text node's
        //          data."
        let previous = match point.before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(point.parent),
        };
        if let Some(previous) = previous
            && let Some(node) = self.tree.get_mut(previous)
            && let NodeType::Text(text) = &mut node.node_type
        {
            text.push(c);
            return;
        }

        // "Otherwise, create a new Text node whose data is data and whose node
        //  document is the same as that of the element in which the adjusted
        //  insertion location finds itself, and insert the newly created node
        //  at the adjusted insertion location."
        let text = self.tree.create_text(c.to_string());
        self.insert_at(point, text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(crate) fn insert_comment(&mut self, data: &str) {
        let point = self.appropriate_place(None);
        let comment = self.tree.create_comment(data);
        self.insert_at(point, comment);
    }

    /// Insert a comment as the last child of `parent` ("insert a comment as
    /// the last child of the Document object" and friends).
    pub(crate) fn insert_comment_in(&mut self, data: &str, parent: NodeId) {
        let comment = self.tree.create_comment(data);
        self.append_node(parent, comment);
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
    ///
    /// "1. Insert an HTML element for the token.
    ///  2. If the algorithm that was invoked is the generic raw text element
    ///     parsing algorithm, switch the tokenizer to the RAWTEXT state;
    ///     otherwise the algorithm invoked was the generic RCDATA element
    ///     parsing algorithm, switch the tokenizer to the RCDATA state.
    ///  3. Set the original insertion mode to the current insertion mode.
    ///  4. Then, switch the insertion mode to "text"."
    pub(crate) fn parse_text_element(
        &mut self,
        tag_name: &str,
        attributes: &[Attribute],
        state: LexicalState,
    ) {
        let _ = self.insert_html_element(tag_name, attributes);
        self.switch_tokenizer(state);
        self.original_mode = Some(self.mode);
        self.switch_to(InsertionMode::Text);
    }

    // ===== Closing elements =====

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    ///
    /// `except` is the element the caller is about to close explicitly.
    pub(crate) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        self.pop_while_current_in(IMPLIED_END_TAGS, except);
    }

    /// "generate all implied end tags thoroughly"
    pub(crate) fn generate_implied_end_tags_thoroughly(&mut self) {
        self.pop_while_current_in(IMPLIED_END_TAGS_THOROUGH, None);
    }

    fn pop_while_current_in(&mut self, tag_names: &[&str], except: Option<&str>) {
        loop {
            let Some(tag) = self.current_html_tag() else {
                break;
            };
            if !tag_names.contains(&tag) || except == Some(tag) {
                break;
            }
            let _ = self.open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current node
    /// is not a p element, then this is a parse error. Pop elements from the
    /// stack of open elements until a p element has been popped from the
    /// stack."
    pub(crate) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error(ParseIssueKind::UnclosedElement, "p closed with open children");
        }
        self.pop_until("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(crate) fn close_p_if_in_button_scope(&mut self) {
        if self.in_scope("p", Scope::Button) {
            self.close_p_element();
        }
    }

    /// Pop elements until `tag_name` is popped, after generating implied end
    /// tags. Used by the end tag branches of the table modes.
    pub(crate) fn close_element_with_implied_end_tags(&mut self, tag_name: &str) {
        self.generate_implied_end_tags(None);
        if !self.current_node_is(tag_name) {
            self.parse_error(
                ParseIssueKind::UnclosedElement,
                format!("{tag_name} closed with open children"),
            );
        }
        self.pop_until(tag_name);
    }

    // ===== The list of active formatting elements =====

    /// [§ 13.2.4.4 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// Records the originating token before pushing.
    pub(crate) fn push_formatting_element(&mut self, node: NodeId, token: &Token) {
        let _ = self.origin.insert(node, token.clone());
        if let Some(evicted) = self.active_formatting.push(&self.tree, node, &self.origin) {
            let _ = self.origin.remove(&evicted);
        }
    }

    /// Remove `node` from the list of active formatting elements, returning
    /// the index it occupied.
    pub(crate) fn remove_formatting_element(&mut self, node: NodeId) -> Option<usize> {
        let _ = self.origin.remove(&node);
        self.active_formatting.remove(node)
    }

    /// [§ 13.2.4.4 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(crate) fn clear_formatting_to_last_marker(&mut self) {
        self.active_formatting.clear_to_last_marker();
        let formatting = &self.active_formatting;
        self.origin.retain(|&node, _| formatting.contains(node));
    }

    /// "Create an element for the token for which the element entry was
    /// created". The new element is not inserted anywhere, and the token
    /// moves from `entry` to the new element.
    pub(crate) fn recreate_formatting_element(&mut self, entry: NodeId) -> NodeId {
        let token = self.origin.remove(&entry);
        let created = match &token {
            Some(Token::StartTag {
                name, attributes, ..
            }) => self.create_element(name, attributes, Namespace::Html),
            _ => self.tree.clone_node_shallow(entry).unwrap_or(entry),
        };
        if let Some(token) = token {
            let _ = self.origin.insert(created, token);
        }
        created
    }

    /// [§ 13.2.4.4 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct; stop this
        //          algorithm."
        if self.active_formatting.is_empty() {
            return;
        }

        // STEP 2: "If the last (most recently added) entry in the list of
        //          active formatting elements is a marker, or if it is an
        //          element that is in the stack of open elements, then there
        //          is nothing to reconstruct; stop this algorithm."
        let Some(FormattingEntry::Element(last)) = self.active_formatting.last() else {
            return;
        };
        if self.open_elements.contains(last) {
            return;
        }

        // STEP 3-6 (Rewind): "If there are no entries before entry in the
        //          list of active formatting elements, then jump to the step
        //          labeled create. Let entry be the entry one earlier than
        //          entry in the list of active formatting elements. If entry
        //          is neither a marker nor an element that is also in the stack
        //          of open elements, go to the step labeled rewind."
        let mut index = self.active_formatting.len() - 1;
        while index > 0 {
            match self.active_formatting.get(index - 1) {
                Some(FormattingEntry::Element(node)) if !self.open_elements.contains(node) => {
                    index -= 1;
                }
                _ => break,
            }
        }

        // STEP 7-10 (Advance / Create): "Insert an HTML element for the token
        //          for which the element entry was created, to obtain new
        //          element. Replace the entry for entry in the list with an
        //          entry for new element. If the entry for new element in the
        //          list of active formatting elements is not the last entry in
        //          the list, return to the step labeled advance."
        for position in index..self.active_formatting.len() {
            let Some(FormattingEntry::Element(entry)) = self.active_formatting.get(position) else {
                continue;
            };
            let element = self.recreate_formatting_element(entry);
            let point = self.appropriate_place(None);
            self.insert_at(point, element);
            self.open_elements.push(element);
            self.active_formatting.set(position, element);
        }
    }

    // ===== Insertion mode bookkeeping =====

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(crate) fn reset_insertion_mode_appropriately(&mut self) {
        let stack = self.open_elements.as_slice().to_vec();
        for (index, &entry) in stack.iter().enumerate().rev() {
            // "If node is the first node in the stack of open elements, then
            //  set last to true, and, if the parser was created as part of the
            //  HTML fragment parsing algorithm (fragment case), set node to the
            //  context element passed to that algorithm."
            let last = index == 0;
            let node = if last {
                self.context_element.unwrap_or(entry)
            } else {
                entry
            };
            let tag = self
                .tree
                .as_element(node)
                .filter(|element| element.namespace == Namespace::Html)
                .map(|element| element.tag_name.clone());

            let mode = match tag.as_deref() {
                // "If node is a select element, run these substeps"
                Some("select") => {
                    let mut mode = InsertionMode::InSelect;
                    if !last {
                        for &ancestor in stack[..index].iter().rev() {
                            if self.tree.is_html_element(ancestor, "template") {
                                break;
                            }
                            if self.tree.is_html_element(ancestor, "table") {
                                mode = InsertionMode::InSelectInTable;
                                break;
                            }
                        }
                    }
                    Some(mode)
                }
                Some("td" | "th") if !last => Some(InsertionMode::InCell),
                Some("tr") => Some(InsertionMode::InRow),
                Some("tbody" | "thead" | "tfoot") => Some(InsertionMode::InTableBody),
                Some("caption") => Some(InsertionMode::InCaption),
                Some("colgroup") => Some(InsertionMode::InColumnGroup),
                Some("table") => Some(InsertionMode::InTable),
                // "If node is a template element, then switch the insertion
                //  mode to the current template insertion mode and return."
                Some("template") => self.template_modes.last().copied(),
                Some("head") if !last => Some(InsertionMode::InHead),
                Some("body") => Some(InsertionMode::InBody),
                Some("frameset") => Some(InsertionMode::InFrameset),
                // "If node is an html element, run these substeps: If the head
                //  element pointer is null, switch the insertion mode to
                //  "before head" and return. (fragment case) Otherwise, the
                //  head element pointer is not null, switch the insertion mode
                //  to "after head" and return."
                Some("html") => Some(if self.head_element.is_none() {
                    InsertionMode::BeforeHead
                } else {
                    InsertionMode::AfterHead
                }),
                _ if last => Some(InsertionMode::InBody),
                _ => None,
            };
            if let Some(mode) = mode {
                self.switch_to(mode);
                return;
            }
        }
        self.switch_to(InsertionMode::InBody);
    }

    /// The document's quirks mode.
    pub(crate) const fn quirks_mode(&self) -> QuirksMode {
        self.tree.quirks_mode()
    }
}

/// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
///
/// Drives a [`TreeBuilder`] from a [`TokenSource`], relaying lexical state
/// switches back to the tokenizer between tokens.
pub struct HtmlParser<S: TokenSource = HtmlTokenizer> {
    source: S,
    builder: TreeBuilder,
}

impl HtmlParser<HtmlTokenizer> {
    /// Create a parser over markup.
    #[must_use]
    pub fn new(input: &str, options: ParserOptions) -> Self {
        Self::from_source(HtmlTokenizer::new(input), options)
    }
}

impl<S: TokenSource> HtmlParser<S> {
    /// Create a parser over an arbitrary token source.
    #[must_use]
    pub fn from_source(source: S, options: ParserOptions) -> Self {
        Self {
            source,
            builder: TreeBuilder::new(options),
        }
    }

    /// Create a parser around an already configured tree builder.
    pub(crate) const fn with_builder(source: S, builder: TreeBuilder) -> Self {
        Self { source, builder }
    }

    /// Install a callback that observes every parse issue as it is raised.
    #[must_use]
    pub fn with_issue_sink(mut self, sink: IssueSink) -> Self {
        self.builder.set_issue_sink(sink);
        self
    }

    /// Mutable access to the token source.
    pub(crate) const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Pull tokens until parsing stops.
    fn drive(&mut self) {
        while !self.builder.is_stopped() {
            self.source.set_cdata_allowed(self.builder.cdata_allowed());
            let token = self.source.next_token();
            for error in self.source.drain_errors() {
                self.builder.tokenizer_issue(&error);
            }
            self.builder.process_token(&token);
            if let Some(state) = self.builder.take_tokenizer_directive() {
                self.source.switch_state(state);
            }
            if token.is_eof() && !self.builder.is_stopped() {
                self.builder.stop_parsing();
            }
        }
    }

    /// Run the parser to completion and return the document.
    #[must_use]
    pub fn run(mut self) -> DomTree {
        self.drive();
        self.builder.into_tree()
    }

    /// Run the parser and return the document with every parse issue.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        self.drive();
        let issues = self.builder.take_issues();
        (self.builder.into_tree(), issues)
    }

    /// Run the parser and return the finished builder.
    pub(crate) fn finish(mut self) -> TreeBuilder {
        self.drive();
        self.builder
    }
}
