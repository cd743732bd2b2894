//! The "initial", "before html" and "before head" insertion modes.

use larch_dom::{DoctypeData, Namespace, NodeId, QuirksMode};

use crate::parser::core::TreeBuilder;
use crate::parser::insertion_mode::InsertionMode;
use crate::parser::issue::ParseIssueKind;
use crate::parser::quirks::{is_doctype_error, quirks_mode_for_doctype};
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(crate) fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            t if t.is_whitespace() => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment_in(data, NodeId::ROOT),

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                let name = name.as_deref();
                let public_id = public_identifier.as_deref();
                let system_id = system_identifier.as_deref();
                if is_doctype_error(name, public_id, system_id) {
                    self.parse_error(ParseIssueKind::Doctype, format!("non-conforming {token}"));
                }

                // "Append a DocumentType node to the Document node, with its
                // name set to the name given in the DOCTYPE token, or the
                // empty string if the name was missing; its public ID set to
                // the public identifier given in the DOCTYPE token, or the
                // empty string if the public identifier was missing; and its
                // system ID set to the system identifier given in the DOCTYPE
                // token, or the empty string if the system identifier was
                // missing."
                let doctype = self.tree.create_doctype(DoctypeData {
                    name: name.unwrap_or_default().to_string(),
                    public_id: public_id.unwrap_or_default().to_string(),
                    system_id: system_id.unwrap_or_default().to_string(),
                });
                self.append_node(NodeId::ROOT, doctype);

                // "Then, if the document is not an iframe srcdoc document, and
                // the parser cannot change the mode flag is false, and the
                // DOCTYPE token matches one of the conditions in the following
                // list, then set the Document to quirks mode"
                if !self.options.iframe_srcdoc {
                    let mode = quirks_mode_for_doctype(name, public_id, system_id, *force_quirks);
                    self.tree.set_quirks_mode(mode);
                }

                // "Then, switch the insertion mode to "before html"."
                self.switch_to(InsertionMode::BeforeHtml);
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is
            // a parse error; if the parser cannot change the mode flag is
            // false, set the Document to quirks mode. In any case, switch the
            // insertion mode to "before html", then reprocess the token."
            _ => {
                if !self.options.iframe_srcdoc {
                    self.parse_error(ParseIssueKind::Doctype, "missing DOCTYPE");
                    self.tree.set_quirks_mode(QuirksMode::Quirks);
                }
                self.switch_to(InsertionMode::BeforeHtml);
                self.dispatch(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(crate) fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.ignore_token(token),

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment_in(data, NodeId::ROOT),

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            t if t.is_whitespace() => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document
            // object. Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let html = self.create_element(name, attributes, Namespace::Html);
                self.append_node(NodeId::ROOT, html);
                self.open_elements.push(html);
                self.switch_to(InsertionMode::BeforeHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_html_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.ignore_token(token),

            // "Anything else"
            _ => self.before_html_anything_else(token),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess
    /// the token."
    fn before_html_anything_else(&mut self, token: &Token) {
        let html = self.tree.create_html_element("html");
        self.append_node(NodeId::ROOT, html);
        self.open_elements.push(html);
        self.switch_to(InsertionMode::BeforeHead);
        self.dispatch(token);
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(crate) fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            t if t.is_whitespace() => {}

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.ignore_token(token),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                let head = self.insert_html_element(name, attributes);
                self.head_element = Some(head);
                self.switch_to(InsertionMode::InHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_head_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.ignore_token(token),

            // "Anything else"
            _ => self.before_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "head" start tag token with no
    /// attributes. Set the head element pointer to the newly created head
    /// element. Switch the insertion mode to "in head". Reprocess the current
    /// token."
    fn before_head_anything_else(&mut self, token: &Token) {
        let head = self.insert_implied_element("head");
        self.head_element = Some(head);
        self.switch_to(InsertionMode::InHead);
        self.dispatch(token);
    }
}
