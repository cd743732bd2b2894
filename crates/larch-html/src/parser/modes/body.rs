//! The "in body" insertion mode.

use larch_dom::{Namespace, NodeId, QuirksMode};

use crate::parser::core::TreeBuilder;
use crate::parser::foreign_content::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
};
use crate::parser::insertion_mode::InsertionMode;
use crate::parser::issue::ParseIssueKind;
use crate::parser::open_elements::Scope;
use crate::parser::tags::{HEADINGS, is_formatting, is_special};
use crate::tokenizer::{Attribute, LexicalState, Token};

/// Elements that may stay open at the end of the body without a parse error.
const MAY_REMAIN_OPEN: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr", "body", "html",
];

impl TreeBuilder {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(crate) fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.ignore_token(token),

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            Token::Character { data } if token.is_whitespace() => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
            }

            // "Any other character token"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.ignore_token(token),

            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.in_body_start_tag(token, name, attributes, *self_closing),

            Token::EndTag { name } => self.in_body_end_tag(token, name),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_modes.is_empty() {
                    self.process_using_mode(InsertionMode::InTemplate, token);
                    return;
                }
                // "Otherwise, follow these steps: If there is a node in the
                // stack of open elements that is not either a dd element, a dt
                // element, an li element, an optgroup element, an option
                // element, a p element, an rb element, an rp element, an rt
                // element, an rtc element, a tbody element, a td element, a
                // tfoot element, a th element, a thead element, a tr element,
                // the body element, or the html element, then this is a parse
                // error."
                self.report_unclosed_elements();
                // "Stop parsing."
                self.stop_parsing();
            }
        }
    }

    fn report_unclosed_elements(&mut self) {
        let unclosed = self.open_elements.iter().any(|&node| {
            self.tree.as_element(node).is_some_and(|element| {
                element.namespace != Namespace::Html
                    || !MAY_REMAIN_OPEN.contains(&element.tag_name.as_str())
            })
        });
        if unclosed {
            self.parse_error(ParseIssueKind::UnclosedElement, "elements left open at end of body");
        }
    }

    /// Add every attribute of the token that is not already present on `node`.
    fn merge_attributes(&mut self, node: NodeId, attributes: &[Attribute]) {
        if let Some(element) = self.tree.as_element_mut(node) {
            for attr in attributes {
                let _ = element.attrs.set_if_absent(attr.clone());
            }
        }
    }

    #[allow(clippy::cognitive_complexity)]
    fn in_body_start_tag(
        &mut self,
        token: &Token,
        name: &str,
        attributes: &[Attribute],
        self_closing: bool,
    ) {
        match name {
            // "A start tag whose tag name is "html""
            // "Parse error. If there is a template element on the stack of open
            // elements, then ignore the token. Otherwise, for each attribute
            // on the token, check to see if the attribute is already present
            // on the top element of the stack of open elements. If it is not,
            // add the attribute and its corresponding value to that element."
            "html" => {
                self.unexpected_token(token);
                if self.has_template_on_stack() {
                    return;
                }
                if let Some(html) = self.open_elements.top() {
                    self.merge_attributes(html, attributes);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title" => self.process_using_mode(InsertionMode::InHead, token),

            // "A start tag whose tag name is "body""
            "body" => {
                // "Parse error."
                self.unexpected_token(token);
                // "If the second element on the stack of open elements is not a
                // body element, if the stack of open elements has only one node
                // on it, or if there is a template element on the stack of open
                // elements, then ignore the token. (fragment case or there is a
                // template element on the stack)"
                let Some(body) = self.open_elements.get(1) else {
                    return;
                };
                if !self.tree.is_html_element(body, "body") || self.has_template_on_stack() {
                    return;
                }
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for
                // each attribute on the token, check to see if the attribute is
                // already present on the body element (the second element) on
                // the stack of open elements, and if it is not, add the
                // attribute and its corresponding value to that element."
                self.frameset_ok = false;
                self.merge_attributes(body, attributes);
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                // "Parse error."
                self.unexpected_token(token);
                // "If the stack of open elements has only one node on it, or if
                // the second element on the stack of open elements is not a
                // body element, then ignore the token. (fragment case or there
                // is a template element on the stack)"
                let Some(body) = self.open_elements.get(1) else {
                    return;
                };
                if !self.tree.is_html_element(body, "body") {
                    return;
                }
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                if !self.frameset_ok {
                    return;
                }
                // "Otherwise, run the following steps:
                // 1. Remove the second element on the stack of open elements
                //    from its parent node, if it has one.
                // 2. Pop all the nodes from the bottom of the stack of open
                //    elements, from the current node up to, but not including,
                //    the root html element.
                // 3. Insert an HTML element for the token.
                // 4. Switch the insertion mode to "in frameset"."
                self.tree.detach(body);
                self.open_elements.truncate(1);
                let _ = self.insert_html_element(name, attributes);
                self.switch_to(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "center", "details", "dialog", "dir",
            // "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "main", "menu", "nav", "ol", "p", "search",
            // "section", "summary", "ul""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            "address" | "article" | "aside" | "blockquote" | "center" | "details" | "dialog"
            | "dir" | "div" | "dl" | "fieldset" | "figcaption" | "figure" | "footer" | "header"
            | "hgroup" | "main" | "menu" | "nav" | "ol" | "p" | "search" | "section" | "summary"
            | "ul" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "If the current node is an HTML element whose tag name is one of
            // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
            // error; pop the current node off the stack of open elements."
            // "Insert an HTML element for the token."
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.close_p_if_in_button_scope();
                if self.current_node_is_one_of(HEADINGS) {
                    self.unexpected_token(token);
                    let _ = self.open_elements.pop();
                }
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            // "If the next token is a U+000A LINE FEED (LF) character token,
            // then ignore that token and move on to the next one. (Newlines at
            // the start of pre blocks are ignored as an authoring
            // convenience.)"
            // "Set the frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this is
                // a parse error; ignore the token."
                let has_template = self.has_template_on_stack();
                if self.form_element.is_some() && !has_template {
                    self.ignore_token(token);
                    return;
                }
                // "Otherwise: If the stack of open elements has a p element in
                // button scope, then close a p element. Insert an HTML element
                // for the token, and, if there is no template element on the
                // stack of open elements, set the form element pointer to point
                // to the element created."
                self.close_p_if_in_button_scope();
                let form = self.insert_html_element(name, attributes);
                if !has_template {
                    self.form_element = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            "li" => {
                // "1. Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // "2-5. Initialize node to be the current node... Loop: If node
                // is an li element, then run these substeps: Generate implied
                // end tags, except for li elements. If the current node is not
                // an li element, then this is a parse error. Pop elements from
                // the stack of open elements until an li element has been
                // popped from the stack. Jump to the step labeled done below.
                // If node is in the special category, but is not an address,
                // div, or p element, then jump to the step labeled done below.
                // Otherwise, set node to the previous entry in the stack of
                // open elements and return to the step labeled loop."
                self.close_open_list_item(&["li"]);
                // "6. Done: If the stack of open elements has a p element in
                // button scope, then close a p element."
                self.close_p_if_in_button_scope();
                // "7. Finally, insert an HTML element for the token."
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                self.frameset_ok = false;
                self.close_open_list_item(&["dd", "dt"]);
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is "plaintext""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            // "Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
                self.switch_tokenizer(LexicalState::Plaintext);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "1. If the stack of open elements has a button element in
                // scope, then run these substeps: Parse error. Generate implied
                // end tags. Pop elements from the stack of open elements until
                // a button element has been popped from the stack."
                if self.in_scope("button", Scope::Default) {
                    self.unexpected_token(token);
                    self.generate_implied_end_tags(None);
                    self.pop_until("button");
                }
                // "2. Reconstruct the active formatting elements, if any.
                // 3. Insert an HTML element for the token.
                // 4. Set the frameset-ok flag to "not ok"."
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on
                // the list (or the start of the list if there is no marker on
                // the list), then this is a parse error; run the adoption
                // agency algorithm for the token, then remove that element
                // from the list of active formatting elements and the stack of
                // open elements if the adoption agency algorithm didn't
                // already remove it (it might not have if the element is not
                // in table scope)."
                if let Some(existing) = self.active_formatting.last_element_named(&self.tree, "a") {
                    self.parse_error(ParseIssueKind::MisnestedFormatting, "a start tag inside a");
                    let _ = self.run_adoption_agency("a");
                    let _ = self.remove_formatting_element(existing);
                    let _ = self.open_elements.remove(existing);
                }
                // "Reconstruct the active formatting elements, if any."
                // "Insert an HTML element for the token. Push onto the list of
                // active formatting elements that element."
                self.reconstruct_active_formatting_elements();
                let element = self.insert_html_element(name, attributes);
                self.push_formatting_element(element, token);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small" | "strike" | "strong"
            | "tt" | "u" => {
                self.reconstruct_active_formatting_elements();
                let element = self.insert_html_element(name, attributes);
                self.push_formatting_element(element, token);
            }

            // "A start tag whose tag name is "nobr""
            // "Reconstruct the active formatting elements, if any."
            // "If the stack of open elements has a nobr element in scope, then
            // this is a parse error; run the adoption agency algorithm for the
            // token, then once again reconstruct the active formatting
            // elements, if any."
            // "Insert an HTML element for the token. Push onto the list of
            // active formatting elements that element."
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.in_scope("nobr", Scope::Default) {
                    self.parse_error(ParseIssueKind::MisnestedFormatting, "nobr start tag inside nobr");
                    let _ = self.run_adoption_agency("nobr");
                    self.reconstruct_active_formatting_elements();
                }
                let element = self.insert_html_element(name, attributes);
                self.push_formatting_element(element, token);
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Insert a marker at the end of the list of active formatting elements."
            // "Set the frameset-ok flag to "not ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                self.active_formatting.insert_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open
            // elements has a p element in button scope, then close a p
            // element."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in table"."
            "table" => {
                if self.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_if_in_button_scope();
                }
                let _ = self.insert_html_element(name, attributes);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.insert_void_element(name, attributes);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            // "If the token does not have an attribute with the name "type", or
            // if it does, but that attribute's value is not an ASCII
            // case-insensitive match for the string "hidden", then: set the
            // frameset-ok flag to "not ok"."
            "input" => {
                self.insert_void_element(name, attributes);
                let hidden = token
                    .attribute("type")
                    .is_some_and(|value| value.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            "param" | "source" | "track" => {
                let _ = self.insert_html_element(name, attributes);
                let _ = self.open_elements.pop();
            }

            // "A start tag whose tag name is "hr""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            // "Set the frameset-ok flag to "not ok"."
            "hr" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
                let _ = self.open_elements.pop();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            "image" => {
                self.unexpected_token(token);
                let img = Token::StartTag {
                    name: "img".to_string(),
                    self_closing,
                    attributes: attributes.to_vec(),
                };
                self.dispatch(&img);
            }

            // "A start tag whose tag name is "textarea""
            // "1. Insert an HTML element for the token.
            //  2. If the next token is a U+000A LINE FEED (LF) character token,
            //     then ignore that token and move on to the next one.
            //  3. Switch the tokenizer to the RCDATA state.
            //  4. Set the original insertion mode to the current insertion mode.
            //  5. Set the frameset-ok flag to "not ok".
            //  6. Switch the insertion mode to "text"."
            "textarea" => {
                self.parse_text_element(name, attributes, LexicalState::Rcdata);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "xmp""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Reconstruct the active formatting elements, if any."
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "xmp" => {
                self.close_p_if_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_element(name, attributes, LexicalState::Rawtext);
            }

            // "A start tag whose tag name is "iframe""
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "iframe" => {
                self.frameset_ok = false;
                self.parse_text_element(name, attributes, LexicalState::Rawtext);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => self.parse_text_element(name, attributes, LexicalState::Rawtext),
            "noscript" if self.options.scripting_enabled => {
                self.parse_text_element(name, attributes, LexicalState::Rawtext);
            }

            // "A start tag whose tag name is "select""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "If the insertion mode is one of "in table", "in caption", "in
            // table body", "in row", or "in cell", then switch the insertion
            // mode to "in select in table". Otherwise, switch the insertion
            // mode to "in select"."
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                self.frameset_ok = false;
                let in_table = matches!(
                    self.mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                );
                self.switch_to(if in_table {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                });
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current
            // node off the stack of open elements."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags. If the current node is not now a ruby
            // element, this is a parse error."
            // "Insert an HTML element for the token."
            "rb" | "rtc" => {
                if self.in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is("ruby") {
                        self.unexpected_token(token);
                    }
                }
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags, except for rtc elements. If the
            // current node is not now a rtc element or a ruby element, this is
            // a parse error."
            // "Insert an HTML element for the token."
            "rp" | "rt" => {
                if self.in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.unexpected_token(token);
                    }
                }
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is "math""
            // "Reconstruct the active formatting elements, if any."
            // "Adjust MathML attributes for the token. (This fixes the case of
            // MathML attributes that are not all lowercase.)"
            // "Adjust foreign attributes for the token. (This fixes the use of
            // namespaced attributes, in particular XLink.)"
            // "Insert a foreign element for the token, with MathML namespace
            // and false."
            // "If the token has its self-closing flag set, pop the current node
            // off the stack of open elements and acknowledge the token's
            // self-closing flag."
            "math" => {
                self.reconstruct_active_formatting_elements();
                let mut attrs = attributes.to_vec();
                adjust_mathml_attributes(&mut attrs);
                adjust_foreign_attributes(&mut attrs);
                let _ = self.insert_foreign_element(name, &attrs, Namespace::MathMl, false);
                if self_closing {
                    let _ = self.open_elements.pop();
                }
            }

            // "A start tag whose tag name is "svg""
            // Same as "math", with the SVG attribute adjustments and the SVG
            // namespace.
            "svg" => {
                self.reconstruct_active_formatting_elements();
                let mut attrs = attributes.to_vec();
                adjust_svg_attributes(&mut attrs);
                adjust_foreign_attributes(&mut attrs);
                let _ = self.insert_foreign_element(name, &attrs, Namespace::Svg, false);
                if self_closing {
                    let _ = self.open_elements.pop();
                }
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.ignore_token(token),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
            }
        }
    }

    /// Reconstruct, insert, pop: the shared body of the void element
    /// branches.
    fn insert_void_element(&mut self, name: &str, attributes: &[Attribute]) {
        self.reconstruct_active_formatting_elements();
        let _ = self.insert_html_element(name, attributes);
        let _ = self.open_elements.pop();
    }

    /// The loop of the "li" and "dd"/"dt" start tag branches: close the
    /// nearest open element named in `closes`, unless a special element
    /// other than address, div or p is reached first.
    fn close_open_list_item(&mut self, closes: &[&str]) {
        let stack = self.open_elements.as_slice().to_vec();
        for &node in stack.iter().rev() {
            let Some(element) = self.tree.as_element(node) else {
                break;
            };
            if element.namespace == Namespace::Html
                && let Some(&tag) = closes.iter().find(|&&tag| element.tag_name == tag)
            {
                self.generate_implied_end_tags(Some(tag));
                if !self.current_node_is(tag) {
                    self.parse_error(
                        ParseIssueKind::UnclosedElement,
                        format!("{tag} closed with open children"),
                    );
                }
                self.pop_until(tag);
                return;
            }
            let exempt = element.namespace == Namespace::Html
                && matches!(element.tag_name.as_str(), "address" | "div" | "p");
            if is_special(element.namespace, &element.tag_name) && !exempt {
                return;
            }
        }
    }

    fn in_body_end_tag(&mut self, token: &Token, name: &str) {
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "template" => self.process_using_mode(InsertionMode::InHead, token),

            // "An end tag whose tag name is "body""
            // "If the stack of open elements does not have a body element in
            // scope, this is a parse error; ignore the token."
            // "Otherwise, if there is a node in the stack of open elements
            // that is not either a dd element, ... then this is a parse error."
            // "Switch the insertion mode to "after body"."
            "body" => {
                if !self.in_scope("body", Scope::Default) {
                    self.ignore_token(token);
                    return;
                }
                self.report_unclosed_elements();
                self.switch_to(InsertionMode::AfterBody);
            }

            // "An end tag whose tag name is "html""
            // Same as "body", then "Reprocess the token."
            "html" => {
                if !self.in_scope("body", Scope::Default) {
                    self.ignore_token(token);
                    return;
                }
                self.report_unclosed_elements();
                self.switch_to(InsertionMode::AfterBody);
                self.dispatch(token);
            }

            // "An end tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "button", "center", "details", "dialog",
            // "dir", "div", "dl", "fieldset", "figcaption", "figure",
            // "footer", "header", "hgroup", "listing", "main", "menu", "nav",
            // "ol", "pre", "search", "section", "summary", "ul""
            // "If the stack of open elements does not have an element in scope
            // that is an HTML element with the same tag name as that of the
            // token, then this is a parse error; ignore the token."
            // "Otherwise, run these steps: Generate implied end tags. If the
            // current node is not an HTML element with the same tag name as
            // that of the token, then this is a parse error. Pop elements from
            // the stack of open elements until an HTML element with the same
            // tag name as the token has been popped from the stack."
            "address" | "article" | "aside" | "blockquote" | "button" | "center" | "details"
            | "dialog" | "dir" | "div" | "dl" | "fieldset" | "figcaption" | "figure" | "footer"
            | "header" | "hgroup" | "listing" | "main" | "menu" | "nav" | "ol" | "pre"
            | "search" | "section" | "summary" | "ul" => {
                if !self.in_scope(name, Scope::Default) {
                    self.parse_error(ParseIssueKind::UnmatchedEndTag, format!("{token} not in scope"));
                    return;
                }
                self.close_element_with_implied_end_tags(name);
            }

            // "An end tag whose tag name is "form""
            "form" => {
                if self.has_template_on_stack() {
                    // "If there is a template element on the stack of open
                    // elements, then run these substeps instead: If the stack
                    // of open elements does not have a form element in scope,
                    // then this is a parse error; return and ignore the token.
                    // Generate implied end tags. If the current node is not a
                    // form element, then this is a parse error. Pop elements
                    // from the stack of open elements until a form element has
                    // been popped from the stack."
                    if !self.in_scope("form", Scope::Default) {
                        self.parse_error(ParseIssueKind::UnmatchedEndTag, "form end tag not in scope");
                        return;
                    }
                    self.close_element_with_implied_end_tags("form");
                    return;
                }
                // "1. Let node be the element that the form element pointer is
                //     set to, or null if it is not set to an element.
                //  2. Set the form element pointer to null.
                //  3. If node is null or if the stack of open elements does not
                //     have node in scope, then this is a parse error; return
                //     and ignore the token.
                //  4. Generate implied end tags.
                //  5. If the current node is not node, then this is a parse
                //     error.
                //  6. Remove node from the stack of open elements."
                let node = self.form_element.take();
                let Some(node) = node.filter(|&node| {
                    self.open_elements
                        .has_node_in_scope(&self.tree, node, Scope::Default)
                }) else {
                    self.parse_error(ParseIssueKind::UnmatchedEndTag, "form end tag not in scope");
                    return;
                };
                self.generate_implied_end_tags(None);
                if self.current_node() != Some(node) {
                    self.parse_error(ParseIssueKind::UnclosedElement, "form closed with open children");
                }
                let _ = self.open_elements.remove(node);
            }

            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in
            // button scope, then this is a parse error; insert an HTML element
            // for a "p" start tag token with no attributes."
            // "Close a p element."
            "p" => {
                if !self.in_scope("p", Scope::Button) {
                    self.parse_error(ParseIssueKind::UnmatchedEndTag, "p end tag without open p");
                    let _ = self.insert_implied_element("p");
                }
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            // "If the stack of open elements does not have an li element in
            // list item scope, then this is a parse error; ignore the token."
            // "Otherwise: Generate implied end tags, except for li elements.
            // If the current node is not an li element, then this is a parse
            // error. Pop elements from the stack of open elements until an li
            // element has been popped from the stack."
            "li" => {
                if !self.in_scope("li", Scope::ListItem) {
                    self.parse_error(ParseIssueKind::UnmatchedEndTag, "li end tag not in scope");
                    return;
                }
                self.close_element_except_implied(name);
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            // Same as "li", with the default scope.
            "dd" | "dt" => {
                if !self.in_scope(name, Scope::Default) {
                    self.parse_error(ParseIssueKind::UnmatchedEndTag, format!("{token} not in scope"));
                    return;
                }
                self.close_element_except_implied(name);
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            // "If the stack of open elements does not have an element in scope
            // that is an HTML element and whose tag name is one of "h1", "h2",
            // "h3", "h4", "h5", or "h6", then this is a parse error; ignore
            // the token."
            // "Otherwise: Generate implied end tags. If the current node is
            // not an HTML element with the same tag name as that of the token,
            // then this is a parse error. Pop elements from the stack of open
            // elements until an HTML element whose tag name is one of "h1",
            // "h2", "h3", "h4", "h5", or "h6" has been popped from the stack."
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if !self.any_in_scope(HEADINGS, Scope::Default) {
                    self.parse_error(ParseIssueKind::UnmatchedEndTag, format!("{token} not in scope"));
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(ParseIssueKind::UnclosedElement, format!("{token} closed a different heading"));
                }
                self.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            // "tt", "u""
            // "Run the adoption agency algorithm for the token."
            _ if is_formatting(name) => {
                if self.run_adoption_agency(name) {
                    self.any_other_end_tag(token, name);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            // "object""
            // "If the stack of open elements does not have an element in scope
            // that is an HTML element with the same tag name as that of the
            // token, then this is a parse error; ignore the token."
            // "Otherwise: Generate implied end tags. If the current node is
            // not an HTML element with the same tag name as that of the token,
            // then this is a parse error. Pop elements from the stack of open
            // elements until an HTML element with the same tag name as the
            // token has been popped from the stack. Clear the list of active
            // formatting elements up to the last marker."
            "applet" | "marquee" | "object" => {
                if !self.in_scope(name, Scope::Default) {
                    self.parse_error(ParseIssueKind::UnmatchedEndTag, format!("{token} not in scope"));
                    return;
                }
                self.close_element_with_implied_end_tags(name);
                self.clear_formatting_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br"
            // start tag token with no attributes, rather than the end tag
            // token that it actually is."
            "br" => {
                self.unexpected_token(token);
                self.insert_void_element("br", &[]);
                self.frameset_ok = false;
            }

            // "Any other end tag"
            _ => self.any_other_end_tag(token, name),
        }
    }

    /// Generate implied end tags except for `tag_name`, then pop until it.
    fn close_element_except_implied(&mut self, tag_name: &str) {
        self.generate_implied_end_tags(Some(tag_name));
        if !self.current_node_is(tag_name) {
            self.parse_error(
                ParseIssueKind::UnclosedElement,
                format!("{tag_name} closed with open children"),
            );
        }
        self.pop_until(tag_name);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag"
    /// "1. Initialize node to be the current node (the bottommost node of the
    ///     stack).
    ///  2. Loop: If node is an HTML element with the same tag name as the
    ///     token, then: Generate implied end tags, except for HTML elements
    ///     with the same tag name as the token. If node is not the current
    ///     node, then this is a parse error. Pop all the nodes from the
    ///     current node up to node, including node, then stop these steps.
    ///  3. Otherwise, if node is in the special category, then this is a parse
    ///     error; ignore the token, and return.
    ///  4. Set node to the previous entry in the stack of open elements.
    ///  5. Return to the step labeled loop."
    pub(crate) fn any_other_end_tag(&mut self, token: &Token, name: &str) {
        let stack = self.open_elements.as_slice().to_vec();
        for &node in stack.iter().rev() {
            if self.tree.is_html_element(node, name) {
                self.generate_implied_end_tags(Some(name));
                if self.current_node() != Some(node) {
                    self.parse_error(
                        ParseIssueKind::UnclosedElement,
                        format!("{token} closed open children"),
                    );
                }
                self.open_elements.pop_until_node(node);
                return;
            }
            let special = self
                .tree
                .as_element(node)
                .is_some_and(|element| is_special(element.namespace, &element.tag_name));
            if special {
                self.parse_error(ParseIssueKind::UnmatchedEndTag, format!("{token} crosses a special element"));
                return;
            }
        }
    }
}
