//! The table insertion modes: "in table", "in table text", "in caption",
//! "in column group", "in table body", "in row" and "in cell".

use crate::parser::core::TreeBuilder;
use crate::parser::insertion_mode::InsertionMode;
use crate::parser::issue::ParseIssueKind;
use crate::parser::open_elements::Scope;
use crate::tokenizer::Token;

/// "clear the stack back to a table context"
const TABLE_CONTEXT: &[&str] = &["table", "template", "html"];

/// "clear the stack back to a table body context"
const TABLE_BODY_CONTEXT: &[&str] = &["tbody", "tfoot", "thead", "template", "html"];

/// "clear the stack back to a table row context"
const TABLE_ROW_CONTEXT: &[&str] = &["tr", "template", "html"];

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl TreeBuilder {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(crate) fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of
            // tokens. Set the original insertion mode to the current insertion
            // mode. Switch the insertion mode to "in table text" and reprocess
            // the token."
            Token::Character { .. }
                if self.current_node_is_one_of(&[
                    "table", "tbody", "template", "tfoot", "thead", "tr",
                ]) =>
            {
                self.pending_table_characters.clear();
                self.original_mode = Some(self.mode);
                self.switch_to(InsertionMode::InTableText);
                self.dispatch(token);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.ignore_token(token),

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context. Insert a marker at
                // the end of the list of active formatting elements. Insert an
                // HTML element for the token, then switch the insertion mode
                // to "in caption"."
                "caption" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    self.active_formatting.insert_marker();
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InCaption);
                }

                // "A start tag whose tag name is "colgroup""
                "colgroup" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InColumnGroup);
                }

                // "A start tag whose tag name is "col""
                // "Clear the stack back to a table context. Insert an HTML
                // element for a "colgroup" start tag token with no attributes,
                // then switch the insertion mode to "in column group".
                // Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_implied_element("colgroup");
                    self.switch_to(InsertionMode::InColumnGroup);
                    self.dispatch(token);
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InTableBody);
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                // "Clear the stack back to a table context. Insert an HTML
                // element for a "tbody" start tag token with no attributes,
                // then switch the insertion mode to "in table body".
                // Reprocess the current token."
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_implied_element("tbody");
                    self.switch_to(InsertionMode::InTableBody);
                    self.dispatch(token);
                }

                // "A start tag whose tag name is "table""
                // "Parse error. If the stack of open elements does not have a
                // table element in table scope, ignore the token. Otherwise:
                // Pop elements from this stack until a table element has been
                // popped from the stack. Reset the insertion mode
                // appropriately. Reprocess the token."
                "table" => {
                    self.unexpected_token(token);
                    if !self.in_scope("table", Scope::Table) {
                        return;
                    }
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    self.dispatch(token);
                }

                // "A start tag whose tag name is one of: "style", "script",
                // "template""
                // "Process the token using the rules for the "in head"
                // insertion mode."
                "style" | "script" | "template" => {
                    self.process_using_mode(InsertionMode::InHead, token);
                }

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name
                // "type", or if it does, but that attribute's value is not an
                // ASCII case-insensitive match for the string "hidden", then:
                // act as described in the "anything else" entry below."
                // "Otherwise: Parse error. Insert an HTML element for the
                // token. Pop that input element off the stack of open
                // elements. Acknowledge the token's self-closing flag, if it
                // is set."
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|value| value.eq_ignore_ascii_case("hidden")) =>
                {
                    self.unexpected_token(token);
                    let _ = self.insert_html_element(name, attributes);
                    let _ = self.open_elements.pop();
                }

                // "A start tag whose tag name is "form""
                // "Parse error. If there is a template element on the stack of
                // open elements, or if the form element pointer is not null,
                // ignore the token. Otherwise: Insert an HTML element for the
                // token, and set the form element pointer to point to the
                // element created. Pop that form element off the stack of open
                // elements."
                "form" => {
                    self.unexpected_token(token);
                    if self.has_template_on_stack() || self.form_element.is_some() {
                        return;
                    }
                    let form = self.insert_html_element(name, attributes);
                    self.form_element = Some(form);
                    let _ = self.open_elements.pop();
                }

                _ => self.in_table_anything_else(token),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "table""
                // "If the stack of open elements does not have a table element
                // in table scope, this is a parse error; ignore the token.
                // Otherwise: Pop elements from this stack until a table
                // element has been popped from the stack. Reset the insertion
                // mode appropriately."
                "table" => {
                    if !self.in_scope("table", Scope::Table) {
                        self.ignore_token(token);
                        return;
                    }
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                // "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => self.ignore_token(token),

                // "An end tag whose tag name is "template""
                "template" => self.process_using_mode(InsertionMode::InHead, token),

                _ => self.in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::EndOfFile => self.process_using_mode(InsertionMode::InBody, token),

            Token::Character { .. } => self.in_table_anything_else(token),
        }
    }

    /// "Anything else"
    ///
    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn in_table_anything_else(&mut self, token: &Token) {
        self.parse_error(
            ParseIssueKind::FosterParented,
            format!("{token} moved out of table"),
        );
        let previous = std::mem::replace(&mut self.foster_parenting, true);
        self.process_using_mode(InsertionMode::InBody, token);
        self.foster_parenting = previous;
    }

    fn clear_stack_back_to(&mut self, tag_names: &[&str]) {
        self.open_elements.clear_back_to(&self.tree, tag_names);
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(crate) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.ignore_token(token),

            // "Any other character token"
            // "Append the character token to the pending table character
            // tokens list."
            Token::Character { data } => self.pending_table_characters.push(*data),

            // "Anything else"
            _ => {
                self.flush_pending_table_characters();
                // "Switch the insertion mode to the original insertion mode
                // and reprocess the token."
                self.restore_original_mode();
                self.dispatch(token);
            }
        }
    }

    /// "If any of the tokens in the pending table character tokens list are
    /// character tokens that are not ASCII whitespace, then this is a parse
    /// error: reprocess the character tokens in the pending table character
    /// tokens list using the rules given in the "anything else" entry in the
    /// "in table" insertion mode. Otherwise, insert the characters given by
    /// the pending table character tokens list."
    fn flush_pending_table_characters(&mut self) {
        let pending = std::mem::take(&mut self.pending_table_characters);
        let only_whitespace = pending
            .iter()
            .all(|&c| matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' '));
        if only_whitespace {
            for c in pending {
                self.insert_character(c);
            }
            return;
        }
        for c in pending {
            self.in_table_anything_else(&Token::character(c));
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(crate) fn handle_in_caption_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name } if name == "caption" => {
                let _ = self.close_caption(token);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a caption element
            // in table scope, this is a parse error; ignore the token.
            // (fragment case) Otherwise: ... Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                if self.close_caption(token) {
                    self.dispatch(token);
                }
            }
            Token::EndTag { name } if name == "table" => {
                if self.close_caption(token) {
                    self.dispatch(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                        | "thead" | "tr"
                ) =>
            {
                self.ignore_token(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            _ => self.process_using_mode(InsertionMode::InBody, token),
        }
    }

    /// "If the stack of open elements does not have a caption element in
    /// table scope, this is a parse error; ignore the token. (fragment case)
    /// Otherwise: Generate implied end tags. Now, if the current node is not
    /// a caption element, then this is a parse error. Pop elements from this
    /// stack until a caption element has been popped from the stack. Clear
    /// the list of active formatting elements up to the last marker. Switch
    /// the insertion mode to "in table"."
    ///
    /// Returns whether the caption was closed.
    fn close_caption(&mut self, token: &Token) -> bool {
        if !self.in_scope("caption", Scope::Table) {
            self.ignore_token(token);
            return false;
        }
        self.close_element_with_implied_end_tags("caption");
        self.clear_formatting_to_last_marker();
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(crate) fn handle_in_column_group_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if token.is_whitespace() => self.insert_character(*data),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.ignore_token(token),

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements. Acknowledge the
            // token's self-closing flag, if it is set."
            Token::StartTag {
                name, attributes, ..
            } if name == "col" => {
                let _ = self.insert_html_element(name, attributes);
                let _ = self.open_elements.pop();
            }

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token. Otherwise, pop the current node
            // from the stack of open elements. Switch the insertion mode to
            // "in table"."
            Token::EndTag { name } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    self.ignore_token(token);
                    return;
                }
                let _ = self.open_elements.pop();
                self.switch_to(InsertionMode::InTable);
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            Token::EndTag { name } if name == "col" => self.ignore_token(token),

            // "A start tag whose tag name is "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::StartTag { name, .. } | Token::EndTag { name } if name == "template" => {
                self.process_using_mode(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::EndOfFile => self.process_using_mode(InsertionMode::InBody, token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token. Otherwise, pop the current node
            // from the stack of open elements. Switch the insertion mode to
            // "in table". Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.ignore_token(token);
                    return;
                }
                let _ = self.open_elements.pop();
                self.switch_to(InsertionMode::InTable);
                self.dispatch(token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(crate) fn handle_in_table_body_mode(&mut self, token: &Token) {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "tr""
                // "Clear the stack back to a table body context. Insert an
                // HTML element for the token, then switch the insertion mode
                // to "in row"."
                "tr" => {
                    self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InRow);
                }

                // "A start tag whose tag name is one of: "th", "td""
                // "Parse error. Clear the stack back to a table body context.
                // Insert an HTML element for a "tr" start tag token with no
                // attributes, then switch the insertion mode to "in row".
                // Reprocess the current token."
                "th" | "td" => {
                    self.unexpected_token(token);
                    self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.insert_implied_element("tr");
                    self.switch_to(InsertionMode::InRow);
                    self.dispatch(token);
                }

                // "A start tag whose tag name is one of: "caption", "col",
                // "colgroup", "tbody", "tfoot", "thead""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.leave_table_body(token);
                }

                _ => self.process_using_mode(InsertionMode::InTable, token),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name
                // as the token, this is a parse error; ignore the token.
                // Otherwise: Clear the stack back to a table body context. Pop
                // the current node from the stack of open elements. Switch the
                // insertion mode to "in table"."
                "tbody" | "tfoot" | "thead" => {
                    if !self.in_scope(name, Scope::Table) {
                        self.ignore_token(token);
                        return;
                    }
                    self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.open_elements.pop();
                    self.switch_to(InsertionMode::InTable);
                }

                // "An end tag whose tag name is "table""
                "table" => self.leave_table_body(token),

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "td", "th", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr" => {
                    self.ignore_token(token);
                }

                _ => self.process_using_mode(InsertionMode::InTable, token),
            },

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion
            // mode."
            _ => self.process_using_mode(InsertionMode::InTable, token),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token.
    /// Otherwise: Clear the stack back to a table body context. Pop the
    /// current node from the stack of open elements. Switch the insertion mode
    /// to "in table". Reprocess the token."
    fn leave_table_body(&mut self, token: &Token) {
        if !self.any_in_scope(TABLE_SECTIONS, Scope::Table) {
            self.ignore_token(token);
            return;
        }
        self.clear_stack_back_to(TABLE_BODY_CONTEXT);
        let _ = self.open_elements.pop();
        self.switch_to(InsertionMode::InTable);
        self.dispatch(token);
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(crate) fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is one of: "th", "td""
                // "Clear the stack back to a table row context. Insert an HTML
                // element for the token, then switch the insertion mode to "in
                // cell". Insert a marker at the end of the list of active
                // formatting elements."
                "th" | "td" => {
                    self.clear_stack_back_to(TABLE_ROW_CONTEXT);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_to(InsertionMode::InCell);
                    self.active_formatting.insert_marker();
                }

                // "A start tag whose tag name is one of: "caption", "col",
                // "colgroup", "tbody", "tfoot", "thead", "tr""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
                    if self.close_row(token) {
                        self.dispatch(token);
                    }
                }

                _ => self.process_using_mode(InsertionMode::InTable, token),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "tr""
                "tr" => {
                    let _ = self.close_row(token);
                }

                // "An end tag whose tag name is "table""
                "table" => {
                    if self.close_row(token) {
                        self.dispatch(token);
                    }
                }

                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name
                // as the token, this is a parse error; ignore the token."
                // "If the stack of open elements does not have a tr element in
                // table scope, ignore the token."
                // "Otherwise: Clear the stack back to a table row context. Pop
                // the current node (which will be a tr element) from the stack
                // of open elements. Switch the insertion mode to "in table
                // body". Reprocess the token."
                "tbody" | "tfoot" | "thead" => {
                    if !self.in_scope(name, Scope::Table) {
                        self.ignore_token(token);
                        return;
                    }
                    if self.close_row(token) {
                        self.dispatch(token);
                    }
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "td", "th""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" => {
                    self.ignore_token(token);
                }

                _ => self.process_using_mode(InsertionMode::InTable, token),
            },

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion
            // mode."
            _ => self.process_using_mode(InsertionMode::InTable, token),
        }
    }

    /// "If the stack of open elements does not have a tr element in table
    /// scope, this is a parse error; ignore the token. Otherwise: Clear the
    /// stack back to a table row context. Pop the current node (which will be
    /// a tr element) from the stack of open elements. Switch the insertion
    /// mode to "in table body"."
    ///
    /// Returns whether the row was closed.
    fn close_row(&mut self, token: &Token) -> bool {
        if !self.in_scope("tr", Scope::Table) {
            self.ignore_token(token);
            return false;
        }
        self.clear_stack_back_to(TABLE_ROW_CONTEXT);
        let _ = self.open_elements.pop();
        self.switch_to(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(crate) fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is one of: "td", "th""
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name
                // as that of the token, then this is a parse error; ignore the
                // token. Otherwise: Generate implied end tags. Now, if the
                // current node is not an HTML element with the same tag name
                // as the token, then this is a parse error. Pop elements from
                // the stack of open elements until an HTML element with the
                // same tag name as the token has been popped from the stack.
                // Clear the list of active formatting elements up to the last
                // marker. Switch the insertion mode to "in row"."
                "td" | "th" => {
                    if !self.in_scope(name, Scope::Table) {
                        self.ignore_token(token);
                        return;
                    }
                    self.close_element_with_implied_end_tags(name);
                    self.clear_formatting_to_last_marker();
                    self.switch_to(InsertionMode::InRow);
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" => self.ignore_token(token),

                // "An end tag whose tag name is one of: "table", "tbody",
                // "tfoot", "thead", "tr""
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name
                // as that of the token, then this is a parse error; ignore the
                // token. Otherwise, close the cell and reprocess the token."
                "table" | "tbody" | "tfoot" | "thead" | "tr" => {
                    if !self.in_scope(name, Scope::Table) {
                        self.ignore_token(token);
                        return;
                    }
                    self.close_cell();
                    self.dispatch(token);
                }

                _ => self.process_using_mode(InsertionMode::InBody, token),
            },

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Assert: The stack of open elements has a td or th element in
            // table scope. (fragment case: ignore the token)"
            // "Close the cell and reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                if !self.any_in_scope(&["td", "th"], Scope::Table) {
                    self.ignore_token(token);
                    return;
                }
                self.close_cell();
                self.dispatch(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            _ => self.process_using_mode(InsertionMode::InBody, token),
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "1. Generate implied end tags.
    ///  2. If the current node is not now a td element or a th element, then
    ///     this is a parse error.
    ///  3. Pop elements from the stack of open elements stack until a td
    ///     element or a th element has been popped from the stack.
    ///  4. Clear the list of active formatting elements up to the last marker.
    ///  5. Switch the insertion mode to "in row"."
    pub(crate) fn close_cell(&mut self) {
        self.generate_implied_end_tags(None);
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.parse_error(ParseIssueKind::UnclosedElement, "cell closed with open children");
        }
        self.pop_until_one_of(&["td", "th"]);
        self.clear_formatting_to_last_marker();
        self.switch_to(InsertionMode::InRow);
    }
}

#[cfg(test)]
mod tests {
    use larch_dom::dump::dump_document;

    use crate::parser::{HtmlParser, ParserOptions};

    fn dump(input: &str) -> String {
        dump_document(&HtmlParser::new(input, ParserOptions::new()).run())
    }

    #[test]
    fn test_implied_table_sections() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             \"a\"
|           <td>
|             \"b\"
";
        assert_eq!(dump("<!DOCTYPE html><table><td>a<td>b</table>"), expected);
    }

    #[test]
    fn test_text_is_foster_parented() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     \"x\"
|     <table>
|       <tbody>
|         <tr>
";
        assert_eq!(dump("<!DOCTYPE html><table>x<tr></table>"), expected);
    }

    #[test]
    fn test_whitespace_stays_in_table() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <table>
|       \" \"
|       <tbody>
|         <tr>
";
        assert_eq!(dump("<!DOCTYPE html><table> <tr></table>"), expected);
    }

    #[test]
    fn test_caption_and_colgroup() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <table>
|       <caption>
|         \"c\"
|       <colgroup>
|         <col>
";
        assert_eq!(dump("<!DOCTYPE html><table><caption>c<col></table>"), expected);
    }

    #[test]
    fn test_hidden_input_stays_in_table() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <table>
|       <input>
|         type=\"hidden\"
";
        assert_eq!(dump("<!DOCTYPE html><table><input type=hidden></table>"), expected);
    }
}
