//! The "in head", "in head noscript", "after head" and "text" insertion modes.

use crate::parser::core::TreeBuilder;
use crate::parser::insertion_mode::InsertionMode;
use crate::parser::issue::ParseIssueKind;
use crate::tokenizer::{LexicalState, Token};

impl TreeBuilder {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(crate) fn handle_in_head_mode(&mut self, token: &Token) {
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
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            //
            // "A start tag whose tag name is "meta""
            // Same, plus encoding changes, which do not apply to an
            // in-memory parse.
            Token::StartTag {
                name, attributes, ..
            } if matches!(name.as_str(), "base" | "basefont" | "bgsound" | "link" | "meta") => {
                let _ = self.insert_html_element(name, attributes);
                let _ = self.open_elements.pop();
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            Token::StartTag {
                name, attributes, ..
            } if name == "title" => {
                self.parse_text_element(name, attributes, LexicalState::Rcdata);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            // "A start tag whose tag name is one of: "noframes", "style""
            // "Follow the generic raw text element parsing algorithm."
            Token::StartTag {
                name, attributes, ..
            } if matches!(name.as_str(), "noframes" | "style")
                || (name == "noscript" && self.options.scripting_enabled) =>
            {
                self.parse_text_element(name, attributes, LexicalState::Rawtext);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            // is disabled"
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in head noscript"."
            Token::StartTag {
                name, attributes, ..
            } if name == "noscript" => {
                let _ = self.insert_html_element(name, attributes);
                self.switch_to(InsertionMode::InHeadNoscript);
            }

            // "A start tag whose tag name is "script""
            // Insert the element at the adjusted insertion location, push it,
            // switch the tokenizer to the script data state, remember the
            // original insertion mode and switch to "text". Scripts are never
            // run.
            Token::StartTag {
                name, attributes, ..
            } if name == "script" => {
                self.parse_text_element(name, attributes, LexicalState::ScriptData);
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            // stack of open elements."
            // "Switch the insertion mode to "after head"."
            Token::EndTag { name } if name == "head" => {
                let _ = self.open_elements.pop();
                self.switch_to(InsertionMode::AfterHead);
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.in_head_anything_else(token);
            }

            // "A start tag whose tag name is "template""
            Token::StartTag {
                name, attributes, ..
            } if name == "template" => {
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(name, attributes);
                // "Insert a marker at the end of the list of active formatting
                // elements."
                self.active_formatting.insert_marker();
                // "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // "Switch the insertion mode to "in template"."
                self.switch_to(InsertionMode::InTemplate);
                // "Push "in template" onto the stack of template insertion
                // modes so that it is the new current template insertion mode."
                self.template_modes.push(InsertionMode::InTemplate);
            }

            // "An end tag whose tag name is "template""
            Token::EndTag { name } if name == "template" => {
                // "If there is no template element on the stack of open
                // elements, then this is a parse error; ignore the token."
                if !self.has_template_on_stack() {
                    self.ignore_token(token);
                    return;
                }
                // "Generate all implied end tags thoroughly."
                self.generate_implied_end_tags_thoroughly();
                // "If the current node is not a template element, then this is
                // a parse error."
                if !self.current_node_is("template") {
                    self.parse_error(
                        ParseIssueKind::UnclosedElement,
                        "template closed with open children",
                    );
                }
                // "Pop elements from the stack of open elements until a
                // template element has been popped from the stack."
                self.pop_until("template");
                // "Clear the list of active formatting elements up to the last
                // marker."
                self.clear_formatting_to_last_marker();
                // "Pop the current template insertion mode off the stack of
                // template insertion modes."
                let _ = self.template_modes.pop();
                // "Reset the insertion mode appropriately."
                self.reset_insertion_mode_appropriately();
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => self.ignore_token(token),
            Token::EndTag { .. } => self.ignore_token(token),

            // "Anything else"
            _ => self.in_head_anything_else(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn in_head_anything_else(&mut self, token: &Token) {
        let _ = self.open_elements.pop();
        self.switch_to(InsertionMode::AfterHead);
        self.dispatch(token);
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(crate) fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.ignore_token(token),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from
            // the stack of open elements; the new current node will be a head
            // element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag { name } if name == "noscript" => {
                let _ = self.open_elements.pop();
                self.switch_to(InsertionMode::InHead);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound",
            // "link", "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            t if t.is_whitespace() => self.process_using_mode(InsertionMode::InHead, token),
            Token::Comment { .. } => self.process_using_mode(InsertionMode::InHead, token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.process_using_mode(InsertionMode::InHead, token);
            }

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if name == "br" => self.in_head_noscript_anything_else(token),

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.ignore_token(token);
            }
            Token::EndTag { .. } => self.ignore_token(token),

            // "Anything else"
            _ => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) {
        self.unexpected_token(token);
        let _ = self.open_elements.pop();
        self.switch_to(InsertionMode::InHead);
        self.dispatch(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(crate) fn handle_after_head_mode(&mut self, token: &Token) {
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
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in body"."
            Token::StartTag {
                name, attributes, ..
            } if name == "body" => {
                let _ = self.insert_html_element(name, attributes);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InBody);
            }

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in frameset"."
            Token::StartTag {
                name, attributes, ..
            } if name == "frameset" => {
                let _ = self.insert_html_element(name, attributes);
                self.switch_to(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base"
                        | "basefont"
                        | "bgsound"
                        | "link"
                        | "meta"
                        | "noframes"
                        | "script"
                        | "style"
                        | "template"
                        | "title"
                ) =>
            {
                // "Parse error."
                self.unexpected_token(token);
                // "Push the node pointed to by the head element pointer onto
                // the stack of open elements."
                let Some(head) = self.head_element else {
                    self.process_using_mode(InsertionMode::InHead, token);
                    return;
                };
                self.open_elements.push(head);
                // "Process the token using the rules for the "in head"
                // insertion mode."
                self.process_using_mode(InsertionMode::InHead, token);
                // "Remove the node pointed to by the head element pointer from
                // the stack of open elements. (It might not be the current node
                // at this point.)"
                let _ = self.open_elements.remove(head);
            }

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag { name } if name == "template" => {
                self.process_using_mode(InsertionMode::InHead, token);
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.after_head_anything_else(token);
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => self.ignore_token(token),
            Token::EndTag { .. } => self.ignore_token(token),

            // "Anything else"
            _ => self.after_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no
    /// attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn after_head_anything_else(&mut self, token: &Token) {
        let _ = self.insert_implied_element("body");
        self.switch_to(InsertionMode::InBody);
        self.dispatch(token);
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(crate) fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            // "An end-of-file token"
            // "Parse error. If the current node is a script element, then set
            // its already started to true. Pop the current node off the stack
            // of open elements. Switch the insertion mode to the original
            // insertion mode and reprocess the token."
            Token::EndOfFile => {
                self.parse_error(ParseIssueKind::UnclosedElement, "end of file in raw text element");
                let _ = self.open_elements.pop();
                self.restore_original_mode();
                self.dispatch(token);
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements. Switch the
            // insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                let _ = self.open_elements.pop();
                self.restore_original_mode();
            }

            // The tokenizer only produces characters and end tags here.
            _ => self.ignore_token(token),
        }
    }

    /// "Switch the insertion mode to the original insertion mode"
    pub(crate) fn restore_original_mode(&mut self) {
        let original = self.original_mode.take().unwrap_or(InsertionMode::InBody);
        self.switch_to(original);
    }
}
