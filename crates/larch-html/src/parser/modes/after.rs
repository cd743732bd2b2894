//! The "after body", "in frameset", "after frameset", "after after body" and
//! "after after frameset" insertion modes.

use larch_dom::NodeId;

use crate::parser::core::TreeBuilder;
use crate::parser::insertion_mode::InsertionMode;
use crate::parser::issue::ParseIssueKind;
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(crate) fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Process the token using the rules for the "in body" insertion mode."
            t if t.is_whitespace() => self.process_using_mode(InsertionMode::InBody, token),

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self.open_elements.top().unwrap_or(NodeId::ROOT);
                self.insert_comment_in(data, html);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.ignore_token(token),

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing
            // algorithm, this is a parse error; ignore the token. (fragment
            // case) Otherwise, switch the insertion mode to "after after
            // body"."
            Token::EndTag { name } if name == "html" => {
                if self.context_element.is_some() {
                    self.ignore_token(token);
                    return;
                }
                self.switch_to(InsertionMode::AfterAfterBody);
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            // reprocess the token."
            _ => {
                self.unexpected_token(token);
                self.switch_to(InsertionMode::InBody);
                self.dispatch(token);
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(crate) fn handle_in_frameset_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if token.is_whitespace() => self.insert_character(*data),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token."
            Token::StartTag {
                name, attributes, ..
            } if name == "frameset" => {
                let _ = self.insert_html_element(name, attributes);
            }

            // "An end tag whose tag name is "frameset""
            // "If the current node is the root html element, then this is a
            // parse error; ignore the token. (fragment case)"
            // "Otherwise, pop the current node from the stack of open
            // elements."
            // "If the parser was not created as part of the HTML fragment
            // parsing algorithm (fragment case), and the current node is no
            // longer a frameset element, then switch the insertion mode to
            // "after frameset"."
            Token::EndTag { name } if name == "frameset" => {
                if self.current_is_root_html() {
                    self.ignore_token(token);
                    return;
                }
                let _ = self.open_elements.pop();
                if self.context_element.is_none() && !self.current_node_is("frameset") {
                    self.switch_to(InsertionMode::AfterFrameset);
                }
            }

            // "A start tag whose tag name is "frame""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements. Acknowledge the
            // token's self-closing flag, if it is set."
            Token::StartTag {
                name, attributes, ..
            } if name == "frame" => {
                let _ = self.insert_html_element(name, attributes);
                let _ = self.open_elements.pop();
            }

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::StartTag { name, .. } if name == "noframes" => {
                self.process_using_mode(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is
            // a parse error. Stop parsing."
            Token::EndOfFile => {
                if !self.current_is_root_html() {
                    self.parse_error(ParseIssueKind::UnclosedElement, "end of file in frameset");
                }
                self.stop_parsing();
            }

            // "A DOCTYPE token"
            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.ignore_token(token),
        }
    }

    fn current_is_root_html(&self) -> bool {
        self.open_elements.len() == 1 && self.current_node_is("html")
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(crate) fn handle_after_frameset_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if token.is_whitespace() => self.insert_character(*data),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag { name } if name == "html" => {
                self.switch_to(InsertionMode::AfterAfterFrameset);
            }

            // "A start tag whose tag name is "noframes""
            Token::StartTag { name, .. } if name == "noframes" => {
                self.process_using_mode(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "A DOCTYPE token"
            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.ignore_token(token),
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(crate) fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment_in(data, NodeId::ROOT),

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::Doctype { .. } => self.process_using_mode(InsertionMode::InBody, token),
            t if t.is_whitespace() => self.process_using_mode(InsertionMode::InBody, token),
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            // reprocess the token."
            _ => {
                self.unexpected_token(token);
                self.switch_to(InsertionMode::InBody);
                self.dispatch(token);
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(crate) fn handle_after_after_frameset_mode(&mut self, token: &Token) {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment_in(data, NodeId::ROOT),

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::Doctype { .. } => self.process_using_mode(InsertionMode::InBody, token),
            t if t.is_whitespace() => self.process_using_mode(InsertionMode::InBody, token),
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::StartTag { name, .. } if name == "noframes" => {
                self.process_using_mode(InsertionMode::InHead, token);
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.ignore_token(token),
        }
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
    fn test_frameset_replaces_body() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <frameset>
|     <frame>
";
        assert_eq!(dump("<!DOCTYPE html><frameset><frame></frameset>"), expected);
    }

    #[test]
    fn test_comment_after_html_goes_to_document() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     \"x\"
| <!-- c -->
";
        assert_eq!(dump("<!DOCTYPE html><body>x</body></html><!--c-->"), expected);
    }

    #[test]
    fn test_comment_after_body_goes_to_html() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|   <!-- c -->
";
        assert_eq!(dump("<!DOCTYPE html><body></body><!--c-->"), expected);
    }

    #[test]
    fn test_content_after_body_reopens_it() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <p>
";
        assert_eq!(dump("<!DOCTYPE html><body></body></html><p>"), expected);
    }
}
