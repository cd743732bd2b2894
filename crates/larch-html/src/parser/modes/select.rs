//! The "in select" and "in select in table" insertion modes.

use crate::parser::core::TreeBuilder;
use crate::parser::insertion_mode::InsertionMode;
use crate::parser::open_elements::Scope;
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(crate) fn handle_in_select_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.ignore_token(token),

            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.ignore_token(token),

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "html""
                "html" => self.process_using_mode(InsertionMode::InBody, token),

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node
                // from the stack of open elements."
                // "Insert an HTML element for the token."
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.open_elements.pop();
                    }
                    let _ = self.insert_html_element(name, attributes);
                }

                // "A start tag whose tag name is "optgroup""
                // "If the current node is an option element, pop that node
                // from the stack of open elements."
                // "If the current node is an optgroup element, pop that node
                // from the stack of open elements."
                // "Insert an HTML element for the token."
                "optgroup" => {
                    if self.current_node_is("option") {
                        let _ = self.open_elements.pop();
                    }
                    if self.current_node_is("optgroup") {
                        let _ = self.open_elements.pop();
                    }
                    let _ = self.insert_html_element(name, attributes);
                }

                // "A start tag whose tag name is "hr""
                // "If the current node is an option element, pop that node
                // from the stack of open elements. If the current node is an
                // optgroup element, pop that node from the stack of open
                // elements. Insert an HTML element for the token. Immediately
                // pop the current node off the stack of open elements."
                "hr" => {
                    if self.current_node_is("option") {
                        let _ = self.open_elements.pop();
                    }
                    if self.current_node_is("optgroup") {
                        let _ = self.open_elements.pop();
                    }
                    let _ = self.insert_html_element(name, attributes);
                    let _ = self.open_elements.pop();
                }

                // "A start tag whose tag name is "select""
                // "Parse error. If the stack of open elements does not have a
                // select element in select scope, ignore the token. (fragment
                // case) Otherwise: Pop elements from the stack of open
                // elements until a select element has been popped from the
                // stack. Reset the insertion mode appropriately."
                "select" => {
                    self.unexpected_token(token);
                    if self.in_scope("select", Scope::Select) {
                        self.pop_until("select");
                        self.reset_insertion_mode_appropriately();
                    }
                }

                // "A start tag whose tag name is one of: "input", "keygen",
                // "textarea""
                // "Parse error. If the stack of open elements does not have a
                // select element in select scope, ignore the token. (fragment
                // case) Otherwise: Pop elements from the stack of open
                // elements until a select element has been popped from the
                // stack. Reset the insertion mode appropriately. Reprocess the
                // token."
                "input" | "keygen" | "textarea" => {
                    self.unexpected_token(token);
                    if self.in_scope("select", Scope::Select) {
                        self.pop_until("select");
                        self.reset_insertion_mode_appropriately();
                        self.dispatch(token);
                    }
                }

                // "A start tag whose tag name is one of: "script", "template""
                // "Process the token using the rules for the "in head"
                // insertion mode."
                "script" | "template" => self.process_using_mode(InsertionMode::InHead, token),

                // "Any other start tag"
                // "Parse error. Ignore the token."
                _ => self.ignore_token(token),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                // "First, if the current node is an option element, and the
                // node immediately before it in the stack of open elements is
                // an optgroup element, then pop the current node from the
                // stack of open elements."
                // "If the current node is an optgroup element, then pop that
                // node from the stack of open elements. Otherwise, this is a
                // parse error; ignore the token."
                "optgroup" => {
                    let len = self.open_elements.len();
                    let parent_is_optgroup = len
                        .checked_sub(2)
                        .and_then(|index| self.open_elements.get(index))
                        .is_some_and(|node| self.tree.is_html_element(node, "optgroup"));
                    if self.current_node_is("option") && parent_is_optgroup {
                        let _ = self.open_elements.pop();
                    }
                    if self.current_node_is("optgroup") {
                        let _ = self.open_elements.pop();
                    } else {
                        self.ignore_token(token);
                    }
                }

                // "An end tag whose tag name is "option""
                // "If the current node is an option element, then pop that
                // node from the stack of open elements. Otherwise, this is a
                // parse error; ignore the token."
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.open_elements.pop();
                    } else {
                        self.ignore_token(token);
                    }
                }

                // "An end tag whose tag name is "select""
                // "If the stack of open elements does not have a select
                // element in select scope, this is a parse error; ignore the
                // token. (fragment case) Otherwise: Pop elements from the
                // stack of open elements until a select element has been
                // popped from the stack. Reset the insertion mode
                // appropriately."
                "select" => {
                    if !self.in_scope("select", Scope::Select) {
                        self.ignore_token(token);
                        return;
                    }
                    self.pop_until("select");
                    self.reset_insertion_mode_appropriately();
                }

                // "An end tag whose tag name is "template""
                "template" => self.process_using_mode(InsertionMode::InHead, token),

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => self.ignore_token(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::EndOfFile => self.process_using_mode(InsertionMode::InBody, token),
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(crate) fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        const TABLE_PARTS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error. Pop elements from the stack of open elements until
            // a select element has been popped from the stack. Reset the
            // insertion mode appropriately. Reprocess the token."
            Token::StartTag { name, .. } if TABLE_PARTS.contains(&name.as_str()) => {
                self.unexpected_token(token);
                self.pop_until("select");
                self.reset_insertion_mode_appropriately();
                self.dispatch(token);
            }

            // "An end tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error. If the stack of open elements does not have an
            // element in table scope that is an HTML element with the same tag
            // name as that of the token, then ignore the token. Otherwise: Pop
            // elements from the stack of open elements until a select element
            // has been popped from the stack. Reset the insertion mode
            // appropriately. Reprocess the token."
            Token::EndTag { name } if TABLE_PARTS.contains(&name.as_str()) => {
                self.unexpected_token(token);
                if !self.in_scope(name, Scope::Table) {
                    return;
                }
                self.pop_until("select");
                self.reset_insertion_mode_appropriately();
                self.dispatch(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in select"
            // insertion mode."
            _ => self.process_using_mode(InsertionMode::InSelect, token),
        }
    }
}

#[cfg(test)]
mod tests {
    use larch_dom::dump::dump_document;

    use crate::parser::{HtmlParser, InsertionMode, ParserOptions};

    fn dump(input: &str) -> String {
        dump_document(&HtmlParser::new(input, ParserOptions::new()).run())
    }

    #[test]
    fn test_options_close_each_other() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <select>
|       <option>
|         \"a\"
|       <optgroup>
|         <option>
|           \"b\"
";
        assert_eq!(
            dump("<!DOCTYPE html><select><option>a<optgroup><option>b</select>"),
            expected
        );
    }

    #[test]
    fn test_unknown_tags_in_select_are_dropped() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <select>
|       \"xy\"
";
        assert_eq!(dump("<!DOCTYPE html><select>x<div>y</div></select>"), expected);
    }

    #[test]
    fn test_table_cell_closes_select() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             <select>
|           <td>
";
        assert_eq!(dump("<!DOCTYPE html><table><tr><td><select><td></table>"), expected);
    }

    #[test]
    fn test_select_inside_cell_uses_table_variant() {
        use crate::parser::TreeBuilder;
        use crate::tokenizer::{HtmlTokenizer, TokenSource};

        let mut tokenizer = HtmlTokenizer::new("<table><tr><td><select>");
        let mut builder = TreeBuilder::new(ParserOptions::new());
        loop {
            let token = tokenizer.next_token();
            if token.is_eof() {
                break;
            }
            builder.process_token(&token);
        }
        assert_eq!(builder.insertion_mode(), InsertionMode::InSelectInTable);
    }
}
