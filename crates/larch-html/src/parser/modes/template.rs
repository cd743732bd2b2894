//! The "in template" insertion mode.

use crate::parser::core::TreeBuilder;
use crate::parser::insertion_mode::InsertionMode;
use crate::parser::issue::ParseIssueKind;
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(crate) fn handle_in_template_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "A comment token"
            // "A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion
            // mode."
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.process_using_mode(InsertionMode::InBody, token);
            }

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link", "meta", "noframes", "script", "style",
                // "template", "title""
                // "Process the token using the rules for the "in head"
                // insertion mode."
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => {
                    self.process_using_mode(InsertionMode::InHead, token);
                }

                // "A start tag whose tag name is one of: "caption",
                // "colgroup", "tbody", "tfoot", "thead""
                "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.retarget_template(InsertionMode::InTable, token);
                }

                // "A start tag whose tag name is "col""
                "col" => self.retarget_template(InsertionMode::InColumnGroup, token),

                // "A start tag whose tag name is "tr""
                "tr" => self.retarget_template(InsertionMode::InTableBody, token),

                // "A start tag whose tag name is one of: "td", "th""
                "td" | "th" => self.retarget_template(InsertionMode::InRow, token),

                // "Any other start tag"
                _ => self.retarget_template(InsertionMode::InBody, token),
            },

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion
            // mode."
            Token::EndTag { name } if name == "template" => {
                self.process_using_mode(InsertionMode::InHead, token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.ignore_token(token),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open
                // elements, then stop parsing. (fragment case)"
                if !self.has_template_on_stack() {
                    self.stop_parsing();
                    return;
                }
                // "Otherwise, this is a parse error."
                self.parse_error(ParseIssueKind::UnclosedElement, "end of file in template");
                // "Pop elements from the stack of open elements until a
                // template element has been popped from the stack. Clear the
                // list of active formatting elements up to the last marker.
                // Pop the current template insertion mode off the stack of
                // template insertion modes. Reset the insertion mode
                // appropriately. Reprocess the token."
                self.pop_until("template");
                self.clear_formatting_to_last_marker();
                let _ = self.template_modes.pop();
                self.reset_insertion_mode_appropriately();
                self.dispatch(token);
            }
        }
    }

    /// "Pop the current template insertion mode off the stack of template
    /// insertion modes. Push `mode` onto the stack of template insertion modes
    /// so that it is the new current template insertion mode. Switch the
    /// insertion mode to `mode`, and reprocess the token."
    fn retarget_template(&mut self, mode: InsertionMode, token: &Token) {
        let _ = self.template_modes.pop();
        self.template_modes.push(mode);
        self.switch_to(mode);
        self.dispatch(token);
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
    fn test_template_contents_hold_children() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|     <template>
|       content
|         <p>
|           \"x\"
|   <body>
";
        assert_eq!(dump("<!DOCTYPE html><template><p>x</template>"), expected);
    }

    #[test]
    fn test_table_row_in_template() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|     <template>
|       content
|         <tr>
|           <td>
|             \"1\"
|   <body>
";
        assert_eq!(dump("<!DOCTYPE html><template><tr><td>1</td></tr></template>"), expected);
    }

    #[test]
    fn test_unclosed_template_is_closed_at_eof() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <template>
|       content
|         <div>
";
        assert_eq!(dump("<!DOCTYPE html><body><template><div>"), expected);
    }
}
