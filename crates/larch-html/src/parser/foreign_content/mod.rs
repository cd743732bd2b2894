//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use larch_dom::{ElementData, Namespace};

use super::core::TreeBuilder;
use super::issue::ParseIssueKind;
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "When the steps below require the user agent to adjust foreign attributes
/// for a token, then, if any of the attributes on the token match the strings
/// in the first column of the following table, let the attribute be a
/// namespaced attribute, with the prefix being the string in the second
/// column, the local name being the string in the third column, and the
/// namespace being the namespace in the fourth column."
///
/// The qualified name is kept as written, so only the namespace is recorded.
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, Namespace)] = &[
    ("xlink:actuate", Namespace::XLink),
    ("xlink:arcrole", Namespace::XLink),
    ("xlink:href", Namespace::XLink),
    ("xlink:role", Namespace::XLink),
    ("xlink:show", Namespace::XLink),
    ("xlink:title", Namespace::XLink),
    ("xlink:type", Namespace::XLink),
    ("xml:lang", Namespace::Xml),
    ("xml:space", Namespace::Xml),
    ("xmlns", Namespace::XmlNs),
    ("xmlns:xlink", Namespace::XmlNs),
];

/// Start tags that break out of foreign content back into HTML.
///
/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1",
/// "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
/// "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span",
/// "strong", "strike", "sub", "sup", "table", "tt", "u", "ul", "var""
const BREAKOUT_START_TAGS: &[&str] = &[
    "b", "big", "blockquote", "body", "br", "center", "code", "dd", "div", "dl", "dt", "em",
    "embed", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing", "menu",
    "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong", "strike", "sub",
    "sup", "table", "tt", "u", "ul", "var",
];

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
pub fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in &mut *attributes {
        if let Some(&(_, namespace)) = FOREIGN_ATTRIBUTE_ADJUSTMENTS
            .iter()
            .find(|&&(name, _)| attr.name == name)
        {
            attr.namespace = Some(namespace);
        }
    }
}

/// [§ 13.2.6 MathML text integration point](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
#[must_use]
pub fn is_mathml_text_integration_point(element: &ElementData) -> bool {
    element.namespace == Namespace::MathMl && mathml::is_text_integration_point(&element.tag_name)
}

/// [§ 13.2.6 HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "A node is an HTML integration point if it is one of the following
/// elements:
/// - A MathML annotation-xml element whose start tag token had an attribute
///   with the name "encoding" whose value was an ASCII case-insensitive match
///   for the string "text/html"
/// - A MathML annotation-xml element whose start tag token had an attribute
///   with the name "encoding" whose value was an ASCII case-insensitive match
///   for the string "application/xhtml+xml"
/// - An SVG foreignObject element
/// - An SVG desc element
/// - An SVG title element"
#[must_use]
pub fn is_html_integration_point(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::MathMl => {
            element.tag_name == "annotation-xml"
                && element.attrs.get("encoding").is_some_and(|encoding| {
                    encoding.eq_ignore_ascii_case("text/html")
                        || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                })
        }
        Namespace::Svg => matches!(element.tag_name.as_str(), "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

/// Whether a start tag in foreign content pops back out to HTML content.
///
/// Includes "A start tag whose tag name is "font", if the token has any
/// attributes named "color", "face", or "size"".
fn is_breakout_start_tag(name: &str, attributes: &[Attribute]) -> bool {
    BREAKOUT_START_TAGS.contains(&name)
        || (name == "font"
            && attributes
                .iter()
                .any(|attr| matches!(attr.name.as_str(), "color" | "face" | "size")))
}

impl TreeBuilder {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(crate) fn process_in_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseIssueKind::UnexpectedToken, "NULL character in foreign content");
                self.insert_character('\u{FFFD}');
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the token's character."
            Token::Character { data } if token.is_whitespace() => self.insert_character(*data),

            // "Any other character token"
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
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
                name, attributes, ..
            } if is_breakout_start_tag(name, attributes) => self.break_out_of_foreign_content(token),

            // "An end tag whose tag name is "br", "p""
            Token::EndTag { name } if name == "br" || name == "p" => {
                self.break_out_of_foreign_content(token);
            }

            // "Any other start tag"
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.insert_foreign_start_tag(name, attributes, *self_closing),

            // "An end tag whose tag name is "script", if the current node is an
            // SVG script element"
            // "Pop the current node off the stack of open elements." Scripts
            // are never run.
            Token::EndTag { name }
                if name == "script"
                    && self
                        .current_node()
                        .and_then(|node| self.tree.as_element(node))
                        .is_some_and(|element| element.is(Namespace::Svg, "script")) =>
            {
                let _ = self.open_elements.pop();
            }

            // "Any other end tag"
            Token::EndTag { name } => self.foreign_end_tag(token, name),

            // The dispatcher never sends end-of-file here.
            Token::EndOfFile => self.process_using_mode(self.mode, token),
        }
    }

    /// "Parse error."
    /// "While the current node is not a MathML text integration point, an
    /// HTML integration point, or an element in the HTML namespace, pop
    /// elements from the stack of open elements."
    /// "Reprocess the token according to the rules given in the section
    /// corresponding to the current insertion mode in HTML content."
    fn break_out_of_foreign_content(&mut self, token: &Token) {
        self.parse_error(
            ParseIssueKind::UnexpectedToken,
            format!("{token} breaks out of foreign content"),
        );
        while let Some(element) = self.current_node().and_then(|node| self.tree.as_element(node)) {
            if element.namespace == Namespace::Html
                || is_mathml_text_integration_point(element)
                || is_html_integration_point(element)
            {
                break;
            }
            let _ = self.open_elements.pop();
        }
        self.process_using_mode(self.mode, token);
    }

    /// "Any other start tag"
    fn insert_foreign_start_tag(&mut self, name: &str, attributes: &[Attribute], self_closing: bool) {
        let namespace = self
            .adjusted_current_node()
            .and_then(|node| self.tree.as_element(node))
            .map_or(Namespace::Html, |element| element.namespace);
        let mut attrs = attributes.to_vec();
        let mut tag_name = name;
        match namespace {
            // "If the adjusted current node is an element in the MathML
            // namespace, adjust MathML attributes for the token."
            Namespace::MathMl => adjust_mathml_attributes(&mut attrs),
            // "If the adjusted current node is an element in the SVG
            // namespace, and the token's tag name is one of the ones in the
            // first column of the following table, change the tag name to
            // the name given in the corresponding cell in the second column."
            // "If the adjusted current node is an element in the SVG
            // namespace, adjust SVG attributes for the token."
            Namespace::Svg => {
                tag_name = adjust_svg_tag_name(name);
                adjust_svg_attributes(&mut attrs);
            }
            _ => {}
        }
        // "Adjust foreign attributes for the token."
        adjust_foreign_attributes(&mut attrs);
        // "Insert a foreign element for the token, with adjusted current
        // node's namespace and false."
        let _ = self.insert_foreign_element(tag_name, &attrs, namespace, false);
        // "If the token has its self-closing flag set, then run the
        // appropriate steps from the following list: ... pop the current node
        // off the stack of open elements and acknowledge the token's
        // self-closing flag."
        if self_closing {
            let _ = self.open_elements.pop();
        }
    }

    /// "Any other end tag"
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the
    ///     stack).
    ///  2. If node's tag name, converted to ASCII lowercase, is not the same
    ///     as the tag name of the token, then this is a parse error.
    ///  3. Loop: If node is the topmost element in the stack of open elements,
    ///     then return. (fragment case)
    ///  4. If node's tag name, converted to ASCII lowercase, is the same as
    ///     the tag name of the token, pop elements from the stack of open
    ///     elements until node has been popped from the stack, and then
    ///     return.
    ///  5. Set node to the previous entry in the stack of open elements.
    ///  6. If node is not an element in the HTML namespace, return to the step
    ///     labeled loop.
    ///  7. Otherwise, process the token according to the rules given in the
    ///     section corresponding to the current insertion mode in HTML
    ///     content."
    fn foreign_end_tag(&mut self, token: &Token, name: &str) {
        let stack = self.open_elements.as_slice().to_vec();
        let matches_token = |element: &ElementData| element.tag_name.eq_ignore_ascii_case(name);

        let current_matches = stack
            .last()
            .and_then(|&node| self.tree.as_element(node))
            .is_some_and(matches_token);
        if !current_matches {
            self.parse_error(
                ParseIssueKind::UnmatchedEndTag,
                format!("{token} does not match the current node"),
            );
        }

        for (index, &node) in stack.iter().enumerate().rev() {
            let Some(element) = self.tree.as_element(node) else {
                return;
            };
            if index + 1 < stack.len() && element.namespace == Namespace::Html {
                self.process_using_mode(self.mode, token);
                return;
            }
            if index == 0 {
                return;
            }
            if matches_token(element) {
                self.open_elements.pop_until_node(node);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use larch_dom::dump::dump_document;

    use super::*;
    use crate::parser::{HtmlParser, ParserOptions};

    fn dump(input: &str) -> String {
        dump_document(&HtmlParser::new(input, ParserOptions::new()).run())
    }

    #[test]
    fn test_foreign_attributes_get_namespaces() {
        let mut attrs = vec![
            Attribute::new("xlink:href", "#a"),
            Attribute::new("xml:lang", "en"),
            Attribute::new("xmlns", "http://www.w3.org/2000/svg"),
            Attribute::new("href", "#b"),
        ];
        adjust_foreign_attributes(&mut attrs);
        assert_eq!(attrs[0].namespace, Some(Namespace::XLink));
        assert_eq!(attrs[1].namespace, Some(Namespace::Xml));
        assert_eq!(attrs[2].namespace, Some(Namespace::XmlNs));
        assert_eq!(attrs[3].namespace, None);
    }

    #[test]
    fn test_breakout_font_needs_presentational_attribute() {
        assert!(is_breakout_start_tag("font", &[Attribute::new("color", "red")]));
        assert!(!is_breakout_start_tag("font", &[Attribute::new("id", "x")]));
        assert!(is_breakout_start_tag("div", &[]));
        assert!(!is_breakout_start_tag("circle", &[]));
    }

    #[test]
    fn test_svg_names_are_adjusted() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <svg svg>
|       viewBox=\"0 0 1 1\"
|       <svg foreignObject>
|         <svg linearGradient>
";
        assert_eq!(
            dump("<!DOCTYPE html><svg viewbox='0 0 1 1'><foreignobject></foreignobject><lineargradient>"),
            expected
        );
    }

    #[test]
    fn test_html_breaks_out_of_svg() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <svg svg>
|       <svg g>
|     <p>
|       \"x\"
";
        assert_eq!(dump("<!DOCTYPE html><svg><g><p>x"), expected);
    }

    #[test]
    fn test_html_inside_foreign_object() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <svg svg>
|       <svg foreignObject>
|         <div>
|           \"x\"
";
        assert_eq!(dump("<!DOCTYPE html><svg><foreignObject><div>x</div></foreignObject></svg>"), expected);
    }

    #[test]
    fn test_mathml_text_integration_point() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <math math>
|       <math mi>
|         <b>
|           \"x\"
";
        assert_eq!(dump("<!DOCTYPE html><math><mi><b>x</b></mi></math>"), expected);
    }

    #[test]
    fn test_cdata_section_in_svg() {
        let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <svg svg>
|       \"a<b\"
";
        assert_eq!(dump("<!DOCTYPE html><svg><![CDATA[a<b]]></svg>"), expected);
    }
}
