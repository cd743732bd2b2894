//! Element categories used by tree construction.
//!
//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#special)

use larch_dom::Namespace;

/// "The following elements have varying levels of special parsing rules"
const SPECIAL_HTML: &[&str] = &[
    "address",
    "applet",
    "area",
    "article",
    "aside",
    "base",
    "basefont",
    "bgsound",
    "blockquote",
    "body",
    "br",
    "button",
    "caption",
    "center",
    "col",
    "colgroup",
    "dd",
    "details",
    "dir",
    "div",
    "dl",
    "dt",
    "embed",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frame",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hgroup",
    "hr",
    "html",
    "iframe",
    "img",
    "input",
    "keygen",
    "li",
    "link",
    "listing",
    "main",
    "marquee",
    "menu",
    "meta",
    "nav",
    "noembed",
    "noframes",
    "noscript",
    "object",
    "ol",
    "p",
    "param",
    "plaintext",
    "pre",
    "script",
    "search",
    "section",
    "select",
    "source",
    "style",
    "summary",
    "table",
    "tbody",
    "td",
    "template",
    "textarea",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "track",
    "ul",
    "wbr",
    "xmp",
];

/// "MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, and MathML
/// annotation-xml"
pub const MATHML_SCOPING: &[&str] = &["mi", "mo", "mn", "ms", "mtext", "annotation-xml"];

/// "SVG foreignObject, SVG desc, and SVG title"
pub const SVG_SCOPING: &[&str] = &["foreignObject", "desc", "title"];

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// "Formatting: The following HTML elements are those that end up in the list
/// of active formatting elements: a, b, big, code, em, font, i, nobr, s,
/// small, strike, strong, tt, and u."
pub const FORMATTING: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
///
/// "while the current node is a dd element, a dt element, an li element, an
/// optgroup element, an option element, a p element, an rb element, an rp
/// element, an rt element, or an rtc element"
pub const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "generate all implied end tags thoroughly" adds the table parts.
pub const IMPLIED_END_TAGS_THOROUGH: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Whether the element is in the "special" category.
#[must_use]
pub fn is_special(namespace: Namespace, tag_name: &str) -> bool {
    match namespace {
        Namespace::Html => SPECIAL_HTML.contains(&tag_name),
        Namespace::MathMl => MATHML_SCOPING.contains(&tag_name),
        Namespace::Svg => SVG_SCOPING.contains(&tag_name),
        _ => false,
    }
}

/// Whether the tag name is in the formatting category.
#[must_use]
pub fn is_formatting(tag_name: &str) -> bool {
    FORMATTING.contains(&tag_name)
}

/// Heading element names.
pub const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_is_namespace_aware() {
        assert!(is_special(Namespace::Html, "p"));
        assert!(!is_special(Namespace::Svg, "p"));
        assert!(is_special(Namespace::Svg, "foreignObject"));
        assert!(is_special(Namespace::MathMl, "mi"));
        assert!(!is_special(Namespace::Html, "span"));
    }

    #[test]
    fn test_formatting_category() {
        for tag in ["a", "b", "nobr", "tt", "u"] {
            assert!(is_formatting(tag), "{tag}");
        }
        assert!(!is_formatting("span"));
        assert!(!is_formatting("p"));
    }
}
