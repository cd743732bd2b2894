//! Namespaces and document modes.
//!
//! [§ 2.1.8 Namespaces](https://infra.spec.whatwg.org/#namespaces)

use strum_macros::{Display, EnumString};

/// [§ 2.1.8 Namespaces](https://infra.spec.whatwg.org/#namespaces)
///
/// The namespaces an element or attribute produced by the HTML parser can
/// live in. Elements only ever use the first three; the remaining ones are
/// reachable through "adjust foreign attributes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Namespace {
    /// "The HTML namespace is `http://www.w3.org/1999/xhtml`."
    #[strum(serialize = "html")]
    Html,
    /// "The SVG namespace is `http://www.w3.org/2000/svg`."
    #[strum(serialize = "svg")]
    Svg,
    /// "The MathML namespace is `http://www.w3.org/1998/Math/MathML`."
    #[strum(serialize = "math")]
    MathMl,
    /// "The XLink namespace is `http://www.w3.org/1999/xlink`."
    #[strum(serialize = "xlink")]
    XLink,
    /// "The XML namespace is `http://www.w3.org/XML/1998/namespace`."
    #[strum(serialize = "xml")]
    Xml,
    /// "The XMLNS namespace is `http://www.w3.org/2000/xmlns/`."
    #[strum(serialize = "xmlns")]
    XmlNs,
}

impl Namespace {
    /// The namespace URL.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::Svg => "http://www.w3.org/2000/svg",
            Self::MathMl => "http://www.w3.org/1998/Math/MathML",
            Self::XLink => "http://www.w3.org/1999/xlink",
            Self::Xml => "http://www.w3.org/XML/1998/namespace",
            Self::XmlNs => "http://www.w3.org/2000/xmlns/",
        }
    }

    /// Look a namespace up by its URL.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        [
            Self::Html,
            Self::Svg,
            Self::MathMl,
            Self::XLink,
            Self::Xml,
            Self::XmlNs,
        ]
        .into_iter()
        .find(|ns| ns.url() == url)
    }
}

/// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#concept-document-mode)
///
/// "Each document has an associated ... mode ("no-quirks", "quirks", or
/// "limited-quirks")."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum QuirksMode {
    /// "no-quirks"
    #[default]
    #[strum(serialize = "no-quirks")]
    NoQuirks,
    /// "limited-quirks"
    #[strum(serialize = "limited-quirks")]
    LimitedQuirks,
    /// "quirks"
    #[strum(serialize = "quirks")]
    Quirks,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_url_lookup() {
        assert_eq!(
            Namespace::from_url("http://www.w3.org/2000/svg"),
            Some(Namespace::Svg)
        );
        assert_eq!(Namespace::from_url("urn:nothing"), None);
    }

    #[test]
    fn test_short_names() {
        assert_eq!(Namespace::MathMl.to_string(), "math");
        assert_eq!(Namespace::from_str("svg").ok(), Some(Namespace::Svg));
        assert_eq!(QuirksMode::LimitedQuirks.to_string(), "limited-quirks");
    }
}
