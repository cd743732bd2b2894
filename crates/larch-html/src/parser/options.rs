//! Parser configuration.

use larch_dom::{AttributeList, Namespace, QuirksMode};

/// Settings that change how a document is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// [§ 13.2.1](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for the
    /// Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    ///
    /// Only selects the `noscript` parsing branches; nothing is executed.
    pub scripting_enabled: bool,
    /// The document is an `iframe` `srcdoc` document, which is never put in
    /// quirks mode by its DOCTYPE.
    pub iframe_srcdoc: bool,
    /// Keep parse issues for retrieval after the parse.
    pub collect_issues: bool,
}

impl ParserOptions {
    /// Scripting disabled, not an `iframe` `srcdoc` document, issues collected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scripting_enabled: false,
            iframe_srcdoc: false,
            collect_issues: true,
        }
    }

    /// Set the scripting flag.
    #[must_use]
    pub const fn with_scripting(mut self, enabled: bool) -> Self {
        self.scripting_enabled = enabled;
        self
    }

    /// Mark the document as an `iframe` `srcdoc` document.
    #[must_use]
    pub const fn with_iframe_srcdoc(mut self, srcdoc: bool) -> Self {
        self.iframe_srcdoc = srcdoc;
        self
    }

    /// Choose whether parse issues are kept.
    #[must_use]
    pub const fn with_issue_collection(mut self, collect: bool) -> Self {
        self.collect_issues = collect;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// The context element a fragment is parsed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContext {
    /// Local name of the context element.
    pub local_name: String,
    /// Namespace of the context element.
    pub namespace: Namespace,
    /// Attributes of the context element. Only consulted for `annotation-xml`
    /// integration points and `font` breakouts.
    pub attributes: AttributeList,
    /// Whether the context element is a `form` or has a `form` ancestor.
    pub form_ancestor: bool,
    /// Mode of the document the context element belongs to.
    pub quirks_mode: QuirksMode,
}

impl FragmentContext {
    /// An HTML context element with no attributes.
    #[must_use]
    pub fn html(local_name: &str) -> Self {
        Self {
            local_name: local_name.to_string(),
            namespace: Namespace::Html,
            attributes: AttributeList::new(),
            form_ancestor: false,
            quirks_mode: QuirksMode::NoQuirks,
        }
    }

    /// A context element in another namespace.
    #[must_use]
    pub fn foreign(namespace: Namespace, local_name: &str) -> Self {
        Self {
            namespace,
            ..Self::html(local_name)
        }
    }
}
