//! HTML tokenizer and tree builder for larch.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, script data, PLAINTEXT and CDATA states
//!   - DOCTYPE, comment, and character reference handling
//!   - Pull-based [`TokenSource`] so the tree builder can switch lexical
//!     states between tokens
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes and the rules for foreign content
//!   - Stack of open elements, list of active formatting elements, the
//!     adoption agency algorithm and foster parenting
//!   - Template contents, frameset handling, quirks mode from the DOCTYPE
//!
//! - **Fragment parsing** ([WHATWG § 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!   and the `innerHTML` / `outerHTML` setters.
//!
//! # Not Implemented
//!
//! - Script execution and `document.write`
//! - Encoding sniffing; input is already a `&str`

/// Errors from the markup setters.
pub mod error;
/// Fragment parsing and markup setters.
pub mod fragment;
/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use larch_dom::DomTree;

pub use error::StructuralError;
pub use fragment::{ParsedFragment, parse_fragment, set_inner_html, set_outer_html};
pub use parser::{
    FragmentContext, HtmlParser, InsertionMode, ParseIssue, ParseIssueKind, ParserOptions,
    TreeBuilder,
};
pub use tokenizer::{Attribute, HtmlTokenizer, LexicalState, Token, TokenSource, TokenVec};

/// Parse a complete document.
///
/// ```
/// use larch_html::{ParserOptions, parse_document};
///
/// let tree = parse_document("<p>Hello", ParserOptions::new());
/// assert!(tree.body().is_some());
/// ```
#[must_use]
pub fn parse_document(html: &str, options: ParserOptions) -> DomTree {
    HtmlParser::new(html, options).run()
}
