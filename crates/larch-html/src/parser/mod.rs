//! HTML tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! [`TreeBuilder`] holds the parser state and consumes tokens one at a time;
//! [`HtmlParser`] drives it from a [`TokenSource`](crate::tokenizer::TokenSource).

mod adoption;
mod core;
/// SVG and MathML adjustments and the foreign content rules.
pub mod foreign_content;
mod formatting;
mod insertion_mode;
mod issue;
mod modes;
mod open_elements;
mod options;
mod quirks;
mod tags;

pub use self::core::{HtmlParser, IssueSink, TreeBuilder};
pub use insertion_mode::InsertionMode;
pub use issue::{ParseIssue, ParseIssueKind};
pub use options::{FragmentContext, ParserOptions};
