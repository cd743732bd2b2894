//! Advisory parse errors.

use strum_macros::Display;

/// What kind of recoverable problem a [`ParseIssue`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParseIssueKind {
    /// Reported by the tokenizer (WHATWG error code in the message).
    #[strum(serialize = "tokenizer")]
    Tokenizer,
    /// A token that the current insertion mode ignores.
    #[strum(serialize = "ignored-token")]
    IgnoredToken,
    /// A token arrived where the tree had to be repaired around it.
    #[strum(serialize = "unexpected-token")]
    UnexpectedToken,
    /// An end tag whose element was not open, or not in scope.
    #[strum(serialize = "unmatched-end-tag")]
    UnmatchedEndTag,
    /// Elements were closed implicitly at the end of the input or by a parent.
    #[strum(serialize = "unclosed-element")]
    UnclosedElement,
    /// A missing, malformed, or quirky DOCTYPE.
    #[strum(serialize = "doctype")]
    Doctype,
    /// Content moved out of a table by foster parenting.
    #[strum(serialize = "foster-parented")]
    FosterParented,
    /// The adoption agency algorithm had to restructure formatting elements.
    #[strum(serialize = "misnested-formatting")]
    MisnestedFormatting,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// "This specification defines the parsing rules for HTML documents, whether
/// they are syntactically correct or not. Certain points in the parsing
/// algorithm are said to be parse errors. The error handling for parse errors
/// is well-defined."
///
/// Parse issues never stop the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index of the token being processed when the issue was raised.
    pub token_index: usize,
    /// Category of the issue.
    pub kind: ParseIssueKind,
}

impl std::fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] token {}: {}", self.kind, self.token_index, self.message)
    }
}
