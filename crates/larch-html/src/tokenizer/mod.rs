//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.
//!
//! The tree builder pulls tokens one at a time through [`TokenSource`], so it
//! can switch the lexical state between two tokens (after `<title>`,
//! `<script>`, `<plaintext>`, ...).

/// Character reference states per § 13.2.5.72 - § 13.2.5.80.
mod character_reference;
/// HTML tokenizer state machine implementation.
pub mod core;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Token types produced by the tokenizer.
pub mod token;

use std::collections::VecDeque;

use strum_macros::Display;

pub use self::core::{HtmlTokenizer, TokenizerError};
pub use token::{Attribute, Token};

/// The tokenizer states the tree builder is allowed to request.
///
/// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
/// "switch the tokenizer to the RCDATA state" / "RAWTEXT state" / ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LexicalState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    Rcdata,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    Rawtext,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    Plaintext,
}

/// A pull-based token producer driven by the tree builder.
pub trait TokenSource {
    /// Produce the next token. Once the end of input has been reached this
    /// keeps returning [`Token::EndOfFile`].
    fn next_token(&mut self) -> Token;

    /// Switch the lexical state before the next token is produced.
    fn switch_state(&mut self, state: LexicalState);

    /// Override the "last start tag" used for appropriate end tag detection.
    ///
    /// Fragment parsing seeds this with the context element's name.
    fn set_last_start_tag(&mut self, name: Option<&str>);

    /// Whether `<![CDATA[` opens a CDATA section. The tree builder sets this
    /// from the adjusted current node before each token.
    fn set_cdata_allowed(&mut self, allowed: bool);

    /// Take the tokenizer parse errors reported since the last call.
    fn drain_errors(&mut self) -> Vec<TokenizerError> {
        Vec::new()
    }
}

/// Replays a prepared token sequence.
///
/// Lexical state requests are ignored: the tokens were already produced.
#[derive(Debug, Clone, Default)]
pub struct TokenVec {
    tokens: VecDeque<Token>,
}

impl TokenVec {
    /// Create a source over `tokens`. An end-of-file token is implied after
    /// the last one.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }
}

impl TokenSource for TokenVec {
    fn next_token(&mut self) -> Token {
        self.tokens.pop_front().unwrap_or(Token::EndOfFile)
    }

    fn switch_state(&mut self, _state: LexicalState) {}

    fn set_last_start_tag(&mut self, _name: Option<&str>) {}

    fn set_cdata_allowed(&mut self, _allowed: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_vec_ends_with_eof() {
        let mut source = TokenVec::new(vec![Token::character('a')]);
        assert_eq!(source.next_token(), Token::character('a'));
        assert_eq!(source.next_token(), Token::EndOfFile);
        assert_eq!(source.next_token(), Token::EndOfFile);
    }
}
