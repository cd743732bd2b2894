use std::collections::VecDeque;

use log::debug;

use super::token::{Attribute, Token};
use super::{LexicalState, TokenSource};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
/// The quoted attribute value and DOCTYPE identifier states carry their quote
/// character instead of existing twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    Data,
    Rcdata,
    Rawtext,
    ScriptData,
    Plaintext,
    TagOpen,
    EndTagOpen,
    TagName,
    RcdataLessThanSign,
    RcdataEndTagOpen,
    RcdataEndTagName,
    RawtextLessThanSign,
    RawtextEndTagOpen,
    RawtextEndTagName,
    ScriptDataLessThanSign,
    ScriptDataEndTagOpen,
    ScriptDataEndTagName,
    ScriptDataEscapeStart,
    ScriptDataEscapeStartDash,
    ScriptDataEscaped,
    ScriptDataEscapedDash,
    ScriptDataEscapedDashDash,
    ScriptDataEscapedLessThanSign,
    ScriptDataEscapedEndTagOpen,
    ScriptDataEscapedEndTagName,
    ScriptDataDoubleEscapeStart,
    ScriptDataDoubleEscaped,
    ScriptDataDoubleEscapedDash,
    ScriptDataDoubleEscapedDashDash,
    ScriptDataDoubleEscapedLessThanSign,
    ScriptDataDoubleEscapeEnd,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueQuoted(char),
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    BogusComment,
    MarkupDeclarationOpen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentLessThanSign,
    CommentLessThanSignBang,
    CommentLessThanSignBangDash,
    CommentLessThanSignBangDashDash,
    CommentEndDash,
    CommentEnd,
    CommentEndBang,
    Doctype,
    BeforeDoctypeName,
    DoctypeName,
    AfterDoctypeName,
    AfterDoctypePublicKeyword,
    BeforeDoctypePublicIdentifier,
    DoctypePublicIdentifierQuoted(char),
    AfterDoctypePublicIdentifier,
    BetweenDoctypePublicAndSystemIdentifiers,
    AfterDoctypeSystemKeyword,
    BeforeDoctypeSystemIdentifier,
    DoctypeSystemIdentifierQuoted(char),
    AfterDoctypeSystemIdentifier,
    BogusDoctype,
    CdataSection,
    CdataSectionBracket,
    CdataSectionEnd,
    CharacterReference,
    NamedCharacterReference,
    AmbiguousAmpersand,
    NumericCharacterReference,
    HexadecimalCharacterReferenceStart,
    DecimalCharacterReferenceStart,
    HexadecimalCharacterReference,
    DecimalCharacterReference,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A tokenizer-level parse error, named by its WHATWG error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerError {
    /// Offset (in characters, after newline normalization) where it was detected.
    pub position: usize,
    /// The error code, e.g. `unexpected-null-character`.
    pub code: &'static str,
}

/// The tag token under construction.
#[derive(Debug, Default)]
struct TagBuilder {
    is_end: bool,
    name: String,
    self_closing: bool,
    attributes: Vec<Attribute>,
    current: Option<Attribute>,
}

/// The DOCTYPE token under construction.
#[derive(Debug, Default)]
struct DoctypeBuilder {
    name: Option<String>,
    public_identifier: Option<String>,
    system_identifier: Option<String>,
    force_quirks: bool,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to
/// tokenize HTML."
///
/// Tokens are produced lazily: [`TokenSource::next_token`] runs the state
/// machine until at least one token is queued.
pub struct HtmlTokenizer {
    /// Preprocessed input stream.
    input: Vec<char>,
    /// Index of the next input character.
    pub(super) pos: usize,
    pub(super) state: State,
    /// "return state" for character references.
    pub(super) return_state: State,
    pub(super) temporary_buffer: String,
    pub(super) character_reference_code: u32,
    queue: VecDeque<Token>,
    tag: TagBuilder,
    comment: String,
    doctype: DoctypeBuilder,
    last_start_tag: Option<String>,
    cdata_allowed: bool,
    eof_emitted: bool,
    errors: Vec<TokenizerError>,
}

impl HtmlTokenizer {
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines. ... replace every U+000D CR U+000A LF code point
    /// pair with a single U+000A LF code point, and then replace every
    /// remaining U+000D CR code point with a U+000A LF code point."
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut iter = input.chars().peekable();
        while let Some(c) = iter.next() {
            if c == '\r' {
                let _ = iter.next_if_eq(&'\n');
                chars.push('\n');
            } else {
                chars.push(c);
            }
        }
        Self {
            input: chars,
            pos: 0,
            state: State::Data,
            return_state: State::Data,
            temporary_buffer: String::new(),
            character_reference_code: 0,
            queue: VecDeque::new(),
            tag: TagBuilder::default(),
            comment: String::new(),
            doctype: DoctypeBuilder::default(),
            last_start_tag: None,
            cdata_allowed: false,
            eof_emitted: false,
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole input in the data state, with no tree builder
    /// feedback. Mostly useful for tests and debugging.
    #[must_use]
    pub fn tokenize_all(input: &str) -> Vec<Token> {
        let mut tokenizer = Self::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Parse errors reported so far that have not been drained.
    #[must_use]
    pub fn errors(&self) -> &[TokenizerError] {
        &self.errors
    }

    /// "Consume the next input character"
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// "Reconsume in the X state"
    fn reconsume(&mut self, c: Option<char>, state: State) {
        if c.is_some() {
            self.pos -= 1;
        }
        self.state = state;
    }

    /// The input after the current position.
    pub(super) fn remaining(&self) -> &[char] {
        &self.input[self.pos..]
    }

    /// "If the next few characters are ..." (ASCII case-insensitive when asked).
    fn next_few_characters_are(&self, target: &str, ignore_case: bool) -> bool {
        let rest = self.remaining();
        target.chars().count() <= rest.len()
            && target.chars().zip(rest).all(|(t, &c)| {
                if ignore_case {
                    t.eq_ignore_ascii_case(&c)
                } else {
                    t == c
                }
            })
    }

    pub(super) fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    pub(super) fn parse_error(&mut self, code: &'static str) {
        debug!("tokenizer parse error {code} at {}", self.pos);
        self.errors.push(TokenizerError {
            position: self.pos,
            code,
        });
    }

    pub(super) fn emit_char(&mut self, c: char) {
        self.queue.push_back(Token::Character { data: c });
    }

    fn emit_str(&mut self, s: &str) {
        for c in s.chars() {
            self.emit_char(c);
        }
    }

    fn emit_eof(&mut self) {
        self.queue.push_back(Token::EndOfFile);
        self.eof_emitted = true;
    }

    fn emit_comment(&mut self) {
        let data = std::mem::take(&mut self.comment);
        self.queue.push_back(Token::Comment { data });
    }

    fn emit_doctype(&mut self) {
        let doctype = std::mem::take(&mut self.doctype);
        self.queue.push_back(Token::Doctype {
            name: doctype.name,
            public_identifier: doctype.public_identifier,
            system_identifier: doctype.system_identifier,
            force_quirks: doctype.force_quirks,
        });
    }

    fn new_tag(&mut self, is_end: bool) {
        self.tag = TagBuilder {
            is_end,
            ..TagBuilder::default()
        };
    }

    fn start_attribute(&mut self, name: &str) {
        self.commit_attribute();
        self.tag.current = Some(Attribute::new(name, ""));
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "if there is already an attribute on the token with the exact same name,
    /// then this is a duplicate-attribute parse error and the new attribute
    /// must be removed from the token."
    fn commit_attribute(&mut self) {
        let Some(attr) = self.tag.current.take() else {
            return;
        };
        if self.tag.attributes.iter().any(|a| a.name == attr.name) {
            self.parse_error("duplicate-attribute");
        } else {
            self.tag.attributes.push(attr);
        }
    }

    fn push_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.tag.current.as_mut() {
            attr.name.push(c);
        }
    }

    pub(super) fn push_attribute_value(&mut self, c: char) {
        if let Some(attr) = self.tag.current.as_mut() {
            attr.value.push(c);
        }
    }

    fn emit_tag(&mut self) {
        self.commit_attribute();
        let tag = std::mem::take(&mut self.tag);
        if tag.is_end {
            if !tag.attributes.is_empty() {
                self.parse_error("end-tag-with-attributes");
            }
            if tag.self_closing {
                self.parse_error("end-tag-with-trailing-solidus");
            }
            self.queue.push_back(Token::EndTag { name: tag.name });
        } else {
            self.last_start_tag = Some(tag.name.clone());
            self.queue.push_back(Token::StartTag {
                name: tag.name,
                self_closing: tag.self_closing,
                attributes: tag.attributes,
            });
        }
    }

    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    fn is_appropriate_end_tag(&self) -> bool {
        self.tag.is_end && self.last_start_tag.as_deref() == Some(self.tag.name.as_str())
    }

    fn doctype_name_push(&mut self, c: char) {
        self.doctype.name.get_or_insert_with(String::new).push(c);
    }

    fn doctype_force_quirks_eof(&mut self) {
        self.parse_error("eof-in-doctype");
        self.doctype.force_quirks = true;
        self.emit_doctype();
        self.emit_eof();
    }

    fn doctype_abrupt_end(&mut self, code: &'static str) {
        self.parse_error(code);
        self.doctype.force_quirks = true;
        self.state = State::Data;
        self.emit_doctype();
    }

    fn doctype_bogus(&mut self, c: Option<char>, code: &'static str, force_quirks: bool) {
        self.parse_error(code);
        if force_quirks {
            self.doctype.force_quirks = true;
        }
        self.reconsume(c, State::BogusDoctype);
    }

    /// Shared "less-than sign" state of RCDATA and RAWTEXT.
    fn text_less_than_sign(&mut self, c: Option<char>, end_tag_open: State, text: State) {
        if c == Some('/') {
            self.temporary_buffer.clear();
            self.state = end_tag_open;
        } else {
            self.emit_char('<');
            self.reconsume(c, text);
        }
    }

    /// Shared "end tag open" state of RCDATA, RAWTEXT and the script data states.
    fn text_end_tag_open(&mut self, c: Option<char>, end_tag_name: State, text: State) {
        if c.is_some_and(|c| c.is_ascii_alphabetic()) {
            self.new_tag(true);
            self.reconsume(c, end_tag_name);
        } else {
            self.emit_str("</");
            self.reconsume(c, text);
        }
    }

    /// Shared "end tag name" state of RCDATA, RAWTEXT and the script data states.
    ///
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    fn text_end_tag_name(&mut self, c: Option<char>, text: State) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') if self.is_appropriate_end_tag() => {
                self.state = State::BeforeAttributeName;
            }
            Some('/') if self.is_appropriate_end_tag() => self.state = State::SelfClosingStartTag,
            Some('>') if self.is_appropriate_end_tag() => {
                self.state = State::Data;
                self.emit_tag();
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.tag.name.push(c.to_ascii_lowercase());
                self.temporary_buffer.push(c);
            }
            _ => {
                // "Emit a U+003C LESS-THAN SIGN character token, a U+002F
                // SOLIDUS character token, and a character token for each of
                // the characters in the temporary buffer"
                self.emit_str("</");
                let buffer = std::mem::take(&mut self.temporary_buffer);
                self.emit_str(&buffer);
                self.reconsume(c, text);
            }
        }
    }

    /// Run the state machine for one input character.
    #[allow(clippy::cognitive_complexity)]
    fn step(&mut self) {
        // These states look ahead without consuming first.
        match self.state {
            State::MarkupDeclarationOpen => {
                self.markup_declaration_open();
                return;
            }
            State::NamedCharacterReference => {
                self.named_character_reference();
                return;
            }
            _ => {}
        }

        let c = self.consume();
        match self.state {
            // [§ 13.2.5.1 Data state]
            State::Data => match c {
                Some('&') => {
                    self.return_state = State::Data;
                    self.state = State::CharacterReference;
                }
                Some('<') => self.state = State::TagOpen,
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.emit_char('\0');
                }
                Some(c) => self.emit_char(c),
                None => self.emit_eof(),
            },
            // [§ 13.2.5.2 RCDATA state]
            State::Rcdata => match c {
                Some('&') => {
                    self.return_state = State::Rcdata;
                    self.state = State::CharacterReference;
                }
                Some('<') => self.state = State::RcdataLessThanSign,
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.emit_char('\u{FFFD}');
                }
                Some(c) => self.emit_char(c),
                None => self.emit_eof(),
            },
            // [§ 13.2.5.3 RAWTEXT state], [§ 13.2.5.4 Script data state],
            // [§ 13.2.5.5 PLAINTEXT state]
            State::Rawtext | State::ScriptData | State::Plaintext => match c {
                Some('<') if self.state == State::Rawtext => {
                    self.state = State::RawtextLessThanSign;
                }
                Some('<') if self.state == State::ScriptData => {
                    self.state = State::ScriptDataLessThanSign;
                }
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.emit_char('\u{FFFD}');
                }
                Some(c) => self.emit_char(c),
                None => self.emit_eof(),
            },
            // [§ 13.2.5.6 Tag open state]
            State::TagOpen => match c {
                Some('!') => self.state = State::MarkupDeclarationOpen,
                Some('/') => self.state = State::EndTagOpen,
                Some(a) if a.is_ascii_alphabetic() => {
                    self.new_tag(false);
                    self.reconsume(c, State::TagName);
                }
                Some('?') => {
                    self.parse_error("unexpected-question-mark-instead-of-tag-name");
                    self.comment.clear();
                    self.reconsume(c, State::BogusComment);
                }
                None => {
                    self.parse_error("eof-before-tag-name");
                    self.emit_char('<');
                    self.emit_eof();
                }
                Some(_) => {
                    self.parse_error("invalid-first-character-of-tag-name");
                    self.emit_char('<');
                    self.reconsume(c, State::Data);
                }
            },
            // [§ 13.2.5.7 End tag open state]
            State::EndTagOpen => match c {
                Some(a) if a.is_ascii_alphabetic() => {
                    self.new_tag(true);
                    self.reconsume(c, State::TagName);
                }
                Some('>') => {
                    self.parse_error("missing-end-tag-name");
                    self.state = State::Data;
                }
                None => {
                    self.parse_error("eof-before-tag-name");
                    self.emit_str("</");
                    self.emit_eof();
                }
                Some(_) => {
                    self.parse_error("invalid-first-character-of-tag-name");
                    self.comment.clear();
                    self.reconsume(c, State::BogusComment);
                }
            },
            // [§ 13.2.5.8 Tag name state]
            State::TagName => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => self.state = State::BeforeAttributeName,
                Some('/') => self.state = State::SelfClosingStartTag,
                Some('>') => {
                    self.state = State::Data;
                    self.emit_tag();
                }
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.tag.name.push('\u{FFFD}');
                }
                Some(c) => self.tag.name.push(c.to_ascii_lowercase()),
                None => {
                    self.parse_error("eof-in-tag");
                    self.emit_eof();
                }
            },
            State::RcdataLessThanSign => {
                self.text_less_than_sign(c, State::RcdataEndTagOpen, State::Rcdata);
            }
            State::RcdataEndTagOpen => {
                self.text_end_tag_open(c, State::RcdataEndTagName, State::Rcdata);
            }
            State::RcdataEndTagName => self.text_end_tag_name(c, State::Rcdata),
            State::RawtextLessThanSign => {
                self.text_less_than_sign(c, State::RawtextEndTagOpen, State::Rawtext);
            }
            State::RawtextEndTagOpen => {
                self.text_end_tag_open(c, State::RawtextEndTagName, State::Rawtext);
            }
            State::RawtextEndTagName => self.text_end_tag_name(c, State::Rawtext),
            // [§ 13.2.5.15 Script data less-than sign state]
            State::ScriptDataLessThanSign => match c {
                Some('/') => {
                    self.temporary_buffer.clear();
                    self.state = State::ScriptDataEndTagOpen;
                }
                Some('!') => {
                    self.state = State::ScriptDataEscapeStart;
                    self.emit_str("<!");
                }
                _ => {
                    self.emit_char('<');
                    self.reconsume(c, State::ScriptData);
                }
            },
            State::ScriptDataEndTagOpen => {
                self.text_end_tag_open(c, State::ScriptDataEndTagName, State::ScriptData);
            }
            State::ScriptDataEndTagName => self.text_end_tag_name(c, State::ScriptData),
            // [§ 13.2.5.18 Script data escape start state]
            State::ScriptDataEscapeStart => {
                if c == Some('-') {
                    self.state = State::ScriptDataEscapeStartDash;
                    self.emit_char('-');
                } else {
                    self.reconsume(c, State::ScriptData);
                }
            }
            // [§ 13.2.5.19 Script data escape start dash state]
            State::ScriptDataEscapeStartDash => {
                if c == Some('-') {
                    self.state = State::ScriptDataEscapedDashDash;
                    self.emit_char('-');
                } else {
                    self.reconsume(c, State::ScriptData);
                }
            }
            // [§ 13.2.5.20 - 22 Script data escaped states]
            State::ScriptDataEscaped | State::ScriptDataEscapedDash | State::ScriptDataEscapedDashDash => {
                self.script_data_escaped(c);
            }
            // [§ 13.2.5.23 Script data escaped less-than sign state]
            State::ScriptDataEscapedLessThanSign => match c {
                Some('/') => {
                    self.temporary_buffer.clear();
                    self.state = State::ScriptDataEscapedEndTagOpen;
                }
                Some(a) if a.is_ascii_alphabetic() => {
                    self.temporary_buffer.clear();
                    self.emit_char('<');
                    self.reconsume(c, State::ScriptDataDoubleEscapeStart);
                }
                _ => {
                    self.emit_char('<');
                    self.reconsume(c, State::ScriptDataEscaped);
                }
            },
            State::ScriptDataEscapedEndTagOpen => {
                self.text_end_tag_open(c, State::ScriptDataEscapedEndTagName, State::ScriptDataEscaped);
            }
            State::ScriptDataEscapedEndTagName => self.text_end_tag_name(c, State::ScriptDataEscaped),
            // [§ 13.2.5.26 Script data double escape start state]
            // [§ 13.2.5.31 Script data double escape end state]
            State::ScriptDataDoubleEscapeStart | State::ScriptDataDoubleEscapeEnd => {
                let starting = self.state == State::ScriptDataDoubleEscapeStart;
                let (matched, unmatched) = if starting {
                    (State::ScriptDataDoubleEscaped, State::ScriptDataEscaped)
                } else {
                    (State::ScriptDataEscaped, State::ScriptDataDoubleEscaped)
                };
                match c {
                    Some(ch @ ('\t' | '\n' | '\x0C' | ' ' | '/' | '>')) => {
                        self.state = if self.temporary_buffer == "script" {
                            matched
                        } else {
                            unmatched
                        };
                        self.emit_char(ch);
                    }
                    Some(ch) if ch.is_ascii_alphabetic() => {
                        self.temporary_buffer.push(ch.to_ascii_lowercase());
                        self.emit_char(ch);
                    }
                    _ => self.reconsume(c, unmatched),
                }
            }
            // [§ 13.2.5.27 - 29 Script data double escaped states]
            State::ScriptDataDoubleEscaped
            | State::ScriptDataDoubleEscapedDash
            | State::ScriptDataDoubleEscapedDashDash => self.script_data_double_escaped(c),
            // [§ 13.2.5.30 Script data double escaped less-than sign state]
            State::ScriptDataDoubleEscapedLessThanSign => {
                if c == Some('/') {
                    self.temporary_buffer.clear();
                    self.state = State::ScriptDataDoubleEscapeEnd;
                    self.emit_char('/');
                } else {
                    self.reconsume(c, State::ScriptDataDoubleEscaped);
                }
            }
            // [§ 13.2.5.32 Before attribute name state]
            State::BeforeAttributeName => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => {}
                Some('/' | '>') | None => self.reconsume(c, State::AfterAttributeName),
                Some('=') => {
                    self.parse_error("unexpected-equals-sign-before-attribute-name");
                    self.start_attribute("=");
                    self.state = State::AttributeName;
                }
                Some(_) => {
                    self.start_attribute("");
                    self.reconsume(c, State::AttributeName);
                }
            },
            // [§ 13.2.5.33 Attribute name state]
            State::AttributeName => match c {
                Some('\t' | '\n' | '\x0C' | ' ' | '/' | '>') | None => {
                    self.reconsume(c, State::AfterAttributeName);
                }
                Some('=') => self.state = State::BeforeAttributeValue,
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.push_attribute_name('\u{FFFD}');
                }
                Some(ch) => {
                    if matches!(ch, '"' | '\'' | '<') {
                        self.parse_error("unexpected-character-in-attribute-name");
                    }
                    self.push_attribute_name(ch.to_ascii_lowercase());
                }
            },
            // [§ 13.2.5.34 After attribute name state]
            State::AfterAttributeName => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => {}
                Some('/') => self.state = State::SelfClosingStartTag,
                Some('=') => self.state = State::BeforeAttributeValue,
                Some('>') => {
                    self.state = State::Data;
                    self.emit_tag();
                }
                None => {
                    self.parse_error("eof-in-tag");
                    self.emit_eof();
                }
                Some(_) => {
                    self.start_attribute("");
                    self.reconsume(c, State::AttributeName);
                }
            },
            // [§ 13.2.5.35 Before attribute value state]
            State::BeforeAttributeValue => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => {}
                Some(q @ ('"' | '\'')) => self.state = State::AttributeValueQuoted(q),
                Some('>') => {
                    self.parse_error("missing-attribute-value");
                    self.state = State::Data;
                    self.emit_tag();
                }
                _ => self.reconsume(c, State::AttributeValueUnquoted),
            },
            // [§ 13.2.5.36 - 37 Attribute value (quoted) states]
            State::AttributeValueQuoted(quote) => match c {
                Some(q) if q == quote => self.state = State::AfterAttributeValueQuoted,
                Some('&') => {
                    self.return_state = State::AttributeValueQuoted(quote);
                    self.state = State::CharacterReference;
                }
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.push_attribute_value('\u{FFFD}');
                }
                Some(ch) => self.push_attribute_value(ch),
                None => {
                    self.parse_error("eof-in-tag");
                    self.emit_eof();
                }
            },
            // [§ 13.2.5.38 Attribute value (unquoted) state]
            State::AttributeValueUnquoted => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => self.state = State::BeforeAttributeName,
                Some('&') => {
                    self.return_state = State::AttributeValueUnquoted;
                    self.state = State::CharacterReference;
                }
                Some('>') => {
                    self.state = State::Data;
                    self.emit_tag();
                }
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.push_attribute_value('\u{FFFD}');
                }
                Some(ch) => {
                    if matches!(ch, '"' | '\'' | '<' | '=' | '`') {
                        self.parse_error("unexpected-character-in-unquoted-attribute-value");
                    }
                    self.push_attribute_value(ch);
                }
                None => {
                    self.parse_error("eof-in-tag");
                    self.emit_eof();
                }
            },
            // [§ 13.2.5.39 After attribute value (quoted) state]
            State::AfterAttributeValueQuoted => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => self.state = State::BeforeAttributeName,
                Some('/') => self.state = State::SelfClosingStartTag,
                Some('>') => {
                    self.state = State::Data;
                    self.emit_tag();
                }
                None => {
                    self.parse_error("eof-in-tag");
                    self.emit_eof();
                }
                Some(_) => {
                    self.parse_error("missing-whitespace-between-attributes");
                    self.reconsume(c, State::BeforeAttributeName);
                }
            },
            // [§ 13.2.5.40 Self-closing start tag state]
            State::SelfClosingStartTag => match c {
                Some('>') => {
                    self.tag.self_closing = true;
                    self.state = State::Data;
                    self.emit_tag();
                }
                None => {
                    self.parse_error("eof-in-tag");
                    self.emit_eof();
                }
                Some(_) => {
                    self.parse_error("unexpected-solidus-in-tag");
                    self.reconsume(c, State::BeforeAttributeName);
                }
            },
            // [§ 13.2.5.41 Bogus comment state]
            State::BogusComment => match c {
                Some('>') => {
                    self.state = State::Data;
                    self.emit_comment();
                }
                None => {
                    self.emit_comment();
                    self.emit_eof();
                }
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.comment.push('\u{FFFD}');
                }
                Some(ch) => self.comment.push(ch),
            },
            // [§ 13.2.5.43 Comment start state]
            State::CommentStart => match c {
                Some('-') => self.state = State::CommentStartDash,
                Some('>') => {
                    self.parse_error("abrupt-closing-of-empty-comment");
                    self.state = State::Data;
                    self.emit_comment();
                }
                _ => self.reconsume(c, State::Comment),
            },
            // [§ 13.2.5.44 Comment start dash state]
            State::CommentStartDash => match c {
                Some('-') => self.state = State::CommentEnd,
                Some('>') => {
                    self.parse_error("abrupt-closing-of-empty-comment");
                    self.state = State::Data;
                    self.emit_comment();
                }
                None => self.eof_in_comment(),
                Some(_) => {
                    self.comment.push('-');
                    self.reconsume(c, State::Comment);
                }
            },
            // [§ 13.2.5.45 Comment state]
            State::Comment => match c {
                Some('<') => {
                    self.comment.push('<');
                    self.state = State::CommentLessThanSign;
                }
                Some('-') => self.state = State::CommentEndDash,
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.comment.push('\u{FFFD}');
                }
                Some(ch) => self.comment.push(ch),
                None => self.eof_in_comment(),
            },
            // [§ 13.2.5.46 Comment less-than sign state]
            State::CommentLessThanSign => match c {
                Some('!') => {
                    self.comment.push('!');
                    self.state = State::CommentLessThanSignBang;
                }
                Some('<') => self.comment.push('<'),
                _ => self.reconsume(c, State::Comment),
            },
            State::CommentLessThanSignBang => {
                if c == Some('-') {
                    self.state = State::CommentLessThanSignBangDash;
                } else {
                    self.reconsume(c, State::Comment);
                }
            }
            State::CommentLessThanSignBangDash => {
                if c == Some('-') {
                    self.state = State::CommentLessThanSignBangDashDash;
                } else {
                    self.reconsume(c, State::CommentEndDash);
                }
            }
            // [§ 13.2.5.49 Comment less-than sign bang dash dash state]
            State::CommentLessThanSignBangDashDash => {
                if !matches!(c, Some('>') | None) {
                    self.parse_error("nested-comment");
                }
                self.reconsume(c, State::CommentEnd);
            }
            // [§ 13.2.5.50 Comment end dash state]
            State::CommentEndDash => match c {
                Some('-') => self.state = State::CommentEnd,
                None => self.eof_in_comment(),
                Some(_) => {
                    self.comment.push('-');
                    self.reconsume(c, State::Comment);
                }
            },
            // [§ 13.2.5.51 Comment end state]
            State::CommentEnd => match c {
                Some('>') => {
                    self.state = State::Data;
                    self.emit_comment();
                }
                Some('!') => self.state = State::CommentEndBang,
                Some('-') => self.comment.push('-'),
                None => self.eof_in_comment(),
                Some(_) => {
                    self.comment.push_str("--");
                    self.reconsume(c, State::Comment);
                }
            },
            // [§ 13.2.5.52 Comment end bang state]
            State::CommentEndBang => match c {
                Some('-') => {
                    self.comment.push_str("--!");
                    self.state = State::CommentEndDash;
                }
                Some('>') => {
                    self.parse_error("incorrectly-closed-comment");
                    self.state = State::Data;
                    self.emit_comment();
                }
                None => self.eof_in_comment(),
                Some(_) => {
                    self.comment.push_str("--!");
                    self.reconsume(c, State::Comment);
                }
            },
            // [§ 13.2.5.53 DOCTYPE state]
            State::Doctype => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => self.state = State::BeforeDoctypeName,
                Some('>') => self.reconsume(c, State::BeforeDoctypeName),
                None => {
                    self.doctype = DoctypeBuilder::default();
                    self.doctype_force_quirks_eof();
                }
                Some(_) => {
                    self.parse_error("missing-whitespace-before-doctype-name");
                    self.reconsume(c, State::BeforeDoctypeName);
                }
            },
            // [§ 13.2.5.54 Before DOCTYPE name state]
            State::BeforeDoctypeName => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => {}
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.doctype = DoctypeBuilder::default();
                    self.doctype_name_push('\u{FFFD}');
                    self.state = State::DoctypeName;
                }
                Some('>') => {
                    self.doctype = DoctypeBuilder::default();
                    self.doctype_abrupt_end("missing-doctype-name");
                }
                None => {
                    self.doctype = DoctypeBuilder::default();
                    self.doctype_force_quirks_eof();
                }
                Some(ch) => {
                    self.doctype = DoctypeBuilder::default();
                    self.doctype_name_push(ch.to_ascii_lowercase());
                    self.state = State::DoctypeName;
                }
            },
            // [§ 13.2.5.55 DOCTYPE name state]
            State::DoctypeName => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => self.state = State::AfterDoctypeName,
                Some('>') => {
                    self.state = State::Data;
                    self.emit_doctype();
                }
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.doctype_name_push('\u{FFFD}');
                }
                Some(ch) => self.doctype_name_push(ch.to_ascii_lowercase()),
                None => self.doctype_force_quirks_eof(),
            },
            // [§ 13.2.5.56 After DOCTYPE name state]
            State::AfterDoctypeName => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => {}
                Some('>') => {
                    self.state = State::Data;
                    self.emit_doctype();
                }
                None => self.doctype_force_quirks_eof(),
                Some(_) => {
                    // "If the six characters starting from the current input
                    // character are an ASCII case-insensitive match for the
                    // word "PUBLIC" ..."
                    self.pos -= 1;
                    if self.next_few_characters_are("PUBLIC", true) {
                        self.pos += 6;
                        self.state = State::AfterDoctypePublicKeyword;
                    } else if self.next_few_characters_are("SYSTEM", true) {
                        self.pos += 6;
                        self.state = State::AfterDoctypeSystemKeyword;
                    } else {
                        self.pos += 1;
                        self.doctype_bogus(c, "invalid-character-sequence-after-doctype-name", true);
                    }
                }
            },
            // [§ 13.2.5.57 After DOCTYPE public keyword state]
            // [§ 13.2.5.58 Before DOCTYPE public identifier state]
            State::AfterDoctypePublicKeyword | State::BeforeDoctypePublicIdentifier => {
                let after_keyword = self.state == State::AfterDoctypePublicKeyword;
                match c {
                    Some('\t' | '\n' | '\x0C' | ' ') => {
                        self.state = State::BeforeDoctypePublicIdentifier;
                    }
                    Some(q @ ('"' | '\'')) => {
                        if after_keyword {
                            self.parse_error("missing-whitespace-after-doctype-public-keyword");
                        }
                        self.doctype.public_identifier = Some(String::new());
                        self.state = State::DoctypePublicIdentifierQuoted(q);
                    }
                    Some('>') => self.doctype_abrupt_end("missing-doctype-public-identifier"),
                    None => self.doctype_force_quirks_eof(),
                    Some(_) => self.doctype_bogus(
                        c,
                        "missing-quote-before-doctype-public-identifier",
                        true,
                    ),
                }
            }
            // [§ 13.2.5.59 - 60 DOCTYPE public identifier (quoted) states]
            State::DoctypePublicIdentifierQuoted(quote) => match c {
                Some(q) if q == quote => self.state = State::AfterDoctypePublicIdentifier,
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.doctype
                        .public_identifier
                        .get_or_insert_with(String::new)
                        .push('\u{FFFD}');
                }
                Some('>') => self.doctype_abrupt_end("abrupt-doctype-public-identifier"),
                Some(ch) => self
                    .doctype
                    .public_identifier
                    .get_or_insert_with(String::new)
                    .push(ch),
                None => self.doctype_force_quirks_eof(),
            },
            // [§ 13.2.5.61 After DOCTYPE public identifier state]
            // [§ 13.2.5.62 Between DOCTYPE public and system identifiers state]
            State::AfterDoctypePublicIdentifier | State::BetweenDoctypePublicAndSystemIdentifiers => {
                let after = self.state == State::AfterDoctypePublicIdentifier;
                match c {
                    Some('\t' | '\n' | '\x0C' | ' ') => {
                        self.state = State::BetweenDoctypePublicAndSystemIdentifiers;
                    }
                    Some('>') => {
                        self.state = State::Data;
                        self.emit_doctype();
                    }
                    Some(q @ ('"' | '\'')) => {
                        if after {
                            self.parse_error(
                                "missing-whitespace-between-doctype-public-and-system-identifiers",
                            );
                        }
                        self.doctype.system_identifier = Some(String::new());
                        self.state = State::DoctypeSystemIdentifierQuoted(q);
                    }
                    None => self.doctype_force_quirks_eof(),
                    Some(_) => self.doctype_bogus(
                        c,
                        "missing-quote-before-doctype-system-identifier",
                        true,
                    ),
                }
            }
            // [§ 13.2.5.63 After DOCTYPE system keyword state]
            // [§ 13.2.5.64 Before DOCTYPE system identifier state]
            State::AfterDoctypeSystemKeyword | State::BeforeDoctypeSystemIdentifier => {
                let after_keyword = self.state == State::AfterDoctypeSystemKeyword;
                match c {
                    Some('\t' | '\n' | '\x0C' | ' ') => {
                        self.state = State::BeforeDoctypeSystemIdentifier;
                    }
                    Some(q @ ('"' | '\'')) => {
                        if after_keyword {
                            self.parse_error("missing-whitespace-after-doctype-system-keyword");
                        }
                        self.doctype.system_identifier = Some(String::new());
                        self.state = State::DoctypeSystemIdentifierQuoted(q);
                    }
                    Some('>') => self.doctype_abrupt_end("missing-doctype-system-identifier"),
                    None => self.doctype_force_quirks_eof(),
                    Some(_) => self.doctype_bogus(
                        c,
                        "missing-quote-before-doctype-system-identifier",
                        true,
                    ),
                }
            }
            // [§ 13.2.5.65 - 66 DOCTYPE system identifier (quoted) states]
            State::DoctypeSystemIdentifierQuoted(quote) => match c {
                Some(q) if q == quote => self.state = State::AfterDoctypeSystemIdentifier,
                Some('\0') => {
                    self.parse_error("unexpected-null-character");
                    self.doctype
                        .system_identifier
                        .get_or_insert_with(String::new)
                        .push('\u{FFFD}');
                }
                Some('>') => self.doctype_abrupt_end("abrupt-doctype-system-identifier"),
                Some(ch) => self
                    .doctype
                    .system_identifier
                    .get_or_insert_with(String::new)
                    .push(ch),
                None => self.doctype_force_quirks_eof(),
            },
            // [§ 13.2.5.67 After DOCTYPE system identifier state]
            State::AfterDoctypeSystemIdentifier => match c {
                Some('\t' | '\n' | '\x0C' | ' ') => {}
                Some('>') => {
                    self.state = State::Data;
                    self.emit_doctype();
                }
                None => self.doctype_force_quirks_eof(),
                Some(_) => self.doctype_bogus(
                    c,
                    "unexpected-character-after-doctype-system-identifier",
                    false,
                ),
            },
            // [§ 13.2.5.68 Bogus DOCTYPE state]
            State::BogusDoctype => match c {
                Some('>') => {
                    self.state = State::Data;
                    self.emit_doctype();
                }
                Some('\0') => self.parse_error("unexpected-null-character"),
                Some(_) => {}
                None => {
                    self.emit_doctype();
                    self.emit_eof();
                }
            },
            // [§ 13.2.5.69 CDATA section state]
            State::CdataSection => match c {
                Some(']') => self.state = State::CdataSectionBracket,
                Some(ch) => self.emit_char(ch),
                None => {
                    self.parse_error("eof-in-cdata");
                    self.emit_eof();
                }
            },
            // [§ 13.2.5.70 CDATA section bracket state]
            State::CdataSectionBracket => {
                if c == Some(']') {
                    self.state = State::CdataSectionEnd;
                } else {
                    self.emit_char(']');
                    self.reconsume(c, State::CdataSection);
                }
            }
            // [§ 13.2.5.71 CDATA section end state]
            State::CdataSectionEnd => match c {
                Some(']') => self.emit_char(']'),
                Some('>') => self.state = State::Data,
                _ => {
                    self.emit_str("]]");
                    self.reconsume(c, State::CdataSection);
                }
            },
            State::CharacterReference
            | State::AmbiguousAmpersand
            | State::NumericCharacterReference
            | State::HexadecimalCharacterReferenceStart
            | State::DecimalCharacterReferenceStart
            | State::HexadecimalCharacterReference
            | State::DecimalCharacterReference => self.character_reference_step(c),
            State::MarkupDeclarationOpen | State::NamedCharacterReference => {}
        }
    }

    fn eof_in_comment(&mut self) {
        self.parse_error("eof-in-comment");
        self.emit_comment();
        self.emit_eof();
    }

    /// [§ 13.2.5.20 Script data escaped state] and its two dash states.
    fn script_data_escaped(&mut self, c: Option<char>) {
        let state = self.state;
        match c {
            Some('-') => {
                self.state = match state {
                    State::ScriptDataEscaped => State::ScriptDataEscapedDash,
                    _ => State::ScriptDataEscapedDashDash,
                };
                self.emit_char('-');
            }
            Some('<') => self.state = State::ScriptDataEscapedLessThanSign,
            Some('>') if state == State::ScriptDataEscapedDashDash => {
                self.state = State::ScriptData;
                self.emit_char('>');
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.state = State::ScriptDataEscaped;
                self.emit_char('\u{FFFD}');
            }
            Some(ch) => {
                self.state = State::ScriptDataEscaped;
                self.emit_char(ch);
            }
            None => {
                self.parse_error("eof-in-script-html-comment-like-text");
                self.emit_eof();
            }
        }
    }

    /// [§ 13.2.5.27 Script data double escaped state] and its two dash states.
    fn script_data_double_escaped(&mut self, c: Option<char>) {
        let state = self.state;
        match c {
            Some('-') => {
                self.state = match state {
                    State::ScriptDataDoubleEscaped => State::ScriptDataDoubleEscapedDash,
                    _ => State::ScriptDataDoubleEscapedDashDash,
                };
                self.emit_char('-');
            }
            Some('<') => {
                self.state = State::ScriptDataDoubleEscapedLessThanSign;
                self.emit_char('<');
            }
            Some('>') if state == State::ScriptDataDoubleEscapedDashDash => {
                self.state = State::ScriptData;
                self.emit_char('>');
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.state = State::ScriptDataDoubleEscaped;
                self.emit_char('\u{FFFD}');
            }
            Some(ch) => {
                self.state = State::ScriptDataDoubleEscaped;
                self.emit_char(ch);
            }
            None => {
                self.parse_error("eof-in-script-html-comment-like-text");
                self.emit_eof();
            }
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn markup_declaration_open(&mut self) {
        if self.next_few_characters_are("--", false) {
            self.pos += 2;
            self.comment.clear();
            self.state = State::CommentStart;
        } else if self.next_few_characters_are("DOCTYPE", true) {
            self.pos += 7;
            self.state = State::Doctype;
        } else if self.next_few_characters_are("[CDATA[", false) {
            self.pos += 7;
            if self.cdata_allowed {
                self.state = State::CdataSection;
            } else {
                // "Otherwise, this is a cdata-in-html-content parse error.
                // Create a comment token whose data is the "[CDATA[" string."
                self.parse_error("cdata-in-html-content");
                self.comment = "[CDATA[".to_string();
                self.state = State::BogusComment;
            }
        } else {
            self.parse_error("incorrectly-opened-comment");
            self.comment.clear();
            self.state = State::BogusComment;
        }
    }

    /// Append to the current attribute value or emit, depending on where the
    /// character reference started.
    ///
    /// "Flush code points consumed as a character reference"
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            for c in buffer.chars() {
                self.push_attribute_value(c);
            }
        } else {
            self.emit_str(&buffer);
        }
    }

    /// "consumed as part of an attribute"
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            State::AttributeValueQuoted(_) | State::AttributeValueUnquoted
        )
    }

    /// Reconsume in the current return state.
    pub(super) fn reconsume_in_return_state(&mut self, c: Option<char>) {
        let state = self.return_state;
        self.reconsume(c, state);
    }
}

impl TokenSource for HtmlTokenizer {
    fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return token;
            }
            if self.eof_emitted {
                return Token::EndOfFile;
            }
            self.step();
        }
    }

    fn switch_state(&mut self, state: LexicalState) {
        self.state = match state {
            LexicalState::Data => State::Data,
            LexicalState::Rcdata => State::Rcdata,
            LexicalState::Rawtext => State::Rawtext,
            LexicalState::ScriptData => State::ScriptData,
            LexicalState::Plaintext => State::Plaintext,
        };
    }

    fn set_last_start_tag(&mut self, name: Option<&str>) {
        self.last_start_tag = name.map(str::to_string);
    }

    fn set_cdata_allowed(&mut self, allowed: bool) {
        self.cdata_allowed = allowed;
    }

    fn drain_errors(&mut self) -> Vec<TokenizerError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(tokens: &[Token]) -> String {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Character { data } => Some(*data),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_crlf_normalized() {
        let tokens = HtmlTokenizer::tokenize_all("a\r\nb\rc");
        assert_eq!(text_of(&tokens), "a\nb\nc");
    }

    #[test]
    fn test_duplicate_attribute_first_wins() {
        let mut tokenizer = HtmlTokenizer::new("<p a=1 a=2>");
        let token = tokenizer.next_token();
        assert_eq!(
            token,
            Token::StartTag {
                name: "p".to_string(),
                self_closing: false,
                attributes: vec![Attribute::new("a", "1")],
            }
        );
        assert_eq!(tokenizer.errors()[0].code, "duplicate-attribute");
    }

    #[test]
    fn test_rcdata_until_appropriate_end_tag() {
        let mut tokenizer = HtmlTokenizer::new("a</b></title>");
        tokenizer.set_last_start_tag(Some("title"));
        tokenizer.switch_state(LexicalState::Rcdata);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token.is_eof() {
                break;
            }
            tokens.push(token);
        }
        assert_eq!(text_of(&tokens), "a</b>");
        assert_eq!(tokens.last(), Some(&Token::end_tag("title")));
    }

    #[test]
    fn test_cdata_only_when_allowed() {
        let mut tokenizer = HtmlTokenizer::new("<![CDATA[x]]>");
        assert_eq!(tokenizer.next_token(), Token::comment("[CDATA[x]]"));

        let mut tokenizer = HtmlTokenizer::new("<![CDATA[x]]>");
        tokenizer.set_cdata_allowed(true);
        assert_eq!(tokenizer.next_token(), Token::character('x'));
        assert_eq!(tokenizer.next_token(), Token::EndOfFile);
    }

    #[test]
    fn test_script_double_escape() {
        let mut tokenizer = HtmlTokenizer::new("<!--<script></script>--></script>");
        tokenizer.set_last_start_tag(Some("script"));
        tokenizer.switch_state(LexicalState::ScriptData);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token.is_eof() {
                break;
            }
            tokens.push(token);
        }
        assert_eq!(text_of(&tokens), "<!--<script></script>-->");
        assert_eq!(tokens.last(), Some(&Token::end_tag("script")));
    }
}
