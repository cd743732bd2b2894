//! Character reference states of the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)

use super::core::{HtmlTokenizer, State};
use super::named_character_references::longest_match;

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column of that row."
const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

impl HtmlTokenizer {
    /// The character reference states that consume one character at a time.
    pub(super) fn character_reference_step(&mut self, c: Option<char>) {
        match self.state {
            // [§ 13.2.5.72 Character reference state]
            State::CharacterReference => {
                self.temporary_buffer.clear();
                self.temporary_buffer.push('&');
                match c {
                    Some(a) if a.is_ascii_alphanumeric() => {
                        self.pos -= 1;
                        self.state = State::NamedCharacterReference;
                    }
                    Some('#') => {
                        self.temporary_buffer.push('#');
                        self.state = State::NumericCharacterReference;
                    }
                    _ => {
                        self.flush_code_points_consumed_as_character_reference();
                        self.reconsume_in_return_state(c);
                    }
                }
            }
            // [§ 13.2.5.74 Ambiguous ampersand state]
            State::AmbiguousAmpersand => match c {
                Some(a) if a.is_ascii_alphanumeric() => {
                    if self.is_consumed_as_part_of_attribute() {
                        self.push_attribute_value(a);
                    } else {
                        self.emit_char(a);
                    }
                }
                Some(';') => {
                    self.parse_error("unknown-named-character-reference");
                    self.reconsume_in_return_state(c);
                }
                _ => self.reconsume_in_return_state(c),
            },
            // [§ 13.2.5.75 Numeric character reference state]
            State::NumericCharacterReference => {
                self.character_reference_code = 0;
                match c {
                    Some(x @ ('x' | 'X')) => {
                        self.temporary_buffer.push(x);
                        self.state = State::HexadecimalCharacterReferenceStart;
                    }
                    _ => {
                        if c.is_some() {
                            self.pos -= 1;
                        }
                        self.state = State::DecimalCharacterReferenceStart;
                    }
                }
            }
            // [§ 13.2.5.76 Hexadecimal character reference start state]
            // [§ 13.2.5.77 Decimal character reference start state]
            State::HexadecimalCharacterReferenceStart | State::DecimalCharacterReferenceStart => {
                let hex = self.state == State::HexadecimalCharacterReferenceStart;
                let is_digit = c.is_some_and(|d| {
                    if hex {
                        d.is_ascii_hexdigit()
                    } else {
                        d.is_ascii_digit()
                    }
                });
                if is_digit {
                    self.pos -= 1;
                    self.state = if hex {
                        State::HexadecimalCharacterReference
                    } else {
                        State::DecimalCharacterReference
                    };
                } else {
                    self.parse_error("absence-of-digits-in-numeric-character-reference");
                    self.flush_code_points_consumed_as_character_reference();
                    self.reconsume_in_return_state(c);
                }
            }
            // [§ 13.2.5.78 Hexadecimal character reference state]
            // [§ 13.2.5.79 Decimal character reference state]
            State::HexadecimalCharacterReference | State::DecimalCharacterReference => {
                let radix = if self.state == State::HexadecimalCharacterReference {
                    16
                } else {
                    10
                };
                match c {
                    Some(d) if d.is_digit(radix) => {
                        let digit = d.to_digit(radix).unwrap_or(0);
                        self.character_reference_code = self
                            .character_reference_code
                            .saturating_mul(radix)
                            .saturating_add(digit);
                    }
                    Some(';') => self.numeric_character_reference_end(),
                    _ => {
                        self.parse_error("missing-semicolon-after-character-reference");
                        if c.is_some() {
                            self.pos -= 1;
                        }
                        self.numeric_character_reference_end();
                    }
                }
            }
            _ => {}
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the named character references
    /// table. Append each character to the temporary buffer when it's consumed."
    pub(super) fn named_character_reference(&mut self) {
        let Some((name, replacement)) = longest_match(self.remaining()) else {
            // "Otherwise: Flush code points consumed as a character reference.
            // Switch to the ambiguous ampersand state."
            self.flush_code_points_consumed_as_character_reference();
            self.state = State::AmbiguousAmpersand;
            return;
        };
        self.pos += name.chars().count();
        self.temporary_buffer.push_str(name);

        let ends_with_semicolon = name.ends_with(';');
        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;),
        // and the next input character is either a U+003D EQUALS SIGN
        // character (=) or an ASCII alphanumeric, then, for historical reasons,
        // flush code points consumed as a character reference and switch to
        // the return state."
        if self.is_consumed_as_part_of_attribute()
            && !ends_with_semicolon
            && self
                .peek()
                .is_some_and(|next| next == '=' || next.is_ascii_alphanumeric())
        {
            self.flush_code_points_consumed_as_character_reference();
            self.state = self.return_state;
            return;
        }

        if !ends_with_semicolon {
            self.parse_error("missing-semicolon-after-character-reference");
        }
        self.temporary_buffer = replacement.to_string();
        self.flush_code_points_consumed_as_character_reference();
        self.state = self.return_state;
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    fn numeric_character_reference_end(&mut self) {
        let code = self.character_reference_code;
        let resolved = match code {
            0 => {
                self.parse_error("null-character-reference");
                '\u{FFFD}'
            }
            _ if code > 0x10_FFFF => {
                self.parse_error("character-reference-outside-unicode-range");
                '\u{FFFD}'
            }
            0xD800..=0xDFFF => {
                self.parse_error("surrogate-character-reference");
                '\u{FFFD}'
            }
            _ => {
                if (0xFDD0..=0xFDEF).contains(&code) || (code & 0xFFFE) == 0xFFFE {
                    self.parse_error("noncharacter-character-reference");
                }
                let is_control = code == 0x0D
                    || ((code <= 0x1F || (0x7F..=0x9F).contains(&code))
                        && !matches!(code, 0x09 | 0x0A | 0x0C | 0x20));
                if is_control {
                    self.parse_error("control-character-reference");
                }
                C1_REPLACEMENTS
                    .iter()
                    .find(|(from, _)| *from == code)
                    .map(|(_, to)| *to)
                    .or_else(|| char::from_u32(code))
                    .unwrap_or('\u{FFFD}')
            }
        };
        self.temporary_buffer.clear();
        self.temporary_buffer.push(resolved);
        self.flush_code_points_consumed_as_character_reference();
        self.state = self.return_state;
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::{HtmlTokenizer, Token};

    fn text(input: &str) -> String {
        HtmlTokenizer::tokenize_all(input)
            .into_iter()
            .filter_map(|t| match t {
                Token::Character { data } => Some(data),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_named_references() {
        assert_eq!(text("a &amp; b"), "a & b");
        assert_eq!(text("&notit;"), "\u{00AC}it;");
        assert_eq!(text("&copy"), "\u{00A9}");
        assert_eq!(text("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(text("&#65;&#x42;"), "AB");
        assert_eq!(text("&#x80;"), "\u{20AC}");
        assert_eq!(text("&#0;"), "\u{FFFD}");
        assert_eq!(text("&#xD800;"), "\u{FFFD}");
        assert_eq!(text("&#;"), "&#;");
    }

    #[test]
    fn test_attribute_historical_rule() {
        let tokens = HtmlTokenizer::tokenize_all("<a href=\"?x&copy=1&amp;y\">");
        let Token::StartTag { attributes, .. } = &tokens[0] else {
            panic!("expected a start tag");
        };
        assert_eq!(attributes[0].value, "?x&copy=1&y");
    }
}
