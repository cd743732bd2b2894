use std::fmt;

pub use larch_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag. When a DOCTYPE token is created, its name,
    /// public identifier, and system identifier must be marked as missing
    /// (which is a distinct state from the empty string)."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    ///
    /// Attribute names are unique; the tokenizer drops later duplicates.
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes on end tags are a parse error and are dropped.
    EndTag {
        /// "a tag name"
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// "Comment and character tokens have data."
    Character {
        /// "data"
        data: char,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// Build a start tag token.
    #[must_use]
    pub fn start_tag(name: &str, attributes: Vec<Attribute>) -> Self {
        Self::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes,
        }
    }

    /// Build an end tag token.
    #[must_use]
    pub fn end_tag(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
        }
    }

    /// Build a comment token.
    #[must_use]
    pub fn comment(data: &str) -> Self {
        Self::Comment {
            data: data.to_string(),
        }
    }

    /// Create a character token with the given character.
    #[must_use]
    pub const fn character(c: char) -> Self {
        Self::Character { data: c }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// Whether this is a start tag with the given name.
    #[must_use]
    pub fn is_start_tag(&self, tag_name: &str) -> bool {
        matches!(self, Self::StartTag { name, .. } if name == tag_name)
    }

    /// Whether this is an end tag with the given name.
    #[must_use]
    pub fn is_end_tag(&self, tag_name: &str) -> bool {
        matches!(self, Self::EndTag { name } if name == tag_name)
    }

    /// "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
    /// LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or
    /// U+0020 SPACE"
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(
            self,
            Self::Character {
                data: '\t' | '\n' | '\x0C' | '\r' | ' '
            }
        )
    }

    /// Attribute value on a start tag token.
    #[must_use]
    pub fn attribute(&self, attr_name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } => attributes
                .iter()
                .find(|attr| attr.name == attr_name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                write!(f, "DOCTYPE")?;
                if let Some(n) = name {
                    write!(f, " {n}")?;
                }
                if let Some(pub_id) = public_identifier {
                    write!(f, " PUBLIC \"{pub_id}\"")?;
                }
                if let Some(sys_id) = system_identifier {
                    write!(f, " SYSTEM \"{sys_id}\"")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => match data {
                '\n' => write!(f, "Character(\\n)"),
                '\t' => write!(f, "Character(\\t)"),
                ' ' => write!(f, "Character(SPACE)"),
                c => write!(f, "Character({c})"),
            },
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
