//! Integration tests for the HTML tokenizer.

use larch_html::{Attribute, HtmlTokenizer, LexicalState, Token, TokenSource, TokenVec};

/// Helper to tokenize a string in the data state
fn tokenize(input: &str) -> Vec<Token> {
    HtmlTokenizer::tokenize_all(input)
}

/// Helper to concatenate character tokens
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    assert!(matches!(
        tokens[0],
        Token::Doctype {
            force_quirks: true,
            ..
        }
    ));
}

#[test]
fn test_start_tag_with_attributes() {
    let tokens = tokenize(r#"<DIV Class="a" id=b hidden>"#);
    assert_eq!(
        tokens[0],
        Token::start_tag(
            "div",
            vec![
                Attribute::new("class", "a"),
                Attribute::new("id", "b"),
                Attribute::new("hidden", ""),
            ]
        )
    );
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag {
            name,
            self_closing: true,
            ..
        } if name == "br"
    ));
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</P>");
    assert_eq!(tokens[0], Token::end_tag("p"));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -->");
    assert_eq!(tokens[0], Token::comment(" hi "));
}

#[test]
fn test_bogus_comment_from_question_mark() {
    let tokens = tokenize("<?xml version?>");
    assert_eq!(tokens[0], Token::comment("?xml version?"));
}

#[test]
fn test_character_references_in_text() {
    let tokens = tokenize("a&lt;b&#x41;&#66;&amp");
    assert_eq!(text_of(&tokens), "a<bAB&");
}

#[test]
fn test_null_character_reference_is_replaced() {
    let tokens = tokenize("&#0;");
    assert_eq!(text_of(&tokens), "\u{FFFD}");
}

#[test]
fn test_rawtext_after_switch() {
    let mut tokenizer = HtmlTokenizer::new("<style>a<b></style>c");
    let start = tokenizer.next_token();
    assert!(start.is_start_tag("style"));
    tokenizer.switch_state(LexicalState::Rawtext);

    let mut rest = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let done = token.is_eof();
        rest.push(token);
        if done {
            break;
        }
    }
    assert_eq!(text_of(&rest[..3]), "a<b");
    assert_eq!(rest[3], Token::end_tag("style"));
    assert_eq!(rest[4], Token::character('c'));
}

#[test]
fn test_plaintext_never_ends() {
    let mut tokenizer = HtmlTokenizer::new("</plaintext><b>");
    tokenizer.switch_state(LexicalState::Plaintext);
    let mut text = String::new();
    loop {
        match tokenizer.next_token() {
            Token::Character { data } => text.push(data),
            Token::EndOfFile => break,
            other => panic!("unexpected token {other:?}"),
        }
    }
    assert_eq!(text, "</plaintext><b>");
}

#[test]
fn test_errors_are_reported_with_codes() {
    let mut tokenizer = HtmlTokenizer::new("</>");
    while !tokenizer.next_token().is_eof() {}
    assert!(
        tokenizer
            .errors()
            .iter()
            .any(|error| error.code == "missing-end-tag-name")
    );
}

#[test]
fn test_token_vec_replays_tokens() {
    let mut source = TokenVec::new(vec![Token::start_tag("p", Vec::new()), Token::character('x')]);
    assert!(source.next_token().is_start_tag("p"));
    assert_eq!(source.next_token(), Token::character('x'));
    assert!(source.next_token().is_eof());
    assert!(source.next_token().is_eof());
}
