//! Integration tests for the tree builder.

use std::cell::RefCell;
use std::rc::Rc;

use larch_dom::dump::dump_document;
use larch_dom::serialize::serialize_document;
use larch_dom::{DomTree, NodeId, NodeType, QuirksMode};
use larch_html::{
    HtmlTokenizer, InsertionMode, ParseIssueKind, ParserOptions, Token, TokenSource, TreeBuilder,
    parse_document,
};

/// Helper to parse a document with default options
fn parse(html: &str) -> DomTree {
    parse_document(html, ParserOptions::new())
}

/// Helper to parse and dump in the html5lib format
fn dump(html: &str) -> String {
    dump_document(&parse(html))
}

/// Helper to drive a tree builder by hand, calling `observe` after every
/// token until parsing stops.
fn drive(html: &str, mut observe: impl FnMut(&TreeBuilder, &Token)) -> TreeBuilder {
    let mut tokenizer = HtmlTokenizer::new(html);
    let mut builder = TreeBuilder::new(ParserOptions::new());
    while !builder.is_stopped() {
        tokenizer.set_cdata_allowed(builder.cdata_allowed());
        let token = tokenizer.next_token();
        builder.process_token(&token);
        if let Some(state) = builder.take_tokenizer_directive() {
            tokenizer.switch_state(state);
        }
        observe(&builder, &token);
        if token.is_eof() && !builder.is_stopped() {
            builder.stop_parsing();
        }
    }
    builder
}

// ========== Scenarios ==========

#[test]
fn test_adoption_clones_formatting_across_boundary() {
    let expected = "\
| <html>
|   <head>
|   <body>
|     <p>
|       \"1\"
|       <b>
|         \"2\"
|         <i>
|           \"3\"
|       <i>
|         \"4\"
|       \"5\"
";
    assert_eq!(dump("<p>1<b>2<i>3</b>4</i>5"), expected);
}

#[test]
fn test_adoption_moves_block_out_of_formatting() {
    let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <b>
|       \"1\"
|     <p>
|       <b>
|         \"2\"
|       \"3\"
";
    assert_eq!(dump("<!DOCTYPE html><b>1<p>2</b>3</p>"), expected);
}

#[test]
fn test_foster_parenting_with_formatting() {
    let expected = "\
| <html>
|   <head>
|   <body>
|     <b>
|     <b>
|       \"bbb\"
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             \"aaa\"
|     <b>
|       \"ccc\"
";
    assert_eq!(dump("<table><b><tr><td>aaa</td></tr>bbb</table>ccc"), expected);
}

#[test]
fn test_insert_row_on_parsed_empty_table() {
    let mut tree = parse("<!DOCTYPE html><table></table>");
    let table = tree.find_element(NodeId::ROOT, "table").unwrap();

    let row = tree.insert_row(table, -1).unwrap();

    let tbody = tree.parent(row).unwrap();
    assert!(tree.is_html_element(tbody, "tbody"));
    assert_eq!(tree.parent(tbody), Some(table));
    assert_eq!(tree.children(table), &[tbody]);
}

#[test]
fn test_li_closes_open_li() {
    let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <ul>
|       <li>
|         \"a\"
|       <li>
|         \"b\"
";
    assert_eq!(dump("<!DOCTYPE html><ul><li>a<li>b</ul>"), expected);
}

#[test]
fn test_li_does_not_close_across_special_boundary() {
    let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <li>
|       \"a\"
|       <section>
|         <li>
|           \"b\"
";
    assert_eq!(dump("<!DOCTYPE html><li>a<section><li>b"), expected);
}

#[test]
fn test_eof_unwinds_nested_templates() {
    let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <template>
|       content
|         <template>
|           content
|             <b>
|               \"x\"
";
    let builder = drive("<!DOCTYPE html><body><template><template><b>x", |_, _| {});
    assert!(builder.is_stopped());
    assert_eq!(builder.insertion_mode(), InsertionMode::InBody);
    assert_eq!(dump_document(builder.tree()), expected);
}

// ========== Document structure ==========

#[test]
fn test_document_structure() {
    let tree = parse("<!DOCTYPE html><html><head></head><body></body></html>");

    let root = tree.get(NodeId::ROOT).unwrap();
    assert!(matches!(root.node_type, NodeType::Document));
    assert!(tree.head().is_some());
    assert!(tree.body().is_some());
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
}

#[test]
fn test_missing_doctype_is_quirks() {
    let tree = parse("<p>x");
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
}

#[test]
fn test_text_content_of_body() {
    let tree = parse("<html><body>Hello <b>World</b></body></html>");
    let body = tree.body().unwrap();
    assert_eq!(tree.text_content(body), "Hello World");
}

#[test]
fn test_empty_input_builds_skeleton() {
    let expected = "\
| <html>
|   <head>
|   <body>
";
    assert_eq!(dump(""), expected);
}

// ========== Properties ==========

#[test]
fn test_stack_stays_non_empty_once_html_exists() {
    let mut seen_html = false;
    let _ = drive(
        "<!DOCTYPE html><table><tr><td>x</table><p>y<template>z</template>",
        |builder, _| {
            if builder.is_stopped() {
                return;
            }
            if builder.open_element_count() > 0 {
                seen_html = true;
            } else {
                assert!(!seen_html, "stack emptied before parsing stopped");
            }
        },
    );
    assert!(seen_html);
}

#[test]
fn test_frameset_ok_is_monotonic() {
    let mut cleared = false;
    let _ = drive("<!DOCTYPE html><p>x</p><frameset><input>", |builder, _| {
        if cleared {
            assert!(!builder.frameset_ok());
        }
        cleared |= !builder.frameset_ok();
    });
    assert!(cleared);
}

#[test_case::test_case("<p>1<b>2<i>3</b>4</i>5" ; "misnested formatting")]
#[test_case::test_case("<table><b><tr><td>aaa</td></tr>bbb</table>ccc" ; "foster parented formatting")]
#[test_case::test_case("<!DOCTYPE html><ul><li>a<li>b</ul><dl><dt>c<dd>d</dl>" ; "implied list items")]
#[test_case::test_case("<!DOCTYPE html><svg viewBox='0 0 1 1'><circle r=1></svg>" ; "svg content")]
#[test_case::test_case("<!DOCTYPE html><title>a &amp; b</title><p>&lt;x&gt;" ; "escaped text")]
fn test_serialization_reaches_fixed_point(html: &str) {
    let first = serialize_document(&parse(html));
    let second = serialize_document(&parse(&first));
    assert_eq!(first, second);
}

// ========== Parse issues ==========

#[test]
fn test_well_formed_document_has_no_issues() {
    let (_, issues) = larch_html::HtmlParser::new(
        "<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>",
        ParserOptions::new(),
    )
    .run_with_issues();
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn test_issue_sink_sees_every_issue() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let (_, issues) = larch_html::HtmlParser::new("<p></div></b><table>x", ParserOptions::new())
        .with_issue_sink(Box::new(move |issue| sink.borrow_mut().push(issue.kind)))
        .run_with_issues();

    assert!(!issues.is_empty());
    let kinds: Vec<ParseIssueKind> = issues.iter().map(|issue| issue.kind).collect();
    assert_eq!(*seen.borrow(), kinds);
    assert!(kinds.contains(&ParseIssueKind::Doctype));
    assert!(kinds.contains(&ParseIssueKind::FosterParented));
}

#[test]
fn test_issue_collection_can_be_disabled() {
    let (_, issues) = larch_html::HtmlParser::new(
        "<p></div>",
        ParserOptions::new().with_issue_collection(false),
    )
    .run_with_issues();
    assert!(issues.is_empty());
}

#[test]
fn test_scripting_flag_selects_noscript_branch() {
    let scripted = dump_document(&parse_document(
        "<!DOCTYPE html><head><noscript><p>x</p></noscript>",
        ParserOptions::new().with_scripting(true),
    ));
    let expected = "\
| <!DOCTYPE html>
| <html>
|   <head>
|     <noscript>
|       \"<p>x</p>\"
|   <body>
";
    assert_eq!(scripted, expected);
}
