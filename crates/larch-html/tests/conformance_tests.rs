//! Tree-construction cases in the html5lib dump format.
//!
//! Each case is an input document and the expected dump of the tree the
//! parser builds for it.

use larch_dom::dump::dump_document;
use larch_html::{ParserOptions, parse_document};
use test_case::test_case;

fn dump(html: &str) -> String {
    dump_document(&parse_document(html, ParserOptions::new()))
}

#[test_case(
    "Test",
    "| <html>\n|   <head>\n|   <body>\n|     \"Test\"\n" ;
    "bare text"
)]
#[test_case(
    "<p>One<p>Two",
    "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"One\"\n|     <p>\n|       \"Two\"\n" ;
    "p closes p"
)]
#[test_case(
    "<div<div>",
    "| <html>\n|   <head>\n|   <body>\n|     <div<div>\n" ;
    "lt in tag name"
)]
#[test_case(
    "<!-->",
    "| <!--  -->\n| <html>\n|   <head>\n|   <body>\n" ;
    "abrupt empty comment"
)]
#[test_case(
    "<a><p>x</a>",
    "| <html>\n|   <head>\n|   <body>\n|     <a>\n|     <p>\n|       <a>\n|         \"x\"\n" ;
    "anchor around block"
)]
#[test_case(
    "<h1>x<h2>y",
    "| <html>\n|   <head>\n|   <body>\n|     <h1>\n|       \"x\"\n|     <h2>\n|       \"y\"\n" ;
    "heading closes heading"
)]
#[test_case(
    "<title>&amp;<b></title>",
    "| <html>\n|   <head>\n|     <title>\n|       \"&<b>\"\n|   <body>\n" ;
    "title is rcdata"
)]
#[test_case(
    "<textarea>\nfoo</textarea>",
    "| <html>\n|   <head>\n|   <body>\n|     <textarea>\n|       \"foo\"\n" ;
    "textarea leading newline"
)]
#[test_case(
    "<pre>\n\nx</pre>",
    "| <html>\n|   <head>\n|   <body>\n|     <pre>\n|       \"\nx\"\n" ;
    "pre drops only first newline"
)]
#[test_case(
    "<image src=a>",
    "| <html>\n|   <head>\n|   <body>\n|     <img>\n|       src=\"a\"\n" ;
    "image becomes img"
)]
#[test_case(
    "</br>",
    "| <html>\n|   <head>\n|   <body>\n|     <br>\n" ;
    "end br becomes br"
)]
#[test_case(
    "</p>",
    "| <html>\n|   <head>\n|   <body>\n|     <p>\n" ;
    "stray end p"
)]
#[test_case(
    "<!DOCTYPE html><html a=b><html c=d>",
    "| <!DOCTYPE html>\n| <html>\n|   a=\"b\"\n|   c=\"d\"\n|   <head>\n|   <body>\n" ;
    "html attributes merge"
)]
#[test_case(
    "<table><tr><td>1<td>2</table>",
    "| <html>\n|   <head>\n|   <body>\n|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"1\"\n|           <td>\n|             \"2\"\n" ;
    "cells close cells"
)]
#[test_case(
    "<math><mi><b>x</b></mi></math>",
    "| <html>\n|   <head>\n|   <body>\n|     <math math>\n|       <math mi>\n|         <b>\n|           \"x\"\n" ;
    "mathml text integration point"
)]
#[test_case(
    "<svg><foreignobject><div>x</div></foreignobject></svg>",
    "| <html>\n|   <head>\n|   <body>\n|     <svg svg>\n|       <svg foreignObject>\n|         <div>\n|           \"x\"\n" ;
    "svg html integration point"
)]
#[test_case(
    "<select><option>a</select>b",
    "| <html>\n|   <head>\n|   <body>\n|     <select>\n|       <option>\n|         \"a\"\n|     \"b\"\n" ;
    "select closes"
)]
#[test_case(
    "<!DOCTYPE html><body><table>  <tr></table>",
    "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <table>\n|       \"  \"\n|       <tbody>\n|         <tr>\n" ;
    "table whitespace stays in table"
)]
fn test_tree_construction(input: &str, expected: &str) {
    assert_eq!(dump(input), expected);
}
