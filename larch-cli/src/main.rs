//! larch CLI - parse HTML and inspect the tree the parser builds
//!
//! Usage:
//!   larch <file>                    Print the DOM tree
//!   larch <file> --format dump      html5lib tree-construction dump
//!   larch <file> --format json      DOM as JSON
//!   larch --html '<p>x' --errors    Also list parse issues
//!   larch --html '<td>x' --fragment tr

mod json;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use larch_dom::dump::dump_children;
use larch_dom::serialize::{inner_html, serialize_document};
use larch_dom::{DomTree, Namespace, NodeId, NodeType};
use larch_html::{FragmentContext, HtmlParser, ParseIssue, ParserOptions, parse_fragment};
use log::LevelFilter;
use owo_colors::OwoColorize;
use simple_logger::SimpleLogger;

use json::JsonNode;

/// Output formats for the parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented, colored tree
    Tree,
    /// html5lib tree-construction test format
    Dump,
    /// JSON document
    Json,
    /// Re-serialized HTML
    Html,
}

/// larch - WHATWG HTML tree construction
#[derive(Parser, Debug)]
#[command(name = "larch")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the tree for a file
    larch ./index.html

    # Misnested formatting, in the html5lib dump format
    larch --html '<p>1<b>2<i>3</b>4</i>5' --format dump

    # Parse a fragment in a table row context
    larch --html '<td>x' --fragment tr

    # Parse a fragment in an SVG context
    larch --html '<circle/>' --fragment svg --fragment-namespace svg
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Parse as a fragment with a context element of this tag name
    #[arg(long, value_name = "TAG")]
    fragment: Option<String>,

    /// Namespace of the fragment context element (html, svg or math)
    #[arg(long, value_name = "NS", default_value = "html")]
    fragment_namespace: String,

    /// How to print the result
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Print parse issues to stderr
    #[arg(short, long)]
    errors: bool,

    /// Parse with the scripting flag enabled
    #[arg(long)]
    scripting: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("failed to install logger")?;

    let html = read_input(&cli)?;
    let options = ParserOptions::new()
        .with_scripting(cli.scripting)
        .with_issue_collection(cli.errors);

    let (tree, root, issues) = if let Some(ref tag) = cli.fragment {
        let namespace: Namespace = cli
            .fragment_namespace
            .parse()
            .with_context(|| format!("unknown namespace '{}'", cli.fragment_namespace))?;
        let context = FragmentContext::foreign(namespace, &tag.to_ascii_lowercase());
        let fragment = parse_fragment(&html, &context, options);
        (fragment.tree, fragment.root, fragment.issues)
    } else {
        let (tree, issues) = HtmlParser::new(&html, options).run_with_issues();
        (tree, NodeId::ROOT, issues)
    };

    match cli.format {
        Format::Tree => {
            for &child in tree.children(root) {
                print_tree(&tree, child, 0);
            }
        }
        Format::Dump => print!("{}", dump_children(&tree, root)),
        Format::Json => {
            let node = if root == NodeId::ROOT {
                JsonNode::from_tree(&tree, root)
            } else {
                Some(JsonNode::Fragment {
                    children: tree
                        .children(root)
                        .iter()
                        .filter_map(|&child| JsonNode::from_tree(&tree, child))
                        .collect(),
                })
            };
            println!("{}", serde_json::to_string_pretty(&node)?);
        }
        Format::Html => {
            if root == NodeId::ROOT {
                println!("{}", serialize_document(&tree));
            } else {
                println!("{}", inner_html(&tree, root));
            }
        }
    }

    if cli.errors {
        print_issues(&issues);
    }
    Ok(())
}

/// Load the markup from `--html` or the file argument.
fn read_input(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        return Ok(html.clone());
    }
    let Some(ref path) = cli.path else {
        anyhow::bail!("no input: pass a file path or --html");
    };
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn print_issues(issues: &[ParseIssue]) {
    if issues.is_empty() {
        eprintln!("{}", "no parse issues".green());
        return;
    }
    eprintln!("{}", format!("{} parse issue(s)", issues.len()).yellow().bold());
    for issue in issues {
        eprintln!("  {} {}", issue.kind.to_string().yellow(), issue.message);
    }
}

fn print_tree(tree: &DomTree, node: NodeId, depth: usize) {
    let Some(data) = tree.get(node) else {
        return;
    };
    let indent = "  ".repeat(depth);
    match &data.node_type {
        NodeType::Document | NodeType::DocumentFragment => {}
        NodeType::DocumentType(doctype) => {
            println!("{indent}{}", format!("<!DOCTYPE {}>", doctype.name).dimmed());
        }
        NodeType::Element(element) => {
            let name = match element.namespace {
                Namespace::Html => element.tag_name.clone(),
                ns => format!("{ns}:{}", element.tag_name),
            };
            let attrs: String = element
                .attrs
                .iter()
                .map(|attr| format!(" {}={:?}", attr.name.yellow(), attr.value))
                .collect();
            println!("{indent}<{}{attrs}>", name.cyan().bold());
            if let Some(contents) = element.template_contents {
                println!("{indent}  {}", "#content".magenta());
                for &child in tree.children(contents) {
                    print_tree(tree, child, depth + 2);
                }
            }
        }
        NodeType::Text(text) => println!("{indent}{}", format!("{text:?}").green()),
        NodeType::Comment(text) => {
            println!("{indent}{}", format!("<!--{text}-->").dimmed());
        }
    }
    for &child in tree.children(node) {
        print_tree(tree, child, depth + 1);
    }
}
