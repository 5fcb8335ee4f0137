//! HTML tokenizer and tree builder for pathscope.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Tags, attributes, comments, DOCTYPE
//!   - Raw text elements and common character references
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Stack of open elements, void elements
//!   - Implied `<html>`, `<head>` and `<body>`
//!
//! - **Document loading** from strings and files
//!
//! # Not Yet Implemented
//!
//! - Insertion modes beyond head/body placement
//! - Adoption agency algorithm
//! - Table parsing and foster parenting
//! - Foreign content (SVG, MathML)

/// Reading documents from strings and files.
pub mod loader;
/// Tree construction.
pub mod parser;
/// Token types.
pub mod token;
/// HTML tokenizer.
pub mod tokenizer;

pub use loader::{LoadError, LoadedDocument, load_document, parse_html_string};
pub use parser::{HTMLParser, ParseIssue, format_tree};
pub use token::{Attribute, Token};
pub use tokenizer::HTMLTokenizer;
