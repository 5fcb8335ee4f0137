//! Tokens produced by the tokenizer.

use std::fmt;

/// An attribute on a start tag.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// Consecutive characters are coalesced into a single [`Token::Character`]
/// run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A DOCTYPE token. Only the name is kept.
    Doctype {
        /// "a name"
        name: Option<String>,
    },
    /// A start tag.
    StartTag {
        /// Lower-cased tag name.
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// Attributes in source order; duplicates already dropped.
        attributes: Vec<Attribute>,
    },
    /// An end tag. Attributes on end tags are parse errors and are dropped.
    EndTag {
        /// Lower-cased tag name.
        name: String,
    },
    /// "Comment and character tokens have data."
    Comment(String),
    /// A run of character data with references already decoded.
    Character(String),
    /// "end-of-file"
    EndOfFile,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype { name } => write!(f, "<!DOCTYPE {}>", name.as_deref().unwrap_or("")),
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
                    f.write_str(" /")?;
                }
                f.write_str(">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment(data) => write!(f, "<!--{data}-->"),
            Self::Character(data) => write!(f, "{data:?}"),
            Self::EndOfFile => f.write_str("EOF"),
        }
    }
}
