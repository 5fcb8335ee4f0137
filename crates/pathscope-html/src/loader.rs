use std::fs;
use std::path::{Path, PathBuf};

use pathscope_dom::DomTree;
use thiserror::Error;

use crate::{HTMLParser, HTMLTokenizer, ParseIssue};

/// A parsed document and what went wrong while parsing it.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Source path, or empty for documents parsed from a string.
    pub source_path: String,

    /// Parsed DOM tree.
    pub dom: DomTree,

    /// Tokenizer errors followed by tree builder issues.
    pub parse_issues: Vec<ParseIssue>,
}

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file
    #[error("failed to read '{}'", path.display())]
    File {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Parse an HTML string into a [`LoadedDocument`].
#[must_use]
pub fn parse_html_string(html: &str) -> LoadedDocument {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    let mut parse_issues: Vec<ParseIssue> = tokenizer
        .errors()
        .iter()
        .map(|message| ParseIssue {
            message: message.clone(),
            token_index: None,
        })
        .collect();

    let (dom, issues) = HTMLParser::new(tokenizer.into_tokens()).run_with_issues();
    parse_issues.extend(issues);

    for issue in &parse_issues {
        tracing::warn!(message = %issue.message, token = ?issue.token_index, "HTML parse issue");
    }

    LoadedDocument {
        source_path: String::new(),
        dom,
        parse_issues,
    }
}

/// Load and parse a document from a file.
///
/// # Errors
///
/// Returns [`LoadError::File`] if the file cannot be read as UTF-8 text.
pub fn load_document(path: &Path) -> Result<LoadedDocument, LoadError> {
    let html = fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = html.len(), "loaded document");
    let mut doc = parse_html_string(&html);
    doc.source_path = path.display().to_string();
    Ok(doc)
}
