//! HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! A forgiving subset of the tokenizer state machine. It covers what
//! annotated application markup uses: tags with quoted, unquoted and bare
//! attributes, comments, DOCTYPE, raw-text elements and the common character
//! references. Script data escaping and CDATA sections are not handled.

use strum_macros::Display;

use crate::token::{Attribute, Token};

/// Elements whose content is not markup.
///
/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#elements-2)
/// "Raw text elements: script, style" / "Escapable raw text elements:
/// textarea, title"
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Raw text elements whose content still decodes character references.
const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

/// Named character references that are decoded. Anything else is left as
/// literal text.
const NAMED_REFERENCES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("copy", '\u{a9}'),
    ("hellip", '\u{2026}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The states this tokenizer distinguishes. Used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    /// and [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RawText,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and its single-quoted and unquoted siblings.
    AttributeValue,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
}

/// Converts an HTML string into a list of [`Token`]s.
pub struct HTMLTokenizer {
    input: Vec<char>,
    pos: usize,
    state: TokenizerState,
    tokens: Vec<Token>,
    /// Pending character data, flushed as one `Character` token.
    text: String,
    /// Set after a raw text start tag; holds the tag name that ends it.
    raw_text_end: Option<String>,
    errors: Vec<String>,
}

impl HTMLTokenizer {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub fn new(input: String) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            state: TokenizerState::Data,
            tokens: Vec::new(),
            text: String::new(),
            raw_text_end: None,
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole input. The last token is always
    /// [`Token::EndOfFile`].
    pub fn run(&mut self) {
        loop {
            if let Some(end_tag) = self.raw_text_end.take() {
                self.consume_raw_text(&end_tag);
                continue;
            }

            self.state = TokenizerState::Data;
            match self.peek() {
                None => break,
                Some('<') => self.consume_markup(),
                Some('&') => {
                    self.pos += 1;
                    let decoded = self.consume_character_reference();
                    self.text.push_str(&decoded);
                }
                Some(c) => {
                    self.pos += 1;
                    self.text.push(c);
                }
            }
        }
        self.flush_text();
        self.tokens.push(Token::EndOfFile);
    }

    /// The tokens produced so far.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consume the tokenizer and return its tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Parse errors encountered, in input order.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    /// Case-insensitive lookahead for an ASCII literal at the cursor.
    fn lookahead_ci(&self, literal: &str) -> bool {
        literal
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek_at(i).is_some_and(|c| c.eq_ignore_ascii_case(&expected)))
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.tokens.push(Token::Character(std::mem::take(&mut self.text)));
        }
    }

    fn emit(&mut self, token: Token) {
        self.flush_text();
        self.tokens.push(token);
    }

    fn error(&mut self, message: &str) {
        self.errors.push(format!("{message} in {} state", self.state));
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    ///
    /// The cursor is on `<`.
    fn consume_markup(&mut self) {
        match self.peek_at(1) {
            Some('!') => {
                if self.lookahead_ci("<!--") {
                    self.pos += 4;
                    self.consume_comment();
                } else if self.lookahead_ci("<!doctype") {
                    self.pos += 9;
                    self.consume_doctype();
                } else {
                    self.pos += 2;
                    self.consume_bogus_comment();
                }
            }
            Some('/') => match self.peek_at(2) {
                Some(c) if c.is_ascii_alphabetic() => {
                    self.pos += 2;
                    self.consume_tag(false);
                }
                // "This is a missing-end-tag-name parse error."
                Some('>') => {
                    self.pos += 3;
                }
                _ => {
                    self.pos += 2;
                    self.consume_bogus_comment();
                }
            },
            Some(c) if c.is_ascii_alphabetic() => {
                self.pos += 1;
                self.consume_tag(true);
            }
            Some('?') => {
                self.pos += 1;
                self.consume_bogus_comment();
            }
            // "This is an invalid-first-character-of-tag-name parse error.
            // Emit a U+003C LESS-THAN SIGN character token."
            _ => {
                self.pos += 1;
                self.text.push('<');
            }
        }
    }

    /// Consume a tag whose name starts at the cursor.
    fn consume_tag(&mut self, is_start: bool) {
        self.state = TokenizerState::TagName;
        let name = self.consume_while(|c| !c.is_ascii_whitespace() && c != '/' && c != '>');
        let name = name.to_ascii_lowercase();

        let mut attributes: Vec<Attribute> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    // "This is an eof-in-tag parse error. Emit an end-of-file token."
                    self.error("unexpected end of file");
                    return;
                }
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                Some('/') => {
                    self.pos += 1;
                    if self.peek() == Some('>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                }
                Some(_) => {
                    let attribute = self.consume_attribute();
                    // "if there is already an attribute on the token with the exact
                    // same name, then this is a duplicate-attribute parse error and
                    // the new attribute must be removed from the token."
                    if attributes.iter().any(|a| a.name == attribute.name) {
                        self.error("duplicate attribute");
                    } else {
                        attributes.push(attribute);
                    }
                }
            }
        }

        if is_start {
            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) && !self_closing {
                self.raw_text_end = Some(name.clone());
            }
            self.emit(Token::StartTag {
                name,
                self_closing,
                attributes,
            });
        } else {
            self.emit(Token::EndTag { name });
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn consume_attribute(&mut self) -> Attribute {
        self.state = TokenizerState::AttributeName;
        let first = self.peek().unwrap_or_default();
        self.pos += 1;
        let mut name = first.to_string();
        name.push_str(&self.consume_while(|c| {
            !c.is_ascii_whitespace() && c != '/' && c != '>' && c != '='
        }));
        let name = name.to_ascii_lowercase();

        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Attribute {
                name,
                value: String::new(),
            };
        }
        self.pos += 1;
        self.skip_whitespace();

        self.state = TokenizerState::AttributeValue;
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let value = self.consume_attribute_value(|c| c == quote);
                if self.peek() == Some(quote) {
                    self.pos += 1;
                }
                value
            }
            _ => self.consume_attribute_value(|c| c.is_ascii_whitespace() || c == '>'),
        };

        Attribute { name, value }
    }

    fn consume_attribute_value(&mut self, stop: impl Fn(char) -> bool) -> String {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if stop(c) {
                break;
            }
            self.pos += 1;
            if c == '&' {
                value.push_str(&self.consume_character_reference());
            } else {
                value.push(c);
            }
        }
        value
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn consume_comment(&mut self) {
        self.state = TokenizerState::Comment;
        let mut data = String::new();
        loop {
            if self.lookahead_ci("-->") {
                self.pos += 3;
                break;
            }
            match self.peek() {
                None => {
                    self.error("unexpected end of file");
                    break;
                }
                Some(c) => {
                    self.pos += 1;
                    data.push(c);
                }
            }
        }
        self.emit(Token::Comment(data));
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn consume_bogus_comment(&mut self) {
        self.state = TokenizerState::BogusComment;
        let data = self.consume_while(|c| c != '>');
        self.pos += 1;
        self.emit(Token::Comment(data));
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn consume_doctype(&mut self) {
        self.state = TokenizerState::Doctype;
        let body = self.consume_while(|c| c != '>');
        if self.peek().is_none() {
            self.error("unexpected end of file");
        }
        self.pos += 1;
        let name = body
            .split_ascii_whitespace()
            .next()
            .map(str::to_ascii_lowercase);
        self.emit(Token::Doctype { name });
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    ///
    /// Consume text up to (not including) the matching end tag.
    fn consume_raw_text(&mut self, end_tag: &str) {
        self.state = TokenizerState::RawText;
        let decode = ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&end_tag);
        let closing = format!("</{end_tag}");

        while let Some(c) = self.peek() {
            if c == '<'
                && self.lookahead_ci(&closing)
                && self
                    .peek_at(closing.len())
                    .is_none_or(|next| next.is_ascii_whitespace() || next == '/' || next == '>')
            {
                break;
            }
            self.pos += 1;
            if decode && c == '&' {
                let decoded = self.consume_character_reference();
                self.text.push_str(&decoded);
            } else {
                self.text.push(c);
            }
        }
        self.flush_text();
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// The `&` has already been consumed. Returns the decoded text, or `&`
    /// when nothing recognisable follows (the cursor is then left untouched).
    fn consume_character_reference(&mut self) -> String {
        let start = self.pos;

        if self.peek() == Some('#') {
            self.pos += 1;
            let hex = matches!(self.peek(), Some('x' | 'X'));
            if hex {
                self.pos += 1;
            }
            let digits = self.consume_while(|c| {
                if hex {
                    c.is_ascii_hexdigit()
                } else {
                    c.is_ascii_digit()
                }
            });
            let code = u32::from_str_radix(&digits, if hex { 16 } else { 10 }).ok();
            if let Some(ch) = code.and_then(char::from_u32).filter(|_| !digits.is_empty()) {
                if self.peek() == Some(';') {
                    self.pos += 1;
                }
                return ch.to_string();
            }
            self.pos = start;
            return "&".to_string();
        }

        let name = self.consume_while(|c| c.is_ascii_alphanumeric());
        if self.peek() == Some(';')
            && let Some(&(_, ch)) = NAMED_REFERENCES.iter().find(|(n, _)| *n == name)
        {
            self.pos += 1;
            return ch.to_string();
        }
        self.pos = start;
        "&".to_string()
    }

    fn consume_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
        self.input[start..self.pos].iter().collect()
    }
}
