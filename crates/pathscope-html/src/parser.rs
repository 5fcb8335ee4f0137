//! Tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! A forgiving tree builder: a stack of open elements, void elements, and
//! implied `<html>`, `<head>` and `<body>` elements. The insertion-mode
//! machinery, the adoption agency algorithm and table fostering are not
//! implemented; misnested markup is repaired by popping to the nearest
//! matching open element.
//!
//! Unlike a browser, a self-closing flag on a non-void element closes it.
//! Component markup emitted by JSX-style tooling relies on that.

use std::fmt::Write;

use pathscope_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::token::Token;

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements that belong in `<head>` when they appear before `<body>`.
///
/// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
const HEAD_ELEMENTS: &[&str] = &[
    "base", "link", "meta", "noscript", "script", "style", "template", "title",
];

/// A recoverable problem found while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index of the offending token, when the issue came from the tree
    /// builder.
    pub token_index: Option<usize>,
}

/// Builds a [`DomTree`] from tokens.
pub struct HTMLParser {
    tokens: Vec<Token>,
    tree: DomTree,
    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    open_elements: Vec<NodeId>,
    html: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a parser over a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            tree: DomTree::new(),
            open_elements: Vec::new(),
            html: None,
            head: None,
            body: None,
            issues: Vec::new(),
        }
    }

    /// Build the tree, discarding issues.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Build the tree and return it with every issue encountered.
    ///
    /// The resulting document always has an `<html>` element with a
    /// `<body>`, even for empty input.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.into_iter().enumerate() {
            match token {
                Token::Doctype { .. } => {
                    if self.html.is_some() {
                        self.issue(index, "unexpected DOCTYPE after content".to_string());
                    }
                }
                Token::StartTag {
                    name,
                    self_closing,
                    attributes,
                } => {
                    let mut data = ElementData::new(&name);
                    for attr in attributes {
                        let _ = data.attrs.insert(attr.name, attr.value);
                    }
                    self.handle_start_tag(data, self_closing);
                }
                Token::EndTag { name } => self.handle_end_tag(index, &name),
                Token::Comment(text) => {
                    let parent = self.current_node();
                    let id = self.tree.alloc(NodeType::Comment(text));
                    self.tree.append_child(parent, id);
                }
                Token::Character(text) => self.handle_text(&text),
                Token::EndOfFile => break,
            }
        }

        let _ = self.ensure_body();
        (self.tree, self.issues)
    }

    fn issue(&mut self, index: usize, message: String) {
        self.issues.push(ParseIssue {
            message,
            token_index: Some(index),
        });
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> NodeId {
        self.open_elements.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn tag_of(&self, id: NodeId) -> &str {
        self.tree.as_element(id).map_or("", |e| e.tag_name.as_str())
    }

    fn insert(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.tree.alloc(NodeType::Element(data));
        self.tree.append_child(parent, id);
        id
    }

    fn ensure_html(&mut self) -> NodeId {
        if let Some(html) = self.html {
            return html;
        }
        let html = self.insert(NodeId::ROOT, ElementData::new("html"));
        self.html = Some(html);
        self.open_elements.insert(0, html);
        html
    }

    fn ensure_head(&mut self) -> NodeId {
        let html = self.ensure_html();
        if let Some(head) = self.head {
            return head;
        }
        let head = self.insert(html, ElementData::new("head"));
        self.head = Some(head);
        self.open_elements.push(head);
        head
    }

    /// Make sure a body exists and is the current node's container.
    fn ensure_body(&mut self) -> NodeId {
        let html = self.ensure_html();
        if let Some(body) = self.body {
            if !self.open_elements.contains(&body) {
                self.open_elements.push(body);
            }
            return body;
        }
        // Leaving the head: pop everything above <html>.
        while self.open_elements.last().is_some_and(|&id| id != html) {
            let _ = self.open_elements.pop();
        }
        let body = self.insert(html, ElementData::new("body"));
        self.body = Some(body);
        self.open_elements.push(body);
        body
    }

    /// Pick the parent for a new element, creating implied elements.
    fn insertion_parent(&mut self, tag: &str) -> NodeId {
        let current = self.current_node();
        let in_head = Some(current) == self.head;
        let before_content = current == NodeId::ROOT || Some(current) == self.html || in_head;

        if !before_content {
            return current;
        }
        if self.body.is_none() && HEAD_ELEMENTS.contains(&tag) {
            return self.ensure_head();
        }
        self.ensure_body()
    }

    fn handle_start_tag(&mut self, data: ElementData, self_closing: bool) {
        let tag_name = data.tag_name.clone();
        match tag_name.as_str() {
            "html" => {
                let html = self.ensure_html();
                // "add the attribute and its corresponding value to that element"
                // for attributes the existing element does not have yet.
                if let Some(NodeType::Element(existing)) =
                    self.tree.get(html).map(|n| n.node_type.clone())
                {
                    for (name, value) in data.attrs {
                        if !existing.attrs.contains_key(&name) {
                            self.tree.set_attribute(html, &name, &value);
                        }
                    }
                }
            }
            "head" if self.head.is_none() && self.body.is_none() => {
                let html = self.ensure_html();
                let head = self.insert(html, data);
                self.head = Some(head);
                self.open_elements.push(head);
            }
            "body" if self.body.is_none() => {
                let html = self.ensure_html();
                while self.open_elements.last().is_some_and(|&id| id != html) {
                    let _ = self.open_elements.pop();
                }
                let body = self.insert(html, data);
                self.body = Some(body);
                self.open_elements.push(body);
            }
            "head" | "body" => {
                // A second <head> or <body> is ignored.
            }
            tag => {
                let is_void = VOID_ELEMENTS.contains(&tag);
                let parent = self.insertion_parent(tag);
                let id = self.insert(parent, data);
                if !is_void && !self_closing {
                    self.open_elements.push(id);
                }
            }
        }
    }

    /// [§ 13.2.6.4.7 "any other end tag"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// Pop up to and including the nearest open element with the same name.
    fn handle_end_tag(&mut self, index: usize, name: &str) {
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        // </body> and </html> close nothing: trailing content still lands in
        // the body.
        if name == "body" || name == "html" {
            return;
        }

        let position = self
            .open_elements
            .iter()
            .rposition(|&id| self.tag_of(id) == name);

        match position {
            Some(pos) => self.open_elements.truncate(pos),
            None => self.issue(index, format!("unexpected end tag </{name}>")),
        }
    }

    fn handle_text(&mut self, text: &str) {
        let current = self.current_node();
        let before_content = current == NodeId::ROOT || Some(current) == self.html;
        let parent = if before_content || Some(current) == self.head {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ...
            // U+0020 SPACE: Ignore the token."
            if text.trim().is_empty() {
                return;
            }
            self.ensure_body()
        } else {
            current
        };

        let id = self.tree.create_text(text);
        self.tree.append_child(parent, id);
    }
}

/// Render a subtree as indented text, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = "  ".repeat(depth);

    match &node.node_type {
        NodeType::Document => {
            let _ = writeln!(out, "{prefix}#document");
        }
        NodeType::Element(data) => {
            let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
            attrs.sort();
            let _ = write!(out, "{prefix}<{}", data.tag_name);
            for (name, value) in attrs {
                if value.is_empty() {
                    let _ = write!(out, " {name}");
                } else {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
            }
            let _ = writeln!(out, ">");
        }
        NodeType::Text(data) => {
            let trimmed = data.trim();
            if !trimmed.is_empty() {
                let _ = writeln!(out, "{prefix}\"{trimmed}\"");
            }
        }
        NodeType::Comment(data) => {
            let _ = writeln!(out, "{prefix}<!-- {data} -->");
        }
    }

    for &child in tree.children(id) {
        write_node(tree, child, depth + 1, out);
    }
}
