//! Element tree model and one-shot document builder.
//!
//! [`Element::parse`] turns a self-contained XML fragment into a tree in
//! a single call, with a throwaway tokenizer acquired and released inside
//! the call. Streamed stanzas arrive as the same [`Element`] type via
//! [`StreamEvent::StreamElement`](crate::event::StreamEvent).
//!
//! # Example
//!
//! ```
//! use xmlstream_core::Element;
//!
//! let el = Element::parse(b"<message to=\"juliet\"><body>hi</body></message>").unwrap();
//! assert_eq!(el.name, "message");
//! assert_eq!(el.attr("to"), Some("juliet"));
//! assert_eq!(el.child("body").unwrap().text(), "hi");
//! ```

use crate::stack::OpenElement;
use crate::event::Token;
use crate::tokenizer::Tokenizer;

// ============================================================================
// Core Types
// ============================================================================

/// One attribute. Duplicates are permitted and order is preserved, so
/// attributes live in a plain list rather than a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

/// A finalized XML element. Immutable once its end tag has been
/// processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

/// A child of an element.
///
/// Invariant: no two adjacent `Text` siblings coexist in finalized
/// children - contiguous character data is merged into one node
/// regardless of how many tokenizer events or input chunks produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    /// Get the element, if this is an element node.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Get the text, if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            Node::Element(_) => None,
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

impl Element {
    /// Look up the first attribute with the given name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Iterate over child elements, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Get the first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.name == name)
    }

    /// Recursively collect all character data under this element.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(s) => buf.push_str(s),
                Node::Element(el) => el.collect_text(buf),
            }
        }
    }
}

// ============================================================================
// One-shot builder
// ============================================================================

/// Error returned when parsing a standalone fragment fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed syntax surfaced by the tokenizer. Halts immediately;
    /// remaining tokens are not processed.
    Syntax(&'static str),
    /// Content followed the root element's end tag.
    TrailingContent,
    /// Input ended with an element (or the whole document) unterminated.
    UnexpectedEof,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Syntax(message) => write!(f, "syntax error: {}", message),
            ParseError::TrailingContent => write!(f, "trailing content after root element"),
            ParseError::UnexpectedEof => write!(f, "unexpected end of input"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Element {
    /// Parse a complete, self-contained fragment into an element tree.
    ///
    /// The whole input is fed to a throwaway tokenizer in one call; the
    /// handle is released on every exit path. Unlike stream mode there is
    /// no root marker - the first start tag opens the eventual root
    /// frame directly. Character data before the root tag is dropped,
    /// mirroring stream mode's empty-stack drop.
    pub fn parse(input: &[u8]) -> Result<Element, ParseError> {
        let mut tokenizer = Tokenizer::new();
        let mut tokens = tokenizer.feed(input);
        if let Some(tail) = tokenizer.finish() {
            tokens.push(tail);
        }

        let mut stack: Vec<OpenElement> = Vec::new();
        let mut iter = tokens.into_iter();

        while let Some(token) = iter.next() {
            match token {
                Token::StartTag { name, attrs } => {
                    stack.push(OpenElement::new(name, attrs));
                }
                Token::EndTag { .. } => {
                    // The tokenizer guarantees every EndTag pairs with the
                    // innermost open StartTag.
                    let element = match stack.pop() {
                        Some(open) => open.finish(),
                        None => return Err(ParseError::Syntax("unexpected closing tag")),
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(element),
                        None => {
                            // Root closed: succeed only if nothing follows.
                            return if iter.next().is_some() {
                                Err(ParseError::TrailingContent)
                            } else {
                                Ok(element)
                            };
                        }
                    }
                }
                Token::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        top.push_text(text);
                    }
                    // Empty stack: text before the root tag, dropped.
                }
                Token::Error(message) => return Err(ParseError::Syntax(message)),
            }
        }

        Err(ParseError::UnexpectedEof)
    }
}

// ============================================================================
// Tests
// ============================================================================
