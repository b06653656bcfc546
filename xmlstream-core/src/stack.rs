//! Frame stack shared by both assembly modes.
//!
//! The core algorithm is a fold: one token in, zero or one notification
//! out, plus a new stack state. Stream mode runs it through
//! [`StanzaStack`], whose bottom frame is a [`Frame::RootMarker`]
//! standing for "inside the outer container, nothing else open". The
//! one-shot element builder reuses [`OpenElement`] directly, with no
//! marker - its outermost open frame *is* the document root.

use crate::element::{Attr, Element, Node};
use crate::event::{StreamEvent, Token};

/// One stack entry.
///
/// An explicit tagged variant rather than a sentinel element keeps the
/// match arms exhaustive and the underflow cases type-checked.
#[derive(Debug)]
pub enum Frame {
    /// Stream mode only: the outer container is open but no stanza is.
    RootMarker,
    /// An element whose end tag has not arrived yet.
    Open(OpenElement),
}

/// An element under construction.
///
/// Children accumulate in arrival order; [`finish`](OpenElement::finish)
/// seals the element. Contiguous character data merges into a single
/// trailing text child no matter how many tokens or input chunks
/// produced it.
#[derive(Debug)]
pub struct OpenElement {
    name: String,
    attrs: Vec<Attr>,
    children: Vec<Node>,
}

impl OpenElement {
    pub fn new(name: String, attrs: Vec<Attr>) -> Self {
        OpenElement {
            name,
            attrs,
            children: Vec::new(),
        }
    }

    /// Merge-or-append rule for character data: extend a trailing text
    /// child if there is one, otherwise start a new text child.
    pub fn push_text(&mut self, text: String) {
        match self.children.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(&text),
            _ => self.children.push(Node::Text(text)),
        }
    }

    /// Append a finalized child element.
    pub fn push_child(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Seal the element. No mutation happens after this.
    pub fn finish(self) -> Element {
        Element {
            name: self.name,
            attrs: self.attrs,
            children: self.children,
        }
    }
}

/// Stream-mode frame stack.
///
/// Top of stack is the most recently opened frame; depth is bounded only
/// by nesting in the input.
#[derive(Debug, Default)]
pub struct StanzaStack {
    frames: Vec<Frame>,
}

impl StanzaStack {
    pub fn new() -> Self {
        StanzaStack { frames: Vec::new() }
    }

    /// Current stack depth. 0 = no container open, 1 = between stanzas.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Fold one token, returning the notification it completes, if any.
    ///
    /// Errors leave the stack untouched so folding continues over the
    /// remaining tokens of the batch.
    pub fn apply(&mut self, token: Token) -> Option<StreamEvent> {
        match token {
            Token::StartTag { name, attrs } => {
                if self.frames.is_empty() {
                    // Outer container: announce it, remember only that we
                    // are inside it.
                    self.frames.push(Frame::RootMarker);
                    Some(StreamEvent::StreamStart { name, attrs })
                } else {
                    self.frames.push(Frame::Open(OpenElement::new(name, attrs)));
                    None
                }
            }
            Token::EndTag { name } => match self.frames.pop() {
                Some(Frame::RootMarker) => Some(StreamEvent::StreamEnd { name }),
                Some(Frame::Open(open)) => {
                    let element = open.finish();
                    match self.frames.last_mut() {
                        Some(Frame::Open(parent)) => {
                            parent.push_child(element);
                            None
                        }
                        // Depth 2 -> 1: a stanza just completed.
                        Some(Frame::RootMarker) | None => {
                            Some(StreamEvent::StreamElement(element))
                        }
                    }
                }
                // Underflow: the tokenizer rejects stray closing tags, so
                // nothing to do here.
                None => None,
            },
            Token::Text(text) => match self.frames.last_mut() {
                Some(Frame::Open(open)) => {
                    open.push_text(text);
                    None
                }
                // Between stanzas: forwarded, never attached to anything.
                Some(Frame::RootMarker) => Some(StreamEvent::Cdata(text)),
                // Before any container: dropped, deliberately unreported.
                None => None,
            },
            Token::Error(message) => Some(StreamEvent::StreamError(message)),
        }
    }
}
