//! Parser events - tokens in, notifications out.
//!
//! Two event vocabularies meet here:
//!
//! - [`Token`] is the low-level vocabulary produced by the tokenizer: one
//!   token per piece of markup or character-data run.
//! - [`StreamEvent`] is the high-level vocabulary delivered to a [`Sink`]
//!   by the stream assembler: one notification per completed stanza,
//!   stream open/close, top-level character data, or error.
//!
//! ## Token sequences
//!
//! `<message to="juliet"><body>hi</body></message>` tokenizes as:
//! ```text
//! StartTag { name: "message", attrs: [("to", "juliet")] }
//! StartTag { name: "body", attrs: [] }
//! Text("hi")
//! EndTag { name: "body" }
//! EndTag { name: "message" }
//! ```
//!
//! A self-closing tag `<ping/>` emits `StartTag` immediately followed by
//! `EndTag` - downstream folds never see a separate empty-element case.

use crate::element::{Attr, Element};

/// Low-level tokenizer output.
///
/// Every token reflects bytes that have been completely scanned; anything
/// still ambiguous (a half-received tag, an unterminated comment) stays
/// buffered inside the tokenizer until later input resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Opening tag: `<name attr="value" ...>`.
    ///
    /// Attribute order is preserved and duplicates are kept; entity
    /// references in values arrive already decoded.
    StartTag { name: String, attrs: Vec<Attr> },

    /// Closing tag: `</name>`.
    ///
    /// The tokenizer only emits this when `name` matches the innermost
    /// open tag, so a fold popping its stack always pops the right frame.
    EndTag { name: String },

    /// A run of character data, entities decoded.
    ///
    /// Emitted once the terminating `<` has been scanned, so one
    /// contiguous run yields one token regardless of input chunking.
    /// CDATA sections are emitted verbatim as their own `Text` token.
    Text(String),

    /// Malformed syntax. Scanning continues after the offending construct.
    Error(&'static str),
}

/// High-level notification delivered to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The outer container opened. Its name and attributes are handed over
    /// here and not retained by the parser.
    StreamStart { name: String, attrs: Vec<Attr> },

    /// One complete top-level stanza.
    StreamElement(Element),

    /// The outer container closed.
    StreamEnd { name: String },

    /// Character data directly inside the outer container (for example
    /// keep-alive whitespace between stanzas). Never attached to an
    /// element.
    Cdata(String),

    /// A tokenizer syntax error, or the advisory "stanza too big" from the
    /// size guard. Stream state is left intact; the caller decides whether
    /// to tear the stream down.
    StreamError(&'static str),
}

impl StreamEvent {
    /// Check if this is an error notification.
    pub fn is_error(&self) -> bool {
        matches!(self, StreamEvent::StreamError(_))
    }
}

/// Consumer of stream notifications.
///
/// Delivery is synchronous, in event order, and at most once per
/// underlying token. It is also fire-and-forget: implementations must not
/// propagate consumer failure back into the parser - a sink backed by a
/// channel whose receiver has gone away should drop the event, not panic.
///
/// Any `FnMut(StreamEvent)` closure is a sink. To hand a live stream to a
/// different consumer via [`rebind_sink`](crate::stream::StreamParser::rebind_sink),
/// use a boxed closure (`Box<dyn FnMut(StreamEvent)>`) or a channel sender
/// wrapped in a closure so both sinks share one type:
///
/// ```
/// use xmlstream_core::{StreamEvent, StreamParser, Tokenizer};
///
/// let (tx, rx) = std::sync::mpsc::channel();
/// let sink = move |event: StreamEvent| {
///     let _ = tx.send(event); // receiver gone: event dropped, parser unaffected
/// };
/// let mut parser = StreamParser::new(Tokenizer::new(), sink, None);
/// parser.feed(b"<stream><a/>");
/// assert_eq!(rx.try_iter().count(), 2);
/// ```
pub trait Sink {
    /// Deliver one notification.
    fn deliver(&mut self, event: StreamEvent);
}

impl<F> Sink for F
where
    F: FnMut(StreamEvent),
{
    fn deliver(&mut self, event: StreamEvent) {
        self(event)
    }
}
