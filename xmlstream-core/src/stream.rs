//! Stream-mode parser: long-lived, chunk-fed, notification-driven.
//!
//! A [`StreamParser`] owns a tokenizer and a frame stack for the life of
//! one stream. Each [`feed`](StreamParser::feed) call scans a chunk,
//! folds the resulting tokens through the stack, and delivers every
//! notification to the sink in order. The notification sequence depends
//! only on the concatenated byte stream, never on where chunk boundaries
//! fall.
//!
//! An optional size guard bounds how many bytes may arrive without a
//! stanza completing. Crossing the limit produces a single advisory
//! [`StreamError`](crate::event::StreamEvent::StreamError) with message
//! `"stanza too big"`; parsing state is untouched and the caller decides
//! whether to tear the stream down.

use crate::event::{Sink, StreamEvent};
use crate::stack::StanzaStack;
use crate::tokenizer::Tokenizer;

const STANZA_TOO_BIG: &str = "stanza too big";

/// Incremental stanza assembler over a byte stream.
pub struct StreamParser<S: Sink> {
    tokenizer: Tokenizer,
    stack: StanzaStack,
    sink: S,
    /// Bytes fed since the last completed stanza.
    bytes_since_reset: usize,
    max_size: Option<usize>,
    /// Set once the guard has fired for the current stanza, so an
    /// oversized stanza arriving over many chunks reports once.
    limit_reported: bool,
}

impl<S: Sink> StreamParser<S> {
    /// Create a parser over `tokenizer`, delivering to `sink`.
    ///
    /// `max_size` of `None` disables the size guard entirely.
    pub fn new(tokenizer: Tokenizer, sink: S, max_size: Option<usize>) -> Self {
        StreamParser {
            tokenizer,
            stack: StanzaStack::new(),
            sink,
            bytes_since_reset: 0,
            max_size,
            limit_reported: false,
        }
    }

    /// Swap in a new notification consumer.
    ///
    /// All buffered parse state survives; only future notifications go to
    /// the new sink. Useful when stream ownership moves between handlers
    /// mid-session.
    pub fn rebind_sink(&mut self, sink: S) {
        self.sink = sink;
    }

    /// Scan one chunk and deliver every notification it completes.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.bytes_since_reset += bytes.len();

        for token in self.tokenizer.feed(bytes) {
            if let Some(event) = self.stack.apply(token) {
                if let StreamEvent::StreamElement(_) = event {
                    self.bytes_since_reset = 0;
                    self.limit_reported = false;
                }
                self.sink.deliver(event);
            }
        }

        if let Some(max) = self.max_size {
            if self.bytes_since_reset > max && !self.limit_reported {
                self.limit_reported = true;
                self.sink.deliver(StreamEvent::StreamError(STANZA_TOO_BIG));
            }
        }
    }

    /// Current nesting depth. 0 = no container open, 1 = between stanzas,
    /// deeper = inside a stanza under construction.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Bytes accepted since the last stanza completed.
    pub fn bytes_since_reset(&self) -> usize {
        self.bytes_since_reset
    }

    /// Tear the stream down, discarding any buffered partial input and
    /// returning the sink to its owner.
    pub fn close(self) -> S {
        self.sink
    }
}
