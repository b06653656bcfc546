//! Stanza-Oriented Streaming XML Parser
//!
//! Incremental assembly of element trees from a chunked XML byte stream.
//! Stream mode delivers one notification per completed top-level stanza
//! without ever holding the whole stream; document mode parses a
//! self-contained fragment into a tree in one call.
//!
//! # Architecture
//!
//! - **tokenizer.rs** - Incremental byte-to-token scanner with partial-input buffering
//! - **entities.rs** - Predefined entity and character reference decoding
//! - **stack.rs** - Frame stack fold: tokens in, stanza notifications out
//! - **stream.rs** - StreamParser: long-lived chunk-fed assembler with size guard
//! - **element.rs** - Element tree model, navigation, one-shot document builder
//! - **event.rs** - Token and StreamEvent vocabularies, Sink trait

pub mod element;
pub mod entities;
pub mod event;
pub mod stack;
pub mod stream;
pub mod tokenizer;

pub use element::{Attr, Element, Node, ParseError};
pub use event::{Sink, StreamEvent, Token};
pub use stream::StreamParser;
pub use tokenizer::Tokenizer;
