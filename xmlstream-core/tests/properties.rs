//! Property-based tests.
//!
//! Structural invariants that must hold for ANY input, not just crafted
//! examples. proptest generates random inputs and shrinks failures to
//! minimal cases.

use proptest::prelude::*;
use xmlstream_core::{Element, StreamEvent, StreamParser, Tokenizer};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Run stream mode over `input` split at the given boundaries, collecting
/// every notification.
fn stream_events(input: &[u8], splits: &[usize]) -> Vec<StreamEvent> {
    let (tx, rx) = std::sync::mpsc::channel();
    let sink = move |event: StreamEvent| {
        let _ = tx.send(event);
    };
    let mut parser = StreamParser::new(Tokenizer::new(), sink, None);

    let mut start = 0;
    for &split in splits {
        let split = split.min(input.len());
        if split > start {
            parser.feed(&input[start..split]);
            start = split;
        }
    }
    parser.feed(&input[start..]);
    drop(parser.close());
    rx.into_iter().collect()
}

/// A generator biased towards XML-shaped input so the interesting code
/// paths actually get exercised.
fn xmlish() -> impl Strategy<Value = Vec<u8>> {
    "[<>/a-z '\"=&;#x0-9!\\[\\]?-]{0,200}".prop_map(String::into_bytes)
}

// =============================================================================
// Property: Never Panics
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// Neither mode may panic, whatever the bytes.
    #[test]
    fn stream_mode_never_panics(input in prop::collection::vec(any::<u8>(), 0..1000)) {
        let _ = stream_events(&input, &[]);
    }

    #[test]
    fn document_mode_never_panics(input in prop::collection::vec(any::<u8>(), 0..1000)) {
        let _ = Element::parse(&input);
    }

    #[test]
    fn stream_mode_never_panics_xmlish(input in xmlish()) {
        let _ = stream_events(&input, &[]);
    }

    #[test]
    fn document_mode_never_panics_xmlish(input in xmlish()) {
        let _ = Element::parse(&input);
    }
}

// =============================================================================
// Property: Chunk Independence
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// The notification sequence depends only on the concatenated bytes,
    /// never on where chunk boundaries fall.
    #[test]
    fn chunking_is_invisible(
        input in xmlish(),
        splits in prop::collection::vec(0usize..200, 0..8),
    ) {
        let mut splits = splits;
        splits.sort_unstable();
        prop_assert_eq!(stream_events(&input, &splits), stream_events(&input, &[]));
    }

    /// Same input, same notifications. The fold has no hidden state.
    #[test]
    fn parsing_is_deterministic(input in xmlish()) {
        prop_assert_eq!(stream_events(&input, &[]), stream_events(&input, &[]));
        prop_assert_eq!(Element::parse(&input), Element::parse(&input));
    }
}

// =============================================================================
// Property: Notification Shape
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// StreamStart only when no container is open; stanzas, Cdata and
    /// StreamEnd only while one is. A container may open again after the
    /// previous one closed.
    #[test]
    fn stream_lifecycle_is_ordered(input in xmlish()) {
        let mut container_open = false;
        for event in stream_events(&input, &[]) {
            match event {
                StreamEvent::StreamStart { .. } => {
                    prop_assert!(!container_open);
                    container_open = true;
                }
                StreamEvent::StreamEnd { .. } => {
                    prop_assert!(container_open);
                    container_open = false;
                }
                StreamEvent::StreamElement(_) | StreamEvent::Cdata(_) => {
                    prop_assert!(container_open);
                }
                // Errors can arrive in any state.
                StreamEvent::StreamError(_) => {}
            }
        }
    }

    /// A parsed tree never holds two adjacent text children, at any depth.
    #[test]
    fn text_children_are_coalesced(input in xmlish()) {
        fn check(el: &Element) -> bool {
            let mut prev_was_text = false;
            for child in &el.children {
                match child {
                    xmlstream_core::Node::Text(_) => {
                        if prev_was_text {
                            return false;
                        }
                        prev_was_text = true;
                    }
                    xmlstream_core::Node::Element(inner) => {
                        if !check(inner) {
                            return false;
                        }
                        prev_was_text = false;
                    }
                }
            }
            true
        }

        if let Ok(el) = Element::parse(&input) {
            prop_assert!(check(&el));
        }
        for event in stream_events(&input, &[]) {
            if let StreamEvent::StreamElement(el) = event {
                prop_assert!(check(&el));
            }
        }
    }
}
