//! Incremental XML tokenizer.
//!
//! A [`Tokenizer`] is a stateful handle: raw bytes go in via [`feed`],
//! an ordered list of [`Token`]s comes out for exactly those bytes, and
//! anything incompletely scanned (a half-received tag, an unterminated
//! comment or CDATA section, a text run with no terminating `<` yet)
//! stays in an internal buffer until later input resolves it.
//!
//! The one deliberate deferral: character data is only emitted once its
//! terminating `<` has been scanned. A contiguous text run therefore
//! produces exactly one `Text` token no matter how the input is chunked,
//! which is what makes downstream notification sequences independent of
//! transport framing.
//!
//! Markup handled: start/end tags, self-closing tags, quoted attributes,
//! comments, processing instructions, the XML declaration and DOCTYPE
//! (all consumed without a token), and `<![CDATA[...]]>` sections
//! (verbatim text). The tokenizer also tracks open tag names so that a
//! mismatched or stray closing tag surfaces as a [`Token::Error`] instead
//! of corrupting downstream stacks.
//!
//! [`feed`]: Tokenizer::feed

use memchr::{memchr, memmem};
use unicode_xid::UnicodeXID;

use crate::element::Attr;
use crate::entities::decode_text;
use crate::event::Token;

/// Stateful byte-to-token scanner.
///
/// Exclusively owned by whoever acquired it: the stream assembler holds
/// one for the life of the stream, the element builder creates and drops
/// a throwaway one inside a single call. Dropping the handle releases it;
/// buffered partial state is discarded without being flushed.
#[derive(Debug, Default)]
pub struct Tokenizer {
    /// Unconsumed input: either a text run with no terminating `<` yet,
    /// or an incomplete markup construct starting with `<`.
    buf: Vec<u8>,
    /// Names of currently open tags, innermost last.
    open: Vec<String>,
}

impl Tokenizer {
    /// Create a new tokenizer with no buffered state.
    pub fn new() -> Self {
        Tokenizer {
            buf: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Scan a chunk of input, returning the tokens it completes.
    ///
    /// Safe to call with arbitrarily small or large chunks; splitting the
    /// input at any byte boundary yields the same concatenated token
    /// sequence.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Token> {
        self.buf.extend_from_slice(bytes);
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            if self.buf[pos] != b'<' {
                match memchr(b'<', &self.buf[pos..]) {
                    Some(rel) => {
                        let text = String::from_utf8_lossy(&self.buf[pos..pos + rel]);
                        tokens.push(Token::Text(decode_text(&text).into_owned()));
                        pos += rel;
                    }
                    // Text run not terminated yet.
                    None => break,
                }
                continue;
            }
            match self.scan_markup(pos, &mut tokens) {
                Some(next) => pos = next,
                // Incomplete construct; wait for more input.
                None => break,
            }
        }

        self.buf.drain(..pos);
        tokens
    }

    /// Flush end-of-input state: a pending text run becomes a final
    /// `Text` token, an incomplete markup construct becomes an error.
    ///
    /// Only meaningful for one-shot parsing; a long-lived stream is
    /// simply dropped with whatever it still buffers.
    pub fn finish(&mut self) -> Option<Token> {
        if self.buf.is_empty() {
            return None;
        }
        let buf = std::mem::take(&mut self.buf);
        if buf[0] == b'<' {
            Some(Token::Error("unclosed token"))
        } else {
            let text = String::from_utf8_lossy(&buf);
            Some(Token::Text(decode_text(&text).into_owned()))
        }
    }

    /// Check if there is unconsumed buffered input.
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Current element nesting depth as seen by the tokenizer.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Scan one markup construct starting at `pos` (which holds `<`).
    /// Returns the position after the construct, or None if incomplete.
    fn scan_markup(&mut self, pos: usize, tokens: &mut Vec<Token>) -> Option<usize> {
        let rest = &self.buf[pos..];
        if rest.len() < 2 {
            return None;
        }

        match rest[1] {
            b'!' => {
                if rest.len() >= 4 && &rest[..4] == b"<!--" {
                    // Comment: consumed, no token.
                    memmem::find(&rest[4..], b"-->").map(|i| pos + 4 + i + 3)
                } else if rest.len() < 4 && b"<!--".starts_with(rest) {
                    None
                } else if rest.len() >= 9 && &rest[..9] == b"<![CDATA[" {
                    // CDATA section: verbatim text, no entity decoding.
                    memmem::find(&rest[9..], b"]]>").map(|i| {
                        let text = String::from_utf8_lossy(&rest[9..9 + i]).into_owned();
                        tokens.push(Token::Text(text));
                        pos + 9 + i + 3
                    })
                } else if rest.len() < 9 && b"<![CDATA[".starts_with(rest) {
                    None
                } else {
                    // DOCTYPE and other declarations: consumed silently.
                    // Internal DTD subsets are out of scope.
                    memchr(b'>', rest).map(|gt| pos + gt + 1)
                }
            }
            b'?' => {
                // XML declaration / processing instruction: consumed.
                memmem::find(&rest[2..], b"?>").map(|i| pos + 2 + i + 2)
            }
            b'/' => {
                let gt = memchr(b'>', rest)?;
                let name = String::from_utf8_lossy(&rest[2..gt]).trim().to_string();
                if !is_valid_name(&name) {
                    tokens.push(Token::Error("invalid tag name"));
                } else {
                    match self.open.last() {
                        Some(top) if *top == name => {
                            self.open.pop();
                            tokens.push(Token::EndTag { name });
                        }
                        Some(_) => tokens.push(Token::Error("mismatched closing tag")),
                        None => tokens.push(Token::Error("unexpected closing tag")),
                    }
                }
                Some(pos + gt + 1)
            }
            _ => {
                let gt = find_tag_end(rest)?;
                let content = &rest[1..gt];
                let self_closing = content.ends_with(b"/");
                let body = if self_closing {
                    &content[..content.len() - 1]
                } else {
                    content
                };
                let text = String::from_utf8_lossy(body);
                match parse_start_tag(&text) {
                    Ok((name, attrs)) => {
                        tokens.push(Token::StartTag {
                            name: name.clone(),
                            attrs,
                        });
                        if self_closing {
                            tokens.push(Token::EndTag { name });
                        } else {
                            self.open.push(name);
                        }
                    }
                    Err(message) => tokens.push(Token::Error(message)),
                }
                Some(pos + gt + 1)
            }
        }
    }
}

/// Find the `>` closing a tag, honoring quoted attribute values.
/// Returns its index within `rest`, or None if the tag is incomplete.
fn find_tag_end(rest: &[u8]) -> Option<usize> {
    let mut in_single = false;
    let mut in_double = false;
    for (i, &b) in rest.iter().enumerate().skip(1) {
        match b {
            b'"' if !in_single => in_double = !in_double,
            b'\'' if !in_double => in_single = !in_single,
            b'>' if !in_single && !in_double => return Some(i),
            _ => {}
        }
    }
    None
}

/// Parse the interior of a start tag (between `<` and `>`, any trailing
/// `/` already stripped) into a name and attribute list.
fn parse_start_tag(text: &str) -> Result<(String, Vec<Attr>), &'static str> {
    let name_end = text
        .char_indices()
        .find(|&(_, c)| !is_name_char(c))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let name = &text[..name_end];
    if !is_valid_name(name) {
        return Err("invalid tag name");
    }
    let attrs = parse_attrs(&text[name_end..])?;
    Ok((name.to_string(), attrs))
}

/// Parse the attribute section of a start tag.
///
/// Order is preserved and duplicate names are kept; values must be
/// quoted (single or double) and have their entities decoded.
fn parse_attrs(input: &str) -> Result<Vec<Attr>, &'static str> {
    let mut attrs = Vec::new();
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        let rest = &input[pos..];
        let name_len = rest
            .char_indices()
            .find(|&(_, c)| !is_name_char(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        if !is_valid_name(name) {
            return Err("malformed attribute");
        }
        pos += name_len;

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b'=' {
            return Err("malformed attribute");
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err("malformed attribute");
        }

        let quote = bytes[pos];
        if quote != b'"' && quote != b'\'' {
            return Err("attribute value must be quoted");
        }
        pos += 1;
        let close = match memchr(quote, &bytes[pos..]) {
            Some(i) => i,
            None => return Err("malformed attribute"),
        };
        let value = decode_text(&input[pos..pos + close]).into_owned();
        attrs.push(Attr {
            name: name.to_string(),
            value,
        });
        pos += close + 1;
    }

    Ok(attrs)
}

/// XML NameStartChar, approximated with XID classes beyond ASCII.
fn is_name_start(c: char) -> bool {
    c == ':' || c == '_' || c.is_ascii_alphabetic() || (!c.is_ascii() && c.is_xid_start())
}

/// XML NameChar.
fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || c == '-'
        || c == '.'
        || c.is_ascii_digit()
        || (!c.is_ascii() && c.is_xid_continue())
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(is_name_char),
        _ => false,
    }
}
