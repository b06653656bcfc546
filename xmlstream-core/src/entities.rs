//! Entity and character reference decoding.
//!
//! Handles the five predefined XML entities (`&lt;` `&gt;` `&amp;`
//! `&quot;` `&apos;`) and decimal/hex character references (`&#123;`
//! `&#x7B;`). Unknown or unterminated references are left literal rather
//! than rejected - the tokenizer does not process DTDs, so user-defined
//! entities cannot be resolved here.
//!
//! Uses Cow for zero-copy when no references are present.

use memchr::memchr;
use phf::phf_map;
use std::borrow::Cow;

static PREDEFINED: phf::Map<&'static str, &'static str> = phf_map! {
    "lt" => "<",
    "gt" => ">",
    "amp" => "&",
    "quot" => "\"",
    "apos" => "'",
};

/// Decode all entity references in `input`.
///
/// Returns `Borrowed` when no `&` is present (the common case for element
/// names and most text runs).
pub fn decode_text(input: &str) -> Cow<'_, str> {
    // Fast path: no ampersand, nothing to do.
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        match memchr(b'&', &bytes[pos..]) {
            Some(amp) => {
                // `&` and `;` are ASCII, so slicing at their offsets stays
                // on char boundaries.
                result.push_str(&input[pos..pos + amp]);
                pos += amp;

                match memchr(b';', &bytes[pos..]) {
                    Some(semi) => {
                        let name = &input[pos + 1..pos + semi];
                        match decode_reference(name) {
                            Some(decoded) => {
                                result.push_str(&decoded);
                                pos += semi + 1;
                            }
                            None => {
                                // Unknown entity: keep the `&` literal and
                                // rescan from the next byte.
                                result.push('&');
                                pos += 1;
                            }
                        }
                    }
                    None => {
                        // Unterminated reference.
                        result.push('&');
                        pos += 1;
                    }
                }
            }
            None => {
                result.push_str(&input[pos..]);
                break;
            }
        }
    }

    Cow::Owned(result)
}

/// Decode a single reference body (the part between `&` and `;`).
fn decode_reference(name: &str) -> Option<Cow<'static, str>> {
    if let Some(rest) = name.strip_prefix('#') {
        return decode_char_reference(rest).map(|c| Cow::Owned(c.to_string()));
    }
    PREDEFINED.get(name).map(|s| Cow::Borrowed(*s))
}

/// Decode a numeric character reference body (after `#`).
fn decode_char_reference(digits: &str) -> Option<char> {
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    // from_u32 rejects surrogates and out-of-range values.
    char::from_u32(code)
}
