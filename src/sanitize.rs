//! Neutralize regexes the validation engine cannot run.
//!
//! Resource schemas are written against other regex dialects. Before schema
//! text is handed to the validator, every `"pattern"` value and every
//! `patternProperties` key that `jsonschema` refuses to compile is replaced
//! with `""`, which matches anything. Patterns the engine accepts, lookaround
//! and backreferences included, are kept and enforced.
//!
//! Only one key per `patternProperties` map is blanked; a second unsupported
//! key is left as written, since two `""` keys would collapse into one.
//!
//! This is a textual pass: everything else, including whitespace, ordering
//! and even malformed JSON, is copied through unchanged.

use serde_json::json;
use tracing::debug;

const PATTERN_KEY: &str = "pattern";
const PATTERN_PROPERTIES_KEY: &str = "patternProperties";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object { pattern_map: bool, blanked: bool },
    Array,
}

/// Replace unsupported `pattern` values and `patternProperties` keys with `""`.
pub fn sanitize(document: &str) -> String {
    let bytes = document.as_bytes();
    let mut out = String::with_capacity(document.len());
    let mut stack: Vec<Frame> = Vec::new();
    // Key whose value is about to be read.
    let mut pending_key: Option<&str> = None;
    let mut neutralized = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let (end, terminated) = string_end(bytes, i);
                let literal = &document[i..end];
                let raw = if terminated {
                    &document[i + 1..end - 1]
                } else {
                    &document[i + 1..end]
                };

                let after = skip_whitespace(bytes, end);
                let is_key = bytes.get(after) == Some(&b':');

                let neutralize = terminated
                    && if is_key {
                        let value_start = skip_whitespace(bytes, after + 1);
                        let opens_object = bytes.get(value_start) == Some(&b'{');
                        match stack.last_mut() {
                            Some(Frame::Object {
                                pattern_map: true,
                                blanked,
                            }) if opens_object && !is_supported(raw) => {
                                if *blanked {
                                    debug!(
                                        pattern = raw,
                                        "unsupported pattern key kept, map already has a blank key"
                                    );
                                    false
                                } else {
                                    *blanked = true;
                                    true
                                }
                            }
                            _ => false,
                        }
                    } else {
                        pending_key == Some(PATTERN_KEY) && !is_supported(raw)
                    };

                if neutralize {
                    out.push_str("\"\"");
                    neutralized += 1;
                } else {
                    out.push_str(literal);
                }

                pending_key = if is_key { Some(raw) } else { None };
                i = end;
            }
            b'{' => {
                stack.push(Frame::Object {
                    pattern_map: pending_key == Some(PATTERN_PROPERTIES_KEY),
                    blanked: false,
                });
                pending_key = None;
                out.push('{');
                i += 1;
            }
            b'[' => {
                stack.push(Frame::Array);
                pending_key = None;
                out.push('[');
                i += 1;
            }
            b'}' | b']' => {
                stack.pop();
                pending_key = None;
                out.push(bytes[i] as char);
                i += 1;
            }
            b':' => {
                out.push(':');
                i += 1;
            }
            b',' => {
                pending_key = None;
                out.push(',');
                i += 1;
            }
            _ => {
                let end = next_structural(bytes, i);
                let run = &document[i..end];
                if !run.trim().is_empty() {
                    pending_key = None;
                }
                out.push_str(run);
                i = end;
            }
        }
    }

    if neutralized > 0 {
        debug!(neutralized, "neutralized unsupported patterns");
    }

    out
}

/// True if the JSON string body `raw` unescapes to a regex the validator
/// compiles.
///
/// Bodies that are not valid JSON strings are left alone.
fn is_supported(raw: &str) -> bool {
    match serde_json::from_str::<String>(&format!("\"{}\"", raw)) {
        Ok(pattern) => jsonschema::validator_for(&json!({ "pattern": pattern })).is_ok(),
        Err(_) => true,
    }
}

/// Index just past the string starting at `start`, and whether it was closed.
fn string_end(bytes: &[u8], start: usize) -> (usize, bool) {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return (j + 1, true),
            _ => j += 1,
        }
    }
    (bytes.len(), false)
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn next_structural(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && !matches!(bytes[i], b'"' | b'{' | b'}' | b'[' | b']' | b':' | b',') {
        i += 1;
    }
    i
}
