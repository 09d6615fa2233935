//! Editable pretty-printing of compact JSON.
//!
//! The output is meant for a small fixed-width editor, not for archival:
//! every `{`, `[` and `,` outside a string is followed by a line break and
//! a flat two-space indent, and every closing `}`/`]` starts its own line.
//! Indentation does not grow with nesting depth. Input whitespace is kept
//! as-is and string literals are never broken.
//!
//! ```text
//! {"a":1,"b":[2,3]}   →   {
//!                           "a":1,
//!                           "b":[
//!                           2,
//!                           3
//!                         ]
//!                         }
//! ```

use crate::scan::{Step, StringTracker};

const INDENT: &[u8] = b"  ";

/// Reformat `json` with line breaks outside string literals.
///
/// ```
/// assert_eq!(d_json::pretty(r#"{"a":1,"b":2}"#), "{\n  \"a\":1,\n  \"b\":2\n}");
/// ```
#[must_use]
pub fn pretty(json: &str) -> String {
    let mut out: Vec<u8> = Vec::with_capacity(json.len() * 2);
    let mut tracker = StringTracker::new();

    for b in json.bytes() {
        if tracker.step(b) != Step::Outside {
            out.push(b);
            continue;
        }
        match b {
            b'{' | b'[' | b',' => {
                out.push(b);
                out.push(b'\n');
                out.extend_from_slice(INDENT);
            }
            b'}' | b']' => {
                if out.last().is_some_and(|&last| last != b'\n') {
                    out.push(b'\n');
                }
                out.push(b);
            }
            _ => out.push(b),
        }
    }

    // Only ASCII was inserted, at ASCII boundaries, so the bytes stay UTF-8.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
