//! Best-effort JSON-object extraction from untrusted classifier text.
//!
//! Stage 1 of the two-stage response pipeline: pull the first
//! balanced-looking `{...}` out of arbitrary text, tolerating prose
//! preamble, trailing commentary, and markdown code fences. This is a
//! tolerant lexer, not a full parser; whatever it finds still has to
//! survive `serde_json` and schema validation in stage 2.

/// Extract the first balanced `{...}` object from raw text.
///
/// Brace depth is tracked outside of string literals (with escape handling)
/// so braces inside values don't terminate the scan early. Returns `None`
/// when no opening brace exists or the object never closes.
#[must_use]
pub fn extract_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}
