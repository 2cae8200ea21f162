//! Profile text extraction.
//!
//! Members answer onboarding questions through several client versions, so
//! the stored answer structure is heterogeneous: an ordered list of
//! `{question, transcript}` pairs, a mapping from section name to such a
//! list, or nothing at all. This module flattens whatever is present into a
//! single string for classification.

use serde_json::Value;

/// Flatten a member's raw answer structure into one string.
///
/// Deterministic and total: the same input always yields the same output,
/// and unrecognized shapes degrade to a best-effort rendering or the empty
/// string rather than an error.
#[must_use]
pub fn profile_text(raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::Array(items)) => flatten_answer_list(items),
        Some(Value::Object(sections)) => {
            let mut parts = Vec::with_capacity(sections.len());
            for value in sections.values() {
                let section = match value {
                    Value::Array(items) => flatten_answer_list(items),
                    other => render_scalar(other),
                };
                if !section.is_empty() {
                    parts.push(section);
                }
            }
            parts.join("\n")
        }
        Some(other) => render_scalar(other),
    }
}

/// Join a list of `{question, transcript}` pairs as "question: transcript"
/// lines. Entries missing either field contribute what they have.
fn flatten_answer_list(items: &[Value]) -> String {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let question = item.get("question").and_then(Value::as_str).unwrap_or("");
        let transcript = item.get("transcript").and_then(Value::as_str).unwrap_or("");
        let line = match (question.is_empty(), transcript.is_empty()) {
            (true, true) => match item {
                Value::Object(_) => String::new(),
                other => render_scalar(other),
            },
            (false, true) => question.to_string(),
            (true, false) => transcript.to_string(),
            (false, false) => format!("{question}: {transcript}"),
        };
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_answers() {
        assert_eq!(profile_text(None), "");
        assert_eq!(profile_text(Some(&Value::Null)), "");
    }

    #[test]
    fn test_answer_list() {
        let raw = json!([
            {"question": "Hobbies?", "transcript": "Hiking and chess"},
            {"question": "Work?", "transcript": "Nurse"},
        ]);
        assert_eq!(
            profile_text(Some(&raw)),
            "Hobbies?: Hiking and chess\nWork?: Nurse"
        );
    }

    #[test]
    fn test_sectioned_answers() {
        let raw = json!({
            "interests": [{"question": "Hobbies?", "transcript": "Pottery"}],
            "background": [{"question": "Hometown?", "transcript": "Lagos"}],
        });
        let text = profile_text(Some(&raw));
        assert!(text.contains("Hobbies?: Pottery"));
        assert!(text.contains("Hometown?: Lagos"));
    }

    #[test]
    fn test_partial_pairs() {
        let raw = json!([
            {"question": "Hobbies?"},
            {"transcript": "I love climbing"},
            {},
        ]);
        assert_eq!(profile_text(Some(&raw)), "Hobbies?\nI love climbing");
    }

    #[test]
    fn test_unrecognized_shape_stringifies() {
        assert_eq!(profile_text(Some(&json!("just a note"))), "just a note");
        assert_eq!(profile_text(Some(&json!(42))), "42");
    }

    #[test]
    fn test_deterministic() {
        let raw = json!({"a": [{"question": "q", "transcript": "t"}], "b": "note"});
        assert_eq!(profile_text(Some(&raw)), profile_text(Some(&raw)));
    }
}
