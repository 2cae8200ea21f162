//! Member read-model supplied by the caller's member store.

use serde::{Deserialize, Serialize};

/// A community member as supplied by the persistent member store.
///
/// The engine treats this as read-only input: identity, display name parts,
/// and whatever free-text profile material the member has provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProfile {
    /// Opaque stable identifier owned by the member store.
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Heterogeneous free-text answer structure. Either an ordered list of
    /// `{question, transcript}` pairs, a mapping from section name to such a
    /// list, or absent entirely.
    #[serde(default)]
    pub raw_answers: Option<serde_json::Value>,
    /// Optional free-text self summary.
    #[serde(default)]
    pub summary_text: Option<String>,
}

impl MemberProfile {
    /// Display name derived from first/last name. May be empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        match (first.is_empty(), last.is_empty()) {
            (true, true) => String::new(),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (false, false) => format!("{first} {last}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(first: Option<&str>, last: Option<&str>) -> MemberProfile {
        MemberProfile {
            id: "m1".to_string(),
            first_name: first.map(ToString::to_string),
            last_name: last.map(ToString::to_string),
            raw_answers: None,
            summary_text: None,
        }
    }

    #[test]
    fn test_display_name_full() {
        assert_eq!(member(Some("Ada"), Some("Lovelace")).display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_partial() {
        assert_eq!(member(Some("Ada"), None).display_name(), "Ada");
        assert_eq!(member(None, Some("Lovelace")).display_name(), "Lovelace");
    }

    #[test]
    fn test_display_name_empty() {
        assert_eq!(member(None, None).display_name(), "");
        assert_eq!(member(Some("  "), Some("")).display_name(), "");
    }
}
