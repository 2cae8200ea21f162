//! Matching request construction.
//!
//! Same 1-based sequential-index scheme as the clustering prompt, scoped to
//! one user against a candidate pool.

use std::fmt::Write as _;

use crate::classify::RosterEntry;

/// Number of ranked candidates requested from the classifier.
pub const MAX_RANKED_CANDIDATES: usize = 5;

/// System framing shared by the matching request.
pub const MATCHING_SYSTEM: &str = "You recommend one-on-one introductions between community members. \
You only use facts members explicitly stated. You respond with a single JSON object and nothing else.";

/// Build the matching prompt for one user against a candidate pool.
#[must_use]
pub fn matching_prompt(user_name: &str, user_text: &str, candidates: &[RosterEntry]) -> String {
    let mut out = String::with_capacity(1024 + candidates.len() * 256);

    let _ = writeln!(out, "We want to introduce this member to someone new:\n\nUSER: {user_name}");
    if user_text.is_empty() {
        out.push_str("(no profile text)\n");
    } else {
        out.push_str(user_text);
        out.push('\n');
    }

    out.push_str("\nCANDIDATES:\n");
    for entry in candidates {
        let _ = writeln!(out, "{}. {}", entry.index, entry.name);
        if entry.text.is_empty() {
            out.push_str("(no profile text)\n");
        } else {
            out.push_str(&entry.text);
            out.push('\n');
        }
        out.push('\n');
    }

    let _ = write!(
        out,
        "Rank up to {MAX_RANKED_CANDIDATES} candidates for an introduction, judging shared interests, \
         similar life stage, complementary skills, and conversational potential. For each candidate give a \
         \"matchScore\" between 0 and 1, the \"sharedInterests\" you found, and exactly 3 personalized \
         \"icebreakerQuestions\" the two could open with. Refer to candidates only by their number as \"memberId\".\n\n\
         Respond ONLY with a JSON object in exactly this shape, no markdown:\n\
         {{\"candidates\": [{{\"memberId\": 1, \"matchScore\": 0.8, \"sharedInterests\": [\"...\"], \"icebreakerQuestions\": [\"...\", \"...\", \"...\"]}}]}}"
    );

    out
}
