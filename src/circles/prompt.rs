//! Clustering request construction.

use std::fmt::Write as _;

use crate::classify::RosterEntry;

/// System framing shared by the clustering request.
pub const CLUSTERING_SYSTEM: &str = "You group community members into interest circles. \
You only use facts members explicitly stated. You respond with a single JSON object and nothing else.";

/// Build the clustering prompt for a roster.
#[must_use]
pub fn clustering_prompt(roster: &[RosterEntry]) -> String {
    let mut out = String::with_capacity(1024 + roster.len() * 256);

    out.push_str("Below is a community roster. Each member has a number, a name, and the text of their own answers.\n\nMEMBERS:\n");
    for entry in roster {
        let _ = writeln!(out, "{}. {}", entry.index, entry.name);
        if entry.text.is_empty() {
            out.push_str("(no profile text)\n");
        } else {
            out.push_str(&entry.text);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(
        "Group these members into interest circles. Rules:\n\
         - Only form a circle for an interest that at least 3 members EXPLICITLY stated. Do not infer or guess.\n\
         - Never combine two distinct activities into one circle (e.g. hiking and painting are two circles, not \"outdoors & arts\").\n\
         - Every circle needs a descriptive multi-word \"name\" and a short plural-noun \"shortName\".\n\
         - For each member you place in a circle, write a short \"tagline\" built ONLY from facts that member stated.\n\
         - Refer to members only by their number as \"memberId\".\n\n\
         Respond ONLY with a JSON object in exactly this shape, no markdown:\n\
         {\"circles\": [{\"id\": \"slug\", \"name\": \"Descriptive Circle Name\", \"shortName\": \"Plurals\", \"members\": [{\"memberId\": 1, \"tagline\": \"...\"}]}]}",
    );

    out
}
