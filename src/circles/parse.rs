//! Stage-2 validation of classifier circle output.
//!
//! Coerces whatever the classifier produced into a bounded `Vec<Circle>`,
//! discarding anything that fails validation rather than erroring. A `None`
//! return means the response was unusable as a whole and the orchestrator
//! falls back to the All-circle.

use serde::Deserialize;

use crate::classify::json::extract_object;
use crate::domain::circles::{ALL_CIRCLE_ID, Circle, CircleMember, MIN_CIRCLE_MEMBERS};
use crate::domain::member::MemberProfile;

#[derive(Debug, Deserialize)]
struct RawCircles {
    circles: Option<Vec<RawCircle>>,
}

#[derive(Debug, Deserialize)]
struct RawCircle {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, alias = "shortName")]
    short_name: String,
    #[serde(default)]
    members: Vec<RawCircleMember>,
}

#[derive(Debug, Deserialize)]
struct RawCircleMember {
    #[serde(default, alias = "memberId")]
    member_id: Option<serde_json::Value>,
    #[serde(default)]
    tagline: String,
}

/// Parse and validate raw classifier text into circles.
///
/// Returns `None` when no JSON object can be found, the JSON fails to parse,
/// or the `circles` field is missing. Individual bad entries are dropped,
/// not fatal: member references must be integers in `[1, roster.len()]`
/// (duplicates within a circle collapse to one), and circles that resolve to
/// fewer than [`MIN_CIRCLE_MEMBERS`] real members are discarded.
#[must_use]
pub fn parse_circles(raw_text: &str, roster: &[MemberProfile]) -> Option<Vec<Circle>> {
    let json_str = extract_object(raw_text)?;
    let parsed: RawCircles = serde_json::from_str(json_str).ok()?;
    let raw_circles = parsed.circles?;

    let mut circles = Vec::with_capacity(raw_circles.len());
    for raw in raw_circles {
        if let Some(circle) = validate_circle(raw, roster) {
            circles.push(circle);
        }
    }
    Some(circles)
}

fn validate_circle(raw: RawCircle, roster: &[MemberProfile]) -> Option<Circle> {
    let mut members = Vec::with_capacity(raw.members.len());
    let mut seen = vec![false; roster.len()];

    for entry in raw.members {
        let Some(idx) = resolve_index(entry.member_id.as_ref(), roster.len()) else {
            tracing::debug!(member_id = ?entry.member_id, "Dropping out-of-range member reference");
            continue;
        };
        if seen[idx - 1] {
            continue;
        }
        seen[idx - 1] = true;
        members.push(CircleMember::with_tagline(&roster[idx - 1], entry.tagline));
    }

    if members.len() < MIN_CIRCLE_MEMBERS {
        tracing::debug!(
            circle = %raw.name,
            resolved = members.len(),
            "Dropping under-populated circle"
        );
        return None;
    }

    let mut id = raw
        .id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| slugify(&raw.name));
    if id == ALL_CIRCLE_ID {
        // "all" is reserved for the sentinel circle.
        id = format!("{id}-interest");
    }

    let name = if raw.name.trim().is_empty() {
        id.clone()
    } else {
        raw.name
    };
    let short_name = if raw.short_name.trim().is_empty() {
        name.clone()
    } else {
        raw.short_name
    };

    Some(Circle {
        id,
        name,
        short_name,
        members,
    })
}

/// Accept only JSON integers in `[1, roster_len]`.
fn resolve_index(value: Option<&serde_json::Value>, roster_len: usize) -> Option<usize> {
    let idx = value?.as_i64()?;
    if idx < 1 || idx > roster_len as i64 {
        return None;
    }
    Some(idx as usize)
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "circle".to_string()
    } else {
        slug
    }
}
