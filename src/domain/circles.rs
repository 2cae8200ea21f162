//! Interest circles and the cached clustering result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::member::MemberProfile;

/// Sentinel circle id for the circle containing every member.
pub const ALL_CIRCLE_ID: &str = "all";

/// Minimum number of resolved members a non-sentinel circle must have.
pub const MIN_CIRCLE_MEMBERS: usize = 3;

/// Rosters smaller than this skip classification entirely.
pub const MIN_COMMUNITY_SIZE: usize = 5;

/// A named, evidence-grounded cluster of community members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    /// Stable slug.
    pub id: String,
    /// Human label, e.g. "Trail Running Enthusiasts".
    pub name: String,
    /// Compact label for constrained display, e.g. "Runners".
    pub short_name: String,
    pub members: Vec<CircleMember>,
}

impl Circle {
    /// Build the synthetic All-circle from the full roster.
    ///
    /// Always present, always first in the output, exempt from the
    /// minimum-size rule.
    #[must_use]
    pub fn all(members: &[MemberProfile]) -> Self {
        Self {
            id: ALL_CIRCLE_ID.to_string(),
            name: "All Members".to_string(),
            short_name: "Everyone".to_string(),
            members: members.iter().map(CircleMember::from_profile).collect(),
        }
    }

    /// Whether this is the sentinel circle containing everyone.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.id == ALL_CIRCLE_ID
    }
}

/// A member's placement within one circle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleMember {
    pub user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Short justification grounded in that member's stated answers.
    #[serde(default)]
    pub tagline: String,
}

impl CircleMember {
    /// Placement with no tagline (used by the All-circle).
    #[must_use]
    pub fn from_profile(profile: &MemberProfile) -> Self {
        Self::with_tagline(profile, String::new())
    }

    #[must_use]
    pub fn with_tagline(profile: &MemberProfile, tagline: String) -> Self {
        Self {
            user_id: profile.id.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            tagline,
        }
    }
}

/// The complete clustering output for one community.
///
/// Replaced wholesale on regeneration, never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CirclesResult {
    pub circles: Vec<Circle>,
    pub generated_at: DateTime<Utc>,
    /// Informational metadata for the caller; the cache manager is the sole
    /// enforcer of actual expiry.
    pub expires_at: DateTime<Utc>,
}
