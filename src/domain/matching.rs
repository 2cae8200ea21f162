//! Icebreaker match output and the intermediate candidate shape.

use serde::{Deserialize, Serialize};

/// A single recommended introduction between two members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcebreakerMatch {
    pub user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_summary: String,
    /// Match quality in `[0, 1]`.
    pub match_score: f64,
    #[serde(default)]
    pub shared_interests: Vec<String>,
    /// Three suggested conversation starters.
    #[serde(default)]
    pub icebreaker_questions: Vec<String>,
}

/// A ranked candidate as proposed by the classifier, keyed by its transient
/// 1-based index into the submitted candidate pool. Validated before being
/// resolved to a real member.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// 1-based index into the candidate pool of the originating request.
    pub index: usize,
    pub match_score: Option<f64>,
    pub shared_interests: Vec<String>,
    pub icebreaker_questions: Vec<String>,
}
