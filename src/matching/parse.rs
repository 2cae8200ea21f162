//! Stage-2 validation of classifier candidate output.

use serde::Deserialize;

use crate::classify::json::extract_object;
use crate::domain::matching::MatchCandidate;

use super::prompt::MAX_RANKED_CANDIDATES;

#[derive(Debug, Deserialize)]
struct RawCandidates {
    candidates: Option<Vec<RawCandidate>>,
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(default, alias = "memberId")]
    member_id: Option<serde_json::Value>,
    #[serde(default, alias = "matchScore")]
    match_score: Option<f64>,
    #[serde(default, alias = "sharedInterests")]
    shared_interests: Vec<String>,
    #[serde(default, alias = "icebreakerQuestions")]
    icebreaker_questions: Vec<String>,
}

/// Parse and validate raw classifier text into ranked candidates.
///
/// Returns `None` when the response is unusable as a whole. Candidates with
/// references outside `[1, pool_len]` are dropped, duplicate indices
/// collapse to the first occurrence, scores are clamped into `[0, 1]`, and
/// the list is bounded at [`MAX_RANKED_CANDIDATES`].
#[must_use]
pub fn parse_candidates(raw_text: &str, pool_len: usize) -> Option<Vec<MatchCandidate>> {
    let json_str = extract_object(raw_text)?;
    let parsed: RawCandidates = serde_json::from_str(json_str).ok()?;
    let raw_candidates = parsed.candidates?;

    let mut seen = vec![false; pool_len];
    let mut candidates = Vec::with_capacity(raw_candidates.len().min(MAX_RANKED_CANDIDATES));
    for raw in raw_candidates {
        let Some(idx) = raw
            .member_id
            .as_ref()
            .and_then(serde_json::Value::as_i64)
            .filter(|&i| i >= 1 && i <= pool_len as i64)
        else {
            tracing::debug!(member_id = ?raw.member_id, "Dropping out-of-range candidate reference");
            continue;
        };
        let idx = idx as usize;
        if seen[idx - 1] {
            continue;
        }
        seen[idx - 1] = true;

        candidates.push(MatchCandidate {
            index: idx,
            match_score: raw.match_score.map(|s| s.clamp(0.0, 1.0)),
            shared_interests: raw.shared_interests,
            icebreaker_questions: raw.icebreaker_questions,
        });
        if candidates.len() == MAX_RANKED_CANDIDATES {
            break;
        }
    }

    Some(candidates)
}
