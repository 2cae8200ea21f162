//! Icebreaker match orchestration.
//!
//! Stateless and reentrant: every call builds its own candidate pool,
//! precomputes a safe fallback, then tries the classifier. The only
//! caller-visible "failure" is `None` when there is nobody to match with.

use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

use crate::classify::{ClassifierDriver, ClassifyRequest, RosterEntry};
use crate::domain::matching::{IcebreakerMatch, MatchCandidate};
use crate::domain::member::MemberProfile;
use crate::extract;

use super::parse::parse_candidates;
use super::prompt::{MATCHING_SYSTEM, matching_prompt};

/// Response budget for a matching call.
const MATCHING_MAX_TOKENS: u32 = 1024;

/// Score attached to fallback matches.
const FALLBACK_SCORE: f64 = 0.5;

/// Default weight for candidates the classifier scored without a number.
const DEFAULT_WEIGHT: f64 = 0.5;

/// Conversation starters used when no personalized questions are available.
const GENERIC_QUESTIONS: [&str; 3] = [
    "What's something you've been excited about lately?",
    "How did you first get involved with this community?",
    "What's one thing you'd love to learn this year?",
];

/// Orchestrates one icebreaker recommendation.
#[derive(Clone)]
pub struct MatchOrchestrator {
    driver: Arc<dyn ClassifierDriver>,
}

impl std::fmt::Debug for MatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchOrchestrator").finish()
    }
}

impl MatchOrchestrator {
    #[must_use]
    pub fn new(driver: Arc<dyn ClassifierDriver>) -> Self {
        Self { driver }
    }

    /// Recommend one introduction for `user_id` from `pool`.
    ///
    /// `exclude_ids` is a soft preference for variety: if it empties the
    /// pool, the unfiltered pool is used instead. Returns `None` only when
    /// the pool contains nobody but the user.
    pub async fn find_match(
        &self,
        user_id: &str,
        user_profile: &MemberProfile,
        pool: &[MemberProfile],
        exclude_ids: &[String],
    ) -> Option<IcebreakerMatch> {
        let request_id = Uuid::new_v4().to_string();

        let everyone: Vec<&MemberProfile> = pool.iter().filter(|m| m.id != user_id).collect();
        if everyone.is_empty() {
            tracing::info!(request_id = %request_id, user_id = %user_id, "No candidates to match with");
            return None;
        }

        let filtered: Vec<&MemberProfile> = everyone
            .iter()
            .copied()
            .filter(|m| !exclude_ids.contains(&m.id))
            .collect();
        let candidates = if filtered.is_empty() {
            tracing::debug!(
                request_id = %request_id,
                excluded = exclude_ids.len(),
                "Exclusion emptied the pool, using unfiltered candidates"
            );
            everyone
        } else {
            filtered
        };

        // A safe value to return on any downstream failure.
        let fallback = make_fallback(&candidates, &mut rand::rng());

        let roster: Vec<RosterEntry> = candidates
            .iter()
            .enumerate()
            .map(|(i, m)| RosterEntry {
                index: i + 1,
                name: m.display_name(),
                text: extract::profile_text(m.raw_answers.as_ref()),
            })
            .collect();

        let req = ClassifyRequest {
            system: Some(MATCHING_SYSTEM.to_string()),
            prompt: matching_prompt(
                &user_profile.display_name(),
                &extract::profile_text(user_profile.raw_answers.as_ref()),
                &roster,
            ),
            max_tokens: MATCHING_MAX_TOKENS,
        };

        tracing::info!(
            request_id = %request_id,
            user_id = %user_id,
            candidate_count = candidates.len(),
            "Requesting match ranking"
        );

        let raw = match self.driver.complete(req).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Matching call failed, using fallback");
                return Some(fallback);
            }
        };

        let ranked = match parse_candidates(&raw, candidates.len()) {
            Some(ranked) if !ranked.is_empty() => ranked,
            _ => {
                tracing::warn!(
                    request_id = %request_id,
                    response_length = raw.len(),
                    "No valid candidates in classifier response, using fallback"
                );
                return Some(fallback);
            }
        };

        let selected = select_weighted(&ranked, &mut rand::rng());
        let member = candidates[selected.index - 1];

        tracing::info!(
            request_id = %request_id,
            ranked = ranked.len(),
            selected_score = ?selected.match_score,
            "Match selected"
        );

        Some(resolve_match(member, selected))
    }
}

/// Uniformly pick a fallback match from a non-empty candidate pool.
fn make_fallback(candidates: &[&MemberProfile], rng: &mut impl Rng) -> IcebreakerMatch {
    let member = candidates[rng.random_range(0..candidates.len())];
    IcebreakerMatch {
        user_id: member.id.clone(),
        first_name: member.first_name.clone(),
        last_name: member.last_name.clone(),
        profile_summary: summary_of(member),
        match_score: FALLBACK_SCORE,
        shared_interests: Vec::new(),
        icebreaker_questions: GENERIC_QUESTIONS.iter().map(ToString::to_string).collect(),
    }
}

/// Score-proportional weighted random selection.
///
/// Each candidate's score (default [`DEFAULT_WEIGHT`]) is an unnormalized
/// weight, so P(candidate i) = w_i / total. Higher-scored candidates are more
/// likely but never guaranteed. The caller guarantees `ranked` is non-empty.
fn select_weighted<'a>(ranked: &'a [MatchCandidate], rng: &mut impl Rng) -> &'a MatchCandidate {
    let total: f64 = ranked.iter().map(weight_of).sum();
    let mut draw = rng.random::<f64>() * total;
    for candidate in ranked {
        draw -= weight_of(candidate);
        if draw <= 0.0 {
            return candidate;
        }
    }
    // Floating-point residue: the walk can overshoot by a rounding error.
    &ranked[ranked.len() - 1]
}

fn weight_of(candidate: &MatchCandidate) -> f64 {
    candidate.match_score.unwrap_or(DEFAULT_WEIGHT)
}

/// Resolve a validated candidate to its real member.
fn resolve_match(member: &MemberProfile, candidate: &MatchCandidate) -> IcebreakerMatch {
    let icebreaker_questions = if candidate.icebreaker_questions.is_empty() {
        GENERIC_QUESTIONS.iter().map(ToString::to_string).collect()
    } else {
        candidate.icebreaker_questions.clone()
    };

    IcebreakerMatch {
        user_id: member.id.clone(),
        first_name: member.first_name.clone(),
        last_name: member.last_name.clone(),
        profile_summary: summary_of(member),
        match_score: candidate.match_score.unwrap_or(DEFAULT_WEIGHT),
        shared_interests: candidate.shared_interests.clone(),
        icebreaker_questions,
    }
}

/// Short profile summary: the member's own summary when present, otherwise
/// the head of their extracted answer text.
fn summary_of(member: &MemberProfile) -> String {
    if let Some(summary) = member.summary_text.as_deref() {
        let summary = summary.trim();
        if !summary.is_empty() {
            return summary.to_string();
        }
    }
    let text = extract::profile_text(member.raw_answers.as_ref());
    truncate_chars(&text, 200)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
