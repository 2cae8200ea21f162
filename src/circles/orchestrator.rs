//! Clustering orchestration.
//!
//! Builds the classification request, invokes the external call, validates
//! the response, and assembles the final [`CirclesResult`]. Every failure
//! path resolves to the All-circle-only fallback; callers never see an
//! error from this component.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::classify::{ClassifierDriver, ClassifyRequest, RosterEntry};
use crate::domain::circles::{Circle, CirclesResult, MIN_COMMUNITY_SIZE};
use crate::domain::member::MemberProfile;
use crate::extract;

use super::parse::parse_circles;
use super::prompt::{CLUSTERING_SYSTEM, clustering_prompt};

/// Response budget for a clustering call.
const CLUSTERING_MAX_TOKENS: u32 = 2048;

/// Orchestrates one clustering pass over a community roster.
#[derive(Clone)]
pub struct ClusterOrchestrator {
    driver: Arc<dyn ClassifierDriver>,
    ttl: Duration,
}

impl std::fmt::Debug for ClusterOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterOrchestrator")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl ClusterOrchestrator {
    #[must_use]
    pub fn new(driver: Arc<dyn ClassifierDriver>, ttl: Duration) -> Self {
        Self { driver, ttl }
    }

    /// Group a roster into interest circles.
    ///
    /// The All-circle is always present and always first. Rosters below
    /// [`MIN_COMMUNITY_SIZE`] skip the external call entirely.
    pub async fn generate(&self, members: &[MemberProfile]) -> CirclesResult {
        let request_id = Uuid::new_v4().to_string();
        let generated_at = Utc::now();

        if members.len() < MIN_COMMUNITY_SIZE {
            tracing::info!(
                request_id = %request_id,
                member_count = members.len(),
                "Roster below community floor, returning All-circle only"
            );
            return self.all_only(members, generated_at);
        }

        let roster: Vec<RosterEntry> = members
            .iter()
            .enumerate()
            .map(|(i, m)| RosterEntry {
                index: i + 1,
                name: m.display_name(),
                text: extract::profile_text(m.raw_answers.as_ref()),
            })
            .collect();

        let req = ClassifyRequest {
            system: Some(CLUSTERING_SYSTEM.to_string()),
            prompt: clustering_prompt(&roster),
            max_tokens: CLUSTERING_MAX_TOKENS,
        };

        tracing::info!(
            request_id = %request_id,
            member_count = members.len(),
            "Requesting circle classification"
        );

        let raw = match self.driver.complete(req).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    error = %e,
                    "Classification call failed, falling back to All-circle"
                );
                return self.all_only(members, generated_at);
            }
        };

        let Some(circles) = parse_circles(&raw, members) else {
            tracing::warn!(
                request_id = %request_id,
                response_length = raw.len(),
                "Classifier response unusable, falling back to All-circle"
            );
            return self.all_only(members, generated_at);
        };

        tracing::info!(
            request_id = %request_id,
            circle_count = circles.len(),
            "Circle classification validated"
        );

        let mut all = Vec::with_capacity(circles.len() + 1);
        all.push(Circle::all(members));
        all.extend(circles);

        CirclesResult {
            circles: all,
            generated_at,
            expires_at: generated_at + self.ttl,
        }
    }

    fn all_only(
        &self,
        members: &[MemberProfile],
        generated_at: chrono::DateTime<Utc>,
    ) -> CirclesResult {
        CirclesResult {
            circles: vec![Circle::all(members)],
            generated_at,
            expires_at: generated_at + self.ttl,
        }
    }
}
