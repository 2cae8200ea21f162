//! Community interest-circle formation and connection matching.
//!
//! Given a roster of community members and their free-text self
//! descriptions, this engine groups members into named, evidence-grounded
//! interest circles, caches the grouping per community, recommends pairwise
//! icebreaker introductions, and lays circles out as proportionally-scaled
//! bubbles on a fixed canvas.
//!
//! # Architecture
//!
//! - **Classify**: untrusted external text-classification call behind the
//!   [`classify::ClassifierDriver`] seam
//! - **Circles**: clustering orchestration, response validation, and the
//!   per-community TTL cache
//! - **Matching**: single-introduction ranking with weighted-random
//!   selection and a total fallback
//! - **Layout**: pure bubble geometry for packed and overlap-relaxed views
//!
//! Every caller-facing operation either succeeds with real data or succeeds
//! with documented fallback data; nothing here errors out to the caller.
//!
//! # Modules
//!
//! - [`classify`]: driver trait, chat-completions client, tolerant JSON lexing
//! - [`circles`]: clustering orchestrator, parser, cache manager
//! - [`matching`]: icebreaker match orchestrator and parser
//! - [`layout`]: bubble layout engine
//! - [`extract`]: profile text extraction

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::default_trait_access)]

pub mod circles;
pub mod classify;
pub mod config;
pub mod domain;
pub mod extract;
pub mod layout;
pub mod matching;
pub mod telemetry;

use std::sync::Arc;

use crate::circles::{CircleCache, ClusterOrchestrator};
use crate::classify::{ChatCompletionsClassifier, ClassifierDriver, ClassifierSettings};
use crate::config::EngineConfig;
use crate::domain::circles::CirclesResult;
use crate::domain::matching::IcebreakerMatch;
use crate::domain::member::MemberProfile;
use crate::matching::MatchOrchestrator;

/// The engine facade an embedding service holds behind one `Arc`.
///
/// Bundles the clustering cache and the matching orchestrator around a
/// shared classifier driver. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Engine {
    circles: CircleCache,
    matching: MatchOrchestrator,
}

impl Engine {
    /// Build an engine talking to a real classification endpoint.
    #[must_use]
    pub fn new(settings: ClassifierSettings, config: EngineConfig) -> Self {
        Self::with_driver(Arc::new(ChatCompletionsClassifier::new(settings)), config)
    }

    /// Build an engine around an arbitrary driver (used by tests).
    #[must_use]
    pub fn with_driver(driver: Arc<dyn ClassifierDriver>, config: EngineConfig) -> Self {
        let orchestrator = ClusterOrchestrator::new(Arc::clone(&driver), config.cache_ttl);
        Self {
            circles: CircleCache::new(orchestrator, config.cache_ttl),
            matching: MatchOrchestrator::new(driver),
        }
    }

    /// Cached interest circles for a community. See
    /// [`CircleCache::get_or_generate`].
    pub async fn circles(
        &self,
        community_id: &str,
        members: &[MemberProfile],
        force_refresh: bool,
    ) -> CirclesResult {
        self.circles
            .get_or_generate(community_id, members, force_refresh)
            .await
    }

    /// Drop a community's cached circles.
    pub fn invalidate(&self, community_id: &str) {
        self.circles.invalidate(community_id);
    }

    /// Recommend one introduction. See [`MatchOrchestrator::find_match`].
    pub async fn find_match(
        &self,
        user_id: &str,
        user_profile: &MemberProfile,
        pool: &[MemberProfile],
        exclude_ids: &[String],
    ) -> Option<IcebreakerMatch> {
        self.matching
            .find_match(user_id, user_profile, pool, exclude_ids)
            .await
    }
}
