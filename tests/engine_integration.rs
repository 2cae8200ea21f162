//! Black-box tests driving the engine through its facade with scripted
//! classifier drivers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use serde_json::json;

use circle_engine::Engine;
use circle_engine::classify::{ClassifierDriver, ClassifyError, ClassifyRequest};
use circle_engine::config::EngineConfig;
use circle_engine::domain::circles::ALL_CIRCLE_ID;
use circle_engine::domain::member::MemberProfile;

/// What a scripted driver should do on every call.
enum Script {
    Respond(String),
    Fail,
}

/// Classifier stand-in that counts invocations and replays a script.
struct ScriptedClassifier {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    fn respond(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Respond(text.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            script: Script::Fail,
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassifierDriver for ScriptedClassifier {
    async fn complete(&self, _req: ClassifyRequest) -> Result<String, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Respond(text) => Ok(text.clone()),
            Script::Fail => Err(ClassifyError::EmptyResponse),
        }
    }
}

fn member(id: &str, name: &str, answer: &str) -> MemberProfile {
    MemberProfile {
        id: id.to_string(),
        first_name: Some(name.to_string()),
        last_name: None,
        raw_answers: Some(json!([{"question": "Interests?", "transcript": answer}])),
        summary_text: None,
    }
}

fn roster(n: usize) -> Vec<MemberProfile> {
    (0..n)
        .map(|i| member(&format!("u{i}"), &format!("Member{i}"), "hiking every weekend"))
        .collect()
}

fn circles_response() -> String {
    json!({
        "circles": [{
            "id": "hikers",
            "name": "Weekend Hikers",
            "shortName": "Hikers",
            "members": [
                {"memberId": 1, "tagline": "hikes weekly"},
                {"memberId": 2, "tagline": "hikes weekly"},
                {"memberId": 3, "tagline": "hikes weekly"},
            ],
        }],
    })
    .to_string()
}

fn candidates_response() -> String {
    json!({
        "candidates": [{
            "memberId": 1,
            "matchScore": 0.8,
            "sharedInterests": ["hiking"],
            "icebreakerQuestions": ["q1", "q2", "q3"],
        }],
    })
    .to_string()
}

// --- Clustering -------------------------------------------------------------

#[tokio::test]
async fn small_community_skips_classification() {
    let driver = ScriptedClassifier::respond(circles_response());
    let engine = Engine::with_driver(driver.clone(), EngineConfig::default());
    let members = roster(4);

    let result = engine.circles("c1", &members, false).await;

    assert_eq!(result.circles.len(), 1);
    assert_eq!(result.circles[0].id, ALL_CIRCLE_ID);
    assert_eq!(result.circles[0].members.len(), 4);
    assert_eq!(driver.call_count(), 0, "no external call below the community floor");
}

#[tokio::test]
async fn all_circle_is_always_first() {
    let driver = ScriptedClassifier::respond(circles_response());
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let members = roster(6);

    let result = engine.circles("c1", &members, false).await;

    assert_eq!(result.circles[0].id, ALL_CIRCLE_ID);
    assert_eq!(result.circles[0].members.len(), 6);
    assert_eq!(result.circles.len(), 2);
    assert_eq!(result.circles[1].id, "hikers");
}

#[tokio::test]
async fn cache_serves_within_ttl_and_honors_refresh_and_invalidate() {
    let driver = ScriptedClassifier::respond(circles_response());
    let engine = Engine::with_driver(driver.clone(), EngineConfig::default());
    let members = roster(6);

    let first = engine.circles("c1", &members, false).await;
    let second = engine.circles("c1", &members, false).await;
    assert_eq!(driver.call_count(), 1, "second call must be a cache hit");
    assert_eq!(first.generated_at, second.generated_at);
    assert_eq!(first.expires_at, first.generated_at + Duration::hours(72));

    engine.circles("c1", &members, true).await;
    assert_eq!(driver.call_count(), 2, "force refresh must regenerate");

    engine.invalidate("c1");
    engine.circles("c1", &members, false).await;
    assert_eq!(driver.call_count(), 3, "invalidate must force regeneration");
}

#[tokio::test]
async fn cache_entries_are_per_community() {
    let driver = ScriptedClassifier::respond(circles_response());
    let engine = Engine::with_driver(driver.clone(), EngineConfig::default());
    let members = roster(6);

    engine.circles("c1", &members, false).await;
    engine.circles("c2", &members, false).await;
    assert_eq!(driver.call_count(), 2);
}

#[tokio::test]
async fn expired_entries_regenerate() {
    let driver = ScriptedClassifier::respond(circles_response());
    let config = EngineConfig {
        cache_ttl: Duration::zero(),
    };
    let engine = Engine::with_driver(driver.clone(), config);
    let members = roster(6);

    engine.circles("c1", &members, false).await;
    engine.circles("c1", &members, false).await;
    assert_eq!(driver.call_count(), 2, "zero TTL entries expire immediately");
}

#[tokio::test]
async fn clustering_falls_back_when_driver_fails() {
    let driver = ScriptedClassifier::failing();
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let members = roster(6);

    let result = engine.circles("c1", &members, false).await;

    assert_eq!(result.circles.len(), 1);
    assert_eq!(result.circles[0].id, ALL_CIRCLE_ID);
    assert_eq!(result.circles[0].members.len(), 6);
}

#[tokio::test]
async fn clustering_falls_back_on_unparsable_text() {
    let driver = ScriptedClassifier::respond("I could not find any meaningful groups, sorry!");
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let members = roster(6);

    let result = engine.circles("c1", &members, false).await;

    assert_eq!(result.circles.len(), 1);
    assert_eq!(result.circles[0].id, ALL_CIRCLE_ID);
}

#[tokio::test]
async fn adversarial_references_never_reach_the_output() {
    let response = json!({
        "circles": [
            {
                "name": "Phantom Circle",
                "shortName": "Phantoms",
                // Only two distinct real members survive validation.
                "members": [
                    {"memberId": 0}, {"memberId": 99}, {"memberId": "seven"},
                    {"memberId": 2}, {"memberId": 2}, {"memberId": 3},
                ],
            },
            {
                "name": "Real Circle",
                "shortName": "Reals",
                "members": [
                    {"memberId": 1}, {"memberId": 4}, {"memberId": 5}, {"memberId": -2},
                ],
            },
        ],
    })
    .to_string();

    let driver = ScriptedClassifier::respond(response);
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let members = roster(6);

    let result = engine.circles("c1", &members, false).await;

    // Under-populated "Phantom Circle" is gone; "Real Circle" survives with
    // exactly its three resolvable members.
    assert_eq!(result.circles.len(), 2);
    let real = &result.circles[1];
    assert_eq!(real.name, "Real Circle");
    assert_eq!(real.members.len(), 3);
    let known: Vec<String> = members.iter().map(|m| m.id.clone()).collect();
    for circle in &result.circles {
        for m in &circle.members {
            assert!(known.contains(&m.user_id), "fabricated member {}", m.user_id);
        }
    }
}

// --- Matching ---------------------------------------------------------------

#[tokio::test]
async fn find_match_returns_none_for_empty_pool() {
    let driver = ScriptedClassifier::respond(candidates_response());
    let engine = Engine::with_driver(driver.clone(), EngineConfig::default());
    let user = member("u0", "Solo", "chess");

    let result = engine.find_match("u0", &user, &[user.clone()], &[]).await;

    assert!(result.is_none());
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn find_match_resolves_ranked_candidate() {
    let driver = ScriptedClassifier::respond(candidates_response());
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let pool = roster(4);
    let user = pool[0].clone();

    let result = engine
        .find_match(&user.id, &user, &pool, &[])
        .await
        .expect("non-empty pool always matches");

    // Candidate index 1 is the first non-self pool member.
    assert_eq!(result.user_id, "u1");
    assert!((result.match_score - 0.8).abs() < 1e-9);
    assert_eq!(result.shared_interests, vec!["hiking".to_string()]);
    assert_eq!(result.icebreaker_questions.len(), 3);
}

#[tokio::test]
async fn find_match_falls_back_when_driver_fails() {
    let driver = ScriptedClassifier::failing();
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let pool = roster(5);
    let user = pool[0].clone();

    let result = engine
        .find_match(&user.id, &user, &pool, &[])
        .await
        .expect("fallback must produce a match");

    assert_ne!(result.user_id, user.id);
    assert!((result.match_score - 0.5).abs() < 1e-9);
    assert_eq!(result.icebreaker_questions.len(), 3);
    assert!(result.shared_interests.is_empty());
}

#[tokio::test]
async fn find_match_falls_back_on_garbage_response() {
    let driver = ScriptedClassifier::respond("```\nnot json\n```");
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let pool = roster(5);
    let user = pool[0].clone();

    let result = engine.find_match(&user.id, &user, &pool, &[]).await;

    assert!(result.is_some());
}

#[tokio::test]
async fn exclusion_covering_whole_pool_falls_back_to_everyone() {
    let driver = ScriptedClassifier::respond(candidates_response());
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let pool = roster(6);
    let user = pool[0].clone();
    let exclude: Vec<String> = pool.iter().skip(1).map(|m| m.id.clone()).collect();
    assert_eq!(exclude.len(), 5);

    let result = engine
        .find_match(&user.id, &user, &pool, &exclude)
        .await
        .expect("exclusion is a soft preference, not a hard constraint");

    assert_ne!(result.user_id, user.id);
}

#[tokio::test]
async fn exclusion_narrows_the_candidate_pool() {
    let driver = ScriptedClassifier::respond(candidates_response());
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let pool = roster(4);
    let user = pool[0].clone();
    // Exclude u1 and u2: candidate index 1 must resolve to u3.
    let exclude = vec!["u1".to_string(), "u2".to_string()];

    let result = engine
        .find_match(&user.id, &user, &pool, &exclude)
        .await
        .expect("one candidate remains");

    assert_eq!(result.user_id, "u3");
}

#[tokio::test]
async fn adversarial_candidate_references_fall_back() {
    let response = json!({
        "candidates": [
            {"memberId": 0}, {"memberId": 42}, {"memberId": "none"},
        ],
    })
    .to_string();
    let driver = ScriptedClassifier::respond(response);
    let engine = Engine::with_driver(driver, EngineConfig::default());
    let pool = roster(4);
    let user = pool[0].clone();

    let result = engine
        .find_match(&user.id, &user, &pool, &[])
        .await
        .expect("invalid candidates degrade to the fallback");

    let pool_ids: Vec<&str> = pool.iter().skip(1).map(|m| m.id.as_str()).collect();
    assert!(pool_ids.contains(&result.user_id.as_str()));
    assert!((result.match_score - 0.5).abs() < 1e-9);
}
