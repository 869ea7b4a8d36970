use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use super::*;
use crate::{
    engine::module::{AnimationContext, AnimationFactory, AnimationModule, FnFactory},
    foundation::error::CanvasFxResult,
    registry::{
        metadata::Difficulty,
        query::{SortBy, SortOrder},
    },
};

struct Blank;

impl AnimationModule for Blank {
    fn name(&self) -> &str {
        "blank"
    }
    fn init(&mut self, _ctx: &AnimationContext<'_>) {}
    fn update(&mut self, _ctx: &AnimationContext<'_>) -> CanvasFxResult<()> {
        Ok(())
    }
    fn render(&self, _ctx: &mut AnimationContext<'_>) -> CanvasFxResult<()> {
        Ok(())
    }
}

fn blank() -> Box<dyn AnimationModule> {
    Box::new(Blank)
}

fn factory() -> LoadedAnimation {
    Arc::new(FnFactory::new("blank", blank))
}

fn meta(id: &str, category: Category, difficulty: Difficulty, tags: &[&str]) -> AnimationMetadata {
    AnimationMetadata::new(id, &id.to_uppercase(), &format!("{id} effect"), category, difficulty)
        .with_tags(tags)
}

/// Loader that counts invocations, sleeps, then fails while `fail_first` attempts remain.
fn counting_loader(calls: Arc<AtomicUsize>, delay_ms: u64, fail_first: usize) -> AnimationLoader {
    AnimationLoader::new(move || {
        let calls = Arc::clone(&calls);
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if n < fail_first {
                anyhow::bail!("attempt {n} failed");
            }
            Ok(factory())
        }
    })
}

fn sample() -> AnimationRegistry {
    let reg = AnimationRegistry::new();
    let ready = || AnimationLoader::ready(factory());
    reg.register(meta("waves", Category::Waves, Difficulty::Easy, &["calm"]), ready());
    reg.register(meta("sparks", Category::Particles, Difficulty::Hard, &["loud", "fast"]), ready());
    reg.register(meta("ripples", Category::Waves, Difficulty::Medium, &["Fast"]), ready());
    reg
}

#[test]
fn metadata_queries_keep_registration_order() {
    let reg = sample();
    let ids = |v: Vec<AnimationMetadata>| v.into_iter().map(|m| m.id).collect::<Vec<_>>();

    assert_eq!(ids(reg.get_all()), ["waves", "sparks", "ripples"]);
    assert_eq!(ids(reg.get_by_category(Category::Waves)), ["waves", "ripples"]);
    assert_eq!(ids(reg.get_by_tags(&["fast"])), ["sparks", "ripples"]);
    assert_eq!(ids(reg.search("RIPP")), ["ripples"]);
    assert_eq!(ids(reg.search("effect")).len(), 3);
    assert_eq!(ids(reg.search("   ")).len(), 3);
    assert_eq!(
        ids(reg.filter(&FilterCriteria {
            category: Some(Category::Waves),
            tags: vec!["fast".into(), "calm".into()],
            difficulty: Some(Difficulty::Medium),
            search: None,
        })),
        ["ripples"]
    );
    let sorted = reg.sort(
        reg.get_all(),
        SortOptions::new(SortBy::Difficulty, SortOrder::Desc),
    );
    assert_eq!(ids(sorted), ["sparks", "ripples", "waves"]);

    assert!(reg.has("waves") && !reg.has("nope"));
    assert_eq!(reg.count(), 3);
    assert_eq!(reg.category_counts().get(&Category::Waves), Some(&2));
    assert_eq!(reg.category_counts().get(&Category::Text), None);
    assert_eq!(reg.get_metadata("sparks").map(|m| m.difficulty), Some(Difficulty::Hard));
    assert_eq!(reg.cached_count(), 0, "queries never load");
}

#[test]
fn register_overwrites_last_writer_wins() {
    let reg = sample();
    reg.register(
        meta("waves", Category::Glitch, Difficulty::Hard, &[]),
        AnimationLoader::ready(factory()),
    );
    assert_eq!(reg.count(), 3);
    assert_eq!(
        reg.get_metadata("waves").map(|m| m.category),
        Some(Category::Glitch)
    );
}

#[tokio::test]
async fn concurrent_requests_share_one_load() {
    let reg = Arc::new(AnimationRegistry::new());
    let calls = Arc::new(AtomicUsize::new(0));
    reg.register(
        meta("slow", Category::Text, Difficulty::Easy, &[]),
        counting_loader(Arc::clone(&calls), 20, 0),
    );

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let reg = Arc::clone(&reg);
            tokio::spawn(async move { reg.get_by_id("slow").await })
        })
        .collect();
    let mut results = Vec::new();
    for t in tasks {
        results.push(t.await.unwrap().expect("load succeeds"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    assert!(!reg.is_loading("slow"));

    let again = reg.get_by_id("slow").await.unwrap();
    assert!(Arc::ptr_eq(&again, &results[0]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_load_is_not_cached() {
    let reg = AnimationRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    reg.register(
        meta("flaky", Category::Glitch, Difficulty::Easy, &[]),
        counting_loader(Arc::clone(&calls), 0, 1),
    );

    assert!(reg.get_by_id("flaky").await.is_none());
    assert!(!reg.is_loading("flaky"));
    assert_eq!(reg.cached_count(), 0);

    assert!(reg.get_by_id("flaky").await.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_waiters_observe_the_same_failure() {
    let reg = AnimationRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    reg.register(
        meta("broken", Category::Glitch, Difficulty::Easy, &[]),
        counting_loader(Arc::clone(&calls), 10, usize::MAX),
    );
    let (a, b, c) = tokio::join!(
        reg.get_by_id("broken"),
        reg.get_by_id("broken"),
        reg.get_by_id("broken")
    );
    assert!(a.is_none() && b.is_none() && c.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_id_resolves_to_none() {
    assert!(sample().get_by_id("missing").await.is_none());
}

#[tokio::test]
async fn clear_cache_forces_reload() {
    let reg = AnimationRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    reg.register(
        meta("x", Category::Text, Difficulty::Easy, &[]),
        counting_loader(Arc::clone(&calls), 0, 0),
    );
    let first = reg.get_by_id("x").await.unwrap();
    reg.clear_cache();
    assert_eq!(reg.cached_count(), 0);
    let second = reg.get_by_id("x").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn load_finishing_after_clear_is_delivered_but_not_cached() {
    let reg = Arc::new(AnimationRegistry::new());
    let calls = Arc::new(AtomicUsize::new(0));
    reg.register(
        meta("x", Category::Text, Difficulty::Easy, &[]),
        counting_loader(Arc::clone(&calls), 30, 0),
    );

    let pending = {
        let reg = Arc::clone(&reg);
        tokio::spawn(async move { reg.get_by_id("x").await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert!(reg.is_loading("x"));
    reg.clear_cache();
    assert!(!reg.is_loading("x"));

    assert!(pending.await.unwrap().is_some());
    assert_eq!(reg.cached_count(), 0);
}

#[tokio::test]
async fn dropped_leader_releases_the_in_flight_marker() {
    let reg = AnimationRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    reg.register(
        meta("slow", Category::Text, Difficulty::Easy, &[]),
        counting_loader(Arc::clone(&calls), 50, 0),
    );

    let timed_out = tokio::time::timeout(Duration::from_millis(5), reg.get_by_id("slow")).await;
    assert!(timed_out.is_err());
    assert!(!reg.is_loading("slow"));

    assert!(reg.get_by_id("slow").await.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn preload_category_warms_the_cache() {
    let reg = Arc::new(sample());
    let handles = reg.preload_category(Category::Waves);
    assert_eq!(handles.len(), 2);
    for h in handles {
        assert!(h.await.unwrap().is_some());
    }
    assert_eq!(reg.cached_count(), 2);
}

#[test]
fn preload_outside_runtime_spawns_nothing() {
    let reg = Arc::new(sample());
    assert!(reg.preload_category(Category::Waves).is_empty());
}

#[tokio::test]
async fn overwrite_during_load_uses_the_new_loader_next_time() {
    let reg = Arc::new(AnimationRegistry::new());
    let gate = Arc::new(tokio::sync::Notify::new());
    let old_calls = Arc::new(AtomicUsize::new(0));
    let old_loader = {
        let gate = Arc::clone(&gate);
        let calls = Arc::clone(&old_calls);
        AnimationLoader::new(move || {
            let gate = Arc::clone(&gate);
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok(Arc::new(FnFactory::new("old", blank)) as LoadedAnimation)
            }
        })
    };
    reg.register(meta("x", Category::Text, Difficulty::Easy, &[]), old_loader);

    let pending = {
        let reg = Arc::clone(&reg);
        tokio::spawn(async move { reg.get_by_id("x").await })
    };
    while !reg.is_loading("x") {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let new_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&new_calls);
    reg.register(
        meta("x", Category::Text, Difficulty::Easy, &[]),
        AnimationLoader::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Arc::new(FnFactory::new("new", blank)) as LoadedAnimation) }
        }),
    );
    assert!(!reg.is_loading("x"));

    gate.notify_one();
    let stale = pending.await.unwrap().expect("old load still resolves for its caller");
    assert_eq!(stale.name(), "old");
    assert_eq!(reg.cached_count(), 0);

    let fresh = reg.get_by_id("x").await.unwrap();
    assert_eq!(fresh.name(), "new");
    let again = reg.get_by_id("x").await.unwrap();
    assert!(Arc::ptr_eq(&fresh, &again));
    assert_eq!(old_calls.load(Ordering::SeqCst), 1);
    assert_eq!(new_calls.load(Ordering::SeqCst), 1);
}
