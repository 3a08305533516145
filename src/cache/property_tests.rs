//! Property-Based Tests for the Render Cache
//!
//! Uses proptest to exercise the accounting and bounding invariants over
//! arbitrary operation sequences.

use proptest::prelude::*;

use crate::cache::RenderCache;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 50;
const TEST_DEFAULT_TTL: u64 = 300;
const TEST_MAX_MEMORY: usize = 4096;

// == Strategies ==
/// Keys drawn from a small pool so sequences revisit existing entries
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,4}".prop_map(|s| format!("/docs/{s}.md"))
}

fn content_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9<>/ ]{0,256}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, content: String, mtime: f64 },
    Get { key: String, mtime: Option<f64> },
    Invalidate { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), content_strategy(), 0.0f64..1e9)
            .prop_map(|(key, content, mtime)| CacheOp::Set { key, content, mtime }),
        4 => (key_strategy(), prop::option::of(0.0f64..1e9))
            .prop_map(|(key, mtime)| CacheOp::Get { key, mtime }),
        1 => key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
        1 => Just(CacheOp::Clear),
    ]
}

fn apply(cache: &mut RenderCache, op: CacheOp) {
    match op {
        CacheOp::Set { key, content, mtime } => cache.set(key, content, mtime, None),
        CacheOp::Get { key, mtime } => {
            let _ = cache.get(&key, mtime);
        }
        CacheOp::Invalidate { key } => {
            let _ = cache.invalidate(&key);
        }
        CacheOp::Clear => cache.clear(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // The byte counter exactly equals the recomputed sum of live entry
    // sizes after every operation, whatever the sequence.
    #[test]
    fn prop_memory_accounting_invariant(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut cache = RenderCache::new(TEST_MAX_ENTRIES, TEST_DEFAULT_TTL, TEST_MAX_MEMORY).unwrap();

        for op in ops {
            apply(&mut cache, op);
            prop_assert_eq!(
                cache.stats().memory_bytes,
                cache.recounted_memory_bytes(),
                "byte counter drifted from live entry sizes"
            );
        }
    }

    // Entry count never exceeds the cap after any set.
    #[test]
    fn prop_capacity_enforcement(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let max_entries = 8;
        let mut cache = RenderCache::new(max_entries, TEST_DEFAULT_TTL, TEST_MAX_MEMORY).unwrap();

        for op in ops {
            apply(&mut cache, op);
            prop_assert!(
                cache.len() <= max_entries,
                "cache size {} exceeds cap {}",
                cache.len(),
                max_entries
            );
        }
    }

    // The memory budget holds after every set, except for the one allowed
    // degenerate case: a single entry that is itself larger than the budget.
    #[test]
    fn prop_memory_budget_enforcement(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let max_memory = 512;
        let mut cache = RenderCache::new(TEST_MAX_ENTRIES, TEST_DEFAULT_TTL, max_memory).unwrap();

        for op in ops {
            apply(&mut cache, op);
            let stats = cache.stats();
            prop_assert!(
                stats.memory_bytes <= max_memory || stats.entries == 1,
                "memory {} over budget {} with {} entries",
                stats.memory_bytes,
                max_memory,
                stats.entries
            );
        }
    }

    // set followed by get with the same mtime returns exactly the stored
    // content.
    #[test]
    fn prop_roundtrip(key in key_strategy(), content in content_strategy(), mtime in 0.0f64..1e9) {
        let mut cache = RenderCache::new(TEST_MAX_ENTRIES, TEST_DEFAULT_TTL, usize::MAX / 2).unwrap();

        cache.set(key.clone(), content.clone(), mtime, None);

        prop_assert_eq!(cache.get(&key, Some(mtime)), Some(content));
    }

    // Re-setting a key replaces both the content and its byte accounting.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        content1 in content_strategy(),
        content2 in content_strategy()
    ) {
        let mut cache = RenderCache::new(TEST_MAX_ENTRIES, TEST_DEFAULT_TTL, usize::MAX / 2).unwrap();

        cache.set(key.clone(), content1, 0.0, None);
        cache.set(key.clone(), content2.clone(), 0.0, None);

        prop_assert_eq!(cache.len(), 1);
        prop_assert_eq!(cache.stats().memory_bytes, content2.len());
        prop_assert_eq!(cache.get(&key, None), Some(content2));
    }

    // A disabled cache accepts no writes and reports no entries.
    #[test]
    fn prop_disabled_set_is_noop(
        entries in prop::collection::vec((key_strategy(), content_strategy()), 1..20)
    ) {
        let mut cache = RenderCache::new(TEST_MAX_ENTRIES, TEST_DEFAULT_TTL, TEST_MAX_MEMORY).unwrap();
        cache.set_enabled(false);

        for (key, content) in entries {
            cache.set(key, content, 0.0, None);
        }

        prop_assert_eq!(cache.stats().entries, 0);
        prop_assert_eq!(cache.stats().memory_bytes, 0);
    }

    // Inserting distinct keys beyond capacity always evicts in insertion
    // order when nothing was promoted in between.
    #[test]
    fn prop_lru_eviction_order(extra in 1usize..10) {
        let capacity = 5;
        let mut cache = RenderCache::new(capacity, TEST_DEFAULT_TTL, usize::MAX / 2).unwrap();

        let total = capacity + extra;
        for i in 0..total {
            cache.set(format!("key{i}"), format!("value{i}"), 0.0, None);
        }

        prop_assert_eq!(cache.len(), capacity);
        for i in 0..extra {
            prop_assert_eq!(cache.get(&format!("key{i}"), None), None);
        }
        for i in extra..total {
            prop_assert_eq!(cache.get(&format!("key{i}"), None), Some(format!("value{i}")));
        }
    }
}
