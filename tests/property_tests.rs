//! Property-based tests for levels, chains, filtering and hooks

use logging_facility::handlers::MemoryHandler;
use logging_facility::hooks::{DsnHook, KeyHook};
use logging_facility::{
    FieldValue, Fields, FixedClock, HookRegistry, Level, Logger, LoggerError, SanitizeHook,
};
use proptest::prelude::*;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = Level> {
    prop::sample::select(Level::ALL.to_vec())
}

fn memory_logger(threshold: Level) -> (Logger, Arc<MemoryHandler>) {
    let memory = Arc::new(MemoryHandler::new());
    let logger = Logger::builder()
        .level(threshold)
        .handler(Arc::clone(&memory))
        .clock(FixedClock::epoch())
        .hooks(Arc::new(HookRegistry::new()))
        .build();
    (logger, memory)
}

// ============================================================================
// Level
// ============================================================================

proptest! {
    #[test]
    fn test_level_name_roundtrip(level in any_level()) {
        prop_assert_eq!(Level::parse(level.as_str()).unwrap(), level);
        prop_assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
    }

    #[test]
    fn test_level_parse_case_insensitive(level in any_level(), upper in any::<bool>()) {
        let name = if upper {
            level.as_str().to_uppercase()
        } else {
            level.as_str().to_string()
        };
        prop_assert_eq!(Level::parse(&name).unwrap(), level);
    }

    #[test]
    fn test_level_json_roundtrip(level in any_level()) {
        let json = serde_json::to_string(&level).unwrap();
        prop_assert_eq!(json.clone(), format!("\"{}\"", level.as_str()));
        let back: Level = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, level);
    }

    #[test]
    fn test_unknown_level_name_rejected(name in "[a-z]{1,12}") {
        prop_assume!(Level::ALL.iter().all(|l| l.as_str() != name));
        let is_invalid_level = matches!(Level::parse(&name), Err(LoggerError::InvalidLevel { .. }));
        prop_assert!(is_invalid_level);
    }

    #[test]
    fn test_level_ordering_follows_codes(a in any_level(), b in any_level()) {
        if a.as_i32() < b.as_i32() {
            prop_assert!(a < b);
        }
        prop_assert_eq!(a.enables(b), a.as_i32() >= b.as_i32());
    }
}

// ============================================================================
// Chains
// ============================================================================

proptest! {
    #[test]
    fn test_with_field_is_included_and_persistent(
        key in "[a-z_]{1,10}",
        value in ".*",
        level in any_level(),
    ) {
        let (logger, memory) = memory_logger(Level::Debug);
        let root = logger.with_field("base", 1);
        let child = root.with_field(key.clone(), value.clone());

        child.log(level, "child");
        root.log(level, "root");

        let records = memory.records();
        prop_assert_eq!(records.len(), 2);
        prop_assert_eq!(records[0].fields.get(&key).and_then(FieldValue::as_str), Some(value.as_str()));
        if key != "base" {
            prop_assert!(!records[1].fields.contains_key(&key));
        }
        prop_assert_eq!(records[1].fields.len(), 1);
    }

    #[test]
    fn test_last_write_wins(values in prop::collection::vec(any::<i64>(), 1..20)) {
        let (logger, memory) = memory_logger(Level::Debug);

        let mut entry = logger.entry();
        for value in &values {
            entry = entry.with_field("key", *value);
        }
        entry.info("x");

        let record = &memory.records()[0];
        prop_assert_eq!(record.fields.len(), 1);
        prop_assert_eq!(record.fields.get("key"), Some(&FieldValue::Int(*values.last().unwrap())));
    }

    #[test]
    fn test_merge_overlays_addition(
        left in prop::collection::btree_map("[a-e]", any::<i64>(), 0..5),
        right in prop::collection::btree_map("[a-e]", any::<i64>(), 0..5),
    ) {
        let a: Fields = left.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let b: Fields = right.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let merged = a.merge(&b);

        for (key, value) in &left {
            let expected = right.get(key).unwrap_or(value);
            prop_assert_eq!(merged.get(key), Some(&FieldValue::Int(*expected)));
        }
        for (key, value) in &right {
            prop_assert_eq!(merged.get(key), Some(&FieldValue::Int(*value)));
        }
        // Inputs untouched
        prop_assert_eq!(a.len(), left.len());
        prop_assert_eq!(b.len(), right.len());
    }
}

// ============================================================================
// Filtering
// ============================================================================

proptest! {
    #[test]
    fn test_records_below_threshold_never_reach_handler(
        threshold in any_level(),
        levels in prop::collection::vec(any_level(), 0..30),
    ) {
        let (logger, memory) = memory_logger(threshold);

        for level in &levels {
            logger.entry().log(*level, "x");
        }

        let expected = levels.iter().filter(|l| l.enables(threshold)).count();
        prop_assert_eq!(memory.len(), expected);
        prop_assert!(memory.records().iter().all(|r| r.level.enables(threshold)));
        prop_assert_eq!(logger.metrics().filtered_count() as usize, levels.len() - expected);
    }
}

// ============================================================================
// Sanitize hooks
// ============================================================================

proptest! {
    #[test]
    fn test_dsn_hook_idempotent(
        user in "[a-z]{1,8}",
        password in "[A-Za-z0-9]{1,12}",
        host in "[a-z]{1,8}",
    ) {
        let hook = DsnHook;
        let dsn = format!("postgres://{}:{}@{}/db", user, password, host);

        let once = hook.sanitize(FieldValue::from(dsn));
        let twice = hook.sanitize(once.clone());

        prop_assert_eq!(&once, &twice);
        let masked = format!("postgres://{}:***@{}/db", user, host);
        prop_assert_eq!(once.as_str(), Some(masked.as_str()));
    }

    #[test]
    fn test_key_hook_idempotent(value in ".*") {
        let hook = KeyHook::new(["secret"]);
        let once = hook.sanitize(FieldValue::from(value));
        prop_assert_eq!(hook.sanitize(once.clone()), once);
    }

    #[test]
    fn test_hooks_never_remove_keys(keys in prop::collection::btree_set("[a-z]{1,6}", 0..10)) {
        let hooks = Arc::new(HookRegistry::new());
        hooks.register(KeyHook::new(keys.iter().take(3)));
        let memory = Arc::new(MemoryHandler::new());
        let logger = Logger::builder()
            .handler(Arc::clone(&memory))
            .hooks(hooks)
            .build();

        let fields: Fields = keys.iter().map(|k| (k.clone(), "v")).collect();
        logger.with_fields(fields).info("x");

        let record = &memory.records()[0];
        prop_assert_eq!(record.fields.len(), keys.len());
    }
}
