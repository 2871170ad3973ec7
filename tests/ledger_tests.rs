//! Integration tests for the score ledger.

use proptest::prelude::*;
use tilematch::{ConfigKey, ScoreLedger, MAX_ENTRIES};

fn key(width: u32, height: u32, group_size: u32) -> ConfigKey {
    ConfigKey {
        width,
        height,
        group_size,
    }
}

#[test]
fn fastest_times_rank_first() {
    let mut ledger = ScoreLedger::new();
    ledger.record(key(3, 3, 3), "carol", 55.2);
    ledger.record(key(3, 3, 3), "ada", 12.9);
    ledger.record(key(3, 3, 3), "bob", 31.0);

    let names: Vec<_> = ledger
        .query(key(3, 3, 3))
        .iter()
        .map(|e| e.player_name.as_str())
        .collect();
    assert_eq!(names, vec!["ada", "bob", "carol"]);
}

#[test]
fn eleventh_entry_pushes_out_the_slowest() {
    let mut ledger = ScoreLedger::new();
    for i in 0..MAX_ENTRIES {
        ledger.record(key(3, 3, 3), format!("p{i}"), 10.0 + i as f64);
    }
    // Slower than everyone: never appears.
    ledger.record(key(3, 3, 3), "too-slow", 500.0);
    assert!(ledger
        .query(key(3, 3, 3))
        .iter()
        .all(|e| e.player_name != "too-slow"));

    // Faster than everyone: takes first place, drops the previous slowest.
    ledger.record(key(3, 3, 3), "record-holder", 1.0);
    let entries = ledger.query(key(3, 3, 3));
    assert_eq!(entries.len(), MAX_ENTRIES);
    assert_eq!(entries[0].player_name, "record-holder");
    assert!(entries.iter().all(|e| e.player_name != "p9"));
}

#[test]
fn list_configs_only_names_non_empty_history() {
    let mut ledger = ScoreLedger::new();
    assert_eq!(ledger.list_configs().count(), 0);

    ledger.record(key(3, 3, 3), "ada", 20.0);
    ledger.record(key(4, 4, 2), "bob", 40.0);

    let mut configs: Vec<_> = ledger.list_configs().collect();
    configs.sort();
    assert_eq!(configs, vec![key(3, 3, 3), key(4, 4, 2)]);
}

proptest! {
    #[test]
    fn ledger_is_always_sorted_and_bounded(
        times in proptest::collection::vec(0.0f64..100_000.0, 0..40),
    ) {
        let mut ledger = ScoreLedger::new();
        for (i, elapsed) in times.iter().enumerate() {
            ledger.record(key(3, 3, 3), format!("p{i}"), *elapsed);

            let entries = ledger.query(key(3, 3, 3));
            prop_assert!(entries.len() <= MAX_ENTRIES);
            prop_assert!(entries
                .windows(2)
                .all(|w| w[0].elapsed_seconds <= w[1].elapsed_seconds));
        }
    }
}
