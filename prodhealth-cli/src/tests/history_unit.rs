//! Tests for the `history` and `stats` commands.

use super::helpers::{CRACKERS, NOW, PEANUT_BAR, StubServices, salted_crackers};
use super::*;
use prodhealth_core::{HealthScore, HistoryStore, ScanEntry, UserId};
use rstest::{fixture, rstest};
use serde_json::json;
use time::Duration;

#[fixture]
fn services() -> StubServices {
    StubServices::with_sample_products()
}

/// Append a crackers scan for `user` directly, bypassing the clock.
fn seed_scan(services: &StubServices, user: &str, score: u8, at: OffsetDateTime) {
    let store = SqliteStore::open(services.database()).expect("open store");
    let entry = ScanEntry::from_product(
        UserId::new(user).expect("valid user"),
        &salted_crackers(),
        HealthScore::new(score).expect("score in range"),
        at,
    );
    store.append(&entry).expect("append scan");
}

#[rstest]
fn history_lists_newest_first_and_honours_limit(services: StubServices) {
    services.invoke_json(&["scan", PEANUT_BAR, "--user", "alice"]);
    services.invoke_json(&["scan", CRACKERS, "--user", "alice"]);

    let all = services.invoke_json(&["history", "--user", "alice"]);
    let barcodes: Vec<_> = all
        .as_array()
        .expect("history array")
        .iter()
        .map(|entry| entry["barcode"].clone())
        .collect();
    assert_eq!(barcodes, vec![json!(CRACKERS), json!(PEANUT_BAR)]);

    let limited = services.invoke_json(&["history", "--user", "alice", "--limit", "1"]);
    let only = limited.as_array().expect("history array");
    assert_eq!(only.len(), 1);
    assert_eq!(only[0]["barcode"], CRACKERS);
    assert_eq!(only[0]["score"], 85);
    assert_eq!(only[0]["user_id"], "alice");
}

#[rstest]
fn history_for_unknown_user_is_empty(services: StubServices) {
    let out = services.invoke_json(&["history", "--user", "nobody"]);
    assert_eq!(out, json!([]));
}

#[rstest]
fn history_requires_a_user(services: StubServices) {
    let err = services
        .invoke(&["history"])
        .expect_err("history without a user must fail");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_USER);
            assert_eq!(env, ENV_HISTORY_USER);
        }
        other => panic!("expected MissingArgument, got {other:?}"),
    }
}

#[rstest]
fn global_stats_cover_the_last_seven_days(services: StubServices) {
    services.invoke_json(&["scan", CRACKERS, "--user", "alice"]);
    services.invoke_json(&["scan", PEANUT_BAR, "--user", "bob"]);
    seed_scan(&services, "alice", 40, NOW - Duration::days(10));

    let stats = services.invoke_json(&["stats"]);
    assert_eq!(stats["total"], 3);
    // (85 + 73) / 2; the ten-day-old scan falls outside the window.
    assert_eq!(stats["average_score"], 79.0);
    // 2 of 25 scans.
    assert_eq!(stats["weekly_progress"], 8);

    let days = stats["last_seven_days"].as_array().expect("days array");
    assert_eq!(days.len(), 7);
    assert_eq!(days[6], json!({"day": "03-10", "count": 2}));
    assert_eq!(days[0], json!({"day": "03-04", "count": 0}));

    let grades = stats["grades"].as_array().expect("grades array");
    assert_eq!(grades[3], json!({"name": "D", "value": 1}));
    assert_eq!(grades[5], json!({"name": "N/A", "value": 1}));
}

#[rstest]
fn global_stats_on_an_empty_database(services: StubServices) {
    let stats = services.invoke_json(&["stats"]);
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["average_score"], 0.0);
    assert_eq!(stats["weekly_progress"], 0);
    assert_eq!(stats["nova"][4], json!({"name": "N/A", "value": 0}));
}

#[rstest]
fn user_stats_are_a_daily_series(services: StubServices) {
    services.invoke_json(&["scan", CRACKERS, "--user", "alice"]);
    seed_scan(&services, "alice", 60, NOW - Duration::days(9));
    seed_scan(&services, "alice", 62, NOW - Duration::days(9));
    seed_scan(&services, "bob", 50, NOW);

    let out = services.invoke_json(&["stats", "--user", "alice"]);
    assert_eq!(out["user"], "alice");
    assert_eq!(
        out["days"],
        json!([
            {"day": "2026-03-01", "count": 2},
            {"day": "2026-03-10", "count": 1},
        ])
    );
}

#[rstest]
fn blank_user_is_rejected_by_stats(services: StubServices) {
    let err = services
        .invoke(&["stats", "--user", "  "])
        .expect_err("blank user must fail");
    assert!(matches!(err, CliError::InvalidUser(_)));
}
