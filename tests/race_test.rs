//! Race behavior with scripted sources.
//!
//! Timings use real clocks with generous margins: a "fast" source answers in
//! tens of milliseconds, a "slow" one in hundreds, and deadlines sit well
//! between them.

mod common;

use std::time::{Duration, Instant};

use ceprace::core::race::{RaceOptions, RaceOutcome, resolve};
use ceprace::core::source::SourceHandle;
use ceprace::test_utils::{MockSource, make_test_address_in};

use common::log_capture::TestLogCapture;

const CEP: &str = "01001000";

fn options(timeout_ms: u64, deadline_ms: u64) -> RaceOptions {
    RaceOptions::new(
        Duration::from_millis(timeout_ms),
        Duration::from_millis(deadline_ms),
    )
}

fn ok_after(city: &str, ms: u64) -> MockSource {
    MockSource::ok(make_test_address_in(city)).with_delay(Duration::from_millis(ms))
}

// =============================================================================
// Winner selection
// =============================================================================

#[tokio::test]
async fn fast_source_wins_regardless_of_order() {
    let fast = ok_after("Fast", 10);
    let slow = ok_after("Slow", 500);

    for sources in [
        vec![
            SourceHandle::new("A", fast.clone()),
            SourceHandle::new("B", slow.clone()),
        ],
        vec![
            SourceHandle::new("B", slow.clone()),
            SourceHandle::new("A", fast.clone()),
        ],
    ] {
        let start = Instant::now();
        let report = resolve(CEP, &sources, options(1000, 1000)).await;

        let winner = report.outcome.winner().expect("a winner");
        assert_eq!(winner.source, "A");
        assert_eq!(winner.city(), "Fast");
        assert!(start.elapsed() < Duration::from_millis(400));
    }
}

#[tokio::test]
async fn winner_is_attributed_to_its_handle_label() {
    let sources = vec![SourceHandle::new("BrasilAPI", ok_after("Recife", 5))];

    let report = resolve(CEP, &sources, options(1000, 1000)).await;

    let winner = report.outcome.winner().unwrap();
    assert_eq!(winner.source, "BrasilAPI");
    assert_eq!(report.attempts.len(), 1);
    assert!(report.attempts[0].success);
}

#[tokio::test]
async fn failed_fast_source_does_not_block_a_slower_success() {
    let sources = vec![
        SourceHandle::new("A", MockSource::http_error(500)),
        SourceHandle::new("B", ok_after("Slower", 100)),
    ];

    let report = resolve(CEP, &sources, options(1000, 1000)).await;

    assert_eq!(report.outcome.winner().unwrap().source, "B");
    assert_eq!(report.attempts.len(), 2);
    assert!(!report.attempts[0].success);
    assert_eq!(report.attempts[0].error_code.as_deref(), Some("CEP-S001"));
}

#[tokio::test]
async fn repeated_races_are_independent() {
    let sources = vec![
        SourceHandle::new("A", ok_after("Fast", 10)),
        SourceHandle::new("B", ok_after("Slow", 300)),
    ];

    for _ in 0..3 {
        let report = resolve(CEP, &sources, options(1000, 1000)).await;
        assert_eq!(report.outcome.winner().unwrap().source, "A");
    }
}

// =============================================================================
// No winner
// =============================================================================

#[tokio::test]
async fn all_failures_resolve_before_the_deadline() {
    let sources = vec![
        SourceHandle::new("A", MockSource::http_error(500)),
        SourceHandle::new("B", MockSource::parse_error("unexpected EOF")),
    ];

    let start = Instant::now();
    let report = resolve(CEP, &sources, options(1000, 1000)).await;

    assert_eq!(report.outcome, RaceOutcome::Exhausted);
    assert_eq!(report.attempts.len(), 2);
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn deadline_cuts_off_slow_sources() {
    let sources = vec![
        SourceHandle::new("A", ok_after("Late", 2000)),
        SourceHandle::new("B", ok_after("Later", 2000)),
    ];

    let start = Instant::now();
    let report = resolve(CEP, &sources, options(5000, 300)).await;
    let elapsed = start.elapsed();

    assert_eq!(report.outcome, RaceOutcome::TimedOut);
    assert!(report.attempts.is_empty());
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(1500));
}

#[tokio::test]
async fn per_call_timeout_counts_as_a_failure() {
    let sources = vec![SourceHandle::new("A", ok_after("Late", 1000))];

    let report = resolve(CEP, &sources, options(50, 2000)).await;

    assert_eq!(report.outcome, RaceOutcome::Exhausted);
    assert_eq!(report.attempts[0].error_code.as_deref(), Some("CEP-N001"));
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn losers_are_cancelled_after_a_win() {
    let fast = ok_after("Fast", 10);
    let slow = ok_after("Slow", 300);
    let sources = vec![
        SourceHandle::new("A", fast.clone()),
        SourceHandle::new("B", slow.clone()),
    ];

    let report = resolve(CEP, &sources, options(1000, 1000)).await;
    assert_eq!(report.outcome.winner().unwrap().source, "A");

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(slow.calls(), 1);
    assert_eq!(slow.completions(), 0, "slow source ran to completion");
    assert_eq!(fast.completions(), 1);
}

#[tokio::test]
async fn stragglers_are_cancelled_after_the_deadline() {
    let slow = ok_after("Slow", 400);
    let sources = vec![SourceHandle::new("A", slow.clone())];

    let report = resolve(CEP, &sources, options(1000, 50)).await;
    assert_eq!(report.outcome, RaceOutcome::TimedOut);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(slow.completions(), 0);
}

// =============================================================================
// Logging
// =============================================================================

#[tokio::test]
async fn race_logs_winner_and_failures() {
    let capture = TestLogCapture::start();

    let sources = vec![
        SourceHandle::new("Broken", MockSource::http_error(503)),
        SourceHandle::new("Working", ok_after("Natal", 50)),
    ];
    let report = resolve(CEP, &sources, options(1000, 1000)).await;
    assert!(report.outcome.winner().is_some());

    capture.assert_logged_at_level(tracing::Level::WARN, "Source failed");
    capture.assert_logged_at_level(tracing::Level::INFO, "Race won");
    capture.assert_no_errors();

    let won = capture.find("Race won");
    assert_eq!(won[0].field("source"), Some("Working"));
}

#[tokio::test]
async fn race_logs_deadline() {
    let capture = TestLogCapture::start();

    let sources = vec![SourceHandle::new("A", ok_after("Late", 1000))];
    let report = resolve(CEP, &sources, options(2000, 20)).await;
    assert_eq!(report.outcome, RaceOutcome::TimedOut);

    capture.assert_logged_at_level(tracing::Level::WARN, "Race deadline elapsed");
}
