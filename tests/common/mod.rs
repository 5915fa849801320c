//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use chrono::{DateTime, TimeZone, Utc};
use seriesdash_rs::bridge::{StoreBridge, StoreMessage};
use std::time::{Duration, Instant};

/// Upper bound for anything the worker is expected to do
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Midnight UTC on the given day of January 2024
pub fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

/// Collect messages until `done` matches one of them
///
/// Panics if nothing matching arrives within [`test_timeout`].
pub fn collect_until(
    bridge: &StoreBridge,
    mut done: impl FnMut(&StoreMessage) -> bool,
) -> Vec<StoreMessage> {
    let deadline = Instant::now() + test_timeout();
    let mut messages = Vec::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match bridge.recv_timeout(remaining) {
            Some(msg) => {
                let finished = done(&msg);
                messages.push(msg);
                if finished {
                    return messages;
                }
            }
            None => panic!("timed out; received so far: {:#?}", messages),
        }
    }
}

/// Values of the newest snapshot among `messages`
pub fn last_snapshot_values(messages: &[StoreMessage]) -> Option<Vec<f64>> {
    messages.iter().rev().find_map(|msg| match msg {
        StoreMessage::Snapshot(snapshot) => {
            Some(snapshot.samples.iter().map(|s| s.value).collect())
        }
        _ => None,
    })
}
