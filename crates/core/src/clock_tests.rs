// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::thread;
use std::time::Instant;

#[test]
fn system_clock_sleeps_without_cancel() {
    let clock = SystemClock::new();
    let start = Instant::now();
    clock.sleep(Duration::from_millis(20)).unwrap();
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn cancelled_token_interrupts_sleep_immediately() {
    let token = CancelToken::new();
    token.cancel();
    let clock = SystemClock::with_cancel(token);

    let start = Instant::now();
    let result = clock.sleep(Duration::from_secs(30));
    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn cancel_from_another_thread_wakes_sleeper() {
    let token = CancelToken::new();
    let clock = SystemClock::with_cancel(token.clone());

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        token.cancel();
    });

    let start = Instant::now();
    let result = clock.sleep(Duration::from_secs(30));
    canceller.join().unwrap();

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn token_reports_cancelled_state() {
    let token = CancelToken::new();
    assert!(!token.is_cancelled());
    token.clone().cancel();
    assert!(token.is_cancelled());
}

#[test]
fn clock_reference_delegates() {
    let clock = SystemClock::new();
    let by_ref: &dyn Clock = &clock;
    let before = Utc::now();
    assert!(by_ref.now() >= before);
}
