//! Integration tests for retry strategies
//!
//! Exercises the public presets the way the request executor consumes them:
//! one fresh delay iterator per logical request.

#![cfg(feature = "foundation")]

use std::time::Duration;

use vpnrest_common::resilience::{RetryDelay, RetryStrategy};

/// Jittered delays stay within `[base, 2 * base)` for every retry.
#[test]
fn test_jittered_delays_stay_within_bounds() {
    let base = Duration::from_millis(500);
    let strategy = RetryStrategy::new(50, RetryDelay::Constant(base)).with_jitter(true);

    for delay in strategy.delays() {
        assert!(delay >= base, "{delay:?} shorter than base");
        assert!(delay < base * 2, "{delay:?} not below twice the base");
    }
}

/// Jitter on top of an exponential schedule still respects each step's base.
#[test]
fn test_jittered_exponential_bounds_per_attempt() {
    let strategy = RetryStrategy::aggressive();
    let delay_kind = strategy.delay();

    for (attempt, delay) in strategy.delays().enumerate() {
        let base = delay_kind.base_delay(attempt as u32);
        assert!(delay >= base);
        assert!(delay < base * 2);
    }
}

/// Two iterators from the same strategy are independent.
#[test]
fn test_iterators_do_not_share_state() {
    let strategy = RetryStrategy::default();
    let mut first = strategy.delays();
    first.next();
    first.next();
    first.next();
    assert_eq!(first.next(), None);

    assert_eq!(strategy.delays().count(), 3);
}

/// A strategy allowing zero retries is exhausted immediately.
#[test]
fn test_zero_retry_budget() {
    let strategy = RetryStrategy::new(0, RetryDelay::Constant(Duration::from_secs(1)));
    assert_eq!(strategy.delays().next(), None);
}
