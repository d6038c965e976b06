//! Retry strategies with constant or exponential backoff and jitter
//!
//! A [`RetryStrategy`] is pure configuration: it never sleeps and holds no
//! mutable state. Callers derive a fresh [`DelayIterator`] per logical
//! operation and pull one delay per failed attempt; the iterator ends once
//! `max_retry_count` delays were produced, which means "stop retrying".
//!
//! ```rust
//! use std::time::Duration;
//! use vpnrest_common::resilience::RetryStrategy;
//!
//! let strategy = RetryStrategy::default();
//! let delays: Vec<Duration> = strategy.delays().collect();
//! assert_eq!(delays, vec![Duration::from_secs(2); 3]);
//! ```

use std::time::Duration;

use rand::Rng;
use thiserror::Error;

/// Delay used by the conservative default strategy
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Number of retries performed by the default strategy
pub const DEFAULT_MAX_RETRY_COUNT: u32 = 3;

/// Number of retries performed by the aggressive strategy
pub const AGGRESSIVE_MAX_RETRY_COUNT: u32 = 10;

/// Upper bound for the aggressive strategy's exponential delay
pub const AGGRESSIVE_MAX_DELAY: Duration = Duration::from_secs(5 * 60);

/// Errors raised when building an invalid strategy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// The retry strategy configuration is invalid
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// How long to wait before each retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDelay {
    /// Retry immediately
    Never,
    /// Same delay before every retry
    Constant(Duration),
    /// `initial * multiplier^n`, optionally clamped to `max_delay`
    Exponential { initial: Duration, multiplier: u32, max_delay: Option<Duration> },
}

impl RetryDelay {
    /// Delay before retry number `attempt` (zero-based), without jitter
    pub fn base_delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::Never => Duration::ZERO,
            Self::Constant(delay) => delay,
            Self::Exponential { initial, multiplier, max_delay } => {
                let delay = initial.saturating_mul(multiplier.saturating_pow(attempt));
                match max_delay {
                    Some(max) => delay.min(max),
                    None => delay,
                }
            }
        }
    }
}

/// Retry configuration: how many retries and how long to wait between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryStrategy {
    max_retry_count: u32,
    delay: RetryDelay,
    apply_jitter: bool,
}

impl Default for RetryStrategy {
    /// Conservative preset: 3 retries, 2 seconds apart
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRY_COUNT, RetryDelay::Constant(DEFAULT_RETRY_DELAY))
    }
}

impl RetryStrategy {
    pub const fn new(max_retry_count: u32, delay: RetryDelay) -> Self {
        Self { max_retry_count, delay, apply_jitter: false }
    }

    /// Fail on the first error, no waiting
    pub const fn no_retry() -> Self {
        Self::new(0, RetryDelay::Never)
    }

    /// Preset for requests that must eventually get through (relay lists,
    /// address discovery): 10 jittered retries, exponential from 2 seconds
    /// doubling up to 5 minutes.
    pub const fn aggressive() -> Self {
        Self {
            max_retry_count: AGGRESSIVE_MAX_RETRY_COUNT,
            delay: RetryDelay::Exponential {
                initial: DEFAULT_RETRY_DELAY,
                multiplier: 2,
                max_delay: Some(AGGRESSIVE_MAX_DELAY),
            },
            apply_jitter: true,
        }
    }

    /// Create a custom exponential strategy with validation
    pub fn exponential(
        max_retry_count: u32,
        initial: Duration,
        multiplier: u32,
        max_delay: Option<Duration>,
    ) -> Result<Self, RetryError> {
        if multiplier == 0 {
            return Err(RetryError::InvalidConfiguration {
                message: "multiplier must be at least 1".to_string(),
            });
        }

        if let Some(max) = max_delay {
            if initial > max {
                return Err(RetryError::InvalidConfiguration {
                    message: format!(
                        "initial delay ({initial:?}) cannot be greater than max_delay ({max:?})"
                    ),
                });
            }
        }

        Ok(Self::new(max_retry_count, RetryDelay::Exponential { initial, multiplier, max_delay }))
    }

    /// Enable or disable jitter (`delay * (1 + U[0,1))`)
    pub const fn with_jitter(mut self, apply_jitter: bool) -> Self {
        self.apply_jitter = apply_jitter;
        self
    }

    pub const fn max_retry_count(&self) -> u32 {
        self.max_retry_count
    }

    pub const fn delay(&self) -> RetryDelay {
        self.delay
    }

    pub const fn applies_jitter(&self) -> bool {
        self.apply_jitter
    }

    /// Fresh sequence of wait durations, one per allowed retry
    pub fn delays(&self) -> DelayIterator {
        DelayIterator {
            delay: self.delay,
            apply_jitter: self.apply_jitter,
            attempt: 0,
            remaining: self.max_retry_count,
        }
    }
}

/// Iterator over retry delays; `None` means the retry budget is exhausted
#[derive(Debug, Clone)]
pub struct DelayIterator {
    delay: RetryDelay,
    apply_jitter: bool,
    attempt: u32,
    remaining: u32,
}

impl DelayIterator {
    /// Number of delays already handed out
    pub fn retries_used(&self) -> u32 {
        self.attempt
    }
}

impl Iterator for DelayIterator {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let delay = self.delay.base_delay(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        self.remaining -= 1;

        Some(if self.apply_jitter { apply_jitter(delay) } else { delay })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

/// Stretch a delay by a uniform factor in `[1, 2)` so that clients retrying
/// at the same moment spread out.
fn apply_jitter(delay: Duration) -> Duration {
    let factor: f64 = rand::thread_rng().gen();
    let extra_nanos = (delay.as_nanos() as f64 * factor) as u64;
    delay.saturating_add(Duration::from_nanos(extra_nanos))
}
