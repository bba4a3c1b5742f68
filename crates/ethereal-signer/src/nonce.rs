//! Nanosecond nonces with a monotonic guarantee.
//!
//! A nonce is the current epoch time in nanoseconds, written as decimal
//! digits. Two intents stamped within the same clock tick would otherwise
//! share a nonce, so issuance goes through a CAS counter:
//! `next = max(last + 1, now_ns)`.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Trait for obtaining current time, enabling testability.
pub trait Clock: Send + Sync {
    /// Returns current time in nanoseconds since Unix epoch.
    fn now_ns(&self) -> u64;
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    /// Falls back to 0 (with a warning) for a clock set before the epoch or
    /// past what a `u64` of nanoseconds holds; the nonce counter still
    /// advances by one in that case.
    fn now_ns(&self) -> u64 {
        let now = Utc::now();
        epoch_nanos(now).unwrap_or_else(|| {
            warn!(now = %now, "system clock outside the nonce range, using 0");
            0
        })
    }
}

/// Nanoseconds since the Unix epoch, `None` if not representable as `u64`.
fn epoch_nanos(at: DateTime<Utc>) -> Option<u64> {
    let secs = u64::try_from(at.timestamp()).ok()?;
    secs.checked_mul(NANOS_PER_SECOND)?
        .checked_add(u64::from(at.timestamp_subsec_nanos()))
}

/// An issued nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(u64);

impl Nonce {
    #[inline]
    pub fn new(ns: u64) -> Self {
        Self(ns)
    }

    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Seconds-since-epoch part of the nonce (all digits but the last nine).
    #[inline]
    pub fn signed_at(&self) -> i64 {
        (self.0 / NANOS_PER_SECOND) as i64
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues strictly increasing nanosecond nonces.
///
/// Thread-safe; shared by every task of a batch.
pub struct NonceManager<C: Clock> {
    /// Last issued nonce.
    counter: AtomicU64,
    clock: C,
}

impl<C: Clock> NonceManager<C> {
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            counter: AtomicU64::new(0),
            clock,
        }
    }

    /// Returns `max(last_nonce + 1, now_ns)`.
    pub fn next(&self) -> Nonce {
        let target = self.clock.now_ns();

        loop {
            let current = self.counter.load(Ordering::Acquire);
            let next_val = current.saturating_add(1).max(target);

            match self.counter.compare_exchange_weak(
                current,
                next_val,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Nonce(next_val),
                Err(_) => continue,
            }
        }
    }

    /// Last issued value, 0 if none yet.
    #[must_use]
    pub fn last(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }
}

impl NonceManager<SystemClock> {
    #[must_use]
    pub fn with_system_clock() -> Self {
        Self::new(SystemClock)
    }
}

impl Default for NonceManager<SystemClock> {
    fn default() -> Self {
        Self::with_system_clock()
    }
}
