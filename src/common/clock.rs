// src/common/clock.rs
//! Injectable time source so window and bucket logic can be tested at fixed instants

use chrono::Utc;

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;

pub trait Clock: Send + Sync {
    /// The current timestamp in epoch millis
    fn now_millis(&self) -> i64;
}

/// Wall clock used outside of tests
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
pub use fixed::FixedClock;

#[cfg(test)]
mod fixed {
    use super::Clock;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock frozen at a settable instant
    #[derive(Debug)]
    pub struct FixedClock(AtomicI64);

    impl FixedClock {
        pub fn at(millis: i64) -> Self {
            Self(AtomicI64::new(millis))
        }

        pub fn set(&self, millis: i64) {
            self.0.store(millis, Ordering::SeqCst);
        }

        pub fn advance(&self, millis: i64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }
}
