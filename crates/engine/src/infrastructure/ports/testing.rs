//! Testability port for injecting time.
//!
//! Tests pin time with `infrastructure::clock::FixedClock`.

use chrono::{DateTime, Utc};

pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
