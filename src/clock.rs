//! Time source for scheduling decisions
//!
//! All timestamps are epoch milliseconds. Due-ness is evaluated with a single
//! read of the clock per query, so the controller asks the clock once and
//! passes the value down.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by `chrono::Utc`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep a handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start)),
        }
    }

    pub fn set(&self, at: Timestamp) {
        self.now.store(at, Ordering::SeqCst);
    }

    pub fn advance(&self, by: i64) {
        self.now.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Render a timestamp in local time, e.g. `2024-03-01 14:05`
pub fn format_timestamp(at: Timestamp) -> String {
    match Utc.timestamp_millis_opt(at).single() {
        Some(utc) => {
            let local: DateTime<Local> = utc.with_timezone(&Local);
            local.format("%Y-%m-%d %H:%M").to_string()
        }
        None => at.to_string(),
    }
}
