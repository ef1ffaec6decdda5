//! Leveled interval scheduling
//!
//! Each item sits at a level that indexes into an interval table. A correct
//! answer moves the item one level up (capped at the last level); a wrong
//! answer puts it back at level 1, never level 0, so even a first-ever miss
//! waits `table[1]` before coming back.
//!
//! Reference table (milliseconds):
//! - 0: now
//! - 1: 4 hours
//! - 2: 8 hours
//! - 3: 24 hours
//! - 4: 3 days
//! - 5: 7 days
//! - 6: 14 days
//! - 7: 30 days

use std::fmt;

use thiserror::Error;

use super::models::ReviewRecord;
use crate::clock::Timestamp;

const SECOND: i64 = 1000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Level a failed answer resets to
pub const RETRY_LEVEL: usize = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Interval table needs at least {min} entries, got {0}", min = RETRY_LEVEL + 1)]
    TooShort(usize),

    #[error("Interval table must be non-decreasing (level {0})")]
    Decreasing(usize),

    #[error("Negative interval at level {0}")]
    Negative(usize),

    #[error("Invalid interval '{0}'")]
    Parse(String),
}

/// Delay in milliseconds for each level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTable {
    delays: Vec<i64>,
}

impl IntervalTable {
    /// Build a table from millisecond delays
    pub fn new(delays: Vec<i64>) -> Result<Self, IntervalError> {
        if delays.len() <= RETRY_LEVEL {
            return Err(IntervalError::TooShort(delays.len()));
        }
        for (level, delay) in delays.iter().enumerate() {
            if *delay < 0 {
                return Err(IntervalError::Negative(level));
            }
            if level > 0 && *delay < delays[level - 1] {
                return Err(IntervalError::Decreasing(level));
            }
        }
        Ok(Self { delays })
    }

    /// Parse a table from human-readable entries such as `["0", "4h", "3d"]`
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, IntervalError> {
        let delays = entries
            .iter()
            .map(|e| parse_interval(e.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(delays)
    }

    /// `[0, 4h, 8h, 24h, 3d, 7d, 14d, 30d]`
    pub fn reference() -> Self {
        Self {
            delays: vec![
                0,
                4 * HOUR,
                8 * HOUR,
                24 * HOUR,
                3 * DAY,
                7 * DAY,
                14 * DAY,
                30 * DAY,
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.delays.len()
    }

    pub fn max_level(&self) -> usize {
        self.delays.len() - 1
    }

    pub fn delay(&self, level: usize) -> i64 {
        self.delays[level.min(self.max_level())]
    }

    pub fn delays(&self) -> &[i64] {
        &self.delays
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl fmt::Display for IntervalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.delays.iter().map(|d| format_interval(*d)).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Level an item moves to after being rated
pub fn next_level(current: usize, success: bool, table: &IntervalTable) -> usize {
    if success {
        current.saturating_add(1).min(table.max_level())
    } else {
        RETRY_LEVEL
    }
}

/// Calculate the record an item gets when rated at `now`
pub fn calculate_next_review(
    record: &ReviewRecord,
    success: bool,
    now: Timestamp,
    table: &IntervalTable,
) -> ReviewRecord {
    let level = next_level(record.level, success, table);
    ReviewRecord {
        level,
        next_review_at: now.saturating_add(table.delay(level)),
    }
}

/// Delays a failed and a successful answer would schedule, in that order
pub fn preview_intervals(record: &ReviewRecord, table: &IntervalTable) -> [i64; 2] {
    [
        table.delay(next_level(record.level, false, table)),
        table.delay(next_level(record.level, true, table)),
    ]
}

/// Format a millisecond interval as a short human-readable string
pub fn format_interval(ms: i64) -> String {
    if ms <= 0 {
        "now".to_string()
    } else if ms < MINUTE {
        format!("{}s", ms / SECOND)
    } else if ms < HOUR {
        format!("{}m", ms / MINUTE)
    } else if ms < DAY {
        format!("{}h", ms / HOUR)
    } else if ms < WEEK {
        format!("{}d", ms / DAY)
    } else if ms < MONTH {
        if ms % WEEK == 0 {
            format!("{}w", ms / WEEK)
        } else {
            format!("{}d", ms / DAY)
        }
    } else if ms < YEAR {
        format!("{}mo", ms / MONTH)
    } else {
        format!("{}y", ms / YEAR)
    }
}

/// Parse an interval such as `0`, `90s`, `15m`, `4h`, `3d` or `2w` into milliseconds
pub fn parse_interval(input: &str) -> Result<i64, IntervalError> {
    let trimmed = input.trim();
    if trimmed == "0" || trimmed.eq_ignore_ascii_case("now") {
        return Ok(0);
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| IntervalError::Parse(input.to_string()))?;
    let (number, unit) = trimmed.split_at(split);
    let value: i64 = number
        .parse()
        .map_err(|_| IntervalError::Parse(input.to_string()))?;

    let multiplier = match unit {
        "ms" => 1,
        "s" => SECOND,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        "w" => WEEK,
        "mo" => MONTH,
        "y" => YEAR,
        _ => return Err(IntervalError::Parse(input.to_string())),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| IntervalError::Parse(input.to_string()))
}
