//! Local-time clock
//!
//! Partition paths are derived from wall-clock time in one fixed timezone
//! (not UTC), so every stage samples time through a [`Clock`].

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Timezone used when none is configured
pub const DEFAULT_TIMEZONE: &str = "Australia/Melbourne";

/// Source of the current local time
pub trait Clock: Send + Sync {
    /// Current time in the clock's timezone
    fn now(&self) -> DateTime<Tz>;

    /// Timezone this clock reports in
    fn timezone(&self) -> Tz;
}

/// Wall clock converted into a fixed timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Create a clock reporting in `tz`
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(chrono_tz::Australia::Melbourne)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    fn timezone(&self) -> Tz {
        self.tz
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Tz>,
}

impl FixedClock {
    pub fn new(at: DateTime<Tz>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.at
    }

    fn timezone(&self) -> Tz {
        self.at.timezone()
    }
}

/// Parse an IANA timezone name such as `Australia/Melbourne`
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| Error::invalid_value("timezone", format!("{name}: {e}")))
}

/// Parse an RFC 3339 timestamp and convert it into `tz`
pub fn parse_timestamp(value: &str, tz: Tz) -> Result<DateTime<Tz>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&tz))
        .map_err(|e| Error::invalid_value("captured_at", format!("{value}: {e}")))
}
