//! Canonical time source.
//!
//! Every `submitted_at` and every day/month window is computed at a single
//! fixed offset, WIB (UTC+7). Services receive an `Arc<dyn Clock>` so tests can
//! pin "now" to an exact instant.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Utc};

/// WIB offset in seconds east of UTC
pub const WIB_OFFSET_SECS: i32 = 7 * 3600;

/// The canonical WIB (UTC+7) offset
pub fn wib() -> FixedOffset {
    FixedOffset::east_opt(WIB_OFFSET_SECS).expect("Invalid WIB offset")
}

/// Source of the current canonical time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock, converted to WIB
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&wib())
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now.with_timezone(&wib())),
        }
    }

    /// Build a clock at the given WIB wall time
    pub fn at_wib(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let now = wib()
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .expect("Invalid WIB date");
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now.with_timezone(&wib());
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Half-open window `[start, end)` in the canonical timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    pub fn contains(&self, at: &DateTime<FixedOffset>) -> bool {
        *at >= self.start && *at < self.end
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }
}

/// Today in WIB: 00:00:00 today until 00:00:00 tomorrow
pub fn day_window(now: DateTime<FixedOffset>) -> TimeWindow {
    let local = now.with_timezone(&wib());
    let start = wib()
        .with_ymd_and_hms(local.year(), local.month(), local.day(), 0, 0, 0)
        .single()
        .expect("Invalid WIB date");

    TimeWindow {
        start,
        end: start + Duration::days(1),
    }
}

/// Current month in WIB: first day 00:00:00 until the first day of next month
pub fn month_window(now: DateTime<FixedOffset>) -> TimeWindow {
    let local = now.with_timezone(&wib());
    let start = wib()
        .with_ymd_and_hms(local.year(), local.month(), 1, 0, 0, 0)
        .single()
        .expect("Invalid WIB date");

    let (next_year, next_month) = if local.month() == 12 {
        (local.year() + 1, 1)
    } else {
        (local.year(), local.month() + 1)
    };
    let end = wib()
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .expect("Invalid WIB date");

    TimeWindow { start, end }
}

/// Month label `YYYY-MM` in WIB
pub fn month_label(now: DateTime<FixedOffset>) -> String {
    now.with_timezone(&wib()).format("%Y-%m").to_string()
}
