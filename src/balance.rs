//! Reduce approval-status periods into a single overtime balance.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::info;

use crate::models::TimesheetEntry;

/// Net worked time in seconds. Positive means overtime, negative means the user is behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Balance(i64);

impl Balance {
    pub const ZERO: Balance = Balance(0);

    pub fn from_seconds(seconds: i64) -> Self {
        Balance(seconds)
    }

    pub fn seconds(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

/// Hour/minute/second notation: `1h0m0s`, `2m5s`, `45s`, `-30m0s`, `0s`.
/// Leading zero units are dropped, trailing ones are kept.
impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0s");
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let (h, m, s) = (abs / 3600, abs % 3600 / 60, abs % 60);
        if h > 0 {
            write!(f, "{sign}{h}h{m}m{s}s")
        } else if m > 0 {
            write!(f, "{sign}{m}m{s}s")
        } else {
            write!(f, "{sign}{s}s")
        }
    }
}

impl Serialize for Balance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

/// Periods with nothing logged are not counted.
fn is_counted(entry: &TimesheetEntry) -> bool {
    entry.worked_seconds != 0
}

fn net_seconds(entry: &TimesheetEntry) -> i64 {
    entry
        .worked_seconds
        .saturating_sub(entry.required_seconds_relative_today)
}

/// Sum worked minus required-to-date over every period that has worked time.
/// Pure over `entries`: the same slice always yields the same balance.
pub fn aggregate(entries: &[TimesheetEntry]) -> Balance {
    let mut total: i64 = 0;
    for entry in entries {
        if !is_counted(entry) {
            info!("Skipping {}", entry.smart_date_string);
            continue;
        }
        total = total.saturating_add(net_seconds(entry));
    }
    Balance(total)
}

/// Contribution of one counted period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBalance {
    pub label: String,
    pub status: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub worked_seconds: i64,
    pub required_seconds_relative_today: i64,
    pub net: Balance,
}

fn parse_period_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn breakdown(entries: &[TimesheetEntry]) -> Vec<PeriodBalance> {
    entries
        .iter()
        .filter(|e| is_counted(e))
        .map(|e| PeriodBalance {
            label: e.smart_date_string.clone(),
            status: e.status.clone(),
            date_from: parse_period_date(&e.period.date_from),
            date_to: parse_period_date(&e.period.date_to),
            worked_seconds: e.worked_seconds,
            required_seconds_relative_today: e.required_seconds_relative_today,
            net: Balance(net_seconds(e)),
        })
        .collect()
}

/// Labels of the periods `aggregate` leaves out, in input order.
pub fn skipped_labels(entries: &[TimesheetEntry]) -> Vec<&str> {
    entries
        .iter()
        .filter(|e| !is_counted(e))
        .map(|e| e.smart_date_string.as_str())
        .collect()
}
