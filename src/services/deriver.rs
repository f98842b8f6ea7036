//! Field deriver: composite labels and calendar parts per order line

use chrono::{Datelike, Timelike};
use rayon::prelude::*;

use crate::types::{EnrichedLine, GroupKey, KeyValue, OrderLine, UNKNOWN_LABEL};

/// Vietnamese weekday labels, Monday first
pub const WEEKDAY_LABELS: [&str; 7] = ["Thứ 2", "Thứ 3", "Thứ 4", "Thứ 5", "Thứ 6", "Thứ 7", "CN"];

/// Convert a Sunday-first weekday index (Sunday = 0) to a Monday-first one
/// (Monday = 0, Sunday = 6).
pub fn adjust_weekday(sunday_first: u32) -> u32 {
    if sunday_first == 0 {
        6
    } else {
        sunday_first - 1
    }
}

/// "[CODE] Name"
pub fn composite_label(code: &str, name: &str) -> String {
    format!("[{}] {}", code, name)
}

/// "T01".."T12", "Khác" when unknown
pub fn month_label(month: Option<u32>) -> String {
    match month {
        Some(m) => format!("T{:02}", m),
        None => UNKNOWN_LABEL.to_string(),
    }
}

/// "Thứ 2".."CN" for Monday-first indexes
pub fn weekday_label(weekday: Option<u32>) -> String {
    weekday
        .and_then(|d| WEEKDAY_LABELS.get(d as usize))
        .map(|s| s.to_string())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

/// "Ngày 01".."Ngày 31"
pub fn day_label(day: Option<u32>) -> String {
    match day {
        Some(d) => format!("Ngày {:02}", d),
        None => UNKNOWN_LABEL.to_string(),
    }
}

/// Half-open one-hour window, e.g. "09:00 - 09:59"
pub fn hour_label(hour: Option<u32>) -> String {
    match hour {
        Some(h) => format!("{:02}:00 - {:02}:59", h, h),
        None => UNKNOWN_LABEL.to_string(),
    }
}

/// Display label of a grouping key value
pub fn key_label(key: GroupKey, value: &KeyValue) -> String {
    match key {
        GroupKey::Month => month_label(value.as_number()),
        GroupKey::Weekday => weekday_label(value.as_number()),
        GroupKey::DayOfMonth => day_label(value.as_number()),
        GroupKey::Hour => hour_label(value.as_number()),
        _ => value.to_string(),
    }
}

/// Derives grouping fields without touching the loaded rows
pub struct Deriver;

impl Deriver {
    /// Derive the fields of a single line
    pub fn enrich(line: &OrderLine) -> EnrichedLine<'_> {
        let ts = line.created_at;
        EnrichedLine {
            line,
            item_label: composite_label(&line.item_code, &line.item_name),
            group_label: composite_label(&line.group_code, &line.group_name),
            month: ts.map(|t| t.month()),
            weekday: ts.map(|t| adjust_weekday(t.weekday().num_days_from_sunday())),
            day_of_month: ts.map(|t| t.day()),
            hour: ts.map(|t| t.hour()),
        }
    }

    /// Derive every line in parallel, preserving input order
    pub fn enrich_all(lines: &[OrderLine]) -> Vec<EnrichedLine<'_>> {
        lines.par_iter().map(Self::enrich).collect()
    }
}
