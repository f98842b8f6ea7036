//! Aggregate bucket types

use serde::Serialize;

use super::KeyValue;

static UNKNOWN: KeyValue = KeyValue::Unknown;

/// Grouping keys understood by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    /// Composite item label
    Item,
    ItemCode,
    /// Composite group label
    Group,
    GroupCode,
    Month,
    Weekday,
    DayOfMonth,
    Hour,
    Customer,
}

/// Reduced measures available on every bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Sum of line amounts
    Amount,
    /// Sum of quantities
    Quantity,
    /// Count of distinct order codes
    DistinctOrders,
    /// Count of rows
    Lines,
}

/// Descriptive fields of the first line seen in a bucket
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Representative {
    pub item_code: String,
    pub item_name: String,
    pub group_code: String,
    pub group_name: String,
}

/// Result of grouping order lines by one or more keys
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub key: Vec<KeyValue>,
    pub lines: u64,
    pub amount: f64,
    pub quantity: f64,
    pub distinct_orders: u64,
    pub first: Representative,
}

impl Bucket {
    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Amount => self.amount,
            Measure::Quantity => self.quantity,
            Measure::DistinctOrders => self.distinct_orders as f64,
            Measure::Lines => self.lines as f64,
        }
    }

    /// Key component at `level`, `Unknown` when out of range
    pub fn key_at(&self, level: usize) -> &KeyValue {
        self.key.get(level).unwrap_or(&UNKNOWN)
    }

    /// Innermost key component
    pub fn leaf(&self) -> &KeyValue {
        self.key.last().unwrap_or(&UNKNOWN)
    }
}
