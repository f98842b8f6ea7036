//! Order line types for sales reports

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used for rows whose timestamp could not be parsed
pub const UNKNOWN_LABEL: &str = "Khác";

/// One row of the source table: one item within one order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub order_code: String,
    /// Order creation time; `None` when the source value was unparseable
    pub created_at: Option<NaiveDateTime>,
    pub customer_code: String,
    pub item_code: String,
    pub item_name: String,
    pub group_code: String,
    pub group_name: String,
    pub quantity: f64,
    /// Line amount in VNĐ
    pub amount: f64,
}

/// A derived grouping value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Text(String),
    Number(u32),
    /// Missing calendar part (rendered as "Khác")
    Unknown,
}

impl KeyValue {
    pub fn as_number(&self) -> Option<u32> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Unknown => f.write_str(UNKNOWN_LABEL),
        }
    }
}

/// An order line plus its derived fields. Borrows the loaded row, never
/// mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedLine<'a> {
    pub line: &'a OrderLine,
    /// "[ITEM_CODE] Item name"
    pub item_label: String,
    /// "[GROUP_CODE] Group name"
    pub group_label: String,
    /// 1..=12
    pub month: Option<u32>,
    /// Monday = 0 .. Sunday = 6
    pub weekday: Option<u32>,
    /// 1..=31
    pub day_of_month: Option<u32>,
    /// 0..=23
    pub hour: Option<u32>,
}

impl EnrichedLine<'_> {
    pub fn has_timestamp(&self) -> bool {
        self.line.created_at.is_some()
    }
}
