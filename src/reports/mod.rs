//! Report selector: the twelve report views and the pipeline that builds them

pub mod catalog;
pub mod pipeline;
pub mod runner;

pub use catalog::{
    all_specs, spec, ChartKind, ColorBy, Ordering, ReportSpec, RowFilter, ShareBase, ValueSpec,
};
pub use pipeline::{build, ReportOutput, ReportRow, Summary};
pub use runner::{RenderTarget, ReportSession, RunOutcome, RunToken};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportId {
    SalesByItem,
    SalesByGroup,
    SalesByMonth,
    WeekdayAverage,
    DayOfMonthAverage,
    HourlyAverage,
    GroupOrderShare,
    GroupShareByMonth,
    ItemShareInGroup,
    ItemShareByMonth,
    PurchaseFrequency,
    CustomerSpending,
}

impl ReportId {
    pub const ALL: [ReportId; 12] = [
        Self::SalesByItem,
        Self::SalesByGroup,
        Self::SalesByMonth,
        Self::WeekdayAverage,
        Self::DayOfMonthAverage,
        Self::HourlyAverage,
        Self::GroupOrderShare,
        Self::GroupShareByMonth,
        Self::ItemShareInGroup,
        Self::ItemShareByMonth,
        Self::PurchaseFrequency,
        Self::CustomerSpending,
    ];

    pub fn all() -> &'static [ReportId] {
        &Self::ALL
    }

    /// 1-based position in the menu
    pub fn number(&self) -> usize {
        Self::ALL.iter().position(|id| id == self).map_or(0, |i| i + 1)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::SalesByItem => "sales-by-item",
            Self::SalesByGroup => "sales-by-group",
            Self::SalesByMonth => "sales-by-month",
            Self::WeekdayAverage => "weekday-average",
            Self::DayOfMonthAverage => "day-of-month-average",
            Self::HourlyAverage => "hourly-average",
            Self::GroupOrderShare => "group-order-share",
            Self::GroupShareByMonth => "group-share-by-month",
            Self::ItemShareInGroup => "item-share-in-group",
            Self::ItemShareByMonth => "item-share-by-month",
            Self::PurchaseFrequency => "purchase-frequency",
            Self::CustomerSpending => "customer-spending",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::SalesByItem => "Doanh số bán hàng theo Mặt hàng",
            Self::SalesByGroup => "Doanh số bán hàng theo Nhóm hàng",
            Self::SalesByMonth => "Doanh số bán hàng theo Tháng",
            Self::WeekdayAverage => "Doanh thu trung bình theo Ngày trong tuần",
            Self::DayOfMonthAverage => "Doanh số trung bình theo Ngày trong tháng",
            Self::HourlyAverage => "Doanh số trung bình theo Khung giờ",
            Self::GroupOrderShare => "Xác suất bán hàng theo Nhóm hàng",
            Self::GroupShareByMonth => "Xác suất bán hàng theo Nhóm hàng theo Tháng",
            Self::ItemShareInGroup => "Xác suất bán hàng của Mặt hàng theo Nhóm hàng",
            Self::ItemShareByMonth => "Xác suất mua theo Tháng của Mặt hàng theo Nhóm hàng",
            Self::PurchaseFrequency => "Phân phối lượt mua hàng",
            Self::CustomerSpending => "Phân phối mức chi trả của khách hàng",
        }
    }

    /// Output file name, e.g. `01-sales-by-item.svg`
    pub fn file_name(&self) -> String {
        format!("{:02}-{}.svg", self.number(), self.slug())
    }

    /// Accepts a slug (`sales-by-month`), a number (`3`) or a `q`-number (`q3`)
    pub fn from_slug(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        let numeric = value.strip_prefix('q').unwrap_or(&value);
        if let Ok(n) = numeric.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied();
        }
        Self::ALL.iter().copied().find(|id| id.slug() == value)
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReportId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| {
            format!(
                "unknown report '{}' (expected 1-12 or one of: {})",
                s,
                Self::ALL.iter().map(|id| id.slug()).collect::<Vec<_>>().join(", ")
            )
        })
    }
}
