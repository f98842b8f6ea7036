//! Report configurations
//!
//! Each report is a [`ReportSpec`] value; [`super::pipeline::build`] is the
//! single interpreter for all of them.

use serde::Serialize;

use super::ReportId;
use crate::render::chart::{AxisFormat, Margin, Orientation};
use crate::render::color::SHARE_PALETTE;
use crate::services::BinCount;
use crate::types::{GroupKey, Measure};

/// Denominator of an order share. Each is counted in distinct orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareBase {
    /// Every order in the table
    AllOrders,
    /// Orders in the same month
    MonthOrders,
    /// Orders containing the same group
    GroupOrders,
    /// Orders containing the same group in the same month
    GroupMonthOrders,
}

impl ShareBase {
    /// Keys of the denominator buckets. A report bucket finds its
    /// denominator through the prefix of its own key of this length.
    pub fn keys(&self) -> &'static [GroupKey] {
        match self {
            Self::AllOrders => &[],
            Self::MonthOrders => &[GroupKey::Month],
            Self::GroupOrders => &[GroupKey::GroupCode],
            Self::GroupMonthOrders => &[GroupKey::GroupCode, GroupKey::Month],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSpec {
    /// Sum of a measure per bucket
    Sum(Measure),
    /// Sum divided by a fixed period count (52 weeks, 12 months, 365 days)
    Average { measure: Measure, divisor: f64 },
    /// Distinct orders of the bucket over a denominator
    Share(ShareBase),
    /// One value per customer, binned into a histogram
    PerCustomer(Measure),
}

impl ValueSpec {
    /// Bucket measure the value is derived from. Shares rank by order count,
    /// which is their own order among buckets with the same denominator.
    pub fn measure(&self) -> Measure {
        match self {
            Self::Sum(m) | Self::PerCustomer(m) => *m,
            Self::Average { measure, .. } => *measure,
            Self::Share(_) => Measure::DistinctOrders,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFilter {
    All,
    /// Skip rows whose timestamp could not be parsed
    KnownTimestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ordering {
    /// Largest value first; ties keep first-seen order
    ValueDesc,
    /// Calendar position; the unknown bucket goes last
    Calendar,
    FirstSeen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBy {
    /// The bar's own label
    Label,
    /// Group code of the first line in the bucket
    GroupCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartKind {
    Bars {
        orientation: Orientation,
        color_by: ColorBy,
        custom_palette: bool,
        highlight_extremes: bool,
        headroom: Option<f64>,
        rotate_labels: bool,
    },
    Lines {
        legend: bool,
    },
    /// One panel per group: bars or lines inside
    BarGrid,
    LineGrid,
    Histogram {
        bins: BinCount,
        /// Drop bins starting below this value
        drop_below: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSpec {
    pub id: ReportId,
    /// Grouping keys, outermost first
    pub keys: &'static [GroupKey],
    pub value: ValueSpec,
    pub filter: RowFilter,
    pub ordering: Ordering,
    /// Emit all seven weekdays even when some have no rows
    pub pad_weekdays: bool,
    pub chart: ChartKind,
    pub value_format: AxisFormat,
    pub margin: Margin,
}

impl ReportSpec {
    pub fn palette(&self) -> Option<&'static [&'static str]> {
        match self.chart {
            ChartKind::Bars {
                custom_palette: true,
                ..
            } => Some(&SHARE_PALETTE),
            _ => None,
        }
    }
}

fn bars(orientation: Orientation) -> ChartKind {
    ChartKind::Bars {
        orientation,
        color_by: ColorBy::Label,
        custom_palette: false,
        highlight_extremes: false,
        headroom: None,
        rotate_labels: false,
    }
}

/// Configuration of one report
pub fn spec(id: ReportId) -> ReportSpec {
    let base = ReportSpec {
        id,
        keys: &[],
        value: ValueSpec::Sum(Measure::Amount),
        filter: RowFilter::All,
        ordering: Ordering::ValueDesc,
        pad_weekdays: false,
        chart: bars(Orientation::Horizontal),
        value_format: AxisFormat::Abbreviated,
        margin: Margin::default(),
    };

    match id {
        ReportId::SalesByItem => ReportSpec {
            keys: &[GroupKey::Item],
            chart: ChartKind::Bars {
                orientation: Orientation::Horizontal,
                color_by: ColorBy::GroupCode,
                custom_palette: false,
                highlight_extremes: false,
                headroom: None,
                rotate_labels: false,
            },
            margin: Margin::new(50.0, 40.0, 40.0, 250.0),
            ..base
        },
        ReportId::SalesByGroup => ReportSpec {
            keys: &[GroupKey::Group],
            margin: Margin::new(50.0, 40.0, 40.0, 220.0),
            ..base
        },
        ReportId::SalesByMonth => ReportSpec {
            keys: &[GroupKey::Month],
            ordering: Ordering::Calendar,
            chart: bars(Orientation::Vertical),
            margin: Margin::new(50.0, 30.0, 60.0, 70.0),
            ..base
        },
        ReportId::WeekdayAverage => ReportSpec {
            keys: &[GroupKey::Weekday],
            value: ValueSpec::Average {
                measure: Measure::Amount,
                divisor: 52.0,
            },
            filter: RowFilter::KnownTimestamp,
            ordering: Ordering::Calendar,
            pad_weekdays: true,
            chart: bars(Orientation::Vertical),
            margin: Margin::new(60.0, 30.0, 60.0, 80.0),
            ..base
        },
        ReportId::DayOfMonthAverage => ReportSpec {
            keys: &[GroupKey::DayOfMonth],
            value: ValueSpec::Average {
                measure: Measure::Amount,
                divisor: 12.0,
            },
            filter: RowFilter::KnownTimestamp,
            ordering: Ordering::Calendar,
            chart: ChartKind::Bars {
                orientation: Orientation::Vertical,
                color_by: ColorBy::Label,
                custom_palette: false,
                highlight_extremes: true,
                headroom: None,
                rotate_labels: true,
            },
            margin: Margin::new(60.0, 30.0, 100.0, 80.0),
            ..base
        },
        ReportId::HourlyAverage => ReportSpec {
            keys: &[GroupKey::Hour],
            value: ValueSpec::Average {
                measure: Measure::Amount,
                divisor: 365.0,
            },
            filter: RowFilter::KnownTimestamp,
            ordering: Ordering::Calendar,
            chart: ChartKind::Bars {
                orientation: Orientation::Vertical,
                color_by: ColorBy::Label,
                custom_palette: false,
                highlight_extremes: false,
                headroom: None,
                rotate_labels: true,
            },
            margin: Margin::new(60.0, 30.0, 100.0, 80.0),
            ..base
        },
        ReportId::GroupOrderShare => ReportSpec {
            keys: &[GroupKey::Group],
            value: ValueSpec::Share(ShareBase::AllOrders),
            chart: ChartKind::Bars {
                orientation: Orientation::Horizontal,
                color_by: ColorBy::Label,
                custom_palette: true,
                highlight_extremes: false,
                headroom: Some(1.2),
                rotate_labels: false,
            },
            value_format: AxisFormat::Percent,
            margin: Margin::new(60.0, 30.0, 50.0, 200.0),
            ..base
        },
        ReportId::GroupShareByMonth => ReportSpec {
            keys: &[GroupKey::Month, GroupKey::Group],
            value: ValueSpec::Share(ShareBase::MonthOrders),
            filter: RowFilter::KnownTimestamp,
            ordering: Ordering::FirstSeen,
            chart: ChartKind::Lines { legend: true },
            value_format: AxisFormat::Percent,
            margin: Margin::new(60.0, 30.0, 100.0, 60.0),
            ..base
        },
        ReportId::ItemShareInGroup => ReportSpec {
            keys: &[GroupKey::GroupCode, GroupKey::Item],
            value: ValueSpec::Share(ShareBase::GroupOrders),
            chart: ChartKind::BarGrid,
            value_format: AxisFormat::Percent,
            margin: Margin::new(60.0, 20.0, 40.0, 20.0),
            ..base
        },
        ReportId::ItemShareByMonth => ReportSpec {
            keys: &[GroupKey::GroupCode, GroupKey::Month, GroupKey::Item],
            value: ValueSpec::Share(ShareBase::GroupMonthOrders),
            filter: RowFilter::KnownTimestamp,
            ordering: Ordering::FirstSeen,
            chart: ChartKind::LineGrid,
            value_format: AxisFormat::Percent,
            margin: Margin::new(60.0, 30.0, 40.0, 50.0),
            ..base
        },
        ReportId::PurchaseFrequency => ReportSpec {
            keys: &[GroupKey::Customer],
            value: ValueSpec::PerCustomer(Measure::DistinctOrders),
            ordering: Ordering::FirstSeen,
            chart: ChartKind::Histogram {
                bins: BinCount::Adaptive { min: 10, max: 50 },
                drop_below: Some(1.0),
            },
            value_format: AxisFormat::Integer,
            margin: Margin::new(50.0, 40.0, 60.0, 80.0),
            ..base
        },
        ReportId::CustomerSpending => ReportSpec {
            keys: &[GroupKey::Customer],
            value: ValueSpec::PerCustomer(Measure::Amount),
            ordering: Ordering::FirstSeen,
            chart: ChartKind::Histogram {
                bins: BinCount::Fixed(88),
                drop_below: None,
            },
            margin: Margin::new(50.0, 40.0, 60.0, 80.0),
            ..base
        },
    }
}

/// Every report, in menu order
pub fn all_specs() -> Vec<ReportSpec> {
    ReportId::all().iter().copied().map(spec).collect()
}
