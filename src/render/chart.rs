//! Chart descriptions handed from the report pipeline to the renderer

use serde::Serialize;

use super::format::{abbreviate, percent, plain};
use super::tooltip::TooltipContent;
use crate::services::Bin;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(60.0, 30.0, 60.0, 80.0)
    }
}

/// How axis tick values are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisFormat {
    /// `1.5M`, `200K`
    Abbreviated,
    /// Ratio as a whole percentage, `25%`
    Percent,
    /// Rounded integer
    Integer,
    /// Month number as `T01`..`T12`
    Month,
}

impl AxisFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Abbreviated => abbreviate(value),
            Self::Percent => percent(value, 0),
            Self::Integer => plain(value.round()),
            Self::Month => format!("T{:02}", value.round() as i64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Categories on the y axis, bars grow to the right
    Horizontal,
    /// Categories on the x axis, bars grow upward
    Vertical,
}

/// Which palette colors the bars
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    Tableau10,
    Custom(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    /// Key looked up in the ordinal color scale
    pub color_key: String,
    pub tooltip: TooltipContent,
    /// Text drawn at the end of the bar
    pub value_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub orientation: Orientation,
    pub bars: Vec<BarDatum>,
    pub palette: Palette,
    /// Color the largest value green and the smallest red
    pub highlight_extremes: bool,
    /// Value axis top = max * headroom (no rounding); `None` rounds the
    /// axis to nice ticks instead
    pub headroom: Option<f64>,
    pub value_format: AxisFormat,
    pub margin: Margin,
    /// Rotate category labels on a vertical chart
    pub rotate_labels: bool,
}

/// How histogram x ticks are chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramTicks {
    /// Every integer in the domain
    EveryInteger,
    /// Roughly `n` nice ticks
    Nice(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramChart {
    pub title: String,
    pub bins: Vec<Bin>,
    pub x_domain: (f64, f64),
    pub x_ticks: HistogramTicks,
    pub x_format: AxisFormat,
    pub y_format: AxisFormat,
    /// Tooltip heading, e.g. "Số lượt mua"
    pub x_label: String,
    /// Tooltip count label, e.g. "Số khách hàng"
    pub y_label: String,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    pub tooltip: TooltipContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

/// Upper bound of a line chart's value axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTop {
    /// `[0, max]` rounded to nice ticks
    NiceMax,
    /// `min(cap, max * factor)`, then rounded
    Padded { factor: f64, cap: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub series: Vec<Series>,
    pub x_domain: (f64, f64),
    pub x_format: AxisFormat,
    pub y_format: AxisFormat,
    pub y_top: ValueTop,
    pub legend: bool,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelBody {
    Bars { bars: Vec<BarDatum> },
    Lines {
        series: Vec<Series>,
        x_domain: (f64, f64),
        y_top: ValueTop,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub body: PanelBody,
}

/// Small multiples: one independent panel per group, laid out row-major
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridChart {
    pub title: String,
    pub columns: usize,
    pub panels: Vec<Panel>,
    pub value_format: AxisFormat,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum Chart {
    Bar(BarChart),
    Histogram(HistogramChart),
    Line(LineChart),
    Grid(GridChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Self::Bar(c) => &c.title,
            Self::Histogram(c) => &c.title,
            Self::Line(c) => &c.title,
            Self::Grid(c) => &c.title,
        }
    }

    /// True when there is nothing to plot
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bar(c) => c.bars.is_empty(),
            Self::Histogram(c) => c.bins.iter().all(|b| b.count == 0),
            Self::Line(c) => c.series.iter().all(|s| s.points.is_empty()),
            Self::Grid(c) => c.panels.is_empty(),
        }
    }
}
