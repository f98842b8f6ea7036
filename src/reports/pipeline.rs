//! Report pipeline: filter, group, reduce, order, then describe the chart
//!
//! [`build`] is pure. It never touches a canvas; the caller hands the
//! resulting [`Chart`] to [`crate::render::ChartRenderer`].

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::catalog::{ChartKind, ColorBy, Ordering, ReportSpec, RowFilter, ShareBase, ValueSpec};
use super::ReportId;
use crate::render::chart::{
    AxisFormat, BarChart, BarDatum, Chart, GridChart, HistogramChart, HistogramTicks, LineChart,
    Orientation, Palette, Panel, PanelBody, Series, SeriesPoint, ValueTop,
};
use crate::render::format::{currency, percent, plain, thousands};
use crate::render::TooltipContent;
use crate::services::deriver::{composite_label, key_label, month_label};
use crate::services::ticks::nice;
use crate::services::{
    bin_values, drop_below, Aggregator, Bin, BinCount, Config, Deriver, FrequencySummary,
    SpendingSummary,
};
use crate::types::{Bucket, EnrichedLine, GroupKey, KeyValue, Measure, OrderLine, Representative};

/// Line charts over months always span the whole year
const YEAR_DOMAIN: (f64, f64) = (1.0, 12.0);

/// Share panels: `min(100%, max * 1.1)`
const SHARE_PANEL_TOP: ValueTop = ValueTop::Padded {
    factor: 1.1,
    cap: 1.0,
};

const CUSTOMER_AXIS_LABEL: &str = "Số khách hàng";
const SPENDING_TICKS: usize = 8;

/// One aggregated value as it appears in the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Key path labels joined with " / "
    pub label: String,
    pub value: f64,
    /// Value formatted for display
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    Frequency(FrequencySummary),
    Spending(SpendingSummary),
}

impl Summary {
    /// Human-readable report lines
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Frequency(s) => {
                let one_time_rate = if s.customers > 0 {
                    s.one_time as f64 / s.customers as f64 * 100.0
                } else {
                    0.0
                };
                vec![
                    format!("Tổng số khách hàng: {}", thousands(s.customers as f64)),
                    format!("Khách hàng mua 1 lần: {} ({:.2}%)", s.one_time, one_time_rate),
                    format!("Khách hàng mua lặp lại: {} ({:.2}%)", s.repeat, s.repeat_rate),
                    format!("Lượt mua lớn nhất: {}", plain(s.max_orders)),
                    format!("Lượt mua phổ biến nhất: {}", plain(s.most_common)),
                ]
            }
            Self::Spending(s) => vec![
                format!("Tổng số khách hàng: {}", thousands(s.customers as f64)),
                format!("Mức chi trả trung bình: {}", currency(s.mean)),
                format!("Mức chi trả trung vị: {}", currency(s.median)),
                format!("Mức chi trả cao nhất: {}", currency(s.max)),
                format!("Mức chi trả thấp nhất: {}", currency(s.min)),
                format!("Mức chi trả phổ biến nhất: {}", currency(s.most_common)),
                format!("Top 10% KH chi tiêu ≥ {}", currency(s.high_threshold)),
                format!("  → {} KH ({:.2}%)", s.high_customers, s.high_rate),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOutput {
    pub id: ReportId,
    pub chart: Chart,
    pub rows: Vec<ReportRow>,
    pub summary: Option<Summary>,
}

impl ReportOutput {
    pub fn title(&self) -> &str {
        self.chart.title()
    }
}

/// Distinct order counts of the denominator buckets, looked up by key prefix
struct Denominators {
    depth: usize,
    orders: HashMap<Vec<KeyValue>, f64>,
}

impl Denominators {
    fn new(lines: &[EnrichedLine<'_>], base: ShareBase) -> Self {
        let keys = base.keys();
        let orders = Aggregator::group_by(lines, keys)
            .into_iter()
            .map(|b| {
                let count = b.distinct_orders as f64;
                (b.key, count)
            })
            .collect();
        Self {
            depth: keys.len(),
            orders,
        }
    }

    fn share(&self, bucket: &Bucket) -> f64 {
        let prefix = &bucket.key[..self.depth.min(bucket.key.len())];
        match self.orders.get(prefix) {
            Some(&total) if total > 0.0 => bucket.distinct_orders as f64 / total,
            _ => 0.0,
        }
    }
}

/// Turns buckets into report values
struct Valuation {
    value: ValueSpec,
    denominators: Option<Denominators>,
}

impl Valuation {
    fn new(spec: &ReportSpec, lines: &[EnrichedLine<'_>]) -> Self {
        let denominators = match spec.value {
            ValueSpec::Share(base) => Some(Denominators::new(lines, base)),
            _ => None,
        };
        Self {
            value: spec.value,
            denominators,
        }
    }

    fn of(&self, bucket: &Bucket) -> f64 {
        match self.value {
            ValueSpec::Sum(m) | ValueSpec::PerCustomer(m) => bucket.measure(m),
            ValueSpec::Average { measure, divisor } => {
                if divisor > 0.0 {
                    bucket.measure(measure) / divisor
                } else {
                    0.0
                }
            }
            ValueSpec::Share(_) => self
                .denominators
                .as_ref()
                .map_or(0.0, |d| d.share(bucket)),
        }
    }

    fn display(&self, value: f64) -> String {
        match self.value {
            ValueSpec::Share(_) => percent(value, 2),
            ValueSpec::Sum(Measure::Amount)
            | ValueSpec::Average {
                measure: Measure::Amount,
                ..
            } => currency(value),
            _ => thousands(value),
        }
    }

    fn tooltip(&self, label: &str, bucket: &Bucket, value: f64) -> TooltipContent {
        let content = TooltipContent::new(label);
        match self.value {
            ValueSpec::Sum(_) | ValueSpec::PerCustomer(_) => content
                .line(format!("Doanh thu: {}", currency(bucket.amount)))
                .line(format!("Số lượng: {}", thousands(bucket.quantity))),
            ValueSpec::Average { divisor, .. } => content
                .line(format!("Doanh thu TB: {}", currency(value)))
                .line(format!(
                    "SL TB: {}",
                    thousands(if divisor > 0.0 { bucket.quantity / divisor } else { 0.0 })
                )),
            ValueSpec::Share(_) => content
                .line(format!("Số đơn hàng: {}", thousands(bucket.distinct_orders as f64)))
                .line(format!("Xác suất: {}", percent(value, 1))),
        }
    }
}

fn passes(filter: RowFilter, line: &EnrichedLine<'_>) -> bool {
    match filter {
        RowFilter::All => true,
        RowFilter::KnownTimestamp => line.has_timestamp(),
    }
}

/// Calendar position of a key; unknown sorts last
fn calendar_rank(value: &KeyValue) -> usize {
    value.as_number().map_or(usize::MAX, |n| n as usize)
}

fn order_buckets(buckets: &mut [Bucket], spec: &ReportSpec) {
    match spec.ordering {
        Ordering::ValueDesc => Aggregator::sort_by_measure_desc(buckets, spec.value.measure()),
        Ordering::Calendar => Aggregator::sort_by_rank(buckets, |b| calendar_rank(b.leaf())),
        Ordering::FirstSeen => {}
    }
}

/// Add zero buckets for weekdays without any rows
fn pad_weekdays(buckets: &mut Vec<Bucket>) {
    for day in 0..7 {
        let key = vec![KeyValue::Number(day)];
        if !buckets.iter().any(|b| b.key == key) {
            buckets.push(Bucket {
                key,
                lines: 0,
                amount: 0.0,
                quantity: 0.0,
                distinct_orders: 0,
                first: Representative::default(),
            });
        }
    }
}

fn path_label(keys: &[GroupKey], bucket: &Bucket) -> String {
    keys.iter()
        .enumerate()
        .map(|(level, key)| key_label(*key, bucket.key_at(level)))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn rows_for(spec: &ReportSpec, valuation: &Valuation, buckets: &[Bucket]) -> Vec<ReportRow> {
    buckets
        .iter()
        .map(|b| {
            let value = valuation.of(b);
            ReportRow {
                label: path_label(spec.keys, b),
                value,
                display: valuation.display(value),
            }
        })
        .collect()
}

/// Split buckets by their outermost key, keeping first-seen order of both
/// the panels and the buckets inside each
fn split_outer(buckets: Vec<Bucket>) -> Vec<(KeyValue, Vec<Bucket>)> {
    let mut index: HashMap<KeyValue, usize> = HashMap::new();
    let mut groups: Vec<(KeyValue, Vec<Bucket>)> = Vec::new();
    for bucket in buckets {
        let outer = bucket.key_at(0).clone();
        let slot = *index.entry(outer.clone()).or_insert_with(|| {
            groups.push((outer, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(bucket);
    }
    groups
}

fn known_months_only(buckets: &mut Vec<Bucket>, month_level: usize) {
    buckets.retain(|b| !b.key_at(month_level).is_unknown());
}

fn panel_title(config: &Config, code: &KeyValue) -> String {
    let code = code.to_string();
    composite_label(&code, config.group_display_name(&code))
}

/// One line per leaf key in first-seen order, points sorted by month
fn month_series(
    buckets: &[Bucket],
    keys: &[GroupKey],
    month_level: usize,
    valuation: &Valuation,
    share_label: &str,
) -> Vec<Series> {
    let leaf_key = keys[keys.len() - 1];
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut series: Vec<Series> = Vec::new();

    for bucket in buckets {
        let Some(month) = bucket.key_at(month_level).as_number() else {
            continue;
        };
        let name = key_label(leaf_key, bucket.leaf());
        let value = valuation.of(bucket);
        let point = SeriesPoint {
            x: f64::from(month),
            y: value,
            tooltip: TooltipContent::new(name.clone())
                .line(format!("Tháng: {}", month_label(Some(month))))
                .line(format!("{}: {}", share_label, percent(value, 1))),
        };

        let slot = *index.entry(name.clone()).or_insert_with(|| {
            series.push(Series {
                name,
                points: Vec::new(),
            });
            series.len() - 1
        });
        series[slot].points.push(point);
    }

    for s in &mut series {
        s.points.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    series
}

type Built = (Chart, Vec<ReportRow>, Option<Summary>);

fn bar_report(
    spec: &ReportSpec,
    lines: &[EnrichedLine<'_>],
    orientation: Orientation,
    color_by: ColorBy,
    highlight_extremes: bool,
    headroom: Option<f64>,
    rotate_labels: bool,
) -> Built {
    let leaf_key = spec.keys[spec.keys.len() - 1];
    let valuation = Valuation::new(spec, lines);

    let mut buckets = Aggregator::group_by(lines, spec.keys);
    if spec.pad_weekdays && !buckets.is_empty() {
        pad_weekdays(&mut buckets);
    }
    order_buckets(&mut buckets, spec);

    let bars = buckets
        .iter()
        .map(|b| {
            let label = key_label(leaf_key, b.leaf());
            let value = valuation.of(b);
            let color_key = match color_by {
                ColorBy::Label => label.clone(),
                ColorBy::GroupCode => b.first.group_code.clone(),
            };
            BarDatum {
                tooltip: valuation.tooltip(&label, b, value),
                label,
                value,
                color_key,
                value_label: None,
            }
        })
        .collect();

    let palette = match spec.palette() {
        Some(colors) => Palette::Custom(colors.iter().map(|c| c.to_string()).collect()),
        None => Palette::Tableau10,
    };

    let chart = Chart::Bar(BarChart {
        title: spec.id.title().to_string(),
        orientation,
        bars,
        palette,
        highlight_extremes,
        headroom,
        value_format: spec.value_format,
        margin: spec.margin,
        rotate_labels,
    });
    (chart, rows_for(spec, &valuation, &buckets), None)
}

fn line_report(spec: &ReportSpec, lines: &[EnrichedLine<'_>], legend: bool) -> Built {
    let valuation = Valuation::new(spec, lines);
    let mut buckets = Aggregator::group_by(lines, spec.keys);
    known_months_only(&mut buckets, 0);
    order_buckets(&mut buckets, spec);

    let series = month_series(&buckets, spec.keys, 0, &valuation, "Tỷ trọng");
    let chart = Chart::Line(LineChart {
        title: spec.id.title().to_string(),
        series,
        x_domain: YEAR_DOMAIN,
        x_format: AxisFormat::Month,
        y_format: spec.value_format,
        y_top: ValueTop::NiceMax,
        legend,
        margin: spec.margin,
    });
    (chart, rows_for(spec, &valuation, &buckets), None)
}

fn bar_grid_report(spec: &ReportSpec, lines: &[EnrichedLine<'_>], config: &Config) -> Built {
    let leaf_key = spec.keys[spec.keys.len() - 1];
    let valuation = Valuation::new(spec, lines);
    let mut rows = Vec::new();

    let panels = split_outer(Aggregator::group_by(lines, spec.keys))
        .into_iter()
        .map(|(code, mut buckets)| {
            order_buckets(&mut buckets, spec);
            rows.extend(rows_for(spec, &valuation, &buckets));
            let bars = buckets
                .iter()
                .map(|b| {
                    let label = key_label(leaf_key, b.leaf());
                    let value = valuation.of(b);
                    BarDatum {
                        tooltip: valuation.tooltip(&label, b, value),
                        color_key: label.clone(),
                        label,
                        value,
                        value_label: Some(percent(value, 2)),
                    }
                })
                .collect();
            Panel {
                title: panel_title(config, &code),
                body: PanelBody::Bars { bars },
            }
        })
        .collect();

    let chart = Chart::Grid(GridChart {
        title: spec.id.title().to_string(),
        columns: config.grid_columns,
        panels,
        value_format: spec.value_format,
        margin: spec.margin,
    });
    (chart, rows, None)
}

fn line_grid_report(spec: &ReportSpec, lines: &[EnrichedLine<'_>], config: &Config) -> Built {
    let valuation = Valuation::new(spec, lines);
    let mut buckets = Aggregator::group_by(lines, spec.keys);
    known_months_only(&mut buckets, 1);
    let mut rows = Vec::new();

    let panels = split_outer(buckets)
        .into_iter()
        .map(|(code, mut buckets)| {
            order_buckets(&mut buckets, spec);
            rows.extend(rows_for(spec, &valuation, &buckets));

            let months: Vec<f64> = buckets
                .iter()
                .filter_map(|b| b.key_at(1).as_number())
                .map(f64::from)
                .collect();
            let x_domain = match (
                months.iter().copied().reduce(f64::min),
                months.iter().copied().reduce(f64::max),
            ) {
                (Some(lo), Some(hi)) => (lo, hi),
                _ => YEAR_DOMAIN,
            };

            Panel {
                title: panel_title(config, &code),
                body: PanelBody::Lines {
                    series: month_series(&buckets, spec.keys, 1, &valuation, "Xác suất"),
                    x_domain,
                    y_top: SHARE_PANEL_TOP,
                },
            }
        })
        .collect();

    let chart = Chart::Grid(GridChart {
        title: spec.id.title().to_string(),
        columns: config.grid_columns,
        panels,
        value_format: spec.value_format,
        margin: spec.margin,
    });
    (chart, rows, None)
}

fn is_count(measure: Measure) -> bool {
    matches!(measure, Measure::DistinctOrders | Measure::Lines)
}

fn histogram_report(
    spec: &ReportSpec,
    lines: &[EnrichedLine<'_>],
    count: BinCount,
    min_x0: Option<f64>,
) -> Built {
    let measure = spec.value.measure();
    let values = Aggregator::per_entity(lines, spec.keys[0], measure);
    let hi = values.iter().copied().reduce(f64::max).unwrap_or(0.0);

    let mut bins: Vec<Bin> = bin_values(&values, count);
    if let Some(min_x0) = min_x0 {
        bins = drop_below(bins, min_x0);
    }

    let (x_domain, x_ticks, x_label, summary) = if is_count(measure) {
        // Whole counts: the axis starts at the smallest kept value and
        // reaches the last bin edge so the top bin keeps its width
        let lo = min_x0.unwrap_or(0.0);
        let last_edge = bins.last().map_or(hi, |b| b.x1);
        (
            (lo, hi.max(lo + 1.0).max(last_edge)),
            HistogramTicks::EveryInteger,
            "Số lượt mua",
            Summary::Frequency(FrequencySummary::from_counts(&values)),
        )
    } else {
        (
            nice(0.0, hi.max(0.0), 10),
            HistogramTicks::Nice(SPENDING_TICKS),
            "Mức chi trả",
            Summary::Spending(SpendingSummary::from_values(&values)),
        )
    };

    let rows = bins
        .iter()
        .map(|b| ReportRow {
            label: format!("{} - {}", plain(b.x0), plain(b.x1)),
            value: b.count as f64,
            display: thousands(b.count as f64),
        })
        .collect();

    let chart = Chart::Histogram(HistogramChart {
        title: spec.id.title().to_string(),
        bins,
        x_domain,
        x_ticks,
        x_format: spec.value_format,
        y_format: AxisFormat::Integer,
        x_label: x_label.to_string(),
        y_label: CUSTOMER_AXIS_LABEL.to_string(),
        margin: spec.margin,
    });
    (chart, rows, Some(summary))
}

/// Run one report over loaded order lines
pub fn build(spec: &ReportSpec, lines: &[OrderLine], config: &Config) -> ReportOutput {
    let enriched: Vec<EnrichedLine<'_>> = Deriver::enrich_all(lines)
        .into_iter()
        .filter(|l| passes(spec.filter, l))
        .collect();
    debug!(report = %spec.id, rows = enriched.len(), "building report");

    let (chart, rows, summary) = match spec.chart {
        ChartKind::Bars {
            orientation,
            color_by,
            highlight_extremes,
            headroom,
            rotate_labels,
            ..
        } => bar_report(
            spec,
            &enriched,
            orientation,
            color_by,
            highlight_extremes,
            headroom,
            rotate_labels,
        ),
        ChartKind::Lines { legend } => line_report(spec, &enriched, legend),
        ChartKind::BarGrid => bar_grid_report(spec, &enriched, config),
        ChartKind::LineGrid => line_grid_report(spec, &enriched, config),
        ChartKind::Histogram { bins, drop_below } => {
            histogram_report(spec, &enriched, bins, drop_below)
        }
    };

    ReportOutput {
        id: spec.id,
        chart,
        rows,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{SalesCsvParser, TableParser};
    use crate::reports::catalog::spec;
    use std::path::PathBuf;

    fn fixture_lines() -> Vec<OrderLine> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("sales-sample.csv");
        let bytes = std::fs::read(path).unwrap();
        SalesCsvParser::new().parse_bytes(&bytes).unwrap()
    }

    fn run(id: ReportId) -> ReportOutput {
        build(&spec(id), &fixture_lines(), &Config::default())
    }

    fn bar_chart(output: &ReportOutput) -> &BarChart {
        match &output.chart {
            Chart::Bar(c) => c,
            other => panic!("expected bar chart, got {:?}", other),
        }
    }

    fn grid_chart(output: &ReportOutput) -> &GridChart {
        match &output.chart {
            Chart::Grid(c) => c,
            other => panic!("expected grid chart, got {:?}", other),
        }
    }

    fn labels(chart: &BarChart) -> Vec<&str> {
        chart.bars.iter().map(|b| b.label.as_str()).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ========== revenue reports ==========

    #[test]
    fn test_sales_by_item_ranked() {
        let output = run(ReportId::SalesByItem);
        let chart = bar_chart(&output);

        assert_eq!(
            labels(chart),
            vec![
                "[SET03] Set trà dưỡng nhan",
                "[BOT01] Bột cần tây",
                "[THO02] Trà hoa cúc",
                "[THO05] Trà hoa đậu biếc",
            ]
        );
        assert!(approx(chart.bars[0].value, 1_140_000.0));
        // Colored by group, not by item
        assert_eq!(chart.bars[2].color_key, "THO");
        assert_eq!(chart.bars[3].color_key, "THO");
        assert_eq!(
            chart.bars[0].tooltip.lines,
            vec!["Doanh thu: 1,140,000 VNĐ", "Số lượng: 3"]
        );
    }

    #[test]
    fn test_revenue_is_partitioned() {
        for id in [ReportId::SalesByItem, ReportId::SalesByGroup, ReportId::SalesByMonth] {
            let total: f64 = run(id).rows.iter().map(|r| r.value).sum();
            assert!(approx(total, 3_070_000.0), "{}", id);
        }
    }

    #[test]
    fn test_sales_by_group() {
        let output = run(ReportId::SalesByGroup);
        let chart = bar_chart(&output);

        assert_eq!(labels(chart), vec!["[THO] Trà Hoa", "[SET] Set Trà", "[BOT] Bột"]);
        assert_eq!(output.rows[0].display, "1,180,000 VNĐ");
    }

    #[test]
    fn test_sales_by_month_calendar_order_with_unknown_last() {
        let output = run(ReportId::SalesByMonth);
        let chart = bar_chart(&output);

        assert_eq!(labels(chart), vec!["T01", "T02", "T03", "Khác"]);
        let values: Vec<f64> = chart.bars.iter().map(|b| b.value).collect();
        assert_eq!(values, vec![1_070_000.0, 600_000.0, 1_250_000.0, 150_000.0]);
    }

    // ========== time averages ==========

    #[test]
    fn test_weekday_average_pads_all_days() {
        let output = run(ReportId::WeekdayAverage);
        let chart = bar_chart(&output);

        assert_eq!(
            labels(chart),
            vec!["Thứ 2", "Thứ 3", "Thứ 4", "Thứ 5", "Thứ 6", "Thứ 7", "CN"]
        );
        assert!(approx(chart.bars[0].value, 960_000.0 / 52.0));
        assert_eq!(chart.bars[2].value, 0.0);
        // The row without a timestamp is left out
        let total: f64 = chart.bars.iter().map(|b| b.value * 52.0).sum();
        assert!((total - 2_920_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_day_of_month_highlights_extremes() {
        let output = run(ReportId::DayOfMonthAverage);
        let chart = bar_chart(&output);

        assert!(chart.highlight_extremes);
        assert_eq!(chart.bars[0].label, "Ngày 02");
        assert!(chart.bars[0].tooltip.lines[0].starts_with("Doanh thu TB: "));
    }

    #[test]
    fn test_hourly_labels() {
        let output = run(ReportId::HourlyAverage);
        let chart = bar_chart(&output);

        assert_eq!(chart.bars[0].label, "09:00 - 09:59");
        assert!(!labels(chart).contains(&"Khác"));
    }

    // ========== order shares ==========

    #[test]
    fn test_group_order_share() {
        let output = run(ReportId::GroupOrderShare);
        let chart = bar_chart(&output);

        assert_eq!(labels(chart), vec!["[THO] Trà Hoa", "[BOT] Bột", "[SET] Set Trà"]);
        assert!(approx(chart.bars[0].value, 5.0 / 9.0));
        assert!(approx(chart.bars[2].value, 3.0 / 9.0));
        assert!(matches!(chart.palette, Palette::Custom(ref p) if p.len() == 5));
        assert_eq!(chart.headroom, Some(1.2));
        assert_eq!(
            chart.bars[0].tooltip.lines,
            vec!["Số đơn hàng: 5", "Xác suất: 55.6%"]
        );
    }

    #[test]
    fn test_group_share_by_month_series() {
        let output = run(ReportId::GroupShareByMonth);
        let Chart::Line(chart) = &output.chart else {
            panic!("expected line chart");
        };

        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["[SET] Set Trà", "[THO] Trà Hoa", "[BOT] Bột"]);

        let tho = &chart.series[1];
        let xs: Vec<f64> = tho.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert!(approx(tho.points[0].y, 2.0 / 3.0));
        assert!(approx(tho.points[1].y, 0.5));
        assert_eq!(tho.points[0].tooltip.lines[0], "Tháng: T01");
        assert_eq!(chart.x_domain, (1.0, 12.0));
    }

    #[test]
    fn test_item_share_in_group_panels() {
        let output = run(ReportId::ItemShareInGroup);
        let chart = grid_chart(&output);

        let titles: Vec<&str> = chart.panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["[SET] Set Trà", "[THO] Trà Hoa", "[BOT] Bột"]);
        assert_eq!(chart.columns, 3);

        let PanelBody::Bars { bars } = &chart.panels[1].body else {
            panic!("expected bar panel");
        };
        assert_eq!(bars[0].label, "[THO02] Trà hoa cúc");
        assert!(approx(bars[0].value, 0.8));
        assert_eq!(bars[0].value_label.as_deref(), Some("80.00%"));
        assert!(approx(bars[1].value, 0.6));
    }

    #[test]
    fn test_item_share_by_month_panels() {
        let output = run(ReportId::ItemShareByMonth);
        let chart = grid_chart(&output);
        assert_eq!(chart.panels.len(), 3);

        let PanelBody::Lines {
            series,
            x_domain,
            y_top,
        } = &chart.panels[1].body
        else {
            panic!("expected line panel");
        };
        assert_eq!(*x_domain, (1.0, 3.0));
        assert_eq!(*y_top, SHARE_PANEL_TOP);
        // THO02 is in both January orders of the group
        let tho02 = series.iter().find(|s| s.name == "[THO02] Trà hoa cúc").unwrap();
        assert!(approx(tho02.points[0].y, 1.0));
        assert!(output.rows.iter().all(|r| !r.label.contains("Khác")));
    }

    // ========== customer distributions ==========

    #[test]
    fn test_purchase_frequency() {
        let output = run(ReportId::PurchaseFrequency);
        let Chart::Histogram(chart) = &output.chart else {
            panic!("expected histogram");
        };

        let counted: usize = chart.bins.iter().map(|b| b.count).sum();
        assert_eq!(counted, 5);
        assert!(chart.bins.iter().all(|b| b.x0 >= 1.0));
        assert_eq!(chart.x_domain.0, 1.0);
        assert!(chart.x_domain.1 >= 3.0);

        let Some(Summary::Frequency(summary)) = &output.summary else {
            panic!("expected frequency summary");
        };
        assert_eq!(summary.customers, 5);
        assert_eq!(summary.one_time, 2);
        assert_eq!(summary.repeat, 3);
        assert!(approx(summary.repeat_rate, 60.0));
        assert_eq!(summary.most_common, 2.0);
    }

    #[test]
    fn test_customer_spending() {
        let output = run(ReportId::CustomerSpending);
        let Chart::Histogram(chart) = &output.chart else {
            panic!("expected histogram");
        };
        let counted: usize = chart.bins.iter().map(|b| b.count).sum();
        assert_eq!(counted, 5);
        assert_eq!(chart.x_domain.0, 0.0);
        assert!(chart.x_domain.1 >= 1_330_000.0);

        let Some(Summary::Spending(summary)) = &output.summary else {
            panic!("expected spending summary");
        };
        assert!(approx(summary.mean, 614_000.0));
        assert!(approx(summary.median, 450_000.0));
        assert!((summary.high_threshold - 1_086_000.0).abs() < 1e-6);
        assert_eq!(summary.high_customers, 1);
    }

    #[test]
    fn test_summary_lines() {
        let summary = Summary::Frequency(FrequencySummary::from_counts(&[3.0, 2.0, 2.0, 1.0, 1.0]));
        let lines = summary.lines();

        assert_eq!(lines[0], "Tổng số khách hàng: 5");
        assert_eq!(lines[1], "Khách hàng mua 1 lần: 2 (40.00%)");
        assert_eq!(lines[2], "Khách hàng mua lặp lại: 3 (60.00%)");
    }

    // ========== empty input ==========

    #[test]
    fn test_empty_input_builds_empty_charts() {
        let config = Config::default();
        for id in ReportId::all() {
            let output = build(&spec(*id), &[], &config);
            assert!(output.chart.is_empty(), "{}", id);
            assert_eq!(output.title(), id.title());
        }
    }
}
