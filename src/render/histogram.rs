//! Histograms

use super::axis;
use super::canvas::{Canvas, Rect};
use super::chart::{AxisFormat, HistogramChart, HistogramTicks};
use super::color::HISTOGRAM_FILL;
use super::format::thousands;
use super::scale::LinearScale;
use super::tooltip::TooltipContent;
use crate::services::binning::max_count;

const COUNT_TICKS: usize = 5;
const NICE_COUNT: usize = 10;

fn bin_range_label(x0: f64, x1: f64, format: AxisFormat) -> String {
    match format {
        AxisFormat::Abbreviated => format!("{} - {}", thousands(x0), thousands(x1)),
        other => format!("{} - {}", other.format(x0), other.format(x1)),
    }
}

fn x_ticks(scale: &LinearScale, ticks: HistogramTicks) -> Vec<f64> {
    match ticks {
        HistogramTicks::EveryInteger => {
            let (lo, hi) = scale.domain();
            let (lo, hi) = (lo.ceil() as i64, hi.floor() as i64);
            (lo..=hi).map(|v| v as f64).collect()
        }
        HistogramTicks::Nice(n) => scale.ticks(n),
    }
}

pub fn draw(canvas: &mut Canvas, chart: &HistogramChart) {
    let m = chart.margin;
    let left = m.left;
    let right = f64::from(canvas.width) - m.right;
    let top = m.top;
    let bottom = f64::from(canvas.height) - m.bottom;

    let x = LinearScale::new(chart.x_domain, (left, right));
    let y = LinearScale::from_zero(max_count(&chart.bins) as f64, (bottom, top)).nice(NICE_COUNT);

    for bin in &chart.bins {
        let x0 = x.apply(bin.x0);
        let x1 = x.apply(bin.x1);
        let y_top = y.apply(bin.count as f64);
        let tooltip = TooltipContent::new(format!(
            "{}: {}",
            chart.x_label,
            bin_range_label(bin.x0, bin.x1, chart.x_format)
        ))
        .line(format!("{}: {}", chart.y_label, thousands(bin.count as f64)));

        canvas.push(
            Rect::new(x0, y_top, x1 - x0 - 1.0, bottom - y_top, HISTOGRAM_FILL)
                .opacity(0.6)
                .stroke("black")
                .tooltip(tooltip),
        );
    }

    axis::bottom_linear(canvas, &x, bottom, &x_ticks(&x, chart.x_ticks), chart.x_format, 10.0);
    axis::left_linear(canvas, &y, left, &y.ticks(COUNT_TICKS), chart.y_format, 10.0);
}
