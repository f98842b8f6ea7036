//! Multi-series line charts

use super::axis;
use super::canvas::{Canvas, Circle, Path, Text};
use super::chart::{LineChart, Series, ValueTop};
use super::color::OrdinalColor;
use super::scale::LinearScale;

const NICE_COUNT: usize = 10;
const LEGEND_SPACING: f64 = 120.0;

/// `[0, top]` value scale for a set of series
pub(crate) fn value_scale(series: &[Series], top: ValueTop, range: (f64, f64)) -> LinearScale {
    let max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.y))
        .fold(0.0_f64, f64::max);
    let top = match top {
        ValueTop::NiceMax => max,
        ValueTop::Padded { factor, cap } => {
            let max = if max > 0.0 { max } else { 0.01 };
            (max * factor).min(cap)
        }
    };
    LinearScale::from_zero(top, range).nice(NICE_COUNT)
}

/// One path plus markers per series, colored by series name
pub(crate) fn draw_series(
    canvas: &mut Canvas,
    series: &[Series],
    x: &LinearScale,
    y: &LinearScale,
    colors: &mut OrdinalColor,
    marker_radius: f64,
) {
    for s in series {
        let stroke = colors.color(&s.name);
        let class = super::svg::safe_class(&s.name);
        canvas.push(Path {
            points: s.points.iter().map(|p| (x.apply(p.x), y.apply(p.y))).collect(),
            stroke: stroke.clone(),
            width: 2.0,
            class: Some(format!("{}-line", class)),
        });
        for p in &s.points {
            canvas.push(Circle {
                cx: x.apply(p.x),
                cy: y.apply(p.y),
                r: marker_radius,
                fill: stroke.clone(),
                class: Some(class.clone()),
                tooltip: Some(p.tooltip.clone()),
            });
        }
    }
}

pub fn draw(canvas: &mut Canvas, chart: &LineChart) {
    let m = chart.margin;
    let width = f64::from(canvas.width);
    let height = f64::from(canvas.height);
    let (left, right) = (m.left, width - m.right);
    let (top, bottom) = (m.top, height - m.bottom);

    let x = LinearScale::new(chart.x_domain, (left, right));
    let y = value_scale(&chart.series, chart.y_top, (bottom, top));
    let mut colors = OrdinalColor::tableau10().with_domain(chart.series.iter().map(|s| &s.name));

    draw_series(canvas, &chart.series, &x, &y, &mut colors, 3.0);

    let (d0, d1) = x.domain();
    let x_ticks: Vec<f64> = x.ticks(12).into_iter().filter(|t| *t >= d0 && *t <= d1).collect();
    axis::bottom_linear(canvas, &x, bottom, &x_ticks, chart.x_format, 10.0);
    axis::left_linear(canvas, &y, left, &y.ticks(NICE_COUNT), chart.y_format, 10.0);

    if chart.legend {
        let n = chart.series.len() as f64;
        let legend_y = height - 40.0;
        for (i, s) in chart.series.iter().enumerate() {
            let cx = width / 2.0 + (i as f64 - n / 2.0) * LEGEND_SPACING;
            canvas.push(Circle {
                cx,
                cy: legend_y,
                r: 6.0,
                fill: colors.color(&s.name),
                class: None,
                tooltip: None,
            });
            canvas.push(Text::new(cx + 10.0, legend_y + 4.0, s.name.clone()).size(12.0));
        }
    }
}
