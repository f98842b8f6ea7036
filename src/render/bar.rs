//! Ranked bar charts

use super::axis;
use super::canvas::{Anchor, Canvas, Rect, Text};
use super::chart::{BarChart, BarDatum, Orientation, Palette};
use super::color::{OrdinalColor, BEST_COLOR, WORST_COLOR};
use super::scale::{BandScale, LinearScale};

const VALUE_TICKS: usize = 6;
const NICE_COUNT: usize = 10;

pub(crate) fn palette_scale(palette: &Palette) -> OrdinalColor {
    match palette {
        Palette::Tableau10 => OrdinalColor::tableau10(),
        Palette::Custom(colors) => {
            let refs: Vec<&str> = colors.iter().map(String::as_str).collect();
            OrdinalColor::with_palette(&refs)
        }
    }
}

/// `[0, max]` value scale: either padded by a headroom factor or niced
pub(crate) fn value_scale(bars: &[BarDatum], headroom: Option<f64>, range: (f64, f64)) -> LinearScale {
    let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    match headroom {
        Some(factor) => LinearScale::from_zero(max * factor, range),
        None => LinearScale::from_zero(max, range).nice(NICE_COUNT),
    }
}

/// Fill per bar, with optional best/worst override
fn fills(chart: &BarChart) -> Vec<String> {
    let mut colors = palette_scale(&chart.palette).with_domain(chart.bars.iter().map(|b| &b.color_key));

    let best = chart.bars.iter().map(|b| b.value).fold(f64::NEG_INFINITY, f64::max);
    let worst = chart.bars.iter().map(|b| b.value).fold(f64::INFINITY, f64::min);

    chart
        .bars
        .iter()
        .map(|b| {
            if chart.highlight_extremes && b.value == best {
                BEST_COLOR.to_string()
            } else if chart.highlight_extremes && b.value == worst {
                WORST_COLOR.to_string()
            } else {
                colors.color(&b.color_key)
            }
        })
        .collect()
}

pub fn draw(canvas: &mut Canvas, chart: &BarChart) {
    let m = chart.margin;
    let left = m.left;
    let top = m.top;
    let right = f64::from(canvas.width) - m.right;
    let bottom = f64::from(canvas.height) - m.bottom;

    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    let fills = fills(chart);

    match chart.orientation {
        Orientation::Horizontal => {
            let x = value_scale(&chart.bars, chart.headroom, (left, right));
            let y = BandScale::new(labels, (top, bottom));

            for (bar, fill) in chart.bars.iter().zip(fills) {
                let Some(pos) = y.position(&bar.label) else { continue };
                let end = x.apply(bar.value);
                canvas.push(
                    Rect::new(left, pos, end - left, y.bandwidth(), fill)
                        .tooltip(bar.tooltip.clone()),
                );
                if let Some(text) = &bar.value_label {
                    canvas.push(Text::new(end + 5.0, pos + y.bandwidth() / 2.0 + 3.5, text.clone()).size(10.0));
                }
            }

            axis::left_band(canvas, &y, left, 11.0);
            axis::bottom_linear(canvas, &x, bottom, &x.ticks(VALUE_TICKS), chart.value_format, 10.0);
        }
        Orientation::Vertical => {
            let x = BandScale::new(labels, (left, right));
            let y = value_scale(&chart.bars, chart.headroom, (bottom, top));

            for (bar, fill) in chart.bars.iter().zip(fills) {
                let Some(pos) = x.position(&bar.label) else { continue };
                let y_top = y.apply(bar.value);
                canvas.push(
                    Rect::new(pos, y_top, x.bandwidth(), bottom - y_top, fill)
                        .tooltip(bar.tooltip.clone()),
                );
                if let Some(text) = &bar.value_label {
                    canvas.push(
                        Text::new(pos + x.bandwidth() / 2.0, y_top - 4.0, text.clone())
                            .size(10.0)
                            .anchor(Anchor::Middle),
                    );
                }
            }

            axis::bottom_band(canvas, &x, bottom, chart.rotate_labels, 10.0);
            axis::left_linear(canvas, &y, left, &y.ticks(VALUE_TICKS), chart.value_format, 10.0);
        }
    }
}
