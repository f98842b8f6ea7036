//! Axis drawing shared by every chart shape

use super::canvas::{Anchor, Canvas, Line, Text};
use super::chart::AxisFormat;
use super::color::AXIS_COLOR;
use super::scale::{BandScale, LinearScale};

const TICK_SIZE: f64 = 6.0;

fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
    Line {
        x1,
        y1,
        x2,
        y2,
        stroke: AXIS_COLOR.into(),
        width: 1.0,
    }
}

/// Horizontal value axis at `y`, ticks pointing down
pub fn bottom_linear(
    canvas: &mut Canvas,
    scale: &LinearScale,
    y: f64,
    ticks: &[f64],
    format: AxisFormat,
    font_size: f64,
) {
    let (r0, r1) = scale.range();
    canvas.push(axis_line(r0, y, r1, y));
    for &t in ticks {
        let x = scale.apply(t);
        canvas.push(axis_line(x, y, x, y + TICK_SIZE));
        canvas.push(
            Text::new(x, y + TICK_SIZE + font_size + 2.0, format.format(t))
                .size(font_size)
                .anchor(Anchor::Middle),
        );
    }
}

/// Vertical value axis at `x`, ticks pointing left
pub fn left_linear(
    canvas: &mut Canvas,
    scale: &LinearScale,
    x: f64,
    ticks: &[f64],
    format: AxisFormat,
    font_size: f64,
) {
    let (r0, r1) = scale.range();
    canvas.push(axis_line(x, r0, x, r1));
    for &t in ticks {
        let y = scale.apply(t);
        canvas.push(axis_line(x - TICK_SIZE, y, x, y));
        canvas.push(
            Text::new(x - TICK_SIZE - 3.0, y + font_size / 3.0, format.format(t))
                .size(font_size)
                .anchor(Anchor::End),
        );
    }
}

/// Category labels under a horizontal band axis at `y`
pub fn bottom_band(canvas: &mut Canvas, scale: &BandScale, y: f64, rotate: bool, font_size: f64) {
    let (start, end) = match (scale.domain().first(), scale.domain().last()) {
        (Some(first), Some(last)) => (
            scale.position(first).unwrap_or(0.0),
            scale.position(last).unwrap_or(0.0) + scale.bandwidth(),
        ),
        _ => return,
    };
    canvas.push(axis_line(start - scale.step() * 0.2, y, end + scale.step() * 0.2, y));

    for key in scale.domain() {
        let Some(cx) = scale.center(key) else { continue };
        let label = Text::new(cx, y + TICK_SIZE + font_size + 2.0, key.clone()).size(font_size);
        let label = if rotate {
            label.anchor(Anchor::End).rotate(-40.0)
        } else {
            label.anchor(Anchor::Middle)
        };
        canvas.push(label);
    }
}

/// Category labels left of a vertical band axis at `x`
pub fn left_band(canvas: &mut Canvas, scale: &BandScale, x: f64, font_size: f64) {
    for key in scale.domain() {
        let Some(cy) = scale.center(key) else { continue };
        canvas.push(
            Text::new(x - 6.0, cy + font_size / 3.0, key.clone())
                .size(font_size)
                .anchor(Anchor::End),
        );
    }
}
