//! Small-multiples layout: one independently scaled panel per group

use super::axis;
use super::bar;
use super::canvas::{Anchor, Canvas, Rect, Text};
use super::chart::{AxisFormat, BarDatum, GridChart, Panel, PanelBody, Palette, Series, ValueTop};
use super::color::OrdinalColor;
use super::line;
use super::scale::{BandScale, LinearScale};

/// Pixel box of one panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Row-major cells for `count` panels in `columns` columns
pub fn layout(count: usize, columns: usize, area: Cell) -> Vec<Cell> {
    let columns = columns.max(1);
    let rows = count.div_ceil(columns).max(1);
    let width = area.width / columns as f64;
    let height = area.height / rows as f64;

    (0..count)
        .map(|i| Cell {
            x: area.x + (i % columns) as f64 * width,
            y: area.y + (i / columns) as f64 * height,
            width,
            height,
        })
        .collect()
}

fn draw_bar_panel(canvas: &mut Canvas, cell: Cell, bars: &[BarDatum], format: AxisFormat, colors: &mut OrdinalColor) {
    // Item names need most of the room on narrow cells
    let label_room = (cell.width * 0.45).min(180.0);
    let left = cell.x + label_room;
    let right = cell.x + cell.width - 40.0;
    let top = cell.y + 40.0;
    let bottom = cell.y + cell.height - 40.0;

    let x = bar::value_scale(bars, Some(1.0), (left, right.max(left + 1.0)));
    let bottom = bottom.max(top + 1.0);
    let y = BandScale::new(bars.iter().map(|b| b.label.clone()).collect(), (top, bottom));

    for b in bars {
        let Some(pos) = y.position(&b.label) else { continue };
        let end = x.apply(b.value);
        canvas.push(
            Rect::new(left, pos, end - left, y.bandwidth(), colors.color(&b.color_key))
                .tooltip(b.tooltip.clone()),
        );
        if let Some(text) = &b.value_label {
            canvas.push(Text::new(end + 5.0, pos + y.bandwidth() / 2.0 + 3.5, text.clone()).size(10.0));
        }
    }

    axis::left_band(canvas, &y, left, 10.0);
    axis::bottom_linear(canvas, &x, bottom, &x.ticks(4), format, 10.0);
}

fn draw_line_panel(
    canvas: &mut Canvas,
    cell: Cell,
    series: &[Series],
    x_domain: (f64, f64),
    y_top: ValueTop,
    format: AxisFormat,
    colors: &mut OrdinalColor,
) {
    let left = cell.x + 50.0;
    let right = cell.x + cell.width - 10.0;
    let top = cell.y + 20.0;
    let bottom = cell.y + cell.height - 40.0;

    let x = LinearScale::new(x_domain, (left, right.max(left + 1.0)));
    let y = line::value_scale(series, y_top, (bottom.max(top + 1.0), top));

    line::draw_series(canvas, series, &x, &y, colors, 2.0);

    let (d0, d1) = x.domain();
    let mut month_ticks: Vec<f64> = x.ticks(6).into_iter().filter(|t| t.fract() == 0.0).collect();
    if month_ticks.is_empty() {
        month_ticks.push(((d0 + d1) / 2.0).round());
    }
    axis::bottom_linear(canvas, &x, y.range().0, &month_ticks, AxisFormat::Month, 9.0);
    axis::left_linear(canvas, &y, left, &y.ticks(4), format, 9.0);
}

fn draw_panel(canvas: &mut Canvas, cell: Cell, panel: &Panel, format: AxisFormat, colors: &mut OrdinalColor) {
    match &panel.body {
        PanelBody::Bars { bars } => {
            draw_bar_panel(canvas, cell, bars, format, colors);
            let label_room = (cell.width * 0.45).min(180.0);
            let center = cell.x + label_room + (cell.width - label_room - 40.0) / 2.0;
            canvas.push(
                Text::new(center, cell.y + 25.0, panel.title.clone())
                    .size(12.0)
                    .bold()
                    .anchor(Anchor::Middle),
            );
        }
        PanelBody::Lines {
            series,
            x_domain,
            y_top,
        } => {
            draw_line_panel(canvas, cell, series, *x_domain, *y_top, format, colors);
            canvas.push(
                Text::new(cell.x + cell.width / 2.0, cell.y + 10.0, panel.title.clone())
                    .size(12.0)
                    .bold()
                    .anchor(Anchor::Middle),
            );
        }
    }
}

pub fn draw(canvas: &mut Canvas, chart: &GridChart) {
    let m = chart.margin;
    let area = Cell {
        x: m.left,
        y: m.top,
        width: (f64::from(canvas.width) - m.left - m.right).max(1.0),
        height: (f64::from(canvas.height) - m.top - m.bottom).max(1.0),
    };

    // One color scale shared by every panel
    let mut colors = bar::palette_scale(&Palette::Tableau10);
    for (panel, cell) in chart.panels.iter().zip(layout(chart.panels.len(), chart.columns, area)) {
        draw_panel(canvas, cell, panel, chart.value_format, &mut colors);
    }
}
