//! Chart renderer: draws a [`Chart`] description onto a [`Canvas`]
//!
//! Every draw clears the canvas first. An empty chart draws a "no data"
//! placeholder instead of failing; a failed load draws the red fallback text.

pub mod axis;
pub mod bar;
pub mod canvas;
pub mod chart;
pub mod color;
pub mod format;
pub mod grid;
pub mod histogram;
pub mod line;
pub mod scale;
pub mod svg;
pub mod tooltip;

pub use canvas::Canvas;
pub use chart::Chart;
pub use svg::{to_svg, write_svg};
pub use tooltip::{Pointer, Tooltip, TooltipContent};

use canvas::{Anchor, Text};
use color::ERROR_COLOR;

pub const NO_DATA_TEXT: &str = "Không có dữ liệu";
pub const LOAD_ERROR_TEXT: &str = "Không load được dữ liệu";

pub struct ChartRenderer;

impl ChartRenderer {
    fn draw_title(canvas: &mut Canvas, title: &str, top_margin: f64) {
        canvas.set_title(title);
        canvas.push(
            Text::new(f64::from(canvas.width) / 2.0, (top_margin / 2.0).max(18.0), title)
                .size(16.0)
                .bold()
                .anchor(Anchor::Middle),
        );
    }

    fn top_margin(chart: &Chart) -> f64 {
        match chart {
            Chart::Bar(c) => c.margin.top,
            Chart::Histogram(c) => c.margin.top,
            Chart::Line(c) => c.margin.top,
            // Grid panels start right under the margin; keep the title above them
            Chart::Grid(c) => c.margin.top * 0.6,
        }
    }

    /// Clear the canvas and draw `chart`
    pub fn render(chart: &Chart, canvas: &mut Canvas) {
        canvas.clear();
        Self::draw_title(canvas, chart.title(), Self::top_margin(chart));

        if chart.is_empty() {
            Self::render_placeholder(canvas);
            return;
        }

        match chart {
            Chart::Bar(c) => bar::draw(canvas, c),
            Chart::Histogram(c) => histogram::draw(canvas, c),
            Chart::Line(c) => line::draw(canvas, c),
            Chart::Grid(c) => grid::draw(canvas, c),
        }
    }

    fn render_placeholder(canvas: &mut Canvas) {
        canvas.push(
            Text::new(
                f64::from(canvas.width) / 2.0,
                f64::from(canvas.height) / 2.0,
                NO_DATA_TEXT,
            )
            .size(14.0)
            .anchor(Anchor::Middle),
        );
    }

    /// Clear the canvas and show the load-failure text
    pub fn render_error(canvas: &mut Canvas, title: &str) {
        canvas.clear();
        canvas.set_title(title);
        canvas.push(Text::new(20.0, 40.0, LOAD_ERROR_TEXT).size(14.0).fill(ERROR_COLOR));
    }
}
