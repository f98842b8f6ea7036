//! Report preview - aggregated rows as text bars plus the customer summary

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::render::{Chart, TooltipContent, LOAD_ERROR_TEXT, NO_DATA_TEXT};
use crate::reports::ReportOutput;
use crate::tui::theme::Theme;

use super::report_list::truncate;

/// Rows start below the column header line
const ROWS_TOP: u16 = 1;
const MAX_LABEL_WIDTH: usize = 28;
const BAR_CHAR: &str = "█";

/// One previewed row with the tooltip its chart mark carries
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewItem {
    pub label: String,
    pub value: f64,
    pub display: String,
    pub tooltip: TooltipContent,
}

impl PreviewItem {
    pub fn collect(output: &ReportOutput) -> Vec<Self> {
        let bar_tooltips: Vec<&TooltipContent> = match &output.chart {
            Chart::Bar(chart) => chart.bars.iter().map(|b| &b.tooltip).collect(),
            _ => Vec::new(),
        };

        output
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| PreviewItem {
                label: row.label.clone(),
                value: row.value,
                display: row.display.clone(),
                tooltip: bar_tooltips
                    .get(i)
                    .map(|t| (*t).clone())
                    .unwrap_or_else(|| TooltipContent::new(&row.label).line(&row.display)),
            })
            .collect()
    }
}

/// Geometry of the bar rows inside the preview block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsLayout {
    pub area: Rect,
    pub label_width: u16,
    pub bar_width: u16,
}

impl RowsLayout {
    /// `inner` is the block interior; `summary_lines` are reserved at the bottom
    pub fn new(inner: Rect, items: &[PreviewItem], summary_lines: usize) -> Self {
        let reserved = if summary_lines > 0 {
            summary_lines as u16 + 1
        } else {
            0
        };
        let height = inner
            .height
            .saturating_sub(ROWS_TOP + reserved)
            .min(items.len() as u16);

        let longest_label = items
            .iter()
            .map(|i| i.label.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_WIDTH) as u16;
        let longest_display = items
            .iter()
            .map(|i| i.display.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let label_width = longest_label.min(inner.width / 3);
        let bar_width = inner
            .width
            .saturating_sub(label_width + longest_display + 2);

        Self {
            area: Rect {
                x: inner.x,
                y: inner.y + ROWS_TOP,
                width: inner.width,
                height,
            },
            label_width,
            bar_width,
        }
    }

    /// Index of the row under a terminal cell, if any
    pub fn item_at(&self, column: u16, row: u16) -> Option<usize> {
        let inside = column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height;
        inside.then(|| (row - self.area.y) as usize)
    }

    /// Anchor cell for a row's tooltip: just past its bar
    pub fn anchor(&self, index: usize) -> (u16, u16) {
        (
            self.area.x + self.label_width + 1 + self.bar_width / 2,
            self.area.y + index as u16,
        )
    }
}

/// Number of cells a bar of `value` gets out of `width`
pub fn bar_length(value: f64, max: f64, width: u16) -> u16 {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    ((value / max).min(1.0) * width as f64).round() as u16
}

/// Block framing the preview; shared by the widget and mouse hit-testing
pub fn preview_block(title: &str, theme: Theme) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.muted()))
}

pub struct Preview<'a> {
    output: &'a ReportOutput,
    items: &'a [PreviewItem],
    hovered: Option<usize>,
    theme: Theme,
}

impl<'a> Preview<'a> {
    pub fn new(
        output: &'a ReportOutput,
        items: &'a [PreviewItem],
        hovered: Option<usize>,
        theme: Theme,
    ) -> Self {
        Self {
            output,
            items,
            hovered,
            theme,
        }
    }

    pub fn summary_lines(output: &ReportOutput) -> Vec<String> {
        output.summary.iter().flat_map(|s| s.lines()).collect()
    }
}

impl Widget for Preview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = preview_block(self.output.title(), self.theme);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.output.chart.is_empty() || self.items.is_empty() {
            Message::new(NO_DATA_TEXT, None, self.theme.muted(), self.theme).render(inner, buf);
            return;
        }

        let summary = Self::summary_lines(self.output);
        let layout = RowsLayout::new(inner, self.items, summary.len());
        let max = self
            .items
            .iter()
            .map(|i| i.value)
            .fold(0.0_f64, f64::max);

        let header = format!("{} rows", self.items.len());
        buf.set_string(
            inner.x,
            inner.y,
            &header,
            Style::default().fg(self.theme.muted()),
        );

        for (i, item) in self.items.iter().take(layout.area.height as usize).enumerate() {
            let y = layout.area.y + i as u16;
            let hovered = self.hovered == Some(i);
            let label_style = if hovered {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text())
            };
            let bar_color = if hovered {
                self.theme.accent()
            } else {
                self.theme.bar()
            };

            let label = truncate(&item.label, layout.label_width as usize);
            let bar = BAR_CHAR.repeat(bar_length(item.value, max, layout.bar_width) as usize);
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<width$} ", label, width = layout.label_width as usize),
                    label_style,
                ),
                Span::styled(bar, Style::default().fg(bar_color)),
                Span::raw(" "),
                Span::styled(item.display.clone(), Style::default().fg(self.theme.value())),
            ]);
            buf.set_line(layout.area.x, y, &line, layout.area.width);
        }

        let summary_top = layout.area.y + layout.area.height + 1;
        for (i, text) in summary.iter().enumerate() {
            let y = summary_top + i as u16;
            if y >= inner.y + inner.height {
                break;
            }
            buf.set_stringn(
                inner.x,
                y,
                text,
                inner.width as usize,
                Style::default().fg(self.theme.header()),
            );
        }
    }
}

/// Centered one or two line notice inside the preview block
pub struct Message<'a> {
    text: &'a str,
    detail: Option<&'a str>,
    color: ratatui::style::Color,
    theme: Theme,
}

impl<'a> Message<'a> {
    pub fn new(
        text: &'a str,
        detail: Option<&'a str>,
        color: ratatui::style::Color,
        theme: Theme,
    ) -> Self {
        Self {
            text,
            detail,
            color,
            theme,
        }
    }

    /// The visible fallback for a report whose data could not be loaded
    pub fn load_failure(detail: &'a str, theme: Theme) -> Self {
        Self::new(LOAD_ERROR_TEXT, Some(detail), theme.error(), theme)
    }
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let y = area.y + area.height / 2;
        Paragraph::new(Line::from(Span::styled(
            self.text,
            Style::default().fg(self.color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(Rect { y, height: 1, ..area }, buf);

        if let Some(detail) = self.detail {
            if y + 1 < area.y + area.height {
                Paragraph::new(Line::from(Span::styled(
                    detail,
                    Style::default().fg(self.theme.muted()),
                )))
                .alignment(Alignment::Center)
                .render(Rect { y: y + 1, height: 1, ..area }, buf);
            }
        }
    }
}

/// Hover tooltip popup drawn next to a preview row
pub struct TooltipPopup<'a> {
    content: &'a TooltipContent,
    theme: Theme,
}

impl<'a> TooltipPopup<'a> {
    pub fn new(content: &'a TooltipContent, theme: Theme) -> Self {
        Self { content, theme }
    }

    /// Place the popup one row under `anchor`, kept inside `bounds`
    pub fn area_near(content: &TooltipContent, anchor: (u16, u16), bounds: Rect) -> Rect {
        let text_width = std::iter::once(&content.title)
            .chain(content.lines.iter())
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let width = (text_width + 4).min(bounds.width);
        let height = (content.lines.len() as u16 + 3).min(bounds.height);

        let right = bounds.x + bounds.width;
        let bottom = bounds.y + bounds.height;
        let x = anchor.0.min(right.saturating_sub(width)).max(bounds.x);
        let below = anchor.1 + 1;
        let y = if below + height <= bottom {
            below
        } else {
            anchor.1.saturating_sub(height).max(bounds.y)
        };
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Widget for TooltipPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from(Span::styled(
            self.content.title.as_str(),
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        ))];
        lines.extend(self.content.lines.iter().map(|l| {
            Line::from(Span::styled(
                l.as_str(),
                Style::default().fg(self.theme.value()),
            ))
        }));
        Paragraph::new(lines).render(
            Rect {
                x: inner.x + 1,
                width: inner.width.saturating_sub(1),
                ..inner
            },
            buf,
        );
    }
}
