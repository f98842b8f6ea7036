//! Report picker list

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::reports::ReportId;
use crate::tui::theme::Theme;

/// Width of the list column, borders included
pub const LIST_WIDTH: u16 = 40;

pub struct ReportList {
    selected: usize,
    /// Report currently shown in the preview, if any
    active: Option<ReportId>,
    theme: Theme,
}

impl ReportList {
    pub fn new(selected: usize, active: Option<ReportId>, theme: Theme) -> Self {
        Self {
            selected,
            active,
            theme,
        }
    }

    /// First visible index so that `selected` stays on screen
    pub fn scroll_offset(selected: usize, visible: usize) -> usize {
        if visible == 0 {
            return 0;
        }
        selected.saturating_sub(visible - 1)
    }
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

impl Widget for ReportList {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Reports ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted()));
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = inner.height as usize;
        let offset = Self::scroll_offset(self.selected, visible);
        let label_width = inner.width.saturating_sub(6) as usize;

        for (row, (index, id)) in ReportId::all()
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let y = inner.y + row as u16;
            let selected = index == self.selected;
            let marker = if selected { '▶' } else { ' ' };
            let dot = if self.active == Some(*id) { '•' } else { ' ' };
            let text = format!(
                "{}{}{:>2} {}",
                marker,
                dot,
                id.number(),
                truncate(id.title(), label_width)
            );

            let style = if selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text())
            };
            buf.set_stringn(inner.x, y, &text, inner.width as usize, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Doanh số", 20), "Doanh số");
        assert_eq!(truncate("Doanh số bán hàng", 6), "Doanh…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(ReportList::scroll_offset(0, 5), 0);
        assert_eq!(ReportList::scroll_offset(4, 5), 0);
        assert_eq!(ReportList::scroll_offset(7, 5), 3);
        assert_eq!(ReportList::scroll_offset(3, 0), 0);
    }

    #[test]
    fn test_render_marks_selected_report() {
        let area = Rect::new(0, 0, LIST_WIDTH, 14);
        let mut buf = Buffer::empty(area);
        ReportList::new(2, None, Theme::Dark).render(area, &mut buf);

        let row: String = (0..area.width)
            .map(|x| buf[(x, 3)].symbol().to_string())
            .collect();
        assert!(row.contains("▶"));
        assert!(row.contains(" 3 Doanh số bán hàng theo Tháng"));
    }
}
