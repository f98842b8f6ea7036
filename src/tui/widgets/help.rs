//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 46;
const POPUP_HEIGHT: u16 = 17;

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }

    fn section(&self, title: &'static str, area: Rect, buf: &mut Buffer) {
        let header = Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(self.theme.header())
                .add_modifier(Modifier::BOLD),
        )]);
        Paragraph::new(header)
            .alignment(Alignment::Left)
            .render(area, buf);
    }

    fn separator(&self, area: Rect, buf: &mut Buffer) {
        let sep = "─".repeat(area.width as usize);
        buf.set_string(area.x, area.y, &sep, Style::default().fg(self.theme.muted()));
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title = format!(" salesviz v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // [0] Padding
            Constraint::Length(1), // [1] Reports header
            Constraint::Length(1), // [2] Separator
            Constraint::Length(1), // [3] Up/Down
            Constraint::Length(1), // [4] Enter / r
            Constraint::Length(1), // [5] Tab
            Constraint::Length(1), // [6] s
            Constraint::Length(1), // [7] Padding
            Constraint::Length(1), // [8] General header
            Constraint::Length(1), // [9] Separator
            Constraint::Length(1), // [10] q/Esc
            Constraint::Length(1), // [11] ?
            Constraint::Length(1), // [12] Padding
            Constraint::Length(1), // [13] Close hint
            Constraint::Min(0),
        ])
        .split(inner);

        self.section("Reports", chunks[1], buf);
        self.separator(chunks[2], buf);
        render_keybinding(chunks[3], buf, "Up/Down or j/k", "Select report", self.theme);
        render_keybinding(chunks[4], buf, "Enter / r", "Run report", self.theme);
        render_keybinding(chunks[5], buf, "Tab / Shift+Tab", "Inspect rows", self.theme);
        render_keybinding(chunks[6], buf, "s", "Save chart as SVG", self.theme);

        self.section("General", chunks[8], buf);
        self.separator(chunks[9], buf);
        render_keybinding(chunks[10], buf, "q / Esc", "Quit", self.theme);
        render_keybinding(chunks[11], buf, "?", "Toggle help", self.theme);

        let hint = Line::from(vec![Span::styled(
            "Press ? to close",
            Style::default().fg(self.theme.muted()),
        )]);
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(chunks[13], buf);
    }
}

/// Render a single keybinding line
fn render_keybinding(area: Rect, buf: &mut Buffer, key: &str, desc: &str, theme: Theme) {
    let line = Line::from(vec![
        Span::styled(
            format!("  {:<18}", key),
            Style::default().fg(theme.accent()),
        ),
        Span::styled(desc, Style::default().fg(theme.text())),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Left)
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_popup_centered_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, POPUP_WIDTH);
        assert_eq!(popup_area.height, POPUP_HEIGHT);
        assert_eq!(popup_area.x, (100 - POPUP_WIDTH) / 2);
        assert_eq!(popup_area.y, (50 - POPUP_HEIGHT) / 2);
    }

    #[test]
    fn test_help_popup_small_terminal() {
        let area = Rect::new(0, 0, 30, 10);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, 30);
        assert_eq!(popup_area.height, 10);
    }

    #[test]
    fn test_help_popup_lists_save_key() {
        let area = Rect::new(0, 0, POPUP_WIDTH, POPUP_HEIGHT);
        let mut buf = Buffer::empty(area);
        HelpPopup::new(Theme::Dark).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Save chart as SVG"));
        assert!(text.contains("salesviz v"));
    }
}
