//! Loading spinner widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Which half of a report run is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStage {
    Loading,
    Aggregating,
}

impl LoadingStage {
    pub fn message(self) -> &'static str {
        match self {
            Self::Loading => "Loading sales data...",
            Self::Aggregating => "Aggregating report...",
        }
    }
}

/// Loading spinner widget, centered under the report title
pub struct Spinner<'a> {
    frame: usize,
    stage: LoadingStage,
    title: &'a str,
    theme: Theme,
}

impl<'a> Spinner<'a> {
    pub fn new(frame: usize, stage: LoadingStage, title: &'a str, theme: Theme) -> Self {
        Self {
            frame,
            stage,
            title,
            theme,
        }
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }
}

fn centered_x(area: Rect, text: &str) -> u16 {
    let width = text.chars().count() as u16;
    area.x + area.width.saturating_sub(width) / 2
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 24 {
            return;
        }

        let center_y = area.y + area.height / 2;

        let title_y = center_y.saturating_sub(1);
        buf.set_string(
            centered_x(area, self.title),
            title_y,
            self.title,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        let spinner_text = format!("{} {}", self.current_char(), self.stage.message());
        buf.set_string(
            centered_x(area, &spinner_text),
            title_y + 2,
            &spinner_text,
            Style::default().fg(self.theme.accent()),
        );
    }
}
