//! Hover tooltip state
//!
//! One `Tooltip` lives in each render context. Marks carry a
//! [`TooltipContent`]; the host (SVG script or terminal preview) decides
//! when to show it.

use serde::Serialize;

use super::format::escape_xml;

/// Tooltip position relative to the pointer
pub const TOOLTIP_OFFSET: (f64, f64) = (15.0, -28.0);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bold heading plus detail lines
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TooltipContent {
    pub title: String,
    pub lines: Vec<String>,
}

impl TooltipContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Markup for the HTML overlay, every piece escaped
    pub fn to_html(&self) -> String {
        let mut html = format!("<b>{}</b>", escape_xml(&self.title));
        for line in &self.lines {
            html.push_str("<br/>");
            html.push_str(&escape_xml(line));
        }
        html
    }

    /// Newline-separated text for `<title>` and terminal output
    pub fn to_plain(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    content: Option<TooltipContent>,
    position: (f64, f64),
    visible: bool,
}

impl Tooltip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, content: TooltipContent, pointer: Pointer) {
        self.content = Some(content);
        self.position = (pointer.x + TOOLTIP_OFFSET.0, pointer.y + TOOLTIP_OFFSET.1);
        self.visible = true;
    }

    /// Hide and forget the content; called when a hover ends and around report runs
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        if self.visible {
            self.content.as_ref()
        } else {
            None
        }
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> TooltipContent {
        TooltipContent::new("[THO] Trà Hoa")
            .line("Doanh thu: 1,180,000 VNĐ")
            .line("Số lượng: 11")
    }

    #[test]
    fn test_show_applies_offset() {
        let mut tooltip = Tooltip::new();
        tooltip.show(content(), Pointer::new(100.0, 200.0));

        assert!(tooltip.is_visible());
        assert_eq!(tooltip.position(), (115.0, 172.0));
        assert_eq!(tooltip.content().unwrap().title, "[THO] Trà Hoa");
    }

    #[test]
    fn test_reset_hides_and_clears() {
        let mut tooltip = Tooltip::new();
        tooltip.show(content(), Pointer::new(1.0, 1.0));
        tooltip.reset();

        assert!(!tooltip.is_visible());
        assert!(tooltip.content().is_none());
        assert_eq!(tooltip.position(), (0.0, 0.0));
        assert_eq!(tooltip, Tooltip::default());
    }

    #[test]
    fn test_to_html_escapes() {
        let html = TooltipContent::new("A<B").line("x & y").to_html();
        assert_eq!(html, "<b>A&lt;B</b><br/>x &amp; y");
    }

    #[test]
    fn test_to_plain() {
        assert_eq!(
            content().to_plain(),
            "[THO] Trà Hoa\nDoanh thu: 1,180,000 VNĐ\nSố lượng: 11"
        );
    }
}
