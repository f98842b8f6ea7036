//! In-memory drawing surface
//!
//! Shapes use absolute coordinates in the canvas's pixel space. A canvas is
//! cleared before every draw, so drawing the same chart twice leaves one
//! copy of it.

use serde::Serialize;

use super::color::TEXT_COLOR;
use super::tooltip::TooltipContent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub size: f64,
    pub bold: bool,
    pub fill: String,
    pub anchor: Anchor,
    /// Rotation in degrees around `(x, y)`
    pub rotate: Option<f64>,
}

impl Text {
    pub fn new(x: f64, y: f64, content: impl Into<String>) -> Self {
        Self {
            x,
            y,
            content: content.into(),
            size: 11.0,
            bold: false,
            fill: TEXT_COLOR.into(),
            anchor: Anchor::Start,
            rotate: None,
        }
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub opacity: f64,
    pub stroke: Option<String>,
    pub class: Option<String>,
    pub tooltip: Option<TooltipContent>,
}

impl Rect {
    /// Negative sizes are clamped to zero
    pub fn new(x: f64, y: f64, width: f64, height: f64, fill: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
            fill: fill.into(),
            opacity: 1.0,
            stroke: None,
            class: None,
            tooltip: None,
        }
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn tooltip(mut self, tooltip: TooltipContent) -> Self {
        self.tooltip = Some(tooltip);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
    pub class: Option<String>,
    pub tooltip: Option<TooltipContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: String,
    pub width: f64,
}

/// Open polyline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub points: Vec<(f64, f64)>,
    pub stroke: String,
    pub width: f64,
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Path(Path),
    Text(Text),
}

impl Element {
    /// Data marks, as opposed to axes and labels
    pub fn is_mark(&self) -> bool {
        matches!(self, Self::Rect(_) | Self::Circle(_) | Self::Path(_))
    }

    pub fn tooltip(&self) -> Option<&TooltipContent> {
        match self {
            Self::Rect(r) => r.tooltip.as_ref(),
            Self::Circle(c) => c.tooltip.as_ref(),
            _ => None,
        }
    }
}

impl From<Rect> for Element {
    fn from(v: Rect) -> Self {
        Self::Rect(v)
    }
}

impl From<Circle> for Element {
    fn from(v: Circle) -> Self {
        Self::Circle(v)
    }
}

impl From<Line> for Element {
    fn from(v: Line) -> Self {
        Self::Line(v)
    }
}

impl From<Path> for Element {
    fn from(v: Path) -> Self {
        Self::Path(v)
    }
}

impl From<Text> for Element {
    fn from(v: Text) -> Self {
        Self::Text(v)
    }
}

/// One chart container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    title: Option<String>,
    elements: Vec<Element>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            title: None,
            elements: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.title = None;
        self.elements.clear();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_blank(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn mark_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_mark()).count()
    }

    /// All text content, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t.content.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }
}
