//! Neutral renderable-figure representation
//!
//! Generators describe what a chart contains — layers of lines, bands,
//! bars and annotations plus axis/legend text — without touching the
//! plotting backend. The rendering sink consumes this description and
//! draws it with whatever backend it owns.
//!
//! Date coordinates are carried as day numbers (`num_days_from_ce`) so
//! layer data stays purely numeric; a `Date` axis kind tells the renderer
//! to format ticks as calendar years.

use chrono::{Datelike, NaiveDate};

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Stroke style for line-like layers. `dash` is (segment, gap) in pixels;
/// `None` draws a solid line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub color: Color,
    pub width: u32,
    pub dash: Option<(u32, u32)>,
}

/// Horizontal legend placement for the whole figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    UpperLeft,
    LowerRight,
}

/// An explicit legend entry drawn as a color swatch. Used where legend
/// content is not a 1:1 mapping from drawn series (e.g. risk-tier buckets).
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// Horizontal anchoring for annotation text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
}

/// A point series drawn as a (possibly dashed) line
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    pub label: Option<String>,
    pub style: LineStyle,
    pub points: Vec<(f64, f64)>,
}

/// A shaded region between a lower and an upper point sequence
#[derive(Debug, Clone, PartialEq)]
pub struct BandLayer {
    pub label: Option<String>,
    pub color: Color,
    pub opacity: f64,
    pub lower: Vec<(f64, f64)>,
    pub upper: Vec<(f64, f64)>,
}

/// One horizontal bar. `outer_label` is drawn just past the bar end;
/// `inner_label` (if any) is drawn right-aligned inside the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub value: f64,
    pub color: Color,
    pub outer_label: String,
    pub inner_label: Option<String>,
}

/// Horizontal bars, one per category of the figure's category axis,
/// in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayer {
    pub bars: Vec<Bar>,
}

/// Vertical reference line spanning the full y extent
#[derive(Debug, Clone, PartialEq)]
pub struct VLineLayer {
    pub x: f64,
    pub style: LineStyle,
}

/// Free-standing text at a data coordinate, offset in pixels.
/// Multi-line text ('\n'-separated) is stacked downward from the offset.
/// On a category axis the y coordinate is the row index.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub offset: (i32, i32),
    pub color: Color,
    pub size: u32,
    pub bold: bool,
    pub align: HAlign,
}

/// A plot layer, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Line(LineLayer),
    Band(BandLayer),
    HBars(BarLayer),
    VLine(VLineLayer),
    Annotation(Annotation),
}

impl Layer {
    pub fn is_line(&self) -> bool {
        matches!(self, Layer::Line(_))
    }

    pub fn is_band(&self) -> bool {
        matches!(self, Layer::Band(_))
    }

    pub fn is_bars(&self) -> bool {
        matches!(self, Layer::HBars(_))
    }

    pub fn is_vline(&self) -> bool {
        matches!(self, Layer::VLine(_))
    }

    pub fn is_annotation(&self) -> bool {
        matches!(self, Layer::Annotation(_))
    }
}

/// Axis value interpretation
#[derive(Debug, Clone, PartialEq)]
pub enum AxisKind {
    Linear,
    Date,
    Category(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: String,
    /// Fixed (min, max); `None` lets the renderer fit the data.
    pub range: Option<(f64, f64)>,
    pub kind: AxisKind,
}

/// A complete renderable figure
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub subtitle: Option<String>,
    pub width: u32,
    pub height: u32,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub layers: Vec<Layer>,
    pub legend_entries: Vec<LegendEntry>,
    pub legend: LegendPosition,
}

/// Convert a calendar date to the day-number coordinate used by layers
pub fn date_to_day(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}
