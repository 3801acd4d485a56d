//! # Canvas Abstraction
//!
//! The drawing surface the renderer targets: a single fixed-size page that
//! accepts rectangle, line, text, and image primitives and is committed
//! exactly once. [`crate::pdf::PdfCanvas`] is the production backend;
//! [`Recorder`] captures the primitive sequence for tests and alternative
//! backends.
//!
//! Draw calls are infallible; a canvas only fails at page
//! allocation or commit time. A canvas instance is exclusively owned by
//! one render call for its entire lifetime.

use thiserror::Error;

use crate::symbol::Bitmap;
use crate::template::{Point, Rect};

/// The built-in page fonts. No dynamic font loading: labels use the
/// standard Type1 Helvetica faces only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl FontFamily {
    /// The PDF base-font name.
    pub fn base_name(&self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::HelveticaBold => "Helvetica-Bold",
            FontFamily::HelveticaOblique => "Helvetica-Oblique",
        }
    }
}

/// A face and size for one text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    pub size: f64,
}

impl FontSpec {
    pub fn new(family: FontFamily, size: f64) -> Self {
        Self { family, size }
    }
}

/// Page allocation or commit failure. Fatal to the render that owns the
/// canvas; there is no partial output.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("page dimensions must be positive, got {width:.2} x {height:.2}")]
    InvalidPageSize { width: f64, height: f64 },

    #[error("canvas already committed")]
    AlreadyCommitted,

    #[error("canvas was never committed")]
    NotCommitted,
}

/// A single-page drawing surface.
///
/// Implementations persist the page on [`Canvas::commit`]; drawing after
/// commit is a contract violation surfaced at the next commit.
pub trait Canvas {
    /// Stroke a rectangle outline.
    fn draw_rect(&mut self, rect: Rect);

    /// Stroke a straight line.
    fn draw_line(&mut self, from: Point, to: Point);

    /// Draw one line of text with its baseline starting at `anchor`.
    fn draw_text(&mut self, anchor: Point, font: FontSpec, text: &str);

    /// Scale a bitmap into `rect`.
    fn draw_image(&mut self, rect: Rect, bitmap: &Bitmap);

    /// Finalize the page. Exactly once per canvas.
    fn commit(&mut self) -> Result<(), CanvasError>;
}

/// One recorded draw primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect(Rect),
    Line(Point, Point),
    Text {
        anchor: Point,
        font: FontSpec,
        text: String,
    },
    Image {
        rect: Rect,
        bitmap: Bitmap,
    },
    Commit,
}

/// A canvas that records its primitive sequence instead of producing a
/// page. Two renders of the same data and template must record identical
/// sequences; that property is what the regression tests pin down.
#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded text runs, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The recorded image placements, in draw order.
    pub fn images(&self) -> Vec<&Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { rect, .. } => Some(rect),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for Recorder {
    fn draw_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Rect(rect));
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        self.ops.push(DrawOp::Line(from, to));
    }

    fn draw_text(&mut self, anchor: Point, font: FontSpec, text: &str) {
        self.ops.push(DrawOp::Text {
            anchor,
            font,
            text: text.to_string(),
        });
    }

    fn draw_image(&mut self, rect: Rect, bitmap: &Bitmap) {
        self.ops.push(DrawOp::Image {
            rect,
            bitmap: bitmap.clone(),
        });
    }

    fn commit(&mut self) -> Result<(), CanvasError> {
        if self.ops.last() == Some(&DrawOp::Commit) {
            return Err(CanvasError::AlreadyCommitted);
        }
        self.ops.push(DrawOp::Commit);
        Ok(())
    }
}
