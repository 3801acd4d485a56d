//! # Placard
//!
//! A deterministic shipping-label rendering engine.
//!
//! Most document generators lay content out dynamically: text reflows,
//! boxes grow, and two runs over the same data can disagree at the pixel
//! level. A container label is the opposite kind of artifact: a scanner
//! and a receiving dock both expect every barcode and every text block at
//! the same coordinates on every print. Placard therefore treats the page
//! as a fixed grid: a template resolves to absolute region rectangles, an
//! ordered list of bindings maps label fields onto those rectangles, and
//! the renderer replays that list identically every time.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON)
//!       ↓
//!   [model]     — LabelData: optional named fields, never-null defaults
//!       ↓
//!   [template]  — LayoutTemplate: page geometry → region rectangles
//!       ↓
//!   [bindings]  — ordered field/symbol bindings (draw order as data)
//!       ↓
//!   [render]    — LabelRenderer: resolve, bind, draw, commit
//!       ↓
//!   [canvas]    — draw primitives; [pdf] serializes the page,
//!                 [symbol] encodes the scannable codes
//! ```
//!
//! Two templates exist: the compact 6"×4" thermal label and the full-page
//! A4 packing document. Both share one renderer; only geometry parameters
//! differ.

pub mod bindings;
pub mod canvas;
pub mod error;
pub mod model;
pub mod pdf;
pub mod render;
pub mod symbol;
pub mod template;

pub use error::LabelError;
pub use model::LabelData;
pub use template::{LayoutTemplate, Variant};

use pdf::PdfCanvas;
use render::LabelRenderer;
use symbol::CodeEncoder;

/// Render a label record to PDF bytes using the production encoder.
///
/// This is the primary entry point: allocates a page sized by the
/// template, renders, commits, and returns the page bytes.
pub fn render_to_pdf(
    data: &LabelData,
    template: &LayoutTemplate,
) -> Result<Vec<u8>, LabelError> {
    let (width, height) = template.page_size();
    let mut canvas = PdfCanvas::new(width, height)?;
    let renderer = LabelRenderer::new(CodeEncoder);
    renderer.render(data, template, &mut canvas)?;
    Ok(canvas.into_bytes()?)
}

/// Parse a label-data document (plain or legacy feed shape) and render it
/// to PDF bytes.
pub fn render_json(json: &str, template: &LayoutTemplate) -> Result<Vec<u8>, LabelError> {
    let data = LabelData::from_json(json)?;
    render_to_pdf(&data, template)
}
