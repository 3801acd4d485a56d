//! # Label Renderer
//!
//! Binds one label record to one resolved layout and issues the canvas
//! calls in a fixed, deterministic order: border and separator, partition
//! grid, text bindings, symbol bindings, commit. The order is what the
//! visual-regression comparisons key on, so it never varies.
//!
//! Symbol encoding failures are recovered locally: the affected region is
//! left blank, a warning is logged, and the rest of the label still
//! renders. Only template-geometry and canvas failures abort a render.

use crate::canvas::Canvas;
use crate::error::LabelError;
use crate::model::LabelData;
use crate::symbol::SymbolEncoder;
use crate::template::{LayoutTemplate, Point};

/// Renders label records through a symbol encoder onto a canvas.
///
/// Stateless apart from the encoder; one renderer may serve any number of
/// sequential or parallel render calls, each with its own canvas.
#[derive(Debug, Clone, Default)]
pub struct LabelRenderer<E> {
    encoder: E,
}

impl<E: SymbolEncoder> LabelRenderer<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    /// Render one label onto `canvas` and commit it.
    pub fn render<C: Canvas>(
        &self,
        data: &LabelData,
        template: &LayoutTemplate,
        canvas: &mut C,
    ) -> Result<(), LabelError> {
        let regions = template.resolve()?;

        // 1. Page border, then the separator in front of the guideline
        // column when the template has one.
        canvas.draw_rect(regions.page);
        if let Some(guide) = regions.guide_column {
            canvas.draw_line(
                Point::new(guide.x, regions.page.y),
                Point::new(guide.x, regions.page.top()),
            );
        }

        // 2. Partition grid.
        for (_, rect) in regions.cells() {
            canvas.draw_rect(rect);
        }

        // 3. Text bindings, declaration order. Baselines step strictly
        // top-to-bottom within a binding.
        for binding in template.field_bindings() {
            let text = binding.source.resolve(data);
            let region = regions.get(binding.region);
            let mut baseline = region.top() - binding.dy;
            for line in text.split('\n') {
                canvas.draw_text(
                    Point::new(region.x + binding.dx, baseline),
                    binding.font,
                    line,
                );
                baseline -= binding.line_step;
            }
        }

        // 4. Symbol bindings, declaration order. An unencodable payload
        // skips its own region only.
        for binding in template.symbol_bindings() {
            let mut payload = binding.source.resolve(data);
            if binding.strip_whitespace {
                payload.retain(|c| !c.is_whitespace());
            }
            let target = binding.fit.target_rect(regions.get(binding.region));
            let width = encoder_extent(target.width);
            let height = encoder_extent(target.height);
            match self.encoder.encode(&payload, binding.symbology, width, height) {
                Ok(bitmap) => canvas.draw_image(target, &bitmap),
                Err(e) => log::warn!("leaving {:?} region blank: {}", binding.region, e),
            }
        }

        // 5. Commit; canvas failure is fatal, there is no partial output.
        canvas.commit()?;
        Ok(())
    }
}

/// Encoder pixel extents: nearest integer, never below 1.
fn encoder_extent(v: f64) -> u32 {
    (v.round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasError, DrawOp, FontSpec, Recorder};
    use crate::symbol::{Bitmap, CodeEncoder, EncodingError, Symbology};
    use crate::template::Rect;
    use std::cell::RefCell;

    /// Records every encode request and returns a blank bitmap.
    #[derive(Default)]
    struct SpyEncoder {
        requests: RefCell<Vec<(Symbology, String, u32, u32)>>,
    }

    impl SymbolEncoder for SpyEncoder {
        fn encode(
            &self,
            payload: &str,
            symbology: Symbology,
            width: u32,
            height: u32,
        ) -> Result<Bitmap, EncodingError> {
            self.requests
                .borrow_mut()
                .push((symbology, payload.to_string(), width, height));
            Ok(Bitmap::new(width, height))
        }
    }

    /// Fails every 2-D request, delegates linear requests.
    struct MatrixRejector;

    impl SymbolEncoder for MatrixRejector {
        fn encode(
            &self,
            payload: &str,
            symbology: Symbology,
            width: u32,
            height: u32,
        ) -> Result<Bitmap, EncodingError> {
            match symbology {
                Symbology::Matrix2D => Err(EncodingError::Rejected {
                    symbology,
                    reason: "payload exceeds capacity".to_string(),
                }),
                Symbology::Linear => CodeEncoder.encode(payload, symbology, width, height),
            }
        }
    }

    /// A canvas whose commit always fails.
    #[derive(Default)]
    struct BrokenCommit;

    impl Canvas for BrokenCommit {
        fn draw_rect(&mut self, _rect: Rect) {}
        fn draw_line(&mut self, _from: Point, _to: Point) {}
        fn draw_text(&mut self, _anchor: Point, _font: FontSpec, _text: &str) {}
        fn draw_image(&mut self, _rect: Rect, _bitmap: &Bitmap) {}
        fn commit(&mut self) -> Result<(), CanvasError> {
            Err(CanvasError::AlreadyCommitted)
        }
    }

    fn sample_data() -> LabelData {
        LabelData::from_json(
            r#"{
                "partNumber": "PT00001234-A",
                "quantity": "1000",
                "licensePlateNumber": "1J5124509271900001",
                "qrPayload": "QR_DATA"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn two_renders_produce_identical_sequences() {
        let renderer = LabelRenderer::new(CodeEncoder);
        let template = LayoutTemplate::six_by_four_compact();
        let data = sample_data();

        let mut first = Recorder::new();
        let mut second = Recorder::new();
        renderer.render(&data, &template, &mut first).unwrap();
        renderer.render(&data, &template, &mut second).unwrap();

        assert_eq!(first.ops, second.ops);
    }

    #[test]
    fn border_and_grid_precede_content() {
        let renderer = LabelRenderer::new(CodeEncoder);
        let template = LayoutTemplate::six_by_four_compact();
        let mut canvas = Recorder::new();
        renderer
            .render(&sample_data(), &template, &mut canvas)
            .unwrap();

        let regions = template.resolve().unwrap();
        assert_eq!(canvas.ops[0], DrawOp::Rect(regions.page));
        assert!(matches!(canvas.ops[1], DrawOp::Line(_, _)));
        // Nine partition cells before any text.
        for op in &canvas.ops[2..11] {
            assert!(matches!(op, DrawOp::Rect(_)));
        }
        assert!(matches!(canvas.ops[11], DrawOp::Text { .. }));
        assert_eq!(*canvas.ops.last().unwrap(), DrawOp::Commit);
    }

    #[test]
    fn empty_record_renders_every_default() {
        let renderer = LabelRenderer::new(CodeEncoder);
        let template = LayoutTemplate::six_by_four_compact();
        let mut canvas = Recorder::new();
        renderer
            .render(&LabelData::default(), &template, &mut canvas)
            .unwrap();

        let texts = canvas.texts();
        for expected in [
            "SHIP FROM:",
            "XYZ COMPANY",
            "SHIP TO:",
            "ACME ASSEMBLY",
            "PT00001234-A",
            "DESCRIPTION",
            "FOG LAMP FR FASCIA, RR",
            "PO NO: 5500000001",
            "LOT: 123456789012345",
        ] {
            assert!(
                texts.iter().any(|t| *t == expected),
                "missing text {:?}",
                expected
            );
        }
        // All four symbols drew.
        assert_eq!(canvas.images().len(), 4);
    }

    #[test]
    fn address_lines_step_by_the_binding_line_step() {
        let renderer = LabelRenderer::new(CodeEncoder);
        let template = LayoutTemplate::six_by_four_compact();
        let mut canvas = Recorder::new();
        let data = LabelData::from_json(
            r#"{"shipFrom": {"address": "345 SOUTH STREET\nPLYMOUTH, MI 48170"}}"#,
        )
        .unwrap();
        renderer.render(&data, &template, &mut canvas).unwrap();

        let mut lines = canvas.ops.iter().filter_map(|op| match op {
            DrawOp::Text { anchor, text, .. }
                if text == "345 SOUTH STREET" || text == "PLYMOUTH, MI 48170" =>
            {
                Some(*anchor)
            }
            _ => None,
        });
        let street = lines.next().expect("street line drawn");
        let city = lines.next().expect("city line drawn");
        assert!((street.y - city.y - 9.0).abs() < 1e-9);
        assert!((street.x - city.x).abs() < 1e-9);
    }

    #[test]
    fn whitespace_is_stripped_for_part_number_only() {
        let encoder = SpyEncoder::default();
        let template = LayoutTemplate::six_by_four_compact();
        let data = LabelData::from_json(
            r#"{
                "partNumber": "PT 00001234 A",
                "quantity": "10 00",
                "licensePlateNumber": "1J 512450927 1900001"
            }"#,
        )
        .unwrap();
        let renderer = LabelRenderer::new(encoder);
        let mut canvas = Recorder::new();
        renderer.render(&data, &template, &mut canvas).unwrap();

        let requests = renderer.encoder.requests.borrow();
        let payload_for = |symbology, index: usize| -> String {
            requests
                .iter()
                .filter(|(s, ..)| *s == symbology)
                .nth(index)
                .map(|(_, p, ..)| p.clone())
                .unwrap()
        };
        // Linear order: part, quantity, LPN.
        assert_eq!(payload_for(Symbology::Linear, 0), "PT00001234A");
        assert_eq!(payload_for(Symbology::Linear, 1), "10 00");
        assert_eq!(payload_for(Symbology::Linear, 2), "1J 512450927 1900001");
    }

    #[test]
    fn encoder_dimensions_are_rounded_and_positive() {
        let encoder = SpyEncoder::default();
        let template = LayoutTemplate::six_by_four_compact();
        let renderer = LabelRenderer::new(encoder);
        let mut canvas = Recorder::new();
        renderer
            .render(&sample_data(), &template, &mut canvas)
            .unwrap();

        let regions = template.resolve().unwrap();
        let requests = renderer.encoder.requests.borrow();
        let (_, _, qr_w, qr_h) = &requests[0];
        let side = (regions.symbol.width - 12.0).min(regions.symbol.height - 16.0);
        assert_eq!(*qr_w, side.round() as u32);
        assert_eq!(qr_w, qr_h);
        assert!(requests.iter().all(|(_, _, w, h)| *w >= 1 && *h >= 1));
    }

    #[test]
    fn qr_target_is_square_in_the_symbol_region() {
        let renderer = LabelRenderer::new(CodeEncoder);
        let template = LayoutTemplate::six_by_four_compact();
        let mut canvas = Recorder::new();
        renderer
            .render(&sample_data(), &template, &mut canvas)
            .unwrap();

        let regions = template.resolve().unwrap();
        let qr = canvas.images()[0];
        let side = (regions.symbol.width - 12.0).min(regions.symbol.height - 16.0);
        assert!((qr.width - side).abs() < 1e-9);
        assert!((qr.height - side).abs() < 1e-9);
    }

    #[test]
    fn part_barcode_spans_ship_columns_minus_padding() {
        let renderer = LabelRenderer::new(CodeEncoder);
        let template = LayoutTemplate::six_by_four_compact();
        let mut canvas = Recorder::new();
        renderer
            .render(&sample_data(), &template, &mut canvas)
            .unwrap();

        let regions = template.resolve().unwrap();
        let part = canvas.images()[1];
        let expected = regions.ship_from.width + regions.ship_to.width - 28.0;
        assert!((part.width - expected).abs() < 1e-9);
    }

    #[test]
    fn rejected_symbol_leaves_region_blank_and_render_completes() {
        let renderer = LabelRenderer::new(MatrixRejector);
        let template = LayoutTemplate::six_by_four_compact();
        let mut canvas = Recorder::new();
        renderer
            .render(&sample_data(), &template, &mut canvas)
            .unwrap();

        // The three linear codes drew; the QR region stayed blank.
        assert_eq!(canvas.images().len(), 3);
        assert_eq!(*canvas.ops.last().unwrap(), DrawOp::Commit);
        // Text content is unaffected.
        assert!(canvas.texts().iter().any(|t| *t == "SHIP FROM:"));
    }

    #[test]
    fn canvas_commit_failure_is_fatal() {
        let renderer = LabelRenderer::new(CodeEncoder);
        let template = LayoutTemplate::six_by_four_compact();
        let mut canvas = BrokenCommit;
        let result = renderer.render(&sample_data(), &template, &mut canvas);
        assert!(matches!(result, Err(LabelError::Canvas(_))));
    }

    #[test]
    fn degenerate_template_aborts_before_drawing() {
        let renderer = LabelRenderer::new(CodeEncoder);
        let mut template = LayoutTemplate::six_by_four_compact();
        template.rows.lower = 500.0;
        let mut canvas = Recorder::new();
        let result = renderer.render(&sample_data(), &template, &mut canvas);
        assert!(matches!(result, Err(LabelError::Template(_))));
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn a4_render_completes_with_all_symbols() {
        let renderer = LabelRenderer::new(CodeEncoder);
        let template = LayoutTemplate::a4_document();
        let mut canvas = Recorder::new();
        renderer
            .render(&sample_data(), &template, &mut canvas)
            .unwrap();
        assert_eq!(canvas.images().len(), 4);
        // No guideline separator on the document variant.
        assert!(!canvas.ops.iter().any(|op| matches!(op, DrawOp::Line(_, _))));
    }
}
