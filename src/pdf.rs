//! # PDF Canvas
//!
//! A from-scratch PDF 1.7 backend for the [`Canvas`] trait. We write the
//! raw bytes ourselves because one bordered page of rectangles, text runs,
//! and monochrome images needs only a small, fully controlled subset of
//! the format, and a hand-rolled writer keeps the output byte-for-byte
//! deterministic, which the regression tests rely on.
//!
//! ## Structure
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- Catalog, Pages, fonts, images, content, page
//! ...
//! xref                <- byte offsets of each object
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Fonts are the standard Type1 Helvetica faces, referenced by name, no
//! embedding. Symbol bitmaps become 8-bit /DeviceGray image XObjects;
//! content streams and image data are Flate-compressed.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::canvas::{Canvas, CanvasError, FontFamily, FontSpec};
use crate::symbol::Bitmap;
use crate::template::{Point, Rect};

const FONTS: [FontFamily; 3] = [
    FontFamily::Helvetica,
    FontFamily::HelveticaBold,
    FontFamily::HelveticaOblique,
];

/// A grayscale image pending XObject registration.
struct PendingImage {
    width: u32,
    height: u32,
    gray: Vec<u8>,
}

/// A single-page PDF drawing surface.
///
/// Owned by exactly one render call: allocate, draw, [`Canvas::commit`],
/// then take the bytes with [`PdfCanvas::into_bytes`].
pub struct PdfCanvas {
    width: f64,
    height: f64,
    content: String,
    images: Vec<PendingImage>,
    fonts_used: [bool; 3],
    finished: Option<Vec<u8>>,
}

impl PdfCanvas {
    /// Allocate a page. Fails on non-positive dimensions, the canvas
    /// equivalent of an allocation failure.
    pub fn new(width: f64, height: f64) -> Result<Self, CanvasError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(CanvasError::InvalidPageSize { width, height });
        }
        Ok(Self {
            width,
            height,
            content: String::new(),
            images: Vec::new(),
            fonts_used: [false; 3],
            finished: None,
        })
    }

    /// The committed page bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>, CanvasError> {
        self.finished.ok_or(CanvasError::NotCommitted)
    }

    fn font_index(family: FontFamily) -> usize {
        FONTS.iter().position(|f| *f == family).unwrap_or(0)
    }

    /// Escape a string for a PDF literal string object. Characters outside
    /// printable ASCII fall back to `?`; label content is ASCII by
    /// construction.
    fn escape_text(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '(' => out.push_str("\\("),
                ')' => out.push_str("\\)"),
                ' '..='~' => out.push(ch),
                _ => out.push('?'),
            }
        }
        out
    }

    /// Assemble the final byte stream: objects, xref, trailer.
    fn serialize(&self) -> Vec<u8> {
        // Object layout: 1 Catalog, 2 Pages, then one object per used
        // font, one per image, then the content stream, then the page.
        let font_ids: Vec<Option<usize>> = {
            let mut next = 3;
            self.fonts_used
                .iter()
                .map(|used| {
                    if *used {
                        let id = next;
                        next += 1;
                        Some(id)
                    } else {
                        None
                    }
                })
                .collect()
        };
        let used_font_count = font_ids.iter().flatten().count();
        let first_image_id = 3 + used_font_count;
        let content_id = first_image_id + self.images.len();
        let page_id = content_id + 1;
        let object_count = page_id + 1; // including the free object 0

        let mut objects: Vec<(usize, Vec<u8>)> = Vec::new();

        objects.push((1, b"<< /Type /Catalog /Pages 2 0 R >>".to_vec()));
        objects.push((
            2,
            format!("<< /Type /Pages /Kids [{} 0 R] /Count 1 >>", page_id).into_bytes(),
        ));

        for (index, id) in font_ids.iter().enumerate() {
            if let Some(id) = id {
                objects.push((
                    *id,
                    format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} >>",
                        FONTS[index].base_name()
                    )
                    .into_bytes(),
                ));
            }
        }

        for (index, image) in self.images.iter().enumerate() {
            let compressed = compress_to_vec_zlib(&image.gray, 6);
            let mut data = format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceGray /BitsPerComponent 8 \
                 /Filter /FlateDecode /Length {} >>\nstream\n",
                image.width,
                image.height,
                compressed.len()
            )
            .into_bytes();
            data.extend_from_slice(&compressed);
            data.extend_from_slice(b"\nendstream");
            objects.push((first_image_id + index, data));
        }

        let compressed = compress_to_vec_zlib(self.content.as_bytes(), 6);
        let mut content_data = format!(
            "<< /Length {} /Filter /FlateDecode >>\nstream\n",
            compressed.len()
        )
        .into_bytes();
        content_data.extend_from_slice(&compressed);
        content_data.extend_from_slice(b"\nendstream");
        objects.push((content_id, content_data));

        let mut resources = String::from("/Font << ");
        for (index, id) in font_ids.iter().enumerate() {
            if let Some(id) = id {
                let _ = write!(resources, "/F{} {} 0 R ", index, id);
            }
        }
        resources.push_str(">>");
        if !self.images.is_empty() {
            resources.push_str(" /XObject << ");
            for index in 0..self.images.len() {
                let _ = write!(resources, "/Im{} {} 0 R ", index, first_image_id + index);
            }
            resources.push_str(">>");
        }
        objects.push((
            page_id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                self.width, self.height, content_id, resources
            )
            .into_bytes(),
        ));

        let mut output: Vec<u8> = Vec::new();
        let mut offsets = vec![0usize; object_count];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (id, data) in &objects {
            offsets[*id] = output.len();
            let _ = write!(output, "{} 0 obj\n", id);
            output.extend_from_slice(data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", object_count);
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in &offsets[1..] {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            object_count, xref_offset
        );

        output
    }
}

impl Canvas for PdfCanvas {
    fn draw_rect(&mut self, rect: Rect) {
        let _ = write!(
            self.content,
            "{:.2} {:.2} {:.2} {:.2} re\nS\n",
            rect.x, rect.y, rect.width, rect.height
        );
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        let _ = write!(
            self.content,
            "{:.2} {:.2} m\n{:.2} {:.2} l\nS\n",
            from.x, from.y, to.x, to.y
        );
    }

    fn draw_text(&mut self, anchor: Point, font: FontSpec, text: &str) {
        let index = Self::font_index(font.family);
        self.fonts_used[index] = true;
        let _ = write!(
            self.content,
            "BT\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            index,
            font.size,
            anchor.x,
            anchor.y,
            Self::escape_text(text)
        );
    }

    fn draw_image(&mut self, rect: Rect, bitmap: &Bitmap) {
        let mut gray = Vec::with_capacity((bitmap.width() * bitmap.height()) as usize);
        for y in 0..bitmap.height() {
            for x in 0..bitmap.width() {
                gray.push(if bitmap.is_dark(x, y) { 0x00 } else { 0xFF });
            }
        }
        let index = self.images.len();
        self.images.push(PendingImage {
            width: bitmap.width(),
            height: bitmap.height(),
            gray,
        });
        let _ = write!(
            self.content,
            "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
            rect.width, rect.height, rect.x, rect.y, index
        );
    }

    fn commit(&mut self) -> Result<(), CanvasError> {
        if self.finished.is_some() {
            return Err(CanvasError::AlreadyCommitted);
        }
        self.finished = Some(self.serialize());
        Ok(())
    }
}
