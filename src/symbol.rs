//! # Symbol Encoding
//!
//! Turns text payloads into scannable-code bitmaps. Two symbologies cover
//! every code on the label: Code 128 for the linear barcodes (part number,
//! quantity, license plate) and a QR matrix code for the 2-D payload.
//!
//! [`SymbolEncoder`] is the seam: the renderer only sees the trait, so
//! tests can substitute failing or recording encoders. [`CodeEncoder`] is
//! the production implementation, built on the `barcoders` and `qrcode`
//! crates.

use std::fmt;

use barcoders::sym::code128::Code128;
use qrcode::QrCode;
use thiserror::Error;

/// The encoding scheme for a scannable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    /// One-dimensional bar pattern (Code 128).
    Linear,
    /// Two-dimensional matrix code (QR).
    Matrix2D,
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbology::Linear => write!(f, "Code 128"),
            Symbology::Matrix2D => write!(f, "QR"),
        }
    }
}

/// The payload cannot be represented in the requested symbology: it
/// exceeds the code's capacity or uses characters outside its set.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("{symbology} encoder rejected payload: {reason}")]
    Rejected { symbology: Symbology, reason: String },
}

/// A rectangular monochrome pixel grid, row 0 at the top.
/// `true` means a dark module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Bitmap {
    /// An all-light bitmap of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set(&mut self, x: u32, y: u32, dark: bool) {
        self.data[y as usize * self.width as usize + x as usize] = dark;
    }

    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

/// Pure text-to-bitmap encoding capability. No shared state.
pub trait SymbolEncoder {
    /// Encode `payload` into a bitmap no larger than `width` × `height`
    /// pixels (both > 0). Linear codes fill the full target; the matrix
    /// code fills a `min(width, height)` square.
    fn encode(
        &self,
        payload: &str,
        symbology: Symbology,
        width: u32,
        height: u32,
    ) -> Result<Bitmap, EncodingError>;
}

/// Production encoder backed by `barcoders` (Code 128) and `qrcode`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeEncoder;

impl SymbolEncoder for CodeEncoder {
    fn encode(
        &self,
        payload: &str,
        symbology: Symbology,
        width: u32,
        height: u32,
    ) -> Result<Bitmap, EncodingError> {
        match symbology {
            Symbology::Linear => encode_code128(payload, width, height),
            Symbology::Matrix2D => encode_qr(payload, width.min(height)),
        }
    }
}

/// Encode a Code 128 bar pattern stretched across `width` × `height`.
///
/// Code 128 needs a character-set prefix; set B covers the full printable
/// ASCII range used by part numbers and license plates.
fn encode_code128(payload: &str, width: u32, height: u32) -> Result<Bitmap, EncodingError> {
    let prefixed = format!("\u{0181}{}", payload);
    let code = Code128::new(&prefixed).map_err(|e| EncodingError::Rejected {
        symbology: Symbology::Linear,
        reason: e.to_string(),
    })?;
    let modules = code.encode();
    if modules.is_empty() {
        return Err(EncodingError::Rejected {
            symbology: Symbology::Linear,
            reason: "empty bar pattern".to_string(),
        });
    }

    // Nearest-module sampling: each output column takes the module its
    // center falls into, so the pattern always spans the full width.
    let mut bitmap = Bitmap::new(width, height);
    for x in 0..width {
        let module = (x as usize * modules.len()) / width as usize;
        if modules[module] == 1 {
            for y in 0..height {
                bitmap.set(x, y, true);
            }
        }
    }
    Ok(bitmap)
}

/// Encode a QR matrix scaled to a `side` × `side` square.
fn encode_qr(payload: &str, side: u32) -> Result<Bitmap, EncodingError> {
    let code = QrCode::new(payload).map_err(|e| EncodingError::Rejected {
        symbology: Symbology::Matrix2D,
        reason: e.to_string(),
    })?;
    let n = code.width();

    let mut bitmap = Bitmap::new(side, side);
    for y in 0..side {
        let my = (y as usize * n) / side as usize;
        for x in 0..side {
            let mx = (x as usize * n) / side as usize;
            if code[(mx, my)] == qrcode::Color::Dark {
                bitmap.set(x, y, true);
            }
        }
    }
    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_fills_requested_size() {
        let bitmap = CodeEncoder
            .encode("1000", Symbology::Linear, 120, 36)
            .unwrap();
        assert_eq!(bitmap.width(), 120);
        assert_eq!(bitmap.height(), 36);
    }

    #[test]
    fn linear_columns_are_uniform_bars() {
        let bitmap = CodeEncoder
            .encode("PT00001234-A", Symbology::Linear, 143, 36)
            .unwrap();
        let mut darks = 0;
        for x in 0..bitmap.width() {
            let top = bitmap.is_dark(x, 0);
            for y in 1..bitmap.height() {
                assert_eq!(bitmap.is_dark(x, y), top, "column {} not uniform", x);
            }
            if top {
                darks += 1;
            }
        }
        assert!(darks > 0 && darks < bitmap.width());
    }

    #[test]
    fn linear_rejects_out_of_set_characters() {
        let result = CodeEncoder.encode("BAD\u{2603}PAYLOAD", Symbology::Linear, 100, 36);
        assert!(matches!(
            result,
            Err(EncodingError::Rejected {
                symbology: Symbology::Linear,
                ..
            })
        ));
    }

    #[test]
    fn qr_uses_the_smaller_dimension() {
        let bitmap = CodeEncoder
            .encode("QR_DATA", Symbology::Matrix2D, 100, 60)
            .unwrap();
        assert_eq!(bitmap.width(), 60);
        assert_eq!(bitmap.height(), 60);
    }

    #[test]
    fn qr_has_dark_and_light_modules() {
        let bitmap = CodeEncoder
            .encode("QR_DATA", Symbology::Matrix2D, 78, 78)
            .unwrap();
        let mut dark = 0u32;
        let mut light = 0u32;
        for y in 0..bitmap.height() {
            for x in 0..bitmap.width() {
                if bitmap.is_dark(x, y) {
                    dark += 1;
                } else {
                    light += 1;
                }
            }
        }
        assert!(dark > 0);
        assert!(light > 0);
    }

    #[test]
    fn qr_rejects_payload_over_capacity() {
        let payload = "A".repeat(8000);
        let result = CodeEncoder.encode(&payload, Symbology::Matrix2D, 80, 80);
        assert!(matches!(
            result,
            Err(EncodingError::Rejected {
                symbology: Symbology::Matrix2D,
                ..
            })
        ));
    }
}
