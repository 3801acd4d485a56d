//! # Field and Symbol Bindings
//!
//! The draw order of a label is data, not control flow: each template
//! declares an ordered list of [`FieldBinding`]s (text) and
//! [`SymbolBinding`]s (scannable codes), and the renderer simply iterates
//! them. That makes the output sequence a testable contract.
//!
//! A binding's source resolves against the label record; empty or missing
//! fields substitute the binding's default string, so resolution is total
//! and rendering never branches on absence.

use crate::canvas::{FontFamily, FontSpec};
use crate::model::{Field, LabelData};
use crate::symbol::Symbology;
use crate::template::{LayoutTemplate, Rect, RegionId};

// Template-supplied defaults, substituted for missing or empty fields.
const DEFAULT_SHIP_FROM_NAME: &str = "XYZ COMPANY";
const DEFAULT_SHIP_FROM_ADDRESS: &str = "345 SOUTH STREET\nPLYMOUTH, MI 48170";
const DEFAULT_SHIP_TO_NAME: &str = "ACME ASSEMBLY";
const DEFAULT_SHIP_TO_ADDRESS: &str = "100 PLANT PARKWAY\nDETROIT, MI 48201";
const DEFAULT_PART_NUMBER: &str = "PT00001234-A";
const DEFAULT_PART_DESCRIPTION: &str = "FOG LAMP FR FASCIA, RR";
const DEFAULT_QUANTITY: &str = "1000";
const DEFAULT_UNIT_OF_MEASURE: &str = "EA";
const DEFAULT_PO_NUMBER: &str = "5500000001";
const DEFAULT_PO_LINE_NUMBER: &str = "00010";
const DEFAULT_LOT_NUMBER: &str = "123456789012345";
const DEFAULT_PRODUCTION_DATE: &str = "2022-10-22";
const DEFAULT_EXPIRATION_DATE: &str = "2023-11-26";
const DEFAULT_LPN: &str = "1J5124509271900001";
const DEFAULT_QR_PAYLOAD: &str = "QR_DATA";

/// One piece of a composed string.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Verbatim text.
    Lit(&'static str),
    /// A data field with its default.
    Val(Field, &'static str),
}

/// Where a binding's text comes from.
#[derive(Debug, Clone)]
pub enum FieldSource {
    /// A fixed heading.
    Literal(&'static str),
    /// A single data field with its default.
    Value(Field, &'static str),
    /// A concatenation of literals and fields, e.g. `"PO NO: " + poNumber`.
    /// Embedded `'\n'` produces multi-line output.
    Compose(Vec<Segment>),
}

impl FieldSource {
    /// Resolve to the final string. Total: defaults make every field
    /// produce text.
    pub fn resolve(&self, data: &LabelData) -> String {
        match self {
            FieldSource::Literal(s) => (*s).to_string(),
            FieldSource::Value(field, default) => field_or_default(data, *field, default).to_string(),
            FieldSource::Compose(segments) => {
                let mut out = String::new();
                for segment in segments {
                    match segment {
                        Segment::Lit(s) => out.push_str(s),
                        Segment::Val(field, default) => {
                            out.push_str(field_or_default(data, *field, default))
                        }
                    }
                }
                out
            }
        }
    }
}

fn field_or_default<'a>(data: &'a LabelData, field: Field, default: &'a str) -> &'a str {
    match data.get(field) {
        Some(value) if !value.is_empty() => value,
        _ => default,
    }
}

/// A text run anchored inside a region.
///
/// `dx` is measured from the region's left edge; `dy` from the region's
/// top edge down to the first baseline. Multi-line sources step each
/// subsequent baseline down by `line_step`.
#[derive(Debug, Clone)]
pub struct FieldBinding {
    pub region: RegionId,
    pub dx: f64,
    pub dy: f64,
    pub font: FontSpec,
    pub line_step: f64,
    pub source: FieldSource,
}

/// How a symbol bitmap is fitted into its region.
#[derive(Debug, Clone, Copy)]
pub enum SymbolFit {
    /// Linear codes: stretch to the exact inset width at a fixed height,
    /// sitting `bottom` above the region's bottom edge.
    Stretch {
        left: f64,
        right: f64,
        bottom: f64,
        height: f64,
    },
    /// The matrix code: a square of side
    /// `min(region.width - side_inset, region.height - top_inset)`,
    /// horizontally centered, `top_offset` below the region top.
    Square {
        side_inset: f64,
        top_inset: f64,
        top_offset: f64,
    },
}

impl SymbolFit {
    /// The absolute rectangle the bitmap is scaled into.
    pub fn target_rect(&self, region: Rect) -> Rect {
        match *self {
            SymbolFit::Stretch {
                left,
                right,
                bottom,
                height,
            } => Rect::new(
                region.x + left,
                region.y + bottom,
                region.width - left - right,
                height,
            ),
            SymbolFit::Square {
                side_inset,
                top_inset,
                top_offset,
            } => {
                let side = (region.width - side_inset).min(region.height - top_inset);
                Rect::new(
                    region.x + (region.width - side) / 2.0,
                    region.top() - top_offset - side,
                    side,
                    side,
                )
            }
        }
    }
}

/// A scannable code bound to a region.
#[derive(Debug, Clone)]
pub struct SymbolBinding {
    pub region: RegionId,
    pub symbology: Symbology,
    pub source: FieldSource,
    pub fit: SymbolFit,
    /// Strip embedded whitespace from the payload before encoding. Only
    /// the part-number binding sets this: part numbers are keyed with
    /// incidental spacing upstream, quantities and license plates are not.
    pub strip_whitespace: bool,
}

fn bold(size: f64) -> FontSpec {
    FontSpec::new(FontFamily::HelveticaBold, size)
}

fn regular(size: f64) -> FontSpec {
    FontSpec::new(FontFamily::Helvetica, size)
}

impl LayoutTemplate {
    /// The ordered text bindings for this template. Declaration order is
    /// draw order.
    pub fn field_bindings(&self) -> Vec<FieldBinding> {
        let s = self.text_scale;
        vec![
            FieldBinding {
                region: RegionId::ShipFrom,
                dx: 6.0,
                dy: 12.0 * s,
                font: bold(8.0 * s),
                line_step: 12.0 * s,
                source: FieldSource::Literal("SHIP FROM:"),
            },
            FieldBinding {
                region: RegionId::ShipFrom,
                dx: 6.0,
                dy: 24.0 * s,
                font: regular(7.0 * s),
                line_step: 9.0 * s,
                source: FieldSource::Compose(vec![
                    Segment::Val(Field::ShipFromName, DEFAULT_SHIP_FROM_NAME),
                    Segment::Lit("\n"),
                    Segment::Val(Field::ShipFromAddress, DEFAULT_SHIP_FROM_ADDRESS),
                ]),
            },
            FieldBinding {
                region: RegionId::ShipFrom,
                dx: 6.0,
                dy: self.rows.top - 5.0 * s,
                font: regular(6.0 * s),
                line_step: 8.0 * s,
                source: FieldSource::Compose(vec![
                    Segment::Lit("SUP: "),
                    Segment::Val(Field::SupplierCode, ""),
                    Segment::Lit("  COO: "),
                    Segment::Val(Field::CountryOfOrigin, ""),
                ]),
            },
            FieldBinding {
                region: RegionId::ShipTo,
                dx: 6.0,
                dy: 12.0 * s,
                font: bold(8.0 * s),
                line_step: 12.0 * s,
                source: FieldSource::Literal("SHIP TO:"),
            },
            FieldBinding {
                region: RegionId::ShipTo,
                dx: 6.0,
                dy: 24.0 * s,
                font: regular(7.0 * s),
                line_step: 9.0 * s,
                source: FieldSource::Compose(vec![
                    Segment::Val(Field::ShipToName, DEFAULT_SHIP_TO_NAME),
                    Segment::Lit("\n"),
                    Segment::Val(Field::ShipToAddress, DEFAULT_SHIP_TO_ADDRESS),
                ]),
            },
            FieldBinding {
                region: RegionId::ShipTo,
                dx: 6.0,
                dy: self.rows.top - 5.0 * s,
                font: regular(6.0 * s),
                line_step: 8.0 * s,
                source: FieldSource::Compose(vec![
                    Segment::Lit("PLANT: "),
                    Segment::Val(Field::Plant, ""),
                    Segment::Lit("  SLOC: "),
                    Segment::Val(Field::StorageLocation, ""),
                ]),
            },
            FieldBinding {
                region: RegionId::PartBarcode,
                dx: 6.0,
                dy: 8.0 * s,
                font: bold(9.0 * s),
                line_step: 11.0 * s,
                source: FieldSource::Value(Field::PartNumber, DEFAULT_PART_NUMBER),
            },
            FieldBinding {
                region: RegionId::Quantity,
                dx: 10.0,
                dy: self.rows.middle - 4.0,
                font: bold(10.0 * s),
                line_step: 12.0 * s,
                source: FieldSource::Compose(vec![
                    Segment::Val(Field::Quantity, DEFAULT_QUANTITY),
                    Segment::Lit(" "),
                    Segment::Val(Field::UnitOfMeasure, DEFAULT_UNIT_OF_MEASURE),
                ]),
            },
            FieldBinding {
                region: RegionId::Description,
                dx: 6.0,
                dy: 12.0 * s,
                font: bold(10.0 * s),
                line_step: 12.0 * s,
                source: FieldSource::Literal("DESCRIPTION"),
            },
            FieldBinding {
                region: RegionId::Description,
                dx: 6.0,
                dy: 28.0 * s,
                font: regular(9.0 * s),
                line_step: 11.0 * s,
                source: FieldSource::Value(Field::PartDescription, DEFAULT_PART_DESCRIPTION),
            },
            FieldBinding {
                region: RegionId::Lpn,
                dx: 6.0,
                // Sits just above the LPN barcode.
                dy: self.rows.lower - (10.0 + 36.0 * s + 4.0),
                font: regular(7.0 * s),
                line_step: 9.0 * s,
                source: FieldSource::Value(Field::LicensePlate, DEFAULT_LPN),
            },
            FieldBinding {
                region: RegionId::PoBlock,
                dx: 10.0,
                dy: 14.0 * s,
                font: bold(8.0 * s),
                line_step: 10.0 * s,
                source: FieldSource::Compose(vec![
                    Segment::Lit("PO NO: "),
                    Segment::Val(Field::PoNumber, DEFAULT_PO_NUMBER),
                    Segment::Lit("\nPO LINE: "),
                    Segment::Val(Field::PoLineNumber, DEFAULT_PO_LINE_NUMBER),
                    Segment::Lit("\nPROD DATE: "),
                    Segment::Val(Field::ProductionDate, DEFAULT_PRODUCTION_DATE),
                    Segment::Lit("\nEXP DATE: "),
                    Segment::Val(Field::ExpirationDate, DEFAULT_EXPIRATION_DATE),
                    Segment::Lit("\nLOT: "),
                    Segment::Val(Field::LotNumber, DEFAULT_LOT_NUMBER),
                    Segment::Lit("\nQML: "),
                    Segment::Val(Field::QualityMark, ""),
                    Segment::Lit("   PCD: "),
                    Segment::Val(Field::ProcessControlDate, ""),
                ]),
            },
        ]
    }

    /// The ordered symbol bindings for this template. Declaration order is
    /// draw order: QR first, then the linear codes top to bottom.
    pub fn symbol_bindings(&self) -> Vec<SymbolBinding> {
        let s = self.text_scale;
        vec![
            SymbolBinding {
                region: RegionId::Symbol,
                symbology: Symbology::Matrix2D,
                source: FieldSource::Value(Field::QrPayload, DEFAULT_QR_PAYLOAD),
                fit: SymbolFit::Square {
                    side_inset: 12.0,
                    top_inset: 16.0,
                    top_offset: 8.0,
                },
                strip_whitespace: false,
            },
            SymbolBinding {
                region: RegionId::PartBarcode,
                symbology: Symbology::Linear,
                source: FieldSource::Value(Field::PartNumber, DEFAULT_PART_NUMBER),
                fit: SymbolFit::Stretch {
                    left: 6.0,
                    right: 22.0,
                    bottom: 8.0,
                    height: 36.0 * s,
                },
                strip_whitespace: true,
            },
            SymbolBinding {
                region: RegionId::Quantity,
                symbology: Symbology::Linear,
                source: FieldSource::Value(Field::Quantity, DEFAULT_QUANTITY),
                fit: SymbolFit::Stretch {
                    left: 8.0,
                    right: 12.0,
                    bottom: 6.0,
                    height: 36.0 * s,
                },
                strip_whitespace: false,
            },
            SymbolBinding {
                region: RegionId::Lpn,
                symbology: Symbology::Linear,
                source: FieldSource::Value(Field::LicensePlate, DEFAULT_LPN),
                fit: SymbolFit::Stretch {
                    left: 6.0,
                    right: 4.0,
                    bottom: 10.0,
                    height: 36.0 * s,
                },
                strip_whitespace: false,
            },
        ]
    }
}
