//! # Layout Templates
//!
//! Declarative page geometry for the two supported label variants. A
//! template holds page dimensions, a uniform margin, a column scheme, and
//! four fixed row heights; `resolve()` turns those parameters into absolute
//! region rectangles once per render.
//!
//! All coordinates are f64 page points with a bottom-left origin, y
//! increasing upward, the same space the PDF content stream uses, so no
//! flipping happens downstream.
//!
//! Geometry problems (a split that goes non-positive, a row stack taller
//! than the page) are configuration defects and fail fast at resolution
//! time, before any drawing occurs.

use thiserror::Error;

/// Tolerance for fractional-sum and stacking checks.
const EPS: f64 = 1e-6;

/// An axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// y coordinate of the top edge.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// x coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Whether `other` lies fully inside this rectangle (within EPS).
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.top() <= self.top() + EPS
    }

    /// Whether the interiors of two rectangles intersect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x + EPS < other.right()
            && other.x + EPS < self.right()
            && self.y + EPS < other.top()
            && other.y + EPS < self.top()
    }
}

/// A point on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The closed set of supported label layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// 6"×4" thermal label stock at 72 DPI (432×288 pt).
    SixByFourCompact,
    /// Full-page A4 packing document.
    A4Document,
}

/// How the usable width is partitioned into the three top-row columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnScheme {
    /// Label-stock scheme: a fixed-width guideline column on the far
    /// right, the remaining left area split by `main_fraction` into a main
    /// column and a side (symbol) column, and the main column split into
    /// two equal ship-from/ship-to sub-columns of `ship_fraction` each.
    /// The main-column remainder is gutter.
    GuideColumn {
        width: f64,
        main_fraction: f64,
        ship_fraction: f64,
    },
    /// Document scheme: three direct fractional columns over the full
    /// usable width. Fractions must sum to 1.
    Fractional { fractions: [f64; 3] },
}

/// Fixed heights of the four label rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowHeights {
    pub top: f64,
    pub middle: f64,
    pub description: f64,
    pub lower: f64,
}

impl RowHeights {
    fn stacked(&self, gap: f64) -> f64 {
        self.top + self.middle + self.description + self.lower + 3.0 * gap
    }
}

/// Geometry description for one label variant.
///
/// Stateless configuration value: construct once, resolve per render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutTemplate {
    pub variant: Variant,
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub columns: ColumnScheme,
    pub rows: RowHeights,
    pub row_gap: f64,
    /// Width of the small fixed left sub-column in the description and
    /// lower rows.
    pub tag_column_width: f64,
    /// Multiplier applied to font sizes, anchor offsets, line steps, and
    /// symbol heights. Region geometry is unaffected.
    pub text_scale: f64,
}

impl LayoutTemplate {
    /// The compact 6"×4" label-stock template.
    pub fn six_by_four_compact() -> Self {
        Self {
            variant: Variant::SixByFourCompact,
            page_width: 432.0,
            page_height: 288.0,
            margin: 8.0,
            columns: ColumnScheme::GuideColumn {
                width: 136.0,
                main_fraction: 0.68,
                ship_fraction: 0.45,
            },
            rows: RowHeights {
                top: 56.0,
                middle: 78.0,
                description: 52.0,
                lower: 68.0,
            },
            row_gap: 6.0,
            tag_column_width: 54.0,
            text_scale: 1.0,
        }
    }

    /// The full-page A4 document template.
    pub fn a4_document() -> Self {
        Self {
            variant: Variant::A4Document,
            page_width: 595.28,
            page_height: 841.89,
            margin: 24.0,
            columns: ColumnScheme::Fractional {
                fractions: [0.40, 0.40, 0.20],
            },
            rows: RowHeights {
                top: 120.0,
                middle: 150.0,
                description: 110.0,
                lower: 150.0,
            },
            row_gap: 12.0,
            tag_column_width: 96.0,
            text_scale: 1.5,
        }
    }

    /// Select a template by variant tag.
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::SixByFourCompact => Self::six_by_four_compact(),
            Variant::A4Document => Self::a4_document(),
        }
    }

    /// Page dimensions in points, (width, height).
    pub fn page_size(&self) -> (f64, f64) {
        (self.page_width, self.page_height)
    }

    /// Resolve the template into absolute region rectangles.
    ///
    /// Pure: the same template always resolves to the same regions. Fails
    /// only on an internally inconsistent configuration.
    pub fn resolve(&self) -> Result<Regions, TemplateError> {
        let usable_w = self.page_width - 2.0 * self.margin;
        let usable_h = self.page_height - 2.0 * self.margin;
        if usable_w <= 0.0 || usable_h <= 0.0 {
            return Err(TemplateError::EmptyPage {
                width: usable_w,
                height: usable_h,
            });
        }

        let (ship_from_w, ship_to_w, symbol_w, left_w, guide_column) = match self.columns {
            ColumnScheme::GuideColumn {
                width,
                main_fraction,
                ship_fraction,
            } => {
                let left_w = usable_w - width;
                check_extent("left area", left_w)?;
                let main_w = left_w * main_fraction;
                let side_w = left_w - main_w;
                check_extent("side column", side_w)?;
                let ship_w = main_w * ship_fraction;
                check_extent("ship column", ship_w)?;
                // Gutter: main_w - 2*ship_w stays unframed between the
                // symbol cell and the guideline column.
                check_extent("column gutter", main_w - 2.0 * ship_w + EPS)?;
                let guide = Rect::new(self.margin + left_w, self.margin, width, usable_h);
                (ship_w, ship_w, side_w, left_w, Some(guide))
            }
            ColumnScheme::Fractional { fractions } => {
                let sum: f64 = fractions.iter().sum();
                if (sum - 1.0).abs() > EPS {
                    return Err(TemplateError::FractionSum { sum });
                }
                for f in fractions {
                    check_extent("fractional column", f * usable_w)?;
                }
                (
                    fractions[0] * usable_w,
                    fractions[1] * usable_w,
                    fractions[2] * usable_w,
                    usable_w,
                    None,
                )
            }
        };

        check_extent("tag column remainder", left_w - self.tag_column_width)?;

        let stacked = self.rows.stacked(self.row_gap);
        if stacked > usable_h + EPS {
            return Err(TemplateError::RowOverflow {
                rows: stacked,
                available: usable_h,
            });
        }
        for (name, h) in [
            ("top row", self.rows.top),
            ("middle row", self.rows.middle),
            ("description row", self.rows.description),
            ("lower row", self.rows.lower),
        ] {
            check_extent(name, h)?;
        }

        // Rows stack downward from the top of the usable area.
        let x0 = self.margin;
        let top_y = self.page_height - self.margin - self.rows.top;
        let middle_y = top_y - self.row_gap - self.rows.middle;
        let desc_y = middle_y - self.row_gap - self.rows.description;
        let lower_y = desc_y - self.row_gap - self.rows.lower;

        let tag_w = self.tag_column_width;
        Ok(Regions {
            page: Rect::new(self.margin, self.margin, usable_w, usable_h),
            guide_column,
            ship_from: Rect::new(x0, top_y, ship_from_w, self.rows.top),
            ship_to: Rect::new(x0 + ship_from_w, top_y, ship_to_w, self.rows.top),
            symbol: Rect::new(x0 + ship_from_w + ship_to_w, top_y, symbol_w, self.rows.top),
            part_barcode: Rect::new(x0, middle_y, ship_from_w + ship_to_w, self.rows.middle),
            quantity: Rect::new(
                x0 + ship_from_w + ship_to_w,
                middle_y,
                symbol_w,
                self.rows.middle,
            ),
            description_tag: Rect::new(x0, desc_y, tag_w, self.rows.description),
            description: Rect::new(x0 + tag_w, desc_y, left_w - tag_w, self.rows.description),
            lpn: Rect::new(x0, lower_y, tag_w, self.rows.lower),
            po_block: Rect::new(x0 + tag_w, lower_y, left_w - tag_w, self.rows.lower),
        })
    }
}

fn check_extent(region: &'static str, value: f64) -> Result<(), TemplateError> {
    if value <= 0.0 {
        Err(TemplateError::DegenerateRegion { region, value })
    } else {
        Ok(())
    }
}

/// Names for the drawable regions of a resolved layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionId {
    ShipFrom,
    ShipTo,
    Symbol,
    PartBarcode,
    Quantity,
    DescriptionTag,
    Description,
    Lpn,
    PoBlock,
}

/// Absolute rectangles for every region of one resolved layout.
///
/// Derived value: recomputed from the template each render, never cached
/// across requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regions {
    /// The border rectangle: the full page minus margin.
    pub page: Rect,
    /// The right-hand guideline column, when the scheme has one.
    pub guide_column: Option<Rect>,
    pub ship_from: Rect,
    pub ship_to: Rect,
    pub symbol: Rect,
    pub part_barcode: Rect,
    pub quantity: Rect,
    pub description_tag: Rect,
    pub description: Rect,
    pub lpn: Rect,
    pub po_block: Rect,
}

impl Regions {
    /// Look up a region rectangle by name.
    pub fn get(&self, id: RegionId) -> Rect {
        match id {
            RegionId::ShipFrom => self.ship_from,
            RegionId::ShipTo => self.ship_to,
            RegionId::Symbol => self.symbol,
            RegionId::PartBarcode => self.part_barcode,
            RegionId::Quantity => self.quantity,
            RegionId::DescriptionTag => self.description_tag,
            RegionId::Description => self.description,
            RegionId::Lpn => self.lpn,
            RegionId::PoBlock => self.po_block,
        }
    }

    /// All partition cells in fixed drawing order (top row, middle row,
    /// description row, lower row; left to right within each row).
    pub fn cells(&self) -> [(RegionId, Rect); 9] {
        [
            (RegionId::ShipFrom, self.ship_from),
            (RegionId::ShipTo, self.ship_to),
            (RegionId::Symbol, self.symbol),
            (RegionId::PartBarcode, self.part_barcode),
            (RegionId::Quantity, self.quantity),
            (RegionId::DescriptionTag, self.description_tag),
            (RegionId::Description, self.description),
            (RegionId::Lpn, self.lpn),
            (RegionId::PoBlock, self.po_block),
        ]
    }
}

/// A template whose parameters cannot produce a valid layout.
///
/// Raised at resolution time so layout bugs surface at configuration time,
/// never as silently clamped geometry at render time.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("usable page area is empty ({width:.1} x {height:.1})")]
    EmptyPage { width: f64, height: f64 },

    #[error("{region} resolves to a non-positive extent ({value:.2})")]
    DegenerateRegion { region: &'static str, value: f64 },

    #[error("column fractions sum to {sum:.4}, expected 1.0")]
    FractionSum { sum: f64 },

    #[error("row stack is {rows:.1} pt but only {available:.1} pt fit between the margins")]
    RowOverflow { rows: f64, available: f64 },
}
