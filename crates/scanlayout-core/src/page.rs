//! Document, page, and line value types for the OCR boundary schema.
//!
//! These mirror the JSON shape produced by the OCR acquisition step:
//! a document is `{ pages: [...] }`, a page is `{ page_number, width, height,
//! lines }`, a line is `{ content, polygon }`. Lines with missing or
//! malformed polygons are tolerated and carry `polygon: None`.
//!
//! Normalization and alignment are pure value-to-value maps: the derived
//! fields (`original_polygon`, `applied_skew_angle`, `alignment`,
//! `normalized`) start empty and are filled on the output values. They
//! serialize under the historical side-channel keys (`_original_polygon`,
//! `_skew_corrected`, `_alignment_transform`, `_normalized`) so downstream
//! consumers see the same document schema they always have.

use crate::anchors::AlignmentTransform;
use crate::geometry::Polygon;

/// Default page size in inches for this document family, used when the OCR
/// record omits dimensions.
pub const DEFAULT_PAGE_WIDTH: f64 = 8.2639;
/// See [`DEFAULT_PAGE_WIDTH`].
pub const DEFAULT_PAGE_HEIGHT: f64 = 11.6944;

/// One recognized text line on a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// Recognized text content.
    #[cfg_attr(feature = "serde", serde(default))]
    pub content: String,
    /// Quadrilateral footprint; `None` when the OCR record was missing or
    /// malformed (wrong length, non-numeric).
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "de_polygon_tolerant")
    )]
    pub polygon: Option<Polygon>,
    /// Pre-correction polygon, retained when skew correction rewrote
    /// `polygon`. Serialized as `_original_polygon` for traceability.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "_original_polygon",
            skip_serializing_if = "Option::is_none",
            deserialize_with = "de_polygon_tolerant"
        )
    )]
    pub original_polygon: Option<Polygon>,
    /// True when template alignment translated this line's polygon.
    /// Serialized as `_alignment_applied`, omitted while false.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "_alignment_applied",
            skip_serializing_if = "std::ops::Not::not"
        )
    )]
    pub alignment_applied: bool,
}

impl Line {
    pub fn new(content: impl Into<String>, polygon: Option<Polygon>) -> Self {
        Self {
            content: content.into(),
            polygon,
            original_polygon: None,
            alignment_applied: false,
        }
    }

    /// Center of the line's polygon, or (0, 0) when there is no valid
    /// polygon. Callers treat (0, 0) as "no geometric signal".
    pub fn center(&self) -> (f64, f64) {
        self.polygon.as_ref().map_or((0.0, 0.0), Polygon::center)
    }

    pub fn center_x(&self) -> f64 {
        self.center().0
    }

    pub fn center_y(&self) -> f64 {
        self.center().1
    }
}

/// One page of OCR output: an ordered sequence of lines plus physical
/// dimensions. The unit of normalization, similarity comparison, and layout
/// detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    /// 1-indexed page number.
    pub page_number: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_width"))]
    pub width: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_height"))]
    pub height: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lines: Vec<Line>,
    /// Skew angle (degrees) that was corrected on this page, if any.
    /// Serialized as `_skew_corrected`.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "_skew_corrected",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub applied_skew_angle: Option<f64>,
    /// Translation transform applied by template alignment, if any.
    /// Serialized as `_alignment_transform`.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "_alignment_transform",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub alignment: Option<AlignmentTransform>,
}

impl Page {
    pub fn new(page_number: u32, width: f64, height: f64, lines: Vec<Line>) -> Self {
        Self {
            page_number,
            width,
            height,
            lines,
            applied_skew_angle: None,
            alignment: None,
        }
    }

    /// All valid polygons on the page, in line order. This is the input shape
    /// for page-layout similarity.
    pub fn polygons(&self) -> Vec<Polygon> {
        self.lines.iter().filter_map(|l| l.polygon).collect()
    }
}

/// A whole OCR document: ordered pages plus the normalization marker
/// (serialized as `_normalized`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    #[cfg_attr(feature = "serde", serde(default))]
    pub pages: Vec<Page>,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "_normalized",
            skip_serializing_if = "std::ops::Not::not"
        )
    )]
    pub normalized: bool,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            normalized: false,
        }
    }

    /// Look up a page by its 1-indexed page number.
    pub fn page(&self, page_number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }
}

fn default_width() -> f64 {
    DEFAULT_PAGE_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_PAGE_HEIGHT
}

/// Deserialize a polygon field tolerantly: `null`, a missing field, or an
/// array of the wrong length all become `None` instead of an error. The
/// upstream OCR process occasionally emits partial records, and a single bad
/// line must not abort a whole page.
#[cfg(feature = "serde")]
fn de_polygon_tolerant<'de, D>(deserializer: D) -> Result<Option<Polygon>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let raw: Option<Vec<f64>> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Polygon::from_slice))
}
