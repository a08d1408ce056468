//! Skew detection and correction for scanned pages.
//!
//! A scanned page is frequently rotated a degree or two relative to upright.
//! The skew angle is estimated from the top edges of the page's line
//! polygons and undone by rotating every polygon about the page center.
//!
//! Sign convention: [`skew_angle`] is the measured rotation of the text
//! (positive = clockwise in a top-left-origin frame), and correction rotates
//! by the negated angle. Downstream column thresholds were tuned against
//! this exact convention; do not change it.

use crate::anchors::is_anchor;
use crate::geometry::{Polygon, round4};
use crate::page::{Document, Page};

/// Lines steeper than this (degrees) are treated as OCR garbage and ignored
/// when estimating page skew.
pub const MAX_LINE_SKEW_DEG: f64 = 10.0;
/// Pages with less measured skew than this are left untouched.
pub const MIN_PAGE_CORRECTION_DEG: f64 = 0.05;
/// Below this, polygon rotation is a no-op (avoids pointless float churn).
pub const MIN_POLYGON_ROTATION_DEG: f64 = 0.01;

/// Skew angle in degrees of a polygon's top edge (corner 0 → corner 1),
/// via `atan2`. A near-vertical top edge (|dx| < 0.001) maps to ±90.
pub fn skew_angle(polygon: &Polygon) -> f64 {
    let c = polygon.coords();
    let dx = c[2] - c[0];
    let dy = c[3] - c[1];

    if dx.abs() < 0.001 {
        return if dy > 0.0 { 90.0 } else { -90.0 };
    }
    dy.atan2(dx).to_degrees()
}

/// Estimate a page's skew as a weighted average over its lines.
///
/// Each line with a valid polygon and |angle| ≤ [`MAX_LINE_SKEW_DEG`]
/// contributes its top-edge angle, weighted by top-edge length (longer lines
/// give a more reliable estimate). The weight is doubled for structural
/// anchor lines, which are print-fixed and most trustworthy. Returns 0.0
/// when no line qualifies.
pub fn detect_page_skew(page: &Page) -> f64 {
    let mut angles = Vec::new();
    let mut weights = Vec::new();

    for line in &page.lines {
        let Some(polygon) = &line.polygon else {
            continue;
        };

        let angle = skew_angle(polygon);
        if angle.abs() > MAX_LINE_SKEW_DEG {
            continue;
        }

        let c = polygon.coords();
        let width = ((c[2] - c[0]).powi(2) + (c[3] - c[1]).powi(2)).sqrt();

        let mut weight = width;
        if is_anchor(&line.content) {
            weight *= 2.0;
        }

        angles.push(angle);
        weights.push(weight);
    }

    if angles.is_empty() {
        return 0.0;
    }

    let total_weight: f64 = weights.iter().sum();
    if total_weight == 0.0 {
        // All qualifying lines had zero-length top edges; fall back to a
        // plain mean.
        return angles.iter().sum::<f64>() / angles.len() as f64;
    }

    angles
        .iter()
        .zip(&weights)
        .map(|(a, w)| a * w)
        .sum::<f64>()
        / total_weight
}

/// Rotate (x, y) about (cx, cy) by `-angle` degrees (undo the measured skew).
fn rotate_point(x: f64, y: f64, angle: f64, cx: f64, cy: f64) -> (f64, f64) {
    let rad = (-angle).to_radians();
    let (sin_a, cos_a) = rad.sin_cos();

    let dx = x - cx;
    let dy = y - cy;

    (dx * cos_a - dy * sin_a + cx, dx * sin_a + dy * cos_a + cy)
}

/// Undo `angle` degrees of skew on a polygon by rotating every corner about
/// the page center. Returns the polygon unchanged when
/// |angle| < [`MIN_POLYGON_ROTATION_DEG`]. Coordinates are rounded to 4
/// decimals.
pub fn normalize_polygon(polygon: &Polygon, angle: f64, page_width: f64, page_height: f64) -> Polygon {
    if angle.abs() < MIN_POLYGON_ROTATION_DEG {
        return *polygon;
    }

    let cx = page_width / 2.0;
    let cy = page_height / 2.0;

    let mut coords = *polygon.coords();
    for pair in coords.chunks_exact_mut(2) {
        let (x, y) = rotate_point(pair[0], pair[1], angle, cx, cy);
        pair[0] = round4(x);
        pair[1] = round4(y);
    }
    Polygon::new(coords)
}

/// Detect and correct a page's skew, producing a new page value.
///
/// When the measured skew is below [`MIN_PAGE_CORRECTION_DEG`] the page is
/// returned unchanged. Otherwise every valid polygon is rewritten, the
/// pre-correction polygon is retained on each line for traceability, and the
/// applied angle is recorded on the page.
pub fn normalize_page(page: &Page) -> Page {
    let skew = detect_page_skew(page);
    if skew.abs() < MIN_PAGE_CORRECTION_DEG {
        return page.clone();
    }

    let mut normalized = page.clone();
    for line in &mut normalized.lines {
        if let Some(polygon) = line.polygon {
            line.polygon = Some(normalize_polygon(&polygon, skew, page.width, page.height));
            line.original_polygon = Some(polygon);
        }
    }
    normalized.applied_skew_angle = Some(skew);
    normalized
}

/// Normalize every page of a document, or only the listed page numbers, and
/// mark the document as normalized. Pages are independent; order is
/// preserved.
pub fn normalize_document(document: &Document, pages: Option<&[u32]>) -> Document {
    let normalized_pages = document
        .pages
        .iter()
        .map(|page| match pages {
            Some(wanted) if !wanted.contains(&page.page_number) => page.clone(),
            _ => normalize_page(page),
        })
        .collect();

    Document {
        pages: normalized_pages,
        normalized: true,
    }
}

/// Per-page skew summary, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSkew {
    pub page_number: u32,
    /// Measured skew angle in degrees.
    pub angle: f64,
    pub line_count: usize,
}

/// Measure (without correcting) the skew of every page in a document.
pub fn skew_report(document: &Document) -> Vec<PageSkew> {
    document
        .pages
        .iter()
        .map(|page| PageSkew {
            page_number: page.page_number,
            angle: detect_page_skew(page),
            line_count: page.lines.len(),
        })
        .collect()
}
