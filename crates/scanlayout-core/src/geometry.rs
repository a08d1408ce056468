//! Polygon and bounding-box primitives for OCR text elements.
//!
//! Coordinates are page-relative physical units (inches) with the origin at
//! the top-left of the page. A polygon is the quadrilateral footprint of one
//! recognized text line, corners ordered top-left, top-right, bottom-right,
//! bottom-left:
//! `[x0, y0, x1, y1, x2, y2, x3, y3]`.

/// A validated 4-corner quadrilateral.
///
/// Construction goes through [`Polygon::from_slice`], so a held value always
/// has exactly 8 finite components. OCR records with missing or truncated
/// polygons are `None` at the ingestion boundary and contribute no geometric
/// signal anywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon([f64; 8]);

impl Polygon {
    /// Build a polygon from a fixed-size coordinate array.
    pub fn new(coords: [f64; 8]) -> Self {
        Self(coords)
    }

    /// Validate a raw coordinate slice. Anything other than exactly 8 finite
    /// numbers yields `None`.
    pub fn from_slice(coords: &[f64]) -> Option<Self> {
        let coords: [f64; 8] = coords.try_into().ok()?;
        if coords.iter().all(|v| v.is_finite()) {
            Some(Self(coords))
        } else {
            None
        }
    }

    /// The raw coordinates in corner order.
    pub fn coords(&self) -> &[f64; 8] {
        &self.0
    }

    /// The four corners as (x, y) pairs: top-left, top-right, bottom-right,
    /// bottom-left.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let c = &self.0;
        [(c[0], c[1]), (c[2], c[3]), (c[4], c[5]), (c[6], c[7])]
    }

    /// Axis-aligned bounding box of the four corners.
    pub fn bounding_box(&self) -> BBox {
        let corners = self.corners();
        let mut bbox = BBox {
            min_x: corners[0].0,
            min_y: corners[0].1,
            max_x: corners[0].0,
            max_y: corners[0].1,
        };
        for &(x, y) in &corners[1..] {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        bbox
    }

    /// Center as the arithmetic mean of the four corners.
    ///
    /// Deliberately not the bounding-box center: for a skewed quadrilateral
    /// the two differ, and downstream column thresholds were tuned against
    /// the corner mean.
    pub fn center(&self) -> (f64, f64) {
        let c = &self.0;
        (
            (c[0] + c[2] + c[4] + c[6]) / 4.0,
            (c[1] + c[3] + c[5] + c[7]) / 4.0,
        )
    }

    /// Translate every corner by (dx, dy), rounding to 4 decimals.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        let mut coords = self.0;
        for pair in coords.chunks_exact_mut(2) {
            pair[0] = round4(pair[0] + dx);
            pair[1] = round4(pair[1] + dy);
        }
        Self(coords)
    }
}

/// Axis-aligned bounding box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Intersection-over-union of the two polygons' axis-aligned bounding boxes.
///
/// Returns a value in `[0, 1]`; 0 when the union area is 0 (degenerate
/// zero-area boxes).
pub fn iou(a: &Polygon, b: &Polygon) -> f64 {
    let a = a.bounding_box();
    let b = b.bounding_box();

    let inter_x = (a.max_x.min(b.max_x) - a.min_x.max(b.min_x)).max(0.0);
    let inter_y = (a.max_y.min(b.max_y) - a.min_y.max(b.min_y)).max(0.0);
    let intersection = inter_x * inter_y;

    let union = a.area() + b.area() - intersection;
    if union == 0.0 {
        return 0.0;
    }
    intersection / union
}

/// Position similarity from the euclidean distance between polygon centers,
/// normalized to `[0, 1]`: 1 at zero distance, 0 at or beyond `max_dist`.
pub fn distance_similarity(a: &Polygon, b: &Polygon, max_dist: f64) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    let dist = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
    (1.0 - dist / max_dist).max(0.0)
}

/// Round to 4 decimal places, matching the precision kept in the OCR input.
pub(crate) fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}
