//! scanlayout-core: Backend-independent geometry and layout algorithms.
//!
//! This crate provides the value types (Polygon, Line, Page, Document) and
//! the pure algorithms of the scanlayout engine: polygon geometry,
//! page-layout similarity, skew detection/correction, anchor extraction,
//! adaptive column detection, and row clustering. Everything here is a
//! side-effect-free function over immutable values; template loading and
//! document I/O live in the `scanlayout` facade crate.
//!
//! Malformed geometric input degrades instead of erroring: an invalid
//! polygon is `None` at the boundary and contributes no signal, an empty
//! page falls back to category defaults, so a single bad OCR line never
//! aborts a page.

pub mod anchors;
pub mod geometry;
pub mod layout;
pub mod page;
pub mod rows;
pub mod similarity;
pub mod skew;

pub use anchors::{
    ANCHOR_PATTERNS, AlignmentTransform, AnchorPoint, find_anchors, find_anchors_in_lines,
    is_anchor, match_anchor,
};
pub use geometry::{BBox, Polygon, distance_similarity, iou};
pub use layout::{ColumnKind, ColumnRange, Layout, LayoutDetector, PageCategory};
pub use page::{DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH, Document, Line, Page};
pub use rows::{DEFAULT_Y_TOLERANCE, RowCell, cluster_rows, group_by_row};
pub use similarity::{
    IOU_WEIGHT, MAX_CENTER_DIST, POSITION_WEIGHT, page_layout_similarity, polygon_similarity,
};
pub use skew::{
    MAX_LINE_SKEW_DEG, MIN_PAGE_CORRECTION_DEG, MIN_POLYGON_ROTATION_DEG, PageSkew,
    detect_page_skew, normalize_document, normalize_page, normalize_polygon, skew_angle,
    skew_report,
};
