//! Page-layout similarity scoring.
//!
//! Scores how alike two pages are from the positions of their text polygons
//! alone. An external page-to-template matcher uses the score to decide page
//! identity; this module performs no matching decision itself.

use crate::geometry::{Polygon, distance_similarity, iou};

/// Default IoU weight used for page-layout matching.
pub const IOU_WEIGHT: f64 = 0.6;
/// Default position weight used for page-layout matching.
pub const POSITION_WEIGHT: f64 = 0.4;
/// Center distance (inches) at which position similarity reaches zero.
pub const MAX_CENTER_DIST: f64 = 1.0;

/// Weighted blend of bounding-box IoU and center-distance similarity.
///
/// Pure IoU alone is 0 for two non-overlapping text boxes on different print
/// runs of the same template, which is common; the position term keeps small
/// translations from zeroing the score. With `w_iou + w_pos = 1` the result
/// is in `[0, 1]`.
pub fn polygon_similarity(a: &Polygon, b: &Polygon, w_iou: f64, w_pos: f64) -> f64 {
    w_iou * iou(a, b) + w_pos * distance_similarity(a, b, MAX_CENTER_DIST)
}

/// Layout similarity between two pages' polygon sets, in `[0, 1]`.
///
/// Greedy one-pass matching: for each polygon in `a`, pick the unused polygon
/// in `b` with the highest [`polygon_similarity`] (weights 0.6 IoU / 0.4
/// position), mark it used, and accumulate the score. The per-`a` average is
/// then scaled by `0.7 + 0.3 * (min(|a|,|b|) / max(|a|,|b|))` so that pages
/// with grossly different element counts never score as similar on a few
/// coincidental overlaps.
///
/// Not optimal bipartite matching — deterministic in input order and
/// O(|a|·|b|), which is fine for pages of at most a few hundred lines.
/// Returns 0 when either set is empty.
pub fn page_layout_similarity(a: &[Polygon], b: &[Polygon]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut used = vec![false; b.len()];
    let mut total = 0.0;

    for poly_a in a {
        let mut best_sim = 0.0;
        let mut best_idx = None;

        for (idx, poly_b) in b.iter().enumerate() {
            if used[idx] {
                continue;
            }
            let sim = polygon_similarity(poly_a, poly_b, IOU_WEIGHT, POSITION_WEIGHT);
            if sim > best_sim {
                best_sim = sim;
                best_idx = Some(idx);
            }
        }

        if let Some(idx) = best_idx {
            used[idx] = true;
        }
        total += best_sim;
    }

    let avg = total / a.len() as f64;

    let size_ratio = a.len().min(b.len()) as f64 / a.len().max(b.len()) as f64;
    avg * (0.7 + 0.3 * size_ratio)
}
