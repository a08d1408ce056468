//! Structural anchor phrases and the alignment transform derived from them.
//!
//! Anchor lines are print-fixed phrases that appear at known positions on
//! every page of this document family (a confidentiality marker, a page
//! marker, fixed section headings). Because they come from the printed form
//! rather than handwritten or typed content, they are the most trustworthy
//! reference points for skew estimation and template alignment.

use crate::geometry::Polygon;
use crate::page::{Line, Page};

/// Phrases expected on structurally fixed lines of the form family.
pub const ANCHOR_PATTERNS: [&str; 7] = [
    "- ลับ -",
    "หน้า ",
    "ข้อมูลส่วนบุคคล",
    "ประวัติการทำงาน",
    "บัญชีทรัพย์สิน",
    "ผู้ยื่นบัญชี",
    "เลขประจำตัวประชาชน",
];

/// First anchor pattern contained in `content`, if any. The returned pattern
/// is the pairing identity used by template alignment.
pub fn match_anchor(content: &str) -> Option<&'static str> {
    ANCHOR_PATTERNS.iter().copied().find(|p| content.contains(p))
}

/// Whether a line's text matches any structural anchor phrase.
pub fn is_anchor(content: &str) -> bool {
    match_anchor(content).is_some()
}

/// An anchor line located on a page. Position is the polygon's top-left
/// corner, which is stable under line-length variation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPoint {
    /// The pattern that matched; pairing identity across document/template.
    pub pattern: &'static str,
    /// Full recognized text of the anchor line.
    pub content: String,
    /// Top-left corner x.
    pub x: f64,
    /// Top-left corner y.
    pub y: f64,
    pub polygon: Polygon,
}

/// Extract anchor points from a page. Each line contributes at most one
/// anchor (its first matching pattern); lines without a valid polygon are
/// skipped.
pub fn find_anchors(page: &Page) -> Vec<AnchorPoint> {
    find_anchors_in_lines(&page.lines)
}

/// See [`find_anchors`].
pub fn find_anchors_in_lines(lines: &[Line]) -> Vec<AnchorPoint> {
    let mut anchors = Vec::new();
    for line in lines {
        let Some(polygon) = line.polygon else {
            continue;
        };
        if let Some(pattern) = match_anchor(&line.content) {
            let coords = polygon.coords();
            anchors.push(AnchorPoint {
                pattern,
                content: line.content.clone(),
                x: coords[0],
                y: coords[1],
                polygon,
            });
        }
    }
    anchors
}

/// Translation that maps a document page onto its template page.
///
/// Scale and rotation are carried for schema compatibility but are always
/// 1.0 and 0.0: rotation is the skew normalizer's job, and the form family
/// is printed at fixed scale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentTransform {
    pub dx: f64,
    pub dy: f64,
    pub scale: f64,
    pub rotation: f64,
    /// Number of anchor pairs the offset was averaged over.
    pub anchors_matched: usize,
}

impl AlignmentTransform {
    pub fn translation(dx: f64, dy: f64, anchors_matched: usize) -> Self {
        Self {
            dx,
            dy,
            scale: 1.0,
            rotation: 0.0,
            anchors_matched,
        }
    }
}
