//! Adaptive per-page column/row layout detection.
//!
//! Physical print margins vary by scan batch, so the column boundaries of
//! the asset tables are inferred per page from the statistical distribution
//! of recognized token shapes (row numbers, dates, monetary values,
//! ownership checkmarks) instead of hard-coded coordinates. Hard-coded
//! per-category defaults are the fallback for pages with too little signal.

use regex::Regex;

use crate::page::Line;

/// Semantic category of an asset-table page. Determines the fallback layout
/// when detection has nothing to work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PageCategory {
    Land,
    Building,
    Vehicle,
    Rights,
    Other,
}

/// Functional column a table element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColumnKind {
    RowIndex,
    Type,
    Date,
    Value,
    Owner,
}

/// Inclusive x-range of a detected column.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }
}

/// Detected (or default) layout of an asset-table page.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    /// Right boundary of the row-index column.
    pub row_index_max_x: f64,
    pub type_range: ColumnRange,
    pub date_range: ColumnRange,
    pub value_range: ColumnRange,
    pub owner_range: ColumnRange,
    /// Content above this y is header, excluded from the table body.
    pub header_y_min: f64,
    /// Content below this y is footer, excluded from the table body.
    pub footer_y_max: f64,
    /// False when a fallback default was used because the page had too
    /// little signal.
    pub detected: bool,
}

impl Layout {
    /// Whether a y-coordinate lies in the table body (between header and
    /// footer).
    pub fn in_body(&self, y: f64) -> bool {
        y >= self.header_y_min && y <= self.footer_y_max
    }

    /// Column assignment for an element's x-center. Ties between overlapping
    /// ranges resolve in priority order row-index > date > value > owner;
    /// type is the catch-all.
    pub fn column_for(&self, x: f64) -> ColumnKind {
        if x < self.row_index_max_x {
            ColumnKind::RowIndex
        } else if self.date_range.contains(x) {
            ColumnKind::Date
        } else if self.value_range.contains(x) {
            ColumnKind::Value
        } else if self.owner_range.contains(x) {
            ColumnKind::Owner
        } else {
            ColumnKind::Type
        }
    }
}

/// Header phrases expected in the top band of an asset-table page.
const HEADER_KEYWORDS: [&str; 12] = [
    "รายละเอียดประกอบ",
    "ลำดับ",
    "ประเภท",
    "วัน / เดือน / ปี",
    "มูลค่าปัจจุบัน",
    "ผู้ยื่นบัญชี",
    "คู่สมรส",
    "เจ้าของ",
    "ที่ได้มา",
    "รายการ",
    "จำนวน",
    "หน่วย",
];

/// Phrases whose presence disqualifies a line from header and footer
/// detection; these are data values ("not found", "unknown") that happen to
/// contain boundary keywords.
const HEADER_EXCLUDE: [&str; 3] = ["ไม่พบ", "ไม่ทราบ", "ไม่ระบุ"];

/// Footer phrases expected in the bottom band of the page.
const FOOTER_KEYWORDS: [&str; 3] = ["หมายเหตุ", "ลงชื่อ", "- ลับ -"];

/// Owner-column header abbreviations that resemble footer tokens but sit in
/// the table area; never treat them as footer.
const FOOTER_EXCLUDE: [&str; 3] = ["ผย.", "คส.", "บ."];

/// Characters OCR produces for an ownership checkmark.
const CHECKMARK_CHARS: [&str; 9] = ["/", "✓", "V", "v", "1", "I", "l", "|", "✔"];

const DEFAULT_HEADER_Y: f64 = 0.8;
const DEFAULT_FOOTER_Y: f64 = 10.5;
/// Header keywords are only trusted in the top band of the page.
const HEADER_SCAN_MAX_Y: f64 = 2.0;
/// Footer keywords are only trusted in the bottom band of the page.
const FOOTER_SCAN_MIN_Y: f64 = 8.0;
/// Margin added around detected column extents.
const COLUMN_MARGIN: f64 = 0.3;
const OWNER_COLUMN_MARGIN: f64 = 0.2;
/// Fallback right boundary of the row-index column.
const DEFAULT_ROW_INDEX_MAX_X: f64 = 1.0;

/// Infers column and header/footer boundaries for asset-table pages.
///
/// Holds the compiled token patterns; construct once and reuse across pages.
#[derive(Debug, Clone)]
pub struct LayoutDetector {
    row_number: Regex,
    date: Regex,
    value: Regex,
}

impl Default for LayoutDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutDetector {
    pub fn new() -> Self {
        Self {
            row_number: Regex::new(r"^\d{1,2}$").expect("hard-coded pattern"),
            // Numeric dates (10/1/2556) or Thai-month dates (10 ม.ค. 2556).
            date: Regex::new(r"\d{1,2}/\d{1,2}/\d{4}|\d{1,2}\s*[ก-๙.]+\s*\d{4}")
                .expect("hard-coded pattern"),
            // Monetary values always carry two decimals in this form family.
            value: Regex::new(r"[\d,]+\.\d{2}").expect("hard-coded pattern"),
        }
    }

    /// Detect the layout of a page from its lines.
    ///
    /// Returns the category's hard-coded default with `detected = false`
    /// when the page has no lines; otherwise a detected layout, with
    /// per-column fallbacks where a column produced no matches.
    pub fn detect(&self, lines: &[Line], category: PageCategory) -> Layout {
        if lines.is_empty() {
            return Self::default_layout(category);
        }

        let mut row_number_candidates = Vec::new();
        for line in lines {
            if line.polygon.is_none() {
                continue;
            }
            let content = line.content.trim();
            let (cx, cy) = line.center();
            if self.row_number.is_match(content) {
                if let Ok(num) = content.parse::<u32>() {
                    if (1..=99).contains(&num) {
                        row_number_candidates.push((cx, cy, num));
                    }
                }
            }
        }

        let row_index_max_x = Self::detect_row_index_column(&row_number_candidates);
        let (header_y_min, footer_y_max) = Self::detect_vertical_bounds(lines);
        self.detect_columns(lines, row_index_max_x, header_y_min, footer_y_max)
    }

    /// Find the right boundary of the row-index column by bucket voting.
    ///
    /// Candidates are grouped by x rounded to 0.2-unit buckets; each bucket
    /// with at least two candidates scores `10 × (consecutive-integer
    /// adjacent pairs) − bucket_x`, favoring runs like 1,2,3,… and favoring
    /// the physically leftmost bucket. The winner's max x plus a 0.3 margin
    /// is the boundary; [`DEFAULT_ROW_INDEX_MAX_X`] when no bucket
    /// qualifies.
    fn detect_row_index_column(candidates: &[(f64, f64, u32)]) -> f64 {
        if candidates.is_empty() {
            return DEFAULT_ROW_INDEX_MAX_X;
        }

        // Bucket by x at 0.2 precision. Buckets are keyed by the rounded
        // value scaled to an integer so they can be sorted deterministically.
        let mut buckets: std::collections::BTreeMap<i64, Vec<(f64, u32)>> =
            std::collections::BTreeMap::new();
        for &(cx, _, num) in candidates {
            let key = (cx * 5.0).round() as i64;
            buckets.entry(key).or_default().push((cx, num));
        }

        let mut best: Option<(f64, &Vec<(f64, u32)>)> = None;
        for (&key, group) in &buckets {
            if group.len() < 2 {
                continue;
            }

            let mut numbers: Vec<u32> = group.iter().map(|&(_, n)| n).collect();
            numbers.sort_unstable();
            let sequential = numbers.windows(2).filter(|w| w[1] - w[0] == 1).count();

            let bucket_x = key as f64 / 5.0;
            let score = sequential as f64 * 10.0 - bucket_x;
            if best.is_none_or(|(s, _)| score > s) {
                best = Some((score, group));
            }
        }

        match best {
            Some((_, group)) => {
                let max_x = group.iter().map(|&(cx, _)| cx).fold(f64::MIN, f64::max);
                max_x + COLUMN_MARGIN
            }
            None => DEFAULT_ROW_INDEX_MAX_X,
        }
    }

    /// Detect header/footer y-bounds from keyword lines.
    ///
    /// Bounds are only ever nudged outward from the defaults (`max` for the
    /// header, `min` for the footer), so a single bad match cannot shrink
    /// the usable page area below reasonable bounds.
    fn detect_vertical_bounds(lines: &[Line]) -> (f64, f64) {
        let mut header_y = DEFAULT_HEADER_Y;
        let mut footer_y = DEFAULT_FOOTER_Y;

        for line in lines {
            if line.polygon.is_none() {
                continue;
            }
            let content = line.content.as_str();
            if HEADER_EXCLUDE.iter().any(|e| content.contains(e)) {
                continue;
            }
            let cy = line.center_y();

            if HEADER_KEYWORDS.iter().any(|k| content.contains(k)) && cy < HEADER_SCAN_MAX_Y {
                header_y = header_y.max(cy + 0.3);
            }

            if FOOTER_KEYWORDS.iter().any(|k| content.contains(k)) {
                if FOOTER_EXCLUDE.iter().any(|e| content.contains(e)) {
                    continue;
                }
                if cy > FOOTER_SCAN_MIN_Y {
                    footer_y = footer_y.min(cy - 0.2);
                }
            }
        }

        (header_y, footer_y)
    }

    /// Detect date/value/owner column ranges from token matches in the table
    /// body, then derive the type column as the gap left of the nearer of
    /// date/value.
    fn detect_columns(
        &self,
        lines: &[Line],
        row_index_max_x: f64,
        header_y_min: f64,
        footer_y_max: f64,
    ) -> Layout {
        let mut date_xs = Vec::new();
        let mut value_xs = Vec::new();
        let mut checkmark_xs = Vec::new();

        for line in lines {
            if line.polygon.is_none() {
                continue;
            }
            let content = line.content.trim();
            let (cx, cy) = line.center();

            if cy < header_y_min || cy > footer_y_max {
                continue;
            }
            if cx < row_index_max_x {
                continue;
            }

            if self.date.is_match(content) {
                date_xs.push(cx);
            }
            if self.value.is_match(content) {
                value_xs.push(cx);
            }
            if CHECKMARK_CHARS.contains(&content) {
                checkmark_xs.push(cx);
            }
        }

        let range_of = |xs: &[f64], margin: f64| -> Option<ColumnRange> {
            if xs.is_empty() {
                return None;
            }
            let min = xs.iter().copied().fold(f64::MAX, f64::min);
            let max = xs.iter().copied().fold(f64::MIN, f64::max);
            Some(ColumnRange::new(min - margin, max + margin))
        };

        let date = range_of(&date_xs, COLUMN_MARGIN);
        let value = range_of(&value_xs, COLUMN_MARGIN);
        let owner = range_of(&checkmark_xs, OWNER_COLUMN_MARGIN);

        // Type column: from the row-index boundary to the nearer of the
        // detected date/value columns (minus a margin), at least 1.0 wide.
        let type_min = row_index_max_x;
        let type_max = date
            .map_or(5.0, |r| r.min)
            .min(value.map_or(6.0, |r| r.min))
            - 0.2;
        let type_range = ColumnRange::new(type_min, type_max.max(type_min + 1.0));

        Layout {
            row_index_max_x,
            type_range,
            date_range: date.unwrap_or(ColumnRange::new(4.0, 5.5)),
            value_range: value.unwrap_or(ColumnRange::new(5.5, 7.0)),
            owner_range: owner.unwrap_or(ColumnRange::new(6.8, 8.1)),
            header_y_min,
            footer_y_max,
            detected: true,
        }
    }

    /// Hard-coded layout for a category, used when a page has no usable
    /// lines. `detected` is false so callers can downgrade confidence.
    pub fn default_layout(category: PageCategory) -> Layout {
        let (type_range, date_range, value_range, owner_range, header_y_min) = match category {
            PageCategory::Land => (
                ColumnRange::new(0.9, 1.9),
                ColumnRange::new(4.5, 5.5),
                ColumnRange::new(6.0, 7.0),
                ColumnRange::new(6.9, 8.1),
                2.5,
            ),
            PageCategory::Building => (
                ColumnRange::new(0.9, 2.5),
                ColumnRange::new(4.2, 5.5),
                ColumnRange::new(5.5, 7.0),
                ColumnRange::new(6.8, 8.1),
                2.0,
            ),
            PageCategory::Vehicle => (
                ColumnRange::new(0.9, 2.5),
                ColumnRange::new(4.2, 5.5),
                ColumnRange::new(5.5, 7.0),
                ColumnRange::new(6.8, 8.1),
                2.0,
            ),
            PageCategory::Rights => (
                ColumnRange::new(1.0, 3.8),
                ColumnRange::new(3.8, 5.6),
                ColumnRange::new(6.0, 7.0),
                ColumnRange::new(6.9, 8.1),
                0.8,
            ),
            PageCategory::Other => (
                ColumnRange::new(1.0, 4.0),
                ColumnRange::new(4.3, 5.3),
                ColumnRange::new(5.8, 7.0),
                ColumnRange::new(6.8, 8.1),
                0.8,
            ),
        };
        Layout {
            row_index_max_x: DEFAULT_ROW_INDEX_MAX_X,
            type_range,
            date_range,
            value_range,
            owner_range,
            header_y_min,
            footer_y_max: DEFAULT_FOOTER_Y,
            detected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    fn line_at(content: &str, cx: f64, cy: f64) -> Line {
        let poly = Polygon::new([
            cx - 0.1,
            cy - 0.1,
            cx + 0.1,
            cy - 0.1,
            cx + 0.1,
            cy + 0.1,
            cx - 0.1,
            cy + 0.1,
        ]);
        Line::new(content, Some(poly))
    }

    #[test]
    fn test_empty_page_yields_category_default() {
        let detector = LayoutDetector::new();
        let layout = detector.detect(&[], PageCategory::Land);
        assert!(!layout.detected);
        assert_eq!(layout.header_y_min, 2.5);
        assert_eq!(layout.date_range, ColumnRange::new(4.5, 5.5));

        let rights = detector.detect(&[], PageCategory::Rights);
        assert_eq!(rights.header_y_min, 0.8);
        assert_eq!(rights.type_range, ColumnRange::new(1.0, 3.8));
    }

    #[test]
    fn test_row_index_column_from_sequence() {
        // 1..5 stacked at x ≈ 0.5: winning bucket's max x + 0.3 margin.
        let detector = LayoutDetector::new();
        let lines: Vec<Line> = (1..=5)
            .map(|n| line_at(&n.to_string(), 0.5, 2.0 + n as f64))
            .collect();
        let layout = detector.detect(&lines, PageCategory::Land);
        assert!(layout.detected);
        assert!((layout.row_index_max_x - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_row_index_fallback_single_candidate() {
        // A lone "1" is not a sequence; fall back to 1.0.
        let detector = LayoutDetector::new();
        let lines = vec![line_at("1", 0.5, 3.0)];
        let layout = detector.detect(&lines, PageCategory::Land);
        assert_eq!(layout.row_index_max_x, 1.0);
    }

    #[test]
    fn test_row_index_prefers_sequential_leftmost_bucket() {
        // A sequential run at x=0.5 must beat a non-sequential pair of
        // numbers further right (e.g. years of acquisition mis-read).
        let detector = LayoutDetector::new();
        let mut lines: Vec<Line> = (1..=4)
            .map(|n| line_at(&n.to_string(), 0.5, 2.0 + n as f64))
            .collect();
        lines.push(line_at("7", 3.0, 4.0));
        lines.push(line_at("21", 3.0, 5.0));
        let layout = detector.detect(&lines, PageCategory::Land);
        assert!((layout.row_index_max_x - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_header_pushes_boundary_down() {
        let detector = LayoutDetector::new();
        let lines = vec![
            line_at("ลำดับ", 0.6, 1.5),
            line_at("data", 2.0, 5.0),
        ];
        let layout = detector.detect(&lines, PageCategory::Other);
        assert!((layout.header_y_min - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_header_keyword_below_band_ignored() {
        // "ประเภท" in body text at y=5 must not move the header bound.
        let detector = LayoutDetector::new();
        let lines = vec![line_at("ประเภท", 2.0, 5.0)];
        let layout = detector.detect(&lines, PageCategory::Other);
        assert_eq!(layout.header_y_min, 0.8);
    }

    #[test]
    fn test_header_exclusion_phrases() {
        // "ไม่พบรายการ" contains the header keyword "รายการ" but is a data
        // value; it must not move the bound.
        let detector = LayoutDetector::new();
        let lines = vec![line_at("ไม่พบรายการ", 2.0, 1.5)];
        let layout = detector.detect(&lines, PageCategory::Other);
        assert_eq!(layout.header_y_min, 0.8);
    }

    #[test]
    fn test_exclusion_phrases_skip_footer_too() {
        // A bottom-band data value ("ไม่พบ...") containing a footer keyword
        // must not pull the footer bound up.
        let detector = LayoutDetector::new();
        let lines = vec![line_at("ไม่พบ หมายเหตุ", 1.0, 9.8)];
        let layout = detector.detect(&lines, PageCategory::Other);
        assert_eq!(layout.footer_y_max, 10.5);
    }

    #[test]
    fn test_footer_pulls_boundary_up() {
        let detector = LayoutDetector::new();
        let lines = vec![line_at("หมายเหตุ ๑", 1.0, 9.8)];
        let layout = detector.detect(&lines, PageCategory::Other);
        assert!((layout.footer_y_max - 9.6).abs() < 1e-9);
    }

    #[test]
    fn test_footer_exclusion_owner_abbreviation() {
        // "บ." is the owner column header, not a footer token.
        let detector = LayoutDetector::new();
        let lines = vec![line_at("ลงชื่อ บ.", 7.0, 9.5)];
        let layout = detector.detect(&lines, PageCategory::Other);
        assert_eq!(layout.footer_y_max, 10.5);
    }

    #[test]
    fn test_date_value_owner_column_detection() {
        let detector = LayoutDetector::new();
        let lines = vec![
            line_at("10/1/2556", 4.6, 3.0),
            line_at("2/12/2557", 4.8, 4.0),
            line_at("500,000.00", 6.2, 3.0),
            line_at("1,250,000.00", 6.4, 4.0),
            line_at("/", 7.2, 3.0),
            line_at("✓", 7.4, 4.0),
        ];
        let layout = detector.detect(&lines, PageCategory::Land);
        assert_eq!(layout.date_range, ColumnRange::new(4.6 - 0.3, 4.8 + 0.3));
        assert_eq!(layout.value_range, ColumnRange::new(6.2 - 0.3, 6.4 + 0.3));
        assert_eq!(layout.owner_range, ColumnRange::new(7.2 - 0.2, 7.4 + 0.2));
    }

    #[test]
    fn test_thai_month_date_detected() {
        let detector = LayoutDetector::new();
        let lines = vec![
            line_at("10 ม.ค. 2556", 4.6, 3.0),
            line_at("5 ก.พ. 2557", 4.7, 4.0),
        ];
        let layout = detector.detect(&lines, PageCategory::Land);
        assert!((layout.date_range.min - (4.6 - 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_tokens_outside_body_ignored() {
        // A monetary value in the footer band must not define the value
        // column.
        let detector = LayoutDetector::new();
        let lines = vec![
            line_at("หมายเหตุ", 1.0, 9.8),
            line_at("999,999.00", 3.0, 10.2),
        ];
        let layout = detector.detect(&lines, PageCategory::Land);
        assert_eq!(layout.value_range, ColumnRange::new(5.5, 7.0));
    }

    #[test]
    fn test_type_column_fills_gap() {
        let detector = LayoutDetector::new();
        let lines: Vec<Line> = (1..=3)
            .map(|n| line_at(&n.to_string(), 0.5, 2.0 + n as f64))
            .chain([line_at("10/1/2556", 4.6, 3.0)])
            .collect();
        let layout = detector.detect(&lines, PageCategory::Land);
        // Gap between row-index boundary and date column start, minus margin.
        assert!((layout.type_range.min - 0.8).abs() < 1e-9);
        assert!((layout.type_range.max - (4.3 - 0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_type_column_min_width() {
        // Date column hugging the row-index boundary: type still gets at
        // least 1.0 unit.
        let detector = LayoutDetector::new();
        let lines: Vec<Line> = (1..=3)
            .map(|n| line_at(&n.to_string(), 0.5, 2.0 + n as f64))
            .chain([line_at("10/1/2556", 1.1, 3.0)])
            .collect();
        let layout = detector.detect(&lines, PageCategory::Land);
        assert!(layout.type_range.max - layout.type_range.min >= 1.0);
    }

    #[test]
    fn test_lines_without_polygons_cast_no_votes() {
        let detector = LayoutDetector::new();
        let lines = vec![
            Line::new("1", None),
            Line::new("2", None),
            Line::new("500,000.00", None),
        ];
        let layout = detector.detect(&lines, PageCategory::Land);
        assert!(layout.detected);
        assert_eq!(layout.row_index_max_x, 1.0);
        assert_eq!(layout.value_range, ColumnRange::new(5.5, 7.0));
    }

    #[test]
    fn test_column_for_priority() {
        let layout = Layout {
            row_index_max_x: 1.0,
            type_range: ColumnRange::new(1.0, 4.3),
            date_range: ColumnRange::new(4.0, 5.5),
            value_range: ColumnRange::new(5.3, 7.0),
            owner_range: ColumnRange::new(6.8, 8.1),
            header_y_min: 0.8,
            footer_y_max: 10.5,
            detected: true,
        };
        assert_eq!(layout.column_for(0.5), ColumnKind::RowIndex);
        assert_eq!(layout.column_for(2.0), ColumnKind::Type);
        // Overlap regions resolve by priority: date over type, date over
        // value, value over owner.
        assert_eq!(layout.column_for(4.1), ColumnKind::Date);
        assert_eq!(layout.column_for(5.4), ColumnKind::Date);
        assert_eq!(layout.column_for(6.9), ColumnKind::Value);
        assert_eq!(layout.column_for(7.5), ColumnKind::Owner);
    }

    #[test]
    fn test_in_body() {
        let layout = LayoutDetector::default_layout(PageCategory::Other);
        assert!(layout.in_body(5.0));
        assert!(!layout.in_body(0.5));
        assert!(!layout.in_body(10.6));
    }
}
