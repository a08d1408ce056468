//! Visual row clustering and column assignment.
//!
//! Groups a page's lines into visual rows by vertical proximity, then tags
//! each line with the functional column its x-center falls in. This
//! cluster-then-classify pattern is the shared skeleton every downstream
//! table extractor wraps with field-specific handling.

use crate::layout::{ColumnKind, Layout};
use crate::page::Line;

/// Default vertical tolerance (inches) for lines on the same visual row.
pub const DEFAULT_Y_TOLERANCE: f64 = 0.3;

/// Group lines into visual rows by y-proximity.
///
/// Lines are sorted by (y, x), then walked in order. Each new row is
/// anchored at its **first** line's y — not a running average, which would
/// drift down a tall, densely packed table — and absorbs subsequent lines
/// whose y is within `y_tolerance` of that anchor. Finished rows are sorted
/// by x before being emitted.
pub fn group_by_row(lines: &[Line], y_tolerance: f64) -> Vec<Vec<Line>> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<Line> = lines.to_vec();
    sorted.sort_by(|a, b| {
        let (ax, ay) = a.center();
        let (bx, by) = b.center();
        (ay, ax).partial_cmp(&(by, bx)).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut rows: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    let mut anchor_y = 0.0;

    for line in sorted {
        let y = line.center_y();
        if current.is_empty() {
            anchor_y = y;
            current.push(line);
        } else if (y - anchor_y).abs() <= y_tolerance {
            current.push(line);
        } else {
            rows.push(finish_row(current));
            anchor_y = y;
            current = vec![line];
        }
    }
    if !current.is_empty() {
        rows.push(finish_row(current));
    }

    rows
}

fn finish_row(mut row: Vec<Line>) -> Vec<Line> {
    row.sort_by(|a, b| {
        a.center_x()
            .partial_cmp(&b.center_x())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    row
}

/// A line placed in a row, tagged with its functional column.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCell {
    pub column: ColumnKind,
    pub line: Line,
}

/// Cluster lines into rows and assign each element to a column of `layout`.
///
/// Rows are ordered top-to-bottom, elements within a row left-to-right.
pub fn cluster_rows(lines: &[Line], layout: &Layout, y_tolerance: f64) -> Vec<Vec<RowCell>> {
    group_by_row(lines, y_tolerance)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|line| RowCell {
                    column: layout.column_for(line.center_x()),
                    line,
                })
                .collect()
        })
        .collect()
}
