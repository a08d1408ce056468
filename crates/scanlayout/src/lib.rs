//! scanlayout: Normalize, align, and structure OCR output from scanned
//! paper forms.
//!
//! This is the facade crate of the scanlayout engine. It loads the OCR
//! document schema and the reference template artifact, and drives the core
//! algorithms from `scanlayout-core`:
//!
//! 1. **Skew normalization** — estimate each page's rotation from its line
//!    polygons and rotate everything back upright.
//! 2. **Template alignment** — pair structural anchor phrases with a
//!    reference template and translate the page onto it.
//! 3. **Adaptive layout detection** — infer table column x-ranges and
//!    header/footer y-bounds per page from token shapes.
//! 4. **Row clustering** — group lines into visual rows and tag each with
//!    its functional column.
//!
//! Page-layout similarity ([`page_similarity`]) is independent of the
//! pipeline and feeds an external page-identity matcher.
//!
//! # Architecture
//!
//! - **scanlayout-core**: value types and pure, side-effect-free algorithms
//! - **scanlayout** (this crate): JSON boundary, template store, facade API
//!
//! # Example
//!
//! ```no_run
//! use scanlayout::{PageCategory, ScanDocument, TemplateAligner, TemplateStore};
//!
//! # fn main() -> Result<(), scanlayout::LoadError> {
//! let mut doc = ScanDocument::open("declaration.json")?;
//! doc.normalize();
//!
//! let aligner = TemplateAligner::new(TemplateStore::load("template.json")?);
//! doc.align_with(&aligner);
//!
//! if let Some(layout) = doc.detect_layout(5, PageCategory::Land) {
//!     let rows = doc.cluster_rows(5, &layout, scanlayout::DEFAULT_Y_TOLERANCE);
//!     for row in rows {
//!         for cell in row {
//!             println!("{:?}: {}", cell.column, cell.line.content);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub use scanlayout_core;

mod align;
mod document;
mod error;
mod template;

pub use align::TemplateAligner;
pub use document::{ScanDocument, page_similarity};
pub use error::LoadError;
pub use template::{TemplatePage, TemplateStore};

// Re-export the core surface so most users need only this crate.
pub use scanlayout_core::{
    AlignmentTransform, AnchorPoint, BBox, ColumnKind, ColumnRange, DEFAULT_Y_TOLERANCE, Document,
    Layout, LayoutDetector, Line, Page, PageCategory, PageSkew, Polygon, RowCell, cluster_rows,
    detect_page_skew, group_by_row, normalize_document, normalize_page, page_layout_similarity,
};
