//! Document-level API: load OCR output, normalize, align, and inspect pages.
//!
//! [`ScanDocument`] is the convenience facade over the core algorithms. Each
//! step is a pure value-to-value map on the inner [`Document`]; the facade
//! just threads the value through and exposes lookups.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use scanlayout_core::{
    Document, Layout, LayoutDetector, Page, PageCategory, PageSkew, RowCell, cluster_rows,
    normalize_page, page_layout_similarity, skew_report,
};

use crate::align::TemplateAligner;
use crate::error::LoadError;

/// Layout similarity between two pages' polygon sets, in `[0, 1]`.
///
/// The scoring primitive an external page-to-template matcher uses to decide
/// page identity. Compares whatever polygons the pages currently carry —
/// raw or normalized.
pub fn page_similarity(a: &Page, b: &Page) -> f64 {
    page_layout_similarity(&a.polygons(), &b.polygons())
}

/// An OCR document with the operations of the layout pipeline.
#[derive(Debug, Clone)]
pub struct ScanDocument {
    doc: Document,
    detector: LayoutDetector,
}

impl ScanDocument {
    /// Open a document JSON file produced by the OCR step.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Parse a document from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        Ok(Self::from_document(serde_json::from_reader(reader)?))
    }

    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(Self::from_document(serde_json::from_str(json)?))
    }

    pub fn from_document(doc: Document) -> Self {
        Self {
            doc,
            detector: LayoutDetector::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Serialize the current document state, including any side-channel
    /// annotations from normalization and alignment.
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string(&self.doc)?)
    }

    /// Look up a page by its 1-indexed page number.
    pub fn page(&self, page_number: u32) -> Option<&Page> {
        self.doc.page(page_number)
    }

    /// Detect and correct skew on every page, marking the document
    /// normalized.
    pub fn normalize(&mut self) {
        self.normalize_filtered(None);
    }

    /// Normalize only the listed page numbers; other pages pass through
    /// unchanged.
    pub fn normalize_pages(&mut self, pages: &[u32]) {
        self.normalize_filtered(Some(pages));
    }

    fn normalize_filtered(&mut self, pages: Option<&[u32]>) {
        let map_page = |page: &Page| match pages {
            Some(wanted) if !wanted.contains(&page.page_number) => page.clone(),
            _ => normalize_page(page),
        };

        #[cfg(feature = "parallel")]
        let new_pages: Vec<Page> = {
            use rayon::prelude::*;
            self.doc.pages.par_iter().map(map_page).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let new_pages: Vec<Page> = self.doc.pages.iter().map(map_page).collect();

        self.doc = Document {
            pages: new_pages,
            normalized: true,
        };
    }

    /// Align every page against the template page with the same page
    /// number. Pages without anchors (or without a template counterpart)
    /// pass through unchanged.
    pub fn align_with(&mut self, aligner: &TemplateAligner) {
        let aligned = self
            .doc
            .pages
            .iter()
            .map(|page| aligner.align_page(page, page.page_number))
            .collect();
        self.doc.pages = aligned;
    }

    /// Detect the column layout of a page for a semantic category.
    pub fn detect_layout(&self, page_number: u32, category: PageCategory) -> Option<Layout> {
        self.page(page_number)
            .map(|page| self.detector.detect(&page.lines, category))
    }

    /// Cluster a page's table-body lines into column-tagged rows.
    ///
    /// Header and footer lines (per the layout's y-bounds) are excluded;
    /// rows come out top-to-bottom, elements left-to-right.
    pub fn cluster_rows(
        &self,
        page_number: u32,
        layout: &Layout,
        y_tolerance: f64,
    ) -> Vec<Vec<RowCell>> {
        let Some(page) = self.page(page_number) else {
            return Vec::new();
        };
        let body: Vec<_> = page
            .lines
            .iter()
            .filter(|l| layout.in_body(l.center_y()))
            .cloned()
            .collect();
        cluster_rows(&body, layout, y_tolerance)
    }

    /// Measured skew per page, without correcting anything.
    pub fn skew_report(&self) -> Vec<PageSkew> {
        skew_report(&self.doc)
    }
}
