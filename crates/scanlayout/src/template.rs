//! Reference template storage.
//!
//! A template is a document in the same schema as OCR input, produced once
//! from a clean reference scan of the form family. It is loaded a single
//! time, anchor points are precomputed per page, and the store is immutable
//! afterwards — callers construct one `TemplateStore` per process and share
//! it by reference across page-processing units.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use scanlayout_core::{AnchorPoint, Document, Page, find_anchors};

use crate::error::LoadError;

/// A template page with its precomputed anchor points.
#[derive(Debug, Clone)]
pub struct TemplatePage {
    page: Page,
    anchors: Vec<AnchorPoint>,
}

impl TemplatePage {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn anchors(&self) -> &[AnchorPoint] {
        &self.anchors
    }
}

/// Read-only store of template pages, indexed by page number.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    pages: BTreeMap<u32, TemplatePage>,
}

impl TemplateStore {
    /// Load a template artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Load a template artifact from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        let document: Document = serde_json::from_reader(reader)?;
        Ok(Self::from_document(document))
    }

    /// Index an already-parsed template document.
    pub fn from_document(document: Document) -> Self {
        let pages = document
            .pages
            .into_iter()
            .map(|page| {
                let anchors = find_anchors(&page);
                (page.page_number, TemplatePage { page, anchors })
            })
            .collect();
        Self { pages }
    }

    /// Look up a template page by page number.
    pub fn page(&self, page_number: u32) -> Option<&TemplatePage> {
        self.pages.get(&page_number)
    }

    /// Anchor points of a template page, if the page exists.
    pub fn anchors(&self, page_number: u32) -> Option<&[AnchorPoint]> {
        self.pages.get(&page_number).map(|p| p.anchors.as_slice())
    }

    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanlayout_core::{Line, Polygon};

    fn anchor_line(content: &str, x: f64, y: f64) -> Line {
        let poly = Polygon::new([x, y, x + 1.5, y, x + 1.5, y + 0.25, x, y + 0.25]);
        Line::new(content, Some(poly))
    }

    fn template_doc() -> Document {
        Document::new(vec![
            Page::new(
                1,
                8.2639,
                11.6944,
                vec![
                    anchor_line("- ลับ -", 3.6, 0.23),
                    anchor_line("ข้อมูลส่วนบุคคล", 0.6, 0.97),
                    anchor_line("plain text", 1.0, 4.0),
                ],
            ),
            Page::new(2, 8.2639, 11.6944, vec![anchor_line("หน้า 2", 7.1, 0.55)]),
        ])
    }

    #[test]
    fn test_from_document_indexes_anchors() {
        let store = TemplateStore::from_document(template_doc());
        assert_eq!(store.len(), 2);
        assert_eq!(store.anchors(1).unwrap().len(), 2);
        assert_eq!(store.anchors(2).unwrap().len(), 1);
        assert_eq!(store.anchors(2).unwrap()[0].pattern, "หน้า ");
        assert!(store.page(3).is_none());
    }

    #[test]
    fn test_from_reader_parses_schema() {
        let json = r#"{
            "pages": [{
                "page_number": 1,
                "width": 8.2639,
                "height": 11.6944,
                "lines": [
                    {"content": "- ลับ -", "polygon": [3.6, 0.2, 4.6, 0.2, 4.6, 0.45, 3.6, 0.45]}
                ]
            }]
        }"#;
        let store = TemplateStore::from_reader(json.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.anchors(1).unwrap()[0].x, 3.6);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = TemplateStore::load("/nonexistent/template.json").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_page_numbers_sorted() {
        let store = TemplateStore::from_document(template_doc());
        let numbers: Vec<u32> = store.page_numbers().collect();
        assert_eq!(numbers, [1, 2]);
    }
}
