//! Anchor-based translation alignment against a reference template.
//!
//! Skew normalization removes rotation; this step removes the residual
//! translation between a scanned page and the template it matches, by
//! pairing structural anchor lines and averaging their offsets. Rotation
//! and scale are deliberately left at identity here.

use scanlayout_core::{AlignmentTransform, AnchorPoint, Page, find_anchors};

use crate::template::TemplateStore;

/// Aligns document pages to a reference template using anchor points.
///
/// Constructed once from a loaded [`TemplateStore`]; stateless per call
/// afterwards, so one aligner can serve concurrent page-processing units.
#[derive(Debug, Clone)]
pub struct TemplateAligner {
    store: TemplateStore,
}

impl TemplateAligner {
    pub fn new(store: TemplateStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Anchor points found on an arbitrary document page, using the same
    /// extraction the template pages were indexed with.
    pub fn find_document_anchors(&self, page: &Page) -> Vec<AnchorPoint> {
        find_anchors(page)
    }

    /// Compute the translation that maps `page` onto the given template
    /// page.
    ///
    /// Each document anchor is paired with the first template anchor sharing
    /// its pattern (first match wins — no many-to-many resolution); the
    /// transform is the mean (dx, dy) over pairs, template position minus
    /// document position. `None` when the template page is missing or no
    /// pair exists — the caller must treat that as "alignment unavailable",
    /// never as a zero offset.
    pub fn calculate_alignment_transform(
        &self,
        page: &Page,
        template_page_number: u32,
    ) -> Option<AlignmentTransform> {
        let Some(template_anchors) = self.store.anchors(template_page_number) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                page_number = page.page_number,
                template_page_number,
                "alignment unavailable: template page not in store"
            );
            return None;
        };

        let doc_anchors = self.find_document_anchors(page);

        let mut dx_sum = 0.0;
        let mut dy_sum = 0.0;
        let mut matched = 0usize;

        for doc_anchor in &doc_anchors {
            if let Some(tmpl) = template_anchors
                .iter()
                .find(|t| t.pattern == doc_anchor.pattern)
            {
                dx_sum += tmpl.x - doc_anchor.x;
                dy_sum += tmpl.y - doc_anchor.y;
                matched += 1;
            }
        }

        if matched == 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                page_number = page.page_number,
                template_page_number,
                "alignment unavailable: no anchor pairs matched"
            );
            return None;
        }

        let n = matched as f64;
        Some(AlignmentTransform::translation(
            dx_sum / n,
            dy_sum / n,
            matched,
        ))
    }

    /// Align a page to a template page, producing a new page value.
    ///
    /// Every valid polygon is translated by the computed (dx, dy); each
    /// translated line is flagged and the transform is recorded on the page.
    /// A no-op (the page returned unchanged) when no transform could be
    /// computed.
    pub fn align_page(&self, page: &Page, template_page_number: u32) -> Page {
        let Some(transform) = self.calculate_alignment_transform(page, template_page_number)
        else {
            return page.clone();
        };

        let mut aligned = page.clone();
        for line in &mut aligned.lines {
            if let Some(polygon) = &line.polygon {
                line.polygon = Some(polygon.translate(transform.dx, transform.dy));
                line.alignment_applied = true;
            }
        }
        aligned.alignment = Some(transform);
        aligned
    }
}
