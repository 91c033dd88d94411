// Document rendering: resume record → laid-out pages → PDF bytes.
// Pure and CPU-bound; async callers run it inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod layout;
pub mod pdf;
pub mod template;

use thiserror::Error;

use crate::models::resume::ResumeRecord;

pub use layout::PageGeometry;
pub use template::Template;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF serialisation failed: {0}")]
    Pdf(String),
}

/// Renders a validated record into a complete PDF document.
pub fn render_resume(record: &ResumeRecord, template: Template) -> Result<Vec<u8>, RenderError> {
    let typography = template.typography();
    let geometry = PageGeometry::us_letter();
    let blocks = layout::build_blocks(record, &typography);
    let pages = layout::layout(&blocks, &geometry, typography.leading);
    pdf::write_pdf(&pages, &geometry)
}

#[cfg(test)]
/// Every string shown by a `Tj` operator, one per line, across all pages.
pub(crate) fn shown_text(bytes: &[u8]) -> String {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let mut lines = Vec::new();
    for page_id in doc.get_pages().values() {
        let content = doc.get_and_decode_page_content(*page_id).unwrap();
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            if let Some(Ok(s)) = op.operands.first().map(|o| o.as_str()) {
                lines.push(String::from_utf8_lossy(s).into_owned());
            }
        }
    }
    lines.join("\n")
}
