//! PDF text extraction using lopdf.

use tracing::{debug, warn};

use crate::error::ExtractError;

/// Extract the text of every page, in page order, joined with `\n`.
///
/// Pages that fail to decode are skipped with a warning.
///
/// # Errors
///
/// Returns [`ExtractError::Pdf`] if the document cannot be parsed and
/// [`ExtractError::NoText`] if no page yields any text.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = lopdf::Document::load_mem(bytes)?;
    let pages = doc.get_pages();

    debug!(page_count = pages.len(), "Extracting text from PDF");

    let mut texts = Vec::with_capacity(pages.len());
    for &page_num in pages.keys() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => texts.push(text.trim_end().to_string()),
            Err(e) => warn!(page = page_num, error = %e, "Failed to extract text from page, skipping"),
        }
    }

    let text = texts.join("\n");
    if text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }

    debug!(chars = text.chars().count(), "Text extraction complete");
    Ok(text)
}
