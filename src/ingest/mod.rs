//! Document ingestion: uploaded bytes to plain text.
//!
//! PDFs (by `.pdf` extension or `%PDF-` signature) go through `pdf-extract`. Everything else
//! must be UTF-8 text.

pub mod error;


pub use error::IngestError;

use std::any::Any;
use std::panic;
use std::path::Path;

use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// How an upload will be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
    /// Unknown extension, decoded as text.
    Other,
}

impl DocumentKind {
    pub fn detect(filename: Option<&str>, bytes: &[u8]) -> Self {
        let extension = filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            _ if bytes.starts_with(PDF_MAGIC) => DocumentKind::Pdf,
            Some("txt") | Some("text") | Some("md") => DocumentKind::Text,
            None => DocumentKind::Text,
            Some(_) => DocumentKind::Other,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF document",
            DocumentKind::Text => "text document",
            DocumentKind::Other => "document of unsupported type",
        }
    }
}

/// Extracts plain text from an uploaded document.
pub fn extract_text(filename: Option<&str>, bytes: &[u8]) -> Result<String, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::Empty);
    }

    let kind = DocumentKind::detect(filename, bytes);
    debug!(?kind, bytes = bytes.len(), filename, "Extracting document text");

    match kind {
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Text | DocumentKind::Other => String::from_utf8(bytes.to_vec())
            .map(|text| text.trim_start_matches('\u{feff}').to_string())
            .map_err(|e| IngestError::Encoding {
                kind: kind.describe(),
                reason: e.utf8_error().to_string(),
            }),
    }
}

// pdf-extract panics on some malformed documents (for example a font missing from the page
// resources), so a panic is reported as an unreadable PDF.
fn extract_pdf(bytes: &[u8]) -> Result<String, IngestError> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(extracted) => extracted.map_err(|e| IngestError::Pdf {
            reason: e.to_string(),
        }),
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            warn!(%reason, bytes = bytes.len(), "PDF parser panicked");
            Err(IngestError::Pdf {
                reason: format!("malformed document: {reason}"),
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "parser aborted".to_string())
}
