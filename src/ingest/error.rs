use thiserror::Error;

/// Document could not be turned into text. Always a client-side problem.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("uploaded document is empty")]
    Empty,

    #[error("failed to extract text from PDF: {reason}")]
    Pdf { reason: String },

    #[error("{kind} is not valid UTF-8 text: {reason}")]
    Encoding { kind: &'static str, reason: String },
}
