//! Document decoding: turns uploaded PDF/DOCX bytes into plain text.
//!
//! Decoding is best-effort: a corrupt or unsupported document yields an empty
//! string, which callers treat as "unreadable". Only data-URI parsing reports
//! typed errors, because the caller needs to tell "could not decode" apart from
//! "decoded but unreadable".

pub mod data_uri;
pub mod docx;
pub mod pdf;

use thiserror::Error;
use tracing::warn;

pub use data_uri::DataUri;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("content is not a data URI (missing ',' separator)")]
    MissingSeparator,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentFormat {
    /// Infers the format from a data-URI header such as `data:application/pdf;base64`.
    pub fn from_data_uri_header(header: &str) -> Self {
        let header = header.to_lowercase();
        if header.starts_with(&format!("data:{PDF_MIME}")) {
            DocumentFormat::Pdf
        } else if header.starts_with(&format!("data:{DOCX_MIME}")) {
            DocumentFormat::Docx
        } else {
            DocumentFormat::Unsupported
        }
    }

    /// Infers the format from a file name suffix, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Self {
        let name = file_name.to_lowercase();
        if name.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else if name.ends_with(".docx") {
            DocumentFormat::Docx
        } else {
            DocumentFormat::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Unsupported => "unsupported",
        }
    }
}

/// Extracts plain text from `bytes`. Never fails: any decoding error is logged
/// and reported as empty text.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> String {
    let result = match format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(bytes),
        DocumentFormat::Docx => docx::extract_docx_text(bytes),
        DocumentFormat::Unsupported => return String::new(),
    };

    match result {
        Ok(text) => text,
        Err(e) => {
            warn!("Error reading {}: {e}", format.as_str());
            String::new()
        }
    }
}

/// `extract_text` on the blocking thread pool; decoding large PDFs is CPU-bound.
pub async fn extract_text_blocking(bytes: Vec<u8>, format: DocumentFormat) -> String {
    match tokio::task::spawn_blocking(move || extract_text(&bytes, format)).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Text extraction task failed: {e}");
            String::new()
        }
    }
}
