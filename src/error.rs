//! Error types for the pdf2png library.
//!
//! Every failure is a variant of [`Pdf2PngError`]. The desktop shell and the
//! CLI only need to know which of two buckets a failure belongs to, so each
//! variant maps onto an [`ErrorCategory`]:
//!
//! * [`ErrorCategory::Validation`]: the input was rejected before any page
//!   was rendered (missing file, wrong extension, corrupt, encrypted, too many
//!   pages). Nothing was written.
//!
//! * [`ErrorCategory::Conversion`]: the input was accepted but rendering or
//!   writing failed, or something unexpected went wrong. Pages written before
//!   the failure stay on disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2png library.
#[derive(Debug, Error)]
pub enum Pdf2PngError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The file does not carry a `.pdf` extension.
    #[error("Not a PDF file: '{path}'\nOnly files with a .pdf extension are accepted.")]
    InvalidFormat { path: PathBuf },

    /// PDFium could not parse the file (corrupt, truncated or not a PDF).
    #[error("Could not open '{path}'. It may be corrupted or not a valid PDF.\nDetails: {detail}")]
    Unreadable { path: PathBuf, detail: String },

    /// The PDF requires a password to open.
    #[error("PDF '{path}' is password protected.\nPassword protected PDFs are not supported.")]
    Encrypted { path: PathBuf },

    /// The document has more pages than the configured limit.
    #[error("Page count limit exceeded. Max: {limit}, Actual: {count}")]
    TooManyPages { count: usize, limit: usize },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// Rendering or writing a specific page failed.
    #[error("Error converting page {page}: {detail}")]
    ConversionFailed { page: usize, detail: String },

    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place the pdfium library next to the executable, or\n\
set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2PngError {
    /// Which user-facing bucket this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Pdf2PngError::FileNotFound { .. }
            | Pdf2PngError::InvalidFormat { .. }
            | Pdf2PngError::Unreadable { .. }
            | Pdf2PngError::Encrypted { .. }
            | Pdf2PngError::TooManyPages { .. } => ErrorCategory::Validation,
            Pdf2PngError::ConversionFailed { .. }
            | Pdf2PngError::OutputDirFailed { .. }
            | Pdf2PngError::InvalidConfig(_)
            | Pdf2PngError::PdfiumBindingFailed(_)
            | Pdf2PngError::Internal(_) => ErrorCategory::Conversion,
        }
    }

    /// 1-based page number for page-level failures.
    pub fn page(&self) -> Option<usize> {
        match self {
            Pdf2PngError::ConversionFailed { page, .. } => Some(*page),
            _ => None,
        }
    }
}

/// The two failure buckets surfaced to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Input rejected before conversion started.
    Validation,
    /// Failure while rendering/writing, or an unexpected failure.
    Conversion,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => f.write_str("Validation error"),
            ErrorCategory::Conversion => f.write_str("Conversion error"),
        }
    }
}
